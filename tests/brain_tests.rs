#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use evo_drive::simulation::brain::{Brain, BrainSnapshot, LevelSnapshot};
use evo_drive::simulation::error::SimulationError;
use evo_drive::simulation::vehicle::Controls;
use ndarray::{Array1, array};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn bits(brain: &Brain) -> Vec<u32> {
    brain
        .levels()
        .iter()
        .flat_map(|level| level.weights.iter().chain(level.biases.iter()))
        .map(|value| value.to_bits())
        .collect()
}

/// Single level with two inputs and one output.
fn threshold(w0: f32, w1: f32, bias: f32) -> Brain {
    Brain::from_snapshot(&BrainSnapshot {
        levels: vec![LevelSnapshot {
            weights: vec![vec![w0], vec![w1]],
            biases: vec![bias],
        }],
    })
    .unwrap()
}

#[test]
fn test_construction_shapes() {
    let brain = Brain::new(&[5, 6, 4], &mut rng()).unwrap();

    assert_eq!(brain.levels().len(), 2);
    assert_eq!(brain.levels()[0].weights.dim(), (5, 6));
    assert_eq!(brain.levels()[0].biases.len(), 6);
    assert_eq!(brain.levels()[1].weights.dim(), (6, 4));
    assert_eq!(brain.input_size(), 5);
    assert_eq!(brain.output_size(), 4);

    for value in brain
        .levels()
        .iter()
        .flat_map(|level| level.weights.iter().chain(level.biases.iter()))
    {
        assert!((-1.0..=1.0).contains(value));
    }
}

#[test]
fn test_malformed_widths_are_rejected() {
    assert!(matches!(
        Brain::new(&[], &mut rng()),
        Err(SimulationError::TooFewLayers(0))
    ));
    assert!(matches!(
        Brain::new(&[5], &mut rng()),
        Err(SimulationError::TooFewLayers(1))
    ));
    assert!(matches!(
        Brain::new(&[5, 0, 4], &mut rng()),
        Err(SimulationError::EmptyLayer(1))
    ));
}

#[test]
fn test_feed_forward_is_deterministic_and_binary() {
    let brain = Brain::new(&[5, 6, 4], &mut rng()).unwrap();
    let inputs = array![0.0, 0.3, 0.9, 0.1, 0.0];

    let first = brain.feed_forward(&inputs);
    for _ in 0..10 {
        assert_eq!(brain.feed_forward(&inputs), first);
    }
    assert_eq!(first.len(), 4);
    assert!(first.iter().all(|&out| out == 0.0 || out == 1.0));
}

#[test]
fn test_output_fires_only_above_bias() {
    let brain = threshold(1.0, 1.0, 1.5);
    assert_eq!(brain.feed_forward(&array![1.0, 1.0]), array![1.0]);
    assert_eq!(brain.feed_forward(&array![1.0, 0.0]), array![0.0]);

    // equal to the bias is not enough
    let brain = threshold(1.0, 1.0, 2.0);
    assert_eq!(brain.feed_forward(&array![1.0, 1.0]), array![0.0]);

    let brain = threshold(-1.0, 0.5, -0.5);
    assert_eq!(brain.feed_forward(&array![0.0, 0.0]), array![1.0]);
}

#[test]
fn test_outputs_map_to_commands_in_order() {
    let controls = Controls::from_outputs(&array![1.0, 0.0, 1.0, 0.0]);
    assert_eq!(
        controls,
        Controls {
            left: true,
            right: false,
            forward: true,
            reverse: false,
        }
    );

    let controls = Controls::from_outputs(&Array1::from_elem(4, 0.0));
    assert_eq!(controls, Controls::default());
}

#[test]
fn test_zero_mutation_is_identity() {
    let mut rng = rng();
    let original = Brain::new(&[5, 6, 4], &mut rng).unwrap();
    let mut mutated = original.clone();

    mutated.mutate(0.0, &mut rng);

    assert_eq!(bits(&mutated), bits(&original));
}

#[test]
fn test_mutation_is_bounded_and_sparse() {
    let mut rng = rng();
    let original = Brain::new(&[20, 30, 4], &mut rng).unwrap();
    let mut mutated = original.clone();

    mutated.mutate(0.2, &mut rng);

    let before = bits(&original);
    let after = bits(&mutated);
    let mut changed = 0;
    for (b, a) in before.iter().zip(&after) {
        let delta = f32::from_bits(*a) - f32::from_bits(*b);
        assert!(delta.abs() <= 0.2 + 1e-6);
        if a != b {
            changed += 1;
        }
    }

    // 754 parameters at p = 0.1
    assert!(changed > 20, "too few mutations: {changed}");
    assert!(changed < 160, "too many mutations: {changed}");
}

#[test]
fn test_mutating_a_clone_leaves_the_parent_alone() {
    let mut rng = rng();
    let parent = Brain::new(&[5, 6, 4], &mut rng).unwrap();
    let before = bits(&parent);

    let mut child = parent.clone();
    child.mutate(1.0, &mut rng);

    assert_eq!(bits(&parent), before);
    assert!(Brain::distance(&parent, &child) > 0.0);
}

#[test]
fn test_distance() {
    let a = threshold(1.0, 1.0, 1.0);
    let b = threshold(1.0, 4.0, 5.0);

    assert_eq!(Brain::distance(&a, &a), 0.0);
    assert_eq!(Brain::distance(&a, &b), 5.0);
}

#[test]
fn test_snapshot_is_a_deep_copy() {
    let brain = Brain::new(&[3, 4], &mut rng()).unwrap();
    let mut snapshot = brain.to_snapshot();
    assert_eq!(snapshot.levels[0].weights.len(), 3);
    assert_eq!(snapshot.levels[0].weights[0].len(), 4);

    let revived = Brain::from_snapshot(&snapshot).unwrap();
    assert_eq!(revived, brain);

    snapshot.levels[0].weights[0][0] += 10.0;
    snapshot.levels[0].biases[0] += 10.0;
    assert_eq!(revived, brain);
    assert_ne!(Brain::from_snapshot(&snapshot).unwrap(), brain);
}

#[test]
fn test_malformed_snapshots_are_rejected() {
    let ragged = BrainSnapshot {
        levels: vec![LevelSnapshot {
            weights: vec![vec![0.1, 0.2], vec![0.3]],
            biases: vec![0.0, 0.0],
        }],
    };
    assert!(matches!(
        Brain::from_snapshot(&ragged),
        Err(SimulationError::RaggedWeights(0))
    ));

    let short_bias = BrainSnapshot {
        levels: vec![LevelSnapshot {
            weights: vec![vec![0.1, 0.2]],
            biases: vec![0.0],
        }],
    };
    assert!(matches!(
        Brain::from_snapshot(&short_bias),
        Err(SimulationError::BiasMismatch { .. })
    ));

    let mismatched = BrainSnapshot {
        levels: vec![
            LevelSnapshot {
                weights: vec![vec![0.1, 0.2]],
                biases: vec![0.0, 0.0],
            },
            LevelSnapshot {
                weights: vec![vec![0.1], vec![0.2], vec![0.3]],
                biases: vec![0.0],
            },
        ],
    };
    assert!(matches!(
        Brain::from_snapshot(&mismatched),
        Err(SimulationError::LevelMismatch {
            index: 1,
            expected: 3,
            found: 2
        })
    ));

    let empty = BrainSnapshot { levels: vec![] };
    assert!(Brain::from_snapshot(&empty).is_err());
}
