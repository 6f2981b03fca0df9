//! A single layer of hard-threshold perceptrons.

use ndarray::{Array1, Array2, Zip};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::super::error::{Result, SimulationError};

/// Probability that any single weight or bias is perturbed by a mutation.
pub const MUTATION_PROBABILITY: f64 = 0.1;

/// One layer of the decision network.
///
/// Each output fires (`1.0`) when the weighted sum of its inputs exceeds its
/// bias and stays silent (`0.0`) otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    /// Weight matrix (`input_count` × `output_count`); `weights[[j, k]]`
    /// connects input `j` to output `k`.
    pub weights: Array2<f32>,
    /// Firing threshold per output (`output_count`).
    pub biases: Array1<f32>,
}

/// Plain nested representation of a [`Level`] for external storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    /// One row per input, one column per output.
    pub weights: Vec<Vec<f32>>,
    /// One threshold per output.
    pub biases: Vec<f32>,
}

impl Level {
    /// Creates a level with every parameter drawn uniformly from `[-1, 1)`.
    pub fn new_random<R: Rng + ?Sized>(
        input_count: usize,
        output_count: usize,
        rng: &mut R,
    ) -> Self {
        let weights = Array2::from_shape_fn((input_count, output_count), |_| unit(rng));
        let biases = Array1::from_shape_fn(output_count, |_| unit(rng));
        Self { weights, biases }
    }

    /// Number of inputs this level consumes.
    pub fn input_count(&self) -> usize {
        self.weights.nrows()
    }

    /// Number of outputs this level produces.
    pub fn output_count(&self) -> usize {
        self.biases.len()
    }

    /// Runs the threshold units on `inputs`.
    ///
    /// # Panics
    ///
    /// Panics if `inputs.len()` differs from [`Level::input_count`].
    #[inline]
    pub fn feed_forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let sums = inputs.dot(&self.weights);
        Zip::from(&sums)
            .and(&self.biases)
            .map_collect(|&sum, &bias| if sum > bias { 1.0 } else { 0.0 })
    }

    /// Perturbs each parameter with probability [`MUTATION_PROBABILITY`] by a
    /// uniform amount in `[-amount, amount)`.
    pub fn mutate<R: Rng + ?Sized>(&mut self, amount: f32, rng: &mut R) {
        for value in self.weights.iter_mut().chain(self.biases.iter_mut()) {
            if rng.random_bool(MUTATION_PROBABILITY) {
                *value += amount * unit(rng);
            }
        }
    }

    /// Copies the parameters into nested vectors.
    pub fn to_snapshot(&self) -> LevelSnapshot {
        LevelSnapshot {
            weights: self.weights.rows().into_iter().map(|row| row.to_vec()).collect(),
            biases: self.biases.to_vec(),
        }
    }

    /// Rebuilds a level from nested vectors, rejecting ragged or empty shapes.
    ///
    /// `index` is only used to label errors.
    pub fn from_snapshot(index: usize, snapshot: &LevelSnapshot) -> Result<Self> {
        let input_count = snapshot.weights.len();
        if input_count == 0 {
            return Err(SimulationError::EmptyLayer(index));
        }
        let output_count = snapshot.weights[0].len();
        if output_count == 0 {
            return Err(SimulationError::EmptyLayer(index + 1));
        }
        if snapshot.weights.iter().any(|row| row.len() != output_count) {
            return Err(SimulationError::RaggedWeights(index));
        }
        if snapshot.biases.len() != output_count {
            return Err(SimulationError::BiasMismatch {
                index,
                expected: output_count,
                found: snapshot.biases.len(),
            });
        }

        Ok(Self {
            weights: Array2::from_shape_fn((input_count, output_count), |(j, k)| {
                snapshot.weights[j][k]
            }),
            biases: Array1::from_vec(snapshot.biases.clone()),
        })
    }
}

/// Uniform sample in `[-1, 1)`.
#[inline]
fn unit<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random::<f32>() * 2.0 - 1.0
}
