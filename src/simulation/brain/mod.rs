//! Feed-forward decision network that turns sensor signals into commands.
//!
//! The network is a stack of hard-threshold perceptron levels. Its outputs are
//! binary and read as boolean driving commands, see
//! [`super::vehicle::Controls::from_outputs`].

use std::fs;
use std::path::Path;

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::{Result, SimulationError};

pub mod level;

pub use level::{Level, LevelSnapshot, MUTATION_PROBABILITY};

/// Number of network outputs: left, right, forward, reverse.
pub const COMMAND_WIDTH: usize = 4;

/// Decision network made of threshold levels.
///
/// `Clone` produces a fully independent copy, so offspring never alias the
/// parent's weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BrainSnapshot", into = "BrainSnapshot")]
pub struct Brain {
    levels: Vec<Level>,
}

/// Nested numeric form of a [`Brain`]: ordered levels, each with a 2-D weight
/// array and a bias array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrainSnapshot {
    /// Levels from input to output.
    pub levels: Vec<LevelSnapshot>,
}

impl Brain {
    /// Creates a network with random parameters for the given layer widths,
    /// e.g. `[ray_count, 6, 4]`.
    pub fn new<R: Rng + ?Sized>(layer_sizes: &[usize], rng: &mut R) -> Result<Self> {
        if layer_sizes.len() < 2 {
            return Err(SimulationError::TooFewLayers(layer_sizes.len()));
        }
        if let Some(index) = layer_sizes.iter().position(|&width| width == 0) {
            return Err(SimulationError::EmptyLayer(index));
        }

        let levels = layer_sizes
            .windows(2)
            .map(|pair| Level::new_random(pair[0], pair[1], rng))
            .collect();

        Ok(Self { levels })
    }

    /// Rebuilds a network from its nested form. The result shares no storage
    /// with `snapshot`.
    pub fn from_snapshot(snapshot: &BrainSnapshot) -> Result<Self> {
        if snapshot.levels.is_empty() {
            return Err(SimulationError::TooFewLayers(0));
        }

        let levels = snapshot
            .levels
            .iter()
            .enumerate()
            .map(|(i, level)| Level::from_snapshot(i, level))
            .collect::<Result<Vec<_>>>()?;

        for (i, pair) in levels.windows(2).enumerate() {
            if pair[0].output_count() != pair[1].input_count() {
                return Err(SimulationError::LevelMismatch {
                    index: i + 1,
                    expected: pair[1].input_count(),
                    found: pair[0].output_count(),
                });
            }
        }

        Ok(Self { levels })
    }

    /// Copies the parameters into their nested form.
    pub fn to_snapshot(&self) -> BrainSnapshot {
        BrainSnapshot {
            levels: self.levels.iter().map(Level::to_snapshot).collect(),
        }
    }

    /// Levels from input to output.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Width of the input layer.
    pub fn input_size(&self) -> usize {
        self.levels[0].input_count()
    }

    /// Width of the output layer.
    pub fn output_size(&self) -> usize {
        self.levels[self.levels.len() - 1].output_count()
    }

    /// Runs a forward pass through all levels.
    ///
    /// The same parameters and inputs always produce the same output.
    ///
    /// # Panics
    ///
    /// Panics if `inputs.len()` differs from [`Brain::input_size`].
    #[inline]
    pub fn feed_forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = self.levels[0].feed_forward(inputs);
        for level in &self.levels[1..] {
            output = level.feed_forward(&output);
        }
        output
    }

    /// Mutates all levels; see [`Level::mutate`].
    ///
    /// An `amount` of zero leaves every parameter bit-identical.
    pub fn mutate<R: Rng + ?Sized>(&mut self, amount: f32, rng: &mut R) {
        debug_assert!(amount >= 0.0, "mutation amount must not be negative");
        if amount == 0.0 {
            return;
        }
        for level in &mut self.levels {
            level.mutate(amount, rng);
        }
    }

    /// Calculates the Euclidean distance between two brains.
    ///
    /// Returns the square root of the summed squared differences across all
    /// weights and biases. Brains of different shape compare only their
    /// overlapping levels.
    pub fn distance(brain1: &Brain, brain2: &Brain) -> f32 {
        let mut sum_sq = 0.0;

        for (level1, level2) in brain1.levels.iter().zip(&brain2.levels) {
            for (w1, w2) in level1.weights.iter().zip(level2.weights.iter()) {
                let diff = w1 - w2;
                sum_sq += diff * diff;
            }
            for (b1, b2) in level1.biases.iter().zip(level2.biases.iter()) {
                let diff = b1 - b2;
                sum_sq += diff * diff;
            }
        }

        sum_sq.sqrt()
    }

    /// Saves the brain as JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Loads a brain saved by [`Brain::save_to_file`].
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let brain = serde_json::from_str(&json)?;
        Ok(brain)
    }
}

impl TryFrom<BrainSnapshot> for Brain {
    type Error = SimulationError;

    fn try_from(snapshot: BrainSnapshot) -> Result<Self> {
        Brain::from_snapshot(&snapshot)
    }
}

impl From<Brain> for BrainSnapshot {
    fn from(brain: Brain) -> Self {
        brain.to_snapshot()
    }
}
