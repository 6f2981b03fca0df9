use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Fitness figures of one finished generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Generation number.
    pub generation: u32,
    /// Highest fitness in the cohort.
    pub best_fitness: f32,
    /// Mean fitness of the cohort.
    pub mean_fitness: f32,
}

/// Statistics tracking fitness over recent generations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessHistory {
    /// Recent generations, oldest first
    pub records: VecDeque<GenerationRecord>,
    /// Maximum number of generations to keep
    pub max_history: usize,
}

impl Default for FitnessHistory {
    fn default() -> Self {
        Self {
            records: VecDeque::new(),
            max_history: 100,
        }
    }
}

impl FitnessHistory {
    /// Record a finished generation, dropping the oldest beyond `max_history`
    pub fn record(&mut self, record: GenerationRecord) {
        self.records.push_back(record);
        if self.records.len() > self.max_history {
            self.records.pop_front();
        }
    }

    /// Most recent record
    pub fn latest(&self) -> Option<&GenerationRecord> {
        self.records.back()
    }

    /// Best fitness across the tracked generations
    pub fn best_fitness(&self) -> Option<f32> {
        self.records.iter().map(|r| r.best_fitness).reduce(f32::max)
    }

    /// Average best fitness over the last `n` tracked generations
    pub fn recent_mean_best(&self, n: usize) -> f32 {
        let recent: Vec<f32> = self
            .records
            .iter()
            .rev()
            .take(n)
            .map(|r| r.best_fitness)
            .collect();
        if recent.is_empty() {
            0.0
        } else {
            recent.iter().sum::<f32>() / recent.len() as f32
        }
    }

    /// Number of generations tracked
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no generation has finished yet
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
