//! Selection and reproduction between generations.
//!
//! Reproduction is elitist and asexual: the fittest vehicle of an ended
//! cohort is the only parent of the next one.

use rand::Rng;

use super::brain::Brain;
use super::vehicle::Vehicle;

/// Produces offspring networks from a single parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breeder {
    /// Maximum perturbation of a mutated parameter.
    pub mutation_amount: f32,
    /// Whether the first offspring is an unmutated copy.
    pub keep_elite: bool,
}

impl Breeder {
    /// Creates a breeder.
    pub fn new(mutation_amount: f32, keep_elite: bool) -> Self {
        Self {
            mutation_amount,
            keep_elite,
        }
    }

    /// Clones `parent` `count` times and mutates every clone except, when
    /// elitism is on, the first.
    pub fn offspring<R: Rng + ?Sized>(
        &self,
        parent: &Brain,
        count: usize,
        rng: &mut R,
    ) -> Vec<Brain> {
        (0..count)
            .map(|i| {
                let mut child = parent.clone();
                let elite = self.keep_elite && i == 0;
                if !elite {
                    child.mutate(self.mutation_amount, rng);
                }
                child
            })
            .collect()
    }
}

/// Index of the vehicle with the highest fitness; the first one wins ties.
pub fn fittest(vehicles: &[Vehicle]) -> Option<usize> {
    fittest_by(vehicles, |_| true)
}

/// Fittest network-driven vehicle together with its network; the first one
/// wins ties. Vehicles without a network are never chosen.
pub fn champion(vehicles: &[Vehicle]) -> Option<(usize, &Brain)> {
    let best = fittest_by(vehicles, |v| v.brain().is_some())?;
    vehicles[best].brain().map(|brain| (best, brain))
}

/// Index of the fittest undamaged vehicle, or of the fittest overall when
/// every vehicle is damaged.
pub fn leader(vehicles: &[Vehicle]) -> Option<usize> {
    fittest_by(vehicles, |v| !v.is_damaged()).or_else(|| fittest(vehicles))
}

fn fittest_by(vehicles: &[Vehicle], keep: impl Fn(&Vehicle) -> bool) -> Option<usize> {
    vehicles
        .iter()
        .enumerate()
        .filter(|(_, v)| keep(*v))
        .fold(None, |best: Option<(usize, f32)>, (i, v)| match best {
            Some((_, fitness)) if fitness >= v.fitness => best,
            _ => Some((i, v.fitness)),
        })
        .map(|(i, _)| i)
}
