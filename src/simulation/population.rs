//! Generation controller: steps the cohort, detects the end of a generation
//! and breeds the next one.
//!
//! A tick works on a snapshot of the traffic footprints taken before anything
//! moves, so every cohort vehicle senses and collides against the previous
//! tick's traffic. That one-tick staleness makes the update order irrelevant,
//! which is why the cohort is updated in parallel. Cohort members never see
//! or hit each other: they all start at the same pose.

use geo::Coord;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::brain::Brain;
use super::error::Result;
use super::evolution::{self, Breeder};
use super::geometry::{Point, Polygon};
use super::params::Params;
use super::road::Road;
use super::spatial::ObstacleIndex;
use super::stats::{FitnessHistory, GenerationRecord};
use super::vehicle::{ControlMode, Controls, Sensor, Vehicle};

/// Lifecycle of the current generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    /// At least one cohort vehicle is still undamaged.
    Running,
    /// Every cohort vehicle is damaged.
    Ended,
}

/// Outcome of a finished generation.
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    /// Number of the generation that ended.
    pub generation: u32,
    /// Ticks the generation lasted.
    pub ticks: u64,
    /// Fitness of the champion.
    pub best_fitness: f32,
    /// Mean fitness of the cohort.
    pub mean_fitness: f32,
    /// Deep copy of the fittest vehicle's network, parent of the next cohort.
    pub champion: Brain,
    /// Parameter distance between the champion and the network the cohort
    /// was bred from, if any.
    pub drift: Option<f32>,
}

/// A cohort of learned vehicles driving among traffic on one road.
#[derive(Debug)]
pub struct Population {
    params: Params,
    road: Road,
    vehicles: Vec<Vehicle>,
    traffic: Vec<Vehicle>,
    initial_traffic: Vec<Vehicle>,
    sensor: Sensor,
    breeder: Breeder,
    ancestor: Option<Brain>,
    generation: u32,
    tick: u64,
    history: FitnessHistory,
    rng: StdRng,
}

impl Population {
    /// Creates a population with random networks on the road described by
    /// `params`.
    pub fn new(params: Params) -> Result<Self> {
        Self::with_seed_brain(params, None)
    }

    /// Creates a population on the road described by `params`. With a seed
    /// brain, the first cohort is bred from it instead of being random.
    pub fn with_seed_brain(params: Params, seed: Option<Brain>) -> Result<Self> {
        params.validate()?;
        let mut rng = make_rng(params.seed);
        let road = Road::new(
            params.road_x,
            params.road_width,
            params.lane_count,
            params.road_length,
        );
        let traffic = spawn_traffic(&road, &params, &mut rng)?;
        Self::build(params, road, traffic, seed, rng)
    }

    /// Creates a population on a custom road with custom traffic. Traffic is
    /// restored to this initial state at every new generation.
    pub fn from_world(
        params: Params,
        road: Road,
        traffic: Vec<Vehicle>,
        seed: Option<Brain>,
    ) -> Result<Self> {
        params.validate()?;
        let rng = make_rng(params.seed);
        Self::build(params, road, traffic, seed, rng)
    }

    fn build(
        params: Params,
        road: Road,
        traffic: Vec<Vehicle>,
        seed: Option<Brain>,
        mut rng: StdRng,
    ) -> Result<Self> {
        let sensor = Sensor::new(params.ray_count, params.ray_length, params.ray_spread)?;
        let breeder = Breeder::new(params.mutation_amount, params.keep_elite);

        let brains = match &seed {
            Some(brain) => breeder.offspring(brain, params.population_size, &mut rng),
            None => (0..params.population_size)
                .map(|_| Brain::new(&params.layer_sizes(), &mut rng))
                .collect::<Result<Vec<_>>>()?,
        };

        let start = start_position(&road, &params);
        let vehicles = brains
            .into_iter()
            .enumerate()
            .map(|(id, brain)| {
                Vehicle::learned(
                    id,
                    start,
                    params.body(),
                    params.kinematics(),
                    sensor.clone(),
                    brain,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            "population of {} vehicles created among {} traffic vehicles{}",
            vehicles.len(),
            traffic.len(),
            if seed.is_some() { " from a seed brain" } else { "" }
        );

        Ok(Self {
            params,
            road,
            vehicles,
            initial_traffic: traffic.clone(),
            traffic,
            sensor,
            breeder,
            ancestor: seed,
            generation: 0,
            tick: 0,
            history: FitnessHistory::default(),
            rng,
        })
    }

    /// Advances every vehicle by one tick.
    ///
    /// When this tick leaves every cohort vehicle damaged, the next cohort is
    /// bred immediately and the summary of the finished generation returned.
    pub fn step(&mut self) -> Option<GenerationSummary> {
        let snapshot: Vec<Polygon> = self
            .traffic
            .iter()
            .map(|car| car.polygon().clone())
            .collect();
        let index = ObstacleIndex::build(&snapshot);
        let borders = self.road.borders();

        self.vehicles
            .par_iter_mut()
            .filter(|vehicle| !vehicle.is_damaged())
            .for_each(|vehicle| {
                let nearby = index.nearby(vehicle.pos, vehicle.reach());
                vehicle.update(borders, &nearby);
            });

        for car in &mut self.traffic {
            car.update(borders, &[]);
        }

        self.tick += 1;

        match self.state() {
            GenerationState::Ended => self.respawn(),
            GenerationState::Running => None,
        }
    }

    /// Steps until the generation ends or `max_ticks` have passed in it, then
    /// ends it if it is still running. `None` as for [`Population::respawn`].
    pub fn run_generation(&mut self, max_ticks: u64) -> Option<GenerationSummary> {
        while self.tick < max_ticks {
            if let Some(summary) = self.step() {
                return Some(summary);
            }
        }
        debug!(
            "generation {} still running after {} ticks, ending it",
            self.generation, self.tick
        );
        self.respawn()
    }

    /// Ends the current generation and breeds the next one from its fittest
    /// vehicle.
    ///
    /// [`Population::step`] calls this once every vehicle is damaged; an
    /// external scheduler may call it earlier.
    ///
    /// Returns `None` and leaves the generation untouched when no cohort
    /// vehicle carries a network to breed from.
    pub fn respawn(&mut self) -> Option<GenerationSummary> {
        let Some(summary) = self.summarize() else {
            warn!(
                "generation {} has no network-driven vehicle, nothing to breed",
                self.generation
            );
            return None;
        };

        self.history.record(GenerationRecord {
            generation: summary.generation,
            best_fitness: summary.best_fitness,
            mean_fitness: summary.mean_fitness,
        });
        info!(
            "generation {} ended after {} ticks: best fitness {:.1}, mean {:.1}",
            summary.generation, summary.ticks, summary.best_fitness, summary.mean_fitness
        );
        if let Some(drift) = summary.drift {
            debug!("champion drifted {:.3} from its ancestor", drift);
        }

        let brains = self.breeder.offspring(
            &summary.champion,
            self.params.population_size,
            &mut self.rng,
        );
        let start = start_position(&self.road, &self.params);
        let (body, kinematics) = (self.params.body(), self.params.kinematics());
        self.vehicles = brains
            .into_iter()
            .enumerate()
            .map(|(id, brain)| {
                Vehicle::assemble(
                    id,
                    start,
                    body,
                    kinematics,
                    ControlMode::Learned {
                        sensor: self.sensor.clone(),
                        brain,
                        commands: Controls::default(),
                    },
                )
            })
            .collect();

        self.traffic.clone_from(&self.initial_traffic);
        self.ancestor = Some(summary.champion.clone());
        self.generation += 1;
        self.tick = 0;

        Some(summary)
    }

    fn summarize(&self) -> Option<GenerationSummary> {
        let (best, champion) = evolution::champion(&self.vehicles)?;
        let champion = champion.clone();
        let total: f32 = self.vehicles.iter().map(|v| v.fitness).sum();

        Some(GenerationSummary {
            generation: self.generation,
            ticks: self.tick,
            best_fitness: self.vehicles[best].fitness,
            mean_fitness: total / self.vehicles.len() as f32,
            drift: self
                .ancestor
                .as_ref()
                .map(|ancestor| Brain::distance(ancestor, &champion)),
            champion,
        })
    }

    /// Whether the current generation is still running.
    pub fn state(&self) -> GenerationState {
        if self.vehicles.iter().all(Vehicle::is_damaged) {
            GenerationState::Ended
        } else {
            GenerationState::Running
        }
    }

    /// Vehicle to follow: the fittest undamaged one, else the fittest overall.
    pub fn leader(&self) -> Option<&Vehicle> {
        evolution::leader(&self.vehicles).map(|i| &self.vehicles[i])
    }

    /// Cohort of the current generation.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Traffic vehicles.
    pub fn traffic(&self) -> &[Vehicle] {
        &self.traffic
    }

    /// The road.
    pub fn road(&self) -> &Road {
        &self.road
    }

    /// Parameters the population was built with.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Current generation number, starting at 0.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Ticks elapsed in the current generation.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Fitness of recent generations.
    pub fn history(&self) -> &FitnessHistory {
        &self.history
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn start_position(road: &Road, params: &Params) -> Point {
    Coord {
        x: road.lane_center(params.start_lane),
        y: params.start_y,
    }
}

/// Places traffic in random lanes ahead of the start, already at cruising
/// speed.
fn spawn_traffic<R: Rng + ?Sized>(
    road: &Road,
    params: &Params,
    rng: &mut R,
) -> Result<Vec<Vehicle>> {
    (0..params.traffic_count)
        .map(|i| {
            let lane = rng.random_range(0..road.lane_count);
            let pos = Coord {
                x: road.lane_center(lane),
                y: params.traffic_start_y - i as f32 * params.traffic_spacing,
            };
            let mut car = Vehicle::dummy(i, pos, params.body(), params.traffic_kinematics())?;
            car.speed = params.traffic_speed;
            Ok(car)
        })
        .collect()
}
