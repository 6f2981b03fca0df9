//! # Evo Drive - Neuroevolution of Self-Driving Cars
//!
//! A cohort of vehicles drives down a multi-lane road among slower traffic.
//! Every vehicle senses its surroundings with a fan of rays and decides how to
//! steer and accelerate with a small threshold network. Once the whole cohort
//! has crashed, the vehicle that drove furthest becomes the single parent of
//! the next generation.
//!
//! ## Features
//!
//! - Segment and polygon intersection for sensing and collision
//! - Ray fan sensor with nearest-hit readings
//! - Hard-threshold perceptron networks with sparse mutation
//! - Elitist, asexual reproduction from the fittest vehicle
//! - Parallel cohort updates with a KD-tree broad phase
//! - JSON parameters and brain save/load
//!
//! ## Core Modules
//!
//! - [`simulation::geometry`] - Intersection primitives
//! - [`simulation::vehicle`] - Vehicles, their sensor and their controls
//! - [`simulation::brain`] - Decision network
//! - [`simulation::population`] - Generation controller

/// Core simulation logic and data structures.
pub mod simulation {
    /// Threshold network that maps sensor signals to driving commands.
    pub mod brain;
    /// Error type shared by every fallible operation.
    pub mod error;
    /// Selection and reproduction between generations.
    pub mod evolution;
    /// Segment and polygon intersection.
    pub mod geometry;
    /// Simulation parameters.
    pub mod params;
    /// Cohort, traffic and the generation lifecycle.
    pub mod population;
    /// Straight multi-lane road.
    pub mod road;
    /// KD-tree broad phase for obstacle queries.
    pub mod spatial;
    /// Fitness statistics across generations.
    pub mod stats;
    /// Vehicles, their ray sensor and their control source.
    ///
    /// A [`vehicle::Vehicle`] is driven by a [`vehicle::ControlMode`]: manual
    /// commands, fixed commands (traffic) or a network fed by its own
    /// [`vehicle::Sensor`].
    pub mod vehicle;
}
