use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::brain::COMMAND_WIDTH;
use super::error::{Result, SimulationError};
use super::vehicle::{Body, Kinematics};

/// Simulation parameters that control the world, the vehicles and evolution.
///
/// Missing fields in a config file fall back to [`Params::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Vehicles per generation.
    pub population_size: usize,
    /// Maximum perturbation applied to a mutated parameter.
    pub mutation_amount: f32,
    /// Whether the first offspring receives an unmutated copy of the parent.
    pub keep_elite: bool,
    /// Hidden layer widths between the sensor input and the command output.
    pub hidden_layers: Vec<usize>,
    /// Number of sensor rays.
    pub ray_count: usize,
    /// Length of each sensor ray.
    pub ray_length: f32,
    /// Total sensor fan width in radians.
    pub ray_spread: f32,
    /// Vehicle extent across the heading.
    pub vehicle_width: f32,
    /// Vehicle extent along the heading.
    pub vehicle_height: f32,
    /// Speed gained per tick of throttle.
    pub acceleration: f32,
    /// Speed lost per tick toward zero.
    pub friction: f32,
    /// Forward speed cap for the cohort.
    pub max_speed: f32,
    /// Heading change per tick of steering, in radians.
    pub turn_rate: f32,
    /// Horizontal center of the road.
    pub road_x: f32,
    /// Road width.
    pub road_width: f32,
    /// Number of lanes.
    pub lane_count: usize,
    /// Road extent in each `y` direction.
    pub road_length: f32,
    /// Lane the cohort starts in.
    pub start_lane: usize,
    /// `y` the cohort starts at.
    pub start_y: f32,
    /// Number of traffic vehicles.
    pub traffic_count: usize,
    /// Speed cap of traffic vehicles.
    pub traffic_speed: f32,
    /// `y` of the first traffic vehicle.
    pub traffic_start_y: f32,
    /// Gap between consecutive traffic vehicles.
    pub traffic_spacing: f32,
    /// Seed for reproducible runs; entropy-seeded when absent.
    pub seed: Option<u64>,
    /// Generations the runner plays.
    pub generations: u32,
    /// Ticks after which the runner ends a generation itself.
    pub max_generation_ticks: u64,
    /// File the runner loads its seed brain from and saves the best brain to.
    pub brain_path: Option<String>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            population_size: 100,
            mutation_amount: 0.1,
            keep_elite: true,
            hidden_layers: vec![6],
            ray_count: 5,
            ray_length: 100.0,
            ray_spread: std::f32::consts::PI / 2.0,
            vehicle_width: 30.0,
            vehicle_height: 50.0,
            acceleration: 0.2,
            friction: 0.05,
            max_speed: 3.0,
            turn_rate: 0.03,
            road_x: 200.0,
            road_width: 300.0,
            lane_count: 3,
            road_length: 100_000.0,
            start_lane: 1,
            start_y: 100.0,
            traffic_count: 5,
            traffic_speed: 2.0,
            traffic_start_y: -150.0,
            traffic_spacing: 150.0,
            seed: None,
            generations: 50,
            max_generation_ticks: 3_000,
            brain_path: None,
        }
    }
}

impl Params {
    /// Network layer widths: rays, hidden layers, commands.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden_layers.len() + 2);
        sizes.push(self.ray_count);
        sizes.extend_from_slice(&self.hidden_layers);
        sizes.push(COMMAND_WIDTH);
        sizes
    }

    /// Vehicle extent shared by cohort and traffic.
    pub fn body(&self) -> Body {
        Body {
            width: self.vehicle_width,
            height: self.vehicle_height,
        }
    }

    /// Motion constants of cohort vehicles.
    pub fn kinematics(&self) -> Kinematics {
        Kinematics {
            acceleration: self.acceleration,
            friction: self.friction,
            max_speed: self.max_speed,
            turn_rate: self.turn_rate,
        }
    }

    /// Motion constants of traffic vehicles.
    pub fn traffic_kinematics(&self) -> Kinematics {
        Kinematics {
            max_speed: self.traffic_speed,
            ..self.kinematics()
        }
    }

    /// Checks every parameter once so the simulation never has to.
    #[allow(clippy::neg_cmp_op_on_partial_ord)] // NaN must fail too
    pub fn validate(&self) -> Result<()> {
        fn invalid(name: &'static str, reason: &'static str) -> Result<()> {
            Err(SimulationError::InvalidParam { name, reason })
        }

        if self.population_size == 0 {
            return invalid("population_size", "must be at least 1");
        }
        if !(self.mutation_amount >= 0.0) {
            return invalid("mutation_amount", "must not be negative");
        }
        if self.ray_count == 0 {
            return invalid("ray_count", "must be at least 1");
        }
        if !(self.ray_length > 0.0) {
            return invalid("ray_length", "must be positive");
        }
        if self.hidden_layers.contains(&0) {
            return invalid("hidden_layers", "widths must be at least 1");
        }
        if !(self.vehicle_width > 0.0 && self.vehicle_height > 0.0) {
            return invalid("vehicle_width/vehicle_height", "must be positive");
        }
        if !(self.acceleration >= 0.0) {
            return invalid("acceleration", "must not be negative");
        }
        if !(self.friction >= 0.0) {
            return invalid("friction", "must not be negative");
        }
        if !(self.max_speed > 0.0) {
            return invalid("max_speed", "must be positive");
        }
        if !(self.traffic_speed >= 0.0) {
            return invalid("traffic_speed", "must not be negative");
        }
        if self.lane_count == 0 {
            return invalid("lane_count", "must be at least 1");
        }
        if !(self.road_width > 0.0 && self.road_length > 0.0) {
            return invalid("road_width/road_length", "must be positive");
        }
        Ok(())
    }

    /// Loads parameters from a JSON file and validates them.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }

    /// Saves the parameters as JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
