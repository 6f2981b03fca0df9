//! Driving commands and the per-vehicle control source.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::super::brain::Brain;
use super::sensor::Sensor;

/// Boolean driving commands applied for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    /// Steer left.
    pub left: bool,
    /// Steer right.
    pub right: bool,
    /// Accelerate forward.
    pub forward: bool,
    /// Accelerate backward.
    pub reverse: bool,
}

impl Controls {
    /// Full throttle, no steering.
    pub const FORWARD: Controls = Controls {
        left: false,
        right: false,
        forward: true,
        reverse: false,
    };

    /// Reads network outputs in the order left, right, forward, reverse.
    /// An output is active only when it equals `1`.
    ///
    /// # Panics
    ///
    /// Panics if `outputs` has fewer than four entries.
    pub fn from_outputs(outputs: &Array1<f32>) -> Self {
        Self {
            left: outputs[0] == 1.0,
            right: outputs[1] == 1.0,
            forward: outputs[2] == 1.0,
            reverse: outputs[3] == 1.0,
        }
    }
}

/// Where a vehicle's commands come from, resolved once per tick.
#[derive(Debug, Clone)]
pub enum ControlMode {
    /// Commands set from outside, e.g. by a keyboard handler.
    Manual(Controls),
    /// Commands that never change (traffic).
    Fixed(Controls),
    /// Commands produced by a network from the vehicle's own sensor.
    Learned {
        /// Ray sensor feeding the network.
        sensor: Sensor,
        /// Decision network owned by this vehicle.
        brain: Brain,
        /// Commands computed on the most recent tick.
        commands: Controls,
    },
}

impl ControlMode {
    /// Commands currently in effect.
    pub fn commands(&self) -> Controls {
        match self {
            ControlMode::Manual(controls) | ControlMode::Fixed(controls) => *controls,
            ControlMode::Learned { commands, .. } => *commands,
        }
    }
}
