//! Vehicle module containing kinematics, control and ray sensing.

mod controls;
mod sensor;
mod vehicle;

pub use controls::{ControlMode, Controls};
pub use sensor::Sensor;
pub use vehicle::*;
