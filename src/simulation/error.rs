//! Error type shared by every fallible constructor in the simulation.
//!
//! All validation happens when networks, sensors, vehicles and populations are
//! built. Stepping a well-formed simulation never fails.

use thiserror::Error;

/// Errors raised while building or restoring simulation components.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A network needs at least an input and an output width.
    #[error("network needs at least 2 layer widths, got {0}")]
    TooFewLayers(usize),

    /// A layer width of zero would produce an empty weight matrix.
    #[error("layer width at position {0} is zero")]
    EmptyLayer(usize),

    /// Adjacent levels disagree on their shared width.
    #[error("level {index} expects {expected} inputs but the previous level yields {found}")]
    LevelMismatch {
        /// Index of the offending level.
        index: usize,
        /// Input count of that level.
        expected: usize,
        /// Output count of the level before it.
        found: usize,
    },

    /// A restored weight matrix has rows of different lengths.
    #[error("weight rows of level {0} have different lengths")]
    RaggedWeights(usize),

    /// A restored bias vector does not match the weight matrix width.
    #[error("level {index} has {found} biases for {expected} outputs")]
    BiasMismatch {
        /// Index of the offending level.
        index: usize,
        /// Output count implied by the weights.
        expected: usize,
        /// Number of biases found.
        found: usize,
    },

    /// The network input width does not match the sensor ray count.
    #[error("network expects {expected} inputs but the sensor casts {found} rays")]
    SensorMismatch {
        /// Network input width.
        expected: usize,
        /// Sensor ray count.
        found: usize,
    },

    /// The network does not produce exactly one output per command.
    #[error("network must produce {expected} command outputs, got {found}")]
    OutputWidth {
        /// Required command width.
        expected: usize,
        /// Actual network output width.
        found: usize,
    },

    /// Sensor configuration that cannot cast any meaningful ray.
    #[error("invalid sensor: {0}")]
    InvalidSensor(&'static str),

    /// Fewer than three points cannot bound an area.
    #[error("polygon needs at least 3 points, got {0}")]
    DegeneratePolygon(usize),

    /// A simulation parameter is out of range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParam {
        /// Parameter name as it appears in the config file.
        name: &'static str,
        /// Human readable constraint that was violated.
        reason: &'static str,
    },

    /// Reading or writing a file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A file did not contain valid JSON for the expected type.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimulationError>;
