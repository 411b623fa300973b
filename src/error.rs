//! Error types for curve construction, backend calls, and tick aggregation.

use thiserror::Error;

/// Misconfiguration detected at construction or profile-load time.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A table curve needs at least two control points.
    #[error("response curve needs at least two control points, got {0}")]
    CurveTooShort(usize),

    /// Control-point x-values must be strictly ascending (duplicates rejected).
    #[error("response curve x-values must be strictly ascending (violation at point {index})")]
    CurveNotAscending { index: usize },

    /// A binding read a signal name the vehicle does not carry.
    #[error("unknown signal `{signal}` on vehicle `{vehicle}`")]
    UnknownSignal { vehicle: String, signal: String },

    /// Base gain acts as a multiplier and must not be negative.
    #[error("base gain must be >= 0, got {0}")]
    NegativeBaseGain(f32),

    /// Failed to read a profile file.
    #[error("failed to read profile file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse profile TOML.
    #[error("failed to parse profiles: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A fallible audio- or simulation-backend call failed.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("audio source allocation failed: {0}")]
    Allocation(String),

    #[error("unknown audio source {0}")]
    UnknownSource(u64),

    #[error("unknown vehicle id `{0}`")]
    UnknownVehicle(String),

    #[error("{0}")]
    Other(String),
}

/// Anything that can go wrong while stepping a single vehicle.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// One vehicle's failure during a tick.
#[derive(Debug)]
pub struct TickFailure {
    pub vehicle: String,
    pub error: StepError,
}

/// All per-vehicle failures collected over one tick. A failing vehicle never
/// aborts its siblings; the full set is surfaced once the tick completes.
#[derive(Debug, Error)]
#[error("{} vehicle(s) failed during tick", .failures.len())]
pub struct TickErrors {
    pub failures: Vec<TickFailure>,
}
