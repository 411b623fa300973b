//! Per-vehicle sound actuation for a moving-vehicle simulation.
//!
//! Each external simulation tick, a [`Fleet`] reconciles its tracked vehicle
//! population against the simulation's live id set, recomputes per-vehicle
//! signals (speed, acceleration, custom values), maps each signal through a
//! [`ResponseCurve`] to a gain multiplier, and pushes the resulting gains and
//! poses to an [`AudioBackend`]. Spatialization, asset decoding, and the
//! simulation's ground truth stay outside, behind the backend traits.

pub mod backend;
pub mod config;
pub mod curve;
pub mod error;
pub mod fleet;
pub mod listener;
pub mod pose;
pub mod profiles;
pub mod vehicle;

pub use backend::{AudioBackend, SourceId, TrafficProvider, VehicleState};
pub use curve::{ResponseCurve, SignalValue, TableCurve};
pub use error::{BackendError, ConfigError, StepError, TickErrors, TickFailure};
pub use fleet::Fleet;
pub use listener::Listener;
pub use pose::{Pose, Vec3};
pub use profiles::{ClassMap, SoundSpec, VehicleSpec, default_class_map};
pub use vehicle::{SIGNAL_ACCELERATION, SIGNAL_SPEED, SoundBinding, Vehicle};
