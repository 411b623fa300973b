//! Trait seams to the external audio and traffic-simulation backends.
//!
//! Both collaborators are owned by the host. The engine only calls them; it
//! never mutates simulation state and treats every call as fallible.

use crate::error::BackendError;
use crate::pose::Vec3;

pub type BackendResult<T> = Result<T, BackendError>;

/// Handle to one spatialized source owned by exactly one vehicle binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(pub u64);

/// Kinematics reported by the traffic simulation for one vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VehicleState {
    pub position: Vec3,
    /// Geographic heading in degrees, clockwise from north.
    pub heading_deg: f32,
    /// Scalar speed along the heading.
    pub speed: f32,
}

/// Spatialized-audio rendering backend.
///
/// The backend owns doppler, attenuation, and panning; the engine only sets
/// gains, poses, and the single global listener.
pub trait AudioBackend {
    /// Allocate a looping or one-shot source bound to a sound asset.
    fn create_source(&mut self, asset: &str, looping: bool) -> BackendResult<SourceId>;

    fn destroy_source(&mut self, source: SourceId) -> BackendResult<()>;

    fn play(&mut self, source: SourceId) -> BackendResult<()>;

    fn pause(&mut self, source: SourceId) -> BackendResult<()>;

    fn set_source_gain(&mut self, source: SourceId, gain: f32) -> BackendResult<()>;

    fn set_source_position(&mut self, source: SourceId, position: Vec3) -> BackendResult<()>;

    fn set_source_velocity(&mut self, source: SourceId, velocity: Vec3) -> BackendResult<()>;

    fn set_listener_position(&mut self, position: Vec3) -> BackendResult<()>;

    fn set_listener_velocity(&mut self, velocity: Vec3) -> BackendResult<()>;

    /// Listener orientation as look-at and up vectors.
    fn set_listener_orientation(&mut self, at: Vec3, up: Vec3) -> BackendResult<()>;

    /// Listener gain, effectively the master volume.
    fn set_listener_gain(&mut self, gain: f32) -> BackendResult<()>;
}

/// Read-only view of the authoritative traffic simulation, queried once per
/// tick.
pub trait TrafficProvider {
    /// Ids of all vehicles currently in the simulation.
    fn vehicle_ids(&self) -> BackendResult<Vec<String>>;

    /// The simulation's class label for a vehicle (e.g. `"passenger"`).
    fn vehicle_class(&self, id: &str) -> BackendResult<String>;

    fn vehicle_state(&self, id: &str) -> BackendResult<VehicleState>;
}
