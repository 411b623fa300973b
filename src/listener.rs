//! The single listener pose from which all spatialization is computed.

use crate::backend::{AudioBackend, TrafficProvider};
use crate::error::BackendError;
use crate::pose::{Pose, Vec3, heading_unit};

#[derive(Debug, Clone)]
enum ListenerMode {
    /// Externally set pose, never touched by the tick.
    Fixed,
    /// Pose pulled each tick from one tracked vehicle.
    Tracked { vehicle: String },
    /// Pose pulled each tick, but speed is derived from consecutive
    /// positions. For hosts where the simulation's reported speed is
    /// unreliable (e.g. the vehicle is driven by an external controller).
    TrackedDerivedSpeed {
        vehicle: String,
        last_position: Option<Vec3>,
    },
}

/// Exactly one per [`Fleet`](crate::Fleet); a pose with no sound bindings.
#[derive(Debug, Clone)]
pub struct Listener {
    mode: ListenerMode,
    pose: Pose,
    master_volume: f32,
}

impl Listener {
    /// Stationary listener, moved only via [`set_pose`](Self::set_pose).
    pub fn fixed() -> Self {
        Self {
            mode: ListenerMode::Fixed,
            pose: Pose::default(),
            master_volume: 1.0,
        }
    }

    /// Listener synced to a simulation vehicle each tick.
    pub fn tracked(vehicle: impl Into<String>) -> Self {
        Self {
            mode: ListenerMode::Tracked {
                vehicle: vehicle.into(),
            },
            pose: Pose::default(),
            master_volume: 1.0,
        }
    }

    /// Listener synced to a simulation vehicle, with speed computed from
    /// position deltas instead of trusting the reported value.
    pub fn tracked_derived_speed(vehicle: impl Into<String>) -> Self {
        Self {
            mode: ListenerMode::TrackedDerivedSpeed {
                vehicle: vehicle.into(),
                last_position: None,
            },
            pose: Pose::default(),
            master_volume: 1.0,
        }
    }

    /// Id of the simulation vehicle this listener follows, if any.
    pub fn tracked_vehicle(&self) -> Option<&str> {
        match &self.mode {
            ListenerMode::Fixed => None,
            ListenerMode::Tracked { vehicle }
            | ListenerMode::TrackedDerivedSpeed { vehicle, .. } => Some(vehicle),
        }
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    /// Point the listener along a geographic heading without moving it.
    pub fn set_heading(&mut self, heading_deg: f32) {
        self.pose.heading_deg = heading_deg;
    }

    /// Master volume for every sound in the run, pushed as listener gain on
    /// the next tick.
    pub fn set_master_volume(&mut self, gain: f32) {
        self.master_volume = gain.max(0.0);
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    /// Pull fresh kinematics from the simulation for the synced variants.
    pub fn update(&mut self, traffic: &dyn TrafficProvider, dt: f32) -> Result<(), BackendError> {
        match &mut self.mode {
            ListenerMode::Fixed => Ok(()),
            ListenerMode::Tracked { vehicle } => {
                let state = traffic.vehicle_state(vehicle)?;
                self.pose = Pose::from_speed(state.position, state.speed, state.heading_deg);
                Ok(())
            }
            ListenerMode::TrackedDerivedSpeed {
                vehicle,
                last_position,
            } => {
                let state = traffic.vehicle_state(vehicle)?;
                let speed = match *last_position {
                    Some(prev) if dt > 0.0 => (state.position - prev).norm() / dt,
                    _ => 0.0,
                };
                *last_position = Some(state.position);
                self.pose = Pose::from_speed(state.position, speed, state.heading_deg);
                Ok(())
            }
        }
    }

    /// Push pose, orientation, and master volume to the audio backend.
    pub fn push(&self, audio: &mut dyn AudioBackend) -> Result<(), BackendError> {
        audio.set_listener_position(self.pose.position)?;
        audio.set_listener_velocity(self.pose.velocity)?;
        let at = heading_unit(self.pose.heading_deg);
        audio.set_listener_orientation(at, Vec3::new(0.0, 0.0, 1.0))?;
        audio.set_listener_gain(self.master_volume)
    }
}
