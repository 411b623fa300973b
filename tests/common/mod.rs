#![allow(dead_code)]

use std::collections::BTreeMap;

use roadsound::backend::{
    AudioBackend, BackendResult, SourceId, TrafficProvider, VehicleState,
};
use roadsound::error::BackendError;
use roadsound::pose::Vec3;

/// Recorded audio-backend call, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCall {
    Create {
        asset: String,
        looping: bool,
        source: SourceId,
    },
    Destroy(SourceId),
    Play(SourceId),
    Pause(SourceId),
    Gain(SourceId, f32),
    Position(SourceId, Vec3),
    Velocity(SourceId, Vec3),
    ListenerPosition(Vec3),
    ListenerVelocity(Vec3),
    ListenerOrientation(Vec3, Vec3),
    ListenerGain(f32),
}

/// Call-recording audio backend with switchable failure injection.
#[derive(Debug, Default)]
pub struct MockAudio {
    next_id: u64,
    pub calls: Vec<AudioCall>,
    pub fail_create: bool,
    /// Fail creation once this many sources exist.
    pub fail_create_after: Option<u64>,
    pub fail_gain_for: Option<SourceId>,
}

impl MockAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gains(&self) -> Vec<(SourceId, f32)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                AudioCall::Gain(s, g) => Some((*s, *g)),
                _ => None,
            })
            .collect()
    }

    pub fn destroyed(&self) -> Vec<SourceId> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                AudioCall::Destroy(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    pub fn created_assets(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                AudioCall::Create { asset, .. } => Some(asset.clone()),
                _ => None,
            })
            .collect()
    }
}

impl AudioBackend for MockAudio {
    fn create_source(&mut self, asset: &str, looping: bool) -> BackendResult<SourceId> {
        if self.fail_create || self.fail_create_after.is_some_and(|n| self.next_id >= n) {
            return Err(BackendError::Allocation("mock allocation failure".into()));
        }
        let source = SourceId(self.next_id);
        self.next_id += 1;
        self.calls.push(AudioCall::Create {
            asset: asset.to_string(),
            looping,
            source,
        });
        Ok(source)
    }

    fn destroy_source(&mut self, source: SourceId) -> BackendResult<()> {
        self.calls.push(AudioCall::Destroy(source));
        Ok(())
    }

    fn play(&mut self, source: SourceId) -> BackendResult<()> {
        self.calls.push(AudioCall::Play(source));
        Ok(())
    }

    fn pause(&mut self, source: SourceId) -> BackendResult<()> {
        self.calls.push(AudioCall::Pause(source));
        Ok(())
    }

    fn set_source_gain(&mut self, source: SourceId, gain: f32) -> BackendResult<()> {
        if self.fail_gain_for == Some(source) {
            return Err(BackendError::UnknownSource(source.0));
        }
        self.calls.push(AudioCall::Gain(source, gain));
        Ok(())
    }

    fn set_source_position(&mut self, source: SourceId, position: Vec3) -> BackendResult<()> {
        self.calls.push(AudioCall::Position(source, position));
        Ok(())
    }

    fn set_source_velocity(&mut self, source: SourceId, velocity: Vec3) -> BackendResult<()> {
        self.calls.push(AudioCall::Velocity(source, velocity));
        Ok(())
    }

    fn set_listener_position(&mut self, position: Vec3) -> BackendResult<()> {
        self.calls.push(AudioCall::ListenerPosition(position));
        Ok(())
    }

    fn set_listener_velocity(&mut self, velocity: Vec3) -> BackendResult<()> {
        self.calls.push(AudioCall::ListenerVelocity(velocity));
        Ok(())
    }

    fn set_listener_orientation(&mut self, at: Vec3, up: Vec3) -> BackendResult<()> {
        self.calls.push(AudioCall::ListenerOrientation(at, up));
        Ok(())
    }

    fn set_listener_gain(&mut self, gain: f32) -> BackendResult<()> {
        self.calls.push(AudioCall::ListenerGain(gain));
        Ok(())
    }
}

/// Scriptable traffic provider: a map of id → (class, state).
#[derive(Debug, Default)]
pub struct MockTraffic {
    pub vehicles: BTreeMap<String, (String, VehicleState)>,
    pub fail_state_for: Option<String>,
}

impl MockTraffic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: &str, class: &str, position: Vec3, heading_deg: f32, speed: f32) {
        self.vehicles.insert(
            id.to_string(),
            (
                class.to_string(),
                VehicleState {
                    position,
                    heading_deg,
                    speed,
                },
            ),
        );
    }

    pub fn remove(&mut self, id: &str) {
        self.vehicles.remove(id);
    }

    pub fn set_speed(&mut self, id: &str, speed: f32) {
        if let Some((_, state)) = self.vehicles.get_mut(id) {
            state.speed = speed;
        }
    }
}

impl TrafficProvider for MockTraffic {
    fn vehicle_ids(&self) -> BackendResult<Vec<String>> {
        Ok(self.vehicles.keys().cloned().collect())
    }

    fn vehicle_class(&self, id: &str) -> BackendResult<String> {
        self.vehicles
            .get(id)
            .map(|(class, _)| class.clone())
            .ok_or_else(|| BackendError::UnknownVehicle(id.to_string()))
    }

    fn vehicle_state(&self, id: &str) -> BackendResult<VehicleState> {
        if self.fail_state_for.as_deref() == Some(id) {
            return Err(BackendError::Other(format!("stale query for `{id}`")));
        }
        self.vehicles
            .get(id)
            .map(|(_, state)| *state)
            .ok_or_else(|| BackendError::UnknownVehicle(id.to_string()))
    }
}
