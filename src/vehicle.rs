//! A tracked sound-emitting vehicle: pose, signals, and sound bindings.

use std::collections::HashMap;

use tracing::warn;

use crate::backend::{AudioBackend, SourceId};
use crate::curve::{ResponseCurve, SignalValue};
use crate::error::{BackendError, ConfigError, StepError};
use crate::pose::{Pose, Vec3};

/// Built-in signal: scalar speed, derived each step.
pub const SIGNAL_SPEED: &str = "speed";
/// Built-in signal: speed delta over dt, derived each step.
pub const SIGNAL_ACCELERATION: &str = "acceleration";

/// Couples one audio source to one signal through one response curve.
///
/// Immutable after creation; only the signal value it reads changes.
#[derive(Debug)]
pub struct SoundBinding {
    source: SourceId,
    asset: String,
    signal: String,
    curve: ResponseCurve,
    base_gain: f32,
    /// Position of the sound relative to the vehicle point.
    offset: Vec3,
}

impl SoundBinding {
    pub fn source(&self) -> SourceId {
        self.source
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn signal(&self) -> &str {
        &self.signal
    }

    pub fn base_gain(&self) -> f32 {
        self.base_gain
    }
}

#[derive(Debug)]
pub struct Vehicle {
    id: String,
    pose: Pose,
    signals: HashMap<String, SignalValue>,
    bindings: Vec<SoundBinding>,
    enabled: bool,
    degraded: bool,
}

impl Vehicle {
    /// A bare vehicle with the built-in signals initialized to zero.
    pub fn new(id: impl Into<String>) -> Self {
        let mut signals = HashMap::new();
        signals.insert(SIGNAL_SPEED.to_string(), SignalValue::Number(0.0));
        signals.insert(SIGNAL_ACCELERATION.to_string(), SignalValue::Number(0.0));
        Self {
            id: id.into(),
            pose: Pose::default(),
            signals,
            bindings: Vec::new(),
            enabled: false,
            degraded: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Overwrite the pose directly, for hosts driving a vehicle by hand.
    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    pub fn signal(&self, name: &str) -> Option<SignalValue> {
        self.signals.get(name).copied()
    }

    /// Set a custom signal. Takes effect on the next step's evaluation pass;
    /// the value persists until the next explicit set.
    pub fn set_signal(&mut self, name: impl Into<String>, value: impl Into<SignalValue>) {
        self.signals.insert(name.into(), value.into());
    }

    pub fn bindings(&self) -> &[SoundBinding] {
        &self.bindings
    }

    /// True after a failed step left this vehicle silenced. Cleared by the
    /// next successful step.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Register a sound at the vehicle's reference point.
    pub fn add_sound(
        &mut self,
        audio: &mut dyn AudioBackend,
        asset: &str,
        signal: &str,
        curve: ResponseCurve,
        base_gain: f32,
    ) -> Result<(), StepError> {
        self.add_sound_at(audio, asset, signal, curve, base_gain, Vec3::ZERO, true)
    }

    /// Register a sound with a relative position offset and looping flag.
    ///
    /// Built-in signal names are always available. A custom name is accepted
    /// here and only required to exist by the time a step evaluates it.
    pub fn add_sound_at(
        &mut self,
        audio: &mut dyn AudioBackend,
        asset: &str,
        signal: &str,
        curve: ResponseCurve,
        base_gain: f32,
        offset: Vec3,
        looping: bool,
    ) -> Result<(), StepError> {
        if base_gain < 0.0 {
            return Err(ConfigError::NegativeBaseGain(base_gain).into());
        }
        let source = audio.create_source(asset, looping)?;
        if self.enabled && let Err(err) = audio.play(source) {
            let _ = audio.destroy_source(source);
            return Err(err.into());
        }
        self.bindings.push(SoundBinding {
            source,
            asset: asset.to_string(),
            signal: signal.to_string(),
            curve,
            base_gain,
            offset,
        });
        Ok(())
    }

    /// Start playback on every owned source.
    pub fn enable(&mut self, audio: &mut dyn AudioBackend) -> Result<(), BackendError> {
        for binding in &self.bindings {
            audio.play(binding.source)?;
        }
        self.enabled = true;
        Ok(())
    }

    /// Pause playback on every owned source.
    pub fn disable(&mut self, audio: &mut dyn AudioBackend) -> Result<(), BackendError> {
        for binding in &self.bindings {
            audio.pause(binding.source)?;
        }
        self.enabled = false;
        Ok(())
    }

    /// Advance one tick: derive built-in signals from the pose pair, then
    /// evaluate every binding in insertion order and push gain, position,
    /// and velocity for its source.
    ///
    /// Deterministic in its arguments: identical `(pose_now, pose_prev, dt)`
    /// produce identical pushes.
    pub fn step(
        &mut self,
        pose_now: Pose,
        pose_prev: Pose,
        dt: f32,
        audio: &mut dyn AudioBackend,
    ) -> Result<(), StepError> {
        let speed_now = pose_now.speed();
        let speed_prev = pose_prev.speed();
        // Guard the first step and zero-duration ticks.
        let acceleration = if dt > 0.0 {
            (speed_now - speed_prev) / dt
        } else {
            0.0
        };
        self.pose = pose_now;
        self.signals
            .insert(SIGNAL_SPEED.to_string(), SignalValue::Number(speed_now));
        self.signals.insert(
            SIGNAL_ACCELERATION.to_string(),
            SignalValue::Number(acceleration),
        );

        for binding in &self.bindings {
            let value = self.signals.get(&binding.signal).copied().ok_or_else(|| {
                ConfigError::UnknownSignal {
                    vehicle: self.id.clone(),
                    signal: binding.signal.clone(),
                }
            })?;
            let gain = binding.base_gain * binding.curve.evaluate(value);
            audio.set_source_gain(binding.source, gain)?;
            audio.set_source_position(binding.source, pose_now.position + binding.offset)?;
            audio.set_source_velocity(binding.source, pose_now.velocity)?;
        }
        if self.degraded && self.enabled {
            // Silencing paused the sources; a successful step restarts them.
            for binding in &self.bindings {
                audio.play(binding.source)?;
            }
        }
        self.degraded = false;
        Ok(())
    }

    /// Best-effort silencing after a failed step. The vehicle stays tracked
    /// and retries on its next tick.
    pub fn silence(&mut self, audio: &mut dyn AudioBackend) {
        self.degraded = true;
        for binding in &self.bindings {
            if audio.set_source_gain(binding.source, 0.0).is_err() {
                warn!(vehicle = %self.id, source = binding.source.0, "could not silence source");
            }
            let _ = audio.pause(binding.source);
        }
    }

    /// Destroy every owned source. Called when the vehicle leaves the
    /// simulation; destruction failures are logged, not propagated.
    pub fn release(&mut self, audio: &mut dyn AudioBackend) {
        for binding in self.bindings.drain(..) {
            if let Err(err) = audio.destroy_source(binding.source) {
                warn!(vehicle = %self.id, source = binding.source.0, %err, "failed to destroy source");
            }
        }
        self.enabled = false;
    }
}
