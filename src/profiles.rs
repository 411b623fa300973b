//! Data-driven vehicle construction and the default class table.
//!
//! A [`VehicleSpec`] plays the role a subclass hierarchy plays elsewhere:
//! plain data describing which sounds a vehicle carries and which signals
//! drive them, buildable into a live [`Vehicle`]. The default table maps the
//! traffic simulation's vehicle-class labels onto these specs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::backend::AudioBackend;
use crate::curve::{ResponseCurve, SignalValue, TableCurve};
use crate::error::{ConfigError, StepError};
use crate::pose::Vec3;
use crate::vehicle::{SIGNAL_ACCELERATION, SIGNAL_SPEED, Vehicle};

pub const ENGINE_ASSET: &str = "assets/engine_idle.wav";
pub const TIRE_ASSET: &str = "assets/tires.wav";
pub const SIREN_ASSET: &str = "assets/siren.wav";
pub const BICYCLE_ASSET: &str = "assets/bicycle.wav";

/// One sound on a vehicle: asset, driving signal, curve, and placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundSpec {
    pub asset: String,
    pub signal: String,
    /// Table-curve control points, strictly ascending in x.
    pub curve: Vec<(f32, f32)>,
    #[serde(default = "SoundSpec::default_base_gain")]
    pub base_gain: f32,
    /// Position of the sound relative to the vehicle point.
    #[serde(default)]
    pub offset: [f32; 3],
    #[serde(default = "SoundSpec::default_looping")]
    pub looping: bool,
}

impl SoundSpec {
    fn default_base_gain() -> f32 {
        1.0
    }

    fn default_looping() -> bool {
        true
    }
}

/// Everything needed to construct one vehicle's sound set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleSpec {
    #[serde(default)]
    pub sounds: Vec<SoundSpec>,
    /// Initial values for custom signals (e.g. a siren flag).
    #[serde(default)]
    pub signals: HashMap<String, SignalValue>,
}

impl VehicleSpec {
    /// Check every curve and gain without touching a backend. Surfaces
    /// misconfiguration at load time rather than inside the tick loop.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for sound in &self.sounds {
            TableCurve::new(sound.curve.clone())?;
            if sound.base_gain < 0.0 {
                return Err(ConfigError::NegativeBaseGain(sound.base_gain));
            }
        }
        Ok(())
    }

    /// Build a live vehicle, allocating one audio source per sound. On
    /// failure the partially allocated sources are released and the error
    /// returned; the id stays untracked.
    pub fn build(&self, id: &str, audio: &mut dyn AudioBackend) -> Result<Vehicle, StepError> {
        let mut vehicle = Vehicle::new(id);
        for (name, value) in &self.signals {
            vehicle.set_signal(name.clone(), *value);
        }
        for sound in &self.sounds {
            let curve = match ResponseCurve::table(sound.curve.clone()) {
                Ok(curve) => curve,
                Err(err) => {
                    vehicle.release(audio);
                    return Err(err.into());
                }
            };
            let added = vehicle.add_sound_at(
                audio,
                &sound.asset,
                &sound.signal,
                curve,
                sound.base_gain,
                Vec3::from(sound.offset),
                sound.looping,
            );
            if let Err(err) = added {
                vehicle.release(audio);
                return Err(err);
            }
        }
        Ok(vehicle)
    }
}

fn engine_sound(base_gain: f32) -> SoundSpec {
    SoundSpec {
        asset: ENGINE_ASSET.to_string(),
        signal: SIGNAL_ACCELERATION.to_string(),
        curve: vec![(0.0, 0.5), (2.5, 1.0)],
        base_gain,
        offset: [0.0; 3],
        looping: true,
    }
}

fn tire_sound(base_gain: f32) -> SoundSpec {
    SoundSpec {
        asset: TIRE_ASSET.to_string(),
        signal: SIGNAL_SPEED.to_string(),
        curve: vec![(0.0, 0.0), (28.0, 1.0)],
        base_gain,
        offset: [0.0; 3],
        looping: true,
    }
}

pub fn passenger() -> VehicleSpec {
    VehicleSpec {
        sounds: vec![engine_sound(0.5), tire_sound(2.0)],
        signals: HashMap::new(),
    }
}

pub fn electric() -> VehicleSpec {
    VehicleSpec {
        sounds: vec![tire_sound(1.0)],
        signals: HashMap::new(),
    }
}

pub fn truck() -> VehicleSpec {
    VehicleSpec {
        sounds: vec![engine_sound(2.0), tire_sound(2.0)],
        signals: HashMap::new(),
    }
}

pub fn emergency() -> VehicleSpec {
    let mut spec = passenger();
    spec.sounds.push(SoundSpec {
        asset: SIREN_ASSET.to_string(),
        signal: "siren".to_string(),
        curve: vec![(0.0, 0.0), (1.0, 1.0)],
        base_gain: 2.0,
        offset: [0.0; 3],
        looping: true,
    });
    // Sirens default to audible; hosts flip the flag off per vehicle.
    spec.signals
        .insert("siren".to_string(), SignalValue::Flag(true));
    spec
}

pub fn bicycle() -> VehicleSpec {
    VehicleSpec {
        sounds: vec![SoundSpec {
            asset: BICYCLE_ASSET.to_string(),
            signal: SIGNAL_SPEED.to_string(),
            curve: vec![(0.0, 0.0), (6.0, 1.0)],
            base_gain: 0.5,
            offset: [0.0; 3],
            looping: true,
        }],
        signals: HashMap::new(),
    }
}

/// Class label → spec. `None` marks a class the engine sees but keeps
/// silent (rail, pedestrians, ships).
pub type ClassMap = HashMap<String, Option<VehicleSpec>>;

/// The default table, covering the traffic simulation's standard vehicle
/// classes. Hosts may mutate the returned map freely before or during a run.
pub fn default_class_map() -> ClassMap {
    let mut map = ClassMap::new();
    for class in [
        "ignoring",
        "private",
        "authority",
        "vip",
        "passenger",
        "taxi",
        "coach",
        "motorcycle",
        "moped",
    ] {
        map.insert(class.to_string(), Some(passenger()));
    }
    for class in ["army", "hov", "bus", "delivery", "truck", "trailer"] {
        map.insert(class.to_string(), Some(truck()));
    }
    map.insert("emergency".to_string(), Some(emergency()));
    map.insert("bicycle".to_string(), Some(bicycle()));
    map.insert("evehicle".to_string(), Some(electric()));
    for class in [
        "pedestrian",
        "tram",
        "rail_urban",
        "rail",
        "rail_electric",
        "rail_fast",
        "ship",
        "custom1",
        "custom2",
    ] {
        map.insert(class.to_string(), None);
    }
    map
}
