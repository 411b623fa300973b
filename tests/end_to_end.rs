mod common;

use std::collections::HashMap;

use common::{MockAudio, MockTraffic};
use roadsound::fleet::Fleet;
use roadsound::listener::Listener;
use roadsound::pose::Vec3;
use roadsound::profiles::{SoundSpec, VehicleSpec};

/// A vehicle with a single tire sound on the speed signal, curve
/// {(0,0),(28,1)} and base gain 2, observed at 14 m/s, must push
/// gain = 2 x 0.5 = 1.0.
#[test]
fn tire_sound_gain_at_half_curve_speed() {
    let mut audio = MockAudio::new();
    let mut traffic = MockTraffic::new();
    traffic.insert("car1", "passenger", Vec3::ZERO, 90.0, 14.0);

    let spec = VehicleSpec {
        sounds: vec![SoundSpec {
            asset: "tires.wav".to_string(),
            signal: "speed".to_string(),
            curve: vec![(0.0, 0.0), (28.0, 1.0)],
            base_gain: 2.0,
            offset: [0.0; 3],
            looping: true,
        }],
        signals: HashMap::new(),
    };
    let mut class_map = roadsound::profiles::default_class_map();
    class_map.insert("passenger".to_string(), Some(spec));

    let mut fleet = Fleet::new(Listener::fixed(), class_map);
    fleet.step(0.1, &traffic, &mut audio).unwrap();

    let gains = audio.gains();
    assert_eq!(gains.len(), 1);
    assert!((gains[0].1 - 1.0).abs() < 1e-6);
}

/// The siren starts audible and the flag toggled by the host between ticks
/// flips the siren source between full base gain and silent.
#[test]
fn siren_toggle_drives_the_boolean_curve() {
    let mut audio = MockAudio::new();
    let mut traffic = MockTraffic::new();
    traffic.insert("amb1", "emergency", Vec3::ZERO, 0.0, 0.0);

    let mut fleet = Fleet::with_defaults(Listener::fixed());
    fleet.step(0.1, &traffic, &mut audio).unwrap();

    let siren_source = fleet
        .vehicle("amb1")
        .unwrap()
        .bindings()
        .iter()
        .find(|b| b.signal() == "siren")
        .unwrap()
        .source();
    let gain_of = |audio: &MockAudio| {
        audio
            .gains()
            .into_iter()
            .find(|(s, _)| *s == siren_source)
            .map(|(_, g)| g)
    };
    assert_eq!(gain_of(&audio), Some(2.0));

    fleet.vehicle_mut("amb1").unwrap().set_signal("siren", false);
    audio.calls.clear();
    fleet.step(0.1, &traffic, &mut audio).unwrap();
    assert_eq!(gain_of(&audio), Some(0.0));
}

/// Speed changes across ticks feed the acceleration-driven engine sound.
#[test]
fn engine_gain_tracks_acceleration_across_ticks() {
    let mut audio = MockAudio::new();
    let mut traffic = MockTraffic::new();
    traffic.insert("car1", "passenger", Vec3::ZERO, 0.0, 10.0);

    let mut fleet = Fleet::with_defaults(Listener::fixed());
    fleet.step(0.5, &traffic, &mut audio).unwrap();

    let engine_source = fleet
        .vehicle("car1")
        .unwrap()
        .bindings()
        .iter()
        .find(|b| b.signal() == "acceleration")
        .unwrap()
        .source();

    // Constant speed: acceleration 0, engine curve floor is 0.5, base 0.5.
    audio.calls.clear();
    fleet.step(0.5, &traffic, &mut audio).unwrap();
    let gain = audio
        .gains()
        .into_iter()
        .find(|(s, _)| *s == engine_source)
        .unwrap()
        .1;
    assert!((gain - 0.25).abs() < 1e-6);

    // +1.25 m/s over 0.5 s: acceleration 2.5, curve top is 1.0.
    traffic.set_speed("car1", 11.25);
    audio.calls.clear();
    fleet.step(0.5, &traffic, &mut audio).unwrap();
    let gain = audio
        .gains()
        .into_iter()
        .find(|(s, _)| *s == engine_source)
        .unwrap()
        .1;
    assert!((gain - 0.5).abs() < 1e-6);
}
