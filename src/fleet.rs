//! Per-tick orchestration: reconciliation, stepping, and listener sync.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, warn};

use crate::backend::{AudioBackend, TrafficProvider};
use crate::error::{StepError, TickErrors, TickFailure};
use crate::listener::Listener;
use crate::pose::Pose;
use crate::profiles::{self, ClassMap, VehicleSpec};
use crate::vehicle::Vehicle;

/// The live vehicle population and its listener, driven once per external
/// simulation tick.
///
/// The engine is single-threaded and step-driven: the entire tick executes
/// synchronously inside [`step`](Fleet::step), and all mutation between
/// ticks (`set_signal`, class-map edits) becomes visible on the next tick.
/// A multi-threaded host must serialize access to the whole surface.
pub struct Fleet {
    listener: Listener,
    class_map: ClassMap,
    /// Spec used for class labels missing from the map.
    default_spec: VehicleSpec,
    // BTreeMap keeps per-tick processing order reproducible.
    vehicles: BTreeMap<String, Vehicle>,
    silent_ego: bool,
}

impl Fleet {
    pub fn new(listener: Listener, class_map: ClassMap) -> Self {
        Self {
            listener,
            class_map,
            default_spec: profiles::passenger(),
            vehicles: BTreeMap::new(),
            silent_ego: true,
        }
    }

    /// Fleet with the default class table.
    pub fn with_defaults(listener: Listener) -> Self {
        Self::new(listener, profiles::default_class_map())
    }

    /// Whether the listener's own vehicle is skipped during reconciliation
    /// (on by default: the ego usually should not hear itself).
    pub fn set_silent_ego(&mut self, silent: bool) {
        self.silent_ego = silent;
    }

    /// Spec applied to class labels missing from the map.
    pub fn set_default_spec(&mut self, spec: VehicleSpec) {
        self.default_spec = spec;
    }

    pub fn listener(&self) -> &Listener {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut Listener {
        &mut self.listener
    }

    /// Host-mutable class table, consulted once per newly discovered id.
    pub fn class_map_mut(&mut self) -> &mut ClassMap {
        &mut self.class_map
    }

    pub fn vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.get(id)
    }

    /// Mutable vehicle access, e.g. to set a custom signal between ticks.
    pub fn vehicle_mut(&mut self, id: &str) -> Option<&mut Vehicle> {
        self.vehicles.get_mut(id)
    }

    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Run one tick against the authoritative simulation state.
    ///
    /// In order: listener pull, reconciliation (admit new ids, release ids
    /// that vanished since the previous tick), one [`Vehicle::step`] per
    /// tracked vehicle with fresh kinematics, listener push. A failing
    /// vehicle is silenced and recorded, never allowed to abort its
    /// siblings; all failures come back in one [`TickErrors`].
    pub fn step(
        &mut self,
        dt: f32,
        traffic: &dyn TrafficProvider,
        audio: &mut dyn AudioBackend,
    ) -> Result<(), TickErrors> {
        let mut failures = Vec::new();

        if let Err(err) = self.listener.update(traffic, dt) {
            failures.push(TickFailure {
                vehicle: "listener".to_string(),
                error: err.into(),
            });
        }

        let live = match traffic.vehicle_ids() {
            Ok(ids) => ids,
            Err(err) => {
                // Without the id set nothing else can proceed this tick.
                failures.push(TickFailure {
                    vehicle: "simulation".to_string(),
                    error: err.into(),
                });
                return Err(TickErrors { failures });
            }
        };
        let live_set: HashSet<&str> = live.iter().map(String::as_str).collect();

        for id in &live {
            if self.silent_ego && self.listener.tracked_vehicle() == Some(id.as_str()) {
                continue;
            }
            if self.vehicles.contains_key(id) {
                continue;
            }
            if let Err(err) = self.admit(id, traffic, audio) {
                warn!(vehicle = %id, %err, "failed to admit vehicle");
                failures.push(TickFailure {
                    vehicle: id.clone(),
                    error: err,
                });
            }
        }

        // Ids that stopped being reported are released now, one tick after
        // disappearance was observed, never speculatively.
        let departed: Vec<String> = self
            .vehicles
            .keys()
            .filter(|id| !live_set.contains(id.as_str()))
            .cloned()
            .collect();
        for id in &departed {
            if let Some(mut vehicle) = self.vehicles.remove(id) {
                let _ = vehicle.disable(audio);
                vehicle.release(audio);
            }
        }
        if !departed.is_empty() {
            debug!(
                released = departed.len(),
                remaining = self.vehicles.len(),
                "released departed vehicles"
            );
        }

        for (id, vehicle) in self.vehicles.iter_mut() {
            let state = match traffic.vehicle_state(id) {
                Ok(state) => state,
                Err(err) => {
                    vehicle.silence(audio);
                    failures.push(TickFailure {
                        vehicle: id.clone(),
                        error: err.into(),
                    });
                    continue;
                }
            };
            let pose_now = Pose::from_speed(state.position, state.speed, state.heading_deg);
            let pose_prev = vehicle.pose();
            if let Err(err) = vehicle.step(pose_now, pose_prev, dt, audio) {
                vehicle.silence(audio);
                failures.push(TickFailure {
                    vehicle: id.clone(),
                    error: err,
                });
            }
        }

        // Push last so the backend sees this tick's listener pose.
        if let Err(err) = self.listener.push(audio) {
            failures.push(TickFailure {
                vehicle: "listener".to_string(),
                error: err.into(),
            });
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(TickErrors { failures })
        }
    }

    fn admit(
        &mut self,
        id: &str,
        traffic: &dyn TrafficProvider,
        audio: &mut dyn AudioBackend,
    ) -> Result<(), StepError> {
        let class = traffic.vehicle_class(id)?;
        let state = traffic.vehicle_state(id)?;
        let spec = match self.class_map.get(&class) {
            Some(Some(spec)) => spec,
            Some(None) => {
                debug!(vehicle = %id, class = %class, "class is silent, not tracking");
                return Ok(());
            }
            None => {
                warn!(vehicle = %id, class = %class, "unknown vehicle class, using default spec");
                &self.default_spec
            }
        };
        let mut vehicle = spec.build(id, audio)?;
        // Seed the pose now: the first step's acceleration derives from it,
        // and a vehicle that appears already moving is not accelerating.
        vehicle.set_pose(Pose::from_speed(
            state.position,
            state.speed,
            state.heading_deg,
        ));
        if let Err(err) = vehicle.enable(audio) {
            vehicle.release(audio);
            return Err(err.into());
        }
        debug!(vehicle = %id, class = %class, "tracking new vehicle");
        self.vehicles.insert(id.to_string(), vehicle);
        Ok(())
    }
}
