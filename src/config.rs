//! TOML-loadable vehicle profile library.
//!
//! Lets a host override or extend the default class table from a file:
//!
//! ```toml
//! [classes.passenger]
//! sounds = [
//!     { asset = "assets/tires.wav", signal = "speed", curve = [[0.0, 0.0], [28.0, 1.0]], base_gain = 2.0 },
//! ]
//!
//! [classes.tram]
//! silent = true
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::profiles::{ClassMap, VehicleSpec, default_class_map};

/// One class entry: either explicitly silent or a full spec.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassProfile {
    #[serde(default)]
    pub silent: bool,
    #[serde(flatten)]
    pub spec: VehicleSpec,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileLibrary {
    #[serde(default)]
    pub classes: HashMap<String, ClassProfile>,
}

impl ProfileLibrary {
    /// Parse and validate. Curve errors surface here, never inside the tick
    /// loop.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let library: ProfileLibrary = toml::from_str(text)?;
        library.validate()?;
        Ok(library)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for profile in self.classes.values() {
            if !profile.silent {
                profile.spec.validate()?;
            }
        }
        Ok(())
    }

    /// The default class table with this library's entries merged over it.
    pub fn class_map(&self) -> ClassMap {
        let mut map = default_class_map();
        for (class, profile) in &self.classes {
            let entry = if profile.silent {
                None
            } else {
                Some(profile.spec.clone())
            };
            map.insert(class.clone(), entry);
        }
        map
    }
}
