//! Simulation settings
//!
//! Tuning is read from `settings.toml` next to the binary when present;
//! anything missing falls back to the built-in defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use skybound_core::TimeConfig;
use skybound_game::{CameraConfig, MovementConfig};
use tracing::{info, warn};

/// All simulation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSettings {
    #[serde(default)]
    pub movement: MovementConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub time: TimeConfig,
}

impl SimSettings {
    /// Load settings from `settings.toml`, or return defaults if missing
    /// or malformed
    pub fn load() -> Self {
        let path = Path::new("settings.toml");
        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }
}
