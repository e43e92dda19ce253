//! Simulation settings
//!
//! Persisted as JSON next to the binary. Missing fields take their default
//! value, so older files keep loading.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to access settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What happens to elements leaving the bottom edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryMode {
    /// The edges are walls
    #[default]
    Boxed,
    /// Re-enter at the top row
    FallThrough,
    /// Vanish
    Erasing,
}

impl BoundaryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryMode::Boxed => "boxed",
            BoundaryMode::FallThrough => "fall-through",
            BoundaryMode::Erasing => "erasing",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "boxed" | "box" => Some(BoundaryMode::Boxed),
            "fall-through" | "fallthrough" | "wrap" => Some(BoundaryMode::FallThrough),
            "erasing" | "erase" => Some(BoundaryMode::Erasing),
            _ => None,
        }
    }
}

/// World extensions switched on for new games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionSettings {
    pub grass: bool,
    pub trees: bool,
    pub fish: bool,
    pub birds: bool,
    pub butterflies: bool,
    pub waypoints: bool,
}

impl Default for ExtensionSettings {
    fn default() -> Self {
        Self {
            grass: true,
            trees: true,
            fish: true,
            birds: true,
            butterflies: true,
            waypoints: true,
        }
    }
}

impl ExtensionSettings {
    /// Everything off; a bare sandbox
    pub fn none() -> Self {
        Self {
            grass: false,
            trees: false,
            fish: false,
            birds: false,
            butterflies: false,
            waypoints: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Grid ===
    pub width: usize,
    pub height: usize,
    /// Edge length of a scheduling chunk in cells
    pub chunk_size: usize,
    pub boundary: BoundaryMode,
    /// Initial random state; the same seed replays the same world
    pub seed: u32,

    // === Timing ===
    /// Physics ticks per second
    pub cycles_per_second: u32,
    /// Render callbacks per second
    pub frames_per_second: u32,
    /// Cap on ticks run to catch up after a stall
    pub max_substeps: u32,

    pub extensions: ExtensionSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 320,
            height: 200,
            chunk_size: consts::DEFAULT_CHUNK_SIZE,
            boundary: BoundaryMode::Boxed,
            seed: 0,

            cycles_per_second: consts::CYCLES_PER_SECOND,
            frames_per_second: consts::FRAMES_PER_SECOND,
            max_substeps: consts::MAX_SUBSTEPS,

            extensions: ExtensionSettings::default(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from `path`, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::info!("Using default settings ({err})");
                Self::default()
            }
        }
    }

    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Fixed tick length in seconds
    pub fn tick_duration(&self) -> f64 {
        1.0 / f64::from(self.cycles_per_second.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_mode_names() {
        for mode in [BoundaryMode::Boxed, BoundaryMode::FallThrough, BoundaryMode::Erasing] {
            assert_eq!(BoundaryMode::from_str(mode.as_str()), Some(mode));
        }
        assert_eq!(BoundaryMode::from_str("WRAP"), Some(BoundaryMode::FallThrough));
        assert_eq!(BoundaryMode::from_str("bouncy"), None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"seed": 7, "boundary": "erasing", "extensions": {"birds": false}}"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.boundary, BoundaryMode::Erasing);
        assert!(!settings.extensions.birds);
        assert!(settings.extensions.fish);
        assert_eq!(settings.chunk_size, consts::DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            width: 64,
            boundary: BoundaryMode::FallThrough,
            extensions: ExtensionSettings::none(),
            ..Settings::default()
        };
        let json = settings.to_json().unwrap();
        assert!(json.contains("\"fall-through\""));
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(Settings::from_json("{"), Err(SettingsError::Parse(_))));
        assert!(matches!(Settings::try_load("/nonexistent/sand-sim.json"), Err(SettingsError::Io(_))));
    }

    #[test]
    fn test_load_and_save() {
        let path = std::env::temp_dir().join(format!("sand-sim-settings-{}.json", std::process::id()));
        let settings = Settings {
            seed: 99,
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        fs::remove_file(&path).unwrap();

        assert_eq!(Settings::load(&path), Settings::default());
    }
}
