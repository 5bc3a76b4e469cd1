//! Player settings and physics tuning
//!
//! Persisted in LocalStorage on the web; loaded from a JSON file on native.

use serde::{Deserialize, Serialize};

use crate::autoplay::AutoPlaySettings;
use crate::consts::*;
use crate::error::PlinkoError;
use crate::sim::{BoardConfig, PhysicsTuning, RiskLevel};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Multiplier table variance
    pub risk: RiskLevel,
    /// Peg rows (8, 12 or 16)
    pub rows: u8,
    /// Last bet amount
    pub bet: f64,

    // === Board ===
    /// Canvas width in pixels
    pub width: f32,
    /// Canvas height in pixels
    pub height: f32,

    // === Physics ===
    pub tuning: PhysicsTuning,

    // === Auto-play ===
    pub autoplay: AutoPlaySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            risk: RiskLevel::High,
            rows: 16,
            bet: 0.0,
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            tuning: PhysicsTuning::default(),
            autoplay: AutoPlaySettings::default(),
        }
    }
}

impl Settings {
    /// Board configuration described by these settings
    pub fn board_config(&self) -> Result<BoardConfig, PlinkoError> {
        BoardConfig::new(self.risk, self.rows, self.width, self.height)
    }

    /// Parse settings from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, PlinkoError> {
        serde_json::from_str(json)
            .map_err(|e| PlinkoError::InvalidConfiguration(format!("settings: {e}")))
    }

    pub fn to_json(&self) -> Result<String, PlinkoError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PlinkoError::InvalidConfiguration(format!("settings: {e}")))
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "plinko_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from a JSON file, falling back to defaults if it is missing
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Self, PlinkoError> {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let settings = Self::from_json(&json)?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(PlinkoError::InvalidConfiguration(format!(
                "reading {}: {e}",
                path.display()
            ))),
        }
    }
}
