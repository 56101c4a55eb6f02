//! TOML engine configuration
//!
//! Every field has a default, so an empty file is a valid configuration:
//! ```toml
//! [window]
//! title = "EasyEngine"
//! width = 1280
//! height = 720
//!
//! [timing]
//! target_fps = 60
//!
//! [input]
//! gamepad_slots = 1
//! ```

use easy_core::{EngineError, Result};
use easy_input::MAX_GAMEPADS;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window: WindowSettings,
    pub timing: TimingSettings,
    pub input: InputSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "EasyEngine".into(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    pub target_fps: u32,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self { target_fps: 60 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Number of gamepad slots to create, starting at slot 0
    pub gamepad_slots: u8,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self { gamepad_slots: 1 }
    }
}

impl EngineConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EngineError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timing.target_fps == 0 {
            return Err(EngineError::Config(
                "timing.target_fps must be greater than zero".into(),
            ));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(EngineError::Config(format!(
                "window size {}x{} has a zero dimension",
                self.window.width, self.window.height
            )));
        }
        if self.input.gamepad_slots > MAX_GAMEPADS {
            return Err(EngineError::Config(format!(
                "input.gamepad_slots is {} but at most {} are supported",
                self.input.gamepad_slots, MAX_GAMEPADS
            )));
        }
        Ok(())
    }

    /// Frame budget in whole microseconds, rounded to nearest
    pub fn micros_per_frame(&self) -> u64 {
        let fps = u64::from(self.timing.target_fps.max(1));
        (1_000_000 + fps / 2) / fps
    }
}
