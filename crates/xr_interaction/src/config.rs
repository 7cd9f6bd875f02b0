//! Interaction tuning.
//!
//! Every field has a default, so a JSON file only needs to name the values
//! it overrides:
//!
//! ```json
//! { "move_speed": 0.05, "hover_pulse": { "intensity": 0.3, "duration_ms": 30 } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tick rate must be a positive finite number, got {0}")]
    InvalidTickRate(f64),
}

/// A haptic pulse request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PulseConfig {
    /// Normalised intensity in `0.0..=1.0`.
    pub intensity: f32,
    pub duration_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InteractionConfig {
    /// Planar locomotion distance per frame at full stick deflection.
    pub move_speed: f32,
    /// Snap-free turn rate in degrees per second.
    pub turn_speed_degrees: f32,
    /// Turn stick values at or below this magnitude are ignored.
    pub turn_deadzone: f32,
    /// Carousel scroll distance per unit of stick deflection per frame.
    pub scroll_factor: f32,
    pub hover_pulse: PulseConfig,
    pub press_pulse: PulseConfig,
    /// Pointer ray colour while an action is held.
    pub active_ray_color: u32,
    pub neutral_ray_color: u32,
    pub teleport_highlight_color: u32,
    pub teleport_neutral_color: u32,
    pub key_hover_scale: f32,
    /// Ray length restored when the pointer hits nothing.
    pub default_ray_length: f32,
    /// Label of the key that submits instead of typing.
    pub enter_label: String,
    /// BCP 47 language tag for spoken cues.
    pub speech_lang: String,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.025,
            turn_speed_degrees: 90.0,
            turn_deadzone: 0.1,
            scroll_factor: 0.1,
            hover_pulse: PulseConfig {
                intensity: 0.2,
                duration_ms: 40,
            },
            press_pulse: PulseConfig {
                intensity: 0.5,
                duration_ms: 80,
            },
            active_ray_color: 0x22d3ee,
            neutral_ray_color: 0xffffff,
            teleport_highlight_color: 0x00ff00,
            teleport_neutral_color: 0xd6d4d4,
            key_hover_scale: 1.2,
            default_ray_length: 1.0,
            enter_label: "enter".to_string(),
            speech_lang: "id-ID".to_string(),
        }
    }
}

impl InteractionConfig {
    /// Parse a JSON document, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown keys.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if it is not a valid config.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Turn rate in radians per second.
    #[must_use]
    pub fn turn_speed(&self) -> f32 {
        self.turn_speed_degrees.to_radians()
    }
}
