//! Game settings and preferences
//!
//! Read once at startup from an inline JSON block in the page; never written
//! back.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_PLAYER_NAME;
use crate::error::{GameError, Result};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Pause the game when the window loses focus
    pub pause_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (no pulsing outlines or banners)
    pub reduced_motion: bool,

    // === Gameplay ===
    /// Keep spawning obstacles and power-ups while paused.
    ///
    /// Off freezes the field while paused, as the browser game always did.
    /// On lets the spawn timers keep feeding a paused field.
    pub spawn_while_paused: bool,
    /// Name used when the player leaves the name field blank
    pub default_player_name: String,
    /// Fixed RNG seed (wall clock when unset)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Audio
            master_volume: 0.8,
            music_volume: 0.7,
            sfx_volume: 1.0,
            pause_on_blur: true,

            // Accessibility
            reduced_motion: false,

            // Gameplay
            spawn_while_paused: false,
            default_player_name: DEFAULT_PLAYER_NAME.to_string(),
            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| GameError::Settings(e.to_string()))
    }

    pub fn effective_music_volume(&self) -> f32 {
        (self.master_volume * self.music_volume).clamp(0.0, 1.0)
    }

    pub fn effective_sfx_volume(&self) -> f32 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    /// Pulsing outlines and banners (off with reduced motion)
    pub fn pulses_enabled(&self) -> bool {
        !self.reduced_motion
    }

    /// Trimmed player name, falling back to the default when blank
    pub fn player_name(&self, entered: &str) -> String {
        let entered = entered.trim();
        if !entered.is_empty() {
            return entered.to_string();
        }
        let fallback = self.default_player_name.trim();
        if fallback.is_empty() {
            DEFAULT_PLAYER_NAME.to_string()
        } else {
            fallback.to_string()
        }
    }

    /// Element holding the settings JSON
    #[cfg(target_arch = "wasm32")]
    const ELEMENT_ID: &'static str = "game-settings";

    /// Load settings from the page's settings block (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        if let Some(json) = json {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from #{}", Self::ELEMENT_ID);
                    return settings;
                }
                Err(e) => log::warn!("{e}; using defaults"),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
