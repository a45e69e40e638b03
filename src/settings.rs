//! Visual preferences
//!
//! Persisted separately from the high score in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::platform;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Draw the full hand skeleton over the video
    pub show_skeleton: bool,
    /// Draw the decaying pointer trail
    pub show_trail: bool,
    /// Draw slice particle bursts
    pub particles: bool,
    /// Show the FPS counter in the HUD
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_skeleton: true,
            show_trail: true,
            particles: true,
            show_fps: false,
        }
    }
}

impl Settings {
    const STORAGE_KEY: &'static str = "hand_slice_settings";

    pub fn load() -> Self {
        if let Some(json) = platform::storage_get(Self::STORAGE_KEY)
            && let Ok(settings) = serde_json::from_str(&json)
        {
            log::info!("Loaded settings from LocalStorage");
            return settings;
        }
        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            platform::storage_set(Self::STORAGE_KEY, &json);
            log::info!("Settings saved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_overlays() {
        let settings = Settings::default();
        assert!(settings.show_skeleton);
        assert!(settings.show_trail);
        assert!(settings.particles);
        assert!(!settings.show_fps);
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.show_fps = true;
        settings.particles = false;
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert!(back.show_fps);
        assert!(!back.particles);
    }
}
