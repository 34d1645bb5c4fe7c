//! User settings
//!
//! Persisted in LocalStorage on the web; read from a JSON file named by
//! `SLOPE_ROLLER_SETTINGS` on native. Simulation state is never stored here.

use serde::{Deserialize, Serialize};

use crate::consts::SHOUT_FORCE;
use crate::sim::Mode;
use crate::voice::{KeywordMatcher, RecognizerConfig, RecognizerSetup};

/// Settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Mode used when none is requested
    pub default_mode: Mode,

    // === Voice ===
    /// Force applied by one recognized shout
    pub shout_force: f32,
    /// Keywords recognized in addition to the built-in ones
    pub extra_keywords: Vec<String>,
    /// Recognizer configuration handed to the platform
    pub recognizer: RecognizerConfig,

    // === Input ===
    /// Let Space/Enter stand in for a shout
    pub keyboard_shout: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_mode: Mode::Flat,
            shout_force: SHOUT_FORCE,
            extra_keywords: Vec::new(),
            recognizer: RecognizerConfig::default(),
            keyboard_shout: true,
        }
    }
}

impl Settings {
    /// Keyword matcher built from the built-in list plus extras
    pub fn keyword_matcher(&self) -> KeywordMatcher {
        KeywordMatcher::with_extra(&self.extra_keywords)
    }

    /// Recognizer configuration plus the keywords it should listen for
    pub fn recognizer_setup(&self) -> RecognizerSetup {
        RecognizerSetup::new(&self.recognizer, &self.keyword_matcher())
    }

    /// Shout force, falling back to the default if the stored one is unusable
    pub fn effective_shout_force(&self) -> f32 {
        if self.shout_force.is_finite() && self.shout_force > 0.0 {
            self.shout_force
        } else {
            SHOUT_FORCE
        }
    }

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "slope_roller_settings";

    /// Environment variable naming the native settings file
    pub const ENV_PATH: &'static str = "SLOPE_ROLLER_SETTINGS";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Stored settings unreadable ({}), using defaults", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Load settings from the file named by `SLOPE_ROLLER_SETTINGS`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match std::env::var(Self::ENV_PATH) {
            Ok(path) => Self::load_file(std::path::Path::new(&path)),
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from a JSON file, falling back to defaults on any error
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Cannot read settings {}: {}; using defaults", path.display(), e);
                return Self::default();
            }
        };
        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let s = Settings::from_json(r#"{ "default_mode": "Slope", "extra_keywords": ["go"] }"#)
            .unwrap();
        assert_eq!(s.default_mode, Mode::Slope);
        assert_eq!(s.shout_force, SHOUT_FORCE);
        assert_eq!(s.recognizer, RecognizerConfig::default());
        assert!(s.keyword_matcher().matches("let's go"));
    }

    #[test]
    fn test_json_round_trip() {
        let mut s = Settings::default();
        s.shout_force = 120.0;
        s.keyboard_shout = false;
        let back = Settings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_invalid_shout_force_falls_back() {
        let mut s = Settings::default();
        s.shout_force = -1.0;
        assert_eq!(s.effective_shout_force(), SHOUT_FORCE);
    }

    #[test]
    fn test_recognizer_setup_follows_settings() {
        let s = Settings::from_json(
            r#"{ "extra_keywords": ["go"], "recognizer": { "max_results": 5, "free_form": false } }"#,
        )
        .unwrap();
        let setup = s.recognizer_setup();
        assert_eq!(setup.language, "zh-TW");
        assert_eq!(setup.max_results, 5);
        assert!(!setup.free_form);
        assert!(setup.grammar.unwrap().ends_with("| go ;"));
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(Settings::from_json("{ not json").is_err());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_missing_file_uses_defaults() {
        let s = Settings::load_file(std::path::Path::new("/nonexistent/slope-roller.json"));
        assert_eq!(s, Settings::default());
    }
}
