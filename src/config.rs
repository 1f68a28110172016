//! User settings, stored as JSON in the platform config directory

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::instrument::{find_preset, presets, Preset};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Id of the MIDI input port whose messages are played
    pub active_input: Option<String>,
    pub instrument: String,
    pub preset: String,
    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
    /// Capacity of the MIDI action queue
    pub queue_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            active_input: None,
            instrument: "Synth".to_string(),
            preset: "Default".to_string(),
            log_level: "info".to_string(),
            queue_capacity: 256,
        }
    }
}

impl AppConfig {
    /// The configured preset, or the instrument's first preset if the name
    /// is unknown. `None` only for an unknown instrument.
    pub fn selected_preset(&self) -> Option<&'static Preset> {
        find_preset(&self.instrument, &self.preset).or_else(|| {
            log::warn!(
                "Preset {:?} not found for {}, using default",
                self.preset,
                self.instrument
            );
            presets(&self.instrument).first()
        })
    }
}

pub fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("synthkeys")
        .join("config.json")
}

/// Load settings from the default location
pub fn load_config() -> Result<AppConfig, String> {
    load_config_from(&get_config_path())
}

/// Load settings, falling back to defaults when the file doesn't exist
pub fn load_config_from(path: &Path) -> Result<AppConfig, String> {
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read config: {}", e))?;
    serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))
}

pub fn save_config(config: &AppConfig) -> Result<(), String> {
    save_config_to(config, &get_config_path())
}

pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("Failed to create config dir: {}", e))?;
    }

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, content).map_err(|e| format!("Failed to write config: {}", e))?;

    log::info!("Saved config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("synthkeys-test-{}-{}", std::process::id(), name))
            .join("config.json")
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = load_config_from(&temp_path("missing")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("roundtrip");
        let config = AppConfig {
            active_input: Some("hw:1,0,0".to_string()),
            instrument: "MonoSynth".to_string(),
            preset: "Piano".to_string(),
            ..AppConfig::default()
        };

        save_config_to(&config, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), config);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_partial_and_malformed_files() {
        let path = temp_path("partial");
        fs::create_dir_all(path.parent().unwrap()).unwrap();

        fs::write(&path, r#"{ "instrument": "FMSynth" }"#).unwrap();
        let config = load_config_from(&path).unwrap();
        assert_eq!(config.instrument, "FMSynth");
        assert_eq!(config.queue_capacity, 256);

        fs::write(&path, "not json").unwrap();
        assert!(load_config_from(&path).is_err());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_selected_preset_fallback() {
        let mut config = AppConfig {
            instrument: "Synth".to_string(),
            preset: "Steelpan".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.selected_preset().unwrap().name, "Steelpan");

        config.preset = "Tuba".to_string();
        assert_eq!(config.selected_preset().unwrap().name, "Default");

        config.instrument = "Tuba".to_string();
        assert!(config.selected_preset().is_none());
    }
}
