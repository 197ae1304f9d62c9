//! Safety and runtime configuration.
//!
//! Two files, two formats, two lifecycles. The safety allow-lists come from
//! a JSON file (the format plan producers already speak) and are loaded once
//! per run, never written back. Runtime tuning lives in a TOML config at
//! `~/.deskpilot/config.toml` with per-section defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;

/// Allow-list policy for effectful actions.
///
/// `None` for a list means "no restriction for that category"; an empty
/// list denies everything in the category. The distinction is load-bearing
/// and must survive serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    /// Apps that `open_app` may launch. Absent = any app.
    pub allow_apps: Option<Vec<String>>,
    /// First tokens that `run_command` may spawn. Absent = any command.
    pub allow_commands: Option<Vec<String>>,
    /// URL prefixes that `open_browser` accepts. Absent = any URL.
    pub allow_urls: Option<Vec<String>>,
    /// Require `confirm: true` on each `delete_file` step.
    pub destructive_confirm: bool,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            allow_apps: None,
            allow_commands: None,
            allow_urls: Some(vec![
                "http://".to_string(),
                "https://".to_string(),
                "file://".to_string(),
            ]),
            destructive_confirm: true,
        }
    }
}

impl SafetyConfig {
    /// Load a safety config from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: SafetyConfig = serde_json::from_str(&content)?;
        info!("Safety config loaded from {}", path.display());
        Ok(config)
    }
}

/// Top-level runtime configuration for the deskpilot application.
///
/// Loaded from `~/.deskpilot/config.toml` by default; every section falls
/// back to its defaults when missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PilotConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl PilotConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: PilotConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration, falling back to defaults if the file does not
    /// exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Interpreter tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Poll interval for perception-gated actions, in milliseconds.
    pub poll_interval_ms: u64,
    /// Match confidence used by `image_visible` conditions when the
    /// condition text does not carry its own.
    pub condition_image_confidence: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 250,
            condition_image_confidence: 0.8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    // ---- SafetyConfig ----

    #[test]
    fn test_safety_defaults() {
        let safety = SafetyConfig::default();
        assert!(safety.allow_apps.is_none());
        assert!(safety.allow_commands.is_none());
        assert_eq!(
            safety.allow_urls,
            Some(vec![
                "http://".to_string(),
                "https://".to_string(),
                "file://".to_string()
            ])
        );
        assert!(safety.destructive_confirm);
    }

    #[test]
    fn test_safety_load_full() {
        let file = temp_file(
            r#"{
                "allow_apps": ["notepad.exe", "code"],
                "allow_commands": ["git", "ls"],
                "allow_urls": ["https://"],
                "destructive_confirm": false
            }"#,
        );
        let safety = SafetyConfig::load(file.path()).unwrap();
        assert_eq!(
            safety.allow_apps,
            Some(vec!["notepad.exe".to_string(), "code".to_string()])
        );
        assert_eq!(
            safety.allow_commands,
            Some(vec!["git".to_string(), "ls".to_string()])
        );
        assert_eq!(safety.allow_urls, Some(vec!["https://".to_string()]));
        assert!(!safety.destructive_confirm);
    }

    #[test]
    fn test_safety_load_partial_uses_defaults() {
        let file = temp_file(r#"{"allow_apps": ["code"]}"#);
        let safety = SafetyConfig::load(file.path()).unwrap();
        assert_eq!(safety.allow_apps, Some(vec!["code".to_string()]));
        // Unmentioned fields keep their defaults.
        assert!(safety.allow_commands.is_none());
        assert!(safety.destructive_confirm);
    }

    #[test]
    fn test_safety_absent_vs_empty_survives_round_trip() {
        // null and [] must deserialize to different values.
        let absent: SafetyConfig =
            serde_json::from_str(r#"{"allow_apps": null}"#).unwrap();
        assert!(absent.allow_apps.is_none());

        let empty: SafetyConfig =
            serde_json::from_str(r#"{"allow_apps": []}"#).unwrap();
        assert_eq!(empty.allow_apps, Some(vec![]));

        let json = serde_json::to_string(&empty).unwrap();
        let back: SafetyConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.allow_apps, Some(vec![]));
    }

    #[test]
    fn test_safety_load_missing_file() {
        let result = SafetyConfig::load(Path::new("/nonexistent/safety.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_safety_load_invalid_json() {
        let file = temp_file("not json at all");
        let result = SafetyConfig::load(file.path());
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    // ---- PilotConfig ----

    #[test]
    fn test_pilot_defaults() {
        let config = PilotConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.engine.poll_interval_ms, 250);
        assert!((config.engine.condition_image_confidence - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pilot_load_valid() {
        let file = temp_file(
            r#"
[general]
log_level = "debug"

[engine]
poll_interval_ms = 100
condition_image_confidence = 0.9
"#,
        );
        let config = PilotConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.engine.poll_interval_ms, 100);
        assert!((config.engine.condition_image_confidence - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pilot_load_partial_uses_defaults() {
        let file = temp_file("[general]\nlog_level = \"warn\"\n");
        let config = PilotConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.engine.poll_interval_ms, 250);
    }

    #[test]
    fn test_pilot_load_or_default_missing_file() {
        let config = PilotConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_pilot_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let mut config = PilotConfig::default();
        config.engine.poll_interval_ms = 50;
        config.save(&path).unwrap();

        let reloaded = PilotConfig::load(&path).unwrap();
        assert_eq!(reloaded.engine.poll_interval_ms, 50);
        assert_eq!(reloaded.general.log_level, "info");
    }

    #[test]
    fn test_pilot_empty_toml_uses_all_defaults() {
        let file = temp_file("");
        let config = PilotConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.engine.poll_interval_ms, 250);
    }
}
