//! CLI argument definitions for the deskpilot binary.
//!
//! Uses `clap` with derive macros. Priority resolution:
//! CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// deskpilot — execute a JSON action plan against the desktop under a
/// safety policy.
#[derive(Parser, Debug)]
#[command(name = "deskpilot", version, about)]
pub struct CliArgs {
    /// Plan to execute: inline JSON text, or a path to a JSON file.
    /// A path that exists on disk wins over JSON parsing.
    pub plan: String,

    /// Dry-run: record intended steps without executing anything.
    #[arg(long = "dry")]
    pub dry: bool,

    /// Path to a safety config JSON file (allow-lists).
    #[arg(short = 's', long = "safety")]
    pub safety: Option<PathBuf>,

    /// Path to the runtime configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the runtime config path.
    ///
    /// Priority: --config flag > DESKPILOT_CONFIG env var > platform
    /// default (~/.deskpilot/config.toml).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("DESKPILOT_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    /// Returns `None` if not overridden.
    pub fn resolve_log_level(&self) -> Option<String> {
        self.log_level.clone()
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".deskpilot").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".deskpilot").join("config.toml");
    }
    PathBuf::from("config.toml")
}
