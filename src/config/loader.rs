//! Configuration file loading with precedence handling.

use super::options::{Options, OptionsOverrides};
use crate::surface::SelectorError;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "HANDORGEL_CONFIG";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// An `[options]` selector does not parse.
    #[error("Invalid selector in config: {0}")]
    InvalidSelector(#[from] SelectorError),
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, defaults are used.
/// Corresponds to `~/.config/handorgel/config.toml`:
///
/// ```toml
/// log_file_path = "/tmp/handorgel.log"
///
/// [options]
/// multi_selectable = false
/// transition_duration_ms = 0
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Controller option overrides.
    #[serde(default)]
    pub options: Option<OptionsOverrides>,
}

/// Resolved configuration after applying precedence rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Options the demo controller is built with.
    pub options: Options,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            log_file_path: default_log_path(),
            options: Options::default(),
        }
    }
}

/// Controller flags settable from the command line.
///
/// `Some(value)` replaces the configured option; `None` leaves it alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub multi_selectable: Option<bool>,
    pub collapsible: Option<bool>,
    pub carousel_focus: Option<bool>,
    pub aria_enabled: Option<bool>,
    pub keyboard_interaction: Option<bool>,
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/handorgel/handorgel.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("handorgel").join("handorgel.log")
    } else {
        PathBuf::from("handorgel.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/handorgel/config.toml` on Unix, appropriate path on
/// other platforms. Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("handorgel").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `HANDORGEL_CONFIG` environment variable
/// 3. Default path `~/.config/handorgel/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSelector`] if an element selector in
/// `[options]` does not parse.
pub fn merge_config(config_file: Option<ConfigFile>) -> Result<ResolvedConfig, ConfigError> {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return Ok(defaults);
    };

    let options = match config.options {
        Some(overrides) => defaults.options.with_overrides(overrides)?,
        None => defaults.options,
    };

    Ok(ResolvedConfig {
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        options,
    })
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    let options = &mut config.options;

    if let Some(multi_selectable) = cli.multi_selectable {
        options.multi_selectable = multi_selectable;
    }
    if let Some(collapsible) = cli.collapsible {
        options.collapsible = collapsible;
    }
    if let Some(carousel_focus) = cli.carousel_focus {
        options.carousel_focus = carousel_focus;
    }
    if let Some(aria_enabled) = cli.aria_enabled {
        options.aria_enabled = aria_enabled;
    }
    if let Some(keyboard_interaction) = cli.keyboard_interaction {
        options.keyboard_interaction = keyboard_interaction;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
