//! Configuration file loading with precedence handling.
//!
//! Precedence is defaults → config file → CLI flags; resolution happens in
//! `bandview`'s startup code, which folds CLI overrides into the
//! [`ResolvedConfig`] produced here.

use crate::band::{BandStyle, OpacitySource, Rgb};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission
    /// issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional; unspecified fields fall back to hardcoded
/// defaults. Corresponds to `~/.config/lineband/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Band tint, e.g. `tint = { r = 194, g = 252, b = 233 }`.
    #[serde(default)]
    pub tint: Option<Rgb>,

    /// Fixed band alpha, 0-255.
    #[serde(default)]
    pub opacity: Option<u8>,

    /// Derive the band alpha from the view background at attach time
    /// instead of using the fixed `opacity` value.
    #[serde(default)]
    pub opacity_from_viewport: Option<bool>,

    /// Base background color the demo host composites bands over.
    #[serde(default)]
    pub base_background: Option<Rgb>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Band style handed to the renderer.
    pub style: BandStyle,
    /// Base background for alpha compositing in the demo host.
    pub base_background: Rgb,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            style: BandStyle {
                tint: Rgb::default(),
                opacity: OpacitySource::Fixed(crate::band::brush::DEFAULT_OPACITY),
            },
            base_background: Rgb::new(0, 0, 0),
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Merge a config file over the defaults.
    pub fn from_file(file: &ConfigFile) -> Self {
        let defaults = Self::default();
        let opacity = match (file.opacity_from_viewport, file.opacity) {
            (Some(true), _) => OpacitySource::FromViewport,
            (_, Some(alpha)) => OpacitySource::Fixed(alpha),
            _ => defaults.style.opacity,
        };
        Self {
            style: BandStyle {
                tint: file.tint.unwrap_or(defaults.style.tint),
                opacity,
            },
            base_background: file.base_background.unwrap_or(defaults.base_background),
            log_file_path: file
                .log_file_path
                .clone()
                .unwrap_or(defaults.log_file_path),
        }
    }
}

/// Default log file location: `<cache dir>/lineband/bandview.log`, falling
/// back to the current directory when no cache dir exists.
pub fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lineband")
        .join("bandview.log")
}

/// Default config file location: `<config dir>/lineband/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lineband").join("config.toml"))
}

/// Load and parse a config file.
///
/// `explicit_path` (from the CLI) takes priority; otherwise the default
/// location is probed. A missing file at the default location is not an
/// error (returns `Ok(None)`); a missing file at an explicit path is.
pub fn load_config_file(explicit_path: Option<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let (path, required) = match explicit_path {
        Some(path) => (path, true),
        None => match default_config_path() {
            Some(path) => (path, false),
            None => return Ok(None),
        },
    };

    if !required && !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|err| ConfigError::ReadError {
        path: path.clone(),
        reason: err.to_string(),
    })?;

    let file = toml::from_str(&contents).map_err(|err| ConfigError::ParseError {
        path,
        reason: err.to_string(),
    })?;

    Ok(Some(file))
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod loader_tests;
