//! Configuration file loading with precedence handling.
//!
//! Precedence, lowest to highest: defaults, config file, environment
//! variables, CLI arguments.

use super::viewer::{
    ViewerConfig, DEFAULT_MAX_SCALE, DEFAULT_PAGE_MIN_HEIGHT, DEFAULT_PROGRESS_SIZE,
};
use crate::model::LayoutMode;
use crate::pool::DEFAULT_POOL_CAPACITY;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Env var naming the config file.
pub const CONFIG_ENV: &str = "GALLERY_CONFIG";
/// Env var overriding the layout mode.
pub const LAYOUT_MODE_ENV: &str = "GALLERY_LAYOUT_MODE";
/// Env var overriding the demo page count.
pub const PAGE_COUNT_ENV: &str = "GALLERY_PAGE_COUNT";

/// Default number of pages the demo provider serves.
pub const DEFAULT_PAGE_COUNT: usize = 24;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file.
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// An override variable holds a value that does not parse.
    #[error("Invalid value for {var}: {reason}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional. Corresponds to `~/.config/gallery/config.toml`:
///
/// ```toml
/// layout_mode = "top-to-bottom"
/// pool_capacity = 8
/// scroll_zoom = true
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Initial layout mode.
    #[serde(default)]
    pub layout_mode: Option<LayoutMode>,

    /// Content views kept for reuse.
    #[serde(default)]
    pub pool_capacity: Option<usize>,

    /// Scroll item height floor in pixels.
    #[serde(default)]
    pub page_min_height: Option<f32>,

    /// Loading indicator side in pixels.
    #[serde(default)]
    pub progress_size: Option<f32>,

    /// Upper zoom bound.
    #[serde(default)]
    pub max_scale: Option<f32>,

    /// Zoom support in continuous mode.
    #[serde(default)]
    pub scroll_zoom: Option<bool>,

    /// Pages served by the demo provider.
    #[serde(default)]
    pub page_count: Option<usize>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Initial layout mode.
    pub layout_mode: LayoutMode,
    /// Content views kept for reuse.
    pub pool_capacity: usize,
    /// Scroll item height floor.
    pub page_min_height: f32,
    /// Loading indicator side.
    pub progress_size: f32,
    /// Upper zoom bound.
    pub max_scale: f32,
    /// Zoom support in continuous mode.
    pub scroll_zoom: bool,
    /// Pages served by the demo provider.
    pub page_count: usize,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            layout_mode: LayoutMode::default(),
            pool_capacity: DEFAULT_POOL_CAPACITY,
            page_min_height: DEFAULT_PAGE_MIN_HEIGHT,
            progress_size: DEFAULT_PROGRESS_SIZE,
            max_scale: DEFAULT_MAX_SCALE,
            scroll_zoom: false,
            page_count: DEFAULT_PAGE_COUNT,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// The engine-facing subset.
    pub fn viewer_config(&self) -> ViewerConfig {
        ViewerConfig {
            layout_mode: self.layout_mode,
            pool_capacity: self.pool_capacity,
            page_min_height: self.page_min_height,
            progress_size: self.progress_size,
            max_scale: self.max_scale,
            scroll_zoom: self.scroll_zoom,
            ..ViewerConfig::default()
        }
    }
}

/// Resolve default log file path.
///
/// `~/.local/state/gallery/gallery.log` on Linux, the platform state
/// directory elsewhere, or `gallery.log` in the working directory when none
/// exists.
pub fn default_log_path() -> PathBuf {
    match dirs::state_dir() {
        Some(state_dir) => state_dir.join("gallery").join("gallery.log"),
        None => PathBuf::from("gallery.log"),
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if the file doesn't exist.
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

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

/// Resolve default config file path, `None` without a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gallery").join("config.toml"))
}

/// Load the config file from the first location that applies: the explicit
/// `config_path` (CLI `--config`), then `GALLERY_CONFIG`, then the default
/// path.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed,
/// or if `GALLERY_CONFIG` is set but empty.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        if env_path.trim().is_empty() {
            return Err(ConfigError::InvalidPath(format!("{CONFIG_ENV} is empty")));
        }
        return load_config_file(PathBuf::from(env_path));
    }

    match default_config_path() {
        Some(default_path) => load_config_file(default_path),
        None => Ok(None),
    }
}

/// Merge config file into defaults.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        layout_mode: config.layout_mode.unwrap_or(defaults.layout_mode),
        pool_capacity: config.pool_capacity.unwrap_or(defaults.pool_capacity),
        page_min_height: config.page_min_height.unwrap_or(defaults.page_min_height),
        progress_size: config.progress_size.unwrap_or(defaults.progress_size),
        max_scale: config.max_scale.unwrap_or(defaults.max_scale),
        scroll_zoom: config.scroll_zoom.unwrap_or(defaults.scroll_zoom),
        page_count: config.page_count.unwrap_or(defaults.page_count),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply `GALLERY_LAYOUT_MODE` and `GALLERY_PAGE_COUNT`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnv`] when a set variable does not parse.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Ok(mode) = std::env::var(LAYOUT_MODE_ENV) {
        config.layout_mode = mode.parse().map_err(|e: crate::model::InvalidLayoutMode| {
            ConfigError::InvalidEnv {
                var: LAYOUT_MODE_ENV,
                reason: e.to_string(),
            }
        })?;
    }

    if let Ok(count) = std::env::var(PAGE_COUNT_ENV) {
        config.page_count =
            count
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| ConfigError::InvalidEnv {
                    var: PAGE_COUNT_ENV,
                    reason: e.to_string(),
                })?;
    }

    Ok(config)
}

/// Apply CLI argument overrides; only flags the user set are applied.
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    mode_override: Option<LayoutMode>,
    pages_override: Option<usize>,
) -> ResolvedConfig {
    if let Some(mode) = mode_override {
        config.layout_mode = mode;
    }

    if let Some(pages) = pages_override {
        config.page_count = pages;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
