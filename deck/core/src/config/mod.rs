//! TOML Configuration File Support
//!
//! Centralized configuration loading for the deck, from an optional TOML file
//! at `~/.config/catdeck/deck.toml`.
//!
//! # Configuration Priority
//!
//! Values are applied with the following priority (highest first):
//! 1. Caller overrides ([`ConfigOverrides`])
//! 2. Environment variables (`CATDECK_*`)
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! base_url = "https://api.thecatapi.com/v1"
//! api_key = "live_xxx"
//! timeout_ms = 15000
//!
//! [pool]
//! page = 0
//! limit = 25
//! images_per_breed = 1
//! image_size = "med"
//!
//! [gesture]
//! threshold_ratio = 0.25
//! flick_duration_ms = 200
//! forced_duration_ms = 300
//! spring_duration_ms = 350
//! spring_easing = "ease_out_back"
//!
//! [vote]
//! sub_id = "device-1234"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::EasingFunction;
use crate::backend::DEFAULT_BASE_URL;
use crate::gesture::GestureConfig;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from a caller override
    Override,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Override => write!(f, "override"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[api]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiToml {
    /// Service root
    pub base_url: Option<String>,
    /// Value for the `x-api-key` header
    pub api_key: Option<String>,
    /// Per-request timeout in milliseconds
    pub timeout_ms: Option<u64>,
}

/// `[pool]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolToml {
    /// Breed listing page
    pub page: Option<u32>,
    /// Breeds per page
    pub limit: Option<u32>,
    /// Images requested per breed
    pub images_per_breed: Option<u32>,
    /// Image size bucket
    pub image_size: Option<String>,
}

/// `[gesture]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureToml {
    /// Commit threshold as a fraction of viewport width
    pub threshold_ratio: Option<f32>,
    /// Fly-off duration after a drag commit
    pub flick_duration_ms: Option<u32>,
    /// Fly-off duration after a button commit
    pub forced_duration_ms: Option<u32>,
    /// Spring-back duration
    pub spring_duration_ms: Option<u32>,
    /// Spring-back curve
    pub spring_easing: Option<EasingFunction>,
}

/// `[vote]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VoteToml {
    /// Subject id attached to every vote
    pub sub_id: Option<String>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckToml {
    /// Remote service section
    pub api: ApiToml,
    /// Candidate pool section
    pub pool: PoolToml,
    /// Gesture tuning section
    pub gesture: GestureToml,
    /// Vote section
    pub vote: VoteToml,
}

// =============================================================================
// Resolved Settings
// =============================================================================

/// Remote service settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiSettings {
    /// Service root
    pub base_url: String,
    /// API key, if any
    pub api_key: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Candidate pool settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolSettings {
    /// Breed listing page
    pub page: u32,
    /// Breeds per page
    pub limit: u32,
    /// Images requested per breed (the first one is used)
    pub images_per_breed: u32,
    /// Image size bucket
    pub image_size: String,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            page: 0,
            limit: 25,
            images_per_breed: 1,
            image_size: "med".to_string(),
        }
    }
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Centralized configuration for the deck
///
/// Use [`load_config`] to load with proper priority handling.
#[derive(Clone, Debug)]
pub struct DeckConfigFile {
    /// Remote service settings
    pub api: ApiSettings,

    /// Candidate pool settings
    pub pool: PoolSettings,

    /// Gesture tuning (viewport width is filled in at runtime)
    pub gesture: GestureConfig,

    /// Subject id attached to votes
    pub sub_id: Option<String>,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for DeckConfigFile {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            pool: PoolSettings::default(),
            gesture: GestureConfig::default(),
            sub_id: None,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl DeckConfigFile {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ratio = self.gesture.threshold_ratio;
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "gesture.threshold_ratio must be between 0 and 1, got {ratio}"
            )));
        }
        if self.pool.limit == 0 {
            return Err(ConfigError::ValidationError(
                "pool.limit must be greater than 0".to_string(),
            ));
        }
        if self.pool.images_per_breed == 0 {
            return Err(ConfigError::ValidationError(
                "pool.images_per_breed must be greater than 0".to_string(),
            ));
        }
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "api.base_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/catdeck/deck.toml` or
/// `~/.config/catdeck/deck.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("catdeck").join("deck.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or the
/// merged values fail validation. A missing config file is not an error.
pub fn load_config() -> Result<DeckConfigFile, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Arguments
///
/// * `path` - Optional path to the configuration file. If `None`, only defaults
///   and environment variables are used.
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed,
/// or the merged values fail validation.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<DeckConfigFile, ConfigError> {
    let mut config = DeckConfigFile::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: DeckToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config);
    config.validate()?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut DeckConfigFile, toml: &DeckToml) {
    // Remote service
    if let Some(ref url) = toml.api.base_url {
        config.api.base_url.clone_from(url);
    }
    if toml.api.api_key.is_some() {
        config.api.api_key.clone_from(&toml.api.api_key);
    }
    if let Some(ms) = toml.api.timeout_ms {
        config.api.timeout = Duration::from_millis(ms);
    }

    // Pool
    if let Some(page) = toml.pool.page {
        config.pool.page = page;
    }
    if let Some(limit) = toml.pool.limit {
        config.pool.limit = limit;
    }
    if let Some(n) = toml.pool.images_per_breed {
        config.pool.images_per_breed = n;
    }
    if let Some(ref size) = toml.pool.image_size {
        config.pool.image_size.clone_from(size);
    }

    // Gesture
    if let Some(ratio) = toml.gesture.threshold_ratio {
        config.gesture.threshold_ratio = ratio;
    }
    if let Some(ms) = toml.gesture.flick_duration_ms {
        config.gesture.flick_duration_ms = ms;
    }
    if let Some(ms) = toml.gesture.forced_duration_ms {
        config.gesture.forced_duration_ms = ms;
    }
    if let Some(ms) = toml.gesture.spring_duration_ms {
        config.gesture.spring_duration_ms = ms;
    }
    if let Some(easing) = toml.gesture.spring_easing {
        config.gesture.spring_easing = easing;
    }

    // Vote
    if toml.vote.sub_id.is_some() {
        config.sub_id.clone_from(&toml.vote.sub_id);
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut DeckConfigFile) {
    if let Ok(url) = std::env::var("CATDECK_BASE_URL") {
        config.api.base_url = url;
        config.source = ConfigSource::Env;
    }
    if let Ok(key) = std::env::var("CATDECK_API_KEY") {
        config.api.api_key = Some(key);
        config.source = ConfigSource::Env;
    }
    if let Ok(timeout) = std::env::var("CATDECK_TIMEOUT_MS") {
        if let Ok(ms) = timeout.parse::<u64>() {
            config.api.timeout = Duration::from_millis(ms);
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(page) = std::env::var("CATDECK_PAGE") {
        if let Ok(p) = page.parse::<u32>() {
            config.pool.page = p;
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(limit) = std::env::var("CATDECK_PAGE_LIMIT") {
        if let Ok(l) = limit.parse::<u32>() {
            config.pool.limit = l;
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(size) = std::env::var("CATDECK_IMAGE_SIZE") {
        config.pool.image_size = size;
        config.source = ConfigSource::Env;
    }
    if let Ok(ratio) = std::env::var("CATDECK_SWIPE_THRESHOLD") {
        if let Ok(r) = ratio.parse::<f32>() {
            config.gesture.threshold_ratio = r;
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(sub_id) = std::env::var("CATDECK_SUB_ID") {
        config.sub_id = Some(sub_id);
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// Override Support
// =============================================================================

/// Builder for applying caller overrides to configuration
///
/// Use this after [`load_config`], e.g. with values the host app knows
/// (viewport width, a per-user subject id).
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// API key override
    pub api_key: Option<String>,

    /// Base URL override
    pub base_url: Option<String>,

    /// Subject id override
    pub sub_id: Option<String>,

    /// Breeds per page override
    pub limit: Option<u32>,

    /// Viewport width for gesture thresholds
    pub viewport_width: Option<f32>,
}

impl ConfigOverrides {
    /// Create an empty override set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Override the subject id
    #[must_use]
    pub fn with_sub_id(mut self, sub_id: impl Into<String>) -> Self {
        self.sub_id = Some(sub_id.into());
        self
    }

    /// Override breeds per page
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the viewport width
    #[must_use]
    pub fn with_viewport_width(mut self, width: f32) -> Self {
        self.viewport_width = Some(width);
        self
    }

    /// Apply overrides to configuration
    pub fn apply(&self, config: &mut DeckConfigFile) {
        let mut applied = false;

        if let Some(ref key) = self.api_key {
            config.api.api_key = Some(key.clone());
            applied = true;
        }
        if let Some(ref url) = self.base_url {
            config.api.base_url.clone_from(url);
            applied = true;
        }
        if let Some(ref sub_id) = self.sub_id {
            config.sub_id = Some(sub_id.clone());
            applied = true;
        }
        if let Some(limit) = self.limit {
            config.pool.limit = limit;
            applied = true;
        }
        if let Some(width) = self.viewport_width {
            config.gesture.viewport_width = width.max(1.0);
            applied = true;
        }

        if applied {
            config.source = ConfigSource::Override;
        }
    }
}
