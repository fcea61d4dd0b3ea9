//! Uploader configuration.
//!
//! Settings are read from a JSON file. Every field is optional and falls
//! back to the values the freezy image endpoint expects.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "LOGO_UPLOADER_CONFIG";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "logo_uploader.json";

/// How the upload button reacts to the suffix field.
///
/// Submitting always checks the suffix length; this only controls whether
/// the button is greyed out ahead of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SuffixGatePolicy {
    /// Button always enabled, validation happens on submit
    #[default]
    AlwaysEnabled,
    /// Button disabled until the suffix reaches `min_suffix_len`
    MinLength,
}

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Filter string understood by `env_logger`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// A labeled drop target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Prefix of every file uploaded through this zone
    pub key: String,
    /// Heading shown above the zone, defaults to the key
    #[serde(default)]
    pub label: Option<String>,
}

impl ZoneConfig {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: Some(label.into()),
        }
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploaderConfig {
    /// Scheme, host and port of the server
    pub server_url: String,
    /// Path of the multipart upload endpoint
    pub upload_path: String,
    /// Path under which uploaded images are served
    pub image_path: String,
    pub zones: Vec<ZoneConfig>,
    pub suffix_gate: SuffixGatePolicy,
    pub min_suffix_len: usize,
    pub log_level: LogLevel,
    /// Hex color of normal status messages
    pub status_color: String,
    /// Hex color of error status messages
    pub error_color: String,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            upload_path: "/freezy/upload/image".to_string(),
            image_path: "/static/img".to_string(),
            zones: vec![
                ZoneConfig::new("alliance-station-logo", "Alliance Station Logo"),
                ZoneConfig::new("blinds-logo", "Blinds Logo"),
                ZoneConfig::new("game-logo", "Game Logo"),
            ],
            suffix_gate: SuffixGatePolicy::default(),
            min_suffix_len: 4,
            log_level: LogLevel::default(),
            status_color: "#9cf".to_string(),
            error_color: "#f66".to_string(),
        }
    }
}

impl UploaderConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Resolve the config the way the binary does: `$LOGO_UPLOADER_CONFIG`,
    /// then `./logo_uploader.json`, then the built-in defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::locate() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    fn locate() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        local.is_file().then_some(local)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_suffix_len == 0 {
            return Err(ConfigError::InvalidSuffixLength);
        }

        let mut seen = HashSet::new();
        for zone in &self.zones {
            if zone.key.trim().is_empty() {
                return Err(ConfigError::EmptyZoneKey);
            }
            if !seen.insert(zone.key.as_str()) {
                return Err(ConfigError::DuplicateZone(zone.key.clone()));
            }
        }

        match reqwest::Url::parse(&self.server_url) {
            Ok(url) if !url.cannot_be_a_base() => Ok(()),
            Ok(_) => Err(ConfigError::InvalidUrl {
                url: self.server_url.clone(),
                reason: "not a base URL".to_string(),
            }),
            Err(e) => Err(ConfigError::InvalidUrl {
                url: self.server_url.clone(),
                reason: e.to_string(),
            }),
        }
    }

    pub fn zone_keys(&self) -> Vec<String> {
        self.zones.iter().map(|zone| zone.key.clone()).collect()
    }
}
