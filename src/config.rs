//! Configuration module for chatfmt.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use tracing::{error, info, warn};

use crate::Result;

/// Configuration file shipped with the crate, written out when none exists.
pub const DEFAULT_CONFIG: &str = include_str!("../resources/config.toml");

/// Default chat format used when no group format applies.
pub const DEFAULT_CHAT_FORMAT: &str = "&7%player%&f: %message%";

/// Environment variable overriding `chat.enabled`.
pub const ENV_CHAT_ENABLED: &str = "CHATFMT_CHAT_ENABLED";

/// Chat formatting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Whether chat formatting is registered with the host.
    #[serde(default = "default_chat_enabled")]
    pub enabled: bool,
    /// Format used when the sender matches no configured group.
    #[serde(rename = "fallback-format", default = "default_fallback_format")]
    pub fallback_format: String,
    /// Group formats in priority order, keyed by lower-cased group name.
    #[serde(default, deserialize_with = "deserialize_formats")]
    pub formats: IndexMap<String, String>,
}

fn default_chat_enabled() -> bool {
    true
}

fn default_fallback_format() -> String {
    DEFAULT_CHAT_FORMAT.to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            enabled: default_chat_enabled(),
            fallback_format: default_fallback_format(),
            formats: IndexMap::new(),
        }
    }
}

/// Reads `[chat.formats]` in file order, lower-casing group names.
///
/// Entries whose value is not a string are skipped with a warning instead of
/// rejecting the whole file.
fn deserialize_formats<'de, D>(
    deserializer: D,
) -> std::result::Result<IndexMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: IndexMap<String, toml::Value> = IndexMap::deserialize(deserializer)?;
    let mut formats = IndexMap::with_capacity(raw.len());

    for (group, value) in raw {
        match value {
            toml::Value::String(format) => {
                formats.insert(group.to_lowercase(), format);
            }
            other => {
                warn!(
                    group = %group,
                    kind = other.type_str(),
                    "Ignoring chat format that is not a string"
                );
            }
        }
    }

    Ok(formats)
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/chatfmt.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Chat formatting configuration.
    #[serde(default)]
    pub chat: ChatConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration, recovering to defaults on any failure.
    ///
    /// A missing file is first created from [`DEFAULT_CONFIG`]. Read and parse
    /// errors are logged and the default configuration is returned, so callers
    /// always receive usable values.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        match Self::create_if_missing(path) {
            Ok(true) => info!("Created default config at {}", path.display()),
            Ok(false) => {}
            Err(e) => error!("Failed to create default config: {e}"),
        }

        match Self::load_with_env(path) {
            Ok(config) => {
                info!(
                    chat_enabled = config.chat.enabled,
                    chat_formats = config.chat.formats.len(),
                    "Config loaded"
                );
                config
            }
            Err(e) => {
                error!("Failed to load config {}: {e}", path.display());
                warn!("Using default config values.");
                let mut config = Self::default();
                config.apply_env_overrides();
                config
            }
        }
    }

    /// Write the bundled default configuration to `path` if nothing is there.
    ///
    /// Returns `true` if the file was created.
    pub fn create_if_missing<P: AsRef<Path>>(path: P) -> Result<bool> {
        let path = path.as_ref();
        if path.exists() {
            return Ok(false);
        }
        Self::write_default(path)?;
        Ok(true)
    }

    /// Write the bundled default configuration to `path`.
    pub fn write_default<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, DEFAULT_CONFIG)?;
        Ok(())
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `CHATFMT_CHAT_ENABLED`: `true`/`false` (also `1`/`0`, `yes`/`no`, `on`/`off`)
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides using `lookup` to resolve variable names.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_CHAT_ENABLED) {
            match parse_bool(&value) {
                Some(enabled) => self.chat.enabled = enabled,
                None => warn!("Ignoring {ENV_CHAT_ENABLED}={value:?}: expected true or false"),
            }
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
