//! Configuration file parser for ~/.config/newsdash/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde but logged as warnings, since they are
//! usually typos.
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides `base_url` from the file.
pub const BASE_URL_ENV: &str = "NEWSDASH_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// Every field is `#[serde(default)]`, so any subset of keys can be given.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root URL of the news backend (`/api/...` paths are joined onto it).
    pub base_url: String,

    /// Theme variant name ("dark" or "light").
    pub theme: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Trigger a news fetch as soon as the dashboard opens.
    pub fetch_on_start: bool,

    /// Keybinding overrides. Keys are action names, values are key strings.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            theme: "dark".to_string(),
            request_timeout_secs: 30,
            fetch_on_start: false,
            keybindings: HashMap::new(),
        }
    }
}

const KNOWN_KEYS: [&str; 5] = [
    "base_url",
    "theme",
    "request_timeout_secs",
    "fetch_on_start",
    "keybindings",
];

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line info
    /// - Unknown keys → accepted, logged as a warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        for key in unknown_keys(&content) {
            tracing::warn!(key = %key, "Unknown key in config file, ignoring");
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            base_url = %config.base_url,
            theme = %config.theme,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Resolve the backend URL: CLI flag, then environment, then this config.
    ///
    /// Blank values are skipped.
    pub fn effective_base_url(&self, cli: Option<&str>, env: Option<&str>) -> String {
        [cli, env]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or(&self.base_url)
            .to_string()
    }
}

/// Top-level keys in `content` that `Config` does not know about.
fn unknown_keys(content: &str) -> Vec<String> {
    match content.parse::<toml::Table>() {
        Ok(raw) => raw
            .keys()
            .filter(|k| !KNOWN_KEYS.contains(&k.as_str()))
            .cloned()
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// `~/.config/newsdash/config.toml`, or `None` if `HOME` is unset.
pub fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("newsdash")
            .join("config.toml"),
    )
}

// ============================================================================
// Tests
// ============================================================================
