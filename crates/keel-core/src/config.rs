//! Configuration management for Keel.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration.
///
/// This is loaded from `~/.config/keel/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend-as-a-service connection settings
    pub backend: BackendConfig,
    /// Prospecting wizard settings
    pub prospecting: ProspectingConfig,
    /// Background polling settings
    pub polling: PollingConfig,
    /// Input handling settings
    pub interaction: InteractionConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            let config: Self = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `KEEL_BACKEND_URL`: Override the backend base URL
    /// - `KEEL_BACKEND_ANON_KEY`: Override the backend anon key
    /// - `KEEL_POLL_INTERVAL_SECS`: Override the pending-count refetch interval
    /// - `KEEL_DEBOUNCE_MS`: Override the search input debounce delay
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("KEEL_BACKEND_URL") {
            tracing::debug!("Override backend.url from env: {}", url);
            self.backend.url = url;
        }

        if let Some(key) = lookup("KEEL_BACKEND_ANON_KEY") {
            tracing::debug!("Override backend.anon_key from env");
            self.backend.anon_key = key;
        }

        if let Some(secs) = lookup("KEEL_POLL_INTERVAL_SECS").and_then(|v| v.parse().ok()) {
            self.polling.interval_secs = secs;
            tracing::debug!("Override polling.interval_secs from env: {}", secs);
        }

        if let Some(ms) = lookup("KEEL_DEBOUNCE_MS").and_then(|v| v.parse().ok()) {
            self.interaction.debounce_ms = ms;
            tracing::debug!("Override interaction.debounce_ms from env: {}", ms);
        }
    }

    /// Check values that would make the client misbehave.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.prospecting.preview_page_size == 0 {
            return Err(invalid("prospecting.preview_page_size", "must be at least 1"));
        }
        if self.prospecting.full_page_size < self.prospecting.preview_page_size {
            return Err(invalid(
                "prospecting.full_page_size",
                "must not be smaller than the preview page size",
            ));
        }
        if self.prospecting.max_similarity_seeds == 0 {
            return Err(invalid("prospecting.max_similarity_seeds", "must be at least 1"));
        }
        if self.polling.interval_secs == 0 {
            return Err(invalid("polling.interval_secs", "must be positive"));
        }
        Ok(())
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let config_dir = path.parent().ok_or_else(|| ConfigError::InvalidValue {
            field: "config_path".to_string(),
            reason: "no parent directory".to_string(),
        })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/keel/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "keel", "keel").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Backend-as-a-service connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`
    pub url: String,
    /// Public anon key sent as `apikey` header
    pub anon_key: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:54321".to_string(),
            anon_key: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Prospecting wizard settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProspectingConfig {
    /// Rows requested for the exploratory preview
    pub preview_page_size: u32,
    /// Rows requested per full pull and per load-more
    pub full_page_size: u32,
    /// Provider used when none is chosen: `ai_ark`, `apollo`, or `explorium`
    pub default_provider: String,
    /// Upper bound on seed domains for similarity search
    pub max_similarity_seeds: usize,
}

impl Default for ProspectingConfig {
    fn default() -> Self {
        Self {
            preview_page_size: 5,
            full_page_size: 25,
            default_provider: "ai_ark".to_string(),
            max_similarity_seeds: 5,
        }
    }
}

/// Background polling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Pending-count refetch interval in seconds
    pub interval_secs: u64,
    /// Age in seconds after which a cached count is stale
    pub stale_after_secs: u64,
}

impl PollingConfig {
    /// Refetch interval as a `Duration`.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Staleness window as a `Duration`.
    #[must_use]
    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            stale_after_secs: 30,
        }
    }
}

/// Input handling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Debounce delay for search-as-you-type inputs, in milliseconds
    pub debounce_ms: u64,
}

impl InteractionConfig {
    /// Debounce delay as a `Duration`.
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self { debounce_ms: 500 }
    }
}
