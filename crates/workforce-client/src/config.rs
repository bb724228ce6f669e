//! # Client Configuration
//!
//! Where the backend lives, how lists page and search, and which locale the
//! tables render in.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     WORKFORCE_API_URL=https://hr.example.com/api                       │
//! │     WORKFORCE_API_TOKEN=...                                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/dashboard/client.toml (Linux)                            │
//! │     ~/Library/Application Support/com.workforce.dashboard/client.toml  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:3000/api, 10 rows per page, 500ms debounce        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # client.toml
//! [api]
//! base_url = "https://hr.example.com/api"
//! timeout_secs = 30
//! token = "eyJhbGciOi..."
//!
//! [list]
//! page_size = 10
//! search_debounce_ms = 500
//!
//! [locale]
//! locale = "ar-SA"
//! direction = "rtl"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;
use workforce_core::validation::validate_page_size;
use workforce_core::{RenderContext, TextDirection, DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_DEBOUNCE_MS};

use crate::error::{ClientError, ClientResult};

// =============================================================================
// API Settings
// =============================================================================

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL every resource path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Bearer token sent with every request.
    #[serde(default)]
    pub token: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            token: None,
        }
    }
}

// =============================================================================
// List Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSettings {
    /// Initial page size of every list.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Quiet period before a typed search is sent (milliseconds).
    #[serde(default = "default_debounce")]
    pub search_debounce_ms: u64,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_debounce() -> u64 {
    DEFAULT_SEARCH_DEBOUNCE_MS
}

impl Default for ListSettings {
    fn default() -> Self {
        ListSettings {
            page_size: default_page_size(),
            search_debounce_ms: default_debounce(),
        }
    }
}

// =============================================================================
// Locale Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleSettings {
    #[serde(default = "default_locale")]
    pub locale: String,

    #[serde(default)]
    pub direction: TextDirection,
}

fn default_locale() -> String {
    "en-US".to_string()
}

impl Default for LocaleSettings {
    fn default() -> Self {
        LocaleSettings {
            locale: default_locale(),
            direction: TextDirection::default(),
        }
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub list: ListSettings,

    #[serde(default)]
    pub locale: LocaleSettings,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (client.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = Url::parse(&self.api.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        validate_page_size(self.list.page_size)
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        if self.locale.locale.trim().is_empty() {
            return Err(ClientError::InvalidConfig("locale must not be empty".into()));
        }

        Ok(())
    }

    /// Applies `WORKFORCE_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("WORKFORCE_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(token) = var("WORKFORCE_API_TOKEN") {
            self.api.token = Some(token);
        }

        if let Some(timeout) = var("WORKFORCE_API_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(t) => self.api.timeout_secs = t,
                Err(_) => warn!(value = %timeout, "Invalid WORKFORCE_API_TIMEOUT_SECS"),
            }
        }

        if let Some(size) = var("WORKFORCE_PAGE_SIZE") {
            match size.parse::<u32>() {
                Ok(s) => self.list.page_size = s,
                Err(_) => warn!(value = %size, "Invalid WORKFORCE_PAGE_SIZE"),
            }
        }

        if let Some(ms) = var("WORKFORCE_SEARCH_DEBOUNCE_MS") {
            match ms.parse::<u64>() {
                Ok(ms) => self.list.search_debounce_ms = ms,
                Err(_) => warn!(value = %ms, "Invalid WORKFORCE_SEARCH_DEBOUNCE_MS"),
            }
        }

        if let Some(locale) = var("WORKFORCE_LOCALE") {
            self.locale.locale = locale;
        }

        if let Some(direction) = var("WORKFORCE_DIRECTION") {
            match direction.parse() {
                Ok(d) => self.locale.direction = d,
                Err(_) => warn!(direction = %direction, "Unknown text direction in environment"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "workforce", "dashboard")
            .map(|dirs| dirs.config_dir().join("client.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Rendering context for tables.
    pub fn render_context(&self) -> RenderContext {
        RenderContext {
            direction: self.locale.direction,
            locale: self.locale.locale.clone(),
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.list.search_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.list.page_size, 10);
        assert_eq!(config.search_debounce(), Duration::from_millis(500));
        assert!(!config.render_context().is_rtl());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://hr.example.com/api"

            [locale]
            locale = "ar-SA"
            direction = "rtl"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.list.search_debounce_ms, 500);
        assert!(config.render_context().is_rtl());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();

        config.api.base_url = "ftp://hr.example.com".to_string();
        assert!(config.validate().unwrap_err().is_config_error());

        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "https://hr.example.com".to_string();
        config.list.page_size = 0;
        assert!(config.validate().is_err());

        config.list.page_size = 25;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("WORKFORCE_API_URL", "https://override.example.com"),
            ("WORKFORCE_PAGE_SIZE", "25"),
            ("WORKFORCE_SEARCH_DEBOUNCE_MS", "not-a-number"),
            ("WORKFORCE_DIRECTION", "rtl"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "https://override.example.com");
        assert_eq!(config.list.page_size, 25);
        // Unparseable values are ignored
        assert_eq!(config.list.search_debounce_ms, 500);
        assert_eq!(config.locale.direction, TextDirection::Rtl);
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir()
            .join(format!("workforce-client-{}", uuid::Uuid::new_v4()))
            .join("client.toml");

        let mut config = ClientConfig::default();
        config.list.page_size = 50;
        config.save(Some(path.clone())).unwrap();

        let reloaded = ClientConfig::load(Some(path.clone())).unwrap();
        assert_eq!(reloaded.list.page_size, 50);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
