//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/route-planner/config.toml

pub mod defaults;

use crate::constants::api::{NOMINATIM_URL, OSRM_URL, PHOTON_URL};
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream provider endpoints and client settings
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Place resolution tuning
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Routing settings
    #[serde(default)]
    pub route: RouteConfig,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Upstream provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Base URL of the Photon geocoder
    #[serde(default = "default_photon_url")]
    pub photon_url: String,

    /// Base URL of the Nominatim geocoder
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,

    /// Base URL of the OSRM router
    #[serde(default = "default_osrm_url")]
    pub osrm_url: String,

    /// User-Agent sent to Nominatim
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Place resolution tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Most queries sent to the fallback geocoder per request
    #[serde(default = "default_max_fallback")]
    pub max_fallback: usize,

    /// Delay between fallback calls in milliseconds
    #[serde(default = "default_fallback_delay_ms")]
    pub fallback_delay_ms: u64,

    /// Label and error message language
    #[serde(default = "default_language")]
    pub language: String,
}

/// Routing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    /// OSRM profile segment (driving, walking, cycling)
    #[serde(default = "default_profile")]
    pub profile: String,
}

// Default value functions for serde
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_photon_url() -> String {
    PHOTON_URL.to_string()
}
fn default_nominatim_url() -> String {
    NOMINATIM_URL.to_string()
}
fn default_osrm_url() -> String {
    OSRM_URL.to_string()
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_max_fallback() -> usize {
    DEFAULT_MAX_FALLBACK
}
fn default_fallback_delay_ms() -> u64 {
    DEFAULT_FALLBACK_DELAY_MS
}
fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}
fn default_profile() -> String {
    DEFAULT_PROFILE.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            photon_url: default_photon_url(),
            nominatim_url: default_nominatim_url(),
            osrm_url: default_osrm_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProvidersConfig {
    /// Per-call timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_fallback: default_max_fallback(),
            fallback_delay_ms: default_fallback_delay_ms(),
            language: default_language(),
        }
    }
}

impl ResolverConfig {
    /// Fallback delay as a Duration
    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_delay_ms)
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path
    ///
    /// Creates default config there if the file doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Apply overrides from the process environment
    ///
    /// `APP_USER_AGENT` replaces the Nominatim client identifier.
    pub fn apply_env(mut self) -> Self {
        if let Ok(agent) = std::env::var(USER_AGENT_ENV) {
            if !agent.trim().is_empty() {
                self.providers.user_agent = agent;
            }
        }
        self
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["providers", "photon_url"] => Some(self.providers.photon_url.clone()),
            ["providers", "nominatim_url"] => Some(self.providers.nominatim_url.clone()),
            ["providers", "osrm_url"] => Some(self.providers.osrm_url.clone()),
            ["providers", "user_agent"] => Some(self.providers.user_agent.clone()),
            ["providers", "timeout_secs"] => Some(self.providers.timeout_secs.to_string()),

            ["resolver", "max_fallback"] => Some(self.resolver.max_fallback.to_string()),
            ["resolver", "fallback_delay_ms"] => {
                Some(self.resolver.fallback_delay_ms.to_string())
            }
            ["resolver", "language"] => Some(self.resolver.language.clone()),

            ["route", "profile"] => Some(self.route.profile.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid port value: {}", value)))?;
            }

            ["providers", "photon_url"] => {
                self.providers.photon_url = value.to_string();
            }
            ["providers", "nominatim_url"] => {
                self.providers.nominatim_url = value.to_string();
            }
            ["providers", "osrm_url"] => {
                self.providers.osrm_url = value.to_string();
            }
            ["providers", "user_agent"] => {
                self.providers.user_agent = value.to_string();
            }
            ["providers", "timeout_secs"] => {
                self.providers.timeout_secs = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid timeout value: {}", value)))?;
            }

            ["resolver", "max_fallback"] => {
                self.resolver.max_fallback = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid fallback cap: {}", value)))?;
            }
            ["resolver", "fallback_delay_ms"] => {
                self.resolver.fallback_delay_ms = value
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid delay value: {}", value)))?;
            }
            ["resolver", "language"] => {
                self.resolver.language = value.to_string();
            }

            ["route", "profile"] => {
                self.route.profile = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "server.host",
            "server.port",
            "providers.photon_url",
            "providers.nominatim_url",
            "providers.osrm_url",
            "providers.user_agent",
            "providers.timeout_secs",
            "resolver.max_fallback",
            "resolver.fallback_delay_ms",
            "resolver.language",
            "route.profile",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
