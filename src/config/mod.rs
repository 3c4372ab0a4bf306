//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/client-intake/config.toml

pub mod defaults;

use crate::error::{Error, Result};
use crate::geo::{AutocompleteOptions, Coordinates};
use crate::map::Viewport;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Customer backend settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Mapping provider and map settings
    #[serde(default)]
    pub maps: MapsConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Customer backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the customer API
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
}

/// Mapping provider and map settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapsConfig {
    /// Google Maps API key
    #[serde(default)]
    pub api_key: String,

    /// Web services root
    #[serde(default = "default_maps_url")]
    pub base_url: String,

    /// Autocomplete country restriction
    #[serde(default = "default_country")]
    pub country: String,

    /// Fixed route origin
    #[serde(default = "default_origin_lat")]
    pub origin_lat: f64,
    #[serde(default = "default_origin_lng")]
    pub origin_lng: f64,

    /// Overview center when nothing is resolved yet
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,
    #[serde(default = "default_center_lng")]
    pub center_lng: f64,

    #[serde(default = "default_zoom")]
    pub default_zoom: u8,

    #[serde(default = "default_focused_zoom")]
    pub focused_zoom: u8,

    /// Timeout for each provider call of a resolution
    #[serde(default = "default_resolve_timeout")]
    pub resolve_timeout_secs: u64,
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

// Default value functions for serde
fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}
fn default_backend_timeout() -> u64 {
    DEFAULT_BACKEND_TIMEOUT_SECS
}
fn default_maps_url() -> String {
    DEFAULT_MAPS_URL.to_string()
}
fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}
fn default_origin_lat() -> f64 {
    DEFAULT_ORIGIN_LAT
}
fn default_origin_lng() -> f64 {
    DEFAULT_ORIGIN_LNG
}
fn default_center_lat() -> f64 {
    DEFAULT_CENTER_LAT
}
fn default_center_lng() -> f64 {
    DEFAULT_CENTER_LNG
}
fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}
fn default_focused_zoom() -> u8 {
    DEFAULT_FOCUSED_ZOOM
}
fn default_resolve_timeout() -> u64 {
    DEFAULT_RESOLVE_TIMEOUT_SECS
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            timeout_secs: default_backend_timeout(),
        }
    }
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_maps_url(),
            country: default_country(),
            origin_lat: default_origin_lat(),
            origin_lng: default_origin_lng(),
            center_lat: default_center_lat(),
            center_lng: default_center_lng(),
            default_zoom: default_zoom(),
            focused_zoom: default_focused_zoom(),
            resolve_timeout_secs: default_resolve_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl MapsConfig {
    /// Route origin as coordinates
    pub fn origin(&self) -> Coordinates {
        Coordinates::new(self.origin_lat, self.origin_lng)
    }

    /// Overview viewport used when no location is resolved
    pub fn overview(&self) -> Viewport {
        Viewport {
            center: Coordinates::new(self.center_lat, self.center_lng),
            zoom: self.default_zoom,
        }
    }

    /// Per-stage resolution timeout
    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_secs(self.resolve_timeout_secs)
    }

    /// Autocomplete restricted to the configured country and to addresses
    pub fn autocomplete_options(&self) -> AutocompleteOptions {
        AutocompleteOptions::addresses_in(&self.country)
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
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

    /// Load configuration from a specific path, creating it if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
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

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["backend", "base_url"] => Some(self.backend.base_url.clone()),
            ["backend", "timeout_secs"] => Some(self.backend.timeout_secs.to_string()),

            ["maps", "api_key"] => Some(self.maps.api_key.clone()),
            ["maps", "base_url"] => Some(self.maps.base_url.clone()),
            ["maps", "country"] => Some(self.maps.country.clone()),
            ["maps", "origin_lat"] => Some(self.maps.origin_lat.to_string()),
            ["maps", "origin_lng"] => Some(self.maps.origin_lng.to_string()),
            ["maps", "center_lat"] => Some(self.maps.center_lat.to_string()),
            ["maps", "center_lng"] => Some(self.maps.center_lng.to_string()),
            ["maps", "default_zoom"] => Some(self.maps.default_zoom.to_string()),
            ["maps", "focused_zoom"] => Some(self.maps.focused_zoom.to_string()),
            ["maps", "resolve_timeout_secs"] => Some(self.maps.resolve_timeout_secs.to_string()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

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
            ["backend", "base_url"] => self.backend.base_url = value.to_string(),
            ["backend", "timeout_secs"] => self.backend.timeout_secs = parse_timeout(key, value)?,

            ["maps", "api_key"] => self.maps.api_key = value.to_string(),
            ["maps", "base_url"] => self.maps.base_url = value.to_string(),
            ["maps", "country"] => self.maps.country = value.to_uppercase(),
            ["maps", "origin_lat"] => self.maps.origin_lat = parse_latitude(key, value)?,
            ["maps", "origin_lng"] => self.maps.origin_lng = parse_longitude(key, value)?,
            ["maps", "center_lat"] => self.maps.center_lat = parse_latitude(key, value)?,
            ["maps", "center_lng"] => self.maps.center_lng = parse_longitude(key, value)?,
            ["maps", "default_zoom"] => self.maps.default_zoom = parse(key, value)?,
            ["maps", "focused_zoom"] => self.maps.focused_zoom = parse(key, value)?,
            ["maps", "resolve_timeout_secs"] => {
                self.maps.resolve_timeout_secs = parse_timeout(key, value)?
            }

            ["server", "host"] => self.server.host = value.to_string(),
            ["server", "port"] => self.server.port = parse(key, value)?,

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "backend.base_url",
            "backend.timeout_secs",
            "maps.api_key",
            "maps.base_url",
            "maps.country",
            "maps.origin_lat",
            "maps.origin_lng",
            "maps.center_lat",
            "maps.center_lng",
            "maps.default_zoom",
            "maps.focused_zoom",
            "maps.resolve_timeout_secs",
            "server.host",
            "server.port",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}

/// Whole seconds, at least one
fn parse_timeout(key: &str, value: &str) -> Result<u64> {
    match parse(key, value)? {
        0 => Err(Error::Config(format!("{} must be at least 1 second", key))),
        secs => Ok(secs),
    }
}

fn parse_latitude(key: &str, value: &str) -> Result<f64> {
    let lat: f64 = parse(key, value)?;
    Coordinates::new(lat, 0.0)
        .validate()
        .map_err(|e| Error::Config(e.to_string()))?;
    Ok(lat)
}

fn parse_longitude(key: &str, value: &str) -> Result<f64> {
    let lng: f64 = parse(key, value)?;
    Coordinates::new(0.0, lng)
        .validate()
        .map_err(|e| Error::Config(e.to_string()))?;
    Ok(lng)
}
