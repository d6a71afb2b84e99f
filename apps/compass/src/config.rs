//! # Application Configuration
//!
//! Optional toml configuration for the server. Every field has a default,
//! so the binary runs with no config file at all; CLI flags override
//! whatever the file provides.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//!
//! [sessions]
//! database = "compass-sessions.redb"
//!
//! [sheet]
//! path = "responses.csv"
//! ```

use compass_core::CompassError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default config file looked up next to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "compass.toml";

// =============================================================================
// CONFIG SECTIONS
// =============================================================================

/// HTTP server binding.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Session store location. `database = None` keeps sessions in memory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionsConfig {
    pub database: Option<PathBuf>,
}

/// Row-log location.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    pub path: PathBuf,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("responses.csv"),
        }
    }
}

// =============================================================================
// APP CONFIG
// =============================================================================

/// Full application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub sessions: SessionsConfig,
    pub sheet: SheetConfig,
}

impl AppConfig {
    /// Load configuration from a toml file.
    pub fn load(path: &Path) -> Result<Self, CompassError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CompassError::Io(format!("read {:?}: {}", path, e)))?;
        toml::from_str(&raw)
            .map_err(|e| CompassError::Serialization(format!("parse {:?}: {}", path, e)))
    }

    /// Load the explicit config file, or the default one when present, or
    /// built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, CompassError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
