//! Configuration loading and resolution
//!
//! Each setting is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing or unreadable TOML file never stops startup; the caller logs a
//! warning and continues with the remaining tiers.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Document location used by the original deployment layout
pub const DEFAULT_DATA_FILE: &str = "data/data.json";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

pub const ENV_DATA_FILE: &str = "AIRFRYER_DATA_FILE";
pub const ENV_HOST: &str = "AIRFRYER_HOST";
pub const ENV_PORT: &str = "AIRFRYER_PORT";

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub data_file: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub data_file: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Fully resolved server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Persisted recipe document
    pub data_file: PathBuf,
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Resolve every setting across CLI, environment, TOML and defaults
    ///
    /// # Errors
    /// `Error::Config` if `AIRFRYER_PORT` is needed (no `--port`) but is not
    /// a valid port.
    pub fn resolve(cli: &CliOverrides, toml: &TomlConfig) -> Result<Self> {
        let data_file = cli
            .data_file
            .clone()
            .or_else(|| env_value(ENV_DATA_FILE).map(PathBuf::from))
            .or_else(|| toml.data_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        let host = cli
            .host
            .clone()
            .or_else(|| env_value(ENV_HOST))
            .or_else(|| toml.host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        // The environment is only consulted when the command line is silent
        let port = match cli.port {
            Some(port) => port,
            None => env_port()?.or(toml.port).unwrap_or(DEFAULT_PORT),
        };

        Ok(Self {
            data_file,
            host,
            port,
        })
    }

    /// `host:port` string suitable for binding a listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Platform config file location: `<config dir>/airfryer/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("airfryer").join("config.toml"))
}

/// Read and parse a TOML config file
///
/// # Errors
/// `Error::Config` if the file cannot be read or is not valid TOML.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load the config file if there is one, falling back to empty settings
pub fn load_toml_config_or_default(path: Option<&Path>) -> TomlConfig {
    let Some(path) = path else {
        return TomlConfig::default();
    };

    if !path.exists() {
        debug!("No config file at {}", path.display());
        return TomlConfig::default();
    }

    match load_toml_config(path) {
        Ok(config) => {
            debug!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("{} (using defaults)", e);
            TomlConfig::default()
        }
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_port() -> Result<Option<u16>> {
    env_value(ENV_PORT)
        .map(|raw| {
            raw.trim().parse::<u16>().map_err(|e| {
                Error::Config(format!("{} must be a port number, got '{}': {}", ENV_PORT, raw, e))
            })
        })
        .transpose()
}
