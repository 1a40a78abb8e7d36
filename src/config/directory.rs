//! Directory seed configuration loaded from config.toml
//!
//! Teams and departments listed in config.toml are created on start-up when
//! they do not exist yet. Both lists are optional.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Teams to seed
    #[serde(default)]
    pub teams: Vec<TeamConfig>,
    /// Departments to seed
    #[serde(default)]
    pub departments: Vec<DepartmentConfig>,
}

/// Configuration for a single team
#[derive(Debug, Deserialize, Clone)]
pub struct TeamConfig {
    /// Team name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
}

/// Configuration for a single department
#[derive(Debug, Deserialize, Clone)]
pub struct DepartmentConfig {
    /// Department name
    pub name: String,
    /// Optional acronym
    #[serde(default)]
    pub acronym: Option<String>,
}

/// Loads directory configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads directory configuration from the default location (./config.toml)
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}
