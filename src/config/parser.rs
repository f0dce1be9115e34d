//! Generic configuration parsing utilities.
//!
//! Works with any `DeserializeOwned` type. The format is chosen from the file
//! extension: `.json` files are parsed as JSON (the admin client historically
//! shipped a `Config.json`), everything else as TOML.
//!
//! ```rust,no_run
//! use jsonapi_admin::config::parse_config;
//! use serde::Deserialize;
//! use std::path::Path;
//!
//! #[derive(Deserialize)]
//! struct MyConfig {
//!     name: String,
//! }
//!
//! # fn example() -> anyhow::Result<()> {
//! let config: MyConfig = parse_config(Path::new("config.toml"))?;
//! println!("Config: {}", config.name);
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::path::Path;

use crate::core::AdminError;

/// On-disk configuration formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML (default)
    Toml,
    /// JSON, selected by a `.json` extension
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Deserialize configuration text in the given format.
///
/// `file` is only used to label the error.
pub fn parse_str<T>(content: &str, format: ConfigFormat, file: &str) -> Result<T, AdminError>
where
    T: serde::de::DeserializeOwned,
{
    let parsed = match format {
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
    };
    parsed.map_err(|reason| AdminError::ConfigParseError {
        file: file.to_string(),
        reason,
    })
}

/// Read and deserialize a configuration file.
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_str(&content, ConfigFormat::from_path(path), &path.display().to_string())?;

    Ok(config)
}
