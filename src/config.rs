//! Configuration for sonascore
//!
//! Two-tier bootstrap configuration:
//! 1. Command-line arguments / environment variables (clap)
//! 2. Optional TOML configuration file
//!
//! CLI values take priority over the TOML file; built-in defaults apply when
//! neither source provides a value. There is no runtime tier: the service is
//! stateless and every setting is fixed at startup.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Default listen port
pub const DEFAULT_PORT: u16 = 5750;

/// Default maximum accepted upload size in megabytes
pub const DEFAULT_MAX_UPLOAD_MB: usize = 100;

/// Optional TOML configuration file contents
///
/// All fields are optional; missing fields fall back to built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Port to listen on
    pub port: Option<u16>,
    /// Maximum accepted upload size in megabytes
    pub max_upload_mb: Option<usize>,
}

impl TomlConfig {
    /// Load TOML configuration from a file.
    ///
    /// A missing file is a hard error (the operator explicitly asked for it);
    /// use `TomlConfig::default()` when no file was requested.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }
}

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,
    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
}

impl Config {
    /// Resolve the final configuration from CLI values and an optional TOML tier.
    ///
    /// `cli_port` of `None` means "not given on the command line".
    pub fn resolve(cli_port: Option<u16>, toml: TomlConfig) -> Self {
        let port = cli_port.or(toml.port).unwrap_or(DEFAULT_PORT);
        let max_upload_mb = toml.max_upload_mb.unwrap_or(DEFAULT_MAX_UPLOAD_MB);
        Config {
            port,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::resolve(None, TomlConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_MB * 1024 * 1024);
    }

    #[test]
    fn test_cli_overrides_toml() {
        let toml = TomlConfig {
            port: Some(6000),
            max_upload_mb: Some(10),
        };
        let config = Config::resolve(Some(7000), toml);
        assert_eq!(config.port, 7000);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_toml_parse() {
        let toml: TomlConfig = toml::from_str("port = 8080\nmax_upload_mb = 25\n").unwrap();
        assert_eq!(toml.port, Some(8080));
        assert_eq!(toml.max_upload_mb, Some(25));
    }

    #[test]
    fn test_toml_empty() {
        let toml: TomlConfig = toml::from_str("").unwrap();
        assert!(toml.port.is_none());
        assert!(toml.max_upload_mb.is_none());
    }
}
