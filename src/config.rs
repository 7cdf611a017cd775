//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. explicit path (must exist)
//! 2. `~/.heimdall/config.toml` (user)
//! 3. `/etc/heimdall/config.toml` (system)
//! 4. built-in defaults
//!
//! Only the response cache is configurable:
//!
//! ```toml
//! [cache]
//! max_size = 1000
//! ttl_seconds = 3600
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cache::CacheConfig;
use crate::{HeimdallError, Result};

/// Heimdall configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Falls back to defaults when no file exists and no explicit path was
    /// given. An explicit path that does not exist is an error.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let Some(path) = Self::resolve_config_path(explicit_path)? else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(&path).map_err(|e| {
            HeimdallError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            HeimdallError::Configuration(msg) => {
                HeimdallError::Configuration(format!("{path:?}: {msg}"))
            }
            other => other,
        })
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            HeimdallError::Configuration(format!("Failed to parse config: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject a zero-sized cache and non-positive TTLs.
    pub fn validate(&self) -> Result<()> {
        if self.cache.max_size == 0 {
            return Err(HeimdallError::Configuration(
                "cache.max_size must be a positive integer".to_string(),
            ));
        }
        if self.cache.ttl.is_zero() {
            return Err(HeimdallError::Configuration(
                "cache.ttl_seconds must be a positive number".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the config file path, or `None` to use defaults.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(HeimdallError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".heimdall").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/heimdall/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.cache.max_size, 1_000);
        assert_eq!(config.cache.ttl, Duration::from_secs(3600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [cache]
            max_size = 50
            ttl_seconds = 2.5
        "#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.cache.max_size, 50);
        assert_eq!(config.cache.ttl, Duration::from_millis(2500));
    }

    #[test]
    fn parse_partial_cache_section_keeps_other_default() {
        let config = Config::from_toml_str("[cache]\nmax_size = 7\n").unwrap();
        assert_eq!(config.cache.max_size, 7);
        assert_eq!(config.cache.ttl, Duration::from_secs(3600));
    }

    #[test]
    fn zero_max_size_is_rejected() {
        let err = Config::from_toml_str("[cache]\nmax_size = 0\n").unwrap_err();
        assert!(err.to_string().contains("max_size"));
    }

    #[test]
    fn non_positive_ttl_is_rejected() {
        for ttl in ["0", "-5", "-0.1"] {
            let toml = format!("[cache]\nttl_seconds = {ttl}\n");
            let err = Config::from_toml_str(&toml).unwrap_err();
            assert!(err.to_string().contains("ttl_seconds"), "ttl {ttl}");
        }
    }

    #[test]
    fn huge_ttl_saturates_instead_of_failing() {
        let config = Config::from_toml_str("[cache]\nttl_seconds = 1e20\n").unwrap();
        assert_eq!(config.cache.ttl, Duration::MAX);
    }

    #[test]
    fn malformed_toml_is_configuration_error() {
        let err = Config::from_toml_str("[cache\nmax_size = ").unwrap_err();
        assert!(matches!(err, HeimdallError::Configuration(_)));
    }

    #[test]
    fn config_not_found_returns_error() {
        let result = Config::load(Some(Path::new("/nonexistent/heimdall.toml")));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Config file not found"));
    }

    #[test]
    fn load_from_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cache]\nmax_size = 12\nttl_seconds = 30").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.cache.max_size, 12);
        assert_eq!(config.cache.ttl, Duration::from_secs(30));
    }

    #[test]
    fn invalid_file_error_names_the_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cache]\nmax_size = 0").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err().to_string();
        assert!(err.contains("max_size"));
        assert!(err.contains(&format!("{:?}", file.path())));
    }
}
