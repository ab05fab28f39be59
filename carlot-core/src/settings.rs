//! Layered configuration
//!
//! Values come from an optional TOML file, then `CARLOT_*` environment
//! variables (`__` separates nested keys, e.g. `CARLOT_LOGGING__LEVEL`).
//! Command-line flags are applied on top by the binary.

use crate::error::{CarlotError, CarlotResult};
use crate::logging::LoggingConfig;
use crate::policy::Variant;
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Port used by the vulnerable variant when none is configured
pub const VULNERABLE_DEFAULT_PORT: u16 = 3000;
/// Port used by the hardened variant when none is configured
pub const HARDENED_DEFAULT_PORT: u16 = 5001;

/// Marketplace configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Which build to serve
    pub variant: Variant,
    /// Address to bind
    pub host: String,
    /// Port to bind; defaults per variant
    pub port: Option<u16>,
    /// SQLite file holding the `cars` table
    pub database_path: PathBuf,
    /// Directory with static assets
    pub static_dir: PathBuf,
    /// Session signing secret; a random one is generated when absent
    pub secret_key: Option<String>,
    pub logging: LoggingConfig,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Hardened,
            host: "127.0.0.1".to_string(),
            port: None,
            database_path: PathBuf::from("cars.db"),
            static_dir: PathBuf::from("static"),
            secret_key: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl MarketConfig {
    /// Configured port, or the variant's conventional one
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(match self.variant {
            Variant::Vulnerable => VULNERABLE_DEFAULT_PORT,
            Variant::Hardened => HARDENED_DEFAULT_PORT,
        })
    }

    /// Server address as `host:port`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.effective_port())
    }

    /// Validate configuration
    pub fn validate(&self) -> CarlotResult<()> {
        if self.host.trim().is_empty() {
            return Err(CarlotError::invalid_config("host cannot be empty"));
        }
        if self.database_path.as_os_str().is_empty() {
            return Err(CarlotError::invalid_config("database_path cannot be empty"));
        }
        if matches!(&self.secret_key, Some(key) if key.is_empty()) {
            return Err(CarlotError::invalid_config("secret_key cannot be empty when set"));
        }
        Ok(())
    }
}

/// Load configuration from `path` (if given) and the environment.
///
/// When no secret is configured, the conventional `SECRET_KEY` variable is used.
pub fn load_config(path: Option<&Path>) -> CarlotResult<MarketConfig> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }

    let config = builder
        .add_source(
            Environment::with_prefix("CARLOT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut market: MarketConfig = config.try_deserialize()?;

    if market.secret_key.is_none() {
        market.secret_key = std::env::var("SECRET_KEY").ok().filter(|key| !key.is_empty());
    }

    market.validate()?;
    Ok(market)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogFormat;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = MarketConfig::default();
        assert_eq!(config.variant, Variant::Hardened);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.effective_port(), HARDENED_DEFAULT_PORT);
        assert_eq!(config.address(), "127.0.0.1:5001");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_port_follows_variant() {
        let config = MarketConfig {
            variant: Variant::Vulnerable,
            ..MarketConfig::default()
        };
        assert_eq!(config.effective_port(), VULNERABLE_DEFAULT_PORT);

        let config = MarketConfig {
            port: Some(8080),
            ..config
        };
        assert_eq!(config.effective_port(), 8080);
    }

    #[test]
    fn test_validate_rejects_empty_values() {
        let config = MarketConfig {
            host: " ".to_string(),
            ..MarketConfig::default()
        };
        assert!(config.validate().is_err());

        let config = MarketConfig {
            secret_key: Some(String::new()),
            ..MarketConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carlot.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
variant = "vulnerable"
port = 4000
database_path = "/tmp/market.db"
secret_key = "from-file"

[logging]
level = "debug"
format = "json"
"#
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.variant, Variant::Vulnerable);
        assert_eq!(config.effective_port(), 4000);
        assert_eq!(config.database_path, PathBuf::from("/tmp/market.db"));
        assert_eq!(config.secret_key.as_deref(), Some("from-file"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn test_load_config_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(CarlotError::Config { .. })));
    }

    #[test]
    fn test_invalid_variant_in_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carlot.toml");
        std::fs::write(&path, "variant = \"insecure\"\n").unwrap();

        assert!(load_config(Some(&path)).is_err());
    }
}
