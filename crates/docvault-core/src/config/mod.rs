//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod access;
pub mod database;
pub mod logging;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use self::access::AccessConfig;
pub use self::database::{DatabaseConfig, DatabaseProvider};
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Deserialized from the TOML file given on the command line, with
/// `DOCVAULT__`-prefixed environment variables layered on top
/// (e.g. `DOCVAULT__DATABASE__URL`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Permission resolution settings.
    #[serde(default)]
    pub access: AccessConfig,
}

impl AppConfig {
    /// Load configuration from `path`, then apply `DOCVAULT__` overrides.
    pub fn load_from(path: &str) -> Result<Self, AppError> {
        let config: Self = config::Config::builder()
            .add_source(config::File::with_name(path).required(true))
            .add_source(
                config::Environment::with_prefix("DOCVAULT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.access.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_deserialize_from_empty_source() {
        let config: AppConfig = config::Config::builder()
            .build()
            .and_then(|c| c.try_deserialize())
            .expect("empty config should use defaults");
        assert_eq!(config.database.provider, DatabaseProvider::Postgres);
        assert_eq!(config.access.max_ancestor_depth, 64);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_toml_overrides() {
        let toml = r#"
            [database]
            provider = "memory"

            [access]
            max_ancestor_depth = 8
            resolve_timeout_ms = 250
        "#;
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize())
            .expect("toml should parse");
        assert_eq!(config.database.provider, DatabaseProvider::Memory);
        assert_eq!(config.access.max_ancestor_depth, 8);
        assert_eq!(config.access.resolve_timeout_ms, 250);
    }

    #[test]
    fn test_load_from_file_validates_access_section() {
        let path = std::env::temp_dir().join(format!("docvault-{}.toml", std::process::id()));
        std::fs::write(&path, "[access]\nmax_ancestor_depth = 0\n").unwrap();
        let result = AppConfig::load_from(path.to_str().unwrap());
        std::fs::remove_file(&path).unwrap();

        let err = result.unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Validation);
    }

    #[test]
    fn test_load_from_missing_file_is_configuration_error() {
        let err = AppConfig::load_from("/nonexistent/docvault.toml").unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }
}
