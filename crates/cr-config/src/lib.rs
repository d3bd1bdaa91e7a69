//! # cr-config
//!
//! Layered settings for the city-rights server. Later layers win:
//!
//! 1. built-in defaults
//! 2. `config/default.toml` (optional)
//! 3. `CITY_RIGHTS__<SECTION>__<KEY>` environment variables, after `.env`
//!    has been loaded

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

pub const ENV_PREFIX: &str = "CITY_RIGHTS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting {0}: {1}")]
    Invalid(&'static str, String),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Directory served under `/static` (city views, coats of arms, crowns)
    pub static_dir: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LogSettings {
    /// Default `env_logger` filter; `RUST_LOG` still overrides it
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub log: LogSettings,
    /// The `.env` file that was read, if any; logged once logging is up
    #[serde(skip)]
    pub env_file: Option<PathBuf>,
}

impl Settings {
    /// Loads `.env`, then every layer.
    pub fn load() -> Result<Self, ConfigError> {
        let env_file = dotenvy::dotenv().ok();
        let settings = Self::build(Environment::with_prefix(ENV_PREFIX).separator("__"))?;
        Ok(Settings { env_file, ..settings })
    }

    fn build(env: Environment) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.static_dir", "./static")?
            .set_default("database.url", "sqlite:city_rights.db")?
            .set_default("database.max_connections", 5)?
            .set_default("log.level", "info")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(env)
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections",
                "must be at least 1".into(),
            ));
        }
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Invalid("database.url", "must not be empty".into()));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::build(env(&[])).unwrap();
        assert_eq!(settings.bind_address(), ("127.0.0.1".to_string(), 8080));
        assert_eq!(settings.database.url, "sqlite:city_rights.db");
        assert_eq!(settings.log.level, "info");
        assert_eq!(settings.env_file, None);
    }

    #[test]
    fn test_environment_overrides_defaults() {
        let settings = Settings::build(env(&[
            ("CITY_RIGHTS__SERVER__PORT", "9000"),
            ("CITY_RIGHTS__DATABASE__URL", "sqlite::memory:"),
        ]))
        .unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.database.url, "sqlite::memory:");
    }

    #[test]
    fn test_zero_connections_is_rejected() {
        let err = Settings::build(env(&[("CITY_RIGHTS__DATABASE__MAX_CONNECTIONS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("database.max_connections", _)));
    }
}
