//! Runtime configuration from environment (and `.env` via dotenvy).

use crate::error::ConfigError;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Deployment environment. Anything but production exposes error diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            _ => Err(ConfigError::Invalid {
                key: "APP_ENV",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// When absent the server runs on the in-memory store.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub db_max_connections: u32,
    pub body_limit_bytes: usize,
    /// Seed the in-memory store with demo listings.
    pub seed_demo_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_url: None,
            host: "0.0.0.0".into(),
            port: DEFAULT_PORT,
            environment: Environment::default(),
            db_max_connections: DEFAULT_MAX_CONNECTIONS,
            body_limit_bytes: DEFAULT_BODY_LIMIT,
            seed_demo_data: false,
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();
        let database_url = get("DATABASE_URL").filter(|s| !s.trim().is_empty());
        let host = get("HOST").unwrap_or(defaults.host);
        let port = parse_or("PORT", get("PORT"), defaults.port)?;
        let environment = match get("APP_ENV") {
            Some(v) => v.parse()?,
            None => defaults.environment,
        };
        let db_max_connections = parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), defaults.db_max_connections)?;
        let body_limit_bytes = parse_or("BODY_LIMIT_BYTES", get("BODY_LIMIT_BYTES"), defaults.body_limit_bytes)?;
        let seed_demo_data = parse_or("PROPERTY_SEED", get("PROPERTY_SEED"), false)?;
        Ok(AppConfig {
            database_url,
            host,
            port,
            environment,
            db_max_connections,
            body_limit_bytes,
            seed_demo_data,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.port, 3001);
        assert_eq!(cfg.environment, Environment::Development);
        assert!(cfg.database_url.is_none());
        assert!(!cfg.seed_demo_data);
    }

    #[test]
    fn reads_values() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("APP_ENV", "production"),
            ("DATABASE_URL", "postgres://localhost/props"),
            ("PROPERTY_SEED", "true"),
        ]))
        .unwrap();
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8080");
        assert!(cfg.environment.is_production());
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/props"));
        assert!(cfg.seed_demo_data);
    }

    #[test]
    fn rejects_bad_port() {
        let err = AppConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }
}
