//! Server configuration from environment variables

use std::net::SocketAddr;
use tracing::Level;

pub const DEFAULT_DATABASE: &str = "checkers.db";
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
}

impl Environment {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "dev" => Some(Environment::Dev),
            "prod" => Some(Environment::Prod),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }

    pub fn log_level(&self) -> Level {
        match self {
            Environment::Dev => Level::DEBUG,
            Environment::Prod => Level::INFO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub database_path: String,
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Reads `CHECKERS_ENV`, `CHECKERS_DATABASE` and `CHECKERS_ADDR`.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("CHECKERS_ENV") {
            Some(name) => Environment::parse(&name)
                .ok_or_else(|| format!("CHECKERS_ENV must be dev or prod, got '{}'", name))?,
            None => Environment::Dev,
        };

        let database_path = lookup("CHECKERS_DATABASE")
            .filter(|path| !path.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let addr = lookup("CHECKERS_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let bind_addr = addr
            .parse()
            .map_err(|e| format!("CHECKERS_ADDR '{}' is not a socket address: {}", addr, e))?;

        Ok(Self {
            environment,
            database_path,
            bind_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.environment, Environment::Dev);
        assert_eq!(config.database_path, DEFAULT_DATABASE);
        assert_eq!(config.bind_addr.to_string(), DEFAULT_ADDR);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("CHECKERS_ENV", "PROD"),
            ("CHECKERS_DATABASE", ":memory:"),
            ("CHECKERS_ADDR", "0.0.0.0:8080"),
        ])
        .unwrap();
        assert_eq!(config.environment, Environment::Prod);
        assert_eq!(config.environment.log_level(), Level::INFO);
        assert_eq!(config.database_path, ":memory:");
        assert_eq!(config.bind_addr.port(), 8080);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(config(&[("CHECKERS_ENV", "staging")]).is_err());
        assert!(config(&[("CHECKERS_ADDR", "localhost")]).is_err());
    }
}
