use std::net::{IpAddr, SocketAddr};

use super::{env_lookup, non_empty, parse_var, ConfigError};

pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:3001"];

/// Server settings
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: IpAddr,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8080,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

impl EnvironmentConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// `ALLOWED_ORIGINS` wins over `FRONTEND_URL`; with neither set the local
    /// frontend ports are allowed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let allowed_origins = match non_empty(&lookup, "ALLOWED_ORIGINS").or_else(|| non_empty(&lookup, "FRONTEND_URL")) {
            Some(raw) => split_origins(&raw),
            None => defaults.allowed_origins,
        };

        Ok(Self {
            environment: non_empty(&lookup, "ENVIRONMENT").unwrap_or(defaults.environment),
            host: parse_var(&lookup, "HOST", defaults.host)?,
            port: parse_var(&lookup, "PORT", defaults.port)?,
            allowed_origins,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}
