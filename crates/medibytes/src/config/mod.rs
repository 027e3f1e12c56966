use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::matching::{CompatibilityWeights, WeightsError};
use crate::registry::MatchingConfig;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the registry service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub matching: MatchingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let weights = match env::var("APP_MATCH_WEIGHTS") {
            Ok(raw) => raw
                .parse::<CompatibilityWeights>()
                .map_err(|source| ConfigError::InvalidWeights { source })?,
            Err(_) => CompatibilityWeights::STANDARD,
        };

        let content_gateway = env::var("APP_CONTENT_GATEWAY")
            .map(|value| value.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| MatchingConfig::DEFAULT_CONTENT_GATEWAY.to_string());

        let search_limit = match env::var("APP_SEARCH_LIMIT") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|limit| MatchingConfig::SEARCH_LIMIT_RANGE.contains(limit))
                .ok_or(ConfigError::InvalidSearchLimit)?,
            Err(_) => MatchingConfig::DEFAULT_SEARCH_LIMIT,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
            matching: MatchingConfig {
                weights,
                content_gateway,
                search_limit,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Log filter and formatting controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidWeights { source: WeightsError },
    InvalidSearchLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidWeights { source } => {
                write!(f, "APP_MATCH_WEIGHTS is invalid: {source}")
            }
            ConfigError::InvalidSearchLimit => {
                write!(f, "APP_SEARCH_LIMIT must be an integer between 1 and 100")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidSearchLimit => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidWeights { source } => Some(source),
        }
    }
}
