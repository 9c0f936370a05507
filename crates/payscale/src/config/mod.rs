use crate::dashboard::{DashboardContext, ExchangeRate, InsightThresholds, Language};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub dashboard: DashboardConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            dashboard: DashboardConfig::from_env(environment)?,
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Data sources and presentation defaults for the salary dashboard.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub translations_path: Option<PathBuf>,
    pub exchange_rate: ExchangeRate,
    pub default_language: Language,
    pub page_size: usize,
    pub thresholds: InsightThresholds,
    pub warn_on_missing_translations: bool,
}

impl DashboardConfig {
    pub const DEFAULT_DATA_PATH: &'static str = "_data/db/salaries.json";
    pub const DEFAULT_PAGE_SIZE: usize = 25;

    fn from_env(environment: AppEnvironment) -> Result<Self, ConfigError> {
        let data_path = env::var("PAYSCALE_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(Self::DEFAULT_DATA_PATH));
        let translations_path = env::var("PAYSCALE_TRANSLATIONS_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let iqd_per_usd = match env::var("PAYSCALE_USD_IQD_RATE") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|rate| rate.is_finite() && *rate > 0.0)
                .ok_or(ConfigError::InvalidExchangeRate)?,
            Err(_) => ExchangeRate::DEFAULT_IQD_PER_USD,
        };

        let default_language = env::var("PAYSCALE_DEFAULT_LANG")
            .map(|code| Language::from_code_or(&code, Language::En))
            .unwrap_or_default();

        let page_size = match env::var("PAYSCALE_PAGE_SIZE") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidPageSize)?,
            Err(_) => Self::DEFAULT_PAGE_SIZE,
        };

        Ok(Self {
            data_path,
            translations_path,
            exchange_rate: ExchangeRate::new(iqd_per_usd),
            default_language,
            page_size,
            thresholds: InsightThresholds::default(),
            warn_on_missing_translations: environment == AppEnvironment::Development,
        })
    }

    pub fn context(&self) -> DashboardContext {
        self.context_for(self.default_language)
    }

    pub fn context_for(&self, language: Language) -> DashboardContext {
        DashboardContext {
            language,
            exchange_rate: self.exchange_rate,
            thresholds: self.thresholds.clone(),
            page_size: self.page_size,
            warn_on_missing_translations: self.warn_on_missing_translations,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidExchangeRate,
    InvalidPageSize,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidExchangeRate => {
                write!(f, "PAYSCALE_USD_IQD_RATE must be a positive number")
            }
            ConfigError::InvalidPageSize => {
                write!(f, "PAYSCALE_PAGE_SIZE must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidExchangeRate
            | ConfigError::InvalidPageSize => None,
        }
    }
}
