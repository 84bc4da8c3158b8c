use crate::quiz::{ScoreBasis, TrustPolicy, DEFAULT_MIN_PHOTO_BYTES};
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
    pub quiz: QuizConfig,
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
        let format = match env::var("APP_LOG_FORMAT") {
            Ok(value) => LogFormat::parse(&value).ok_or(ConfigError::InvalidLogFormat(value))?,
            Err(_) => LogFormat::Compact,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, format },
            quiz: QuizConfig::from_env()?,
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Quiz knobs: share-link origin, question bank source, and scoring tables.
#[derive(Debug, Clone)]
pub struct QuizConfig {
    pub base_url: String,
    pub question_bank: Option<PathBuf>,
    pub trust: TrustPolicy,
    pub score_basis: ScoreBasis,
    pub photo_min_bytes: usize,
}

impl QuizConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url =
            env::var("SOULLINK_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let question_bank = env::var("SOULLINK_QUESTION_BANK")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let trust = match env::var("SOULLINK_TRUST_PROFILE") {
            Ok(profile) => TrustPolicy::from_profile(&profile)
                .ok_or(ConfigError::InvalidTrustProfile(profile))?,
            Err(_) => TrustPolicy::standard(),
        };

        let score_basis = match env::var("SOULLINK_SCORE_BASIS") {
            Ok(basis) => {
                ScoreBasis::parse(&basis).ok_or(ConfigError::InvalidScoreBasis(basis))?
            }
            Err(_) => ScoreBasis::default(),
        };

        let photo_min_bytes = match env::var("SOULLINK_PHOTO_MIN_BYTES") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidPhotoThreshold)?,
            Err(_) => DEFAULT_MIN_PHOTO_BYTES,
        };

        Ok(Self {
            base_url,
            question_bank,
            trust,
            score_basis,
            photo_min_bytes,
        })
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            question_bank: None,
            trust: TrustPolicy::standard(),
            score_basis: ScoreBasis::default(),
            photo_min_bytes: DEFAULT_MIN_PHOTO_BYTES,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLogFormat(String),
    InvalidTrustProfile(String),
    InvalidScoreBasis(String),
    InvalidPhotoThreshold,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT '{value}' must be compact or json")
            }
            ConfigError::InvalidTrustProfile(value) => write!(
                f,
                "SOULLINK_TRUST_PROFILE '{value}' must be one of standard, generous, cautious"
            ),
            ConfigError::InvalidScoreBasis(value) => write!(
                f,
                "SOULLINK_SCORE_BASIS '{value}' must be whole_pillar or answered_only"
            ),
            ConfigError::InvalidPhotoThreshold => {
                write!(f, "SOULLINK_PHOTO_MIN_BYTES must be a byte count")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
