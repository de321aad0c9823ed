use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::penalty::{LossPolicy, PenaltyPolicy, PolicyError, UnassignedPool, VariancePolicy};

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
    pub penalty: PenaltyPolicy,
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
        let log_format = match env::var("APP_LOG_FORMAT") {
            Ok(value) => LogFormat::parse(&value)?,
            Err(_) => LogFormat::Compact,
        };

        let penalty = load_penalty_policy()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                log_format,
            },
            penalty,
        })
    }
}

/// Preset named by `STTK_DISTRIBUTION` (or a JSON file from
/// `STTK_POLICY_FILE`), then individual overrides.
fn load_penalty_policy() -> Result<PenaltyPolicy, ConfigError> {
    let mut policy = match env::var("STTK_POLICY_FILE") {
        Ok(path) => read_policy_file(PathBuf::from(path))?,
        Err(_) => {
            let name = env::var("STTK_DISTRIBUTION").unwrap_or_else(|_| "latest".to_string());
            PenaltyPolicy::preset(&name).ok_or(ConfigError::InvalidPolicyValue {
                key: "STTK_DISTRIBUTION",
                value: name,
            })?
        }
    };

    if let Some(loss) = policy_override::<LossPolicy>("STTK_LOSS_POLICY")? {
        policy.loss = loss;
    }
    if let Some(variance) = policy_override::<VariancePolicy>("STTK_VARIANCE_POLICY")? {
        policy.variance = variance;
    }
    if let Some(unassigned) = policy_override::<UnassignedPool>("STTK_UNASSIGNED_POOL")? {
        policy.unassigned = unassigned;
    }

    policy.validate().map_err(ConfigError::InvalidPolicy)?;
    Ok(policy)
}

fn policy_override<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidPolicyValue { key, value }),
        Err(_) => Ok(None),
    }
}

fn read_policy_file(path: PathBuf) -> Result<PenaltyPolicy, ConfigError> {
    let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::PolicyFile {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::PolicyFormat { path, source })
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            _ => Err(ConfigError::InvalidLogFormat(value.to_string())),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidLogFormat(String),
    InvalidPolicyValue {
        key: &'static str,
        value: String,
    },
    PolicyFile {
        path: PathBuf,
        source: std::io::Error,
    },
    PolicyFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidPolicy(PolicyError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'pretty', got '{value}'")
            }
            ConfigError::InvalidPolicyValue { key, value } => {
                write!(f, "{key} has unsupported value '{value}'")
            }
            ConfigError::PolicyFile { path, .. } => {
                write!(f, "unable to read penalty policy file {}", path.display())
            }
            ConfigError::PolicyFormat { path, .. } => {
                write!(f, "penalty policy file {} is not valid JSON", path.display())
            }
            ConfigError::InvalidPolicy(err) => write!(f, "invalid penalty policy: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidLogFormat(_)
            | ConfigError::InvalidPolicyValue { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::PolicyFile { source, .. } => Some(source),
            ConfigError::PolicyFormat { source, .. } => Some(source),
            ConfigError::InvalidPolicy(err) => Some(err),
        }
    }
}
