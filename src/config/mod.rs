use std::collections::BTreeSet;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

const DEV_JWT_SECRET: &str = "invigilator-portal-development-secret";
const DEFAULT_ISSUERS: &str = "StarParth Technologies Pvt Ltd,Netparam Technologies Pvt Ltd";

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
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub documents: DocumentConfig,
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
        let log_format = LogFormat::from_str(
            &env::var("APP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
        );

        let database_path = env::var("APP_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("invigilator.db"));

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                log_format,
            },
            storage: StorageConfig { database_path },
            auth: AuthConfig::from_env(environment)?,
            documents: DocumentConfig::from_env()?,
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
    pub log_format: LogFormat,
}

/// Output shape of the log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Compact,
        }
    }
}

/// Location of the embedded candidate store.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub database_path: PathBuf,
}

impl StorageConfig {
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == ":memory:"
    }
}

/// Session signing and role assignment.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub admin_emails: BTreeSet<String>,
}

impl AuthConfig {
    fn from_env(environment: AppEnvironment) -> Result<Self, ConfigError> {
        let jwt_secret = match env::var("APP_JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if environment == AppEnvironment::Production => {
                return Err(ConfigError::MissingJwtSecret)
            }
            _ => DEV_JWT_SECRET.to_string(),
        };

        let token_ttl_hours = env::var("APP_TOKEN_TTL_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|hours| *hours > 0)
            .ok_or(ConfigError::InvalidTokenTtl)?;

        let admin_emails = env::var("APP_ADMIN_EMAILS")
            .map(|raw| split_list(&raw).map(|email| email.to_ascii_lowercase()).collect())
            .unwrap_or_default();

        Ok(Self {
            jwt_secret,
            token_ttl_hours,
            admin_emails,
        })
    }
}

/// Parties and amounts printed on the generated documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentConfig {
    pub issuers: Vec<String>,
    pub exam_authority: String,
    pub certification_fee: u32,
}

impl DocumentConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let issuers: Vec<String> = split_list(
            &env::var("APP_DOCUMENT_ISSUERS").unwrap_or_else(|_| DEFAULT_ISSUERS.to_string()),
        )
        .map(str::to_string)
        .collect();
        if issuers.is_empty() {
            return Err(ConfigError::MissingIssuers);
        }

        let exam_authority =
            env::var("APP_EXAM_AUTHORITY").unwrap_or_else(|_| "NETCOM/C-DAC".to_string());

        let certification_fee = env::var("APP_CERTIFICATION_FEE")
            .unwrap_or_else(|_| "2000".to_string())
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidCertificationFee)?;

        Ok(Self {
            issuers,
            exam_authority,
            certification_fee,
        })
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            issuers: split_list(DEFAULT_ISSUERS).map(str::to_string).collect(),
            exam_authority: "NETCOM/C-DAC".to_string(),
            certification_fee: 2000,
        }
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|item| !item.is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    MissingJwtSecret,
    InvalidTokenTtl,
    MissingIssuers,
    InvalidCertificationFee,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::MissingJwtSecret => {
                write!(f, "APP_JWT_SECRET must be set in production")
            }
            ConfigError::InvalidTokenTtl => {
                write!(f, "APP_TOKEN_TTL_HOURS must be a positive integer")
            }
            ConfigError::MissingIssuers => {
                write!(f, "APP_DOCUMENT_ISSUERS must name at least one company")
            }
            ConfigError::InvalidCertificationFee => {
                write!(f, "APP_CERTIFICATION_FEE must be a whole number of rupees")
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_LOG_FORMAT",
            "APP_DATABASE_PATH",
            "APP_JWT_SECRET",
            "APP_TOKEN_TTL_HOURS",
            "APP_ADMIN_EMAILS",
            "APP_DOCUMENT_ISSUERS",
            "APP_EXAM_AUTHORITY",
            "APP_CERTIFICATION_FEE",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.log_format, LogFormat::Compact);
        assert_eq!(config.storage.database_path, PathBuf::from("invigilator.db"));
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert!(config.auth.admin_emails.is_empty());
        assert_eq!(config.documents, DocumentConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn production_requires_jwt_secret() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        let err = AppConfig::load().expect_err("secret is mandatory");
        assert!(matches!(err, ConfigError::MissingJwtSecret));

        env::set_var("APP_JWT_SECRET", "s3cret");
        let config = AppConfig::load().expect("config loads with secret");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.auth.jwt_secret, "s3cret");
        reset_env();
    }

    #[test]
    fn admin_emails_are_normalized() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ADMIN_EMAILS", " Admin@Portal.in, ,ops@portal.in ");
        let config = AppConfig::load().expect("config loads");
        let admins: Vec<_> = config.auth.admin_emails.iter().cloned().collect();
        assert_eq!(admins, vec!["admin@portal.in", "ops@portal.in"]);
        reset_env();
    }

    #[test]
    fn rejects_non_positive_token_ttl() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_TOKEN_TTL_HOURS", "0");
        let err = AppConfig::load().expect_err("ttl must be positive");
        assert!(matches!(err, ConfigError::InvalidTokenTtl));
        reset_env();
    }

    #[test]
    fn in_memory_database_path_is_detected() {
        let storage = StorageConfig {
            database_path: PathBuf::from(":memory:"),
        };
        assert!(storage.is_in_memory());
    }
}
