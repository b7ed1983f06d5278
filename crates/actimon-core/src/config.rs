//! Configuration module
//!
//! Configuration is read once at process start from the environment (and an optional
//! `.env` file), validated, and then passed by value into every component constructor.
//! Nothing in the workspace reads the environment after startup.

use std::env;
use std::time::Duration;

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const STATEMENT_TIMEOUT_MS: u64 = 5_000;
const MAX_UPLOAD_SIZE_MB: usize = 1024;
const REQUEST_TIMEOUT_SECS: u64 = 600;
const SMTP_PORT: u16 = 587;
const INFLUXDB_PORT: u16 = 8086;
const INFLUXDB_WRITE_TIMEOUT_SECS: u64 = 300;
const QUEUE_PUBLISH_TIMEOUT_SECS: u64 = 10;
const MIN_SECRET_LEN: usize = 32;

/// Registration tokens expire this many days after issuance.
pub const TOKEN_TTL_DAYS: i64 = 7;

const DEFAULT_REGISTRATION_URL_BASE: &str = "http://0.0.0.0:3000/auth/register";
const INFLUXDB_PRECISIONS: [&str; 4] = ["ns", "us", "ms", "s"];

/// Where registration tokens and users are persisted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub max_upload_size_bytes: usize,
    pub request_timeout_secs: u64,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub db_statement_timeout_ms: u64,
}

/// Token signing and invitation link settings
#[derive(Clone, Debug)]
pub struct TokenConfig {
    pub registration_secret: String,
    pub registration_url_base: String,
}

/// Outbound email settings
#[derive(Clone, Debug)]
pub struct EmailConfig {
    pub enabled: bool,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
    pub smtp_tls: bool,
}

/// Time-series store write endpoint
#[derive(Clone, Debug)]
pub struct InfluxDbConfig {
    pub url: String,
    pub token: String,
    pub org: String,
    pub bucket: String,
    pub precision: String,
    pub write_timeout_secs: u64,
}

impl InfluxDbConfig {
    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }
}

/// Message queue for ingestion announcements. Publishing is disabled without a queue URL.
#[derive(Clone, Debug)]
pub struct QueueConfig {
    pub sqs_queue_url: Option<String>,
    pub aws_region: Option<String>,
    pub sqs_endpoint_url: Option<String>,
    pub publish_timeout_secs: u64,
}

impl QueueConfig {
    pub fn publish_timeout(&self) -> Duration {
        Duration::from_secs(self.publish_timeout_secs)
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub tokens: TokenConfig,
    pub email: EmailConfig,
    pub influxdb: InfluxDbConfig,
    pub queue: QueueConfig,
}

impl Config {
    /// Load from `.env` (if present) and the process environment, then validate.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(var: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse_or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());
        let flag = |key: &str, default: bool| {
            var(key)
                .map(|s| s.trim().to_lowercase())
                .and_then(|s| s.parse().ok())
                .unwrap_or(default)
        };
        let non_empty = |key: &str| var(key).filter(|s| !s.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins = parse_or("CORS_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let store_backend = match parse_or("STORE_BACKEND", "postgres").to_lowercase().as_str() {
            "postgres" | "postgresql" => StoreBackend::Postgres,
            "memory" => StoreBackend::Memory,
            other => {
                return Err(anyhow::anyhow!(
                    "STORE_BACKEND must be 'postgres' or 'memory', got '{}'",
                    other
                ))
            }
        };

        let max_upload_size_mb = parse_or("MAX_UPLOAD_SIZE_MB", &MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let base = BaseConfig {
            server_port: parse_or("PORT", &SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins,
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            request_timeout_secs: parse_or("REQUEST_TIMEOUT_SECS", &REQUEST_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(REQUEST_TIMEOUT_SECS),
            store_backend,
            database_url: non_empty("DATABASE_URL"),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", &MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: parse_or("DB_TIMEOUT_SECONDS", &CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            db_statement_timeout_ms: parse_or(
                "DB_STATEMENT_TIMEOUT_MS",
                &STATEMENT_TIMEOUT_MS.to_string(),
            )
            .parse()
            .unwrap_or(STATEMENT_TIMEOUT_MS),
        };

        let tokens = TokenConfig {
            registration_secret: var("REGISTRATION_SECRET").ok_or_else(|| {
                anyhow::anyhow!("REGISTRATION_SECRET must be set for token signing")
            })?,
            registration_url_base: parse_or("REGISTRATION_URL_BASE", DEFAULT_REGISTRATION_URL_BASE),
        };

        let email = EmailConfig {
            enabled: flag("EMAIL_ENABLED", false),
            smtp_host: non_empty("SMTP_HOST"),
            smtp_port: var("SMTP_PORT")
                .and_then(|s| s.parse().ok())
                .filter(|&p| p > 0)
                .unwrap_or(SMTP_PORT),
            smtp_user: non_empty("SMTP_USER"),
            smtp_password: non_empty("SMTP_PASSWORD"),
            smtp_from: non_empty("SMTP_FROM"),
            smtp_tls: flag("SMTP_TLS", true),
        };

        let influx_url = match non_empty("INFLUXDB_URL") {
            Some(url) => url,
            None => {
                let host = non_empty("INFLUXDB_HOST").ok_or_else(|| {
                    anyhow::anyhow!("INFLUXDB_URL or INFLUXDB_HOST must be set")
                })?;
                let port = parse_or("INFLUXDB_PORT", &INFLUXDB_PORT.to_string());
                format!("http://{}:{}", host, port)
            }
        };

        let influxdb = InfluxDbConfig {
            url: influx_url.trim_end_matches('/').to_string(),
            token: non_empty("INFLUXDB_ADMIN_TOKEN")
                .ok_or_else(|| anyhow::anyhow!("INFLUXDB_ADMIN_TOKEN must be set"))?,
            org: non_empty("INFLUXDB_ORG").ok_or_else(|| anyhow::anyhow!("INFLUXDB_ORG must be set"))?,
            bucket: non_empty("INFLUXDB_BUCKET")
                .ok_or_else(|| anyhow::anyhow!("INFLUXDB_BUCKET must be set"))?,
            precision: parse_or("INFLUXDB_PRECISION", "ms").to_lowercase(),
            write_timeout_secs: parse_or(
                "INFLUXDB_WRITE_TIMEOUT_SECS",
                &INFLUXDB_WRITE_TIMEOUT_SECS.to_string(),
            )
            .parse()
            .unwrap_or(INFLUXDB_WRITE_TIMEOUT_SECS),
        };

        let queue = QueueConfig {
            sqs_queue_url: non_empty("SQS_QUEUE_URL"),
            aws_region: non_empty("AWS_REGION"),
            sqs_endpoint_url: non_empty("SQS_ENDPOINT_URL"),
            publish_timeout_secs: parse_or(
                "QUEUE_PUBLISH_TIMEOUT_SECS",
                &QUEUE_PUBLISH_TIMEOUT_SECS.to_string(),
            )
            .parse()
            .unwrap_or(QUEUE_PUBLISH_TIMEOUT_SECS),
        };

        let config = Config {
            base,
            tokens,
            email,
            influxdb,
            queue,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.tokens.registration_secret.len() < MIN_SECRET_LEN {
            return Err(anyhow::anyhow!(
                "REGISTRATION_SECRET must be at least {} characters long",
                MIN_SECRET_LEN
            ));
        }

        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        match self.base.store_backend {
            StoreBackend::Postgres => match self.base.database_url.as_deref() {
                Some(url) if url.starts_with("postgres://") || url.starts_with("postgresql://") => {}
                Some(_) => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be a valid PostgreSQL connection string"
                    ))
                }
                None => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be set when STORE_BACKEND=postgres"
                    ))
                }
            },
            StoreBackend::Memory => {
                if self.is_production() {
                    return Err(anyhow::anyhow!(
                        "STORE_BACKEND=memory is not allowed in production"
                    ));
                }
            }
        }

        if self.email.enabled && (self.email.smtp_host.is_none() || self.email.smtp_from.is_none())
        {
            return Err(anyhow::anyhow!(
                "EMAIL_ENABLED=true requires SMTP_HOST and SMTP_FROM to be set"
            ));
        }

        if !INFLUXDB_PRECISIONS.contains(&self.influxdb.precision.as_str()) {
            return Err(anyhow::anyhow!(
                "INFLUXDB_PRECISION must be one of {:?}",
                INFLUXDB_PRECISIONS
            ));
        }

        if self.influxdb.write_timeout_secs == 0 || self.queue.publish_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "INFLUXDB_WRITE_TIMEOUT_SECS and QUEUE_PUBLISH_TIMEOUT_SECS must be positive"
            ));
        }

        Ok(())
    }
}
