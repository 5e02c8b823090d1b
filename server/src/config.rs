//! Environment-driven configuration for the binary.

use std::time::Duration;

use anyhow::Context;
use cinebook_web::state::AppConfig;

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string.
    pub database_url: String,
    /// Socket address to bind, e.g. `0.0.0.0:8080`.
    pub listen_addr: String,
    /// Maximum Postgres connections in the pool.
    pub max_connections: u32,
    /// Email delivery endpoint; console logging when unset.
    pub email_api: Option<EmailApi>,
    /// Settings handed to the web layer.
    pub app: AppConfig,
}

/// Credentials for the outbound email service.
#[derive(Debug, Clone)]
pub struct EmailApi {
    /// Endpoint receiving the email payload.
    pub url: String,
    /// Value for the `x-api-key` header.
    pub key: String,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// `DATABASE_URL` is required; everything else has a default. Email
    /// delivery needs both `EMAIL_API_URL` and `EMAIL_API_KEY`, otherwise
    /// verification codes are only logged.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let listen_addr =
            std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_owned());
        let max_connections = env_parse("DB_MAX_CONNECTIONS", 10)?;

        let email_api = match (
            std::env::var("EMAIL_API_URL").ok(),
            std::env::var("EMAIL_API_KEY").ok(),
        ) {
            (Some(url), Some(key)) => Some(EmailApi { url, key }),
            (None, None) => None,
            _ => anyhow::bail!("EMAIL_API_URL and EMAIL_API_KEY must be set together"),
        };

        let mut app = AppConfig::default();
        let deadline_ms: u64 = env_parse(
            "DASHBOARD_DEADLINE_MS",
            u64::try_from(app.dashboard_deadline.as_millis()).unwrap_or(u64::MAX),
        )?;
        app.dashboard_deadline = Duration::from_millis(deadline_ms);
        app.dashboard_limit = env_parse("DASHBOARD_LIMIT", app.dashboard_limit)?;

        Ok(Self {
            database_url,
            listen_addr,
            max_connections,
            email_api,
            app,
        })
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{name} must be a valid number, got {raw:?}")),
        Err(_) => Ok(default),
    }
}
