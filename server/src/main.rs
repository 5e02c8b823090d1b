//! CineBook service binary: wires Postgres and email delivery into the
//! HTTP layer and serves it.

mod config;

use std::sync::Arc;

use anyhow::Context;
use cinebook_core::providers::{ConsoleEmailSender, EmailSender, HttpEmailSender};
use cinebook_postgres::PgRepositories;
use cinebook_web::state::AppState;
use cinebook_web::build_router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment wins either way.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to Postgres")?;

    let repo = PgRepositories::new(pool);
    repo.migrate().await.context("failed to run migrations")?;

    match config.email_api.clone() {
        Some(api) => {
            let email = HttpEmailSender::new(api.url, api.key);
            serve(config, repo, email).await
        }
        None => {
            tracing::warn!("EMAIL_API_URL not set, emails will be logged instead of sent");
            serve(config, repo, ConsoleEmailSender).await
        }
    }
}

async fn serve<E>(config: Config, repo: PgRepositories, email: E) -> anyhow::Result<()>
where
    E: EmailSender + Clone + 'static,
{
    let state = Arc::new(AppState::new(repo, email, config.app));
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "listening");

    axum::serve(listener, router)
        .await
        .context("server exited with an error")
}
