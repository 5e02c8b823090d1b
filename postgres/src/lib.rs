//! # CineBook PostgreSQL backend
//!
//! [`PgRepositories`] implements every `cinebook-core` repository trait
//! over one shared [`PgPool`]. Cloning it clones the pool handle, so the
//! same value serves every usecase.
//!
//! Queries are runtime-bound (`sqlx::query` + manual row mapping) so the
//! workspace builds without a live `DATABASE_URL`. Schema migrations are
//! embedded from `./migrations` and applied with [`PgRepositories::migrate`].

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

mod auth;
mod booking;
mod cinema;
mod dashboard;
mod movie;
mod payment;
mod seat;

use cinebook_core::error::{CoreError, Result};
use sqlx::PgPool;

/// Shared handle implementing every repository trait against Postgres.
#[derive(Debug, Clone)]
pub struct PgRepositories {
    pool: PgPool,
}

impl PgRepositories {
    /// Wraps an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies all embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Database`] when a migration fails.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "migration failed");
                CoreError::Database(err.to_string())
            })
    }

    /// The underlying pool, e.g. for readiness probes.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps a sqlx error to the domain taxonomy, logging the detail.
pub(crate) fn db_err(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "database operation failed");
    CoreError::Database(err.to_string())
}
