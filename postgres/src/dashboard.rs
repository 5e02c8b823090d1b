//! `DashboardRepository` over Postgres.
//!
//! These three reads are the ones the dashboard aggregator fans out. Each
//! is a single statement, so dropping the future (on abort or deadline)
//! releases the connection back to the pool without side effects.

use std::future::Future;

use cinebook_core::entities::{Booking, PriceStats};
use cinebook_core::error::Result;
use cinebook_core::repository::DashboardRepository;
use sqlx::Row;

use crate::booking::map_booking;
use crate::{db_err, PgRepositories};

impl DashboardRepository for PgRepositories {
    fn latest_bookings(&self, limit: i64) -> impl Future<Output = Result<Vec<Booking>>> + Send {
        async move {
            let rows = sqlx::query(
                "SELECT id, user_id, showtime_id, status, total_amount, created_at \
                 FROM bookings ORDER BY created_at DESC, id DESC LIMIT $1",
            )
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
            rows.iter()
                .map(map_booking)
                .collect::<std::result::Result<_, sqlx::Error>>()
                .map_err(db_err)
        }
    }

    fn booking_count(&self) -> impl Future<Output = Result<i64>> + Send {
        async move {
            let row = sqlx::query("SELECT COUNT(*) AS count FROM bookings")
                .fetch_one(&self.pool)
                .await
                .map_err(db_err)?;
            row.try_get("count").map_err(db_err)
        }
    }

    fn revenue_stats(&self) -> impl Future<Output = Result<PriceStats>> + Send {
        async move {
            let row = sqlx::query(
                "SELECT COALESCE(MIN(total_amount), 0)::DOUBLE PRECISION AS min, \
                        COALESCE(MAX(total_amount), 0)::DOUBLE PRECISION AS max, \
                        COALESCE(AVG(total_amount), 0)::DOUBLE PRECISION AS avg \
                 FROM bookings",
            )
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
            Ok(PriceStats {
                min: row.try_get("min").map_err(db_err)?,
                max: row.try_get("max").map_err(db_err)?,
                avg: row.try_get("avg").map_err(db_err)?,
            })
        }
    }
}
