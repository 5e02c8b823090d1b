//! Admin dashboard endpoints.
//!
//! Both endpoints produce the same [`DashboardSummary`]; they differ in how
//! the three reads are scheduled. The serial variant runs them one after
//! another, the concurrent variant fans them out and gathers the results.
//! Either way the shared deadline applies to the request as a whole.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use cinebook_core::providers::EmailSender;
use cinebook_core::usecase::DashboardSummary;
use cinebook_core::Repositories;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

/// `?limit=` override for the number of recent bookings returned.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// Number of recent bookings to include, defaults to the server setting.
    pub limit: Option<i64>,
}

/// `GET /api/dashboard`
pub async fn dashboard_serial<R, E>(
    State(state): State<Arc<AppState<R, E>>>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardSummary>, AppError>
where
    R: Repositories,
    E: EmailSender + Clone + 'static,
{
    let limit = query.limit.unwrap_or(state.dashboard_limit);
    let summary = state.dashboard.dashboard_serial(limit).await?;
    Ok(Json(summary))
}

/// `GET /api/dashboard/concurrent`
pub async fn dashboard_concurrent<R, E>(
    State(state): State<Arc<AppState<R, E>>>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardSummary>, AppError>
where
    R: Repositories,
    E: EmailSender + Clone + 'static,
{
    let limit = query.limit.unwrap_or(state.dashboard_limit);
    let summary = state.dashboard.dashboard_concurrent(limit).await?;
    Ok(Json(summary))
}
