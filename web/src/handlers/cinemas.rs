//! Cinema, showtime, and seat availability endpoints.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use cinebook_core::entities::{SeatAvailability, Showtime};
use cinebook_core::providers::EmailSender;
use cinebook_core::usecase::{CinemaDetail, CinemaList};
use cinebook_core::Repositories;
use serde::Deserialize;

use super::PageQuery;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/cinemas?page=&limit=`
pub async fn list_cinemas<R, E>(
    State(state): State<Arc<AppState<R, E>>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<CinemaList>, AppError>
where
    R: Repositories,
    E: EmailSender + Clone + 'static,
{
    let list = state.cinemas.list(query.request()).await?;
    Ok(Json(list))
}

/// `GET /api/cinemas/:id`
pub async fn get_cinema<R, E>(
    State(state): State<Arc<AppState<R, E>>>,
    Path(id): Path<i64>,
) -> Result<Json<CinemaDetail>, AppError>
where
    R: Repositories,
    E: EmailSender + Clone + 'static,
{
    let detail = state.cinemas.detail(id).await?;
    Ok(Json(detail))
}

/// `GET /api/cinemas/:id/showtimes`
pub async fn list_showtimes<R, E>(
    State(state): State<Arc<AppState<R, E>>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Showtime>>, AppError>
where
    R: Repositories,
    E: EmailSender + Clone + 'static,
{
    let showtimes = state.showtimes.by_cinema(id).await?;
    Ok(Json(showtimes))
}

/// `?date=YYYY-MM-DD&time=HH:MM[:SS]` query for seat availability.
#[derive(Debug, Deserialize)]
pub struct SeatQuery {
    /// Calendar date of the showtime.
    pub date: String,
    /// Wall-clock start time of the showtime.
    pub time: String,
}

/// `GET /api/cinemas/:id/seats?date=&time=`
pub async fn seat_availability<R, E>(
    State(state): State<Arc<AppState<R, E>>>,
    Path(id): Path<i64>,
    Query(query): Query<SeatQuery>,
) -> Result<Json<Vec<SeatAvailability>>, AppError>
where
    R: Repositories,
    E: EmailSender + Clone + 'static,
{
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| AppError::bad_request("date must be formatted as YYYY-MM-DD"))?;
    let time = NaiveTime::parse_from_str(&query.time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(&query.time, "%H:%M"))
        .map_err(|_| AppError::bad_request("time must be formatted as HH:MM or HH:MM:SS"))?;

    let seats = state.showtimes.seat_availability(id, date, time).await?;
    Ok(Json(seats))
}
