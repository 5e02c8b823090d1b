//! Booking endpoints (bearer-token protected).

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cinebook_core::providers::EmailSender;
use cinebook_core::usecase::{BookingDetail, CreateBooking};
use cinebook_core::Repositories;
use serde::Deserialize;

use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::state::AppState;

/// Booking creation body.
#[derive(Debug, Deserialize)]
pub struct CreateBookingBody {
    /// Showtime to book.
    pub showtime_id: i64,
    /// Seats to hold.
    pub seat_ids: Vec<i64>,
    /// Intended payment method.
    pub payment_method_id: i64,
}

/// `POST /api/booking`
pub async fn create_booking<R, E>(
    State(state): State<Arc<AppState<R, E>>>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateBookingBody>,
) -> Result<(StatusCode, Json<BookingDetail>), AppError>
where
    R: Repositories,
    E: EmailSender + Clone + 'static,
{
    let detail = state
        .bookings
        .create(
            user.id,
            CreateBooking {
                showtime_id: body.showtime_id,
                seat_ids: body.seat_ids,
                payment_method_id: body.payment_method_id,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// `GET /api/user/bookings`
pub async fn user_bookings<R, E>(
    State(state): State<Arc<AppState<R, E>>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<BookingDetail>>, AppError>
where
    R: Repositories,
    E: EmailSender + Clone + 'static,
{
    let details = state.bookings.user_bookings(user.id).await?;
    Ok(Json(details))
}
