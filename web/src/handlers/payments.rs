//! Payment endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use cinebook_core::entities::{Payment, PaymentMethod};
use cinebook_core::providers::EmailSender;
use cinebook_core::usecase::PayRequest;
use cinebook_core::Repositories;
use serde::Deserialize;

use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::state::AppState;

/// `GET /api/payment-methods`
pub async fn list_methods<R, E>(
    State(state): State<Arc<AppState<R, E>>>,
) -> Result<Json<Vec<PaymentMethod>>, AppError>
where
    R: Repositories,
    E: EmailSender + Clone + 'static,
{
    let methods = state.payments.methods().await?;
    Ok(Json(methods))
}

/// Payment body.
#[derive(Debug, Deserialize)]
pub struct PayBody {
    /// Booking to settle.
    pub booking_id: i64,
    /// Method to charge.
    pub payment_method_id: i64,
    /// Free-form details stored with the payment.
    pub payment_details: Option<serde_json::Value>,
}

/// `POST /api/pay` (bearer-token protected)
pub async fn process_payment<R, E>(
    State(state): State<Arc<AppState<R, E>>>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<PayBody>,
) -> Result<Json<Payment>, AppError>
where
    R: Repositories,
    E: EmailSender + Clone + 'static,
{
    let payment = state
        .payments
        .pay(
            user.id,
            PayRequest {
                booking_id: body.booking_id,
                payment_method_id: body.payment_method_id,
                details: body.payment_details,
            },
        )
        .await?;
    Ok(Json(payment))
}
