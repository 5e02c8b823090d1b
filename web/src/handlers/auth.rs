//! Registration, verification, login, and logout endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use cinebook_core::entities::User;
use cinebook_core::providers::EmailSender;
use cinebook_core::usecase::RegisterRequest;
use cinebook_core::Repositories;
use serde::{Deserialize, Serialize};

use super::MessageResponse;
use crate::error::AppError;
use crate::extractors::BearerToken;
use crate::state::AppState;

/// Registration body.
#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    /// Desired login name.
    pub username: String,
    /// Email address to verify.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Public view of a user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// Primary key.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Whether the email was verified.
    pub is_verified: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_verified: user.is_verified,
        }
    }
}

/// OTP verification body.
#[derive(Debug, Deserialize)]
pub struct VerifyOtpBody {
    /// Account email.
    pub email: String,
    /// Six-digit code from the verification email.
    pub otp: String,
}

/// OTP resend body.
#[derive(Debug, Deserialize)]
pub struct ResendOtpBody {
    /// Account email.
    pub email: String,
}

/// Login body.
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    /// Login name.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
    /// The logged-in user.
    pub user: UserResponse,
}

/// `POST /api/register`
pub async fn register<R, E>(
    State(state): State<Arc<AppState<R, E>>>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<UserResponse>), AppError>
where
    R: Repositories,
    E: EmailSender + Clone + 'static,
{
    let user = state
        .auth
        .register(RegisterRequest {
            username: body.username,
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// `POST /api/verify-otp`
pub async fn verify_otp<R, E>(
    State(state): State<Arc<AppState<R, E>>>,
    Json(body): Json<VerifyOtpBody>,
) -> Result<Json<MessageResponse>, AppError>
where
    R: Repositories,
    E: EmailSender + Clone + 'static,
{
    state.auth.verify_otp(&body.email, &body.otp).await?;
    Ok(Json(MessageResponse::new("Email verified successfully")))
}

/// `POST /api/resend-otp`
pub async fn resend_otp<R, E>(
    State(state): State<Arc<AppState<R, E>>>,
    Json(body): Json<ResendOtpBody>,
) -> Result<Json<MessageResponse>, AppError>
where
    R: Repositories,
    E: EmailSender + Clone + 'static,
{
    state.auth.resend_otp(&body.email).await?;
    Ok(Json(MessageResponse::new("Verification code sent")))
}

/// `POST /api/login`
pub async fn login<R, E>(
    State(state): State<Arc<AppState<R, E>>>,
    Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>, AppError>
where
    R: Repositories,
    E: EmailSender + Clone + 'static,
{
    let session = state.auth.login(&body.username, &body.password).await?;
    Ok(Json(LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
        user: session.user.into(),
    }))
}

/// `POST /api/logout` (bearer-token protected)
pub async fn logout<R, E>(
    State(state): State<Arc<AppState<R, E>>>,
    BearerToken(token): BearerToken,
) -> Result<Json<MessageResponse>, AppError>
where
    R: Repositories,
    E: EmailSender + Clone + 'static,
{
    state.auth.logout(&token).await?;
    Ok(Json(MessageResponse::new("Logged out")))
}
