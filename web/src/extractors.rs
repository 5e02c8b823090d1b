//! Request extractors for bearer-token authentication.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use cinebook_core::entities::User;
use cinebook_core::providers::EmailSender;
use cinebook_core::Repositories;

use crate::error::AppError;
use crate::state::AppState;

/// The raw token from an `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?
            .to_str()
            .map_err(|_| AppError::unauthorized("Invalid Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Authorization header must use Bearer scheme"))?
            .trim();
        if token.is_empty() {
            return Err(AppError::unauthorized("Empty bearer token"));
        }
        Ok(Self(token.to_string()))
    }
}

/// The user behind a live session. Rejects the request with 401 when the
/// token is missing, expired, or revoked.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<R, E> FromRequestParts<Arc<AppState<R, E>>> for CurrentUser
where
    R: Repositories,
    E: EmailSender + Clone + 'static,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<R, E>>,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        let user = state.auth.validate_token(&token).await?;
        Ok(Self(user))
    }
}
