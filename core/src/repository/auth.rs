//! Storage contract for users, OTP codes, and sessions.

use std::future::Future;

use crate::entities::{NewOtp, NewSession, NewUser, Otp, Session, User};
use crate::error::Result;

/// Persistence operations backing the authentication usecase.
pub trait AuthRepository: Send + Sync {
    /// Inserts a user and returns its id.
    fn create_user(&self, user: NewUser) -> impl Future<Output = Result<i64>> + Send;

    /// Looks a user up by primary key.
    fn user_by_id(&self, id: i64) -> impl Future<Output = Result<Option<User>>> + Send;

    /// Looks a user up by unique username.
    fn user_by_username(&self, username: &str)
    -> impl Future<Output = Result<Option<User>>> + Send;

    /// Looks a user up by unique email.
    fn user_by_email(&self, email: &str) -> impl Future<Output = Result<Option<User>>> + Send;

    /// Flags the user's email as verified.
    fn mark_user_verified(&self, user_id: i64) -> impl Future<Output = Result<()>> + Send;

    /// Stores a freshly issued OTP and returns its id.
    fn create_otp(&self, otp: NewOtp) -> impl Future<Output = Result<i64>> + Send;

    /// Finds an unused, unexpired OTP matching `code` for `user_id`.
    fn valid_otp(
        &self,
        user_id: i64,
        code: &str,
    ) -> impl Future<Output = Result<Option<Otp>>> + Send;

    /// Consumes an OTP so it cannot be replayed.
    fn mark_otp_used(&self, otp_id: i64) -> impl Future<Output = Result<()>> + Send;

    /// Invalidates every outstanding OTP for `user_id` (used before reissue).
    fn invalidate_otps(&self, user_id: i64) -> impl Future<Output = Result<()>> + Send;

    /// Stores a new session and returns its id.
    fn create_session(&self, session: NewSession) -> impl Future<Output = Result<i64>> + Send;

    /// Looks a session up by its bearer token.
    fn session_by_token(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Option<Session>>> + Send;

    /// Revokes the session holding `token`. A no-op for unknown tokens.
    fn revoke_session(&self, token: &str) -> impl Future<Output = Result<()>> + Send;
}
