//! Registration, OTP verification, login, and session validation.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::entities::{NewOtp, NewSession, NewUser, User};
use crate::error::{CoreError, Result};
use crate::providers::email::send_detached;
use crate::providers::EmailSender;
use crate::repository::AuthRepository;
use crate::validate::{validate_email, validate_password, validate_username};

/// Registration input.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    /// Desired login name.
    pub username: String,
    /// Email address to verify.
    pub email: String,
    /// Plaintext password, hashed before storage.
    pub password: String,
}

/// A freshly created session together with its owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthenticatedSession {
    /// Opaque bearer token.
    pub token: String,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
    /// The logged-in user.
    pub user: User,
}

/// Account lifecycle: register, verify by OTP, log in and out.
#[derive(Debug, Clone)]
pub struct AuthUsecase<R, E> {
    repo: R,
    email: E,
    config: AuthConfig,
}

impl<R, E> AuthUsecase<R, E>
where
    R: AuthRepository + Clone + Send + Sync + 'static,
    E: EmailSender + Clone + 'static,
{
    /// Creates a usecase with the default [`AuthConfig`].
    pub fn new(repo: R, email: E) -> Self {
        Self {
            repo,
            email,
            config: AuthConfig::default(),
        }
    }

    /// Overrides the configuration.
    #[must_use]
    pub fn with_config(mut self, config: AuthConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers a new account and emails a verification OTP.
    ///
    /// The OTP email is sent on a detached task; delivery failures are
    /// logged but never fail the registration.
    ///
    /// # Errors
    ///
    /// [`CoreError::Validation`] for malformed input,
    /// [`CoreError::UsernameTaken`] / [`CoreError::EmailTaken`] for
    /// duplicates, or a storage error.
    pub async fn register(&self, request: RegisterRequest) -> Result<User> {
        validate_username(&request.username)?;
        validate_email(&request.email)?;
        validate_password(&request.password)?;

        if self.repo.user_by_username(&request.username).await?.is_some() {
            return Err(CoreError::UsernameTaken);
        }
        if self.repo.user_by_email(&request.email).await?.is_some() {
            return Err(CoreError::EmailTaken);
        }

        let password_hash = hash_password(request.password, self.config.bcrypt_cost).await?;
        let user_id = self
            .repo
            .create_user(NewUser {
                username: request.username.clone(),
                email: request.email.clone(),
                password_hash,
            })
            .await?;

        self.issue_otp(user_id, &request.email, &request.username)
            .await?;

        self.repo
            .user_by_id(user_id)
            .await?
            .ok_or(CoreError::Internal)
    }

    /// Confirms the email address with an OTP code.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] for an unknown email,
    /// [`CoreError::EmailAlreadyVerified`] when there is nothing to verify,
    /// [`CoreError::OtpInvalid`] for a wrong, expired, or consumed code.
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<()> {
        let user = self
            .repo
            .user_by_email(email)
            .await?
            .ok_or(CoreError::NotFound { resource: "User" })?;
        if user.is_verified {
            return Err(CoreError::EmailAlreadyVerified);
        }

        let otp = self
            .repo
            .valid_otp(user.id, code)
            .await?
            .ok_or(CoreError::OtpInvalid)?;

        self.repo.mark_otp_used(otp.id).await?;
        self.repo.mark_user_verified(user.id).await?;
        Ok(())
    }

    /// Invalidates outstanding OTP codes and emails a fresh one.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] for an unknown email,
    /// [`CoreError::EmailAlreadyVerified`] when verification is done.
    pub async fn resend_otp(&self, email: &str) -> Result<()> {
        let user = self
            .repo
            .user_by_email(email)
            .await?
            .ok_or(CoreError::NotFound { resource: "User" })?;
        if user.is_verified {
            return Err(CoreError::EmailAlreadyVerified);
        }

        self.repo.invalidate_otps(user.id).await?;
        self.issue_otp(user.id, &user.email, &user.username).await
    }

    /// Checks credentials and opens a session.
    ///
    /// Unknown usernames and wrong passwords produce the same
    /// [`CoreError::InvalidCredentials`] so the response does not leak
    /// which accounts exist.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidCredentials`] or
    /// [`CoreError::EmailNotVerified`].
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthenticatedSession> {
        let user = self
            .repo
            .user_by_username(username)
            .await?
            .ok_or(CoreError::InvalidCredentials)?;

        let password_ok =
            verify_password(password.to_string(), user.password_hash.clone()).await?;
        if !password_ok {
            return Err(CoreError::InvalidCredentials);
        }
        if !user.is_verified {
            return Err(CoreError::EmailNotVerified);
        }

        let token = Uuid::new_v4().to_string();
        let expires_at = Utc::now() + self.config.session_ttl;
        self.repo
            .create_session(NewSession {
                user_id: user.id,
                token: token.clone(),
                expired_at: expires_at,
            })
            .await?;

        Ok(AuthenticatedSession {
            token,
            expires_at,
            user,
        })
    }

    /// Revokes the session holding `token`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the revocation cannot be persisted.
    pub async fn logout(&self, token: &str) -> Result<()> {
        self.repo.revoke_session(token).await
    }

    /// Resolves a bearer token to its user, rejecting expired or revoked
    /// sessions.
    ///
    /// # Errors
    ///
    /// [`CoreError::SessionInvalid`] for anything but a live session.
    pub async fn validate_token(&self, token: &str) -> Result<User> {
        let session = self
            .repo
            .session_by_token(token)
            .await?
            .ok_or(CoreError::SessionInvalid)?;

        if session.revoked_at.is_some() || session.expired_at <= Utc::now() {
            return Err(CoreError::SessionInvalid);
        }

        self.repo
            .user_by_id(session.user_id)
            .await?
            .ok_or(CoreError::SessionInvalid)
    }

    /// Stores a fresh OTP for `user_id` and emails it on a detached task.
    async fn issue_otp(&self, user_id: i64, email: &str, name: &str) -> Result<()> {
        let code = generate_otp_code();
        self.repo
            .create_otp(NewOtp {
                user_id,
                code: code.clone(),
                expired_at: Utc::now() + self.config.otp_ttl,
            })
            .await?;

        send_detached(
            self.email.clone(),
            email.to_string(),
            name.to_string(),
            "Email Verification - CineBook".to_string(),
            format!(
                "Hi {name},\n\nYour verification code is {code}. \
                 It expires in {} minutes.",
                self.config.otp_ttl.num_minutes()
            ),
        );
        Ok(())
    }
}

/// Six random decimal digits, zero-padded.
fn generate_otp_code() -> String {
    let mut rng = rand::thread_rng();
    format!("{:06}", rng.gen_range(0..1_000_000))
}

async fn hash_password(password: String, cost: u32) -> Result<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|_| CoreError::Internal)?
        .map_err(|err| {
            tracing::error!(error = %err, "password hashing failed");
            CoreError::Internal
        })
}

async fn verify_password(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|_| CoreError::Internal)?
        .map_err(|err| {
            tracing::error!(error = %err, "password verification failed");
            CoreError::Internal
        })
}
