//! `AuthRepository` over Postgres.

use std::future::Future;

use cinebook_core::entities::{NewOtp, NewSession, NewUser, Otp, Session, User};
use cinebook_core::error::{CoreError, Result};
use cinebook_core::repository::AuthRepository;
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::{db_err, PgRepositories};

fn map_user(row: &PgRow) -> std::result::Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        is_verified: row.try_get("is_verified")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_session(row: &PgRow) -> std::result::Result<Session, sqlx::Error> {
    Ok(Session {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        token: row.try_get("token")?,
        expired_at: row.try_get("expired_at")?,
        revoked_at: row.try_get("revoked_at")?,
        created_at: row.try_get("created_at")?,
    })
}

fn map_otp(row: &PgRow) -> std::result::Result<Otp, sqlx::Error> {
    Ok(Otp {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        code: row.try_get("code")?,
        expired_at: row.try_get("expired_at")?,
        is_used: row.try_get("is_used")?,
        created_at: row.try_get("created_at")?,
    })
}

const USER_COLUMNS: &str =
    "id, username, email, password_hash, is_verified, created_at, updated_at";

impl AuthRepository for PgRepositories {
    fn create_user(&self, user: NewUser) -> impl Future<Output = Result<i64>> + Send {
        async move {
            let row = sqlx::query(
                "INSERT INTO users (username, email, password_hash) \
                 VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| match &err {
                // The usecase pre-checks duplicates; the unique constraints
                // are the last line of defense against races.
                sqlx::Error::Database(db) if db.constraint() == Some("users_username_key") => {
                    CoreError::UsernameTaken
                }
                sqlx::Error::Database(db) if db.constraint() == Some("users_email_key") => {
                    CoreError::EmailTaken
                }
                _ => db_err(err),
            })?;
            row.try_get("id").map_err(db_err)
        }
    }

    fn user_by_id(&self, id: i64) -> impl Future<Output = Result<Option<User>>> + Send {
        async move {
            sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?
                .map(|row| map_user(&row))
                .transpose()
                .map_err(db_err)
        }
    }

    fn user_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>>> + Send {
        async move {
            sqlx::query(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
            ))
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(|row| map_user(&row))
            .transpose()
            .map_err(db_err)
        }
    }

    fn user_by_email(&self, email: &str) -> impl Future<Output = Result<Option<User>>> + Send {
        async move {
            sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?
                .map(|row| map_user(&row))
                .transpose()
                .map_err(db_err)
        }
    }

    fn mark_user_verified(&self, user_id: i64) -> impl Future<Output = Result<()>> + Send {
        async move {
            sqlx::query("UPDATE users SET is_verified = TRUE, updated_at = NOW() WHERE id = $1")
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(db_err)?;
            Ok(())
        }
    }

    fn create_otp(&self, otp: NewOtp) -> impl Future<Output = Result<i64>> + Send {
        async move {
            let row = sqlx::query(
                "INSERT INTO otps (user_id, code, expired_at) \
                 VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(otp.user_id)
            .bind(&otp.code)
            .bind(otp.expired_at)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
            row.try_get("id").map_err(db_err)
        }
    }

    fn valid_otp(
        &self,
        user_id: i64,
        code: &str,
    ) -> impl Future<Output = Result<Option<Otp>>> + Send {
        async move {
            sqlx::query(
                "SELECT id, user_id, code, expired_at, is_used, created_at FROM otps \
                 WHERE user_id = $1 AND code = $2 AND is_used = FALSE AND expired_at > NOW() \
                 ORDER BY id DESC LIMIT 1",
            )
            .bind(user_id)
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(|row| map_otp(&row))
            .transpose()
            .map_err(db_err)
        }
    }

    fn mark_otp_used(&self, otp_id: i64) -> impl Future<Output = Result<()>> + Send {
        async move {
            sqlx::query("UPDATE otps SET is_used = TRUE WHERE id = $1")
                .bind(otp_id)
                .execute(&self.pool)
                .await
                .map_err(db_err)?;
            Ok(())
        }
    }

    fn invalidate_otps(&self, user_id: i64) -> impl Future<Output = Result<()>> + Send {
        async move {
            sqlx::query("UPDATE otps SET is_used = TRUE WHERE user_id = $1 AND is_used = FALSE")
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(db_err)?;
            Ok(())
        }
    }

    fn create_session(&self, session: NewSession) -> impl Future<Output = Result<i64>> + Send {
        async move {
            let row = sqlx::query(
                "INSERT INTO sessions (user_id, token, expired_at) \
                 VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(session.user_id)
            .bind(&session.token)
            .bind(session.expired_at)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
            row.try_get("id").map_err(db_err)
        }
    }

    fn session_by_token(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Option<Session>>> + Send {
        async move {
            sqlx::query(
                "SELECT id, user_id, token, expired_at, revoked_at, created_at \
                 FROM sessions WHERE token = $1",
            )
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(|row| map_session(&row))
            .transpose()
            .map_err(db_err)
        }
    }

    fn revoke_session(&self, token: &str) -> impl Future<Output = Result<()>> + Send {
        async move {
            sqlx::query(
                "UPDATE sessions SET revoked_at = NOW() \
                 WHERE token = $1 AND revoked_at IS NULL",
            )
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
            Ok(())
        }
    }
}
