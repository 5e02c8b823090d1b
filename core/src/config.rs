//! Tunable knobs for the authentication usecase.

use chrono::Duration;

/// Configuration for OTP issuance, session lifetime, and password hashing.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// How long an OTP code stays valid.
    pub otp_ttl: Duration,
    /// How long a session token stays valid.
    pub session_ttl: Duration,
    /// Bcrypt work factor. Lower it in tests to keep them fast.
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    /// Sets the OTP time-to-live.
    #[must_use]
    pub const fn with_otp_ttl(mut self, ttl: Duration) -> Self {
        self.otp_ttl = ttl;
        self
    }

    /// Sets the session time-to-live.
    #[must_use]
    pub const fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Sets the bcrypt work factor.
    #[must_use]
    pub const fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            otp_ttl: Duration::minutes(5),
            session_ttl: Duration::hours(24),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_issuance_policy() {
        let config = AuthConfig::default();
        assert_eq!(config.otp_ttl, Duration::minutes(5));
        assert_eq!(config.session_ttl, Duration::hours(24));
    }

    #[test]
    fn builder_overrides() {
        let config = AuthConfig::default()
            .with_otp_ttl(Duration::minutes(1))
            .with_bcrypt_cost(4);
        assert_eq!(config.otp_ttl, Duration::minutes(1));
        assert_eq!(config.bcrypt_cost, 4);
    }
}
