//! Error types for booking domain operations.

use std::fmt;

use thiserror::Error;

/// Result type alias for domain operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Identifies one of the three independent dashboard sub-queries.
///
/// Used to attribute a failure to the query that produced it when the
/// aggregator short-circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubQuery {
    /// The `latest_bookings(limit)` read.
    LatestBookings,
    /// The `booking_count()` read.
    BookingCount,
    /// The `revenue_stats()` read.
    RevenueStats,
}

impl SubQuery {
    /// Human-readable name used in error messages and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LatestBookings => "latest bookings",
            Self::BookingCount => "booking count",
            Self::RevenueStats => "revenue stats",
        }
    }
}

impl fmt::Display for SubQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comprehensive error taxonomy for the booking domain.
///
/// This enum covers all failure modes across authentication, catalog,
/// booking, payment, and dashboard aggregation, organized by category
/// for clear error handling and user feedback.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    // ═══════════════════════════════════════════════════════════
    // Validation Errors
    // ═══════════════════════════════════════════════════════════

    /// Request input failed validation.
    #[error("{0}")]
    Validation(String),

    /// Dashboard limit must be strictly positive.
    #[error("invalid limit: {limit}")]
    InvalidLimit {
        /// The rejected limit value
        limit: i64,
    },

    // ═══════════════════════════════════════════════════════════
    // Authentication Errors
    // ═══════════════════════════════════════════════════════════

    /// Username is already registered.
    #[error("Username already exists")]
    UsernameTaken,

    /// Email is already registered.
    #[error("Email already exists")]
    EmailTaken,

    /// Unknown username or wrong password (intentionally uniform).
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Account exists but the email has not been verified yet.
    #[error("Email not verified")]
    EmailNotVerified,

    /// Verification requested for an already verified account.
    #[error("Email already verified")]
    EmailAlreadyVerified,

    /// OTP code is wrong, expired, or already consumed.
    #[error("Invalid or expired OTP")]
    OtpInvalid,

    /// Session token is unknown, expired, or revoked.
    #[error("Invalid or expired session")]
    SessionInvalid,

    // ═══════════════════════════════════════════════════════════
    // Booking Errors
    // ═══════════════════════════════════════════════════════════

    /// Referenced resource does not exist.
    #[error("{resource} not found")]
    NotFound {
        /// Name of the missing resource, e.g. "Showtime"
        resource: &'static str,
    },

    /// One or more requested seats are already booked.
    #[error("One or more seats are not available")]
    SeatsUnavailable,

    /// Booking belongs to a different user.
    #[error("Booking belongs to another user")]
    BookingNotOwned,

    /// Payment attempted on a booking that is already paid.
    #[error("Booking is already paid")]
    BookingAlreadyPaid,

    /// Payment attempted on a cancelled booking.
    #[error("Booking is cancelled")]
    BookingCancelled,

    // ═══════════════════════════════════════════════════════════
    // Aggregation Errors
    // ═══════════════════════════════════════════════════════════

    /// One of the dashboard sub-queries failed; the whole call fails.
    #[error("{query} query failed: {source}")]
    SubQuery {
        /// Which of the three reads produced the error
        query: SubQuery,
        /// The underlying failure
        source: Box<CoreError>,
    },

    /// The shared deadline elapsed before all sub-queries completed.
    #[error("Deadline exceeded")]
    DeadlineExceeded,

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// Email delivery failed.
    #[error("Failed to send email: {0}")]
    EmailDelivery(String),

    /// Internal error (never exposed to users).
    #[error("Internal error")]
    Internal,
}

impl CoreError {
    /// Wraps a sub-query failure with the query that produced it.
    #[must_use]
    pub fn sub_query(query: SubQuery, source: Self) -> Self {
        Self::SubQuery {
            query,
            source: Box::new(source),
        }
    }

    /// Returns `true` if this error is due to invalid user input or
    /// user-visible state, rather than a system fault.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cinebook_core::CoreError;
    /// assert!(CoreError::InvalidCredentials.is_user_error());
    /// assert!(!CoreError::Internal.is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::InvalidLimit { .. }
                | Self::UsernameTaken
                | Self::EmailTaken
                | Self::InvalidCredentials
                | Self::EmailNotVerified
                | Self::EmailAlreadyVerified
                | Self::OtpInvalid
                | Self::SessionInvalid
                | Self::NotFound { .. }
                | Self::SeatsUnavailable
                | Self::BookingNotOwned
                | Self::BookingAlreadyPaid
                | Self::BookingCancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_query_error_names_the_failing_read() {
        let err = CoreError::sub_query(
            SubQuery::BookingCount,
            CoreError::Database("connection reset".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "booking count query failed: Database error: connection reset"
        );
    }

    #[test]
    fn deadline_is_distinct_from_sub_query_failure() {
        let wrapped = CoreError::sub_query(SubQuery::RevenueStats, CoreError::Internal);
        assert_ne!(wrapped, CoreError::DeadlineExceeded);
    }

    #[test]
    fn user_error_classification() {
        assert!(CoreError::InvalidLimit { limit: -5 }.is_user_error());
        assert!(CoreError::SeatsUnavailable.is_user_error());
        assert!(!CoreError::DeadlineExceeded.is_user_error());
        assert!(!CoreError::Database("boom".to_string()).is_user_error());
    }
}
