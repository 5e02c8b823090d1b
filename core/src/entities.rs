//! Domain entities shared across usecases and storage backends.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    /// Primary key.
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Bcrypt hash of the password. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Whether the email has been verified via OTP.
    pub is_verified: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input record for creating a [`User`].
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique login name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Bcrypt hash of the password.
    pub password_hash: String,
}

/// A bearer-token session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    /// Primary key.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// Opaque bearer token (uuid v4).
    pub token: String,
    /// Expiry instant.
    pub expired_at: DateTime<Utc>,
    /// Set when the session was revoked by logout.
    pub revoked_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input record for creating a [`Session`].
#[derive(Debug, Clone)]
pub struct NewSession {
    /// Owning user.
    pub user_id: i64,
    /// Opaque bearer token.
    pub token: String,
    /// Expiry instant.
    pub expired_at: DateTime<Utc>,
}

/// A one-time password issued for email verification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Otp {
    /// Primary key.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// Six-digit code.
    pub code: String,
    /// Expiry instant.
    pub expired_at: DateTime<Utc>,
    /// Whether the code was already consumed or invalidated.
    pub is_used: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input record for issuing an [`Otp`].
#[derive(Debug, Clone)]
pub struct NewOtp {
    /// Owning user.
    pub user_id: i64,
    /// Six-digit code.
    pub code: String,
    /// Expiry instant.
    pub expired_at: DateTime<Utc>,
}

/// A cinema location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cinema {
    /// Primary key.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// City or address.
    pub location: String,
}

/// A screening room within a cinema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Studio {
    /// Primary key.
    pub id: i64,
    /// Owning cinema.
    pub cinema_id: i64,
    /// Display name, e.g. "Studio 1".
    pub name: String,
    /// Seat capacity.
    pub total_seats: i32,
}

/// A physical seat within a studio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Seat {
    /// Primary key.
    pub id: i64,
    /// Owning studio.
    pub studio_id: i64,
    /// Row/number label, e.g. "A1".
    pub seat_code: String,
}

/// A seat together with its availability for one showtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeatAvailability {
    /// Seat primary key.
    pub id: i64,
    /// Row/number label.
    pub seat_code: String,
    /// Owning studio.
    pub studio_id: i64,
    /// `true` when a non-cancelled booking holds the seat.
    pub is_booked: bool,
}

/// A movie in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Movie {
    /// Primary key.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Poster image URL.
    pub poster_url: String,
    /// Genre tags.
    pub genres: Vec<String>,
    /// Average rating, 0.0 to 10.0.
    pub rating: f64,
    /// Runtime in minutes.
    pub duration_minutes: i32,
}

/// A scheduled screening of a movie in a studio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Showtime {
    /// Primary key.
    pub id: i64,
    /// Cinema hosting the screening.
    pub cinema_id: i64,
    /// Studio hosting the screening.
    pub studio_id: i64,
    /// Movie being screened.
    pub movie_id: i64,
    /// Calendar date of the screening.
    pub show_date: NaiveDate,
    /// Wall-clock start time.
    pub show_time: NaiveTime,
    /// Price per seat.
    pub price: f64,
    /// Embedded movie, populated by listing queries.
    pub movie: Option<Movie>,
    /// Embedded studio, populated by listing queries.
    pub studio: Option<Studio>,
}

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Created, awaiting payment.
    Pending,
    /// Payment completed.
    Paid,
    /// Cancelled; its seats are free again.
    Cancelled,
}

impl BookingStatus {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses the storage representation.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// A reservation of one or more seats for a showtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    /// Primary key.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// Booked showtime.
    pub showtime_id: i64,
    /// Lifecycle state.
    pub status: BookingStatus,
    /// Seat price times seat count, snapshotted at creation.
    pub total_amount: f64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input record for creating a [`Booking`].
#[derive(Debug, Clone)]
pub struct NewBooking {
    /// Owning user.
    pub user_id: i64,
    /// Booked showtime.
    pub showtime_id: i64,
}

/// One seat held by a booking, with the price snapshotted at booking time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingSeat {
    /// Primary key.
    pub id: i64,
    /// Owning booking.
    pub booking_id: i64,
    /// Held seat.
    pub seat_id: i64,
    /// Per-seat price at booking time.
    pub price: f64,
}

/// A way to pay, e.g. "Credit Card".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentMethod {
    /// Primary key.
    pub id: i64,
    /// Display name.
    pub name: String,
}

/// Lifecycle state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Submitted, not yet settled.
    Pending,
    /// Settled successfully.
    Completed,
    /// Settled and later refunded.
    Refunded,
}

impl PaymentStatus {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Refunded => "refunded",
        }
    }

    /// Parses the storage representation.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "refunded" => Some(Self::Refunded),
            _ => None,
        }
    }
}

/// A settled (or attempted) payment for a booking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payment {
    /// Primary key.
    pub id: i64,
    /// Paid booking.
    pub booking_id: i64,
    /// Method used.
    pub payment_method_id: i64,
    /// Lifecycle state.
    pub status: PaymentStatus,
    /// Settlement instant, if settled.
    pub paid_at: Option<DateTime<Utc>>,
}

/// Input record for recording a [`Payment`].
#[derive(Debug, Clone)]
pub struct NewPayment {
    /// Paid booking.
    pub booking_id: i64,
    /// Method used.
    pub payment_method_id: i64,
    /// Lifecycle state to record.
    pub status: PaymentStatus,
    /// Free-form details supplied by the client, stored as JSON.
    pub details: String,
}

/// Aggregate statistics over all booking totals.
///
/// Zero-valued when there are no bookings at all.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PriceStats {
    /// Smallest booking total.
    pub min: f64,
    /// Largest booking total.
    pub max: f64,
    /// Mean booking total.
    pub avg: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_status_round_trips_through_storage_form() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Paid,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("unknown"), None);
    }

    #[test]
    fn payment_status_round_trips_through_storage_form() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Completed,
            PaymentStatus::Refunded,
        ] {
            assert_eq!(PaymentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PaymentStatus::parse("declined"), None);
    }
}
