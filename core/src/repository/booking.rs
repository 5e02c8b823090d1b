//! Storage contract for showtimes and bookings.

use std::future::Future;

use crate::entities::{Booking, BookingSeat, BookingStatus, NewBooking, Showtime};
use crate::error::Result;

/// Persistence operations backing booking creation and listing.
pub trait BookingRepository: Send + Sync {
    /// Looks a showtime up by primary key.
    fn showtime_by_id(&self, id: i64) -> impl Future<Output = Result<Option<Showtime>>> + Send;

    /// Atomically inserts the booking and one row per seat, snapshotting
    /// `seat_price` on each. The booking total is `seat_price` times the
    /// number of seats. Returns the booking id.
    fn create_booking(
        &self,
        booking: NewBooking,
        seat_ids: &[i64],
        seat_price: f64,
    ) -> impl Future<Output = Result<i64>> + Send;

    /// Looks a booking up by primary key.
    fn booking_by_id(&self, id: i64) -> impl Future<Output = Result<Option<Booking>>> + Send;

    /// All bookings owned by `user_id`, newest first.
    fn bookings_by_user(
        &self,
        user_id: i64,
    ) -> impl Future<Output = Result<Vec<Booking>>> + Send;

    /// The seat rows held by `booking_id`.
    fn booking_seats(
        &self,
        booking_id: i64,
    ) -> impl Future<Output = Result<Vec<BookingSeat>>> + Send;

    /// Transitions a booking to `status`.
    fn update_booking_status(
        &self,
        booking_id: i64,
        status: BookingStatus,
    ) -> impl Future<Output = Result<()>> + Send;
}
