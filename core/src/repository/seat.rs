//! Storage contract for seats and per-showtime availability.

use std::future::Future;

use chrono::{NaiveDate, NaiveTime};

use crate::entities::{Seat, SeatAvailability};
use crate::error::Result;

/// Persistence operations backing seat selection.
pub trait SeatRepository: Send + Sync {
    /// Every seat at `cinema_id` for the showtime at `date`/`time`, each
    /// flagged booked when a non-cancelled booking holds it.
    fn seat_availability(
        &self,
        cinema_id: i64,
        date: NaiveDate,
        time: NaiveTime,
    ) -> impl Future<Output = Result<Vec<SeatAvailability>>> + Send;

    /// Fetches the given seats by id, preserving no particular order.
    fn seats_by_ids(&self, seat_ids: &[i64]) -> impl Future<Output = Result<Vec<Seat>>> + Send;

    /// Returns `true` when none of `seat_ids` is held by a non-cancelled
    /// booking for `showtime_id`.
    ///
    /// This is a pre-check only; nothing is locked between the check and
    /// the subsequent insert.
    fn seats_available(
        &self,
        showtime_id: i64,
        seat_ids: &[i64],
    ) -> impl Future<Output = Result<bool>> + Send;
}
