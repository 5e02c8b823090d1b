//! Storage contract for the three independent dashboard reads.

use std::future::Future;

use crate::entities::{Booking, PriceStats};
use crate::error::Result;

/// The three read-only queries the dashboard aggregator composes.
///
/// Each read is independent of the others and safe to run in any order or
/// in parallel. Implementations must tolerate having their futures dropped
/// mid-flight: the aggregator cancels outstanding reads on its first error
/// or when the shared deadline fires.
pub trait DashboardRepository: Send + Sync {
    /// The most recent bookings, newest first, at most `limit` rows.
    /// An empty result is valid.
    fn latest_bookings(
        &self,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<Booking>>> + Send;

    /// Total number of bookings ever created.
    fn booking_count(&self) -> impl Future<Output = Result<i64>> + Send;

    /// Min/max/avg over every booking total. Zero-valued when there are
    /// no bookings at all.
    fn revenue_stats(&self) -> impl Future<Output = Result<PriceStats>> + Send;
}
