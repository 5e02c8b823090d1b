//! Storage contract for cinemas, studios, and showtime listings.

use std::future::Future;

use crate::entities::{Cinema, Showtime, Studio};
use crate::error::Result;
use crate::pagination::PageRequest;

/// Persistence operations backing cinema browsing.
pub trait CinemaRepository: Send + Sync {
    /// Fetches one page of cinemas ordered by id.
    fn cinemas(&self, page: PageRequest) -> impl Future<Output = Result<Vec<Cinema>>> + Send;

    /// Total number of cinemas.
    fn cinema_count(&self) -> impl Future<Output = Result<i64>> + Send;

    /// Looks a cinema up by primary key.
    fn cinema_by_id(&self, id: i64) -> impl Future<Output = Result<Option<Cinema>>> + Send;

    /// All studios belonging to `cinema_id`.
    fn studios_by_cinema(
        &self,
        cinema_id: i64,
    ) -> impl Future<Output = Result<Vec<Studio>>> + Send;

    /// All showtimes at `cinema_id`, with movie and studio embedded.
    fn showtimes_by_cinema(
        &self,
        cinema_id: i64,
    ) -> impl Future<Output = Result<Vec<Showtime>>> + Send;
}
