//! Storage contract for the movie catalog.

use std::future::Future;

use crate::entities::Movie;
use crate::error::Result;
use crate::pagination::PageRequest;

/// Persistence operations backing movie browsing.
pub trait MovieRepository: Send + Sync {
    /// Fetches one page of movies ordered by id.
    fn movies(&self, page: PageRequest) -> impl Future<Output = Result<Vec<Movie>>> + Send;

    /// Total number of movies.
    fn movie_count(&self) -> impl Future<Output = Result<i64>> + Send;

    /// Looks a movie up by primary key.
    fn movie_by_id(&self, id: i64) -> impl Future<Output = Result<Option<Movie>>> + Send;
}
