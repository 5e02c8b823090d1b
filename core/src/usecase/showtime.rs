//! Showtime listings and per-showtime seat availability.

use chrono::{NaiveDate, NaiveTime};

use crate::entities::{SeatAvailability, Showtime};
use crate::error::{CoreError, Result};
use crate::repository::{CinemaRepository, SeatRepository};

/// Showtime browsing for one cinema.
#[derive(Debug, Clone)]
pub struct ShowtimeUsecase<R> {
    repo: R,
}

impl<R> ShowtimeUsecase<R>
where
    R: CinemaRepository + SeatRepository,
{
    /// Creates the usecase.
    pub const fn new(repo: R) -> Self {
        Self { repo }
    }

    /// All showtimes at a cinema, movie and studio embedded.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] for an unknown cinema.
    pub async fn by_cinema(&self, cinema_id: i64) -> Result<Vec<Showtime>> {
        self.repo
            .cinema_by_id(cinema_id)
            .await?
            .ok_or(CoreError::NotFound { resource: "Cinema" })?;
        self.repo.showtimes_by_cinema(cinema_id).await
    }

    /// Every seat for the showtime at `date`/`time` in `cinema_id`, each
    /// flagged booked when a non-cancelled booking holds it.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] for an unknown cinema.
    pub async fn seat_availability(
        &self,
        cinema_id: i64,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Vec<SeatAvailability>> {
        self.repo
            .cinema_by_id(cinema_id)
            .await?
            .ok_or(CoreError::NotFound { resource: "Cinema" })?;
        self.repo.seat_availability(cinema_id, date, time).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mocks::MockRepositories;

    #[tokio::test]
    async fn unknown_cinema_is_rejected() {
        let usecase = ShowtimeUsecase::new(MockRepositories::new());
        assert_eq!(
            usecase.by_cinema(1).await,
            Err(CoreError::NotFound { resource: "Cinema" })
        );
    }

    #[tokio::test]
    async fn availability_flags_booked_seats() {
        let repo = MockRepositories::seeded_catalog();
        let usecase = ShowtimeUsecase::new(repo.clone());

        let showtimes = usecase.by_cinema(1).await.unwrap();
        assert!(!showtimes.is_empty());
        let showtime = &showtimes[0];

        // Nothing booked yet.
        let seats = usecase
            .seat_availability(1, showtime.show_date, showtime.show_time)
            .await
            .unwrap();
        assert!(!seats.is_empty());
        assert!(seats.iter().all(|s| !s.is_booked));
    }
}
