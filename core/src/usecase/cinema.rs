//! Cinema browsing.

use serde::Serialize;

use crate::entities::{Cinema, Studio};
use crate::error::{CoreError, Result};
use crate::pagination::{PageRequest, Pagination};
use crate::repository::CinemaRepository;

/// One page of cinemas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CinemaList {
    /// The page contents.
    pub cinemas: Vec<Cinema>,
    /// Paging metadata.
    pub pagination: Pagination,
}

/// A cinema with its screening rooms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CinemaDetail {
    /// The cinema.
    pub cinema: Cinema,
    /// Its studios.
    pub studios: Vec<Studio>,
}

/// Cinema listing and detail lookups.
#[derive(Debug, Clone)]
pub struct CinemaUsecase<R> {
    repo: R,
}

impl<R> CinemaUsecase<R>
where
    R: CinemaRepository,
{
    /// Creates the usecase.
    pub const fn new(repo: R) -> Self {
        Self { repo }
    }

    /// One page of cinemas with paging metadata.
    ///
    /// # Errors
    ///
    /// Propagates storage errors.
    pub async fn list(&self, page: PageRequest) -> Result<CinemaList> {
        let cinemas = self.repo.cinemas(page).await?;
        let total = self.repo.cinema_count().await?;
        Ok(CinemaList {
            cinemas,
            pagination: Pagination::new(page, total),
        })
    }

    /// A cinema and its studios.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] for an unknown id.
    pub async fn detail(&self, id: i64) -> Result<CinemaDetail> {
        let cinema = self
            .repo
            .cinema_by_id(id)
            .await?
            .ok_or(CoreError::NotFound { resource: "Cinema" })?;
        let studios = self.repo.studios_by_cinema(id).await?;
        Ok(CinemaDetail { cinema, studios })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mocks::MockRepositories;

    fn seeded() -> MockRepositories {
        MockRepositories::new().with_cinemas(
            (1..=12)
                .map(|i| Cinema {
                    id: i,
                    name: format!("Cinema {i}"),
                    location: "Springfield".to_string(),
                })
                .collect(),
        )
    }

    #[tokio::test]
    async fn listing_pages_and_counts() {
        let usecase = CinemaUsecase::new(seeded());

        let page = usecase.list(PageRequest::new(2, 5)).await.unwrap();
        assert_eq!(page.cinemas.len(), 5);
        assert_eq!(page.cinemas[0].id, 6);
        assert_eq!(page.pagination.total_records, 12);
        assert_eq!(page.pagination.total_pages, 3);
    }

    #[tokio::test]
    async fn detail_includes_studios_and_rejects_unknown_ids() {
        let repo = seeded().with_studios(vec![
            Studio {
                id: 1,
                cinema_id: 1,
                name: "Studio 1".to_string(),
                total_seats: 40,
            },
            Studio {
                id: 2,
                cinema_id: 2,
                name: "Studio 1".to_string(),
                total_seats: 60,
            },
        ]);
        let usecase = CinemaUsecase::new(repo);

        let detail = usecase.detail(1).await.unwrap();
        assert_eq!(detail.studios.len(), 1);
        assert_eq!(detail.studios[0].total_seats, 40);

        assert_eq!(
            usecase.detail(99).await,
            Err(CoreError::NotFound { resource: "Cinema" })
        );
    }
}
