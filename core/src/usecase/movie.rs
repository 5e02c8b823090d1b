//! Movie catalog browsing.

use serde::Serialize;

use crate::entities::Movie;
use crate::error::{CoreError, Result};
use crate::pagination::{PageRequest, Pagination};
use crate::repository::MovieRepository;

/// One page of movies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieList {
    /// The page contents.
    pub movies: Vec<Movie>,
    /// Paging metadata.
    pub pagination: Pagination,
}

/// Movie listing and detail lookups.
#[derive(Debug, Clone)]
pub struct MovieUsecase<R> {
    repo: R,
}

impl<R> MovieUsecase<R>
where
    R: MovieRepository,
{
    /// Creates the usecase.
    pub const fn new(repo: R) -> Self {
        Self { repo }
    }

    /// One page of movies with paging metadata.
    ///
    /// # Errors
    ///
    /// Propagates storage errors.
    pub async fn list(&self, page: PageRequest) -> Result<MovieList> {
        let movies = self.repo.movies(page).await?;
        let total = self.repo.movie_count().await?;
        Ok(MovieList {
            movies,
            pagination: Pagination::new(page, total),
        })
    }

    /// A single movie.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] for an unknown id.
    pub async fn by_id(&self, id: i64) -> Result<Movie> {
        self.repo
            .movie_by_id(id)
            .await?
            .ok_or(CoreError::NotFound { resource: "Movie" })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mocks::MockRepositories;

    fn movie(id: i64, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            poster_url: format!("https://posters.example.com/{id}.jpg"),
            genres: vec!["Drama".to_string()],
            rating: 7.5,
            duration_minutes: 120,
        }
    }

    #[tokio::test]
    async fn listing_and_lookup() {
        let repo = MockRepositories::new()
            .with_movies(vec![movie(1, "First"), movie(2, "Second"), movie(3, "Third")]);
        let usecase = MovieUsecase::new(repo);

        let page = usecase.list(PageRequest::new(1, 2)).await.unwrap();
        assert_eq!(page.movies.len(), 2);
        assert_eq!(page.pagination.total_pages, 2);

        assert_eq!(usecase.by_id(3).await.unwrap().title, "Third");
        assert_eq!(
            usecase.by_id(42).await,
            Err(CoreError::NotFound { resource: "Movie" })
        );
    }
}
