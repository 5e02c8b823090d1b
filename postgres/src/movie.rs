//! `MovieRepository` over Postgres.

use std::future::Future;

use cinebook_core::entities::Movie;
use cinebook_core::error::Result;
use cinebook_core::pagination::PageRequest;
use cinebook_core::repository::MovieRepository;
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::{db_err, PgRepositories};

fn map_movie(row: &PgRow) -> std::result::Result<Movie, sqlx::Error> {
    Ok(Movie {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        poster_url: row.try_get("poster_url")?,
        genres: row.try_get("genres")?,
        rating: row.try_get("rating")?,
        duration_minutes: row.try_get("duration_minutes")?,
    })
}

impl MovieRepository for PgRepositories {
    fn movies(&self, page: PageRequest) -> impl Future<Output = Result<Vec<Movie>>> + Send {
        async move {
            let rows = sqlx::query(
                "SELECT id, title, poster_url, genres, rating, duration_minutes \
                 FROM movies ORDER BY id LIMIT $1 OFFSET $2",
            )
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
            rows.iter()
                .map(map_movie)
                .collect::<std::result::Result<_, sqlx::Error>>()
                .map_err(db_err)
        }
    }

    fn movie_count(&self) -> impl Future<Output = Result<i64>> + Send {
        async move {
            let row = sqlx::query("SELECT COUNT(*) AS count FROM movies")
                .fetch_one(&self.pool)
                .await
                .map_err(db_err)?;
            row.try_get("count").map_err(db_err)
        }
    }

    fn movie_by_id(&self, id: i64) -> impl Future<Output = Result<Option<Movie>>> + Send {
        async move {
            sqlx::query(
                "SELECT id, title, poster_url, genres, rating, duration_minutes \
                 FROM movies WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(|row| map_movie(&row))
            .transpose()
            .map_err(db_err)
        }
    }
}
