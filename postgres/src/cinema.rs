//! `CinemaRepository` over Postgres.

use std::future::Future;

use cinebook_core::entities::{Cinema, Movie, Showtime, Studio};
use cinebook_core::error::Result;
use cinebook_core::pagination::PageRequest;
use cinebook_core::repository::CinemaRepository;
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::{db_err, PgRepositories};

fn map_cinema(row: &PgRow) -> std::result::Result<Cinema, sqlx::Error> {
    Ok(Cinema {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        location: row.try_get("location")?,
    })
}

pub(crate) fn map_studio(row: &PgRow) -> std::result::Result<Studio, sqlx::Error> {
    Ok(Studio {
        id: row.try_get("studio_id")?,
        cinema_id: row.try_get("cinema_id")?,
        name: row.try_get("studio_name")?,
        total_seats: row.try_get("total_seats")?,
    })
}

impl CinemaRepository for PgRepositories {
    fn cinemas(&self, page: PageRequest) -> impl Future<Output = Result<Vec<Cinema>>> + Send {
        async move {
            let rows = sqlx::query(
                "SELECT id, name, location FROM cinemas ORDER BY id LIMIT $1 OFFSET $2",
            )
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
            rows.iter().map(map_cinema).collect::<std::result::Result<_, sqlx::Error>>().map_err(db_err)
        }
    }

    fn cinema_count(&self) -> impl Future<Output = Result<i64>> + Send {
        async move {
            let row = sqlx::query("SELECT COUNT(*) AS count FROM cinemas")
                .fetch_one(&self.pool)
                .await
                .map_err(db_err)?;
            row.try_get("count").map_err(db_err)
        }
    }

    fn cinema_by_id(&self, id: i64) -> impl Future<Output = Result<Option<Cinema>>> + Send {
        async move {
            sqlx::query("SELECT id, name, location FROM cinemas WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?
                .map(|row| map_cinema(&row))
                .transpose()
                .map_err(db_err)
        }
    }

    fn studios_by_cinema(
        &self,
        cinema_id: i64,
    ) -> impl Future<Output = Result<Vec<Studio>>> + Send {
        async move {
            let rows = sqlx::query(
                "SELECT id AS studio_id, cinema_id, name AS studio_name, total_seats \
                 FROM studios WHERE cinema_id = $1 ORDER BY id",
            )
            .bind(cinema_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
            rows.iter().map(map_studio).collect::<std::result::Result<_, sqlx::Error>>().map_err(db_err)
        }
    }

    fn showtimes_by_cinema(
        &self,
        cinema_id: i64,
    ) -> impl Future<Output = Result<Vec<Showtime>>> + Send {
        async move {
            let rows = sqlx::query(
                "SELECT st.id, st.cinema_id, st.studio_id, st.movie_id, \
                        st.show_date, st.show_time, st.price, \
                        m.title, m.poster_url, m.genres, m.rating, m.duration_minutes, \
                        s.name AS studio_name, s.total_seats \
                 FROM showtimes st \
                 JOIN movies m ON m.id = st.movie_id \
                 JOIN studios s ON s.id = st.studio_id \
                 WHERE st.cinema_id = $1 \
                 ORDER BY st.show_date, st.show_time, st.id",
            )
            .bind(cinema_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

            rows.iter()
                .map(|row| {
                    let movie = Movie {
                        id: row.try_get("movie_id")?,
                        title: row.try_get("title")?,
                        poster_url: row.try_get("poster_url")?,
                        genres: row.try_get("genres")?,
                        rating: row.try_get("rating")?,
                        duration_minutes: row.try_get("duration_minutes")?,
                    };
                    let studio = map_studio(row)?;
                    Ok(Showtime {
                        id: row.try_get("id")?,
                        cinema_id: row.try_get("cinema_id")?,
                        studio_id: row.try_get("studio_id")?,
                        movie_id: row.try_get("movie_id")?,
                        show_date: row.try_get("show_date")?,
                        show_time: row.try_get("show_time")?,
                        price: row.try_get("price")?,
                        movie: Some(movie),
                        studio: Some(studio),
                    })
                })
                .collect::<std::result::Result<_, sqlx::Error>>()
                .map_err(db_err)
        }
    }
}
