//! `BookingRepository` over Postgres.

use std::future::Future;

use cinebook_core::entities::{Booking, BookingSeat, BookingStatus, NewBooking, Showtime};
use cinebook_core::error::Result;
use cinebook_core::repository::BookingRepository;
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::{db_err, PgRepositories};

pub(crate) fn map_booking(row: &PgRow) -> std::result::Result<Booking, sqlx::Error> {
    let status: String = row.try_get("status")?;
    let status = BookingStatus::parse(&status)
        .ok_or_else(|| sqlx::Error::Decode(format!("unknown booking status: {status}").into()))?;
    Ok(Booking {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        showtime_id: row.try_get("showtime_id")?,
        status,
        total_amount: row.try_get("total_amount")?,
        created_at: row.try_get("created_at")?,
    })
}

const BOOKING_COLUMNS: &str = "id, user_id, showtime_id, status, total_amount, created_at";

impl BookingRepository for PgRepositories {
    fn showtime_by_id(&self, id: i64) -> impl Future<Output = Result<Option<Showtime>>> + Send {
        async move {
            sqlx::query(
                "SELECT id, cinema_id, studio_id, movie_id, show_date, show_time, price \
                 FROM showtimes WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(|row| {
                Ok(Showtime {
                    id: row.try_get("id")?,
                    cinema_id: row.try_get("cinema_id")?,
                    studio_id: row.try_get("studio_id")?,
                    movie_id: row.try_get("movie_id")?,
                    show_date: row.try_get("show_date")?,
                    show_time: row.try_get("show_time")?,
                    price: row.try_get("price")?,
                    movie: None,
                    studio: None,
                })
            })
            .transpose()
            .map_err(db_err)
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn create_booking(
        &self,
        booking: NewBooking,
        seat_ids: &[i64],
        seat_price: f64,
    ) -> impl Future<Output = Result<i64>> + Send {
        async move {
            let total_amount = seat_price * seat_ids.len() as f64;
            let mut tx = self.pool.begin().await.map_err(db_err)?;

            let row = sqlx::query(
                "INSERT INTO bookings (user_id, showtime_id, status, total_amount) \
                 VALUES ($1, $2, 'pending', $3) RETURNING id",
            )
            .bind(booking.user_id)
            .bind(booking.showtime_id)
            .bind(total_amount)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_err)?;
            let booking_id: i64 = row.try_get("id").map_err(db_err)?;

            for &seat_id in seat_ids {
                sqlx::query(
                    "INSERT INTO booking_seats (booking_id, seat_id, price) \
                     VALUES ($1, $2, $3)",
                )
                .bind(booking_id)
                .bind(seat_id)
                .bind(seat_price)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
            }

            tx.commit().await.map_err(db_err)?;
            Ok(booking_id)
        }
    }

    fn booking_by_id(&self, id: i64) -> impl Future<Output = Result<Option<Booking>>> + Send {
        async move {
            sqlx::query(&format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(|row| map_booking(&row))
            .transpose()
            .map_err(db_err)
        }
    }

    fn bookings_by_user(
        &self,
        user_id: i64,
    ) -> impl Future<Output = Result<Vec<Booking>>> + Send {
        async move {
            let rows = sqlx::query(&format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings \
                 WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
            ))
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
            rows.iter()
                .map(map_booking)
                .collect::<std::result::Result<_, sqlx::Error>>()
                .map_err(db_err)
        }
    }

    fn booking_seats(
        &self,
        booking_id: i64,
    ) -> impl Future<Output = Result<Vec<BookingSeat>>> + Send {
        async move {
            let rows = sqlx::query(
                "SELECT id, booking_id, seat_id, price FROM booking_seats \
                 WHERE booking_id = $1 ORDER BY id",
            )
            .bind(booking_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
            rows.iter()
                .map(|row| {
                    Ok(BookingSeat {
                        id: row.try_get("id")?,
                        booking_id: row.try_get("booking_id")?,
                        seat_id: row.try_get("seat_id")?,
                        price: row.try_get("price")?,
                    })
                })
                .collect::<std::result::Result<_, sqlx::Error>>()
                .map_err(db_err)
        }
    }

    fn update_booking_status(
        &self,
        booking_id: i64,
        status: BookingStatus,
    ) -> impl Future<Output = Result<()>> + Send {
        async move {
            sqlx::query("UPDATE bookings SET status = $2 WHERE id = $1")
                .bind(booking_id)
                .bind(status.as_str())
                .execute(&self.pool)
                .await
                .map_err(db_err)?;
            Ok(())
        }
    }
}
