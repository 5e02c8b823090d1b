//! `SeatRepository` over Postgres.

use std::future::Future;

use chrono::{NaiveDate, NaiveTime};
use cinebook_core::entities::{Seat, SeatAvailability};
use cinebook_core::error::Result;
use cinebook_core::repository::SeatRepository;
use sqlx::Row;

use crate::{db_err, PgRepositories};

impl SeatRepository for PgRepositories {
    fn seat_availability(
        &self,
        cinema_id: i64,
        date: NaiveDate,
        time: NaiveTime,
    ) -> impl Future<Output = Result<Vec<SeatAvailability>>> + Send {
        async move {
            let rows = sqlx::query(
                "SELECT se.id, se.seat_code, se.studio_id, \
                        EXISTS ( \
                            SELECT 1 FROM booking_seats bs \
                            JOIN bookings b ON b.id = bs.booking_id \
                            WHERE bs.seat_id = se.id \
                              AND b.showtime_id = st.id \
                              AND b.status <> 'cancelled' \
                        ) AS is_booked \
                 FROM showtimes st \
                 JOIN seats se ON se.studio_id = st.studio_id \
                 WHERE st.cinema_id = $1 AND st.show_date = $2 AND st.show_time = $3 \
                 ORDER BY se.id",
            )
            .bind(cinema_id)
            .bind(date)
            .bind(time)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

            rows.iter()
                .map(|row| {
                    Ok(SeatAvailability {
                        id: row.try_get("id")?,
                        seat_code: row.try_get("seat_code")?,
                        studio_id: row.try_get("studio_id")?,
                        is_booked: row.try_get("is_booked")?,
                    })
                })
                .collect::<std::result::Result<_, sqlx::Error>>()
                .map_err(db_err)
        }
    }

    fn seats_by_ids(&self, seat_ids: &[i64]) -> impl Future<Output = Result<Vec<Seat>>> + Send {
        async move {
            let rows = sqlx::query(
                "SELECT id, studio_id, seat_code FROM seats WHERE id = ANY($1) ORDER BY id",
            )
            .bind(seat_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

            rows.iter()
                .map(|row| {
                    Ok(Seat {
                        id: row.try_get("id")?,
                        studio_id: row.try_get("studio_id")?,
                        seat_code: row.try_get("seat_code")?,
                    })
                })
                .collect::<std::result::Result<_, sqlx::Error>>()
                .map_err(db_err)
        }
    }

    fn seats_available(
        &self,
        showtime_id: i64,
        seat_ids: &[i64],
    ) -> impl Future<Output = Result<bool>> + Send {
        async move {
            let row = sqlx::query(
                "SELECT NOT EXISTS ( \
                     SELECT 1 FROM booking_seats bs \
                     JOIN bookings b ON b.id = bs.booking_id \
                     WHERE b.showtime_id = $1 \
                       AND b.status <> 'cancelled' \
                       AND bs.seat_id = ANY($2) \
                 ) AS available",
            )
            .bind(showtime_id)
            .bind(seat_ids)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
            row.try_get("available").map_err(db_err)
        }
    }
}
