//! `PaymentRepository` over Postgres.

use std::future::Future;

use cinebook_core::entities::{NewPayment, Payment, PaymentMethod, PaymentStatus};
use cinebook_core::error::Result;
use cinebook_core::repository::PaymentRepository;
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::{db_err, PgRepositories};

fn map_payment(row: &PgRow) -> std::result::Result<Payment, sqlx::Error> {
    let status: String = row.try_get("status")?;
    let status = PaymentStatus::parse(&status)
        .ok_or_else(|| sqlx::Error::Decode(format!("unknown payment status: {status}").into()))?;
    Ok(Payment {
        id: row.try_get("id")?,
        booking_id: row.try_get("booking_id")?,
        payment_method_id: row.try_get("payment_method_id")?,
        status,
        paid_at: row.try_get("paid_at")?,
    })
}

impl PaymentRepository for PgRepositories {
    fn payment_methods(&self) -> impl Future<Output = Result<Vec<PaymentMethod>>> + Send {
        async move {
            let rows = sqlx::query("SELECT id, name FROM payment_methods ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?;
            rows.iter()
                .map(|row| {
                    Ok(PaymentMethod {
                        id: row.try_get("id")?,
                        name: row.try_get("name")?,
                    })
                })
                .collect::<std::result::Result<_, sqlx::Error>>()
                .map_err(db_err)
        }
    }

    fn payment_method_by_id(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<PaymentMethod>>> + Send {
        async move {
            sqlx::query("SELECT id, name FROM payment_methods WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?
                .map(|row| {
                    Ok(PaymentMethod {
                        id: row.try_get("id")?,
                        name: row.try_get("name")?,
                    })
                })
                .transpose()
                .map_err(db_err)
        }
    }

    fn create_payment(&self, payment: NewPayment) -> impl Future<Output = Result<i64>> + Send {
        async move {
            let row = sqlx::query(
                "INSERT INTO payments (booking_id, payment_method_id, status, details, paid_at) \
                 VALUES ($1, $2, $3, $4::jsonb, \
                         CASE WHEN $3 = 'completed' THEN NOW() ELSE NULL END) \
                 RETURNING id",
            )
            .bind(payment.booking_id)
            .bind(payment.payment_method_id)
            .bind(payment.status.as_str())
            .bind(&payment.details)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
            row.try_get("id").map_err(db_err)
        }
    }

    fn payment_by_booking(
        &self,
        booking_id: i64,
    ) -> impl Future<Output = Result<Option<Payment>>> + Send {
        async move {
            sqlx::query(
                "SELECT id, booking_id, payment_method_id, status, paid_at \
                 FROM payments WHERE booking_id = $1 ORDER BY id DESC LIMIT 1",
            )
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(|row| map_payment(&row))
            .transpose()
            .map_err(db_err)
        }
    }
}
