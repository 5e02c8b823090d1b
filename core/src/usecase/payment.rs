//! Payment method listing and payment processing.

use crate::entities::{BookingStatus, NewPayment, Payment, PaymentMethod, PaymentStatus};
use crate::error::{CoreError, Result};
use crate::providers::email::send_detached;
use crate::providers::EmailSender;
use crate::repository::{AuthRepository, BookingRepository, PaymentRepository};

/// Payment input.
#[derive(Debug, Clone)]
pub struct PayRequest {
    /// Booking to settle.
    pub booking_id: i64,
    /// Method to charge.
    pub payment_method_id: i64,
    /// Free-form details from the client, stored verbatim as JSON.
    pub details: Option<serde_json::Value>,
}

/// Settles bookings and lists payment methods.
#[derive(Debug, Clone)]
pub struct PaymentUsecase<R, E> {
    repo: R,
    email: E,
}

impl<R, E> PaymentUsecase<R, E>
where
    R: AuthRepository + BookingRepository + PaymentRepository + Clone,
    E: EmailSender + Clone + 'static,
{
    /// Creates the usecase.
    pub const fn new(repo: R, email: E) -> Self {
        Self { repo, email }
    }

    /// All supported payment methods.
    ///
    /// # Errors
    ///
    /// Propagates storage errors.
    pub async fn methods(&self) -> Result<Vec<PaymentMethod>> {
        self.repo.payment_methods().await
    }

    /// Settles a pending booking owned by `user_id`.
    ///
    /// Records a completed payment and flips the booking to paid. A
    /// confirmation email goes out on a detached task.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] for an unknown booking or method,
    /// [`CoreError::BookingNotOwned`] when the booking belongs to someone
    /// else, [`CoreError::BookingAlreadyPaid`] /
    /// [`CoreError::BookingCancelled`] for non-pending bookings.
    pub async fn pay(&self, user_id: i64, request: PayRequest) -> Result<Payment> {
        let booking = self
            .repo
            .booking_by_id(request.booking_id)
            .await?
            .ok_or(CoreError::NotFound {
                resource: "Booking",
            })?;

        if booking.user_id != user_id {
            return Err(CoreError::BookingNotOwned);
        }
        match booking.status {
            BookingStatus::Paid => return Err(CoreError::BookingAlreadyPaid),
            BookingStatus::Cancelled => return Err(CoreError::BookingCancelled),
            BookingStatus::Pending => {}
        }

        self.repo
            .payment_method_by_id(request.payment_method_id)
            .await?
            .ok_or(CoreError::NotFound {
                resource: "Payment method",
            })?;

        let details = request
            .details
            .map_or_else(|| "{}".to_string(), |value| value.to_string());

        self.repo
            .create_payment(NewPayment {
                booking_id: booking.id,
                payment_method_id: request.payment_method_id,
                status: PaymentStatus::Completed,
                details,
            })
            .await?;
        self.repo
            .update_booking_status(booking.id, BookingStatus::Paid)
            .await?;

        let payment = self
            .repo
            .payment_by_booking(booking.id)
            .await?
            .ok_or(CoreError::Internal)?;

        if let Some(user) = self.repo.user_by_id(user_id).await? {
            send_detached(
                self.email.clone(),
                user.email,
                user.username.clone(),
                "Payment Confirmation - CineBook".to_string(),
                format!(
                    "Hi {},\n\nYour payment of {:.2} for booking #{} is complete. \
                     Enjoy the show!",
                    user.username, booking.total_amount, booking.id
                ),
            );
        }

        Ok(payment)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mocks::{MockEmailSender, MockRepositories};
    use crate::usecase::{BookingUsecase, CreateBooking};

    async fn booked_fixture() -> (MockRepositories, i64, i64) {
        let repo = MockRepositories::seeded_catalog();
        let user_id = repo.seed_verified_user("fan", "fan@example.com");
        let booking = BookingUsecase::new(repo.clone(), MockEmailSender::new());
        let detail = booking
            .create(
                user_id,
                CreateBooking {
                    showtime_id: 1,
                    seat_ids: vec![1, 2],
                    payment_method_id: 1,
                },
            )
            .await
            .unwrap();
        (repo, user_id, detail.booking.id)
    }

    fn pay_request(booking_id: i64) -> PayRequest {
        PayRequest {
            booking_id,
            payment_method_id: 1,
            details: Some(serde_json::json!({ "info": "paid in test" })),
        }
    }

    #[tokio::test]
    async fn payment_settles_the_booking() {
        let (repo, user_id, booking_id) = booked_fixture().await;
        let payments = PaymentUsecase::new(repo.clone(), MockEmailSender::new());

        let payment = payments.pay(user_id, pay_request(booking_id)).await.unwrap();

        assert_eq!(payment.status, PaymentStatus::Completed);
        assert!(payment.paid_at.is_some());

        let usecase = BookingUsecase::new(repo, MockEmailSender::new());
        let history = usecase.user_bookings(user_id).await.unwrap();
        assert_eq!(history[0].booking.status, BookingStatus::Paid);
        assert!(history[0].payment.is_some());
    }

    #[tokio::test]
    async fn payment_details_are_stored_verbatim() {
        let (repo, user_id, booking_id) = booked_fixture().await;
        let payments = PaymentUsecase::new(repo.clone(), MockEmailSender::new());

        let payment = payments.pay(user_id, pay_request(booking_id)).await.unwrap();
        assert_eq!(
            repo.payment_details(payment.id).as_deref(),
            Some(r#"{"info":"paid in test"}"#)
        );

        // Missing details fall back to an empty JSON object.
        let bookings = BookingUsecase::new(repo.clone(), MockEmailSender::new());
        let second = bookings
            .create(
                user_id,
                CreateBooking {
                    showtime_id: 1,
                    seat_ids: vec![3, 4],
                    payment_method_id: 1,
                },
            )
            .await
            .unwrap();
        let payment = payments
            .pay(
                user_id,
                PayRequest {
                    booking_id: second.booking.id,
                    payment_method_id: 1,
                    details: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(repo.payment_details(payment.id).as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn double_payment_is_rejected() {
        let (repo, user_id, booking_id) = booked_fixture().await;
        let payments = PaymentUsecase::new(repo, MockEmailSender::new());

        payments.pay(user_id, pay_request(booking_id)).await.unwrap();
        assert_eq!(
            payments.pay(user_id, pay_request(booking_id)).await,
            Err(CoreError::BookingAlreadyPaid)
        );
    }

    #[tokio::test]
    async fn only_the_owner_can_pay() {
        let (repo, _user_id, booking_id) = booked_fixture().await;
        let stranger_id = repo.seed_verified_user("stranger", "stranger@example.com");
        let payments = PaymentUsecase::new(repo, MockEmailSender::new());

        assert_eq!(
            payments.pay(stranger_id, pay_request(booking_id)).await,
            Err(CoreError::BookingNotOwned)
        );
    }

    #[tokio::test]
    async fn unknown_booking_and_method_are_rejected() {
        let (repo, user_id, booking_id) = booked_fixture().await;
        let payments = PaymentUsecase::new(repo, MockEmailSender::new());

        assert_eq!(
            payments.pay(user_id, pay_request(999)).await,
            Err(CoreError::NotFound {
                resource: "Booking"
            })
        );

        let mut bad_method = pay_request(booking_id);
        bad_method.payment_method_id = 99;
        assert_eq!(
            payments.pay(user_id, bad_method).await,
            Err(CoreError::NotFound {
                resource: "Payment method"
            })
        );
    }

    #[tokio::test]
    async fn methods_come_from_the_store() {
        let repo = MockRepositories::seeded_catalog();
        let payments = PaymentUsecase::new(repo, MockEmailSender::new());

        let methods = payments.methods().await.unwrap();
        assert!(!methods.is_empty());
    }
}
