//! Booking creation and per-user booking history.

use serde::Serialize;

use crate::entities::{Booking, NewBooking, Payment, Seat, Showtime};
use crate::error::{CoreError, Result};
use crate::providers::email::send_detached;
use crate::providers::EmailSender;
use crate::repository::{AuthRepository, BookingRepository, PaymentRepository, SeatRepository};

/// Booking creation input.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    /// Showtime to book.
    pub showtime_id: i64,
    /// Seats to hold. Must be non-empty.
    pub seat_ids: Vec<i64>,
    /// Intended payment method (validated, not charged yet).
    pub payment_method_id: i64,
}

/// A booking with everything needed to display it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingDetail {
    /// The booking itself.
    pub booking: Booking,
    /// The booked showtime.
    pub showtime: Showtime,
    /// The held seats.
    pub seats: Vec<Seat>,
    /// The payment, once one was processed.
    pub payment: Option<Payment>,
}

/// Creates bookings and lists a user's booking history.
#[derive(Debug, Clone)]
pub struct BookingUsecase<R, E> {
    repo: R,
    email: E,
}

impl<R, E> BookingUsecase<R, E>
where
    R: AuthRepository + BookingRepository + SeatRepository + PaymentRepository + Clone,
    E: EmailSender + Clone + 'static,
{
    /// Creates the usecase.
    pub const fn new(repo: R, email: E) -> Self {
        Self { repo, email }
    }

    /// Books seats for a showtime.
    ///
    /// Availability is a pre-check only: two simultaneous requests for the
    /// same seats can both pass it and double-book. The insert itself is
    /// transactional, so a booking and its seat rows never diverge.
    ///
    /// A confirmation email goes out on a detached task; delivery failures
    /// are logged, never surfaced.
    ///
    /// # Errors
    ///
    /// [`CoreError::Validation`] for an empty seat list,
    /// [`CoreError::NotFound`] for an unknown showtime or payment method,
    /// [`CoreError::SeatsUnavailable`] when any seat is already held.
    pub async fn create(&self, user_id: i64, request: CreateBooking) -> Result<BookingDetail> {
        if request.seat_ids.is_empty() {
            return Err(CoreError::Validation(
                "at least one seat is required".to_string(),
            ));
        }

        let showtime = self
            .repo
            .showtime_by_id(request.showtime_id)
            .await?
            .ok_or(CoreError::NotFound {
                resource: "Showtime",
            })?;

        if !self
            .repo
            .seats_available(request.showtime_id, &request.seat_ids)
            .await?
        {
            return Err(CoreError::SeatsUnavailable);
        }

        self.repo
            .payment_method_by_id(request.payment_method_id)
            .await?
            .ok_or(CoreError::NotFound {
                resource: "Payment method",
            })?;

        let booking_id = self
            .repo
            .create_booking(
                NewBooking {
                    user_id,
                    showtime_id: request.showtime_id,
                },
                &request.seat_ids,
                showtime.price,
            )
            .await?;

        let booking = self
            .repo
            .booking_by_id(booking_id)
            .await?
            .ok_or(CoreError::Internal)?;
        let seats = self.repo.seats_by_ids(&request.seat_ids).await?;

        if let Some(user) = self.repo.user_by_id(user_id).await? {
            send_detached(
                self.email.clone(),
                user.email,
                user.username.clone(),
                "Booking Confirmation - CineBook".to_string(),
                format!(
                    "Hi {},\n\nYour booking #{} for {} seat(s) is confirmed. \
                     Total: {:.2}. Complete the payment to secure your seats.",
                    user.username,
                    booking.id,
                    seats.len(),
                    booking.total_amount
                ),
            );
        }

        Ok(BookingDetail {
            booking,
            showtime,
            seats,
            payment: None,
        })
    }

    /// The user's bookings, newest first, each with showtime, seats, and
    /// payment (when processed).
    ///
    /// # Errors
    ///
    /// Propagates storage errors; a booking whose showtime has vanished is
    /// reported as [`CoreError::Internal`].
    pub async fn user_bookings(&self, user_id: i64) -> Result<Vec<BookingDetail>> {
        let bookings = self.repo.bookings_by_user(user_id).await?;

        let mut details = Vec::with_capacity(bookings.len());
        for booking in bookings {
            let showtime = self
                .repo
                .showtime_by_id(booking.showtime_id)
                .await?
                .ok_or(CoreError::Internal)?;
            let seat_ids: Vec<i64> = self
                .repo
                .booking_seats(booking.id)
                .await?
                .into_iter()
                .map(|bs| bs.seat_id)
                .collect();
            let seats = self.repo.seats_by_ids(&seat_ids).await?;
            let payment = self.repo.payment_by_booking(booking.id).await?;

            details.push(BookingDetail {
                booking,
                showtime,
                seats,
                payment,
            });
        }
        Ok(details)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::BookingStatus;
    use crate::mocks::{MockEmailSender, MockRepositories};

    fn usecase(repo: MockRepositories) -> BookingUsecase<MockRepositories, MockEmailSender> {
        BookingUsecase::new(repo, MockEmailSender::new())
    }

    fn request(seat_ids: Vec<i64>) -> CreateBooking {
        CreateBooking {
            showtime_id: 1,
            seat_ids,
            payment_method_id: 1,
        }
    }

    #[tokio::test]
    async fn booking_snapshots_price_times_seats() {
        let repo = MockRepositories::seeded_catalog();
        let user_id = repo.seed_verified_user("fan", "fan@example.com");
        let booking = usecase(repo);

        let detail = booking.create(user_id, request(vec![1, 2])).await.unwrap();

        assert_eq!(detail.booking.status, BookingStatus::Pending);
        assert_eq!(detail.seats.len(), 2);
        // Seeded showtime price is 50.0 per seat.
        assert!((detail.booking.total_amount - 100.0).abs() < f64::EPSILON);
        assert!(detail.payment.is_none());
    }

    #[tokio::test]
    async fn booked_seats_cannot_be_booked_again() {
        let repo = MockRepositories::seeded_catalog();
        let user_id = repo.seed_verified_user("fan", "fan@example.com");
        let rival_id = repo.seed_verified_user("rival", "rival@example.com");
        let booking = usecase(repo);

        booking.create(user_id, request(vec![1, 2])).await.unwrap();

        // Overlapping and fully-contained requests both fail.
        assert_eq!(
            booking.create(rival_id, request(vec![2, 3])).await,
            Err(CoreError::SeatsUnavailable)
        );
        assert_eq!(
            booking.create(rival_id, request(vec![1])).await,
            Err(CoreError::SeatsUnavailable)
        );
        // Disjoint seats still work.
        assert!(booking.create(rival_id, request(vec![3, 4])).await.is_ok());
    }

    #[tokio::test]
    async fn invalid_references_are_rejected() {
        let repo = MockRepositories::seeded_catalog();
        let user_id = repo.seed_verified_user("fan", "fan@example.com");
        let booking = usecase(repo);

        assert!(matches!(
            booking.create(user_id, request(vec![])).await,
            Err(CoreError::Validation(_))
        ));

        let mut bad_showtime = request(vec![1]);
        bad_showtime.showtime_id = 99;
        assert_eq!(
            booking.create(user_id, bad_showtime).await,
            Err(CoreError::NotFound {
                resource: "Showtime"
            })
        );

        let mut bad_method = request(vec![1]);
        bad_method.payment_method_id = 99;
        assert_eq!(
            booking.create(user_id, bad_method).await,
            Err(CoreError::NotFound {
                resource: "Payment method"
            })
        );
    }

    #[tokio::test]
    async fn history_lists_own_bookings_with_details() {
        let repo = MockRepositories::seeded_catalog();
        let user_id = repo.seed_verified_user("fan", "fan@example.com");
        let other_id = repo.seed_verified_user("other", "other@example.com");
        let booking = usecase(repo);

        booking.create(user_id, request(vec![1])).await.unwrap();
        booking.create(other_id, request(vec![2])).await.unwrap();
        booking.create(user_id, request(vec![3])).await.unwrap();

        let history = booking.user_bookings(user_id).await.unwrap();
        assert_eq!(history.len(), 2);
        // Newest first.
        assert!(history[0].booking.id > history[1].booking.id);
        assert!(history.iter().all(|d| d.booking.user_id == user_id));
        assert!(history.iter().all(|d| d.showtime.id == 1));
    }

    #[tokio::test]
    async fn confirmation_email_goes_to_the_booker() {
        let repo = MockRepositories::seeded_catalog();
        let user_id = repo.seed_verified_user("fan", "fan@example.com");
        let email = MockEmailSender::new();
        let booking = BookingUsecase::new(repo, email.clone());

        booking.create(user_id, request(vec![1])).await.unwrap();
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        let sent = email.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "fan@example.com");
        assert!(sent[0].subject.contains("Booking"));
    }
}
