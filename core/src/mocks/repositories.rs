//! In-memory repository backend.

// Mocks convert between lengths and domain counts freely.
#![allow(clippy::cast_possible_wrap, clippy::cast_precision_loss)]

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime, Utc};

use crate::entities::{
    Booking, BookingSeat, BookingStatus, Cinema, Movie, NewBooking, NewOtp, NewPayment,
    NewSession, NewUser, Otp, Payment, PaymentMethod, PaymentStatus, PriceStats, Seat,
    SeatAvailability, Session, Showtime, Studio, User,
};
use crate::error::{CoreError, Result, SubQuery};
use crate::repository::{
    AuthRepository, BookingRepository, CinemaRepository, DashboardRepository, MovieRepository,
    PaymentRepository, SeatRepository,
};

#[derive(Debug, Default)]
struct MockData {
    users: Vec<User>,
    sessions: Vec<Session>,
    otps: Vec<Otp>,
    cinemas: Vec<Cinema>,
    studios: Vec<Studio>,
    seats: Vec<Seat>,
    movies: Vec<Movie>,
    showtimes: Vec<Showtime>,
    bookings: Vec<Booking>,
    booking_seats: Vec<BookingSeat>,
    payment_methods: Vec<PaymentMethod>,
    payments: Vec<Payment>,
    // (payment id, details JSON), since Payment does not carry details.
    payment_details: Vec<(i64, String)>,
}

/// Latency and failure injection for one dashboard read.
#[derive(Debug, Clone, Copy, Default)]
struct ReadFault {
    latency: Option<Duration>,
    fail: bool,
}

#[derive(Debug, Default)]
struct ReadCalls {
    latest: AtomicUsize,
    count: AtomicUsize,
    stats: AtomicUsize,
}

/// In-memory implementation of every repository trait.
///
/// Cloning shares the underlying state, like cloning a connection pool.
#[derive(Debug, Clone, Default)]
pub struct MockRepositories {
    data: Arc<Mutex<MockData>>,
    calls: Arc<ReadCalls>,
    // Indexed by `fault_index`.
    faults: [ReadFault; 3],
}

const fn fault_index(query: SubQuery) -> usize {
    match query {
        SubQuery::LatestBookings => 0,
        SubQuery::BookingCount => 1,
        SubQuery::RevenueStats => 2,
    }
}

fn next_id<T>(items: &[T], id_of: impl Fn(&T) -> i64) -> i64 {
    items.iter().map(id_of).max().unwrap_or(0) + 1
}

impl MockRepositories {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A small but complete catalog: one cinema with one four-seat studio,
    /// one movie, one showtime (id 1, price 50.0 per seat, seats 1..=4),
    /// and two payment methods (ids 1 and 2).
    #[must_use]
    pub fn seeded_catalog() -> Self {
        let repo = Self::new();
        {
            let mut data = repo.data();
            data.cinemas.push(Cinema {
                id: 1,
                name: "Grand Central".to_string(),
                location: "Springfield".to_string(),
            });
            data.studios.push(Studio {
                id: 1,
                cinema_id: 1,
                name: "Studio 1".to_string(),
                total_seats: 4,
            });
            for (id, code) in [(1, "A1"), (2, "A2"), (3, "A3"), (4, "A4")] {
                data.seats.push(Seat {
                    id,
                    studio_id: 1,
                    seat_code: code.to_string(),
                });
            }
            data.movies.push(Movie {
                id: 1,
                title: "The Long Intermission".to_string(),
                poster_url: "https://posters.example.com/1.jpg".to_string(),
                genres: vec!["Drama".to_string(), "Comedy".to_string()],
                rating: 8.1,
                duration_minutes: 128,
            });
            data.showtimes.push(Showtime {
                id: 1,
                cinema_id: 1,
                studio_id: 1,
                movie_id: 1,
                show_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap_or_default(),
                show_time: NaiveTime::from_hms_opt(19, 30, 0).unwrap_or_default(),
                price: 50.0,
                movie: None,
                studio: None,
            });
            data.payment_methods.push(PaymentMethod {
                id: 1,
                name: "Credit Card".to_string(),
            });
            data.payment_methods.push(PaymentMethod {
                id: 2,
                name: "Bank Transfer".to_string(),
            });
        }
        repo
    }

    /// Inserts a verified user with an unusable password hash and returns
    /// its id. For tests that need an account but never log in.
    pub fn seed_verified_user(&self, username: &str, email: &str) -> i64 {
        let mut data = self.data();
        let id = next_id(&data.users, |u| u.id);
        let now = Utc::now();
        data.users.push(User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: String::new(),
            is_verified: true,
            created_at: now,
            updated_at: now,
        });
        id
    }

    /// Seeds bookings as-is.
    #[must_use]
    pub fn with_bookings(self, bookings: Vec<Booking>) -> Self {
        self.data().bookings.extend(bookings);
        self
    }

    /// Seeds cinemas as-is.
    #[must_use]
    pub fn with_cinemas(self, cinemas: Vec<Cinema>) -> Self {
        self.data().cinemas.extend(cinemas);
        self
    }

    /// Seeds studios as-is.
    #[must_use]
    pub fn with_studios(self, studios: Vec<Studio>) -> Self {
        self.data().studios.extend(studios);
        self
    }

    /// Seeds movies as-is.
    #[must_use]
    pub fn with_movies(self, movies: Vec<Movie>) -> Self {
        self.data().movies.extend(movies);
        self
    }

    /// Delays one dashboard read by `latency` on every call.
    #[must_use]
    pub fn with_read_latency(mut self, query: SubQuery, latency: Duration) -> Self {
        self.faults[fault_index(query)].latency = Some(latency);
        self
    }

    /// Makes one dashboard read fail with a database error on every call.
    #[must_use]
    pub fn with_failing_read(mut self, query: SubQuery) -> Self {
        self.faults[fault_index(query)].fail = true;
        self
    }

    /// How many times each dashboard read was issued:
    /// `(latest_bookings, booking_count, revenue_stats)`.
    #[must_use]
    pub fn dashboard_read_calls(&self) -> (usize, usize, usize) {
        (
            self.calls.latest.load(Ordering::SeqCst),
            self.calls.count.load(Ordering::SeqCst),
            self.calls.stats.load(Ordering::SeqCst),
        )
    }

    /// The latest unconsumed OTP code issued to `user_id`, if any.
    #[must_use]
    pub fn issued_otp_code(&self, user_id: i64) -> Option<String> {
        self.data()
            .otps
            .iter()
            .filter(|otp| otp.user_id == user_id && !otp.is_used)
            .max_by_key(|otp| otp.id)
            .map(|otp| otp.code.clone())
    }

    /// Number of stored users.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.data().users.len()
    }

    /// The details JSON recorded with payment `payment_id`, if any.
    #[must_use]
    pub fn payment_details(&self, payment_id: i64) -> Option<String> {
        self.data()
            .payment_details
            .iter()
            .find(|(id, _)| *id == payment_id)
            .map(|(_, details)| details.clone())
    }

    fn data(&self) -> MutexGuard<'_, MockData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn simulate_read(&self, query: SubQuery) -> Result<()> {
        let fault = self.faults[fault_index(query)];
        if let Some(latency) = fault.latency {
            tokio::time::sleep(latency).await;
        }
        if fault.fail {
            return Err(CoreError::Database("injected failure".to_string()));
        }
        Ok(())
    }
}

impl AuthRepository for MockRepositories {
    fn create_user(&self, user: NewUser) -> impl Future<Output = Result<i64>> + Send {
        let mut data = self.data();
        let id = next_id(&data.users, |u| u.id);
        let now = Utc::now();
        data.users.push(User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            is_verified: false,
            created_at: now,
            updated_at: now,
        });
        async move { Ok(id) }
    }

    fn user_by_id(&self, id: i64) -> impl Future<Output = Result<Option<User>>> + Send {
        let user = self.data().users.iter().find(|u| u.id == id).cloned();
        async move { Ok(user) }
    }

    fn user_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>>> + Send {
        let user = self
            .data()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned();
        async move { Ok(user) }
    }

    fn user_by_email(&self, email: &str) -> impl Future<Output = Result<Option<User>>> + Send {
        let user = self.data().users.iter().find(|u| u.email == email).cloned();
        async move { Ok(user) }
    }

    fn mark_user_verified(&self, user_id: i64) -> impl Future<Output = Result<()>> + Send {
        let mut data = self.data();
        if let Some(user) = data.users.iter_mut().find(|u| u.id == user_id) {
            user.is_verified = true;
            user.updated_at = Utc::now();
        }
        async move { Ok(()) }
    }

    fn create_otp(&self, otp: NewOtp) -> impl Future<Output = Result<i64>> + Send {
        let mut data = self.data();
        let id = next_id(&data.otps, |o| o.id);
        data.otps.push(Otp {
            id,
            user_id: otp.user_id,
            code: otp.code,
            expired_at: otp.expired_at,
            is_used: false,
            created_at: Utc::now(),
        });
        async move { Ok(id) }
    }

    fn valid_otp(
        &self,
        user_id: i64,
        code: &str,
    ) -> impl Future<Output = Result<Option<Otp>>> + Send {
        let now = Utc::now();
        let otp = self
            .data()
            .otps
            .iter()
            .find(|o| o.user_id == user_id && o.code == code && !o.is_used && o.expired_at > now)
            .cloned();
        async move { Ok(otp) }
    }

    fn mark_otp_used(&self, otp_id: i64) -> impl Future<Output = Result<()>> + Send {
        let mut data = self.data();
        if let Some(otp) = data.otps.iter_mut().find(|o| o.id == otp_id) {
            otp.is_used = true;
        }
        async move { Ok(()) }
    }

    fn invalidate_otps(&self, user_id: i64) -> impl Future<Output = Result<()>> + Send {
        let mut data = self.data();
        for otp in data.otps.iter_mut().filter(|o| o.user_id == user_id) {
            otp.is_used = true;
        }
        async move { Ok(()) }
    }

    fn create_session(&self, session: NewSession) -> impl Future<Output = Result<i64>> + Send {
        let mut data = self.data();
        let id = next_id(&data.sessions, |s| s.id);
        data.sessions.push(Session {
            id,
            user_id: session.user_id,
            token: session.token,
            expired_at: session.expired_at,
            revoked_at: None,
            created_at: Utc::now(),
        });
        async move { Ok(id) }
    }

    fn session_by_token(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Option<Session>>> + Send {
        let session = self
            .data()
            .sessions
            .iter()
            .find(|s| s.token == token)
            .cloned();
        async move { Ok(session) }
    }

    fn revoke_session(&self, token: &str) -> impl Future<Output = Result<()>> + Send {
        let mut data = self.data();
        if let Some(session) = data.sessions.iter_mut().find(|s| s.token == token) {
            session.revoked_at = Some(Utc::now());
        }
        async move { Ok(()) }
    }
}

impl CinemaRepository for MockRepositories {
    fn cinemas(
        &self,
        page: crate::pagination::PageRequest,
    ) -> impl Future<Output = Result<Vec<Cinema>>> + Send {
        let mut cinemas = self.data().cinemas.clone();
        cinemas.sort_by_key(|c| c.id);
        let cinemas: Vec<Cinema> = cinemas
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(0))
            .take(usize::try_from(page.limit).unwrap_or(0))
            .collect();
        async move { Ok(cinemas) }
    }

    fn cinema_count(&self) -> impl Future<Output = Result<i64>> + Send {
        let count = self.data().cinemas.len() as i64;
        async move { Ok(count) }
    }

    fn cinema_by_id(&self, id: i64) -> impl Future<Output = Result<Option<Cinema>>> + Send {
        let cinema = self.data().cinemas.iter().find(|c| c.id == id).cloned();
        async move { Ok(cinema) }
    }

    fn studios_by_cinema(
        &self,
        cinema_id: i64,
    ) -> impl Future<Output = Result<Vec<Studio>>> + Send {
        let studios: Vec<Studio> = self
            .data()
            .studios
            .iter()
            .filter(|s| s.cinema_id == cinema_id)
            .cloned()
            .collect();
        async move { Ok(studios) }
    }

    fn showtimes_by_cinema(
        &self,
        cinema_id: i64,
    ) -> impl Future<Output = Result<Vec<Showtime>>> + Send {
        let data = self.data();
        let showtimes: Vec<Showtime> = data
            .showtimes
            .iter()
            .filter(|st| st.cinema_id == cinema_id)
            .map(|st| {
                let mut showtime = st.clone();
                showtime.movie = data.movies.iter().find(|m| m.id == st.movie_id).cloned();
                showtime.studio = data.studios.iter().find(|s| s.id == st.studio_id).cloned();
                showtime
            })
            .collect();
        drop(data);
        async move { Ok(showtimes) }
    }
}

impl MovieRepository for MockRepositories {
    fn movies(
        &self,
        page: crate::pagination::PageRequest,
    ) -> impl Future<Output = Result<Vec<Movie>>> + Send {
        let mut movies = self.data().movies.clone();
        movies.sort_by_key(|m| m.id);
        let movies: Vec<Movie> = movies
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(0))
            .take(usize::try_from(page.limit).unwrap_or(0))
            .collect();
        async move { Ok(movies) }
    }

    fn movie_count(&self) -> impl Future<Output = Result<i64>> + Send {
        let count = self.data().movies.len() as i64;
        async move { Ok(count) }
    }

    fn movie_by_id(&self, id: i64) -> impl Future<Output = Result<Option<Movie>>> + Send {
        let movie = self.data().movies.iter().find(|m| m.id == id).cloned();
        async move { Ok(movie) }
    }
}

impl MockData {
    /// Seat ids held by non-cancelled bookings for `showtime_id`.
    fn held_seats(&self, showtime_id: i64) -> Vec<i64> {
        self.bookings
            .iter()
            .filter(|b| b.showtime_id == showtime_id && b.status != BookingStatus::Cancelled)
            .flat_map(|b| {
                self.booking_seats
                    .iter()
                    .filter(move |bs| bs.booking_id == b.id)
                    .map(|bs| bs.seat_id)
            })
            .collect()
    }
}

impl SeatRepository for MockRepositories {
    fn seat_availability(
        &self,
        cinema_id: i64,
        date: NaiveDate,
        time: NaiveTime,
    ) -> impl Future<Output = Result<Vec<SeatAvailability>>> + Send {
        let data = self.data();
        let availability = data
            .showtimes
            .iter()
            .find(|st| st.cinema_id == cinema_id && st.show_date == date && st.show_time == time)
            .map(|showtime| {
                let held = data.held_seats(showtime.id);
                data.seats
                    .iter()
                    .filter(|seat| seat.studio_id == showtime.studio_id)
                    .map(|seat| SeatAvailability {
                        id: seat.id,
                        seat_code: seat.seat_code.clone(),
                        studio_id: seat.studio_id,
                        is_booked: held.contains(&seat.id),
                    })
                    .collect()
            })
            .unwrap_or_default();
        drop(data);
        async move { Ok(availability) }
    }

    fn seats_by_ids(&self, seat_ids: &[i64]) -> impl Future<Output = Result<Vec<Seat>>> + Send {
        let seats: Vec<Seat> = self
            .data()
            .seats
            .iter()
            .filter(|seat| seat_ids.contains(&seat.id))
            .cloned()
            .collect();
        async move { Ok(seats) }
    }

    fn seats_available(
        &self,
        showtime_id: i64,
        seat_ids: &[i64],
    ) -> impl Future<Output = Result<bool>> + Send {
        let held = self.data().held_seats(showtime_id);
        let available = seat_ids.iter().all(|id| !held.contains(id));
        async move { Ok(available) }
    }
}

impl BookingRepository for MockRepositories {
    fn showtime_by_id(&self, id: i64) -> impl Future<Output = Result<Option<Showtime>>> + Send {
        let showtime = self.data().showtimes.iter().find(|s| s.id == id).cloned();
        async move { Ok(showtime) }
    }

    fn create_booking(
        &self,
        booking: NewBooking,
        seat_ids: &[i64],
        seat_price: f64,
    ) -> impl Future<Output = Result<i64>> + Send {
        let mut data = self.data();
        let id = next_id(&data.bookings, |b| b.id);
        data.bookings.push(Booking {
            id,
            user_id: booking.user_id,
            showtime_id: booking.showtime_id,
            status: BookingStatus::Pending,
            total_amount: seat_price * seat_ids.len() as f64,
            created_at: Utc::now(),
        });
        let mut seat_row_id = next_id(&data.booking_seats, |bs| bs.id);
        for &seat_id in seat_ids {
            data.booking_seats.push(BookingSeat {
                id: seat_row_id,
                booking_id: id,
                seat_id,
                price: seat_price,
            });
            seat_row_id += 1;
        }
        async move { Ok(id) }
    }

    fn booking_by_id(&self, id: i64) -> impl Future<Output = Result<Option<Booking>>> + Send {
        let booking = self.data().bookings.iter().find(|b| b.id == id).cloned();
        async move { Ok(booking) }
    }

    fn bookings_by_user(
        &self,
        user_id: i64,
    ) -> impl Future<Output = Result<Vec<Booking>>> + Send {
        let mut bookings: Vec<Booking> = self
            .data()
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.id.cmp(&a.id));
        async move { Ok(bookings) }
    }

    fn booking_seats(
        &self,
        booking_id: i64,
    ) -> impl Future<Output = Result<Vec<BookingSeat>>> + Send {
        let rows: Vec<BookingSeat> = self
            .data()
            .booking_seats
            .iter()
            .filter(|bs| bs.booking_id == booking_id)
            .cloned()
            .collect();
        async move { Ok(rows) }
    }

    fn update_booking_status(
        &self,
        booking_id: i64,
        status: BookingStatus,
    ) -> impl Future<Output = Result<()>> + Send {
        let mut data = self.data();
        if let Some(booking) = data.bookings.iter_mut().find(|b| b.id == booking_id) {
            booking.status = status;
        }
        async move { Ok(()) }
    }
}

impl PaymentRepository for MockRepositories {
    fn payment_methods(&self) -> impl Future<Output = Result<Vec<PaymentMethod>>> + Send {
        let methods = self.data().payment_methods.clone();
        async move { Ok(methods) }
    }

    fn payment_method_by_id(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<PaymentMethod>>> + Send {
        let method = self
            .data()
            .payment_methods
            .iter()
            .find(|m| m.id == id)
            .cloned();
        async move { Ok(method) }
    }

    fn create_payment(&self, payment: NewPayment) -> impl Future<Output = Result<i64>> + Send {
        let mut data = self.data();
        let id = next_id(&data.payments, |p| p.id);
        let paid_at = (payment.status == PaymentStatus::Completed).then(Utc::now);
        data.payments.push(Payment {
            id,
            booking_id: payment.booking_id,
            payment_method_id: payment.payment_method_id,
            status: payment.status,
            paid_at,
        });
        data.payment_details.push((id, payment.details));
        async move { Ok(id) }
    }

    fn payment_by_booking(
        &self,
        booking_id: i64,
    ) -> impl Future<Output = Result<Option<Payment>>> + Send {
        let payment = self
            .data()
            .payments
            .iter()
            .find(|p| p.booking_id == booking_id)
            .cloned();
        async move { Ok(payment) }
    }
}

impl DashboardRepository for MockRepositories {
    fn latest_bookings(&self, limit: i64) -> impl Future<Output = Result<Vec<Booking>>> + Send {
        self.calls.latest.fetch_add(1, Ordering::SeqCst);
        let this = self.clone();
        async move {
            this.simulate_read(SubQuery::LatestBookings).await?;
            let mut bookings = this.data().bookings.clone();
            bookings.sort_by(|a, b| b.id.cmp(&a.id));
            bookings.truncate(usize::try_from(limit).unwrap_or(0));
            Ok(bookings)
        }
    }

    fn booking_count(&self) -> impl Future<Output = Result<i64>> + Send {
        self.calls.count.fetch_add(1, Ordering::SeqCst);
        let this = self.clone();
        async move {
            this.simulate_read(SubQuery::BookingCount).await?;
            Ok(this.data().bookings.len() as i64)
        }
    }

    fn revenue_stats(&self) -> impl Future<Output = Result<PriceStats>> + Send {
        self.calls.stats.fetch_add(1, Ordering::SeqCst);
        let this = self.clone();
        async move {
            this.simulate_read(SubQuery::RevenueStats).await?;
            let data = this.data();
            if data.bookings.is_empty() {
                return Ok(PriceStats::default());
            }
            let totals: Vec<f64> = data.bookings.iter().map(|b| b.total_amount).collect();
            drop(data);
            let min = totals.iter().copied().fold(f64::INFINITY, f64::min);
            let max = totals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let avg = totals.iter().sum::<f64>() / totals.len() as f64;
            Ok(PriceStats { min, max, avg })
        }
    }
}
