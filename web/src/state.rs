//! Shared application state: one usecase per feature area.

use std::time::Duration;

use cinebook_core::providers::EmailSender;
use cinebook_core::usecase::{
    AuthUsecase, BookingUsecase, CinemaUsecase, DashboardUsecase, MovieUsecase, PaymentUsecase,
    ShowtimeUsecase, DEFAULT_DEADLINE,
};
use cinebook_core::{AuthConfig, Repositories};

/// Knobs the binary wires in from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Auth usecase configuration.
    pub auth: AuthConfig,
    /// Shared deadline for one dashboard call.
    pub dashboard_deadline: Duration,
    /// Dashboard row limit when the query string omits one.
    pub dashboard_limit: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            auth: AuthConfig::default(),
            dashboard_deadline: DEFAULT_DEADLINE,
            dashboard_limit: 10,
        }
    }
}

/// Everything handlers need, built once and shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AppState<R, E> {
    /// Account lifecycle.
    pub auth: AuthUsecase<R, E>,
    /// Cinema browsing.
    pub cinemas: CinemaUsecase<R>,
    /// Movie catalog.
    pub movies: MovieUsecase<R>,
    /// Showtimes and seat availability.
    pub showtimes: ShowtimeUsecase<R>,
    /// Booking creation and history.
    pub bookings: BookingUsecase<R, E>,
    /// Payment methods and settlement.
    pub payments: PaymentUsecase<R, E>,
    /// The dashboard aggregator.
    pub dashboard: DashboardUsecase<R>,
    /// Default dashboard row limit.
    pub dashboard_limit: i64,
}

impl<R, E> AppState<R, E>
where
    R: Repositories,
    E: EmailSender + Clone + 'static,
{
    /// Wires every usecase over one repository backend and email sender.
    pub fn new(repo: R, email: E, config: AppConfig) -> Self {
        Self {
            auth: AuthUsecase::new(repo.clone(), email.clone()).with_config(config.auth),
            cinemas: CinemaUsecase::new(repo.clone()),
            movies: MovieUsecase::new(repo.clone()),
            showtimes: ShowtimeUsecase::new(repo.clone()),
            bookings: BookingUsecase::new(repo.clone(), email.clone()),
            payments: PaymentUsecase::new(repo.clone(), email),
            dashboard: DashboardUsecase::new(repo).with_deadline(config.dashboard_deadline),
            dashboard_limit: config.dashboard_limit,
        }
    }
}
