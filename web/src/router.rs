//! Route table wiring handlers to the application state.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use cinebook_core::providers::EmailSender;
use cinebook_core::Repositories;
use tower_http::trace::TraceLayer;

use crate::handlers::{auth, bookings, cinemas, dashboard, health, movies, payments};
use crate::state::AppState;

/// Builds the full application router.
///
/// Probes live at the root; everything else is nested under `/api`.
pub fn build_router<R, E>(state: Arc<AppState<R, E>>) -> Router
where
    R: Repositories,
    E: EmailSender + Clone + 'static,
{
    let api = Router::new()
        .route("/register", post(auth::register::<R, E>))
        .route("/verify-otp", post(auth::verify_otp::<R, E>))
        .route("/resend-otp", post(auth::resend_otp::<R, E>))
        .route("/login", post(auth::login::<R, E>))
        .route("/logout", post(auth::logout::<R, E>))
        .route("/movies", get(movies::list_movies::<R, E>))
        .route("/movies/:id", get(movies::get_movie::<R, E>))
        .route("/cinemas", get(cinemas::list_cinemas::<R, E>))
        .route("/cinemas/:id", get(cinemas::get_cinema::<R, E>))
        .route("/cinemas/:id/showtimes", get(cinemas::list_showtimes::<R, E>))
        .route("/cinemas/:id/seats", get(cinemas::seat_availability::<R, E>))
        .route("/booking", post(bookings::create_booking::<R, E>))
        .route("/user/bookings", get(bookings::user_bookings::<R, E>))
        .route("/payment-methods", get(payments::list_methods::<R, E>))
        .route("/pay", post(payments::process_payment::<R, E>))
        .route("/dashboard", get(dashboard::dashboard_serial::<R, E>))
        .route(
            "/dashboard/concurrent",
            get(dashboard::dashboard_concurrent::<R, E>),
        );

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
