//! Async storage contracts, one trait per aggregate.
//!
//! Methods return `impl Future<Output = Result<T>> + Send` so implementations
//! stay object-free and futures can cross `tokio::spawn`. Backends implement
//! every trait on one shared handle (see `cinebook-postgres`); the
//! [`Repositories`] super-trait bundles them for usecases and app state.

mod auth;
mod booking;
mod cinema;
mod dashboard;
mod movie;
mod payment;
mod seat;

pub use auth::AuthRepository;
pub use booking::BookingRepository;
pub use cinema::CinemaRepository;
pub use dashboard::DashboardRepository;
pub use movie::MovieRepository;
pub use payment::PaymentRepository;
pub use seat::SeatRepository;

/// Bundle of every repository trait, implemented blanket-wise for any type
/// that provides them all.
pub trait Repositories:
    AuthRepository
    + CinemaRepository
    + MovieRepository
    + SeatRepository
    + BookingRepository
    + PaymentRepository
    + DashboardRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> Repositories for T where
    T: AuthRepository
        + CinemaRepository
        + MovieRepository
        + SeatRepository
        + BookingRepository
        + PaymentRepository
        + DashboardRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}
