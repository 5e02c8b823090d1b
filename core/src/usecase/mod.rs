//! Business rules, one usecase per feature area.

mod auth;
mod booking;
mod cinema;
mod dashboard;
mod movie;
mod payment;
mod showtime;

pub use auth::{AuthUsecase, AuthenticatedSession, RegisterRequest};
pub use booking::{BookingDetail, BookingUsecase, CreateBooking};
pub use cinema::{CinemaDetail, CinemaList, CinemaUsecase};
pub use dashboard::{DashboardSummary, DashboardUsecase, DEFAULT_DEADLINE};
pub use movie::{MovieList, MovieUsecase};
pub use payment::{PayRequest, PaymentUsecase};
pub use showtime::ShowtimeUsecase;
