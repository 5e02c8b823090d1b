//! # CineBook HTTP layer
//!
//! Axum router, handlers, and extractors over the `cinebook-core`
//! usecases. The router is generic over the repository backend and the
//! email sender, so the same surface runs against Postgres in production
//! and against in-memory mocks in tests.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::AppError;
pub use router::build_router;
pub use state::{AppConfig, AppState};
