//! # CineBook Core
//!
//! Domain layer for the CineBook cinema ticket-booking service.
//!
//! ## Architecture
//!
//! The crate is organized in three layers:
//!
//! ```text
//! Usecases → Repository traits → Storage backends (cinebook-postgres, mocks)
//! ```
//!
//! - **Entities** (`entities`): plain domain types shared across layers
//! - **Repositories** (`repository`): async storage contracts, one trait per
//!   aggregate, bundled by the [`Repositories`] super-trait
//! - **Usecases** (`usecase`): business rules, including the dashboard
//!   aggregator that runs its three read queries either sequentially or
//!   concurrently under a shared deadline
//! - **Providers** (`providers`): outbound integrations such as email
//! - **Mocks** (`mocks`, behind the `test-utils` feature): in-memory
//!   implementations so usecase logic tests run at memory speed

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod config;
pub mod entities;
pub mod error;
pub mod pagination;
pub mod providers;
pub mod repository;
pub mod usecase;
pub mod validate;

#[cfg(feature = "test-utils")]
pub mod mocks;

// Re-export main types for convenience
pub use config::AuthConfig;
pub use error::{CoreError, Result, SubQuery};
pub use pagination::{PageRequest, Pagination};
pub use repository::Repositories;
