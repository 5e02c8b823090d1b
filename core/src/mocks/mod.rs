//! In-memory test doubles.
//!
//! [`MockRepositories`] implements every repository trait over shared
//! in-memory state, with per-read latency and failure injection for the
//! dashboard queries. [`MockEmailSender`] records outgoing mail instead of
//! sending it. Both are `Clone` handles over the same state, mirroring how
//! a connection pool behaves.

mod email;
mod repositories;

pub use email::{MockEmailSender, SentEmail};
pub use repositories::MockRepositories;
