//! HTTP handlers, one module per feature area.

use serde::{Deserialize, Serialize};

pub mod auth;
pub mod bookings;
pub mod cinemas;
pub mod dashboard;
pub mod health;
pub mod movies;
pub mod payments;

/// Generic acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Common `?page=&limit=` query parameters.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// 1-based page number, defaults to 1.
    pub page: Option<i64>,
    /// Rows per page, defaults to the server page size.
    pub limit: Option<i64>,
}

impl PageQuery {
    fn request(&self) -> cinebook_core::PageRequest {
        cinebook_core::PageRequest::new(self.page.unwrap_or(1), self.limit.unwrap_or(0))
    }
}
