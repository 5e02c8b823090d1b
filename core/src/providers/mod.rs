//! Outbound integration contracts and implementations.

pub mod email;

pub use email::{ConsoleEmailSender, EmailSender, HttpEmailSender};
