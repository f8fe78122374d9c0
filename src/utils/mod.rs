//! Shared utilities
//!
//! Error handling, validation helpers and request extractors.

pub mod errors;
pub mod extract;
pub mod validation;

pub use errors::{AppError, AppResult};
