//! Core types for jsonapi-admin
//!
//! Error handling shared by every other module lives here. The error module provides:
//! - [`AdminError`] - Enumerated error types covering all failure modes
//! - [`ErrorContext`] - User-friendly error wrapper with suggestions and details
//! - [`user_friendly_error`] - Convert any error to the user-friendly format

pub mod error;

pub use error::{AdminError, ErrorContext, user_friendly_error};

/// Result alias used by the library operations.
pub type Result<T, E = AdminError> = std::result::Result<T, E>;
