//! # AppError
//!
//! Centralized error handling for the city-rights application.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all cr-core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    /// Resource not found (e.g., City, Granter)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// No page is served at the requested path
    #[error("no page at {0}")]
    NoRoute(String),

    /// Validation failure (e.g., name too long, dangling reference)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Infrastructure failure (e.g., database unavailable)
    #[error("internal service error: {0}")]
    Internal(String),

    /// Resource already exists (e.g., duplicate city name)
    #[error("conflict: {0}")]
    Conflict(String),
}

/// A specialized Result type for city-rights logic.
pub type Result<T> = std::result::Result<T, AppError>;
