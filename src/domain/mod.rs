/// Domain module containing the core data types
///
/// This module defines the two entities (Habit, Tracking), their identifiers,
/// and the explicit partial-update types used by the service layer.

pub mod habit;
pub mod tracking;
pub mod types;

// Re-export public types for easy access
pub use habit::*;
pub use tracking::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur while parsing domain values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
