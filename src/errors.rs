use thiserror::Error;

use crate::ship::ShipId;

/// Enumerates high-level errors returned by this library.
#[derive(Debug, Error)]
pub enum ShipError {
    /// Represents an SQL error.
    #[error("SQLx error")]
    Sqlx { source: sqlx::Error },

    /// Represents an ID that is not a positive integer.
    #[error("Id {0} has wrong format.")]
    InvalidId(String),

    /// Represents epoch milliseconds outside the years -9999 to 9999.
    #[error("Date {0} is out of range.")]
    DateOutOfRange(i64),

    /// Represents a well-formed ID with no ship behind it.
    #[error("Id {0} doesn't exist.")]
    NonExistentId(ShipId),

    /// Represents one or more violated field constraints. The message
    /// is the concatenation of every individual problem.
    #[error("{0}")]
    Validation(String),

    /// Represents rating input that would divide by zero or go negative.
    #[error("Cannot compute rating for production year {production_year}")]
    DegenerateRating { production_year: i32 },

    /// Represents a page request with no room for results.
    #[error("Page size must be at least 1")]
    InvalidPageSize,

    /// Represents a stored category this build doesn't know about.
    #[error("Unknown ship type {0:?}")]
    UnknownShipType(String),
}
