//! Core error types for the FX rates service.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use fxrates_market_data::{MarketDataError, ParseCodeError, RateFrequency, RateSource, RetryClass};
use thiserror::Error;

use crate::rates::RateError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the FX rates service.
///
/// Database-specific errors are wrapped in string form to keep this type
/// database-agnostic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Rate lookup failed: {0}")]
    Rate(#[from] RateError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// True when more data, or a later attempt, may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Rate(e) => e.is_transient(),
            Error::MarketData(e) => e.retry_class() == RetryClass::WithBackoff,
            _ => false,
        }
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for caller input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Not supported currency code: {0}")]
    InvalidCurrencyCode(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Source {rate_source} does not publish {frequency} rates")]
    UnsupportedFrequency {
        rate_source: RateSource,
        frequency: RateFrequency,
    },

    #[error("Source {0} is not supported")]
    UnknownSource(RateSource),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<ParseCodeError> for ValidationError {
    fn from(err: ParseCodeError) -> Self {
        match err {
            ParseCodeError::Empty { kind } => ValidationError::MissingField(kind.to_string()),
            ParseCodeError::Unknown { .. } => ValidationError::InvalidInput(err.to_string()),
        }
    }
}

impl From<ParseCodeError> for Error {
    fn from(err: ParseCodeError) -> Self {
        Error::Validation(err.into())
    }
}

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}
