//! Error types and retry classification for the market data crate.
//!
//! - [`MarketDataError`]: the error enum for all provider operations
//! - [`RetryClass`]: classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::RateSource;

/// Errors that can occur while fetching rates from a provider.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider does not publish the requested series.
    /// This replaces runtime checks for "is this also a monthly provider".
    #[error("{operation} is not supported by {provider}")]
    NotSupported {
        operation: String,
        provider: String,
    },

    /// A historical range whose end precedes its start.
    #[error("Invalid date range: {to} is before {from}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    /// No provider is registered for the source.
    #[error("No provider registered for source {0}")]
    UnknownSource(RateSource),

    /// The provider refused our credentials (HTTP 401/403 or token endpoint failure).
    #[error("Unauthorized: {provider} - {message}")]
    Unauthorized { provider: String, message: String },

    /// The provider answered with a non-success status.
    #[error("Provider error: {provider} - {message}")]
    ProviderError { provider: String, message: String },

    /// The provider's payload could not be understood.
    #[error("Parse error: {provider} - {message}")]
    Parse { provider: String, message: String },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout { provider: String },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    ///
    /// ```
    /// use fxrates_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::Timeout { provider: "ECB".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::NotSupported { .. } | Self::InvalidRange { .. } | Self::UnknownSource(_) => {
                RetryClass::Never
            }

            Self::Timeout { .. } | Self::Network(_) => RetryClass::WithBackoff,

            Self::Unauthorized { .. } | Self::ProviderError { .. } | Self::Parse { .. } => {
                RetryClass::NextProvider
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_supported_never_retries() {
        let error = MarketDataError::NotSupported {
            operation: "Weekly rates".to_string(),
            provider: "ECB".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::Never);
    }

    #[test]
    fn test_invalid_range_never_retries() {
        let error = MarketDataError::InvalidRange {
            from: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert_eq!(error.retry_class(), RetryClass::Never);
    }

    #[test]
    fn test_timeout_retries_with_backoff() {
        let error = MarketDataError::Timeout {
            provider: "MNB".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    }

    #[test]
    fn test_provider_failures_move_on() {
        let error = MarketDataError::Unauthorized {
            provider: "HMRC".to_string(),
            message: "401".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::NextProvider);

        let error = MarketDataError::Parse {
            provider: "HMRC".to_string(),
            message: "expected value".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::NextProvider);
    }

    #[test]
    fn test_error_display() {
        let error = MarketDataError::ProviderError {
            provider: "PLCB".to_string(),
            message: "HTTP 500".to_string(),
        };
        assert_eq!(format!("{}", error), "Provider error: PLCB - HTTP 500");

        let error = MarketDataError::UnknownSource(RateSource::SECB);
        assert_eq!(format!("{}", error), "No provider registered for source SECB");
    }
}
