use chrono::NaiveDate;
use fxrates_market_data::{Currency, RateSource};
use thiserror::Error;

/// Failures of rate resolution and of the rate cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RateError {
    /// No rate on or before `date` within the cached range. More data may fix it.
    #[error("No exchange rate found for {lookup_currency} on or before {date}")]
    NoRateFound {
        lookup_currency: Currency,
        date: NaiveDate,
    },

    /// The currency has neither a rate series nor a peg for this source.
    #[error("Currency {currency} is not supported by source {rate_source}")]
    UnsupportedCurrency {
        currency: Currency,
        rate_source: RateSource,
    },

    /// The peg chain starting at `currency` loops back on itself.
    #[error("Circular peg detected for {currency}: {chain}")]
    CircularPeg { currency: Currency, chain: String },

    /// Neither side of the pair is the source's base currency.
    #[error("{from}/{to} must be triangulated through the base currency {base}")]
    RequiresTriangulation {
        from: Currency,
        to: Currency,
        base: Currency,
    },

    /// A stored or pegged rate of zero cannot be inverted.
    #[error("Rate for {currency} on {date} is zero")]
    ZeroRate { currency: Currency, date: NaiveDate },

    #[error("Rate cache error: {0}")]
    Cache(String),
}

impl RateError {
    /// Only a missing rate can be fixed by fetching more data.
    pub fn is_transient(&self) -> bool {
        matches!(self, RateError::NoRateFound { .. })
    }

    /// Currency whose lookup produced this error, for diagnostics.
    pub fn lookup_currency(&self) -> Option<Currency> {
        match self {
            RateError::NoRateFound {
                lookup_currency, ..
            } => Some(*lookup_currency),
            RateError::UnsupportedCurrency { currency, .. }
            | RateError::CircularPeg { currency, .. }
            | RateError::ZeroRate { currency, .. } => Some(*currency),
            RateError::RequiresTriangulation { .. } | RateError::Cache(_) => None,
        }
    }
}
