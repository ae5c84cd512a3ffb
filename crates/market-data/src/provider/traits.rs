//! Rate provider trait definition.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::MarketDataError;
use crate::models::{Currency, FxRate, QuoteConvention, RateFrequency, RateSource};

use super::capabilities::ProviderCapabilities;

/// Trait for exchange rate providers.
///
/// A provider publishes rates for one [`RateSource`], all quoted against a
/// single base currency using one [`QuoteConvention`]. Frequencies the provider
/// does not publish keep the default implementations, which fail with
/// [`MarketDataError::NotSupported`].
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use fxrates_market_data::provider::{ProviderCapabilities, RateProvider};
///
/// struct StaticProvider;
///
/// #[async_trait]
/// impl RateProvider for StaticProvider {
///     fn source(&self) -> RateSource { RateSource::ECB }
///     fn base_currency(&self) -> Currency { Currency::EUR }
///     fn quote_convention(&self) -> QuoteConvention { QuoteConvention::Indirect }
///     fn capabilities(&self) -> ProviderCapabilities {
///         ProviderCapabilities {
///             frequencies: &[RateFrequency::Daily],
///             supports_latest: true,
///             supports_historical: false,
///         }
///     }
///     // ... implement get_latest_rates
/// }
/// ```
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Source identity of every rate this provider returns.
    fn source(&self) -> RateSource;

    /// Currency all rates are quoted against.
    fn base_currency(&self) -> Currency;

    fn quote_convention(&self) -> QuoteConvention;

    fn capabilities(&self) -> ProviderCapabilities;

    /// Whether `frequency` is published by this provider.
    fn supports(&self, frequency: RateFrequency) -> bool {
        self.capabilities().supports(frequency)
    }

    /// Fetch the provider's most recent window of rates for `frequency`.
    async fn get_latest_rates(
        &self,
        frequency: RateFrequency,
    ) -> Result<Vec<FxRate>, MarketDataError> {
        Err(MarketDataError::NotSupported {
            operation: format!("latest {} rates", frequency),
            provider: self.source().to_string(),
        })
    }

    /// Fetch rates for `frequency` published between `from` and `to`, inclusive.
    ///
    /// Implementations must fail with [`MarketDataError::InvalidRange`] when
    /// `to < from`; [`validate_range`] does the check.
    async fn get_historical_rates(
        &self,
        frequency: RateFrequency,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FxRate>, MarketDataError> {
        validate_range(from, to)?;
        Err(MarketDataError::NotSupported {
            operation: format!("historical {} rates", frequency),
            provider: self.source().to_string(),
        })
    }
}

/// Rejects ranges that end before they start.
pub fn validate_range(from: NaiveDate, to: NaiveDate) -> Result<(), MarketDataError> {
    if to < from {
        return Err(MarketDataError::InvalidRange { from, to });
    }
    Ok(())
}
