use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use fxrates_market_data::{Currency, ProviderRegistry, RateFrequency, RateProvider, RateSource};
use log::{debug, error};
use rust_decimal::Decimal;

use super::pegged::PeggedCurrencyTable;
use super::quote_resolver::QuoteResolver;
use super::rate_cache::RateSurfaceCache;
use super::rates_errors::RateError;
use super::rates_traits::{ExchangeRateServiceTrait, RateDataStore};
use super::synchronizer::{RateSynchronizer, UpdateSummary};
use crate::errors::{Result, ValidationError};

/// Answers rate queries from the shared cache, backfilling on demand.
pub struct ExchangeRateService {
    cache: Arc<RateSurfaceCache>,
    synchronizer: RateSynchronizer,
    registry: Arc<ProviderRegistry>,
    pegged: PeggedCurrencyTable,
    currency_codes: HashMap<String, Currency>,
}

impl ExchangeRateService {
    /// Builds the service, loading the peg table from `store`.
    pub async fn new(
        store: Arc<dyn RateDataStore>,
        registry: Arc<ProviderRegistry>,
    ) -> Result<Self> {
        let pegged = PeggedCurrencyTable::load(store.as_ref()).await?;
        Ok(Self::with_pegged(store, registry, pegged))
    }

    pub fn with_pegged(
        store: Arc<dyn RateDataStore>,
        registry: Arc<ProviderRegistry>,
        pegged: PeggedCurrencyTable,
    ) -> Self {
        let cache = Arc::new(RateSurfaceCache::new(store));
        let synchronizer = RateSynchronizer::new(cache.clone(), registry.clone());
        let currency_codes = Currency::ALL
            .iter()
            .map(|currency| (currency.as_str().to_string(), *currency))
            .collect();

        Self {
            cache,
            synchronizer,
            registry,
            pegged,
            currency_codes,
        }
    }

    pub fn cache(&self) -> &Arc<RateSurfaceCache> {
        &self.cache
    }

    fn parse_currency(&self, code: &str) -> Result<Currency> {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingField("currency".to_string()).into());
        }
        self.currency_codes
            .get(&trimmed.to_ascii_uppercase())
            .copied()
            .ok_or_else(|| ValidationError::InvalidCurrencyCode(trimmed.to_string()).into())
    }

    /// Provider for `source`, rejecting frequencies it does not publish.
    fn provider(
        &self,
        source: RateSource,
        frequency: RateFrequency,
    ) -> Result<Arc<dyn RateProvider>> {
        let provider = self
            .registry
            .get(source)
            .map_err(|_| ValidationError::UnknownSource(source))?;
        if !provider.supports(frequency) {
            return Err(ValidationError::UnsupportedFrequency {
                rate_source: source,
                frequency,
            }
            .into());
        }
        Ok(provider)
    }

    /// Resolves a pair that touches the provider's base currency, retrying once
    /// after a narrow backfill when the rate is missing.
    async fn resolve_leg(
        &self,
        provider: &dyn RateProvider,
        from: Currency,
        to: Currency,
        date: NaiveDate,
        frequency: RateFrequency,
    ) -> Result<Option<Decimal>> {
        match self.resolve_once(provider, from, to, date, frequency).await? {
            Ok(rate) => return Ok(Some(rate)),
            Err(RateError::NoRateFound { lookup_currency, .. }) => {
                debug!(
                    "No {} {} rate for {} on {}; fetching the preceding week",
                    provider.source(),
                    frequency,
                    lookup_currency,
                    date
                );
            }
            Err(e) => return Err(e.into()),
        }

        self.synchronizer
            .ensure_rates_for_date(date, provider, frequency)
            .await;

        match self.resolve_once(provider, from, to, date, frequency).await? {
            Ok(rate) => Ok(Some(rate)),
            Err(RateError::NoRateFound { lookup_currency, .. }) => {
                error!(
                    "No {} {} exchange rate found for {} on {}. FromCurrency: {}, ToCurrency: {}",
                    provider.source(),
                    frequency,
                    lookup_currency,
                    date,
                    from,
                    to
                );
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// One resolver pass over a fresh snapshot of the whole series. The outer
    /// `Result` carries cache failures, the inner one the resolver's verdict.
    ///
    /// The snapshot is not cut at `date`: a currency whose series starts after
    /// `date` is still known to the source, so the miss stays retryable.
    async fn resolve_once(
        &self,
        provider: &dyn RateProvider,
        from: Currency,
        to: Currency,
        date: NaiveDate,
        frequency: RateFrequency,
    ) -> Result<std::result::Result<Decimal, RateError>> {
        let surface = self
            .cache
            .surface(provider.source(), frequency, NaiveDate::MAX)
            .await?;

        let resolver = QuoteResolver {
            surface: &surface,
            source: provider.source(),
            base_currency: provider.base_currency(),
            convention: provider.quote_convention(),
            pegged: &self.pegged,
        };
        Ok(resolver.resolve(from, to, date))
    }
}

#[async_trait]
impl ExchangeRateServiceTrait for ExchangeRateService {
    async fn get_rate(
        &self,
        from: Currency,
        to: Currency,
        date: NaiveDate,
        source: RateSource,
        frequency: RateFrequency,
    ) -> Result<Option<Decimal>> {
        let provider = self.provider(source, frequency)?;
        if from == to {
            return Ok(Some(Decimal::ONE));
        }

        self.synchronizer
            .ensure_rates_loaded(date, provider.as_ref(), frequency)
            .await;

        let base = provider.base_currency();
        if from != base && to != base {
            // Triangulate through the base currency; each leg retries on its own.
            let (to_base, from_base) = futures::try_join!(
                self.resolve_leg(provider.as_ref(), from, base, date, frequency),
                self.resolve_leg(provider.as_ref(), base, to, date, frequency),
            )?;
            return Ok(to_base.zip(from_base).map(|(a, b)| a * b));
        }

        self.resolve_leg(provider.as_ref(), from, to, date, frequency)
            .await
    }

    async fn get_rate_by_code(
        &self,
        from_code: &str,
        to_code: &str,
        date: NaiveDate,
        source: RateSource,
        frequency: RateFrequency,
    ) -> Result<Option<Decimal>> {
        let from = self.parse_currency(from_code)?;
        let to = self.parse_currency(to_code)?;
        self.get_rate(from, to, date, source, frequency).await
    }

    async fn update_rates(&self) -> UpdateSummary {
        self.synchronizer.update_rates().await
    }

    async fn ensure_minimum_date_range(
        &self,
        min_date: NaiveDate,
        sources: Option<&[RateSource]>,
    ) -> bool {
        self.synchronizer
            .ensure_minimum_date_range(min_date, sources)
            .await
    }

    fn sources(&self) -> Vec<RateSource> {
        self.registry.sources()
    }
}
