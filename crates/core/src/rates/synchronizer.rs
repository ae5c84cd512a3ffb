//! Keeps the rate cache populated from the registered providers.
//!
//! Three kinds of backfill:
//! - bulk: extend a series back to the first of a month (`ensure_minimum_date_range`)
//! - lazy: before answering a query dated before the cached range (`ensure_rates_loaded`)
//! - narrow: a one-week window after a resolver miss (`ensure_rates_for_date`)
//!
//! Plus the periodic refresh of every source's latest window (`update_rates`).
//! Provider failures are logged and reported as `false` or in the summary;
//! one source failing never stops the others.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use futures::future::join_all;
use fxrates_market_data::period::{months_before, start_of_month};
use fxrates_market_data::{ProviderRegistry, RateFrequency, RateProvider, RateSource};
use log::{debug, error, info, warn};

use super::rate_cache::RateSurfaceCache;
use super::rates_constants::{LAZY_BACKFILL_MONTHS, ON_DEMAND_BACKFILL_DAYS};
use crate::errors::Result;

// =============================================================================
// Update summary
// =============================================================================

/// Outcome of refreshing every source's latest rates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Sources whose every frequency was refreshed.
    pub updated: usize,
    /// Sources that failed part-way.
    pub failed: usize,
    pub rates_fetched: usize,
    /// Rates that were new or corrected.
    pub rates_saved: usize,
    pub failures: Vec<(RateSource, String)>,
}

impl UpdateSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn summary(&self) -> String {
        if self.is_success() {
            format!(
                "Updated {} sources, saved {} of {} fetched rates",
                self.updated, self.rates_saved, self.rates_fetched
            )
        } else {
            format!(
                "Updated {} sources with {} failures, saved {} of {} fetched rates",
                self.updated, self.failed, self.rates_saved, self.rates_fetched
            )
        }
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// =============================================================================
// Synchronizer
// =============================================================================

pub struct RateSynchronizer {
    cache: Arc<RateSurfaceCache>,
    registry: Arc<ProviderRegistry>,
}

impl RateSynchronizer {
    pub fn new(cache: Arc<RateSurfaceCache>, registry: Arc<ProviderRegistry>) -> Self {
        Self { cache, registry }
    }

    /// Backfills from the month before `date` when the cached series does not
    /// reach back to `date`'s month.
    pub async fn ensure_rates_loaded(
        &self,
        date: NaiveDate,
        provider: &dyn RateProvider,
        frequency: RateFrequency,
    ) -> bool {
        let source = provider.source();
        let min_date = match self.cache.min_date(source, frequency).await {
            Ok(min_date) => min_date,
            Err(e) => {
                error!("Failed to read cached range for {} {}: {}", source, frequency, e);
                return false;
            }
        };

        let covered = min_date.is_some_and(|min| start_of_month(min) <= date);
        if covered {
            return true;
        }

        let backfill_from = months_before(date, LAZY_BACKFILL_MONTHS);
        debug!(
            "{} {} cache starts at {:?}; backfilling from {} for a request on {}",
            source, frequency, min_date, backfill_from, date
        );
        self.log_failure(
            source,
            frequency,
            self.ensure_series_range(provider, frequency, backfill_from)
                .await,
        )
    }

    /// Extends every supported series of the given (or all registered) sources
    /// back to the first of `min_date`'s month.
    ///
    /// Returns `true` only if every backfill succeeded.
    pub async fn ensure_minimum_date_range(
        &self,
        min_date: NaiveDate,
        sources: Option<&[RateSource]>,
    ) -> bool {
        let mut all_ok = true;
        let providers: Vec<Arc<dyn RateProvider>> = match sources {
            None => self.registry.providers().to_vec(),
            Some(sources) => sources
                .iter()
                .filter_map(|source| match self.registry.get(*source) {
                    Ok(provider) => Some(provider),
                    Err(e) => {
                        error!("Cannot backfill {}: {}", source, e);
                        all_ok = false;
                        None
                    }
                })
                .collect(),
        };

        let results = join_all(
            providers
                .iter()
                .map(|provider| self.ensure_provider_range(provider.as_ref(), min_date)),
        )
        .await;

        all_ok && results.into_iter().all(|ok| ok)
    }

    async fn ensure_provider_range(&self, provider: &dyn RateProvider, min_date: NaiveDate) -> bool {
        let mut all_ok = true;
        for frequency in provider.capabilities().frequencies {
            let result = self
                .ensure_series_range(provider, *frequency, min_date)
                .await;
            all_ok &= self.log_failure(provider.source(), *frequency, result);
        }
        all_ok
    }

    /// Fetches the gap between the month-aligned `min_date` and the cached
    /// minimum, or up to today when nothing is cached.
    async fn ensure_series_range(
        &self,
        provider: &dyn RateProvider,
        frequency: RateFrequency,
        min_date: NaiveDate,
    ) -> Result<bool> {
        let source = provider.source();
        let target = start_of_month(min_date);
        let cached_min = self.cache.min_date(source, frequency).await?;

        if cached_min.is_some_and(|min| start_of_month(min) <= target) {
            return Ok(true);
        }

        let fetch_to = cached_min.unwrap_or_else(today);
        info!(
            "Backfilling {} {} rates from {} to {}",
            source, frequency, target, fetch_to
        );
        self.fetch_and_save(provider, frequency, target, fetch_to)
            .await
    }

    /// Narrow backfill of the week ending on `date`, used once after a miss.
    pub async fn ensure_rates_for_date(
        &self,
        date: NaiveDate,
        provider: &dyn RateProvider,
        frequency: RateFrequency,
    ) -> bool {
        let from = date
            .checked_sub_signed(Duration::days(ON_DEMAND_BACKFILL_DAYS))
            .unwrap_or(NaiveDate::MIN);
        debug!(
            "Fetching {} {} rates for {} to {} after a cache miss",
            provider.source(),
            frequency,
            from,
            date
        );
        let result = self.fetch_and_save(provider, frequency, from, date).await;
        self.log_failure(provider.source(), frequency, result)
    }

    /// Fetches `[from, to]` (swapped if reversed) and saves it through the cache.
    ///
    /// An empty fetch is logged and reported as `false`.
    pub async fn fetch_and_save(
        &self,
        provider: &dyn RateProvider,
        frequency: RateFrequency,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<bool> {
        let (from, to) = if from > to { (to, from) } else { (from, to) };

        let rates = provider.get_historical_rates(frequency, from, to).await?;
        if rates.is_empty() {
            error!(
                "No {} {} exchange rates returned between {} and {}",
                provider.source(),
                frequency,
                from,
                to
            );
            return Ok(false);
        }

        let outcome = self.cache.save(&rates).await?;
        debug!(
            "Fetched {} {} {} rates; {} persisted",
            rates.len(),
            provider.source(),
            frequency,
            outcome.persisted()
        );
        Ok(true)
    }

    /// Refreshes the latest window of every frequency of every registered source.
    pub async fn update_rates(&self) -> UpdateSummary {
        let providers = self.registry.providers().to_vec();
        let results = join_all(
            providers
                .iter()
                .map(|provider| self.update_provider(provider.as_ref())),
        )
        .await;

        let mut summary = UpdateSummary::default();
        for (provider, result) in providers.iter().zip(results) {
            match result {
                Ok((fetched, saved)) => {
                    summary.updated += 1;
                    summary.rates_fetched += fetched;
                    summary.rates_saved += saved;
                }
                Err(e) => {
                    error!("Failed to update {} exchange rates: {}", provider.source(), e);
                    summary.failed += 1;
                    summary.failures.push((provider.source(), e.to_string()));
                }
            }
        }

        info!("{}", summary.summary());
        summary
    }

    async fn update_provider(&self, provider: &dyn RateProvider) -> Result<(usize, usize)> {
        let capabilities = provider.capabilities();
        if !capabilities.supports_latest {
            debug!("{} does not publish latest rates; skipping", provider.source());
            return Ok((0, 0));
        }

        let mut fetched = 0;
        let mut saved = 0;
        for frequency in capabilities.frequencies {
            let rates = provider.get_latest_rates(*frequency).await?;
            if rates.is_empty() {
                warn!(
                    "{} returned no latest {} rates",
                    provider.source(),
                    frequency
                );
                continue;
            }
            fetched += rates.len();
            saved += self.cache.save(&rates).await?.persisted();
        }
        Ok((fetched, saved))
    }

    fn log_failure(&self, source: RateSource, frequency: RateFrequency, result: Result<bool>) -> bool {
        match result {
            Ok(ok) => ok,
            Err(e) => {
                error!(
                    "Failed to backfill {} {} exchange rates: {}",
                    source, frequency, e
                );
                false
            }
        }
    }
}
