//! Process-wide rate cache.
//!
//! One bucket per (source, frequency), each behind its own `RwLock`, so readers
//! of one series never wait on writers of another. Locks are never held across
//! an `.await`: the data store is read before taking a write lock and written
//! after releasing it.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use chrono::NaiveDate;
use fxrates_market_data::{Currency, FxRate, RateFrequency, RateSource};
use log::{debug, warn};
use rust_decimal::Decimal;

use super::rates_errors::RateError;
use super::rates_model::{round_rate, RateSurface, SaveOutcome, SourceFrequency};
use super::rates_traits::RateDataStore;
use crate::errors::Result;

#[derive(Debug, Default)]
struct RateBucket {
    rates: HashMap<Currency, BTreeMap<NaiveDate, Decimal>>,
    /// Earliest cached date; `None` until anything is cached.
    min_date: Option<NaiveDate>,
    /// Set once the store's whole history for this series has been merged.
    /// Later rates only arrive through `save`, so the store is not read again.
    store_loaded: bool,
}

impl RateBucket {
    fn track_date(&mut self, date: NaiveDate) {
        if self.min_date.map_or(true, |min| date < min) {
            self.min_date = Some(date);
        }
    }
}

enum Upsert {
    Inserted,
    Corrected(Decimal),
    Unchanged,
}

pub struct RateSurfaceCache {
    store: Arc<dyn RateDataStore>,
    buckets: HashMap<SourceFrequency, RwLock<RateBucket>>,
}

impl RateSurfaceCache {
    pub fn new(store: Arc<dyn RateDataStore>) -> Self {
        let buckets = SourceFrequency::all()
            .map(|key| (key, RwLock::new(RateBucket::default())))
            .collect();
        Self { store, buckets }
    }

    fn bucket(&self, key: SourceFrequency) -> std::result::Result<&RwLock<RateBucket>, RateError> {
        self.buckets
            .get(&key)
            .ok_or_else(|| RateError::Cache(format!("no bucket for {:?}", key)))
    }

    fn selected_keys(
        source: Option<RateSource>,
        frequency: Option<RateFrequency>,
    ) -> Vec<SourceFrequency> {
        SourceFrequency::all()
            .filter(|k| source.map_or(true, |s| k.source == s))
            .filter(|k| frequency.map_or(true, |f| k.frequency == f))
            .collect()
    }

    fn read_min_date(&self, key: SourceFrequency) -> Result<Option<NaiveDate>> {
        let bucket = self
            .bucket(key)?
            .read()
            .map_err(|e| RateError::Cache(e.to_string()))?;
        Ok(bucket.min_date)
    }

    fn read_state(&self, key: SourceFrequency) -> Result<(bool, Option<NaiveDate>)> {
        let bucket = self
            .bucket(key)?
            .read()
            .map_err(|e| RateError::Cache(e.to_string()))?;
        Ok((bucket.store_loaded, bucket.min_date))
    }

    fn mark_loaded(&self, keys: &[SourceFrequency]) -> Result<()> {
        for key in keys {
            self.bucket(*key)?
                .write()
                .map_err(|e| RateError::Cache(e.to_string()))?
                .store_loaded = true;
        }
        Ok(())
    }

    /// Pulls rates below the tracked minimum of `keys` from the data store.
    /// Series whose whole history is already loaded are skipped, empty ones
    /// included.
    async fn refresh(&self, min: NaiveDate, max: NaiveDate, keys: &[SourceFrequency]) -> Result<()> {
        let mut pending = Vec::with_capacity(keys.len());
        let mut floor = Some(NaiveDate::MAX);
        for key in keys {
            let (loaded, min_date) = self.read_state(*key)?;
            if loaded {
                continue;
            }
            pending.push(*key);
            // Nothing cached for this series yet: the whole window is needed.
            floor = floor.zip(min_date).map(|(f, d)| f.min(d));
        }
        if pending.is_empty() {
            return Ok(());
        }

        let upper = floor.map_or(max, |f| f.min(max));
        if min >= upper {
            return Ok(());
        }

        let rates = self.store.get_rates(min, upper).await?;
        if !rates.is_empty() {
            debug!(
                "Loaded {} rates from store for [{}, {})",
                rates.len(),
                min,
                upper
            );
            self.load(&rates)?;
        }
        if min == NaiveDate::MIN && upper == NaiveDate::MAX {
            self.mark_loaded(&pending)?;
        }
        Ok(())
    }

    /// Adds stored rates without overriding anything already cached.
    fn load(&self, rates: &[FxRate]) -> Result<()> {
        for (key, group) in group_by_bucket(rates) {
            let mut bucket = self
                .bucket(key)?
                .write()
                .map_err(|e| RateError::Cache(e.to_string()))?;
            for rate in group {
                bucket
                    .rates
                    .entry(rate.currency)
                    .or_default()
                    .entry(rate.date)
                    .or_insert_with(|| round_rate(rate.rate));
                bucket.track_date(rate.date);
            }
        }
        Ok(())
    }

    /// Every cached rate dated in `[min_date, max_date)` for the given (or all)
    /// sources and frequencies.
    pub async fn get(
        &self,
        min_date: NaiveDate,
        max_date: NaiveDate,
        source: Option<RateSource>,
        frequency: Option<RateFrequency>,
    ) -> Result<Vec<FxRate>> {
        let keys = Self::selected_keys(source, frequency);
        self.refresh(min_date, max_date, &keys).await?;

        let mut result = Vec::new();
        if min_date >= max_date {
            return Ok(result);
        }
        for key in keys {
            let bucket = self
                .bucket(key)?
                .read()
                .map_err(|e| RateError::Cache(e.to_string()))?;
            for (currency, series) in &bucket.rates {
                for (date, rate) in series.range(min_date..max_date) {
                    result.push(FxRate::new(
                        *date,
                        *currency,
                        key.source,
                        key.frequency,
                        *rate,
                    ));
                }
            }
        }
        Ok(result)
    }

    /// Snapshot of one series for dates before `max_date`.
    pub async fn surface(
        &self,
        source: RateSource,
        frequency: RateFrequency,
        max_date: NaiveDate,
    ) -> Result<RateSurface> {
        let key = SourceFrequency::new(source, frequency);
        self.refresh(NaiveDate::MIN, max_date, &[key]).await?;

        let bucket = self
            .bucket(key)?
            .read()
            .map_err(|e| RateError::Cache(e.to_string()))?;
        let mut surface = RateSurface::new();
        for (currency, series) in &bucket.rates {
            for (date, rate) in series.range(..max_date) {
                surface.insert(*currency, *date, *rate);
            }
        }
        Ok(surface)
    }

    /// Earliest cached date for the series after refreshing from the store.
    pub async fn min_date(
        &self,
        source: RateSource,
        frequency: RateFrequency,
    ) -> Result<Option<NaiveDate>> {
        let key = SourceFrequency::new(source, frequency);
        self.refresh(NaiveDate::MIN, NaiveDate::MAX, &[key]).await?;
        self.read_min_date(key)
    }

    /// Upserts `rates` into the cache and persists the ones that changed.
    ///
    /// Values equal after rounding to ten places are left alone; different
    /// values overwrite the cached one and are logged as corrections.
    pub async fn save(&self, rates: &[FxRate]) -> Result<SaveOutcome> {
        let mut outcome = SaveOutcome::default();
        let mut to_persist = Vec::new();

        for (key, group) in group_by_bucket(rates) {
            let mut bucket = self
                .bucket(key)?
                .write()
                .map_err(|e| RateError::Cache(e.to_string()))?;
            for rate in group {
                let rounded = round_rate(rate.rate);
                let series = bucket.rates.entry(rate.currency).or_default();
                let change = match series.insert(rate.date, rounded) {
                    None => Upsert::Inserted,
                    Some(old) if old == rounded => Upsert::Unchanged,
                    Some(old) => Upsert::Corrected(old),
                };
                match change {
                    Upsert::Inserted => outcome.inserted += 1,
                    Upsert::Unchanged => {
                        outcome.unchanged += 1;
                        continue;
                    }
                    Upsert::Corrected(old) => {
                        warn!(
                            "Correcting exchange rate for {} on {}. Old: {}, New: {}. Source: {}, Frequency: {}",
                            rate.currency, rate.date, old, rounded, key.source, key.frequency
                        );
                        outcome.corrected += 1;
                    }
                }
                bucket.track_date(rate.date);
                to_persist.push(FxRate::new(
                    rate.date,
                    rate.currency,
                    rate.source,
                    rate.frequency,
                    rounded,
                ));
            }
        }

        if !to_persist.is_empty() {
            self.store.save_rates(&to_persist).await?;
            debug!(
                "Persisted {} rates ({} new, {} corrected, {} unchanged)",
                to_persist.len(),
                outcome.inserted,
                outcome.corrected,
                outcome.unchanged
            );
        }
        Ok(outcome)
    }
}

fn group_by_bucket(rates: &[FxRate]) -> BTreeMap<SourceFrequency, Vec<&FxRate>> {
    let mut groups: BTreeMap<SourceFrequency, Vec<&FxRate>> = BTreeMap::new();
    for rate in rates {
        groups.entry(SourceFrequency::from(rate)).or_default().push(rate);
    }
    groups
}
