use chrono::NaiveDate;
use fxrates_market_data::{Currency, FxRate, RateFrequency, RateSource};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::rates_constants::RATE_DECIMAL_PLACES;

/// Rates are compared and cached at this precision.
pub fn round_rate(rate: Decimal) -> Decimal {
    rate.round_dp(RATE_DECIMAL_PLACES)
}

/// Key of one rate series bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceFrequency {
    pub source: RateSource,
    pub frequency: RateFrequency,
}

impl SourceFrequency {
    pub fn new(source: RateSource, frequency: RateFrequency) -> Self {
        Self { source, frequency }
    }

    /// Every (source, frequency) combination.
    pub fn all() -> impl Iterator<Item = SourceFrequency> {
        RateSource::ALL.iter().flat_map(|source| {
            RateFrequency::ALL
                .iter()
                .map(move |frequency| SourceFrequency::new(*source, *frequency))
        })
    }
}

impl From<&FxRate> for SourceFrequency {
    fn from(rate: &FxRate) -> Self {
        Self::new(rate.source, rate.frequency)
    }
}

/// One unit of `currency` equals `rate` units of `pegged_to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeggedCurrency {
    pub currency: Currency,
    pub pegged_to: Currency,
    pub rate: Decimal,
}

impl PeggedCurrency {
    pub fn new(currency: Currency, pegged_to: Currency, rate: Decimal) -> Self {
        Self {
            currency,
            pegged_to,
            rate,
        }
    }
}

/// Read-only snapshot of one (source, frequency) series: currency → date → rate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateSurface {
    rates: HashMap<Currency, BTreeMap<NaiveDate, Decimal>>,
    min_date: Option<NaiveDate>,
}

impl RateSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rates<'a>(rates: impl IntoIterator<Item = &'a FxRate>) -> Self {
        let mut surface = Self::new();
        for rate in rates {
            surface.insert(rate.currency, rate.date, rate.rate);
        }
        surface
    }

    pub fn insert(&mut self, currency: Currency, date: NaiveDate, rate: Decimal) {
        self.rates.entry(currency).or_default().insert(date, rate);
        if self.min_date.map_or(true, |min| date < min) {
            self.min_date = Some(date);
        }
    }

    /// Earliest date present in any series; bounds the backward search.
    pub fn min_date(&self) -> Option<NaiveDate> {
        self.min_date
    }

    pub fn has_series(&self, currency: Currency) -> bool {
        self.rates.contains_key(&currency)
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Most recent rate for `currency` on or before `date`, never earlier than `min_date`.
    pub fn latest_on_or_before(
        &self,
        currency: Currency,
        date: NaiveDate,
    ) -> Option<(NaiveDate, Decimal)> {
        let series = self.rates.get(&currency)?;
        let min = self.min_date?;
        if date < min {
            return None;
        }
        series
            .range(min..=date)
            .next_back()
            .map(|(d, r)| (*d, *r))
    }
}

/// Counts from one cache save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveOutcome {
    pub inserted: usize,
    pub corrected: usize,
    pub unchanged: usize,
}

impl SaveOutcome {
    /// Rows handed to the data store.
    pub fn persisted(&self) -> usize {
        self.inserted + self.corrected
    }
}
