//! Hand-written mocks shared by the rates tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use fxrates_market_data::{
    Currency, FxRate, MarketDataError, ProviderCapabilities, QuoteConvention, RateFrequency,
    RateProvider, RateSource,
};

use super::rates_model::PeggedCurrency;
use super::rates_traits::RateDataStore;
use crate::errors::Result;

// =========================================================================
// Mock RateDataStore
// =========================================================================

#[derive(Clone, Default)]
pub struct MockRateStore {
    rates: Arc<Mutex<Vec<FxRate>>>,
    pegged: Arc<Mutex<Vec<PeggedCurrency>>>,
    fail_on_save: Arc<Mutex<bool>>,
    save_calls: Arc<Mutex<usize>>,
    get_ranges: Arc<Mutex<Vec<(NaiveDate, NaiveDate)>>>,
}

impl MockRateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rates(rates: Vec<FxRate>) -> Self {
        let store = Self::default();
        *store.rates.lock().unwrap() = rates;
        store
    }

    pub fn set_fail_on_save(&self, fail: bool) {
        *self.fail_on_save.lock().unwrap() = fail;
    }

    pub fn set_pegged(&self, pegs: Vec<PeggedCurrency>) {
        *self.pegged.lock().unwrap() = pegs;
    }

    pub fn save_calls(&self) -> usize {
        *self.save_calls.lock().unwrap()
    }

    pub fn all_rates(&self) -> Vec<FxRate> {
        self.rates.lock().unwrap().clone()
    }

    pub fn last_get_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.get_ranges.lock().unwrap().last().copied()
    }

    pub fn get_calls(&self) -> usize {
        self.get_ranges.lock().unwrap().len()
    }
}

#[async_trait]
impl RateDataStore for MockRateStore {
    async fn get_rates(&self, min_date: NaiveDate, max_date: NaiveDate) -> Result<Vec<FxRate>> {
        self.get_ranges.lock().unwrap().push((min_date, max_date));
        Ok(self
            .rates
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.date >= min_date && r.date < max_date)
            .cloned()
            .collect())
    }

    async fn save_rates(&self, to_save: &[FxRate]) -> Result<usize> {
        if *self.fail_on_save.lock().unwrap() {
            return Err(crate::Error::Unexpected("Intentional save failure".into()));
        }
        *self.save_calls.lock().unwrap() += 1;
        let mut rates = self.rates.lock().unwrap();
        for rate in to_save {
            rates.retain(|r| r.key() != rate.key());
            rates.push(rate.clone());
        }
        Ok(to_save.len())
    }

    async fn get_pegged_currencies(&self) -> Result<Vec<PeggedCurrency>> {
        Ok(self.pegged.lock().unwrap().clone())
    }
}

// =========================================================================
// Mock RateProvider
// =========================================================================

/// Serves a fixed set of rates; records every historical request.
#[derive(Clone)]
pub struct MockRateProvider {
    source: RateSource,
    base: Currency,
    convention: QuoteConvention,
    frequencies: &'static [RateFrequency],
    history: Arc<Mutex<Vec<FxRate>>>,
    latest: Arc<Mutex<Vec<FxRate>>>,
    fail: Arc<Mutex<bool>>,
    historical_calls: Arc<Mutex<Vec<(RateFrequency, NaiveDate, NaiveDate)>>>,
    latest_calls: Arc<Mutex<usize>>,
}

impl MockRateProvider {
    pub fn new(
        source: RateSource,
        base: Currency,
        convention: QuoteConvention,
        frequencies: &'static [RateFrequency],
    ) -> Self {
        Self {
            source,
            base,
            convention,
            frequencies,
            history: Arc::default(),
            latest: Arc::default(),
            fail: Arc::default(),
            historical_calls: Arc::default(),
            latest_calls: Arc::default(),
        }
    }

    /// ECB-like: EUR base, indirect quotes, daily and monthly.
    pub fn ecb() -> Self {
        Self::new(
            RateSource::ECB,
            Currency::EUR,
            QuoteConvention::Indirect,
            &[RateFrequency::Daily, RateFrequency::Monthly],
        )
    }

    pub fn with_history(self, rates: Vec<FxRate>) -> Self {
        *self.history.lock().unwrap() = rates;
        self
    }

    pub fn with_latest(self, rates: Vec<FxRate>) -> Self {
        *self.latest.lock().unwrap() = rates;
        self
    }

    pub fn set_fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn historical_calls(&self) -> Vec<(RateFrequency, NaiveDate, NaiveDate)> {
        self.historical_calls.lock().unwrap().clone()
    }

    pub fn latest_calls(&self) -> usize {
        *self.latest_calls.lock().unwrap()
    }

    fn failure(&self) -> Option<MarketDataError> {
        if *self.fail.lock().unwrap() {
            Some(MarketDataError::ProviderError {
                provider: self.source.to_string(),
                message: "Intentional provider failure".to_string(),
            })
        } else {
            None
        }
    }
}

#[async_trait]
impl RateProvider for MockRateProvider {
    fn source(&self) -> RateSource {
        self.source
    }

    fn base_currency(&self) -> Currency {
        self.base
    }

    fn quote_convention(&self) -> QuoteConvention {
        self.convention
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            frequencies: self.frequencies,
            supports_latest: true,
            supports_historical: true,
        }
    }

    async fn get_latest_rates(
        &self,
        frequency: RateFrequency,
    ) -> std::result::Result<Vec<FxRate>, MarketDataError> {
        *self.latest_calls.lock().unwrap() += 1;
        if let Some(err) = self.failure() {
            return Err(err);
        }
        Ok(self
            .latest
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.frequency == frequency)
            .cloned()
            .collect())
    }

    async fn get_historical_rates(
        &self,
        frequency: RateFrequency,
        from: NaiveDate,
        to: NaiveDate,
    ) -> std::result::Result<Vec<FxRate>, MarketDataError> {
        self.historical_calls
            .lock()
            .unwrap()
            .push((frequency, from, to));
        if let Some(err) = self.failure() {
            return Err(err);
        }
        Ok(self
            .history
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.frequency == frequency && r.date >= from && r.date <= to)
            .cloned()
            .collect())
    }
}
