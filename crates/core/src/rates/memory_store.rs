//! In-memory data store.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use fxrates_market_data::FxRate;

use super::rates_errors::RateError;
use super::rates_model::PeggedCurrency;
use super::rates_traits::RateDataStore;
use crate::errors::Result;

/// `Vec`-backed store for tests and database-less deployments.
#[derive(Debug, Default)]
pub struct InMemoryRateStore {
    rates: RwLock<Vec<FxRate>>,
    pegged: RwLock<Vec<PeggedCurrency>>,
}

impl InMemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rates(rates: Vec<FxRate>) -> Self {
        Self {
            rates: RwLock::new(rates),
            pegged: RwLock::new(Vec::new()),
        }
    }

    pub fn add_pegged_currency(&self, peg: PeggedCurrency) {
        if let Ok(mut pegged) = self.pegged.write() {
            pegged.retain(|p| p.currency != peg.currency);
            pegged.push(peg);
        }
    }

    pub fn len(&self) -> usize {
        self.rates.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock_error(e: impl std::fmt::Display) -> RateError {
    RateError::Cache(format!("in-memory store lock poisoned: {}", e))
}

#[async_trait]
impl RateDataStore for InMemoryRateStore {
    async fn get_rates(&self, min_date: NaiveDate, max_date: NaiveDate) -> Result<Vec<FxRate>> {
        let rates = self.rates.read().map_err(lock_error)?;
        Ok(rates
            .iter()
            .filter(|r| r.date >= min_date && r.date < max_date)
            .cloned()
            .collect())
    }

    async fn save_rates(&self, to_save: &[FxRate]) -> Result<usize> {
        let mut rates = self.rates.write().map_err(lock_error)?;
        for rate in to_save {
            let key = rate.key();
            match rates.iter_mut().find(|r| r.key() == key) {
                Some(existing) => existing.rate = rate.rate,
                None => rates.push(rate.clone()),
            }
        }
        Ok(to_save.len())
    }

    async fn get_pegged_currencies(&self) -> Result<Vec<PeggedCurrency>> {
        Ok(self.pegged.read().map_err(lock_error)?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxrates_market_data::{Currency, RateFrequency, RateSource};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_range_is_half_open() {
        let store = InMemoryRateStore::new();
        let rates: Vec<FxRate> = (1..=5)
            .map(|d| {
                FxRate::new(
                    date(2024, 1, d),
                    Currency::USD,
                    RateSource::ECB,
                    RateFrequency::Daily,
                    dec!(1.1),
                )
            })
            .collect();
        store.save_rates(&rates).await.unwrap();

        let found = store
            .get_rates(date(2024, 1, 2), date(2024, 1, 4))
            .await
            .unwrap();
        let dates: Vec<_> = found.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 2), date(2024, 1, 3)]);
    }

    #[tokio::test]
    async fn test_save_upserts_by_key() {
        let store = InMemoryRateStore::new();
        let mut rate = FxRate::new(
            date(2024, 1, 1),
            Currency::USD,
            RateSource::ECB,
            RateFrequency::Daily,
            dec!(1.1),
        );
        store.save_rates(&[rate.clone()]).await.unwrap();
        rate.rate = dec!(1.2);
        store.save_rates(&[rate]).await.unwrap();

        assert_eq!(store.len(), 1);
        let all = store
            .get_rates(NaiveDate::MIN, NaiveDate::MAX)
            .await
            .unwrap();
        assert_eq!(all[0].rate, dec!(1.2));
    }
}
