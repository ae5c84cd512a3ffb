use async_trait::async_trait;
use chrono::NaiveDate;
use fxrates_market_data::{Currency, FxRate, RateFrequency, RateSource};
use rust_decimal::Decimal;

use super::rates_model::PeggedCurrency;
use super::synchronizer::UpdateSummary;
use crate::errors::Result;

/// Persistence contract for rates and pegs.
#[async_trait]
pub trait RateDataStore: Send + Sync {
    /// Rates dated in the half-open range `[min_date, max_date)`.
    async fn get_rates(&self, min_date: NaiveDate, max_date: NaiveDate) -> Result<Vec<FxRate>>;

    /// Insert or replace each rate by (date, currency, source, frequency).
    async fn save_rates(&self, rates: &[FxRate]) -> Result<usize>;

    async fn get_pegged_currencies(&self) -> Result<Vec<PeggedCurrency>>;
}

/// Trait defining the contract for exchange rate service operations.
#[async_trait]
pub trait ExchangeRateServiceTrait: Send + Sync {
    /// Rate converting one unit of `from` into `to` on `date`.
    ///
    /// `Ok(None)` means no rate is available even after a backfill attempt.
    async fn get_rate(
        &self,
        from: Currency,
        to: Currency,
        date: NaiveDate,
        source: RateSource,
        frequency: RateFrequency,
    ) -> Result<Option<Decimal>>;

    /// Same as [`get_rate`](Self::get_rate) with case-insensitive ISO codes.
    async fn get_rate_by_code(
        &self,
        from_code: &str,
        to_code: &str,
        date: NaiveDate,
        source: RateSource,
        frequency: RateFrequency,
    ) -> Result<Option<Decimal>>;

    /// Fetch every source's latest window.
    async fn update_rates(&self) -> UpdateSummary;

    /// Backfill every (or the given) source back to the month of `min_date`.
    async fn ensure_minimum_date_range(
        &self,
        min_date: NaiveDate,
        sources: Option<&[RateSource]>,
    ) -> bool;

    /// Sources with a registered provider.
    fn sources(&self) -> Vec<RateSource>;
}
