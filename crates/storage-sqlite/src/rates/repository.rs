use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use super::model::{ExchangeRateDB, PeggedCurrencyDB, DATE_FORMAT};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::exchange_rates::dsl as rates_dsl;
use crate::schema::pegged_currencies::dsl as pegged_dsl;
use crate::utils::chunk_for_sqlite;
use fxrates_core::rates::{PeggedCurrency, RateDataStore};
use fxrates_core::Result;
use fxrates_market_data::FxRate;

const RATE_COLUMNS: usize = 5;
const PEGGED_COLUMNS: usize = 3;

/// Range bound as stored text, or `None` when the date lies outside the
/// four-digit years every stored date has.
fn date_bound(date: NaiveDate) -> Option<String> {
    (0..=9999)
        .contains(&date.year())
        .then(|| date.format(DATE_FORMAT).to_string())
}

pub struct SqliteRateStore {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl SqliteRateStore {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    /// Replaces the stored peg table entries for the given currencies.
    pub async fn save_pegged_currencies(&self, pegs: &[PeggedCurrency]) -> Result<usize> {
        if pegs.is_empty() {
            return Ok(0);
        }
        let db_rows: Vec<PeggedCurrencyDB> = pegs.iter().map(PeggedCurrencyDB::from).collect();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut total = 0;
                for chunk in chunk_for_sqlite(&db_rows, PEGGED_COLUMNS) {
                    total += diesel::replace_into(pegged_dsl::pegged_currencies)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::QueryFailed)?;
                }
                Ok(total)
            })
            .await
    }
}

// =============================================================================
// RateDataStore Implementation
// =============================================================================

#[async_trait]
impl RateDataStore for SqliteRateStore {
    async fn get_rates(&self, min_date: NaiveDate, max_date: NaiveDate) -> Result<Vec<FxRate>> {
        if min_date >= max_date {
            return Ok(Vec::new());
        }

        let mut conn = get_connection(&self.pool)?;
        let mut query = rates_dsl::exchange_rates
            .select(ExchangeRateDB::as_select())
            .into_boxed();
        if let Some(lower) = date_bound(min_date) {
            query = query.filter(rates_dsl::date.ge(lower));
        }
        if let Some(upper) = date_bound(max_date) {
            query = query.filter(rates_dsl::date.lt(upper));
        }

        let rows = query
            .order(rates_dsl::date.asc())
            .load::<ExchangeRateDB>(&mut conn)
            .into_core()?;
        debug!(
            "Read {} exchange rates for [{}, {})",
            rows.len(),
            min_date,
            max_date
        );

        rows.into_iter()
            .map(|row| FxRate::try_from(row).map_err(Into::into))
            .collect()
    }

    async fn save_rates(&self, rates: &[FxRate]) -> Result<usize> {
        if rates.is_empty() {
            return Ok(0);
        }
        let db_rows: Vec<ExchangeRateDB> = rates.iter().map(ExchangeRateDB::from).collect();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut total_upserted = 0;
                for chunk in chunk_for_sqlite(&db_rows, RATE_COLUMNS) {
                    total_upserted += diesel::replace_into(rates_dsl::exchange_rates)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::QueryFailed)?;
                }
                Ok(total_upserted)
            })
            .await
    }

    async fn get_pegged_currencies(&self) -> Result<Vec<PeggedCurrency>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = pegged_dsl::pegged_currencies
            .select(PeggedCurrencyDB::as_select())
            .load::<PeggedCurrencyDB>(&mut conn)
            .into_core()?;

        rows.into_iter()
            .map(|row| PeggedCurrency::try_from(row).map_err(Into::into))
            .collect()
    }
}
