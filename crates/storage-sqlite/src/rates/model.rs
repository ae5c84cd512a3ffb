//! Database models for exchange rates and pegged currencies.

use std::str::FromStr;

use chrono::NaiveDate;
use diesel::prelude::*;
use fxrates_core::rates::PeggedCurrency;
use fxrates_market_data::{Currency, FxRate, RateFrequency, RateSource};
use rust_decimal::Decimal;

use crate::errors::StorageError;

/// Stored date format; sorts lexicographically in date order.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Database model for exchange rates
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::exchange_rates)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ExchangeRateDB {
    pub date: String,
    pub currency: String,
    pub source: String,
    pub frequency: String,
    pub rate: String,
}

/// Database model for pegged currencies
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::pegged_currencies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PeggedCurrencyDB {
    pub currency_id: String,
    pub pegged_to: String,
    pub rate: String,
}

fn parse_field<T: FromStr>(value: &str, field: &str) -> Result<T, StorageError>
where
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| StorageError::SerializationError(format!("{} '{}': {}", field, value, e)))
}

impl From<&FxRate> for ExchangeRateDB {
    fn from(rate: &FxRate) -> Self {
        Self {
            date: rate.date.format(DATE_FORMAT).to_string(),
            currency: rate.currency.as_str().to_string(),
            source: rate.source.as_str().to_string(),
            frequency: rate.frequency.as_str().to_string(),
            rate: rate.rate.to_string(),
        }
    }
}

impl TryFrom<ExchangeRateDB> for FxRate {
    type Error = StorageError;

    fn try_from(db: ExchangeRateDB) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(&db.date, DATE_FORMAT).map_err(|e| {
            StorageError::SerializationError(format!("date '{}': {}", db.date, e))
        })?;
        Ok(FxRate::new(
            date,
            parse_field::<Currency>(&db.currency, "currency")?,
            parse_field::<RateSource>(&db.source, "source")?,
            parse_field::<RateFrequency>(&db.frequency, "frequency")?,
            parse_field::<Decimal>(&db.rate, "rate")?,
        ))
    }
}

impl From<&PeggedCurrency> for PeggedCurrencyDB {
    fn from(peg: &PeggedCurrency) -> Self {
        Self {
            currency_id: peg.currency.as_str().to_string(),
            pegged_to: peg.pegged_to.as_str().to_string(),
            rate: peg.rate.to_string(),
        }
    }
}

impl TryFrom<PeggedCurrencyDB> for PeggedCurrency {
    type Error = StorageError;

    fn try_from(db: PeggedCurrencyDB) -> Result<Self, Self::Error> {
        Ok(PeggedCurrency::new(
            parse_field::<Currency>(&db.currency_id, "currency")?,
            parse_field::<Currency>(&db.pegged_to, "pegged currency")?,
            parse_field::<Decimal>(&db.rate, "peg rate")?,
        ))
    }
}
