use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Currency, RateFrequency, RateSource};

/// Identity of a rate: at most one value exists per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RateKey {
    pub date: NaiveDate,
    pub currency: Currency,
    pub source: RateSource,
    pub frequency: RateFrequency,
}

/// A published exchange rate for one currency against the source's base currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FxRate {
    pub date: NaiveDate,
    pub currency: Currency,
    pub source: RateSource,
    pub frequency: RateFrequency,
    pub rate: Decimal,
}

impl FxRate {
    pub fn new(
        date: NaiveDate,
        currency: Currency,
        source: RateSource,
        frequency: RateFrequency,
        rate: Decimal,
    ) -> Self {
        Self {
            date,
            currency,
            source,
            frequency,
            rate,
        }
    }

    pub fn key(&self) -> RateKey {
        RateKey {
            date: self.date,
            currency: self.currency,
            source: self.source,
            frequency: self.frequency,
        }
    }
}
