use chrono::NaiveDate;
use fxrates_market_data::{RateFrequency, RateSource};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Query string of `GET /api/rates`. Every field is optional here so that a
/// missing parameter is reported as a problem response.
#[derive(Debug, Default, Deserialize)]
pub struct RateQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub date: Option<String>,
    pub source: Option<String>,
    pub frequency: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateResponse {
    pub from_currency: String,
    pub to_currency: String,
    pub date: NaiveDate,
    pub source: RateSource,
    pub frequency: RateFrequency,
    pub rate: Decimal,
}
