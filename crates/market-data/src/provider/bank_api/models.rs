//! Bank rate API response models.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use crate::models::{Currency, FxRate, RateFrequency, RateSource};

/// OAuth client-credentials token response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Lifetime in seconds, when the issuer reports one.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Rates keyed by publication date, then by currency code.
///
/// ```json
/// {"rates": {"2024-01-10": {"USD": {"rate": 1.095, "unitMultiplier": 0}}}}
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct ExchangeRatesResponse {
    #[serde(default, alias = "Rates")]
    pub rates: HashMap<String, HashMap<String, RateEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateEntry {
    #[serde(alias = "Rate")]
    pub rate: Decimal,
    /// Power of ten the published rate is scaled by (e.g. JPY per 100 units).
    #[serde(default, alias = "UnitMultiplier")]
    pub unit_multiplier: Option<i32>,
}

impl RateEntry {
    /// Rate for a single unit: `rate / 10^unit_multiplier`.
    ///
    /// Returns `None` when the multiplier is too large to represent.
    pub fn absolute_rate(&self) -> Option<Decimal> {
        let exponent = self.unit_multiplier.unwrap_or(0);
        let scale = 10i64.checked_pow(exponent.unsigned_abs())?;
        let scale = Decimal::from(scale);
        if exponent >= 0 {
            self.rate.checked_div(scale)
        } else {
            self.rate.checked_mul(scale)
        }
    }
}

/// Accepts plain dates as well as timestamps with or without an offset.
pub fn parse_rate_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|d| d.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|d| d.date())
        })
}

impl ExchangeRatesResponse {
    /// Flattens the payload into rates for `source`/`frequency`.
    ///
    /// Entries with an unparseable date, an unsupported currency code or an
    /// unrepresentable multiplier are skipped.
    pub fn into_rates(self, source: RateSource, frequency: RateFrequency) -> Vec<FxRate> {
        let mut rates = Vec::new();
        for (date_str, currencies) in self.rates {
            let Some(date) = parse_rate_date(&date_str) else {
                debug!("{}: skipping unparseable rate date '{}'", source, date_str);
                continue;
            };
            for (code, entry) in currencies {
                let Ok(currency) = code.parse::<Currency>() else {
                    continue;
                };
                let Some(rate) = entry.absolute_rate() else {
                    debug!("{}: skipping {} on {}: bad unit multiplier", source, code, date);
                    continue;
                };
                rates.push(FxRate::new(date, currency, source, frequency, rate));
            }
        }
        rates.sort_by_key(|r| (r.date, r.currency));
        rates
    }
}
