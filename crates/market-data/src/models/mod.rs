//! Exchange rate models
//!
//! - `currency` - the closed set of supported ISO 4217 currencies
//! - `types` - rate sources, frequencies and quote conventions
//! - `rate` - the published rate fact and its identity key

mod currency;
mod rate;
mod types;

pub use currency::Currency;
pub use rate::{FxRate, RateKey};
pub use types::{ParseCodeError, QuoteConvention, RateFrequency, RateSource};
