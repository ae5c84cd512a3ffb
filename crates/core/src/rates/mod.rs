//! Exchange rates: cache, resolution, synchronization and the service facade.

mod memory_store;
mod pegged;
mod quote_resolver;
mod rate_cache;
mod rates_constants;
mod rates_errors;
mod rates_model;
mod rates_service;
mod rates_traits;
mod synchronizer;

#[cfg(test)]
pub(crate) mod test_support;

pub use memory_store::InMemoryRateStore;
pub use pegged::{default_pegged_currencies, PeggedCurrencyTable};
pub use quote_resolver::QuoteResolver;
pub use rate_cache::RateSurfaceCache;
pub use rates_constants::{LAZY_BACKFILL_MONTHS, ON_DEMAND_BACKFILL_DAYS, RATE_DECIMAL_PLACES};
pub use rates_errors::RateError;
pub use rates_model::{round_rate, PeggedCurrency, RateSurface, SaveOutcome, SourceFrequency};
pub use rates_service::ExchangeRateService;
pub use rates_traits::{ExchangeRateServiceTrait, RateDataStore};
pub use synchronizer::{RateSynchronizer, UpdateSummary};
