//! FX Rates Market Data Crate
//!
//! Vocabulary and provider plumbing for exchange rate sources.
//!
//! # Overview
//!
//! - Closed enumerations for currencies, rate sources, frequencies and quote
//!   conventions
//! - The [`RateProvider`] contract: a provider declares its base currency,
//!   quote convention and published frequencies, and serves "latest" and
//!   historical windows
//! - [`BankApiProvider`], one implementation parameterised by [`BankProfile`]
//!   for every supported central bank
//! - [`ProviderRegistry`] for source → provider lookup
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+     +------------------+
//! | ProviderRegistry | --> |   RateProvider   | --> |     FxRate       |
//! +------------------+     +------------------+     +------------------+
//!                            (BankApiProvider)
//! ```

pub mod errors;
pub mod models;
pub mod period;
pub mod provider;
pub mod registry;

pub use errors::{MarketDataError, RetryClass};

pub use models::{
    Currency, FxRate, ParseCodeError, QuoteConvention, RateFrequency, RateKey, RateSource,
};

pub use provider::bank_api::{BankApiConfig, BankApiProvider, BankProfile};
pub use provider::{ProviderCapabilities, RateProvider};

pub use registry::ProviderRegistry;
