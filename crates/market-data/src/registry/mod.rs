//! Provider registry module.
//!
//! Maps each [`RateSource`](crate::models::RateSource) to the provider that
//! publishes it.

mod registry;

pub use registry::ProviderRegistry;
