//! Rate provider abstractions and implementations.
//!
//! - The `RateProvider` trait every provider implements
//! - Provider capabilities (which frequencies a provider publishes)
//! - The central bank API provider

mod capabilities;
mod traits;

pub mod bank_api;

pub use capabilities::ProviderCapabilities;
pub use traits::{validate_range, RateProvider};
