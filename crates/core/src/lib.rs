//! FX Rates Core - rate cache, quote resolution and synchronization.
//!
//! This crate answers "what is the rate from A to B on day D according to
//! source S at frequency F". It is storage-agnostic: persistence goes through
//! [`rates::RateDataStore`], implemented in memory here and by the
//! `storage-sqlite` crate.

pub mod errors;
pub mod rates;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
