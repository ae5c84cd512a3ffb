//! SQLite storage for exchange rates and pegged currencies.

mod model;
mod repository;

pub use model::{ExchangeRateDB, PeggedCurrencyDB};
pub use repository::SqliteRateStore;
