//! SQLite storage implementation for the FX rates service.
//!
//! This crate implements the `RateDataStore` contract from `fxrates-core`
//! using Diesel over SQLite. It contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The rate and peg repository
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the service where Diesel dependencies exist.
//!
//! ```text
//! core (rates)        server
//!       │                │
//!       └───────┬────────┘
//!               │
//!               ▼
//!       storage-sqlite (this crate)
//!               │
//!               ▼
//!           SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod rates;
pub mod schema;
mod utils;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use rates::SqliteRateStore;

// Re-export from fxrates-core for convenience
pub use fxrates_core::errors::{DatabaseError, Error, Result};
