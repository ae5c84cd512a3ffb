/// Fractional digits kept when comparing and caching rates.
pub const RATE_DECIMAL_PLACES: u32 = 10;

/// Days before a missed date fetched by the on-demand backfill.
pub const ON_DEMAND_BACKFILL_DAYS: i64 = 7;

/// Months of history fetched before a date that precedes the cached range.
pub const LAZY_BACKFILL_MONTHS: u32 = 1;
