/// Default pause between scheduled refresh cycles.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Delay before the first scheduled cycle after startup.
pub const DEFAULT_REFRESH_INITIAL_DELAY_SECS: u64 = 5;

/// Upper bound on provider fetches in flight during one refresh cycle.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 4;

/// Decimal precision for valuation calculations
pub const DECIMAL_PRECISION: u32 = 6;
