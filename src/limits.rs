//! Hard limits on request size. Exceeding any of these yields `EngineError::LimitExceeded`.

/// Max distinct units in a single batch request.
pub const MAX_BATCH_UNITS: usize = 10_000;

/// Max candidates an inventory search may fan out over.
pub const MAX_SEARCH_LIMIT: usize = 1_000;

/// Max width of a requested range (100 years).
pub const MAX_RANGE_DAYS: i64 = 36_525;

/// Default look-ahead for next-available computation.
pub const DEFAULT_SEARCH_HORIZON_DAYS: i64 = 365;

/// Default overall deadline for a batch or search fan-out.
pub const DEFAULT_BATCH_DEADLINE_MS: u64 = 5_000;

/// Default number of per-unit computations in flight at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 64;
