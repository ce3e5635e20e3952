use std::time::Duration;

use crate::engine::Calendar;
use crate::limits::*;

/// Engine settings, read from `VACANCY_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Default `max_search_date` is now plus this many days.
    pub search_horizon_days: i64,
    /// Overall deadline for one batch or search fan-out.
    pub batch_deadline: Duration,
    /// Per-unit computations in flight at once, per batch.
    pub max_concurrency: usize,
    /// Zone used for day/month rounding of next-available dates.
    pub calendar: Calendar,
    pub metrics_port: Option<u16>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search_horizon_days: DEFAULT_SEARCH_HORIZON_DAYS,
            batch_deadline: Duration::from_millis(DEFAULT_BATCH_DEADLINE_MS),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            calendar: Calendar::utc(),
            metrics_port: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unparseable or out-of-range values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let search_horizon_days = lookup("VACANCY_SEARCH_HORIZON_DAYS")
            .and_then(|s| s.parse().ok())
            .filter(|&d: &i64| d > 0 && d <= MAX_RANGE_DAYS)
            .unwrap_or(defaults.search_horizon_days);
        let batch_deadline = lookup("VACANCY_BATCH_DEADLINE_MS")
            .and_then(|s| s.parse().ok())
            .filter(|&ms: &u64| ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.batch_deadline);
        let max_concurrency = lookup("VACANCY_MAX_CONCURRENCY")
            .and_then(|s| s.parse().ok())
            .filter(|&n: &usize| n > 0)
            .unwrap_or(defaults.max_concurrency);
        let calendar = lookup("VACANCY_UTC_OFFSET_MINUTES")
            .and_then(|s| s.parse().ok())
            .and_then(Calendar::with_offset_minutes)
            .unwrap_or(defaults.calendar);
        let metrics_port = lookup("VACANCY_METRICS_PORT").and_then(|s| s.parse().ok());

        Self {
            search_horizon_days,
            batch_deadline,
            max_concurrency,
            calendar,
            metrics_port,
        }
    }
}
