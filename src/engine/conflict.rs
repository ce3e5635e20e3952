use chrono::{DateTime, TimeDelta, Utc};

use crate::model::*;

use super::EngineError;

pub(crate) fn now() -> Timestamp {
    Utc::now()
}

/// Reject a requested range before it reaches the store.
pub(crate) fn validate_range(range: &DateRange) -> Result<(), EngineError> {
    use crate::limits::*;
    range.validate()?;
    if range.duration() > TimeDelta::days(MAX_RANGE_DAYS) {
        return Err(EngineError::LimitExceeded("range too wide"));
    }
    Ok(())
}

/// Default `max_search_date`: `now` plus the horizon, saturating.
pub(crate) fn search_horizon_from(now: Timestamp, horizon_days: i64) -> Timestamp {
    TimeDelta::try_days(horizon_days)
        .and_then(|horizon| now.checked_add_signed(horizon))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
