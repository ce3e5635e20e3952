use tracing::debug;

use crate::limits::MAX_SEARCH_LIMIT;
use crate::model::*;
use crate::observability::{SEARCH_CANDIDATES, SEARCH_RESULTS};

use super::conflict::validate_range;
use super::{AvailabilityEngine, EngineError};

impl AvailabilityEngine {
    /// Units of the requested types that are free for `requested_range`,
    /// in catalogue order.
    ///
    /// At most `limit` candidates are checked, so the result can undercount
    /// when more than `limit` units of a type exist and the first ones are
    /// booked. Units whose check fails are left out: unknown is never free.
    pub async fn find_available_units<S: AsRef<str>>(
        &self,
        requested_types: &[S],
        requested_range: DateRange,
        limit: usize,
    ) -> Result<Vec<AvailableUnit>, EngineError> {
        if limit == 0 {
            return Err(EngineError::InvalidRange("limit must be positive".into()));
        }
        if limit > MAX_SEARCH_LIMIT {
            return Err(EngineError::LimitExceeded("search limit too large"));
        }
        validate_range(&requested_range)?;

        let filter = TypeFilter::from_requested(requested_types);
        let candidates: Vec<RentalUnit> = self
            .catalogue
            .list_units(&filter, true, limit)
            .await?
            .into_iter()
            // Adapter output is re-checked against the filter and cap.
            .filter(|u| u.manually_available && filter.matches(&u.unit_type))
            .take(limit)
            .collect();
        metrics::histogram!(SEARCH_CANDIDATES).record(candidates.len() as f64);

        let units = candidates.iter().cloned().map(UnitRef::Unit).collect();
        let outcomes = self
            .fan_out(units, requested_range, AvailabilityOptions::existence_only())
            .await;

        let available: Vec<AvailableUnit> = candidates
            .into_iter()
            .zip(outcomes)
            .filter_map(|(unit, (_, outcome))| match outcome {
                Ok(availability) if availability.available => {
                    Some(AvailableUnit { unit, availability })
                }
                _ => None,
            })
            .collect();

        debug!(?filter, found = available.len(), "inventory search");
        metrics::histogram!(SEARCH_RESULTS).record(available.len() as f64);
        Ok(available)
    }
}
