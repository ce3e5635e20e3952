use std::time::Instant;

use tracing::debug;

use crate::model::*;
use crate::observability::{self, CHECKS_TOTAL, CHECK_DURATION_SECONDS, STORE_QUERIES_TOTAL};

use super::availability::{next_available_after, project_conflicts};
use super::conflict::{now, search_horizon_from, validate_range};
use super::{AvailabilityEngine, EngineError};

impl AvailabilityEngine {
    /// Availability of one unit for `requested_range`.
    ///
    /// Fails fast: an invalid range never reaches the store, and store or
    /// catalogue errors are returned as-is. Issues at most two store queries.
    pub async fn calculate_availability(
        &self,
        unit: impl Into<UnitRef>,
        requested_range: DateRange,
        options: AvailabilityOptions,
    ) -> Result<AvailabilityResult, EngineError> {
        let started = Instant::now();
        let result = self.check_unit(unit.into(), requested_range, options).await;
        metrics::counter!(CHECKS_TOTAL, "outcome" => observability::outcome_label(&result))
            .increment(1);
        metrics::histogram!(CHECK_DURATION_SECONDS).record(started.elapsed().as_secs_f64());
        result
    }

    async fn check_unit(
        &self,
        unit: UnitRef,
        requested_range: DateRange,
        options: AvailabilityOptions,
    ) -> Result<AvailabilityResult, EngineError> {
        validate_range(&requested_range)?;
        let unit = self.resolve_unit(unit).await?;

        // Administrative block: no interval arithmetic, no date.
        if !unit.manually_available {
            debug!(unit_id = %unit.id, "unit manually blocked");
            return Ok(AvailabilityResult::blocked_manually());
        }

        metrics::counter!(STORE_QUERIES_TOTAL, "query" => "blocking").increment(1);
        let blocking = self
            .store
            .find_blocking_bookings(unit.id, requested_range)
            .await?;
        if blocking.is_empty() {
            return Ok(AvailabilityResult::free());
        }
        debug!(unit_id = %unit.id, conflicts = blocking.len(), "unit booked");

        let conflicts = if options.include_conflicts {
            project_conflicts(&blocking)
        } else {
            Vec::new()
        };

        let next_available = if options.calculate_next_available {
            metrics::counter!(STORE_QUERIES_TOTAL, "query" => "future_blocking").increment(1);
            let future = self
                .store
                .find_future_blocking_bookings(unit.id, requested_range.end)
                .await?;
            let max_search_date = options
                .max_search_date
                .unwrap_or_else(|| search_horizon_from(now(), self.config.search_horizon_days));
            next_available_after(
                &self.config.calendar,
                &future,
                requested_range.end,
                max_search_date,
            )
        } else {
            None
        };

        Ok(AvailabilityResult {
            available: false,
            conflicts,
            next_available,
        })
    }

    async fn resolve_unit(&self, unit: UnitRef) -> Result<RentalUnit, EngineError> {
        match unit {
            UnitRef::Unit(unit) => Ok(unit),
            UnitRef::Id(id) => self
                .catalogue
                .get_unit(id)
                .await?
                .ok_or(EngineError::UnitNotFound(id)),
        }
    }
}
