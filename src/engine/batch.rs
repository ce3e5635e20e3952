use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::limits::MAX_BATCH_UNITS;
use crate::model::*;
use crate::observability::{BATCH_DURATION_SECONDS, BATCH_SIZE, BATCH_SLOT_ERRORS_TOTAL};

use super::conflict::validate_range;
use super::{AvailabilityEngine, EngineError};

pub(super) type SlotOutcome = (UnitId, Result<AvailabilityResult, EngineError>);

impl AvailabilityEngine {
    /// Availability of many units at once, one slot per distinct unit id.
    ///
    /// Only caller errors (bad range, too many units) fail the whole request.
    /// Anything that goes wrong for a single unit, including the batch deadline
    /// passing, is recorded in that unit's slot.
    pub async fn calculate_batch_availability(
        &self,
        request: BatchRequest,
    ) -> Result<BatchAvailabilityResult, EngineError> {
        validate_range(&request.requested_range)?;

        let requested = request.unit_ids.len();
        let mut seen = HashSet::with_capacity(requested);
        let units: Vec<UnitRef> = request
            .unit_ids
            .into_iter()
            .filter(|id| seen.insert(*id))
            .map(UnitRef::Id)
            .collect();
        if units.len() > MAX_BATCH_UNITS {
            return Err(EngineError::LimitExceeded("too many units in batch"));
        }
        if units.len() < requested {
            debug!(requested, distinct = units.len(), "duplicate unit ids collapsed");
        }

        let outcomes = self
            .fan_out(units, request.requested_range, request.options)
            .await;
        Ok(outcomes.into_iter().collect())
    }

    /// Run one availability check per unit concurrently and join them all,
    /// successes and failures alike. Outcomes come back in input order.
    pub(super) async fn fan_out(
        &self,
        units: Vec<UnitRef>,
        requested_range: DateRange,
        options: AvailabilityOptions,
    ) -> Vec<SlotOutcome> {
        let started = Instant::now();
        metrics::histogram!(BATCH_SIZE).record(units.len() as f64);

        let deadline = tokio::time::Instant::now() + self.config.batch_deadline;
        let permits = Arc::new(Semaphore::new(self.config.max_concurrency));
        let ids: Vec<UnitId> = units.iter().map(UnitRef::id).collect();

        let handles: Vec<_> = units
            .into_iter()
            .map(|unit| {
                let engine = self.clone();
                let permits = permits.clone();
                tokio::spawn(async move {
                    let work = async {
                        let Ok(_permit) = permits.acquire_owned().await else {
                            return Err(EngineError::Aborted("batch closed".into()));
                        };
                        engine
                            .calculate_availability(unit, requested_range, options)
                            .await
                    };
                    tokio::time::timeout_at(deadline, work)
                        .await
                        .unwrap_or(Err(EngineError::Timeout))
                })
            })
            .collect();

        let joined = futures::future::join_all(handles).await;

        let outcomes: Vec<SlotOutcome> = ids
            .into_iter()
            .zip(joined)
            .map(|(unit_id, joined)| {
                let result = joined.unwrap_or_else(|e| Err(EngineError::Aborted(e.to_string())));
                if let Err(e) = &result {
                    warn!(%unit_id, "availability check failed: {e}");
                    metrics::counter!(BATCH_SLOT_ERRORS_TOTAL, "kind" => e.kind()).increment(1);
                }
                (unit_id, result)
            })
            .collect();

        metrics::histogram!(BATCH_DURATION_SECONDS).record(started.elapsed().as_secs_f64());
        outcomes
    }
}
