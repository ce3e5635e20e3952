mod availability;
mod batch;
mod calendar;
mod conflict;
mod error;
mod queries;
mod search;

pub use availability::{next_available_after, project_conflicts};
pub use calendar::Calendar;
pub use error::EngineError;

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::store::{ConflictStore, UnitCatalogue};

/// Read-only availability queries over a conflict store and a unit catalogue.
///
/// Cheap to clone: each batch task holds its own handle.
#[derive(Clone)]
pub struct AvailabilityEngine {
    pub(super) store: Arc<dyn ConflictStore>,
    pub(super) catalogue: Arc<dyn UnitCatalogue>,
    pub(super) config: EngineConfig,
}

impl AvailabilityEngine {
    pub fn new(
        store: Arc<dyn ConflictStore>,
        catalogue: Arc<dyn UnitCatalogue>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            catalogue,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
