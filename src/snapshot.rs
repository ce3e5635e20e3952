//! JSON snapshot of a catalogue and its bookings, loaded into the in-memory adapters.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::EngineError;
use crate::model::{Booking, RentalUnit};
use crate::store::{InMemoryCatalogue, InMemoryStore};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub units: Vec<RentalUnit>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

#[derive(Debug)]
pub enum SnapshotError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(EngineError),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::Io(e) => write!(f, "snapshot read failed: {e}"),
            SnapshotError::Json(e) => write!(f, "snapshot parse failed: {e}"),
            SnapshotError::Invalid(e) => write!(f, "snapshot invalid: {e}"),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl From<std::io::Error> for SnapshotError {
    fn from(e: std::io::Error) -> Self {
        SnapshotError::Io(e)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(e: serde_json::Error) -> Self {
        SnapshotError::Json(e)
    }
}

impl From<EngineError> for SnapshotError {
    fn from(e: EngineError) -> Self {
        SnapshotError::Invalid(e)
    }
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Build the in-memory adapters. Fails on any booking with an invalid impact range.
    pub fn into_adapters(self) -> Result<(InMemoryStore, InMemoryCatalogue), SnapshotError> {
        let catalogue = InMemoryCatalogue::new(self.units);
        let store = InMemoryStore::new();
        for booking in self.bookings {
            if booking.unit_ids.is_empty() {
                warn!(booking_id = %booking.id, "booking references no units, skipped");
                continue;
            }
            store.insert_booking(booking)?;
        }
        Ok((store, catalogue))
    }
}
