use std::collections::BTreeSet;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::engine::EngineError;

/// Instants are UTC with nanosecond precision.
pub type Timestamp = DateTime<Utc>;

pub type UnitId = Ulid;
pub type BookingId = Ulid;

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl DateRange {
    /// Build a range, rejecting `start >= end`.
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, EngineError> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    /// Ranges can be built field-by-field (e.g. deserialized), so callers
    /// re-check at the boundary before using one.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.start >= self.end {
            return Err(EngineError::InvalidRange(format!(
                "start {} is not before end {}",
                self.start, self.end
            )));
        }
        Ok(())
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Touching ranges (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains_instant(&self, t: Timestamp) -> bool {
        self.start <= t && t < self.end
    }
}

/// Max `end` across the given ranges, `None` when there are none.
pub fn latest_end<'a>(ranges: impl IntoIterator<Item = &'a DateRange>) -> Option<Timestamp> {
    ranges.into_iter().map(|r| r.end).max()
}

/// A rentable physical space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalUnit {
    pub id: UnitId,
    pub unit_type: String,
    /// Administrative override. `false` blocks the unit regardless of bookings.
    pub manually_available: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Active,
    Scheduled,
    Pending,
    Cancelled,
    Expired,
}

impl BookingStatus {
    /// Only these states count toward conflicts.
    pub fn is_blocking(self) -> bool {
        matches!(
            self,
            BookingStatus::Active | BookingStatus::Scheduled | BookingStatus::Pending
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Active => "active",
            BookingStatus::Scheduled => "scheduled",
            BookingStatus::Pending => "pending",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Expired => "expired",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contract blocking one or more units. Owned by the contract store; read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub unit_ids: BTreeSet<UnitId>,
    pub status: BookingStatus,
    /// Authoritative blocking window, may differ from the nominal contract dates.
    pub impact_range: DateRange,
    pub owner_name: String,
}

impl Booking {
    pub fn references(&self, unit_id: &UnitId) -> bool {
        self.unit_ids.contains(unit_id)
    }

    pub fn is_blocking(&self) -> bool {
        self.status.is_blocking()
    }
}

// ── Query input types ────────────────────────────────────────────

/// A unit given either in full or by id (resolved through the catalogue).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitRef {
    Unit(RentalUnit),
    Id(UnitId),
}

impl UnitRef {
    pub fn id(&self) -> UnitId {
        match self {
            UnitRef::Unit(unit) => unit.id,
            UnitRef::Id(id) => *id,
        }
    }
}

impl From<RentalUnit> for UnitRef {
    fn from(unit: RentalUnit) -> Self {
        UnitRef::Unit(unit)
    }
}

impl From<UnitId> for UnitRef {
    fn from(id: UnitId) -> Self {
        UnitRef::Id(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityOptions {
    pub include_conflicts: bool,
    pub calculate_next_available: bool,
    /// `None` means now plus the configured search horizon.
    pub max_search_date: Option<Timestamp>,
}

impl Default for AvailabilityOptions {
    fn default() -> Self {
        Self {
            include_conflicts: true,
            calculate_next_available: true,
            max_search_date: None,
        }
    }
}

impl AvailabilityOptions {
    /// Cheap existence check: one store query, no conflict projection.
    pub fn existence_only() -> Self {
        Self {
            include_conflicts: false,
            calculate_next_available: false,
            max_search_date: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub unit_ids: Vec<UnitId>,
    pub requested_range: DateRange,
    pub options: AvailabilityOptions,
}

/// Catalogue type filter. `"all"` in the requested list matches every type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeFilter {
    All,
    Types(Vec<String>),
}

impl TypeFilter {
    pub const ALL: &'static str = "all";

    pub fn from_requested<S: AsRef<str>>(requested: &[S]) -> Self {
        if requested.iter().any(|t| t.as_ref() == Self::ALL) {
            TypeFilter::All
        } else {
            TypeFilter::Types(requested.iter().map(|t| t.as_ref().to_string()).collect())
        }
    }

    pub fn matches(&self, unit_type: &str) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Types(types) => types.iter().any(|t| t == unit_type),
        }
    }
}

// ── Query result types ───────────────────────────────────────────

/// Read-only projection of a blocking booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConflict {
    pub booking_id: BookingId,
    pub range: DateRange,
    pub owner_name: String,
    pub status: BookingStatus,
}

impl From<&Booking> for BookingConflict {
    fn from(booking: &Booking) -> Self {
        Self {
            booking_id: booking.id,
            range: booking.impact_range,
            owner_name: booking.owner_name.clone(),
            status: booking.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResult {
    pub available: bool,
    pub conflicts: Vec<BookingConflict>,
    /// Only meaningful when `available` is false.
    pub next_available: Option<Timestamp>,
}

impl AvailabilityResult {
    pub fn free() -> Self {
        Self {
            available: true,
            conflicts: Vec::new(),
            next_available: None,
        }
    }

    /// Administrative block: not booking-derived, so no conflicts and no date.
    pub fn blocked_manually() -> Self {
        Self {
            available: false,
            conflicts: Vec::new(),
            next_available: None,
        }
    }
}

/// One slot per requested unit; an `Err` slot means availability is unknown.
pub type BatchAvailabilityResult =
    std::collections::HashMap<UnitId, Result<AvailabilityResult, EngineError>>;

/// Flattened, serializable view of one batch slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchEntry {
    pub available: bool,
    pub conflicts: Vec<BookingConflict>,
    pub next_available: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&Result<AvailabilityResult, EngineError>> for BatchEntry {
    fn from(slot: &Result<AvailabilityResult, EngineError>) -> Self {
        match slot {
            Ok(result) => Self {
                available: result.available,
                conflicts: result.conflicts.clone(),
                next_available: result.next_available,
                error: None,
            },
            Err(e) => Self {
                available: false,
                conflicts: Vec::new(),
                next_available: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Inventory search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableUnit {
    pub unit: RentalUnit,
    pub availability: AvailabilityResult,
}
