//! Read-only adapter boundaries consumed by the engine, plus in-memory
//! implementations used by the CLI, tests and benches.

use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::engine::EngineError;
use crate::model::*;

/// Query interface over persisted bookings.
#[async_trait]
pub trait ConflictStore: Send + Sync {
    /// Blocking bookings of `unit_id` whose impact range overlaps `range`.
    async fn find_blocking_bookings(
        &self,
        unit_id: UnitId,
        range: DateRange,
    ) -> Result<Vec<Booking>, EngineError>;

    /// Blocking bookings of `unit_id` with `impact_range.end > from`,
    /// ascending by `impact_range.end`.
    async fn find_future_blocking_bookings(
        &self,
        unit_id: UnitId,
        from: Timestamp,
    ) -> Result<Vec<Booking>, EngineError>;
}

/// Query interface over the unit catalogue.
#[async_trait]
pub trait UnitCatalogue: Send + Sync {
    async fn get_unit(&self, id: UnitId) -> Result<Option<RentalUnit>, EngineError>;

    /// Units matching `filter`, in catalogue order, at most `limit` of them.
    async fn list_units(
        &self,
        filter: &TypeFilter,
        manually_available_only: bool,
        limit: usize,
    ) -> Result<Vec<RentalUnit>, EngineError>;
}

// ── In-memory conflict store ─────────────────────────────────────

pub struct InMemoryStore {
    /// Per-unit bookings, sorted by `impact_range.start`.
    bookings: DashMap<UnitId, Vec<Booking>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            bookings: DashMap::new(),
        }
    }

    /// Index a booking under every unit it references, keeping start order.
    pub fn insert_booking(&self, booking: Booking) -> Result<(), EngineError> {
        booking.impact_range.validate()?;
        for unit_id in &booking.unit_ids {
            let mut list = self.bookings.entry(*unit_id).or_default();
            let pos = list
                .binary_search_by_key(&booking.impact_range.start, |b| b.impact_range.start)
                .unwrap_or_else(|e| e);
            list.insert(pos, booking.clone());
        }
        Ok(())
    }

    pub fn booking_count(&self, unit_id: &UnitId) -> usize {
        self.bookings.get(unit_id).map_or(0, |list| list.len())
    }

    /// Bookings whose impact range overlaps `query`, any status.
    /// Everything at index >= right_bound starts at or after `query.end`.
    fn overlapping(list: &[Booking], query: DateRange) -> impl Iterator<Item = &Booking> {
        let right_bound = list.partition_point(|b| b.impact_range.start < query.end);
        list[..right_bound]
            .iter()
            .filter(move |b| b.impact_range.end > query.start)
    }
}

#[async_trait]
impl ConflictStore for InMemoryStore {
    async fn find_blocking_bookings(
        &self,
        unit_id: UnitId,
        range: DateRange,
    ) -> Result<Vec<Booking>, EngineError> {
        let Some(list) = self.bookings.get(&unit_id) else {
            return Ok(Vec::new());
        };
        Ok(Self::overlapping(&list, range)
            .filter(|b| b.is_blocking())
            .cloned()
            .collect())
    }

    async fn find_future_blocking_bookings(
        &self,
        unit_id: UnitId,
        from: Timestamp,
    ) -> Result<Vec<Booking>, EngineError> {
        let Some(list) = self.bookings.get(&unit_id) else {
            return Ok(Vec::new());
        };
        let mut future: Vec<Booking> = list
            .iter()
            .filter(|b| b.is_blocking() && b.impact_range.end > from)
            .cloned()
            .collect();
        future.sort_by_key(|b| b.impact_range.end);
        Ok(future)
    }
}

// ── In-memory catalogue ──────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryCatalogue {
    /// Catalogue order is insertion order.
    units: Vec<RentalUnit>,
    index: HashMap<UnitId, usize>,
}

impl InMemoryCatalogue {
    pub fn new(units: impl IntoIterator<Item = RentalUnit>) -> Self {
        let mut catalogue = Self::default();
        for unit in units {
            catalogue.insert(unit);
        }
        catalogue
    }

    /// Re-inserting an id replaces the unit in place.
    pub fn insert(&mut self, unit: RentalUnit) {
        if let Some(&pos) = self.index.get(&unit.id) {
            self.units[pos] = unit;
        } else {
            self.index.insert(unit.id, self.units.len());
            self.units.push(unit);
        }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[async_trait]
impl UnitCatalogue for InMemoryCatalogue {
    async fn get_unit(&self, id: UnitId) -> Result<Option<RentalUnit>, EngineError> {
        Ok(self.index.get(&id).map(|&pos| self.units[pos].clone()))
    }

    async fn list_units(
        &self,
        filter: &TypeFilter,
        manually_available_only: bool,
        limit: usize,
    ) -> Result<Vec<RentalUnit>, EngineError> {
        Ok(self
            .units
            .iter()
            .filter(|u| !manually_available_only || u.manually_available)
            .filter(|u| filter.matches(&u.unit_type))
            .take(limit)
            .cloned()
            .collect())
    }
}
