use crate::model::*;

use super::Calendar;

// ── Availability Algorithm ────────────────────────────────────────

/// Project blocking bookings into the conflicts reported to callers.
pub fn project_conflicts(blocking: &[Booking]) -> Vec<BookingConflict> {
    blocking.iter().map(BookingConflict::from).collect()
}

/// Earliest date the unit is reported free again, given every blocking
/// booking that ends after the requested window.
///
/// Only the single latest end is considered, rounded up to the start of the
/// following month. Gaps between non-contiguous bookings are not searched.
///
/// - no future bookings: free from the start of the day the window ends
/// - latest end beyond `max_search_date`: `None` (nothing within the horizon)
pub fn next_available_after(
    calendar: &Calendar,
    future_blocking: &[Booking],
    requested_end: Timestamp,
    max_search_date: Timestamp,
) -> Option<Timestamp> {
    match latest_end(future_blocking.iter().map(|b| &b.impact_range)) {
        None => Some(calendar.start_of_day(requested_end)),
        Some(latest) if latest > max_search_date => None,
        Some(latest) => Some(calendar.start_of_next_month(latest)),
    }
}
