use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};

use crate::model::Timestamp;

/// Day and month boundaries, evaluated in a fixed offset from UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    offset: FixedOffset,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl Calendar {
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// `None` if the offset is outside ±24h.
    pub fn with_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(|offset| Self { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// First instant of the calendar month after `t`'s month.
    /// A month start rounds up to the *following* month.
    pub fn start_of_next_month(&self, t: Timestamp) -> Timestamp {
        let local = t.with_timezone(&self.offset);
        let (year, month) = if local.month() == 12 {
            (local.year() + 1, 1)
        } else {
            (local.year(), local.month() + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|date| self.local_midnight(date))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Midnight at the start of `t`'s day.
    pub fn start_of_day(&self, t: Timestamp) -> Timestamp {
        let local = t.with_timezone(&self.offset);
        self.local_midnight(local.date_naive()).unwrap_or(t)
    }

    fn local_midnight(&self, date: NaiveDate) -> Option<Timestamp> {
        self.offset
            .from_local_datetime(&date.and_time(NaiveTime::MIN))
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
