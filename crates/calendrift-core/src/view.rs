//! Calendar view state: anchor month, week start, and the header month.

use chrono::NaiveDate;

use crate::date::{build_month_grid, month_name, start_of_month, MonthGrid, MonthKey, WeekStart};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarView {
    anchor: NaiveDate,
    week_start: WeekStart,
    header: MonthKey,
}

impl CalendarView {
    /// View anchored on the month containing `today`, header on that month.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            anchor: start_of_month(today),
            week_start: WeekStart::Sunday,
            header: MonthKey::of(today),
        }
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    /// Any value other than `1` selects Sunday.
    pub fn set_week_start(&mut self, raw: i64) {
        self.week_start = WeekStart::from_raw(raw);
    }

    pub fn header(&self) -> MonthKey {
        self.header
    }

    /// Record the focused month reported by the header tracker.
    pub fn set_header(&mut self, year: i32, month_index: u32) {
        self.header = MonthKey::new(year, month_index % 12);
    }

    /// e.g. `"September 2025"`.
    pub fn header_label(&self) -> String {
        format!("{} {}", month_name(self.header.month_index), self.header.year)
    }

    pub fn month_grid(&self, offset: i64) -> MonthGrid {
        build_month_grid(self.anchor, offset, self.week_start)
    }
}
