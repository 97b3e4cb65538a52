//! Calendar date utilities.
//!
//! Everything here is a pure function over [`NaiveDate`]. A `NaiveDate` has no
//! time-of-day and no zone, so date-only arithmetic cannot be shifted by a
//! daylight-saving transition.
//!
//! Keys:
//! - day key: `"{year}-{month1}-{day}"`, no zero padding, joins grid cells to
//!   journal entries;
//! - month key: `"{year}-{month1}"`, identifies a month section.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Local, NaiveDate};
use thiserror::Error;

/// Number of cells in a month grid (6 rows × 7 columns).
pub const GRID_CELLS: usize = 42;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS_FROM_SUNDAY: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// First day of the week shown in a month grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// `1` selects Monday; any other value falls back to Sunday.
    pub fn from_raw(raw: i64) -> Self {
        if raw == 1 {
            WeekStart::Monday
        } else {
            WeekStart::Sunday
        }
    }

    pub fn as_raw(self) -> u8 {
        match self {
            WeekStart::Sunday => 0,
            WeekStart::Monday => 1,
        }
    }
}

/// Calendar month identity, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    /// 0-based month index (January = 0).
    pub month_index: u32,
}

impl MonthKey {
    pub fn new(year: i32, month_index: u32) -> Self {
        Self { year, month_index }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month_index: date.month0(),
        }
    }

    /// Months since year 0, used for distance comparisons.
    pub fn ordinal(self) -> i64 {
        self.year as i64 * 12 + self.month_index as i64
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.month_index + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid month key: {0:?}")]
pub struct ParseMonthKeyError(pub String);

impl FromStr for MonthKey {
    type Err = ParseMonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMonthKeyError(s.to_string());
        // Split on the last '-' so negative years survive.
        let (year, month) = s.rsplit_once('-').ok_or_else(err)?;
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        if !(1..=12).contains(&month) {
            return Err(err());
        }
        Ok(MonthKey::new(year, month - 1))
    }
}

/// A 42-day month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    /// 0-based month index of the target month.
    pub month_index: u32,
    pub first_of_month: NaiveDate,
    pub cells: [NaiveDate; GRID_CELLS],
}

impl MonthGrid {
    pub fn key(&self) -> MonthKey {
        MonthKey::new(self.year, self.month_index)
    }

    /// Whether a cell belongs to the target month (cells outside it are
    /// de-emphasized by the renderer).
    pub fn in_month(&self, date: NaiveDate) -> bool {
        is_same_month(date, self.first_of_month)
    }

    /// Cells grouped into the six display rows.
    pub fn rows(&self) -> impl Iterator<Item = &[NaiveDate]> {
        self.cells.chunks(7)
    }
}

fn first_of(year: i64, month0: i64) -> NaiveDate {
    let total = year.saturating_mul(12).saturating_add(month0);
    let y = total.div_euclid(12);
    let m = total.rem_euclid(12) as u32 + 1;
    i32::try_from(y)
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, m, 1))
        .unwrap_or(if y < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Month arithmetic with year rollover. The result is always the 1st.
pub fn add_months(date: NaiveDate, n: i64) -> NaiveDate {
    first_of(date.year() as i64, (date.month0() as i64).saturating_add(n))
}

/// Calendar-day arithmetic. Saturates at the representable range.
pub fn add_days(date: NaiveDate, n: i64) -> NaiveDate {
    let shifted = if n >= 0 {
        date.checked_add_days(Days::new(n as u64))
    } else {
        date.checked_sub_days(Days::new(n.unsigned_abs()))
    };
    shifted.unwrap_or(if n >= 0 { NaiveDate::MAX } else { NaiveDate::MIN })
}

/// First day of the week containing `date`.
pub fn start_of_week(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    let weekday = date.weekday().num_days_from_sunday() as i64;
    let diff = match week_start {
        WeekStart::Sunday => weekday,
        WeekStart::Monday => (weekday + 6) % 7,
    };
    add_days(date, -diff)
}

pub fn is_same_day(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

pub fn is_same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Local wall-clock date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn is_today(date: NaiveDate) -> bool {
    is_today_at(date, today())
}

pub fn is_today_at(date: NaiveDate, today: NaiveDate) -> bool {
    is_same_day(date, today)
}

pub fn day_key(date: NaiveDate) -> String {
    format!("{}-{}-{}", date.year(), date.month(), date.day())
}

pub fn month_key(date: NaiveDate) -> String {
    MonthKey::of(date).to_string()
}

pub fn month_name(month_index: u32) -> &'static str {
    MONTH_NAMES[(month_index % 12) as usize]
}

/// Column headers for a grid with the given week start.
pub fn weekday_labels(week_start: WeekStart) -> [&'static str; 7] {
    let shift = week_start.as_raw() as usize;
    std::array::from_fn(|i| WEEKDAYS_FROM_SUNDAY[(i + shift) % 7])
}

/// Strict `DD/MM/YYYY` parser.
///
/// Exactly two day digits, two month digits and four year digits separated by
/// `/`; surrounding whitespace is ignored. Impossible dates such as
/// `31/02/2024` or `00/01/2020` are rejected instead of being rolled over.
pub fn parse_strict_ddmmyyyy(input: &str) -> Option<NaiveDate> {
    let s = input.trim().as_bytes();
    if s.len() != 10 || s[2] != b'/' || s[5] != b'/' {
        return None;
    }
    let digits = |range: std::ops::Range<usize>| -> Option<u32> {
        s[range].iter().try_fold(0u32, |acc, &b| {
            b.is_ascii_digit().then(|| acc * 10 + (b - b'0') as u32)
        })
    };
    let day = digits(0..2)?;
    let month = digits(3..5)?;
    let year = digits(6..10)?;
    NaiveDate::from_ymd_opt(year as i32, month, day)
}

/// Resolve the `date` field of a stored entry.
///
/// Accepts `D/M/Y` with any integer components and normalizes overflow the
/// way a calendar constructor does, so `31/02/2024` lands on 2 March 2024 and
/// `0/1/2020` on 31 December 2019. Returns `None` unless there are exactly
/// three integer components.
pub fn parse_entry_date(input: &str) -> Option<NaiveDate> {
    let mut parts = input.trim().split('/');
    let mut next = || parts.next().and_then(|p| p.trim().parse::<i64>().ok());
    let day = next()?;
    let month = next()?;
    let year = next()?;
    if parts.next().is_some() {
        return None;
    }
    if !(NaiveDate::MIN.year() as i64..=NaiveDate::MAX.year() as i64).contains(&year) {
        return None;
    }
    let first = first_of(year, month.checked_sub(1)?);
    Some(add_days(first, day.checked_sub(1)?))
}

/// Format a date as `DD/MM/YYYY`.
pub fn format_ddmmyyyy(date: NaiveDate) -> String {
    format!("{:02}/{:02}/{:04}", date.day(), date.month(), date.year())
}

/// Grid for the month `offset` months away from `anchor`: 42 consecutive days
/// starting at the week start on or before the 1st of that month.
pub fn build_month_grid(anchor: NaiveDate, offset: i64, week_start: WeekStart) -> MonthGrid {
    let first_of_month = add_months(anchor, offset);
    let grid_start = start_of_week(first_of_month, week_start);
    MonthGrid {
        year: first_of_month.year(),
        month_index: first_of_month.month0(),
        first_of_month,
        cells: std::array::from_fn(|i| add_days(grid_start, i as i64)),
    }
}
