//! Scroll position persistence.
//!
//! The view saves `{ scrollOffset, year, monthIndex, timestamp }` as it
//! scrolls. On startup the offset is restored only if the recorded header
//! month is close to the current month; otherwise the view jumps to the
//! anchor month's section.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::date::MonthKey;
use crate::storage::{KeyValueStore, StorageError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollRecord {
    pub scroll_offset: f64,
    pub year: i32,
    /// 0-based month index of the header month when saved.
    pub month_index: u32,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl ScrollRecord {
    pub fn month(&self) -> MonthKey {
        MonthKey::new(self.year, self.month_index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollRestore {
    /// Scroll the container to this offset.
    Restore(f64),
    /// Scroll so the offset-0 section sits just below the header.
    JumpToCurrent,
}

pub fn save_scroll<S>(store: &mut S, key: &str, record: &ScrollRecord) -> Result<(), StorageError>
where
    S: KeyValueStore + ?Sized,
{
    store.set(key, &serde_json::to_string(record)?)
}

/// Decide where the view starts.
pub fn restore_scroll<S>(store: &S, key: &str, today: NaiveDate, tolerance_months: u32) -> ScrollRestore
where
    S: KeyValueStore + ?Sized,
{
    let json = match store.get(key) {
        Ok(Some(json)) => json,
        Ok(None) => return ScrollRestore::JumpToCurrent,
        Err(err) => {
            warn!(key, %err, "scroll record unreadable");
            return ScrollRestore::JumpToCurrent;
        }
    };
    let record: ScrollRecord = match serde_json::from_str(&json) {
        Ok(record) => record,
        Err(err) => {
            warn!(key, %err, "failed to parse saved scroll position");
            return ScrollRestore::JumpToCurrent;
        }
    };
    if !record.scroll_offset.is_finite() || record.scroll_offset < 0.0 || record.month_index > 11 {
        warn!(key, ?record, "saved scroll position out of range");
        return ScrollRestore::JumpToCurrent;
    }
    let distance = (record.month().ordinal() - MonthKey::of(today).ordinal()).abs();
    if distance <= tolerance_months as i64 {
        ScrollRestore::Restore(record.scroll_offset)
    } else {
        debug!(distance, tolerance_months, "saved scroll position is stale");
        ScrollRestore::JumpToCurrent
    }
}

/// Remove a scroll record written under an obsolete key. Returns whether one
/// was present.
pub fn purge_legacy<S>(store: &mut S, key: &str) -> bool
where
    S: KeyValueStore + ?Sized,
{
    match store.get(key) {
        Ok(Some(_)) => match store.remove(key) {
            Ok(()) => {
                debug!(key, "legacy scroll record removed");
                true
            }
            Err(err) => {
                warn!(key, %err, "legacy scroll record could not be removed");
                false
            }
        },
        Ok(None) => false,
        Err(err) => {
            warn!(key, %err, "legacy scroll record unreadable");
            false
        }
    }
}

/// Scroll offset that puts a section starting at `section_top` just under a
/// fixed header of `header_height`, leaving `gap` pixels.
pub fn fallback_scroll_top(section_top: f64, header_height: f64, gap: f64) -> f64 {
    (section_top - header_height - gap).max(0.0)
}

/// Rate limit for scroll saves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveThrottle {
    interval_ms: i64,
    last_saved: Option<i64>,
}

impl SaveThrottle {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.min(i64::MAX as u64) as i64,
            last_saved: None,
        }
    }

    /// Whether a save at `now_ms` is due. A `true` answer counts as a save.
    pub fn should_save(&mut self, now_ms: i64) -> bool {
        let due = match self.last_saved {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms || now_ms < last,
        };
        if due {
            self.last_saved = Some(now_ms);
        }
        due
    }
}
