//! Derived entry indexes.
//!
//! A [`DerivedIndex`] is rebuilt from the full entry list after every
//! mutation and never patched in place. Building is O(n log n).

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use tracing::warn;

use crate::date::{day_key, parse_entry_date};
use crate::entry::{EntryId, JournalEntry};

/// Read-only views over one entry list.
///
/// Invariants, for the list it was built from:
/// - `sorted` holds every entry once, ascending by resolved date, with input
///   order kept among entries on the same date;
/// - `by_day[k]` lists the `sorted` positions of entries on day `k`, ascending;
/// - `sorted[index_by_id[id]].id() == id` for every id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedIndex {
    sorted: Vec<JournalEntry>,
    dates: Vec<Option<NaiveDate>>,
    by_day: BTreeMap<String, Vec<usize>>,
    index_by_id: HashMap<EntryId, usize>,
}

impl DerivedIndex {
    pub fn build(entries: &[JournalEntry]) -> Self {
        let mut keyed: Vec<(Option<NaiveDate>, &JournalEntry)> = entries
            .iter()
            .map(|e| (parse_entry_date(&e.date), e))
            .collect();
        // `sort_by_key` is stable. Unresolvable dates sort last and get no bucket.
        keyed.sort_by_key(|(date, _)| (date.is_none(), *date));

        let mut sorted = Vec::with_capacity(keyed.len());
        let mut dates = Vec::with_capacity(keyed.len());
        let mut by_day: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut index_by_id = HashMap::with_capacity(keyed.len());

        for (pos, (date, entry)) in keyed.into_iter().enumerate() {
            match date {
                Some(date) => by_day.entry(day_key(date)).or_default().push(pos),
                None => warn!(id = %entry.id(), date = %entry.date, "entry date does not resolve"),
            }
            index_by_id.insert(entry.id().clone(), pos);
            sorted.push(entry.clone());
            dates.push(date);
        }

        Self {
            sorted,
            dates,
            by_day,
            index_by_id,
        }
    }

    pub fn sorted(&self) -> &[JournalEntry] {
        &self.sorted
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    pub fn get(&self, pos: usize) -> Option<&JournalEntry> {
        self.sorted.get(pos)
    }

    /// Resolved calendar date of the entry at `pos` in `sorted`.
    pub fn date_at(&self, pos: usize) -> Option<NaiveDate> {
        self.dates.get(pos).copied().flatten()
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    /// Entries on the day identified by `key`, in chronological-list order.
    pub fn on_day<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a JournalEntry> + 'a {
        self.by_day
            .get(key)
            .into_iter()
            .flatten()
            .map(move |&pos| &self.sorted[pos])
    }

    pub fn day_count(&self, key: &str) -> usize {
        self.by_day.get(key).map_or(0, Vec::len)
    }

    /// All day keys that have at least one entry, with their `sorted` positions.
    pub fn buckets(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.by_day.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}
