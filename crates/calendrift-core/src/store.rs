//! Journal entry store and modal cursor.
//!
//! Mutations go through a pure reducer over the entry list, then the
//! [`DerivedIndex`] is rebuilt from the result. Entries and index are swapped
//! in together, so a reader holding `&JournalStore` always sees a matching
//! pair.

use std::collections::HashSet;

use calendrift_util::IdGenerator;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::date::{day_key, parse_entry_date};
use crate::entry::{EntryError, EntryId, EntryPatch, JournalEntry, RawEntry};
use crate::index::DerivedIndex;

#[derive(Debug, Clone, PartialEq)]
pub enum EntryAction {
    Replace(Vec<JournalEntry>),
    Add(JournalEntry),
    Edit { id: EntryId, patch: EntryPatch },
    Delete(EntryId),
}

/// Apply `action` to `entries`, returning the next entry list.
pub fn reduce(entries: &[JournalEntry], action: EntryAction) -> Vec<JournalEntry> {
    match action {
        EntryAction::Replace(next) => next,
        EntryAction::Add(entry) => {
            let mut next = Vec::with_capacity(entries.len() + 1);
            next.extend_from_slice(entries);
            next.push(entry);
            next
        }
        EntryAction::Edit { id, patch } => entries
            .iter()
            .cloned()
            .map(|mut e| {
                if e.id == id {
                    patch.apply_to(&mut e);
                }
                e
            })
            .collect(),
        EntryAction::Delete(id) => entries.iter().filter(|e| e.id != id).cloned().collect(),
    }
}

/// Navigation requests from the entry modal's keyboard and swipe wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalCommand {
    Close,
    Prev,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    Left,
    Right,
}

impl ModalCommand {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Escape" => Some(ModalCommand::Close),
            "ArrowLeft" => Some(ModalCommand::Prev),
            "ArrowRight" => Some(ModalCommand::Next),
            _ => None,
        }
    }

    /// Swiping left reveals the next entry.
    pub fn from_swipe(swipe: Swipe) -> Self {
        match swipe {
            Swipe::Left => ModalCommand::Next,
            Swipe::Right => ModalCommand::Prev,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModalCursor {
    pub open: bool,
    pub active: usize,
}

#[derive(Debug)]
pub struct JournalStore {
    entries: Vec<JournalEntry>,
    index: DerivedIndex,
    modal: ModalCursor,
    ids: IdGenerator,
}

impl Default for JournalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl JournalStore {
    pub fn new() -> Self {
        Self::with_id_generator(IdGenerator::new())
    }

    pub fn with_id_generator(ids: IdGenerator) -> Self {
        Self {
            entries: Vec::new(),
            index: DerivedIndex::default(),
            modal: ModalCursor::default(),
            ids,
        }
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    /// Entries in insertion order.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn index(&self) -> &DerivedIndex {
        &self.index
    }

    /// Entries in chronological order.
    pub fn sorted(&self) -> &[JournalEntry] {
        self.index.sorted()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&JournalEntry> {
        self.index.position_of(id).and_then(|pos| self.index.get(pos))
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.index.position_of(id)
    }

    pub fn entries_on(&self, day_key: &str) -> impl Iterator<Item = &JournalEntry> + '_ {
        self.index.on_day(day_key)
    }

    pub fn entries_on_date(&self, date: NaiveDate) -> Vec<&JournalEntry> {
        self.index.on_day(&day_key(date)).collect()
    }

    // ── Mutations ─────────────────────────────────────────────────────────

    fn commit(&mut self, action: EntryAction) {
        let next = reduce(&self.entries, action);
        let index = DerivedIndex::build(&next);
        self.entries = next;
        self.index = index;
        self.modal.active = clamp_index(self.modal.active as i64, self.index.len());
    }

    /// Replace the entry set with a JSON payload, but only when the store is
    /// empty and the payload is an array. Elements that do not decode or
    /// whose date does not resolve are dropped.
    pub fn load_initial(&mut self, payload: &Value) -> bool {
        if !self.is_empty() {
            debug!(entries = self.len(), "initial load skipped, store not empty");
            return false;
        }
        let Value::Array(items) = payload else {
            warn!("initial payload is not an array, ignoring");
            return false;
        };
        let raws = items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| match RawEntry::deserialize(item) {
                Ok(raw) => Some(raw),
                Err(err) => {
                    warn!(index = i, %err, "skipping malformed initial entry");
                    None
                }
            })
            .collect();
        self.load_entries(raws)
    }

    /// Typed variant of [`JournalStore::load_initial`].
    pub fn load_entries(&mut self, raws: Vec<RawEntry>) -> bool {
        if !self.is_empty() {
            debug!(entries = self.len(), "entry load skipped, store not empty");
            return false;
        }
        let mut seen = HashSet::with_capacity(raws.len());
        let mut next = Vec::with_capacity(raws.len());
        for mut raw in raws {
            if parse_entry_date(&raw.date).is_none() {
                warn!(date = %raw.date, "skipping entry with unresolvable date");
                continue;
            }
            let id = match raw.id.take() {
                Some(id) if !seen.contains(&id) => id,
                Some(id) => {
                    warn!(%id, "duplicate entry id, assigning a fresh one");
                    self.fresh_id(&seen)
                }
                None => self.fresh_id(&seen),
            };
            seen.insert(id.clone());
            next.push(JournalEntry::from_raw(id, raw));
        }
        debug!(entries = next.len(), "entry set loaded");
        self.commit(EntryAction::Replace(next));
        true
    }

    fn fresh_id(&mut self, taken: &HashSet<EntryId>) -> EntryId {
        loop {
            let id = EntryId::new(self.ids.next_id());
            if !taken.contains(&id) && self.index.position_of(id.as_str()).is_none() {
                return id;
            }
        }
    }

    /// Append an entry, generating its id if absent.
    pub fn add(&mut self, mut raw: RawEntry) -> Result<EntryId, EntryError> {
        if parse_entry_date(&raw.date).is_none() {
            return Err(EntryError::UnresolvableDate(raw.date));
        }
        let id = match raw.id.take() {
            Some(id) if self.index.position_of(id.as_str()).is_some() => {
                return Err(EntryError::DuplicateId(id));
            }
            Some(id) => id,
            None => self.fresh_id(&HashSet::new()),
        };
        self.commit(EntryAction::Add(JournalEntry::from_raw(id.clone(), raw)));
        Ok(id)
    }

    /// Merge `patch` into the entry with `id`. `Ok(false)` when no entry has
    /// that id. A patch that would leave the entry without a calendar date is
    /// rejected and the store is left as it was.
    pub fn edit(&mut self, id: &str, patch: EntryPatch) -> Result<bool, EntryError> {
        let Some(current) = self.get(id) else {
            debug!(id, "edit of unknown entry ignored");
            return Ok(false);
        };
        if let Some(date) = &patch.date {
            if parse_entry_date(date).is_none() {
                return Err(EntryError::UnresolvableDate(date.clone()));
            }
        }
        let id = current.id.clone();
        self.commit(EntryAction::Edit { id, patch });
        Ok(true)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let Some(current) = self.get(id) else {
            debug!(id, "delete of unknown entry ignored");
            return false;
        };
        let id = current.id.clone();
        self.commit(EntryAction::Delete(id));
        true
    }

    // ── Modal cursor ──────────────────────────────────────────────────────

    pub fn modal(&self) -> ModalCursor {
        self.modal
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal.open
    }

    pub fn active_index(&self) -> usize {
        self.modal.active
    }

    /// Entry under the cursor while the modal is open.
    pub fn active_entry(&self) -> Option<&JournalEntry> {
        if !self.modal.open {
            return None;
        }
        self.index.get(self.modal.active)
    }

    pub fn open_by_id(&mut self, id: &str) -> bool {
        match self.index.position_of(id) {
            Some(pos) => {
                self.modal = ModalCursor {
                    open: true,
                    active: pos,
                };
                true
            }
            None => false,
        }
    }

    pub fn close(&mut self) {
        self.modal.open = false;
    }

    pub fn prev(&mut self) {
        self.modal.active = self.modal.active.saturating_sub(1);
    }

    pub fn next(&mut self) {
        let last = self.index.len().saturating_sub(1);
        self.modal.active = (self.modal.active + 1).min(last);
    }

    pub fn set_active_index(&mut self, i: i64) {
        self.modal.active = clamp_index(i, self.index.len());
    }

    pub fn apply_modal_command(&mut self, command: ModalCommand) {
        match command {
            ModalCommand::Close => self.close(),
            ModalCommand::Prev => self.prev(),
            ModalCommand::Next => self.next(),
        }
    }

    /// One-based counter shown in the modal footer, e.g. `"3 / 12"`.
    pub fn position_label(&self) -> String {
        let len = self.index.len();
        format!("{} / {}", (self.modal.active + 1).min(len), len)
    }
}

fn clamp_index(i: i64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    i.clamp(0, len as i64 - 1) as usize
}
