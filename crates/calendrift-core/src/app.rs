//! The composition root.
//!
//! [`Calendrift`] wires the entry store, view state, month window and header
//! tracker to a [`KeyValueStore`]. Data flows one way: viewport events update
//! the window and the header focus, the focus is written into the view, and
//! entry mutations rebuild the index and are persisted.

use std::fmt;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::bootstrap::{bootstrap, BootstrapOutcome};
use crate::config::CalendarConfig;
use crate::date::{day_key, is_today_at, MonthGrid, MonthKey};
use crate::entry::{EntryError, EntryId, EntryPatch, JournalEntry, RawEntry};
use crate::form::{EntryForm, SubmitError};
use crate::header::{HeaderTracker, Registration, VisibilityReport};
use crate::scroll::{
    fallback_scroll_top, purge_legacy, restore_scroll, save_scroll, SaveThrottle, ScrollRecord,
    ScrollRestore,
};
use crate::storage::{load_entries, save_entries, KeyValueStore, StorageError};
use crate::store::{JournalStore, ModalCommand};
use crate::view::CalendarView;
use crate::window::{InfiniteWindow, SentinelSignal};

/// Chips shown in a day cell before the rest collapse into "+N more".
pub const MAX_CHIPS: usize = 3;

/// One materialized month section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSection {
    pub offset: i64,
    pub key: MonthKey,
    pub grid: MonthGrid,
}

/// Render data for one grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct DayPreview<'a> {
    pub date: NaiveDate,
    pub day_key: String,
    pub in_month: bool,
    pub is_today: bool,
    pub chips: Vec<&'a JournalEntry>,
    /// Entries on this day beyond the chips.
    pub more: usize,
}

impl DayPreview<'_> {
    pub fn total(&self) -> usize {
        self.chips.len() + self.more
    }
}

pub struct Calendrift<S> {
    config: CalendarConfig,
    storage: S,
    journal: JournalStore,
    view: CalendarView,
    window: InfiniteWindow,
    header: HeaderTracker,
    throttle: SaveThrottle,
}

impl<S> fmt::Debug for Calendrift<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Calendrift")
            .field("entries", &self.journal.len())
            .field("window", &self.window)
            .field("header", &self.view.header())
            .finish()
    }
}

impl<S: KeyValueStore> Calendrift<S> {
    /// Start a session: drop the legacy scroll record and load persisted
    /// entries.
    pub fn open(mut storage: S, config: CalendarConfig, today: NaiveDate) -> Self {
        purge_legacy(&mut storage, &config.legacy_scroll_key);
        let mut journal = JournalStore::new();
        let archived = load_entries(&storage, &config.journal_key);
        if !archived.is_empty() {
            journal.load_entries(archived);
        }
        let mut view = CalendarView::new(today);
        view.set_week_start(config.week_start);
        debug!(entries = journal.len(), %today, "session opened");
        Self {
            window: InfiniteWindow::new(config.window_radius, config.window_step),
            throttle: SaveThrottle::new(config.scroll_save_interval_ms),
            header: HeaderTracker::new(),
            config,
            storage,
            journal,
            view,
        }
    }

    /// Fill an empty store with sample data fetched from the configured
    /// sample path. Persists what was loaded.
    pub fn bootstrap<F, E>(&mut self, fetch: F) -> BootstrapOutcome
    where
        F: FnOnce(&str) -> Result<String, E>,
        E: fmt::Display,
    {
        let outcome = bootstrap(&mut self.journal, &self.config.sample_path, fetch);
        if let BootstrapOutcome::Loaded(_) = outcome {
            self.persist_entries();
        }
        outcome
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &CalendarConfig {
        &self.config
    }

    pub fn journal(&self) -> &JournalStore {
        &self.journal
    }

    pub fn view(&self) -> &CalendarView {
        &self.view
    }

    pub fn window(&self) -> &InfiniteWindow {
        &self.window
    }

    pub fn header_tracker(&self) -> &HeaderTracker {
        &self.header
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    // ── Entries ───────────────────────────────────────────────────────────

    /// Write the entry list to storage.
    pub fn save(&mut self) -> Result<(), StorageError> {
        save_entries(&mut self.storage, &self.config.journal_key, self.journal.entries())
    }

    fn persist_entries(&mut self) {
        if let Err(err) = self.save() {
            warn!(%err, "entry archive not saved");
        }
    }

    pub fn add_entry(&mut self, raw: RawEntry) -> Result<EntryId, EntryError> {
        let id = self.journal.add(raw)?;
        self.persist_entries();
        Ok(id)
    }

    pub fn edit_entry(&mut self, id: &str, patch: EntryPatch) -> Result<bool, EntryError> {
        let changed = self.journal.edit(id, patch)?;
        if changed {
            self.persist_entries();
        }
        Ok(changed)
    }

    pub fn delete_entry(&mut self, id: &str) -> bool {
        let removed = self.journal.delete(id);
        if removed {
            self.persist_entries();
        }
        removed
    }

    /// Add the entry described by `form` and clear the form. On error the
    /// form keeps what was typed.
    pub fn submit_form(&mut self, form: &mut EntryForm) -> Result<EntryId, SubmitError> {
        let raw = form.submit()?;
        let id = self.add_entry(raw)?;
        form.reset();
        Ok(id)
    }

    // ── Modal ─────────────────────────────────────────────────────────────

    pub fn open_entry(&mut self, id: &str) -> bool {
        self.journal.open_by_id(id)
    }

    pub fn modal_command(&mut self, command: ModalCommand) {
        self.journal.apply_modal_command(command);
    }

    pub fn set_active_index(&mut self, i: i64) {
        self.journal.set_active_index(i);
    }

    // ── Viewport ──────────────────────────────────────────────────────────

    pub fn set_week_start(&mut self, raw: i64) {
        self.view.set_week_start(raw);
    }

    pub fn on_sentinels(&mut self, signals: &[SentinelSignal]) -> bool {
        self.window.apply_signals(signals)
    }

    /// Start tracking the section rendered for `offset`.
    pub fn mount_section<F>(&mut self, offset: i64, height: F) -> Registration
    where
        F: Fn() -> f64 + 'static,
    {
        let key = self.view.month_grid(offset).key();
        self.header.register(key, height)
    }

    pub fn unmount_section(&mut self, registration: Registration) {
        self.header.unregister(registration);
    }

    /// Apply a batch of visibility reports and move the header to the
    /// winning month.
    pub fn on_visibility(&mut self, batch: &[VisibilityReport]) -> Option<MonthKey> {
        let focus = self.header.apply_batch(batch)?;
        self.view.set_header(focus.year, focus.month_index);
        Some(focus)
    }

    pub fn sections(&self) -> impl Iterator<Item = MonthSection> + '_ {
        self.window.offsets().map(move |offset| {
            let grid = self.view.month_grid(offset);
            MonthSection {
                offset,
                key: grid.key(),
                grid,
            }
        })
    }

    /// Cell previews for `grid`, in cell order.
    pub fn day_previews(&self, grid: &MonthGrid, today: NaiveDate) -> Vec<DayPreview<'_>> {
        grid.cells
            .iter()
            .map(|&date| {
                let key = day_key(date);
                let mut on_day = self.journal.entries_on(&key);
                let chips: Vec<_> = on_day.by_ref().take(MAX_CHIPS).collect();
                DayPreview {
                    date,
                    in_month: grid.in_month(date),
                    is_today: is_today_at(date, today),
                    chips,
                    more: on_day.count(),
                    day_key: key,
                }
            })
            .collect()
    }

    // ── Scroll ────────────────────────────────────────────────────────────

    /// Persist the scroll offset with the current header month, subject to
    /// the save interval. Returns whether a record was written.
    pub fn record_scroll(&mut self, scroll_offset: f64, now_ms: i64) -> bool {
        if !self.throttle.should_save(now_ms) {
            return false;
        }
        let header = self.view.header();
        let record = ScrollRecord {
            scroll_offset,
            year: header.year,
            month_index: header.month_index,
            timestamp: now_ms,
        };
        match save_scroll(&mut self.storage, &self.config.scroll_key, &record) {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, "scroll position not saved");
                false
            }
        }
    }

    pub fn initial_scroll(&self, today: NaiveDate) -> ScrollRestore {
        restore_scroll(
            &self.storage,
            &self.config.scroll_key,
            today,
            self.config.restore_tolerance_months,
        )
    }

    /// Offset for [`ScrollRestore::JumpToCurrent`], given where the anchor
    /// section starts in the scroll container.
    pub fn current_month_scroll_top(&self, section_top: f64) -> f64 {
        fallback_scroll_top(section_top, self.config.header_height, self.config.header_gap)
    }
}
