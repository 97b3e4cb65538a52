//! Derived-state engine for the calendrift journal calendar.
//!
//! The engine keeps journal entries in a store with derived indexes, builds
//! month grids around an anchor month, grows an infinite window of months as
//! the viewport reaches either end, and decides which month the sticky header
//! shows. Rendering and input wiring stay outside; they feed events in and
//! read state back out.

pub mod app;
pub mod bootstrap;
pub mod config;
pub mod date;
pub mod entry;
pub mod form;
pub mod header;
pub mod index;
pub mod scroll;
pub mod storage;
pub mod store;
pub mod view;
pub mod window;

pub use app::{Calendrift, DayPreview, MonthSection};
pub use config::{CalendarConfig, ConfigError};
pub use date::{MonthGrid, MonthKey, WeekStart};
pub use entry::{EntryError, EntryId, EntryPatch, JournalEntry, RawEntry};
pub use store::JournalStore;

/// Returns the crate version at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
