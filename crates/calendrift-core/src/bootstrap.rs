//! First-run sample data.
//!
//! When nothing was persisted, the app fetches a JSON list of sample entries
//! once and feeds it to the store. Any failure along the way means "no
//! initial data"; none of it reaches the user.

use std::fmt;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::store::JournalStore;

/// Resource path of the bundled sample entries.
pub const SAMPLE_PATH: &str = "/sample.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The store already had entries; nothing was fetched.
    Skipped,
    Loaded(usize),
    FetchFailed,
    Malformed,
    /// The payload parsed but was not an entry list.
    Rejected,
}

/// Load sample data into an empty store. `fetch` receives `path` and is only
/// called when the store is empty.
pub fn bootstrap<F, E>(store: &mut JournalStore, path: &str, fetch: F) -> BootstrapOutcome
where
    F: FnOnce(&str) -> Result<String, E>,
    E: fmt::Display,
{
    if !store.is_empty() {
        debug!(entries = store.len(), "persisted entries present, sample fetch skipped");
        return BootstrapOutcome::Skipped;
    }
    let body = match fetch(path) {
        Ok(body) => body,
        Err(err) => {
            debug!(path, %err, "sample fetch failed");
            return BootstrapOutcome::FetchFailed;
        }
    };
    let payload: Value = match serde_json::from_str(&body) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(%err, "sample data is not JSON");
            return BootstrapOutcome::Malformed;
        }
    };
    if !store.load_initial(&payload) {
        return BootstrapOutcome::Rejected;
    }
    info!(entries = store.len(), "sample entries loaded");
    BootstrapOutcome::Loaded(store.len())
}
