//! Journal entry records.
//!
//! [`JournalEntry`] is what the store holds and what gets persisted.
//! [`RawEntry`] is the shape accepted from outside (sample data, the add
//! form, old archives) where the id may still be missing. [`EntryPatch`] is a
//! partial update; it has no id field because ids never change.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for EntryId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub(crate) id: EntryId,
    #[serde(default)]
    pub img_url: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub categories: Vec<String>,
    /// `DD/MM/YYYY` as authored.
    pub date: String,
    #[serde(default)]
    pub description: String,
}

impl JournalEntry {
    pub fn id(&self) -> &EntryId {
        &self.id
    }

    /// Short label for a calendar chip: rating and first category.
    pub fn chip_label(&self) -> String {
        let category = self
            .categories
            .first()
            .map(String::as_str)
            .unwrap_or("Journal");
        format!("{} • {}", self.rating, category)
    }

    pub(crate) fn from_raw(id: EntryId, raw: RawEntry) -> Self {
        Self {
            id,
            img_url: raw.img_url,
            rating: raw.rating,
            categories: raw.categories,
            date: raw.date,
            description: raw.description,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntryId>,
    #[serde(default)]
    pub img_url: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
}

impl From<JournalEntry> for RawEntry {
    fn from(entry: JournalEntry) -> Self {
        Self {
            id: Some(entry.id),
            img_url: entry.img_url,
            rating: entry.rating,
            categories: entry.categories,
            date: entry.date,
            description: entry.description,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.img_url.is_none()
            && self.rating.is_none()
            && self.categories.is_none()
            && self.date.is_none()
            && self.description.is_none()
    }

    /// Merge the present fields into `entry`. The id is left alone.
    pub fn apply_to(&self, entry: &mut JournalEntry) {
        if let Some(img_url) = &self.img_url {
            entry.img_url = img_url.clone();
        }
        if let Some(rating) = self.rating {
            entry.rating = rating;
        }
        if let Some(categories) = &self.categories {
            entry.categories = categories.clone();
        }
        if let Some(date) = &self.date {
            entry.date = date.clone();
        }
        if let Some(description) = &self.description {
            entry.description = description.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntryError {
    #[error("entry date {0:?} does not name a calendar day")]
    UnresolvableDate(String),
    #[error("entry id {0} is already in use")]
    DuplicateId(EntryId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_entry_reads_sample_shape() {
        let raw: RawEntry = serde_json::from_value(json!({
            "imgUrl": "https://example.com/a.jpg",
            "rating": 4.5,
            "categories": ["food", "travel"],
            "date": "03/09/2025",
            "description": "Lunch by the sea"
        }))
        .unwrap();
        assert_eq!(raw.id, None);
        assert_eq!(raw.img_url, "https://example.com/a.jpg");
        assert_eq!(raw.categories, vec!["food", "travel"]);
    }

    #[test]
    fn raw_entry_defaults_missing_fields() {
        let raw: RawEntry = serde_json::from_value(json!({ "id": "x1", "date": "1/1/2024" })).unwrap();
        assert_eq!(raw.id, Some(EntryId::from("x1")));
        assert_eq!(raw.rating, 0.0);
        assert!(raw.categories.is_empty());
        assert!(raw.img_url.is_empty());
    }

    #[test]
    fn journal_entry_serializes_camel_case() {
        let entry = JournalEntry::from_raw(
            EntryId::from("e1"),
            RawEntry {
                img_url: "u".into(),
                rating: 3.0,
                date: "01/02/2024".into(),
                ..RawEntry::default()
            },
        );
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["id"], "e1");
        assert_eq!(value["imgUrl"], "u");
        assert_eq!(value["date"], "01/02/2024");
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut entry = JournalEntry::from_raw(
            EntryId::from("e1"),
            RawEntry {
                rating: 2.0,
                categories: vec!["a".into()],
                date: "01/02/2024".into(),
                description: "before".into(),
                ..RawEntry::default()
            },
        );
        let patch = EntryPatch {
            description: Some("after".into()),
            rating: Some(4.0),
            ..EntryPatch::default()
        };
        assert!(!patch.is_empty());
        patch.apply_to(&mut entry);
        assert_eq!(entry.description, "after");
        assert_eq!(entry.rating, 4.0);
        assert_eq!(entry.categories, vec!["a"]);
        assert_eq!(entry.id().as_str(), "e1");
    }

    #[test]
    fn chip_label_falls_back_to_journal() {
        let mut entry = JournalEntry::from_raw(
            EntryId::from("e1"),
            RawEntry {
                rating: 4.5,
                date: "01/02/2024".into(),
                ..RawEntry::default()
            },
        );
        assert_eq!(entry.chip_label(), "4.5 • Journal");
        entry.categories = vec!["hike".into(), "sun".into()];
        entry.rating = 4.0;
        assert_eq!(entry.chip_label(), "4 • hike");
    }
}
