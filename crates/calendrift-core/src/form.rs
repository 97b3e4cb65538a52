//! Add-entry form contract.
//!
//! The form keeps what the user typed as strings. Validation produces
//! per-field messages that block submission; a valid form converts into a
//! [`RawEntry`] for the store.

use calendrift_util::split_categories;
use thiserror::Error;

use crate::date::parse_strict_ddmmyyyy;
use crate::entry::{EntryError, RawEntry};

pub const RATING_ERROR: &str = "Rating must be 0–5.";
pub const DATE_ERROR: &str = "Use DD/MM/YYYY (valid calendar date).";
pub const DESCRIPTION_ERROR: &str = "Description is required.";

const DEFAULT_RATING: &str = "4.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryForm {
    pub img_url: String,
    pub rating: String,
    /// Comma-separated.
    pub categories: String,
    /// `DD/MM/YYYY`.
    pub date: String,
    pub description: String,
}

impl Default for EntryForm {
    fn default() -> Self {
        Self {
            img_url: String::new(),
            rating: DEFAULT_RATING.to_string(),
            categories: String::new(),
            date: String::new(),
            description: String::new(),
        }
    }
}

/// Field-level validation state. Empty when the form can be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("entry form has invalid fields")]
pub struct FormErrors {
    pub rating: Option<&'static str>,
    pub date: Option<&'static str>,
    pub description: Option<&'static str>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.rating.is_none() && self.date.is_none() && self.description.is_none()
    }

    /// `(field, message)` pairs for the fields in error.
    pub fn messages(&self) -> Vec<(&'static str, &'static str)> {
        [
            ("rating", self.rating),
            ("date", self.date),
            ("description", self.description),
        ]
        .into_iter()
        .filter_map(|(field, msg)| msg.map(|m| (field, m)))
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] FormErrors),
    #[error(transparent)]
    Entry(#[from] EntryError),
}

/// An empty field is invalid, not zero.
fn parse_rating(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite() && (0.0..=5.0).contains(r))
}

impl EntryForm {
    pub fn validate(&self) -> FormErrors {
        FormErrors {
            rating: parse_rating(&self.rating).is_none().then_some(RATING_ERROR),
            date: parse_strict_ddmmyyyy(&self.date).is_none().then_some(DATE_ERROR),
            description: self.description.trim().is_empty().then_some(DESCRIPTION_ERROR),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Convert a valid form into an entry without an id.
    pub fn submit(&self) -> Result<RawEntry, FormErrors> {
        let errors = self.validate();
        let Some(rating) = parse_rating(&self.rating).filter(|_| errors.is_empty()) else {
            return Err(errors);
        };
        Ok(RawEntry {
            id: None,
            img_url: self.img_url.trim().to_string(),
            rating,
            categories: split_categories(&self.categories),
            date: self.date.trim().to_string(),
            description: self.description.trim().to_string(),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
