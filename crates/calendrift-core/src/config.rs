//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object is a complete config.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bootstrap::SAMPLE_PATH;
use crate::window::{DEFAULT_RADIUS, DEFAULT_STEP};

pub const JOURNAL_KEY: &str = "calendrift-journal-v1";
pub const SCROLL_KEY: &str = "calendrift:scrollState:v2";
pub const LEGACY_SCROLL_KEY: &str = "calendrift-scroll";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("windowStep must be at least 1")]
    ZeroStep,
    #[error("{field} must be a finite, non-negative number")]
    InvalidLength { field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarConfig {
    /// Months materialized on each side of the anchor at startup.
    pub window_radius: u32,
    /// Months added when a sentinel becomes visible.
    pub window_step: u32,
    pub journal_key: String,
    pub scroll_key: String,
    pub legacy_scroll_key: String,
    pub sample_path: String,
    pub restore_tolerance_months: u32,
    pub header_height: f64,
    pub header_gap: f64,
    pub scroll_save_interval_ms: u64,
    /// `1` for Monday, anything else for Sunday.
    pub week_start: i64,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            window_radius: DEFAULT_RADIUS,
            window_step: DEFAULT_STEP,
            journal_key: JOURNAL_KEY.to_string(),
            scroll_key: SCROLL_KEY.to_string(),
            legacy_scroll_key: LEGACY_SCROLL_KEY.to_string(),
            sample_path: SAMPLE_PATH.to_string(),
            restore_tolerance_months: 2,
            header_height: 52.0,
            header_gap: 8.0,
            scroll_save_interval_ms: 250,
            week_start: 0,
        }
    }
}

impl CalendarConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_step == 0 {
            return Err(ConfigError::ZeroStep);
        }
        for (field, value) in [("headerHeight", self.header_height), ("headerGap", self.header_gap)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidLength { field });
            }
        }
        Ok(())
    }
}
