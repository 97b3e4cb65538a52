//! Infinite month window.
//!
//! Keeps an inclusive range of month offsets around the anchor month. When
//! the view reports that the top or bottom sentinel became visible, the range
//! grows by a fixed step on that side. It never shrinks.

use std::ops::RangeInclusive;

use tracing::debug;

pub const DEFAULT_RADIUS: u32 = 12;
pub const DEFAULT_STEP: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Top,
    Bottom,
}

/// A visibility change for one of the two sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentinelSignal {
    pub boundary: Boundary,
    pub is_intersecting: bool,
}

impl SentinelSignal {
    pub fn visible(boundary: Boundary) -> Self {
        Self {
            boundary,
            is_intersecting: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfiniteWindow {
    start: i64,
    end: i64,
    step: i64,
}

impl Default for InfiniteWindow {
    fn default() -> Self {
        Self::new(DEFAULT_RADIUS, DEFAULT_STEP)
    }
}

impl InfiniteWindow {
    pub fn new(radius: u32, step: u32) -> Self {
        let radius = radius as i64;
        Self {
            start: -radius,
            end: radius,
            step: step as i64,
        }
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    /// Materialized offsets, `start..=end`.
    pub fn offsets(&self) -> RangeInclusive<i64> {
        self.start..=self.end
    }

    pub fn len(&self) -> usize {
        usize::try_from(self.end.abs_diff(self.start))
            .unwrap_or(usize::MAX)
            .saturating_add(1)
    }

    /// Always false: the anchor month is part of every window.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, offset: i64) -> bool {
        self.offsets().contains(&offset)
    }

    pub fn grow(&mut self, boundary: Boundary) {
        match boundary {
            Boundary::Top => self.start = self.start.saturating_sub(self.step),
            Boundary::Bottom => self.end = self.end.saturating_add(self.step),
        }
        debug!(start = self.start, end = self.end, ?boundary, "month window grew");
    }

    /// Grow once for each intersecting signal in the batch. Returns whether
    /// the range changed.
    pub fn apply_signals(&mut self, signals: &[SentinelSignal]) -> bool {
        let mut grew = false;
        for signal in signals.iter().filter(|s| s.is_intersecting) {
            self.grow(signal.boundary);
            grew = true;
        }
        grew
    }
}
