//! Header focus tracking.
//!
//! Every mounted month section is registered here together with a way to
//! read its current height. The view delivers visibility changes in batches;
//! after a whole batch is applied, the section with the largest visible area
//! (`intersection_ratio × height`) is the focused month shown in the sticky
//! header. Among equal areas the earliest month wins.
//!
//! Sections live in a slot arena. A [`Registration`] is the only way to
//! release a slot, and it is consumed by [`HeaderTracker::unregister`], so a
//! section is released exactly once. Freed slots bump their generation, which
//! turns any [`SectionId`] still held by the view into a dead reference that
//! later reports cannot resolve.

use std::fmt;

use tracing::{debug, trace};

use crate::date::MonthKey;

/// Handle used in visibility reports. Cheap to copy; goes stale once the
/// section is unregistered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionId {
    slot: u32,
    generation: u32,
}

/// Ownership of one registered section.
#[must_use = "a section stays tracked until its registration is passed to `unregister`"]
#[derive(Debug, PartialEq, Eq)]
pub struct Registration {
    id: SectionId,
    key: MonthKey,
}

impl Registration {
    pub fn id(&self) -> SectionId {
        self.id
    }

    pub fn key(&self) -> MonthKey {
        self.key
    }
}

/// One observation from the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityReport {
    pub section: SectionId,
    /// Fraction of the section inside the scroll container, `0.0..=1.0`.
    pub intersection_ratio: f64,
    /// Height measured by the observer, used when the provider reports none.
    pub bounding_height: f64,
}

impl VisibilityReport {
    pub fn new(section: SectionId, intersection_ratio: f64) -> Self {
        Self {
            section,
            intersection_ratio,
            bounding_height: 0.0,
        }
    }
}

type HeightProvider = Box<dyn Fn() -> f64>;

struct Section {
    key: MonthKey,
    height: HeightProvider,
    visible: Option<f64>,
}

struct Slot {
    generation: u32,
    section: Option<Section>,
}

#[derive(Default)]
pub struct HeaderTracker {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl fmt::Debug for HeaderTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderTracker")
            .field("slots", &self.slots.len())
            .field("live", &self.live)
            .finish()
    }
}

impl HeaderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered sections.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn register<F>(&mut self, key: MonthKey, height: F) -> Registration
    where
        F: Fn() -> f64 + 'static,
    {
        let section = Section {
            key,
            height: Box::new(height),
            visible: None,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot as usize].section = Some(section);
                slot
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    section: Some(section),
                });
                (self.slots.len() - 1) as u32
            }
        };
        self.live += 1;
        let generation = self.slots[slot as usize].generation;
        trace!(%key, slot, generation, "section registered");
        Registration {
            id: SectionId { slot, generation },
            key,
        }
    }

    /// Stop tracking a section and drop its visible area.
    pub fn unregister(&mut self, registration: Registration) {
        let SectionId { slot, generation } = registration.id;
        let Some(entry) = self.slots.get_mut(slot as usize) else {
            return;
        };
        if entry.generation != generation || entry.section.take().is_none() {
            return;
        }
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(slot);
        self.live -= 1;
        trace!(key = %registration.key, slot, "section unregistered");
    }

    fn section_mut(&mut self, id: SectionId) -> Option<&mut Section> {
        self.slots
            .get_mut(id.slot as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.section.as_mut())
    }

    /// Last computed visible area of a live section.
    pub fn visible_area(&self, id: SectionId) -> Option<f64> {
        self.slots
            .get(id.slot as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.section.as_ref())
            .and_then(|s| s.visible)
    }

    /// Apply every report in the batch, then pick the focused month once.
    ///
    /// Returns `None` when no report reached a live section; reports for
    /// unregistered sections are dropped.
    pub fn apply_batch(&mut self, batch: &[VisibilityReport]) -> Option<MonthKey> {
        let mut changed = false;
        for report in batch {
            let Some(section) = self.section_mut(report.section) else {
                debug!(section = ?report.section, "visibility report for a released section");
                continue;
            };
            let height = effective_height((section.height)(), report.bounding_height);
            let ratio = if report.intersection_ratio.is_finite() {
                report.intersection_ratio.clamp(0.0, 1.0)
            } else {
                0.0
            };
            section.visible = Some(ratio * height);
            changed = true;
        }
        if changed {
            self.focused()
        } else {
            None
        }
    }

    /// The tracked section with the largest visible area.
    pub fn focused(&self) -> Option<MonthKey> {
        let mut best: Option<(f64, MonthKey)> = None;
        for section in self.slots.iter().filter_map(|s| s.section.as_ref()) {
            let Some(area) = section.visible else {
                continue;
            };
            let wins = match best {
                None => true,
                Some((best_area, best_key)) => {
                    area > best_area || (area == best_area && section.key < best_key)
                }
            };
            if wins {
                best = Some((area, section.key));
            }
        }
        best.map(|(_, key)| key)
    }
}

fn effective_height(provided: f64, measured: f64) -> f64 {
    if provided.is_finite() && provided > 0.0 {
        provided
    } else if measured.is_finite() && measured > 0.0 {
        measured
    } else {
        1.0
    }
}
