//! One-shot reveal of animatable elements.
//!
//! Every animatable element walks `Pending -> Triggered -> Revealed` exactly
//! once. Heroes are triggered by the load sequence; everything outside a hero
//! container is triggered by the visibility watch once it is armed. Only
//! `Pending` entries are ever tested, so a trigger also ends the watch.

use std::collections::HashMap;

use cadence_markup::{ElementId, PageManifest};
use serde::Serialize;
use tracing::trace;

use crate::geometry::{Rect, Viewport, WatchOptions};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RevealState {
    Pending,
    Triggered { at_ms: f64 },
    Revealed,
}

#[derive(Debug, Clone)]
struct RevealEntry {
    id: ElementId,
    delay_ms: u64,
    hero: bool,
    lazy: bool,
    watched: bool,
    state: RevealState,
}

#[derive(Debug)]
pub struct ViewportRevealObserver {
    options: WatchOptions,
    entries: Vec<RevealEntry>,
    index: HashMap<ElementId, usize>,
    armed: bool,
}

impl ViewportRevealObserver {
    pub fn new(manifest: &PageManifest, options: WatchOptions) -> Self {
        let entries: Vec<RevealEntry> = manifest
            .animatables
            .iter()
            .map(|spec| RevealEntry {
                id: spec.id,
                delay_ms: spec.reveal_delay_ms,
                hero: spec.hero,
                lazy: !spec.in_any_hero,
                watched: false,
                state: RevealState::Pending,
            })
            .collect();
        let index = entries.iter().enumerate().map(|(i, e)| (e.id, i)).collect();
        Self {
            options,
            entries,
            index,
            armed: false,
        }
    }

    pub fn options(&self) -> WatchOptions {
        self.options
    }

    pub fn hero_ids(&self) -> Vec<ElementId> {
        self.entries.iter().filter(|e| e.hero).map(|e| e.id).collect()
    }

    /// Start watching every element outside the hero containers.
    pub fn arm(&mut self) {
        for entry in self.entries.iter_mut().filter(|e| e.lazy) {
            entry.watched = true;
        }
        self.armed = true;
    }

    /// `Pending -> Triggered`. Returns the reveal delay, or `None` if the
    /// element is unknown or was already triggered.
    pub fn trigger(&mut self, id: ElementId, at_ms: f64) -> Option<u64> {
        let &i = self.index.get(&id)?;
        let entry = &mut self.entries[i];
        if entry.state != RevealState::Pending {
            return None;
        }
        entry.state = RevealState::Triggered { at_ms };
        trace!(element = %id, at_ms, delay_ms = entry.delay_ms, "reveal triggered");
        Some(entry.delay_ms)
    }

    /// Test every watched `Pending` element against the viewport and trigger
    /// those that meet the threshold. `locate` yields viewport-relative
    /// rectangles; elements without geometry are skipped.
    pub fn scan<F>(&mut self, at_ms: f64, viewport: Viewport, locate: F) -> Vec<(ElementId, u64)>
    where
        F: Fn(ElementId) -> Option<Rect>,
    {
        if !self.armed {
            return Vec::new();
        }
        let options = self.options;
        let hits: Vec<ElementId> = self
            .entries
            .iter()
            .filter(|e| e.watched && e.state == RevealState::Pending)
            .filter(|e| locate(e.id).is_some_and(|rect| options.is_met(rect, viewport)))
            .map(|e| e.id)
            .collect();

        hits.into_iter()
            .filter_map(|id| self.trigger(id, at_ms).map(|delay| (id, delay)))
            .collect()
    }

    /// `Triggered -> Revealed`. Returns true when the element changed state
    /// and its class should be applied.
    pub fn complete(&mut self, id: ElementId) -> bool {
        let Some(&i) = self.index.get(&id) else {
            return false;
        };
        let entry = &mut self.entries[i];
        match entry.state {
            RevealState::Triggered { .. } => {
                entry.state = RevealState::Revealed;
                true
            }
            _ => false,
        }
    }

    pub fn state(&self, id: ElementId) -> Option<RevealState> {
        self.index.get(&id).map(|&i| self.entries[i].state)
    }

    pub fn is_revealed(&self, id: ElementId) -> bool {
        self.state(id) == Some(RevealState::Revealed)
    }

    pub fn revealed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.state == RevealState::Revealed)
            .count()
    }
}
