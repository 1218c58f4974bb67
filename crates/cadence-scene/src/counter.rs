//! Eased count-up of numeric displays on first viewport entry.

use std::collections::HashMap;

use cadence_markup::{ElementId, PageManifest};
use serde::Serialize;
use tracing::trace;

use crate::easing::ease_out_cubic;
use crate::geometry::{Rect, Viewport, WatchOptions};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CounterState {
    Idle,
    Running { started_ms: f64 },
    Done,
}

#[derive(Debug, Clone)]
struct CounterEntry {
    id: ElementId,
    target: u64,
    display: u64,
    state: CounterState,
}

/// Result of one tween frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterFrame {
    /// New display value, when it differs from the previous frame.
    pub changed: Option<u64>,
    /// Whether another frame is needed.
    pub running: bool,
}

#[derive(Debug)]
pub struct CounterAnimator {
    options: WatchOptions,
    duration_ms: f64,
    entries: Vec<CounterEntry>,
    index: HashMap<ElementId, usize>,
    armed: bool,
}

impl CounterAnimator {
    pub fn new(manifest: &PageManifest, options: WatchOptions, duration_ms: f64) -> Self {
        let entries: Vec<CounterEntry> = manifest
            .counters
            .iter()
            .map(|spec| CounterEntry {
                id: spec.id,
                target: spec.target,
                display: 0,
                state: CounterState::Idle,
            })
            .collect();
        let index = entries.iter().enumerate().map(|(i, e)| (e.id, i)).collect();
        Self {
            options,
            duration_ms,
            entries,
            index,
            armed: false,
        }
    }

    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Start the tween of every `Idle` counter that meets the threshold.
    /// Returns the counters that started; each needs a frame.
    pub fn scan<F>(&mut self, at_ms: f64, viewport: Viewport, locate: F) -> Vec<ElementId>
    where
        F: Fn(ElementId) -> Option<Rect>,
    {
        if !self.armed {
            return Vec::new();
        }
        let options = self.options;
        let mut started = Vec::new();
        for entry in &mut self.entries {
            if entry.state != CounterState::Idle {
                continue;
            }
            if locate(entry.id).is_some_and(|rect| options.is_met(rect, viewport)) {
                entry.state = CounterState::Running { started_ms: at_ms };
                trace!(element = %entry.id, at_ms, target = entry.target, "counter triggered");
                started.push(entry.id);
            }
        }
        started
    }

    /// Advance the tween of `id` to `now_ms`.
    pub fn tick(&mut self, id: ElementId, now_ms: f64) -> CounterFrame {
        let idle = CounterFrame {
            changed: None,
            running: false,
        };
        let Some(&i) = self.index.get(&id) else {
            return idle;
        };
        let entry = &mut self.entries[i];
        let CounterState::Running { started_ms } = entry.state else {
            return idle;
        };

        let elapsed = (now_ms - started_ms).max(0.0);
        let progress = if self.duration_ms > 0.0 {
            (elapsed / self.duration_ms).min(1.0)
        } else {
            1.0
        };
        let value = if progress >= 1.0 {
            entry.target
        } else {
            (entry.target as f64 * ease_out_cubic(progress)).round() as u64
        };
        // An eased curve never decreases, but keep the display monotonic.
        let value = value.max(entry.display).min(entry.target);

        let changed = (value != entry.display).then_some(value);
        entry.display = value;
        let running = progress < 1.0;
        if !running {
            entry.state = CounterState::Done;
        }
        CounterFrame { changed, running }
    }

    pub fn state(&self, id: ElementId) -> Option<CounterState> {
        self.index.get(&id).map(|&i| self.entries[i].state)
    }

    /// Current display value.
    pub fn value(&self, id: ElementId) -> Option<u64> {
        self.index.get(&id).map(|&i| self.entries[i].display)
    }
}
