//! Single-threaded cooperative task queue.
//!
//! Two kinds of continuation exist: timers, which run once the clock passes
//! their due time, and frame requests, which run on the next frame tick. Tasks
//! are plain data; the [`Choreographer`](crate::Choreographer) interprets them.
//! The clock only moves when the host supplies a timestamp, so the whole
//! engine runs identically under a real frame loop and in tests.
//!
//! Timers are fire-and-forget: there is no cancellation. Timers due at the
//! same instant run in the order they were scheduled.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use cadence_markup::ElementId;

/// Work deferred by a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Load gate delay elapsed: lift the loader.
    LiftLoader,
    /// Buffer after the loader elapsed: reveal heroes and arm observers.
    HeroStage,
    /// Reveal one element.
    Reveal(ElementId),
}

/// Work deferred to the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTask {
    FollowCursor,
    CounterTick(ElementId),
}

#[derive(Debug)]
struct Timer {
    due_ms: f64,
    seq: u64,
    task: Task,
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Timer {}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timer {
    // Reversed so the max-heap yields the earliest (due, seq) first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .total_cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: f64,
    next_seq: u64,
    timers: BinaryHeap<Timer>,
    frame_requests: Vec<FrameTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current engine time in milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Move the clock forward. Earlier timestamps are ignored; time never
    /// runs backwards.
    pub fn advance_clock(&mut self, to_ms: f64) {
        if to_ms > self.now_ms {
            self.now_ms = to_ms;
        }
    }

    /// Schedule `task` to run `delay_ms` from now. Negative delays run as
    /// soon as possible. Returns the due time.
    pub fn schedule_in(&mut self, delay_ms: f64, task: Task) -> f64 {
        let due_ms = self.now_ms + delay_ms.max(0.0);
        self.schedule_at(due_ms, task);
        due_ms
    }

    pub fn schedule_at(&mut self, due_ms: f64, task: Task) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Timer { due_ms, seq, task });
    }

    /// Pop the earliest timer due at or before `until_ms`, moving the clock to
    /// its due time.
    pub fn pop_due(&mut self, until_ms: f64) -> Option<Task> {
        if self.timers.peek()?.due_ms > until_ms {
            return None;
        }
        let timer = self.timers.pop()?;
        self.advance_clock(timer.due_ms);
        Some(timer.task)
    }

    pub fn next_due_ms(&self) -> Option<f64> {
        self.timers.peek().map(|t| t.due_ms)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn request_frame(&mut self, task: FrameTask) {
        self.frame_requests.push(task);
    }

    /// Requests made before this call; requests made while running them wait
    /// for the following frame.
    pub fn take_frame_requests(&mut self) -> Vec<FrameTask> {
        std::mem::take(&mut self.frame_requests)
    }

    pub fn has_frame_requests(&self) -> bool {
        !self.frame_requests.is_empty()
    }
}
