//! Custom pointer indicators.
//!
//! The raw indicator tracks the pointer exactly; the follower chases it with
//! exponential smoothing, one step per frame, for the whole session.

use std::collections::HashSet;

use cadence_markup::ElementId;

use crate::context::SessionContext;
use crate::mutation::{Mutation, MutationQueue, StyleProperty, Target};

#[derive(Debug)]
pub struct CursorFollower {
    smoothing: f64,
    hover_targets: HashSet<ElementId>,
    hover_class: String,
}

impl CursorFollower {
    pub fn new(
        smoothing: f64,
        hover_targets: impl IntoIterator<Item = ElementId>,
        hover_class: impl Into<String>,
    ) -> Self {
        Self {
            smoothing,
            hover_targets: hover_targets.into_iter().collect(),
            hover_class: hover_class.into(),
        }
    }

    pub fn on_pointer_move(
        &self,
        context: &mut SessionContext,
        x: f64,
        y: f64,
        at_ms: f64,
        queue: &mut MutationQueue,
    ) {
        context.record_pointer(x, y);
        write_position(queue, at_ms, Target::Cursor, x, y);
    }

    /// One frame of the follower chain: update, then write.
    pub fn follow(&self, context: &mut SessionContext, at_ms: f64, queue: &mut MutationQueue) {
        let (x, y) = context.step_follower(self.smoothing);
        write_position(queue, at_ms, Target::Follower, x, y);
    }

    pub fn on_pointer_enter(&self, element: ElementId, at_ms: f64, queue: &mut MutationQueue) {
        if self.hover_targets.contains(&element) {
            queue.push(at_ms, Mutation::add_class(Target::Body, &self.hover_class));
        }
    }

    pub fn on_pointer_leave(&self, element: ElementId, at_ms: f64, queue: &mut MutationQueue) {
        if self.hover_targets.contains(&element) {
            queue.push(at_ms, Mutation::remove_class(Target::Body, &self.hover_class));
        }
    }
}

fn write_position(queue: &mut MutationQueue, at_ms: f64, target: Target, x: f64, y: f64) {
    queue.push(at_ms, Mutation::set_style(target, StyleProperty::Left, format!("{x}px")));
    queue.push(at_ms, Mutation::set_style(target, StyleProperty::Top, format!("{y}px")));
}

#[cfg(test)]
mod tests {
    use cadence_markup::PageKind;

    use super::*;
    use crate::geometry::Viewport;

    fn context() -> SessionContext {
        SessionContext::new(PageKind::Landing, Viewport::new(1000.0, 800.0))
    }

    #[test]
    fn test_pointer_move_writes_raw_indicator() {
        let follower = CursorFollower::new(0.12, std::iter::empty(), "cursor-hover");
        let mut context = context();
        let mut queue = MutationQueue::new();

        follower.on_pointer_move(&mut context, 120.0, 45.5, 16.0, &mut queue);

        assert_eq!(context.cursor().mouse_x, 120.0);
        let written: Vec<String> = queue.drain().map(|m| m.mutation.to_string()).collect();
        assert_eq!(written, vec!["cursor left: 120px", "cursor top: 45.5px"]);
    }

    #[test]
    fn test_follow_converges_without_overshoot() {
        let follower = CursorFollower::new(0.12, std::iter::empty(), "cursor-hover");
        let mut context = context();
        let mut queue = MutationQueue::new();
        follower.on_pointer_move(&mut context, 200.0, 0.0, 0.0, &mut queue);

        let mut bound = 200.0;
        for _ in 0..60 {
            follower.follow(&mut context, 0.0, &mut queue);
            bound *= 0.88;
            let x = context.cursor().follower_x;
            assert!(x <= 200.0);
            assert!((200.0 - x) <= bound + 1e-9);
        }
    }

    #[test]
    fn test_hover_toggles_body_class() {
        let follower = CursorFollower::new(0.12, [ElementId(2)], "cursor-hover");
        let mut queue = MutationQueue::new();

        follower.on_pointer_enter(ElementId(1), 0.0, &mut queue);
        assert!(queue.is_empty());

        follower.on_pointer_enter(ElementId(2), 0.0, &mut queue);
        follower.on_pointer_leave(ElementId(2), 5.0, &mut queue);
        let written: Vec<String> = queue.drain().map(|m| m.mutation.to_string()).collect();
        assert_eq!(written, vec!["body +.cursor-hover", "body -.cursor-hover"]);
    }
}
