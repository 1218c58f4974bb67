//! Navigation bar styling on scroll.

use crate::context::SessionContext;
use crate::mutation::{Mutation, MutationQueue, Target};

#[derive(Debug)]
pub struct NavScrollStyler {
    threshold_px: f64,
    class: String,
}

impl NavScrollStyler {
    pub fn new(threshold_px: f64, class: impl Into<String>) -> Self {
        Self {
            threshold_px,
            class: class.into(),
        }
    }

    /// Record the offset and flip the nav class when it crosses the threshold.
    pub fn on_scroll(
        &self,
        context: &mut SessionContext,
        scroll_y: f64,
        at_ms: f64,
        queue: &mut MutationQueue,
    ) {
        context.record_scroll(scroll_y);
        let scrolled = scroll_y > self.threshold_px;
        if scrolled == context.scroll().nav_scrolled {
            return;
        }
        context.set_nav_scrolled(scrolled);
        let mutation = if scrolled {
            Mutation::add_class(Target::Nav, &self.class)
        } else {
            Mutation::remove_class(Target::Nav, &self.class)
        };
        queue.push(at_ms, mutation);
    }
}

#[cfg(test)]
mod tests {
    use cadence_markup::PageKind;

    use super::*;
    use crate::geometry::Viewport;

    #[test]
    fn test_class_flips_only_on_crossing() {
        let nav = NavScrollStyler::new(50.0, "scrolled");
        let mut context = SessionContext::new(PageKind::Landing, Viewport::new(1000.0, 800.0));
        let mut queue = MutationQueue::new();

        for y in [10.0, 50.0, 51.0, 300.0, 49.0, 0.0] {
            nav.on_scroll(&mut context, y, y, &mut queue);
        }

        let written: Vec<String> = queue.drain().map(|m| m.mutation.to_string()).collect();
        assert_eq!(written, vec!["nav +.scrolled", "nav -.scrolled"]);
        assert_eq!(context.scroll().last_scroll_y, 0.0);
        assert!(!context.scroll().nav_scrolled);
    }
}
