//! Scroll-linked vertical offset of framed images.

use cadence_markup::{ElementId, ParallaxSpec};

use crate::geometry::{Rect, Viewport};
use crate::mutation::{Mutation, MutationQueue, StyleProperty, Target};

/// Offset for a frame at `rect` (viewport coordinates), or `None` when the
/// frame is entirely outside the viewport.
///
/// `progress` runs from 0 (frame top at the viewport bottom) to 1 (frame
/// bottom at the viewport top); the offset is `(progress - 0.5) * scale`.
pub fn parallax_offset(rect: Rect, viewport_height: f64, scale_px: f64) -> Option<f64> {
    if rect.top() >= viewport_height || rect.bottom() <= 0.0 {
        return None;
    }
    let progress = (viewport_height - rect.top()) / (viewport_height + rect.height);
    // Adding zero turns -0.0 into 0.0 so the style never reads "-0px".
    Some((progress - 0.5) * scale_px + 0.0)
}

#[derive(Debug)]
pub struct ParallaxScroller {
    pairs: Vec<ParallaxSpec>,
    scale_px: f64,
}

impl ParallaxScroller {
    pub fn new(pairs: Vec<ParallaxSpec>, scale_px: f64) -> Self {
        Self { pairs, scale_px }
    }

    /// Recompute every offset. `locate` yields the viewport-relative frame
    /// rectangle; frames without geometry or outside the viewport keep their
    /// previous offset.
    pub fn update<F>(&self, viewport: Viewport, locate: F, at_ms: f64, queue: &mut MutationQueue)
    where
        F: Fn(ElementId) -> Option<Rect>,
    {
        for pair in &self.pairs {
            let Some(rect) = locate(pair.frame) else {
                continue;
            };
            if let Some(offset) = parallax_offset(rect, viewport.height, self.scale_px) {
                queue.push(
                    at_ms,
                    Mutation::set_style(
                        Target::Element(pair.inner),
                        StyleProperty::Transform,
                        format!("translateY({offset}px)"),
                    ),
                );
            }
        }
    }
}
