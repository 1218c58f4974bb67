//! Viewport geometry and the intersection test behind every visibility watch.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Same rectangle moved vertically by `dy`.
    pub fn offset_y(&self, dy: f64) -> Self {
        Self {
            y: self.y + dy,
            ..*self
        }
    }

    /// Overlap of two rectangles. Edge-adjacent rectangles intersect with a
    /// zero-area result; disjoint ones return `None`.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let right = self.right().min(other.right());
        let top = self.top().max(other.top());
        let bottom = self.bottom().min(other.bottom());
        if left > right || top > bottom {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

/// Size of the visible area of the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The viewport in its own coordinates (origin top-left).
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Adjustment of the viewport rectangle before testing intersection, with
/// CSS `rootMargin` signs: positive values grow the rectangle, negative values
/// shrink it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RootMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl RootMargin {
    /// Pull the bottom edge up by `px`.
    pub fn bottom_inset(px: f64) -> Self {
        Self {
            bottom: -px,
            ..Self::default()
        }
    }

    pub fn apply(&self, rect: Rect) -> Rect {
        Rect::new(
            rect.x - self.left,
            rect.y - self.top,
            rect.width + self.left + self.right,
            rect.height + self.top + self.bottom,
        )
    }
}

/// Parameters of a visibility watch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WatchOptions {
    /// Fraction of the target that must be inside the root rectangle.
    pub threshold: f64,
    pub root_margin: RootMargin,
}

impl WatchOptions {
    /// Visible fraction of `target` (viewport coordinates) within the adjusted
    /// viewport, or `None` when they do not intersect at all. A zero-area
    /// target that touches the root counts as fully visible.
    pub fn visible_ratio(&self, target: Rect, viewport: Viewport) -> Option<f64> {
        let root = self.root_margin.apply(viewport.rect());
        let overlap = target.intersection(&root)?;
        let area = target.area();
        if area <= 0.0 {
            return Some(1.0);
        }
        Some((overlap.area() / area).clamp(0.0, 1.0))
    }

    /// Whether a watch with these options fires for `target`.
    pub fn is_met(&self, target: Rect, viewport: Viewport) -> bool {
        self.visible_ratio(target, viewport)
            .is_some_and(|ratio| ratio >= self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 1000.0,
        height: 800.0,
    };

    #[test]
    fn test_intersection() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 50.0, 100.0, 100.0);
        assert_eq!(a.intersection(&b), Some(Rect::new(50.0, 50.0, 50.0, 50.0)));

        let touching = Rect::new(100.0, 0.0, 10.0, 10.0);
        assert_eq!(a.intersection(&touching).map(|r| r.area()), Some(0.0));

        let far = Rect::new(500.0, 500.0, 10.0, 10.0);
        assert_eq!(a.intersection(&far), None);
    }

    #[test]
    fn test_bottom_inset_shrinks_root() {
        let margin = RootMargin::bottom_inset(30.0);
        assert_eq!(margin.apply(VIEWPORT.rect()), Rect::new(0.0, 0.0, 1000.0, 770.0));
    }

    #[test]
    fn test_ratio_with_bottom_inset() {
        let options = WatchOptions {
            threshold: 0.1,
            root_margin: RootMargin::bottom_inset(30.0),
        };
        // 100px tall element whose top sits 20px above the viewport bottom:
        // visible without the inset, hidden with it.
        let element = Rect::new(0.0, 780.0, 200.0, 100.0);
        assert_eq!(options.visible_ratio(element, VIEWPORT), None);
        assert!(!options.is_met(element, VIEWPORT));

        // Top at 750: 20px inside the adjusted root, ratio 0.2.
        let element = Rect::new(0.0, 750.0, 200.0, 100.0);
        let ratio = options.visible_ratio(element, VIEWPORT).unwrap();
        assert!((ratio - 0.2).abs() < 1e-9);
        assert!(options.is_met(element, VIEWPORT));
    }

    #[test]
    fn test_threshold_boundary() {
        let options = WatchOptions {
            threshold: 0.5,
            root_margin: RootMargin::default(),
        };
        let half = Rect::new(0.0, 750.0, 100.0, 100.0);
        assert!(options.is_met(half, VIEWPORT));
        let less = Rect::new(0.0, 751.0, 100.0, 100.0);
        assert!(!options.is_met(less, VIEWPORT));
    }

    #[test]
    fn test_zero_area_target() {
        let options = WatchOptions {
            threshold: 0.1,
            root_margin: RootMargin::default(),
        };
        assert!(options.is_met(Rect::new(10.0, 10.0, 0.0, 0.0), VIEWPORT));
        assert!(!options.is_met(Rect::new(10.0, 900.0, 0.0, 0.0), VIEWPORT));
    }
}
