//! Element geometry supplied by the host.

use std::collections::HashMap;

use cadence_markup::ElementId;

use crate::geometry::Rect;

/// Source of element rectangles in document coordinates (independent of the
/// current scroll offset). The engine converts to viewport coordinates itself.
pub trait LayoutSource {
    fn document_rect(&self, id: ElementId) -> Option<Rect>;
}

impl<T: LayoutSource + ?Sized> LayoutSource for &T {
    fn document_rect(&self, id: ElementId) -> Option<Rect> {
        (**self).document_rect(id)
    }
}

impl<T: LayoutSource + ?Sized> LayoutSource for Box<T> {
    fn document_rect(&self, id: ElementId) -> Option<Rect> {
        (**self).document_rect(id)
    }
}

/// Fixed table of rectangles, for headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticLayout {
    rects: HashMap<ElementId, Rect>,
}

impl StaticLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, id: ElementId, rect: Rect) -> Self {
        self.insert(id, rect);
        self
    }

    /// Set or replace the rectangle of `id`.
    pub fn insert(&mut self, id: ElementId, rect: Rect) -> Option<Rect> {
        self.rects.insert(id, rect)
    }

    pub fn remove(&mut self, id: ElementId) -> Option<Rect> {
        self.rects.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

impl LayoutSource for StaticLayout {
    fn document_rect(&self, id: ElementId) -> Option<Rect> {
        self.rects.get(&id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_layout() {
        let mut layout = StaticLayout::new().with(ElementId(0), Rect::new(0.0, 100.0, 50.0, 50.0));
        assert_eq!(layout.len(), 1);
        assert_eq!(
            layout.document_rect(ElementId(0)),
            Some(Rect::new(0.0, 100.0, 50.0, 50.0))
        );
        assert_eq!(layout.document_rect(ElementId(1)), None);

        let previous = layout.insert(ElementId(0), Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(previous.is_some());
        layout.remove(ElementId(0));
        assert!(layout.is_empty());
    }

    #[test]
    fn test_borrowed_source() {
        let layout = StaticLayout::new().with(ElementId(3), Rect::new(1.0, 2.0, 3.0, 4.0));
        fn top_of(source: impl LayoutSource, id: ElementId) -> Option<f64> {
            source.document_rect(id).map(|r| r.top())
        }
        assert_eq!(top_of(&layout, ElementId(3)), Some(2.0));
    }
}
