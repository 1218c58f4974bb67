//! Session-scoped state shared between components.
//!
//! Each field has exactly one writer method. Components read freely through
//! the accessors.

use cadence_markup::PageKind;
use serde::Serialize;

use crate::geometry::Viewport;

/// Raw and smoothed pointer positions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CursorState {
    pub mouse_x: f64,
    pub mouse_y: f64,
    pub follower_x: f64,
    pub follower_y: f64,
}

impl CursorState {
    /// One smoothing step: `follower += (mouse - follower) * k`.
    ///
    /// For `k` in (0, 1) the follower converges geometrically and never
    /// overshoots the pointer.
    pub fn step(&mut self, k: f64) {
        self.follower_x += (self.mouse_x - self.follower_x) * k;
        self.follower_y += (self.mouse_y - self.follower_y) * k;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScrollState {
    pub last_scroll_y: f64,
    /// Whether the nav currently carries the scrolled class.
    pub nav_scrolled: bool,
}

#[derive(Debug, Clone)]
pub struct SessionContext {
    cursor: CursorState,
    scroll: ScrollState,
    viewport: Viewport,
    page_kind: PageKind,
}

impl SessionContext {
    pub fn new(page_kind: PageKind, viewport: Viewport) -> Self {
        Self {
            cursor: CursorState::default(),
            scroll: ScrollState::default(),
            viewport,
            page_kind,
        }
    }

    pub fn cursor(&self) -> &CursorState {
        &self.cursor
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn page_kind(&self) -> PageKind {
        self.page_kind
    }

    /// Writer of `mouse_x`/`mouse_y`.
    pub fn record_pointer(&mut self, x: f64, y: f64) {
        self.cursor.mouse_x = x;
        self.cursor.mouse_y = y;
    }

    /// Writer of `follower_x`/`follower_y`. Returns the new position.
    pub fn step_follower(&mut self, k: f64) -> (f64, f64) {
        self.cursor.step(k);
        (self.cursor.follower_x, self.cursor.follower_y)
    }

    /// Writer of `last_scroll_y`.
    pub fn record_scroll(&mut self, scroll_y: f64) {
        self.scroll.last_scroll_y = scroll_y;
    }

    /// Writer of `nav_scrolled`.
    pub fn set_nav_scrolled(&mut self, scrolled: bool) {
        self.scroll.nav_scrolled = scrolled;
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }
}
