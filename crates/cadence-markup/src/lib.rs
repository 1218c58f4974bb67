//! Markup scanning for the Cadence choreography engine.
//!
//! A page is parsed once, up front, and reduced to a [`PageManifest`]: the
//! anchors the engine writes to, the elements it reveals, the counters it
//! tweens, the parallax frames it offsets and the elements that toggle the
//! cursor hover state. Every tracked element gets a dense [`ElementId`] in
//! document order, which is the only handle the engine ever holds.

pub mod attributes;
pub mod error;
pub mod manifest;
pub mod scan;

pub use attributes::{is_degraded_delay, parse_count, parse_delay_ms, parse_int_prefix};
pub use error::{MarkupError, Result};
pub use manifest::{
    Anchor, AnimatableSpec, CounterSpec, ElementId, PageKind, PageManifest, ParallaxSpec,
    TrackedElement,
};
pub use scan::PageMarkup;
