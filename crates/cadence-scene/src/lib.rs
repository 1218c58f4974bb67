//! Animation orchestration for scanned pages.
//!
//! The [`Choreographer`] sequences the page-load gate, reveals content as it
//! scrolls into view, tweens numeric counters, smooths a trailing pointer
//! indicator and offsets parallax imagery. It runs on the caller's thread:
//! the host feeds it [`PageEvent`]s and frame ticks with timestamps, and
//! applies the [`Mutation`]s it produces.

pub mod choreographer;
pub mod context;
pub mod counter;
pub mod cursor;
pub mod easing;
pub mod events;
pub mod geometry;
pub mod layout;
pub mod loader;
pub mod mutation;
pub mod nav;
pub mod parallax;
pub mod reveal;
pub mod scheduler;

pub use choreographer::Choreographer;
pub use context::{CursorState, ScrollState, SessionContext};
pub use counter::{CounterAnimator, CounterState};
pub use cursor::CursorFollower;
pub use easing::ease_out_cubic;
pub use events::PageEvent;
pub use geometry::{Rect, RootMargin, Viewport, WatchOptions};
pub use layout::{LayoutSource, StaticLayout};
pub use loader::{LoadStage, LoadStateController};
pub use mutation::{Mutation, MutationQueue, StampedMutation, StyleProperty, Target};
pub use nav::NavScrollStyler;
pub use parallax::ParallaxScroller;
pub use reveal::{RevealState, ViewportRevealObserver};
pub use scheduler::{FrameTask, Scheduler, Task};
