//! Input events a host feeds into the engine.

use std::fmt;

use cadence_markup::ElementId;
use serde::{Deserialize, Serialize};

/// A page-level input event.
///
/// Coordinates are viewport pixels; `scroll_y` is the document's vertical
/// scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageEvent {
    /// The page and its resources finished loading.
    Load,
    PointerMove {
        x: f64,
        y: f64,
    },
    /// Pointer entered a tracked element.
    PointerEnter {
        element: ElementId,
    },
    /// Pointer left a tracked element.
    PointerLeave {
        element: ElementId,
    },
    Scroll {
        scroll_y: f64,
    },
    Resize {
        width: f64,
        height: f64,
    },
}

impl fmt::Display for PageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load => f.write_str("load"),
            Self::PointerMove { x, y } => write!(f, "pointer_move ({x}, {y})"),
            Self::PointerEnter { element } => write!(f, "pointer_enter {element}"),
            Self::PointerLeave { element } => write!(f, "pointer_leave {element}"),
            Self::Scroll { scroll_y } => write!(f, "scroll {scroll_y}"),
            Self::Resize { width, height } => write!(f, "resize {width}x{height}"),
        }
    }
}
