//! Visual mutations produced by the engine.
//!
//! The engine never touches a page directly. Every visible effect is pushed
//! onto a [`MutationQueue`] as a timestamped [`Mutation`]; the host drains the
//! queue after each dispatch or frame and applies the changes to its surface.
//!
//! ```ignore
//! for stamped in choreographer.drain_mutations() {
//!     match stamped.mutation {
//!         Mutation::AddClass { target, class } => host.add_class(target, &class),
//!         Mutation::SetStyle { target, property, value } => {
//!             host.set_style(target, property.as_css(), &value)
//!         }
//!         _ => {}
//!     }
//! }
//! ```

use std::collections::VecDeque;
use std::fmt;

use cadence_markup::ElementId;
use serde::{Deserialize, Serialize};

/// What a mutation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Target {
    /// The document body (load-blocked state, hover class).
    Body,
    /// The loading overlay.
    Loader,
    /// The raw pointer indicator.
    Cursor,
    /// The smoothed pointer indicator.
    Follower,
    /// The navigation bar.
    Nav,
    /// A tracked page element.
    Element(ElementId),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Body => f.write_str("body"),
            Self::Loader => f.write_str("loader"),
            Self::Cursor => f.write_str("cursor"),
            Self::Follower => f.write_str("follower"),
            Self::Nav => f.write_str("nav"),
            Self::Element(id) => write!(f, "{id}"),
        }
    }
}

/// Inline style properties the engine writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleProperty {
    Overflow,
    Left,
    Top,
    Transform,
}

impl StyleProperty {
    /// CSS property name.
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Overflow => "overflow",
            Self::Left => "left",
            Self::Top => "top",
            Self::Transform => "transform",
        }
    }
}

/// A single visual change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    AddClass {
        target: Target,
        class: String,
    },
    RemoveClass {
        target: Target,
        class: String,
    },
    SetStyle {
        target: Target,
        property: StyleProperty,
        value: String,
    },
    SetText {
        target: Target,
        text: String,
    },
}

impl Mutation {
    pub fn target(&self) -> Target {
        match self {
            Self::AddClass { target, .. }
            | Self::RemoveClass { target, .. }
            | Self::SetStyle { target, .. }
            | Self::SetText { target, .. } => *target,
        }
    }

    pub fn add_class(target: Target, class: &str) -> Self {
        Self::AddClass {
            target,
            class: class.to_string(),
        }
    }

    pub fn remove_class(target: Target, class: &str) -> Self {
        Self::RemoveClass {
            target,
            class: class.to_string(),
        }
    }

    pub fn set_style(target: Target, property: StyleProperty, value: impl Into<String>) -> Self {
        Self::SetStyle {
            target,
            property,
            value: value.into(),
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddClass { target, class } => write!(f, "{target} +.{class}"),
            Self::RemoveClass { target, class } => write!(f, "{target} -.{class}"),
            Self::SetStyle {
                target,
                property,
                value,
            } => write!(f, "{target} {}: {value}", property.as_css()),
            Self::SetText { target, text } => write!(f, "{target} text={text:?}"),
        }
    }
}

/// A mutation together with the engine time it was produced at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampedMutation {
    pub at_ms: f64,
    #[serde(flatten)]
    pub mutation: Mutation,
}

/// Queue collecting mutations between host drains.
#[derive(Debug, Default)]
pub struct MutationQueue {
    entries: VecDeque<StampedMutation>,
}

impl MutationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, at_ms: f64, mutation: Mutation) {
        self.entries.push_back(StampedMutation { at_ms, mutation });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn pop(&mut self) -> Option<StampedMutation> {
        self.entries.pop_front()
    }

    /// Drain all mutations in production order.
    pub fn drain(&mut self) -> impl Iterator<Item = StampedMutation> + '_ {
        self.entries.drain(..)
    }

    pub fn peek(&self) -> Option<&StampedMutation> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StampedMutation> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Pending mutations for one target.
    pub fn for_target(&self, target: Target) -> Vec<&StampedMutation> {
        self.entries
            .iter()
            .filter(|m| m.mutation.target() == target)
            .collect()
    }
}
