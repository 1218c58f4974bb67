//! Plain-data description of a scanned page.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Dense handle of a tracked element, assigned in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u32);

impl ElementId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Page type. Decides the loader delay, the hero container and whether
/// counters run at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Landing,
    Secondary,
}

/// Singleton page elements the engine writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Loader,
    Cursor,
    Follower,
    Nav,
}

impl Anchor {
    pub const ALL: [Anchor; 4] = [Anchor::Loader, Anchor::Cursor, Anchor::Follower, Anchor::Nav];
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Anchor::Loader => "loader",
            Anchor::Cursor => "cursor",
            Anchor::Follower => "cursor follower",
            Anchor::Nav => "navigation",
        };
        f.write_str(name)
    }
}

/// Any element the engine keeps a handle to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedElement {
    pub id: ElementId,
    /// Lower-case tag name.
    pub tag: String,
    /// Value of the `id` attribute.
    pub html_id: Option<String>,
    pub classes: Vec<String>,
}

impl TrackedElement {
    /// Short human-readable name: `#id`, else `tag.class`, else the tag.
    pub fn label(&self) -> String {
        if let Some(id) = &self.html_id {
            return format!("#{id}");
        }
        match self.classes.first() {
            Some(class) => format!("{}.{}", self.tag, class),
            None => self.tag.clone(),
        }
    }
}

/// An element with reveal choreography.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimatableSpec {
    pub id: ElementId,
    pub reveal_delay_ms: u64,
    /// Member of the hero set for this page kind.
    pub hero: bool,
    /// Inside any hero container, regardless of page kind. Such elements are
    /// never watched for viewport entry.
    pub in_any_hero: bool,
}

/// A numeric counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSpec {
    pub id: ElementId,
    pub target: u64,
}

/// An image that shifts with scroll, measured through its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallaxSpec {
    /// Element receiving the offset.
    pub inner: ElementId,
    /// Parent element whose geometry is measured.
    pub frame: ElementId,
}

/// Everything the engine needs to know about a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageManifest {
    pub kind: PageKind,
    pub elements: Vec<TrackedElement>,
    pub animatables: Vec<AnimatableSpec>,
    pub counters: Vec<CounterSpec>,
    pub parallax: Vec<ParallaxSpec>,
    pub hover_targets: Vec<ElementId>,
}

impl PageManifest {
    pub fn element(&self, id: ElementId) -> Option<&TrackedElement> {
        self.elements.get(id.index())
    }

    /// Display label for `id`, falling back to the numeric handle.
    pub fn label(&self, id: ElementId) -> String {
        self.element(id)
            .map(TrackedElement::label)
            .unwrap_or_else(|| id.to_string())
    }

    pub fn hero_ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.animatables.iter().filter(|a| a.hero).map(|a| a.id)
    }

    /// Animatables that are watched for viewport entry once observers arm.
    pub fn lazy_ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.animatables
            .iter()
            .filter(|a| !a.in_any_hero)
            .map(|a| a.id)
    }

    pub fn animatable(&self, id: ElementId) -> Option<&AnimatableSpec> {
        self.animatables.iter().find(|a| a.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(id: u32, html_id: Option<&str>, classes: &[&str]) -> TrackedElement {
        TrackedElement {
            id: ElementId(id),
            tag: "div".to_string(),
            html_id: html_id.map(str::to_string),
            classes: classes.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(element(0, Some("about"), &["section"]).label(), "#about");
        assert_eq!(element(1, None, &["stat-number", "big"]).label(), "div.stat-number");
        assert_eq!(element(2, None, &[]).label(), "div");
    }

    #[test]
    fn test_hero_and_lazy_partition() {
        let manifest = PageManifest {
            kind: PageKind::Landing,
            elements: (0..3).map(|i| element(i, None, &[])).collect(),
            animatables: vec![
                AnimatableSpec { id: ElementId(0), reveal_delay_ms: 0, hero: true, in_any_hero: true },
                AnimatableSpec { id: ElementId(1), reveal_delay_ms: 0, hero: false, in_any_hero: true },
                AnimatableSpec { id: ElementId(2), reveal_delay_ms: 0, hero: false, in_any_hero: false },
            ],
            counters: Vec::new(),
            parallax: Vec::new(),
            hover_targets: Vec::new(),
        };

        assert_eq!(manifest.hero_ids().collect::<Vec<_>>(), vec![ElementId(0)]);
        assert_eq!(manifest.lazy_ids().collect::<Vec<_>>(), vec![ElementId(2)]);
        assert_eq!(manifest.label(ElementId(9)), "e9");
    }
}
