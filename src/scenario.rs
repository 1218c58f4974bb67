//! Replay scenarios: a viewport, element geometry and a timeline of input.
//!
//! ```toml
//! frame_interval_ms = 16.0
//! duration_ms = 6000.0
//!
//! [viewport]
//! width = 1280
//! height = 800
//!
//! [[layout]]
//! selector = ".stat-number"
//! y = 1400
//! width = 300
//! height = 80
//!
//! [[events]]
//! at_ms = 3200
//! type = "scroll"
//! scroll_y = 900
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use cadence_markup::PageMarkup;
use cadence_scene::{PageEvent, Rect, StaticLayout, Viewport};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub frame_interval_ms: f64,
    pub duration_ms: f64,
    /// Instant of the page load event.
    pub load_at_ms: f64,
    /// Vertical spacing of the flow layout given to unlisted elements.
    pub flow_spacing_px: f64,
    pub viewport: ViewportSpec,
    pub layout: Vec<LayoutEntry>,
    pub events: Vec<TimedInput>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16.0,
            duration_ms: 5000.0,
            load_at_ms: 0.0,
            flow_spacing_px: 240.0,
            viewport: ViewportSpec::default(),
            layout: Vec::new(),
            events: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ViewportSpec {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportSpec {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

/// Document-space rectangle for every tracked element matching `selector`.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutEntry {
    pub selector: String,
    #[serde(default)]
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub width: Option<f64>,
    pub height: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimedInput {
    pub at_ms: f64,
    #[serde(flatten)]
    pub input: Input,
}

/// Scenario-level input. Pointer targets are named by selector and resolved
/// against the scanned page.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Input {
    PointerMove { x: f64, y: f64 },
    PointerEnter { selector: String },
    PointerLeave { selector: String },
    Scroll { scroll_y: f64 },
    Resize { width: f64, height: f64 },
}

impl Scenario {
    pub fn from_toml(text: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(text).context("invalid scenario")?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in scenario {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        if !(self.frame_interval_ms > 0.0) {
            bail!("frame_interval_ms must be positive");
        }
        if self.duration_ms < 0.0 {
            bail!("duration_ms must not be negative");
        }
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            bail!("viewport must have a positive size");
        }
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport.width, self.viewport.height)
    }

    /// Geometry for every tracked element: explicit entries win, everything
    /// else is stacked down the page in document order.
    pub fn build_layout(&self, markup: &PageMarkup) -> Result<StaticLayout> {
        let mut layout = StaticLayout::new();
        for element in &markup.manifest().elements {
            let y = element.id.0 as f64 * self.flow_spacing_px;
            layout.insert(
                element.id,
                Rect::new(0.0, y, self.viewport.width, self.flow_spacing_px),
            );
        }

        for entry in &self.layout {
            let ids = markup
                .select(&entry.selector)
                .with_context(|| format!("layout selector {:?}", entry.selector))?;
            if ids.is_empty() {
                warn!(selector = %entry.selector, "layout selector matches no tracked element");
            }
            let width = entry.width.unwrap_or(self.viewport.width);
            for id in ids {
                layout.insert(id, Rect::new(entry.x, entry.y, width, entry.height));
            }
        }
        Ok(layout)
    }

    /// The timeline as engine events, in time order, load event included.
    pub fn resolve_events(&self, markup: &PageMarkup) -> Result<Vec<(f64, PageEvent)>> {
        let mut events = vec![(self.load_at_ms, PageEvent::Load)];
        for timed in &self.events {
            let event = match &timed.input {
                Input::PointerMove { x, y } => PageEvent::PointerMove { x: *x, y: *y },
                Input::PointerEnter { selector } => PageEvent::PointerEnter {
                    element: first_match(markup, selector)?,
                },
                Input::PointerLeave { selector } => PageEvent::PointerLeave {
                    element: first_match(markup, selector)?,
                },
                Input::Scroll { scroll_y } => PageEvent::Scroll {
                    scroll_y: *scroll_y,
                },
                Input::Resize { width, height } => PageEvent::Resize {
                    width: *width,
                    height: *height,
                },
            };
            events.push((timed.at_ms, event));
        }
        events.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(events)
    }
}

fn first_match(markup: &PageMarkup, selector: &str) -> Result<cadence_markup::ElementId> {
    let ids = markup
        .select(selector)
        .with_context(|| format!("event selector {selector:?}"))?;
    match ids.first() {
        Some(id) => Ok(*id),
        None => bail!("event selector {selector:?} matches no tracked element"),
    }
}
