use std::collections::{HashMap, HashSet};
use std::path::Path;

use cadence_config::{CadenceConfig, PageKindSetting};
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::attributes::{is_degraded_delay, parse_count, parse_delay_ms};
use crate::error::{MarkupError, Result};
use crate::manifest::{
    Anchor, AnimatableSpec, CounterSpec, ElementId, PageKind, PageManifest, ParallaxSpec,
    TrackedElement,
};

/// A parsed page together with its manifest.
///
/// Keeps the document around so callers can resolve further selectors to
/// tracked [`ElementId`]s (the replay driver uses this for layout and hover
/// scripting).
pub struct PageMarkup {
    document: Html,
    index: HashMap<NodeId, ElementId>,
    manifest: PageManifest,
}

impl PageManifest {
    /// Scan `html` and return only the manifest.
    pub fn from_html(html: &str, config: &CadenceConfig) -> Result<Self> {
        PageMarkup::parse(html, config).map(PageMarkup::into_manifest)
    }
}

struct Selectors {
    animatable: Selector,
    landing_hero: Selector,
    secondary_hero: Selector,
    counter: Selector,
    parallax_inner: Selector,
    hover_targets: Vec<Selector>,
}

impl Selectors {
    fn compile(config: &CadenceConfig) -> Result<Self> {
        let s = &config.selectors;
        Ok(Self {
            animatable: compile(&s.animatable)?,
            landing_hero: compile(&s.landing_hero)?,
            secondary_hero: compile(&s.secondary_hero)?,
            counter: compile(&s.counter)?,
            parallax_inner: compile(&s.parallax_inner)?,
            hover_targets: s
                .hover_targets
                .iter()
                .map(|sel| compile(sel))
                .collect::<Result<Vec<_>>>()?,
        })
    }

    fn hero_for(&self, kind: PageKind) -> &Selector {
        match kind {
            PageKind::Landing => &self.landing_hero,
            PageKind::Secondary => &self.secondary_hero,
        }
    }
}

impl PageMarkup {
    /// Parse a page and build its manifest.
    ///
    /// Fails when a configured selector does not compile or when one of the
    /// anchors (loader, cursor, follower, nav) is missing.
    pub fn parse(html: &str, config: &CadenceConfig) -> Result<Self> {
        let document = Html::parse_document(html);
        let selectors = Selectors::compile(config)?;

        for anchor in Anchor::ALL {
            let css = anchor_selector(config, anchor);
            if document.select(&compile(css)?).next().is_none() {
                return Err(MarkupError::MissingAnchor {
                    anchor,
                    selector: css.to_string(),
                });
            }
        }

        let kind = resolve_kind(&document, config);
        let page_hero = selectors.hero_for(kind);
        let delay_attr = config.selectors.delay_attribute.as_str();
        let count_attr = config.selectors.count_attribute.as_str();

        let mut wanted: HashSet<NodeId> = HashSet::new();

        let animatable_nodes: Vec<ElementRef<'_>> = document.select(&selectors.animatable).collect();
        wanted.extend(animatable_nodes.iter().map(|el| el.id()));

        let mut counter_nodes = Vec::new();
        for el in document.select(&selectors.counter) {
            let raw = el.value().attr(count_attr).unwrap_or_default();
            match parse_count(raw) {
                Some(target) => {
                    wanted.insert(el.id());
                    counter_nodes.push((el.id(), target));
                }
                None => warn!(value = %raw, "counter target is not numeric, skipping element"),
            }
        }

        let mut parallax_nodes = Vec::new();
        for inner in document.select(&selectors.parallax_inner) {
            match inner.parent().and_then(ElementRef::wrap) {
                Some(frame) => {
                    wanted.insert(inner.id());
                    wanted.insert(frame.id());
                    parallax_nodes.push((inner.id(), frame.id()));
                }
                None => warn!("parallax element has no parent element, skipping"),
            }
        }

        let mut hover_nodes = HashSet::new();
        for selector in &selectors.hover_targets {
            hover_nodes.extend(document.select(selector).map(|el| el.id()));
        }
        wanted.extend(hover_nodes.iter().copied());

        // Ids follow document order, independent of the order selectors ran in.
        let mut index = HashMap::new();
        let mut elements = Vec::new();
        let mut hover_targets = Vec::new();
        for node in document.tree.root().descendants() {
            let Some(el) = ElementRef::wrap(node) else {
                continue;
            };
            if !wanted.contains(&el.id()) {
                continue;
            }
            let id = ElementId(elements.len() as u32);
            index.insert(el.id(), id);
            if hover_nodes.contains(&el.id()) {
                hover_targets.push(id);
            }
            let value = el.value();
            elements.push(TrackedElement {
                id,
                tag: value.name().to_ascii_lowercase(),
                html_id: value.id().map(str::to_string),
                classes: value.classes().map(str::to_string).collect(),
            });
        }

        let animatables = animatable_nodes
            .iter()
            .map(|el| {
                let raw_delay = el.value().attr(delay_attr);
                let reveal_delay_ms = parse_delay_ms(raw_delay);
                if let Some(raw) = raw_delay.filter(|raw| is_degraded_delay(raw)) {
                    warn!(value = %raw, "reveal delay is not a non-negative integer, using 0");
                }
                AnimatableSpec {
                    id: index[&el.id()],
                    reveal_delay_ms,
                    hero: within(el, page_hero),
                    in_any_hero: within(el, &selectors.landing_hero)
                        || within(el, &selectors.secondary_hero),
                }
            })
            .collect::<Vec<_>>();

        let counters = counter_nodes
            .into_iter()
            .map(|(node, target)| CounterSpec {
                id: index[&node],
                target,
            })
            .collect::<Vec<_>>();

        let parallax = parallax_nodes
            .into_iter()
            .map(|(inner, frame)| ParallaxSpec {
                inner: index[&inner],
                frame: index[&frame],
            })
            .collect::<Vec<_>>();

        debug!(
            ?kind,
            tracked = elements.len(),
            animatables = animatables.len(),
            counters = counters.len(),
            parallax = parallax.len(),
            hover_targets = hover_targets.len(),
            "scanned page"
        );

        Ok(Self {
            document,
            index,
            manifest: PageManifest {
                kind,
                elements,
                animatables,
                counters,
                parallax,
                hover_targets,
            },
        })
    }

    /// Read and scan a page from disk.
    pub fn from_file(path: &Path, config: &CadenceConfig) -> Result<Self> {
        let html = std::fs::read_to_string(path).map_err(|source| MarkupError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&html, config)
    }

    pub fn manifest(&self) -> &PageManifest {
        &self.manifest
    }

    pub fn into_manifest(self) -> PageManifest {
        self.manifest
    }

    /// Tracked elements matching `css`, in document order. Untracked matches
    /// are skipped.
    pub fn select(&self, css: &str) -> Result<Vec<ElementId>> {
        let selector = compile(css)?;
        Ok(self
            .document
            .select(&selector)
            .filter_map(|el| self.index.get(&el.id()).copied())
            .collect())
    }
}

fn compile(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| MarkupError::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

fn anchor_selector(config: &CadenceConfig, anchor: Anchor) -> &str {
    let s = &config.selectors;
    match anchor {
        Anchor::Loader => &s.loader,
        Anchor::Cursor => &s.cursor,
        Anchor::Follower => &s.follower,
        Anchor::Nav => &s.nav,
    }
}

fn resolve_kind(document: &Html, config: &CadenceConfig) -> PageKind {
    match config.page.kind {
        PageKindSetting::Landing => PageKind::Landing,
        PageKindSetting::Secondary => PageKind::Secondary,
        PageKindSetting::Auto => {
            let marker = config.classes.secondary_page.as_str();
            let secondary = Selector::parse("body")
                .ok()
                .and_then(|body| document.select(&body).next())
                .is_some_and(|body| body.value().classes().any(|c| c == marker));
            if secondary {
                PageKind::Secondary
            } else {
                PageKind::Landing
            }
        }
    }
}

/// True when some ancestor of `el` matches `container`.
fn within(el: &ElementRef<'_>, container: &Selector) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| container.matches(&ancestor))
}
