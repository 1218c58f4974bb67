use anyhow::{Context, Result};
use cadence_config::CadenceConfig;
use cadence_markup::{ElementId, PageManifest};
use cadence_scene::{
    Choreographer, LoadStage, Mutation, PageEvent, Rect, StampedMutation, StaticLayout, Target,
    Viewport,
};

const FRAME_MS: f64 = 16.0;

const VIEWPORT: Viewport = Viewport {
    width: 1280.0,
    height: 800.0,
};

const LANDING: &str = r##"
<html><body>
    <div id="loader"></div>
    <div id="cursor"></div>
    <div id="cursor-follower"></div>
    <nav id="nav"><a href="#work">Work</a></nav>
    <section class="hero">
        <h1 data-animate>Studio</h1>
        <p data-animate data-delay="200">Tagline</p>
    </section>
    <span class="stat-number" data-count="120">0</span>
    <div class="project" data-animate>
        <div class="project-image"><div class="project-image-inner"></div></div>
    </div>
</body></html>
"##;

const SECONDARY: &str = r#"
<html><body class="is-project-page">
    <div id="loader"></div>
    <div id="cursor"></div>
    <div id="cursor-follower"></div>
    <nav id="nav"></nav>
    <header class="project-hero"><h1 data-animate>Case study</h1></header>
    <span class="stat-number" data-count="40">0</span>
    <p class="body-copy" data-animate>Details</p>
</body></html>
"#;

fn by_class(manifest: &PageManifest, class: &str) -> Result<ElementId> {
    manifest
        .elements
        .iter()
        .find(|el| el.classes.iter().any(|c| c == class))
        .map(|el| el.id)
        .with_context(|| format!("no tracked element with class {class}"))
}

fn run_frames(
    engine: &mut Choreographer<StaticLayout>,
    from_ms: f64,
    to_ms: f64,
) -> Vec<StampedMutation> {
    let mut out = Vec::new();
    let mut t = from_ms;
    while t <= to_ms {
        engine.frame(t);
        out.extend(engine.drain_mutations());
        t += FRAME_MS;
    }
    out
}

fn is_reveal_of(stamped: &StampedMutation, id: ElementId) -> bool {
    matches!(
        &stamped.mutation,
        Mutation::AddClass { target: Target::Element(e), class } if *e == id && class == "animated"
    )
}

struct Landing {
    engine: Choreographer<StaticLayout>,
    heroes: Vec<ElementId>,
    counter: ElementId,
    project: ElementId,
    frame: ElementId,
    inner: ElementId,
    link: ElementId,
}

fn landing(project_y: f64) -> Result<Landing> {
    let config = CadenceConfig::default();
    let manifest = PageManifest::from_html(LANDING, &config)?;
    let heroes: Vec<ElementId> = manifest.hero_ids().collect();
    let counter = by_class(&manifest, "stat-number")?;
    let project = by_class(&manifest, "project")?;
    let frame = by_class(&manifest, "project-image")?;
    let inner = by_class(&manifest, "project-image-inner")?;
    let link = manifest.hover_targets[0];

    let layout = StaticLayout::new()
        .with(counter, Rect::new(100.0, 100.0, 200.0, 60.0))
        .with(project, Rect::new(100.0, project_y, 600.0, 100.0))
        .with(frame, Rect::new(100.0, 1000.0, 600.0, 200.0));

    Ok(Landing {
        engine: Choreographer::new(manifest, &config, layout, VIEWPORT),
        heroes,
        counter,
        project,
        frame,
        inner,
        link,
    })
}

#[test]
fn load_block_is_applied_at_construction() -> Result<()> {
    let mut page = landing(2000.0)?;
    assert_eq!(page.engine.stage(), LoadStage::Loading);
    let first = page.engine.drain_mutations();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].mutation.to_string(), "body overflow: hidden");
    Ok(())
}

#[test]
fn secondary_hero_reveals_with_observers_at_one_second() -> Result<()> {
    let config = CadenceConfig::default();
    let manifest = PageManifest::from_html(SECONDARY, &config)?;
    let hero = manifest.hero_ids().next().context("secondary page has a hero")?;
    let mut engine = Choreographer::new(manifest, &config, StaticLayout::new(), VIEWPORT);

    engine.dispatch(0.0, PageEvent::Load);
    engine.advance_to(999.0);
    assert_eq!(engine.stage(), LoadStage::LoaderDone);
    assert!(!engine.is_revealed(hero));

    engine.advance_to(1000.0);
    assert_eq!(engine.stage(), LoadStage::ObserversArmed);
    assert!(engine.is_revealed(hero));

    let mutations = engine.drain_mutations();
    let reveal = mutations
        .iter()
        .find(|m| is_reveal_of(m, hero))
        .context("hero reveal emitted")?;
    assert_eq!(reveal.at_ms, 1000.0);

    let lift = mutations
        .iter()
        .find(|m| m.mutation.target() == Target::Loader)
        .context("loader lifted")?;
    assert_eq!(lift.at_ms, 600.0);
    Ok(())
}

#[test]
fn hero_reveals_follow_their_own_delay() -> Result<()> {
    let mut page = landing(2000.0)?;
    page.engine.dispatch(0.0, PageEvent::Load);
    let mutations = run_frames(&mut page.engine, 0.0, 3200.0);

    let times: Vec<f64> = page
        .heroes
        .iter()
        .map(|&id| {
            mutations
                .iter()
                .find(|m| is_reveal_of(m, id))
                .map(|m| m.at_ms)
                .unwrap_or(f64::NAN)
        })
        .collect();
    // 2400 loader + 400 buffer, then each hero's own delay.
    assert_eq!(times, vec![2800.0, 3000.0]);
    Ok(())
}

#[test]
fn no_lazy_reveal_before_observers_are_armed() -> Result<()> {
    // The project sits inside the first screen from the very start.
    let mut page = landing(300.0)?;
    page.engine.dispatch(0.0, PageEvent::Load);

    let mut t = 0.0;
    while t <= 3200.0 {
        page.engine.frame(t);
        if page.engine.is_revealed(page.project) {
            assert_eq!(page.engine.stage(), LoadStage::ObserversArmed);
        }
        t += FRAME_MS;
    }
    assert!(page.engine.is_revealed(page.project));

    let mutations = page.engine.drain_mutations();
    let reveal = mutations
        .iter()
        .find(|m| is_reveal_of(m, page.project))
        .context("project revealed")?;
    assert!(reveal.at_ms >= 2800.0);
    Ok(())
}

#[test]
fn lazy_reveal_happens_once_across_reentry() -> Result<()> {
    let mut page = landing(1200.0)?;
    page.engine.dispatch(0.0, PageEvent::Load);
    let mut mutations = run_frames(&mut page.engine, 0.0, 2900.0);
    assert!(!page.engine.is_revealed(page.project));

    for (at, scroll_y) in [(2900.0, 600.0), (2950.0, 0.0), (3000.0, 600.0), (3050.0, 0.0)] {
        page.engine.dispatch(at, PageEvent::Scroll { scroll_y });
        page.engine.frame(at + FRAME_MS);
        mutations.extend(page.engine.drain_mutations());
    }

    assert!(page.engine.is_revealed(page.project));
    let reveals = mutations.iter().filter(|m| is_reveal_of(m, page.project)).count();
    assert_eq!(reveals, 1);
    Ok(())
}

#[test]
fn counter_ends_exactly_on_target() -> Result<()> {
    let mut page = landing(2000.0)?;
    page.engine.dispatch(0.0, PageEvent::Load);
    let mutations = run_frames(&mut page.engine, 0.0, 5200.0);

    let values: Vec<u64> = mutations
        .iter()
        .filter_map(|m| match &m.mutation {
            Mutation::SetText {
                target: Target::Element(id),
                text,
            } if *id == page.counter => text.parse().ok(),
            _ => None,
        })
        .collect();

    assert!(!values.is_empty());
    assert!(values.windows(2).all(|w| w[0] <= w[1]), "non-decreasing: {values:?}");
    assert!(values.iter().all(|&v| v <= 120));
    assert_eq!(values.last(), Some(&120));
    assert_eq!(page.engine.counter_value(page.counter), Some(120));
    Ok(())
}

#[test]
fn secondary_page_never_runs_counters() -> Result<()> {
    let config = CadenceConfig::default();
    let manifest = PageManifest::from_html(SECONDARY, &config)?;
    let counter = by_class(&manifest, "stat-number")?;
    let layout = StaticLayout::new().with(counter, Rect::new(0.0, 100.0, 100.0, 40.0));
    let mut engine = Choreographer::new(manifest, &config, layout, VIEWPORT);

    engine.dispatch(0.0, PageEvent::Load);
    let mutations = run_frames(&mut engine, 0.0, 4000.0);
    assert!(
        mutations
            .iter()
            .all(|m| !matches!(m.mutation, Mutation::SetText { .. }))
    );
    assert_eq!(engine.counter_value(counter), Some(0));
    Ok(())
}

#[test]
fn follower_converges_geometrically() -> Result<()> {
    let mut page = landing(2000.0)?;
    page.engine.dispatch(0.0, PageEvent::PointerMove { x: 300.0, y: 100.0 });

    let mut bound_x = 300.0;
    let mut bound_y = 100.0;
    let mut t = 0.0;
    for _ in 0..120 {
        page.engine.frame(t);
        bound_x *= 0.88;
        bound_y *= 0.88;
        let cursor = *page.engine.cursor();
        assert!(cursor.follower_x <= 300.0 && cursor.follower_y <= 100.0);
        assert!((300.0 - cursor.follower_x) <= bound_x + 1e-9);
        assert!((100.0 - cursor.follower_y) <= bound_y + 1e-9);
        t += FRAME_MS;
    }

    let mutations = page.engine.drain_mutations();
    let first_raw = mutations
        .iter()
        .find(|m| m.mutation.target() == Target::Cursor)
        .context("raw cursor written")?;
    assert_eq!(first_raw.mutation.to_string(), "cursor left: 300px");
    Ok(())
}

#[test]
fn centered_parallax_frame_has_zero_offset() -> Result<()> {
    let mut page = landing(2000.0)?;
    page.engine.drain_mutations();

    // Frame at document y 1000, height 200: scroll 700 puts its top at 300,
    // which is progress 0.5 in an 800px viewport.
    page.engine.dispatch(10.0, PageEvent::Scroll { scroll_y: 700.0 });
    let mutations = page.engine.drain_mutations();
    let transform = mutations
        .iter()
        .find(|m| m.mutation.target() == Target::Element(page.inner))
        .context("parallax offset written")?;
    assert_eq!(
        transform.mutation.to_string(),
        format!("{} transform: translateY(0px)", page.inner)
    );

    // Far above the viewport: left untouched.
    page.engine.dispatch(20.0, PageEvent::Scroll { scroll_y: 5000.0 });
    let untouched = page.engine.drain_mutations();
    assert!(
        untouched
            .iter()
            .all(|m| m.mutation.target() != Target::Element(page.inner))
    );
    assert_ne!(page.frame, page.inner);
    Ok(())
}

#[test]
fn nav_and_hover_classes() -> Result<()> {
    let mut page = landing(2000.0)?;
    page.engine.drain_mutations();

    page.engine.dispatch(5.0, PageEvent::PointerEnter { element: page.link });
    page.engine.dispatch(6.0, PageEvent::PointerEnter { element: page.heroes[0] });
    page.engine.dispatch(7.0, PageEvent::PointerLeave { element: page.link });
    page.engine.dispatch(8.0, PageEvent::Scroll { scroll_y: 80.0 });
    page.engine.dispatch(9.0, PageEvent::Scroll { scroll_y: 120.0 });

    let written: Vec<String> = page
        .engine
        .drain_mutations()
        .iter()
        .filter(|m| matches!(m.mutation.target(), Target::Body | Target::Nav))
        .map(|m| m.mutation.to_string())
        .collect();
    assert_eq!(
        written,
        vec!["body +.cursor-hover", "body -.cursor-hover", "nav +.scrolled"]
    );
    assert_eq!(page.engine.scroll().last_scroll_y, 120.0);
    Ok(())
}

#[test]
fn duplicate_load_is_ignored() -> Result<()> {
    let mut page = landing(2000.0)?;
    page.engine.dispatch(0.0, PageEvent::Load);
    page.engine.dispatch(100.0, PageEvent::Load);
    let mutations = run_frames(&mut page.engine, 0.0, 3000.0);

    let lifts: Vec<f64> = mutations
        .iter()
        .filter(|m| m.mutation.target() == Target::Loader)
        .map(|m| m.at_ms)
        .collect();
    assert_eq!(lifts, vec![2400.0]);
    Ok(())
}

#[test]
fn mutations_serialize_for_hosts() -> Result<()> {
    let mut page = landing(2000.0)?;
    let value = serde_json::to_value(page.engine.drain_mutations())?;
    let first = &value[0];
    assert_eq!(first["at_ms"], 0.0);
    assert_eq!(first["op"], "set_style");
    assert_eq!(first["target"]["kind"], "body");
    assert_eq!(first["property"], "overflow");
    assert_eq!(first["value"], "hidden");
    Ok(())
}

#[test]
fn resize_updates_viewport_without_touching_parallax() -> Result<()> {
    let mut page = landing(2000.0)?;
    page.engine.dispatch(5.0, PageEvent::Scroll { scroll_y: 700.0 });
    page.engine.drain_mutations();

    page.engine.dispatch(10.0, PageEvent::Resize { width: 1024.0, height: 600.0 });
    assert_eq!(page.engine.pending_mutations(), 0);

    // The next scroll measures against the new viewport height.
    page.engine.dispatch(20.0, PageEvent::Scroll { scroll_y: 700.0 });
    let mutations = page.engine.drain_mutations();
    let transform = mutations
        .iter()
        .find(|m| m.mutation.target() == Target::Element(page.inner))
        .context("parallax offset written on scroll")?;
    // top 300, height 200, vh 600: progress 0.375, offset -2.5.
    assert_eq!(
        transform.mutation.to_string(),
        format!("{} transform: translateY(-2.5px)", page.inner)
    );
    Ok(())
}

#[test]
fn revealed_count_and_pending_mutations_track_the_session() -> Result<()> {
    let mut page = landing(300.0)?;
    assert_eq!(page.engine.pending_mutations(), 1);
    page.engine.drain_mutations();
    assert_eq!(page.engine.pending_mutations(), 0);

    page.engine.dispatch(0.0, PageEvent::Load);
    run_frames(&mut page.engine, 0.0, 2784.0);
    assert_eq!(page.engine.revealed_count(), 0);

    run_frames(&mut page.engine, 2800.0, 3200.0);
    // Two heroes plus the in-view project.
    assert_eq!(page.engine.revealed_count(), 3);
    Ok(())
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "follower_smoothing must be in (0, 1)")]
fn unvalidated_smoothing_is_rejected() {
    let mut config = CadenceConfig::default();
    config.timing.follower_smoothing = 1.5;
    let manifest = PageManifest::from_html(SECONDARY, &config).expect("fixture scans");
    let _ = Choreographer::new(manifest, &config, StaticLayout::new(), VIEWPORT);
}
