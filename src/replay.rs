//! Headless driver: runs a page through a scenario on a simulated frame clock.

use anyhow::Result;
use cadence_config::CadenceConfig;
use cadence_markup::{PageManifest, PageMarkup};
use cadence_scene::{Choreographer, LoadStage, StampedMutation};
use tracing::{debug, info};

use crate::scenario::Scenario;

/// Everything a replay produced.
#[derive(Debug)]
pub struct ReplayReport {
    pub manifest: PageManifest,
    pub mutations: Vec<StampedMutation>,
    pub final_stage: LoadStage,
    pub revealed: usize,
    pub frames: u64,
}

/// Drive the engine from 0 to the scenario duration. Timeline events are
/// dispatched at their own instants, before the frame that follows them.
pub fn replay(markup: PageMarkup, scenario: &Scenario, config: &CadenceConfig) -> Result<ReplayReport> {
    let layout = scenario.build_layout(&markup)?;
    let events = scenario.resolve_events(&markup)?;
    let manifest = markup.into_manifest();

    let mut engine = Choreographer::new(manifest, config, layout, scenario.viewport());
    let mut mutations = engine.drain_mutations();
    let mut pending = events.into_iter().peekable();
    let mut frames = 0u64;

    let mut t = 0.0;
    while t <= scenario.duration_ms {
        while let Some((at_ms, event)) = pending.next_if(|(at_ms, _)| *at_ms <= t) {
            debug!(at_ms, %event, "replaying event");
            engine.dispatch(at_ms, event);
        }
        engine.frame(t);
        if engine.pending_mutations() > 0 {
            mutations.extend(engine.drain_mutations());
        }
        frames += 1;
        t += scenario.frame_interval_ms;
    }

    let skipped = pending.count();
    if skipped > 0 {
        info!(skipped, "events after the end of the scenario were not replayed");
    }

    Ok(ReplayReport {
        manifest: engine.manifest().clone(),
        mutations,
        final_stage: engine.stage(),
        revealed: engine.revealed_count(),
        frames,
    })
}
