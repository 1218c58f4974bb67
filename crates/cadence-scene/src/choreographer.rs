//! Session wiring: routes events, timers and frames to the components.
//!
//! ```ignore
//! let mut engine = Choreographer::new(manifest, &config, layout, viewport);
//! engine.dispatch(0.0, PageEvent::Load);
//! loop {
//!     engine.frame(now_ms());
//!     for stamped in engine.drain_mutations() {
//!         host.apply(stamped.mutation);
//!     }
//! }
//! ```

use cadence_config::CadenceConfig;
use cadence_markup::{ElementId, PageKind, PageManifest};
use static_assertions::assert_impl_all;
use tracing::{debug, trace};

use crate::context::{CursorState, ScrollState, SessionContext};
use crate::counter::CounterAnimator;
use crate::cursor::CursorFollower;
use crate::events::PageEvent;
use crate::geometry::{Rect, RootMargin, Viewport, WatchOptions};
use crate::layout::{LayoutSource, StaticLayout};
use crate::loader::{LoadStage, LoadStateController};
use crate::mutation::{Mutation, MutationQueue, StampedMutation, Target};
use crate::nav::NavScrollStyler;
use crate::parallax::ParallaxScroller;
use crate::reveal::ViewportRevealObserver;
use crate::scheduler::{FrameTask, Scheduler, Task};

/// The orchestration engine for one page session.
///
/// Single-threaded and host-driven: every method takes the current time in
/// milliseconds, and all visible effects are collected as mutations for the
/// host to apply.
pub struct Choreographer<L: LayoutSource> {
    manifest: PageManifest,
    context: SessionContext,
    scheduler: Scheduler,
    mutations: MutationQueue,
    layout: L,
    loader: LoadStateController,
    reveals: ViewportRevealObserver,
    counters: CounterAnimator,
    cursor: CursorFollower,
    parallax: ParallaxScroller,
    nav: NavScrollStyler,
    revealed_class: String,
}

assert_impl_all!(Choreographer<StaticLayout>: Send);

impl<L: LayoutSource> Choreographer<L> {
    /// Start a session at time 0: the page is interactive, blocked behind the
    /// loader, and the follower chain is running.
    ///
    /// `config` is expected to have passed [`CadenceConfig::validate`]; in
    /// particular `timing.follower_smoothing` must lie in (0, 1) for the
    /// follower to converge without overshooting.
    pub fn new(manifest: PageManifest, config: &CadenceConfig, layout: L, viewport: Viewport) -> Self {
        let timing = &config.timing;
        debug_assert!(
            timing.follower_smoothing > 0.0 && timing.follower_smoothing < 1.0,
            "follower_smoothing must be in (0, 1), got {}",
            timing.follower_smoothing
        );
        let observers = &config.observers;
        let classes = &config.classes;

        let loader_delay_ms = match manifest.kind {
            PageKind::Landing => timing.loader_delay_landing_ms,
            PageKind::Secondary => timing.loader_delay_secondary_ms,
        };
        let reveal_options = WatchOptions {
            threshold: observers.reveal_threshold,
            root_margin: RootMargin::bottom_inset(observers.reveal_bottom_inset_px),
        };
        let counter_options = WatchOptions {
            threshold: observers.counter_threshold,
            root_margin: RootMargin::default(),
        };

        let mut engine = Self {
            context: SessionContext::new(manifest.kind, viewport),
            scheduler: Scheduler::new(),
            mutations: MutationQueue::new(),
            layout,
            loader: LoadStateController::new(
                loader_delay_ms as f64,
                timing.hero_stage_delay_ms as f64,
                classes.loader_done.as_str(),
            ),
            reveals: ViewportRevealObserver::new(&manifest, reveal_options),
            counters: CounterAnimator::new(
                &manifest,
                counter_options,
                timing.counter_duration_ms as f64,
            ),
            cursor: CursorFollower::new(
                timing.follower_smoothing,
                manifest.hover_targets.iter().copied(),
                classes.cursor_hover.as_str(),
            ),
            parallax: ParallaxScroller::new(manifest.parallax.clone(), timing.parallax_scale_px),
            nav: NavScrollStyler::new(timing.nav_scrolled_threshold_px, classes.nav_scrolled.as_str()),
            revealed_class: classes.revealed.clone(),
            manifest,
        };

        engine.loader.block(0.0, &mut engine.mutations);
        engine.scheduler.request_frame(FrameTask::FollowCursor);
        debug!(
            kind = ?engine.manifest.kind,
            loader_delay_ms,
            animatables = engine.manifest.animatables.len(),
            counters = engine.manifest.counters.len(),
            "session started"
        );
        engine
    }

    /// Run due timers, then handle `event` at `at_ms`.
    pub fn dispatch(&mut self, at_ms: f64, event: PageEvent) {
        self.advance_to(at_ms);
        let now = self.scheduler.now_ms();
        trace!(at_ms = now, %event, "dispatch");

        match event {
            PageEvent::Load => {
                self.loader.on_load(&mut self.scheduler);
            }
            PageEvent::PointerMove { x, y } => {
                self.cursor
                    .on_pointer_move(&mut self.context, x, y, now, &mut self.mutations);
            }
            PageEvent::PointerEnter { element } => {
                self.cursor.on_pointer_enter(element, now, &mut self.mutations);
            }
            PageEvent::PointerLeave { element } => {
                self.cursor.on_pointer_leave(element, now, &mut self.mutations);
            }
            PageEvent::Scroll { scroll_y } => {
                self.nav
                    .on_scroll(&mut self.context, scroll_y, now, &mut self.mutations);
                self.update_parallax(now);
            }
            PageEvent::Resize { width, height } => {
                self.context.resize(Viewport::new(width, height));
            }
        }
    }

    /// Run every timer due at or before `at_ms`, in (due, insertion) order.
    pub fn advance_to(&mut self, at_ms: f64) {
        while let Some(task) = self.scheduler.pop_due(at_ms) {
            self.run_task(task);
        }
        self.scheduler.advance_clock(at_ms);
    }

    /// One frame: timers, then the frame tasks requested before this tick,
    /// then the visibility pass.
    pub fn frame(&mut self, at_ms: f64) {
        self.advance_to(at_ms);
        let now = self.scheduler.now_ms();

        for task in self.scheduler.take_frame_requests() {
            match task {
                FrameTask::FollowCursor => {
                    self.cursor.follow(&mut self.context, now, &mut self.mutations);
                    self.scheduler.request_frame(FrameTask::FollowCursor);
                }
                FrameTask::CounterTick(id) => self.tick_counter(id, now),
            }
        }

        self.observe(now);
    }

    fn run_task(&mut self, task: Task) {
        let now = self.scheduler.now_ms();
        match task {
            Task::LiftLoader => {
                self.loader.lift(&mut self.scheduler, &mut self.mutations);
            }
            Task::HeroStage => self.hero_stage(now),
            Task::Reveal(id) => {
                if self.reveals.complete(id) {
                    trace!(element = %id, at_ms = now, "revealed");
                    self.mutations.push(
                        now,
                        Mutation::add_class(Target::Element(id), &self.revealed_class),
                    );
                }
            }
        }
    }

    fn hero_stage(&mut self, now: f64) {
        if !self.loader.enter_hero_stage(now) {
            return;
        }
        for id in self.reveals.hero_ids() {
            if let Some(delay_ms) = self.reveals.trigger(id, now) {
                self.scheduler.schedule_in(delay_ms as f64, Task::Reveal(id));
            }
        }
        self.reveals.arm();
        if self.manifest.kind == PageKind::Landing {
            self.counters.arm();
        }
        self.loader.arm_observers(now);
    }

    fn tick_counter(&mut self, id: ElementId, now: f64) {
        let frame = self.counters.tick(id, now);
        if let Some(value) = frame.changed {
            self.mutations.push(
                now,
                Mutation::SetText {
                    target: Target::Element(id),
                    text: value.to_string(),
                },
            );
        }
        if frame.running {
            self.scheduler.request_frame(FrameTask::CounterTick(id));
        }
    }

    fn observe(&mut self, now: f64) {
        let viewport = self.context.viewport();
        let scroll_y = self.context.scroll().last_scroll_y;
        let layout = &self.layout;
        let locate = |id: ElementId| viewport_rect(layout, scroll_y, id);

        for (id, delay_ms) in self.reveals.scan(now, viewport, locate) {
            self.scheduler.schedule_in(delay_ms as f64, Task::Reveal(id));
        }
        for id in self.counters.scan(now, viewport, locate) {
            self.scheduler.request_frame(FrameTask::CounterTick(id));
        }
        // Reveals without a delay are applied within this frame.
        self.advance_to(now);
    }

    fn update_parallax(&mut self, now: f64) {
        let viewport = self.context.viewport();
        let scroll_y = self.context.scroll().last_scroll_y;
        let layout = &self.layout;
        self.parallax.update(
            viewport,
            |id| viewport_rect(layout, scroll_y, id),
            now,
            &mut self.mutations,
        );
    }

    /// Take every mutation produced so far, in production order.
    pub fn drain_mutations(&mut self) -> Vec<StampedMutation> {
        self.mutations.drain().collect()
    }

    pub fn pending_mutations(&self) -> usize {
        self.mutations.len()
    }

    pub fn stage(&self) -> LoadStage {
        self.loader.stage()
    }

    pub fn is_revealed(&self, id: ElementId) -> bool {
        self.reveals.is_revealed(id)
    }

    /// Number of animatable elements revealed so far.
    pub fn revealed_count(&self) -> usize {
        self.reveals.revealed_count()
    }

    pub fn counter_value(&self, id: ElementId) -> Option<u64> {
        self.counters.value(id)
    }

    pub fn cursor(&self) -> &CursorState {
        self.context.cursor()
    }

    pub fn scroll(&self) -> &ScrollState {
        self.context.scroll()
    }

    pub fn manifest(&self) -> &PageManifest {
        &self.manifest
    }

}

fn viewport_rect<L: LayoutSource>(layout: &L, scroll_y: f64, id: ElementId) -> Option<Rect> {
    layout.document_rect(id).map(|rect| rect.offset_y(-scroll_y))
}
