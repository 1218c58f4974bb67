//! Page-load gate.
//!
//! `Loading -> LoaderDone -> HeroRevealed -> ObserversArmed`. Each transition
//! is a method that only succeeds from the preceding stage, so a stray or
//! duplicated task can never skip or repeat a stage.

use serde::Serialize;
use tracing::debug;

use crate::mutation::{Mutation, MutationQueue, StyleProperty, Target};
use crate::scheduler::{Scheduler, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStage {
    Loading,
    LoaderDone,
    HeroRevealed,
    ObserversArmed,
}

#[derive(Debug)]
pub struct LoadStateController {
    stage: LoadStage,
    loaded_at_ms: Option<f64>,
    loader_delay_ms: f64,
    hero_stage_delay_ms: f64,
    loader_done_class: String,
}

impl LoadStateController {
    pub fn new(
        loader_delay_ms: f64,
        hero_stage_delay_ms: f64,
        loader_done_class: impl Into<String>,
    ) -> Self {
        Self {
            stage: LoadStage::Loading,
            loaded_at_ms: None,
            loader_delay_ms,
            hero_stage_delay_ms,
            loader_done_class: loader_done_class.into(),
        }
    }

    pub fn stage(&self) -> LoadStage {
        self.stage
    }

    /// Enter the load-blocked state.
    pub fn block(&self, at_ms: f64, queue: &mut MutationQueue) {
        queue.push(
            at_ms,
            Mutation::set_style(Target::Body, StyleProperty::Overflow, "hidden"),
        );
    }

    /// Handle the load event. Only the first one schedules the loader lift.
    pub fn on_load(&mut self, scheduler: &mut Scheduler) -> bool {
        if self.loaded_at_ms.is_some() {
            debug!("duplicate load event ignored");
            return false;
        }
        let now = scheduler.now_ms();
        self.loaded_at_ms = Some(now);
        let due = scheduler.schedule_in(self.loader_delay_ms, Task::LiftLoader);
        debug!(loaded_at_ms = now, lift_at_ms = due, "page loaded");
        true
    }

    /// `Loading -> LoaderDone`: dismiss the loader, unblock the page and
    /// schedule the hero stage.
    pub fn lift(&mut self, scheduler: &mut Scheduler, queue: &mut MutationQueue) -> bool {
        if self.stage != LoadStage::Loading {
            return false;
        }
        let now = scheduler.now_ms();
        self.stage = LoadStage::LoaderDone;
        queue.push(now, Mutation::add_class(Target::Loader, &self.loader_done_class));
        queue.push(
            now,
            Mutation::set_style(Target::Body, StyleProperty::Overflow, "auto"),
        );
        scheduler.schedule_in(self.hero_stage_delay_ms, Task::HeroStage);
        debug!(at_ms = now, "loader lifted");
        true
    }

    /// `LoaderDone -> HeroRevealed`.
    pub fn enter_hero_stage(&mut self, at_ms: f64) -> bool {
        if self.stage != LoadStage::LoaderDone {
            return false;
        }
        self.stage = LoadStage::HeroRevealed;
        debug!(at_ms, "hero stage");
        true
    }

    /// `HeroRevealed -> ObserversArmed`.
    pub fn arm_observers(&mut self, at_ms: f64) -> bool {
        if self.stage != LoadStage::HeroRevealed {
            return false;
        }
        self.stage = LoadStage::ObserversArmed;
        debug!(at_ms, "observers armed");
        true
    }
}
