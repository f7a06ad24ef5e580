//! The narrative state machine.

use std::time::Duration;

use rustc_hash::FxHashMap;

use crate::animation::AnimationSequencer;
use crate::choreography::scheduler::Scheduler;
use crate::choreography::script::{Action, ChoreographyScript, TimedAction, Trigger};
use crate::errors::{Result, VitrineError};
use crate::interaction::{AnnotationManager, RegionManager};
use crate::scene::{CameraRig, Scene};
use crate::utils::interner::{intern, resolve};
use crate::utils::Symbol;

/// Interned stage name.
pub type StageId = Symbol;

/// Everything an action may touch, borrowed for one dispatch.
pub struct StageContext<'a> {
    pub scene: &'a mut Scene,
    pub annotations: &'a mut AnnotationManager,
    pub regions: &'a mut RegionManager,
    pub sequencer: &'a mut AnimationSequencer,
    pub camera_rig: &'a mut CameraRig,
}

#[derive(Debug)]
struct CompiledTransition {
    to: StageId,
    actions: Vec<TimedAction>,
}

/// Runs a [`ChoreographyScript`].
///
/// Triggers that have no transition from the current stage are logged and
/// ignored, so an out-of-order click can never advance the story.
#[derive(Debug)]
pub struct Choreographer {
    stage: StageId,
    table: FxHashMap<(StageId, Trigger), CompiledTransition>,
    scheduler: Scheduler<Action>,
    cancel_stale_actions: bool,
}

impl Choreographer {
    /// Compiles `script`, checking every annotation and region it names
    /// against the managers.
    pub fn new(script: &ChoreographyScript, annotations: &AnnotationManager, regions: &RegionManager) -> Result<Self> {
        if script.initial.is_empty() {
            return Err(VitrineError::Config("choreography has no initial stage".into()));
        }

        let mut table = FxHashMap::default();
        for (i, t) in script.transitions.iter().enumerate() {
            if t.from.is_empty() || t.to.is_empty() {
                return Err(VitrineError::Config(format!("transition {i} has an empty stage name")));
            }
            check_trigger(&t.trigger, annotations, regions)
                .map_err(|e| VitrineError::Config(format!("transition {i}: {e}")))?;
            for timed in &t.actions {
                check_action(&timed.action, annotations, regions)
                    .map_err(|e| VitrineError::Config(format!("transition {i}: {e}")))?;
            }

            let key = (intern(&t.from), t.trigger.clone());
            let compiled = CompiledTransition {
                to: intern(&t.to),
                actions: t.actions.clone(),
            };
            if table.insert(key, compiled).is_some() {
                return Err(VitrineError::Config(format!(
                    "duplicate transition from '{}' on {}",
                    t.from, t.trigger
                )));
            }
        }

        let initial = intern(&script.initial);
        let reachable = table.keys().any(|(from, _)| *from == initial);
        if !script.transitions.is_empty() && !reachable {
            return Err(VitrineError::Config(format!(
                "initial stage '{}' has no outgoing transition",
                script.initial
            )));
        }

        Ok(Self {
            stage: initial,
            table,
            scheduler: Scheduler::new(),
            cancel_stale_actions: script.cancel_stale_actions,
        })
    }

    #[inline]
    #[must_use]
    pub fn stage(&self) -> StageId {
        self.stage
    }

    #[must_use]
    pub fn stage_name(&self) -> &'static str {
        resolve(self.stage)
    }

    /// Whether `trigger` would advance the narrative from the current stage.
    #[must_use]
    pub fn accepts(&self, trigger: &Trigger) -> bool {
        self.table.contains_key(&(self.stage, trigger.clone()))
    }

    /// Delayed actions still waiting to fire.
    #[must_use]
    pub fn pending_actions(&self) -> usize {
        self.scheduler.pending()
    }

    /// Applies `trigger`. Returns whether a transition was taken.
    pub fn fire(&mut self, trigger: &Trigger, ctx: &mut StageContext<'_>) -> bool {
        let Some(transition) = self.table.get(&(self.stage, trigger.clone())) else {
            log::info!(
                "Ignoring {trigger} in stage '{}': no transition",
                resolve(self.stage)
            );
            return false;
        };

        let from = self.stage;
        let to = transition.to;
        log::info!("Stage '{}' -> '{}' on {trigger}", resolve(from), resolve(to));

        if self.cancel_stale_actions {
            let dropped = self.scheduler.cancel_except(to);
            if dropped > 0 {
                log::debug!("Cancelled {dropped} pending action(s) of stage '{}'", resolve(from));
            }
        }
        self.stage = to;

        for timed in &transition.actions {
            if timed.delay_ms == 0 {
                execute(&timed.action, ctx);
            } else {
                self.scheduler
                    .schedule(to, Duration::from_millis(timed.delay_ms), timed.action.clone());
            }
        }
        true
    }

    /// Advances delayed actions by `dt` seconds and runs those that came due.
    pub fn tick(&mut self, dt: f32, ctx: &mut StageContext<'_>) {
        for action in self.scheduler.advance(dt) {
            execute(&action, ctx);
        }
    }
}

type CheckResult = std::result::Result<(), String>;

fn check_trigger(trigger: &Trigger, annotations: &AnnotationManager, regions: &RegionManager) -> CheckResult {
    match trigger {
        Trigger::Annotation(name) => check_annotation(name, annotations),
        Trigger::Region(name) => check_region(name, regions),
    }
}

fn check_action(action: &Action, annotations: &AnnotationManager, regions: &RegionManager) -> CheckResult {
    match action {
        Action::ShowAnnotation { name } | Action::HideAnnotation { name } => check_annotation(name, annotations),
        Action::ShowRegion { name } | Action::HideRegion { name } | Action::PulseRegion { name, .. } => {
            check_region(name, regions)
        }
        Action::PlayClip { play, .. } if play.is_empty() => Err("clip name is empty".into()),
        Action::FocusCamera { duration, .. } if !duration.is_finite() || *duration < 0.0 => {
            Err(format!("invalid camera focus duration {duration}"))
        }
        Action::PlayClip { .. } | Action::SetAllAnnotations { .. } | Action::FocusCamera { .. } => Ok(()),
    }
}

fn check_annotation(name: &str, annotations: &AnnotationManager) -> CheckResult {
    if annotations.contains(name) {
        Ok(())
    } else {
        Err(format!("unknown annotation '{name}'"))
    }
}

fn check_region(name: &str, regions: &RegionManager) -> CheckResult {
    if regions.contains(name) {
        Ok(())
    } else {
        Err(format!("unknown proxy region '{name}'"))
    }
}

fn execute(action: &Action, ctx: &mut StageContext<'_>) {
    log::debug!("Executing {action:?}");
    match action {
        Action::PlayClip { play, stop } => {
            ctx.sequencer.play(play, stop.as_deref());
        }
        Action::ShowAnnotation { name } => {
            ctx.annotations.set_annotation_visibility(ctx.scene, name, true);
        }
        Action::HideAnnotation { name } => {
            ctx.annotations.set_annotation_visibility(ctx.scene, name, false);
        }
        Action::SetAllAnnotations { visible } => {
            ctx.annotations.set_all_visibility(ctx.scene, *visible);
        }
        Action::ShowRegion { name } => {
            ctx.regions.show(ctx.scene, name);
        }
        Action::HideRegion { name } => {
            ctx.regions.hide(ctx.scene, name);
        }
        Action::PulseRegion { name, enabled } => {
            ctx.regions.set_opacity_pulse(name, *enabled);
        }
        Action::FocusCamera { target, duration } => {
            ctx.camera_rig.focus(*target, *duration);
        }
    }
}
