//! Choreography: the exhibit's narrative as an explicit state machine.
//!
//! - `script`: serde transition table (stage, trigger) -> (actions, stage)
//! - `scheduler`: stage-tagged one-shot timers driven by the frame tick
//! - `director`: the [`Choreographer`] that validates and runs a script

pub mod director;
pub mod scheduler;
pub mod script;

pub use director::{Choreographer, StageContext, StageId};
pub use scheduler::Scheduler;
pub use script::{Action, ChoreographyScript, TimedAction, Transition, Trigger};
