//! The narrative as data.
//!
//! A [`ChoreographyScript`] is a transition table: in stage `from`, trigger
//! `trigger` runs `actions` and moves to stage `to`. Scripts are plain serde
//! data so exhibits can ship them in their JSON configuration.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A user interaction that may advance the narrative.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Trigger {
    /// Click on the annotation with this name.
    Annotation(String),
    /// Click on the proxy region with this name.
    Region(String),
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trigger::Annotation(name) => write!(f, "annotation '{name}'"),
            Trigger::Region(name) => write!(f, "region '{name}'"),
        }
    }
}

/// One step of a stage's reaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Plays `play` once. Without `stop` every active clip is stopped
    /// first; with it, only that clip.
    PlayClip {
        play: String,
        #[serde(default)]
        stop: Option<String>,
    },
    ShowAnnotation {
        name: String,
    },
    HideAnnotation {
        name: String,
    },
    SetAllAnnotations {
        visible: bool,
    },
    ShowRegion {
        name: String,
    },
    HideRegion {
        name: String,
    },
    PulseRegion {
        name: String,
        enabled: bool,
    },
    /// Moves the orbit target to `target` over `duration` seconds.
    FocusCamera {
        target: Vec3,
        #[serde(default = "default_focus_duration")]
        duration: f32,
    },
}

fn default_focus_duration() -> f32 {
    1.0
}

/// An action with a delay relative to the trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedAction {
    /// Milliseconds after the trigger; 0 runs immediately, in order.
    #[serde(default)]
    pub delay_ms: u64,
    #[serde(flatten)]
    pub action: Action,
}

impl TimedAction {
    #[must_use]
    pub fn now(action: Action) -> Self {
        Self { delay_ms: 0, action }
    }

    #[must_use]
    pub fn after(delay_ms: u64, action: Action) -> Self {
        Self { delay_ms, action }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub from: String,
    pub trigger: Trigger,
    #[serde(default)]
    pub actions: Vec<TimedAction>,
    pub to: String,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreographyScript {
    pub initial: String,
    pub transitions: Vec<Transition>,
    /// Drop delayed actions of a stage once the narrative has left it.
    /// When `false`, delayed actions fire even after later transitions.
    #[serde(default = "default_true")]
    pub cancel_stale_actions: bool,
}

impl Default for ChoreographyScript {
    fn default() -> Self {
        Self {
            initial: "idle".to_string(),
            transitions: Vec::new(),
            cancel_stale_actions: true,
        }
    }
}

// ============================================================================
// Presets
// ============================================================================

fn play(clip: &str, stop: Option<&str>) -> Action {
    Action::PlayClip {
        play: clip.to_string(),
        stop: stop.map(str::to_string),
    }
}

fn annotation(name: &str, visible: bool) -> Action {
    let name = name.to_string();
    if visible {
        Action::ShowAnnotation { name }
    } else {
        Action::HideAnnotation { name }
    }
}

fn region(name: &str, visible: bool) -> Action {
    let name = name.to_string();
    if visible {
        Action::ShowRegion { name }
    } else {
        Action::HideRegion { name }
    }
}

fn pulse(name: &str, enabled: bool) -> Action {
    Action::PulseRegion {
        name: name.to_string(),
        enabled,
    }
}

fn transition(from: &str, trigger: Trigger, to: &str, actions: Vec<TimedAction>) -> Transition {
    Transition {
        from: from.to_string(),
        trigger,
        actions,
        to: to.to_string(),
    }
}

pub const CREAM_PROXY: &str = "cream01Proxy";
pub const CAP_PROXY: &str = "cap01Proxy";

/// Rotation of the cream proxy, lying on its side.
pub const CREAM_PROXY_ROTATION: Vec3 = Vec3::new(0.0, 0.0, FRAC_PI_2);

impl ChoreographyScript {
    /// Two-stage loop: open the box, close it again.
    #[must_use]
    pub fn open_close() -> Self {
        Self {
            initial: "closed".to_string(),
            transitions: vec![
                transition(
                    "closed",
                    Trigger::Annotation("open".into()),
                    "opened",
                    vec![
                        TimedAction::now(play("open_animation", None)),
                        TimedAction::now(annotation("open", false)),
                        TimedAction::after(2000, annotation("close", true)),
                    ],
                ),
                transition(
                    "opened",
                    Trigger::Annotation("close".into()),
                    "closed",
                    vec![
                        TimedAction::now(play("close", None)),
                        TimedAction::now(annotation("close", false)),
                        TimedAction::after(2400, annotation("open", true)),
                    ],
                ),
            ],
            cancel_stale_actions: true,
        }
    }

    /// Full unboxing: open the box, lift the jar, remove the cap, pack it
    /// all away again.
    #[must_use]
    pub fn unboxing() -> Self {
        Self {
            initial: "closed".to_string(),
            transitions: vec![
                transition(
                    "closed",
                    Trigger::Annotation("open".into()),
                    "box_opened",
                    vec![
                        TimedAction::now(play("open_animation", None)),
                        TimedAction::now(annotation("open", false)),
                        TimedAction::after(2000, region(CREAM_PROXY, true)),
                        TimedAction::after(2000, pulse(CREAM_PROXY, true)),
                    ],
                ),
                transition(
                    "box_opened",
                    Trigger::Region(CREAM_PROXY.into()),
                    "jar_revealed",
                    vec![
                        TimedAction::now(pulse(CREAM_PROXY, false)),
                        TimedAction::now(region(CREAM_PROXY, false)),
                        TimedAction::now(play("jar_out", Some("open_animation"))),
                        TimedAction::now(Action::FocusCamera {
                            target: Vec3::new(0.0, 1.5, 0.0),
                            duration: 1.0,
                        }),
                        TimedAction::after(1500, region(CAP_PROXY, true)),
                        TimedAction::after(1500, pulse(CAP_PROXY, true)),
                    ],
                ),
                transition(
                    "jar_revealed",
                    Trigger::Region(CAP_PROXY.into()),
                    "cap_removed",
                    vec![
                        TimedAction::now(pulse(CAP_PROXY, false)),
                        TimedAction::now(region(CAP_PROXY, false)),
                        TimedAction::now(play("cap_off", Some("jar_out"))),
                        TimedAction::after(1200, annotation("close", true)),
                    ],
                ),
                transition(
                    "cap_removed",
                    Trigger::Annotation("close".into()),
                    "closed",
                    vec![
                        TimedAction::now(play("close", None)),
                        TimedAction::now(annotation("close", false)),
                        TimedAction::now(Action::FocusCamera {
                            target: Vec3::ZERO,
                            duration: 1.0,
                        }),
                        TimedAction::after(2400, annotation("open", true)),
                    ],
                ),
            ],
            cancel_stale_actions: true,
        }
    }
}
