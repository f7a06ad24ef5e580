pub mod action;
pub mod binder;
pub mod binding;
pub mod clip;
pub mod mixer;
pub mod sequencer;
pub mod tracks;
pub mod values;

pub use action::{AnimationAction, TrackValue};
pub use binder::Binder;
pub use binding::{PropertyBinding, TargetPath};
pub use clip::{AnimationClip, Track, TrackData, TrackMeta};
pub use mixer::AnimationMixer;
pub use sequencer::AnimationSequencer;
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
