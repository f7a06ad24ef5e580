//! Named-clip playback on top of [`AnimationMixer`].
//!
//! Two modes:
//!
//! - `play(name, None)`: stops every active clip, then starts `name`. Use it
//!   for exhibits that only ever show one animation at a time.
//! - `play(name, Some(stop))`: stops exactly `stop` and starts `name`, leaving
//!   any other active clips running. Use it when independent clips (a lid and
//!   an unrelated prop) must coexist.
//!
//! Every started clip plays once from its first frame and freezes on its
//! last frame.
//!
//! Lookup misses and playback before the asset is ready are logged and
//! ignored; callers must not rely on playback having happened.

use std::sync::Arc;

use crate::animation::action::AnimationAction;
use crate::animation::binder::Binder;
use crate::animation::clip::AnimationClip;
use crate::animation::mixer::AnimationMixer;
use crate::assets::AssetHandle;
use crate::scene::Scene;

#[derive(Default)]
pub struct AnimationSequencer {
    mixer: Option<AnimationMixer>,
}

impl AnimationSequencer {
    /// A sequencer with no asset attached. Every `play` is a no-op until
    /// [`attach`](Self::attach) is called.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds every clip of `asset` against its subtree in `scene`.
    pub fn attach(&mut self, asset: &AssetHandle, scene: &Scene) {
        let mut mixer = AnimationMixer::new(asset.root());
        for clip in asset.clips() {
            mixer.add_action(Self::build_action(clip, asset, scene), scene);
        }
        log::info!(
            "Sequencer attached with {} clip(s): {:?}",
            mixer.len(),
            mixer.actions().iter().map(AnimationAction::name).collect::<Vec<_>>()
        );
        self.mixer = Some(mixer);
    }

    fn build_action(clip: &Arc<AnimationClip>, asset: &AssetHandle, scene: &Scene) -> AnimationAction {
        let mut action = AnimationAction::new(Arc::clone(clip));
        action.bindings = Binder::bind(scene, asset.root(), asset.nodes(), clip);
        action.clamp_when_finished = true;
        action
    }

    #[inline]
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.mixer.is_some()
    }

    /// Plays `play_name` once, first stopping `stop_name` if given, or every
    /// active clip if not.
    ///
    /// Returns whether playback of `play_name` started. An unknown
    /// `play_name` leaves the mixer untouched.
    pub fn play(&mut self, play_name: &str, stop_name: Option<&str>) -> bool {
        let Some(mixer) = self.mixer.as_mut().filter(|m| !m.is_empty()) else {
            log::warn!("No animations available to play '{play_name}'.");
            return false;
        };

        let Some(play_index) = mixer.index_of(play_name) else {
            log::warn!("Animation '{play_name}' not found.");
            return false;
        };

        match stop_name {
            Some(stop_name) => match mixer.index_of(stop_name) {
                Some(stop_index) => {
                    if !mixer.stop_action(stop_index) {
                        log::warn!("Animation '{stop_name}' is not playing; nothing to stop.");
                    }
                }
                None => log::warn!("Animation '{stop_name}' not found; nothing to stop."),
            },
            None => mixer.stop_all(),
        }

        if let Some(action) = mixer.action_at_mut(play_index) {
            action.reset();
            action.clamp_when_finished = true;
            action.play();
            log::debug!("Playing '{play_name}'");
        }
        true
    }

    /// Advances all active clips; call once per frame.
    pub fn tick(&mut self, dt: f32, scene: &mut Scene) {
        if let Some(mixer) = &mut self.mixer {
            mixer.update(dt, scene);
        }
    }

    #[must_use]
    pub fn is_active(&self, clip_name: &str) -> bool {
        self.mixer
            .as_ref()
            .and_then(|m| m.action(clip_name))
            .is_some_and(AnimationAction::is_active)
    }

    /// Names of active clips, in clip order.
    #[must_use]
    pub fn active_clips(&self) -> Vec<&str> {
        self.mixer
            .as_ref()
            .map(|m| m.active_clip_names().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn clip_names(&self) -> Vec<&str> {
        self.mixer
            .as_ref()
            .map(|m| m.actions().iter().map(AnimationAction::name).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn mixer(&self) -> Option<&AnimationMixer> {
        self.mixer.as_ref()
    }
}
