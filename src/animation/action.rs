use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::animation::{
    binding::PropertyBinding,
    clip::{AnimationClip, TrackData},
    tracks::KeyframeCursor,
};

/// Playback state of one clip on one mixer.
///
/// An action is *active* while `enabled` is set, including when it has
/// finished and sits frozen on its last frame. Stopping disables it.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub weight: f32,
    /// Hold the final pose at the end instead of disabling.
    pub clamp_when_finished: bool,
    pub paused: bool,
    pub enabled: bool,

    pub bindings: Vec<PropertyBinding>,

    pub(crate) track_cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    /// A new, stopped action for `clip`.
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            weight: 0.0,
            clamp_when_finished: false,
            paused: false,
            enabled: false,
            bindings: Vec::new(),
            track_cursors: vec![KeyframeCursor::default(); track_count],
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.clip.name
    }

    /// Rewinds to the first frame and clears the paused flag.
    pub fn reset(&mut self) -> &mut Self {
        self.time = 0.0;
        self.paused = false;
        for cursor in &mut self.track_cursors {
            cursor.last_index = 0;
        }
        self
    }

    pub fn play(&mut self) -> &mut Self {
        self.enabled = true;
        self.weight = 1.0;
        self
    }

    pub fn stop(&mut self) -> &mut Self {
        self.enabled = false;
        self.weight = 0.0;
        self.reset()
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.enabled
    }

    /// Active and still advancing.
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.enabled && !self.paused
    }

    /// Advances time by `dt` seconds. Returns `true` on the frame the action
    /// reaches the end of its clip.
    pub fn update(&mut self, dt: f32) -> bool {
        if self.paused || !self.enabled {
            return false;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            return false;
        }

        self.time = (self.time + dt).max(0.0);
        if self.time < duration {
            return false;
        }

        self.time = duration;
        if self.clamp_when_finished {
            self.paused = true;
        } else {
            self.enabled = false;
            self.weight = 0.0;
        }
        true
    }

    /// Samples track `track_index` at the current time.
    pub fn sample_track(&mut self, track_index: usize) -> Option<TrackValue> {
        let track = self.clip.tracks.get(track_index)?;
        let cursor = self.track_cursors.get_mut(track_index)?;

        match &track.data {
            TrackData::Vector3(t) => t.sample_with_cursor(self.time, cursor).map(TrackValue::Vector3),
            TrackData::Quaternion(t) => t
                .sample_with_cursor(self.time, cursor)
                .map(TrackValue::Quaternion),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackValue {
    Vector3(Vec3),
    Quaternion(Quat),
}
