use glam::{Quat, Vec3};

use crate::animation::binding::TargetPath;
use crate::animation::tracks::KeyframeTrack;

#[derive(Debug, Clone)]
pub struct TrackMeta {
    pub node_name: String,
    /// Position of the target node in the asset's node list. Tracks without
    /// one are bound by `node_name`.
    pub node_index: Option<usize>,
    pub target: TargetPath,
}

#[derive(Debug, Clone)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
}

impl TrackData {
    #[must_use]
    pub fn end_time(&self) -> f32 {
        match self {
            TrackData::Vector3(t) => t.end_time(),
            TrackData::Quaternion(t) => t.end_time(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            TrackData::Vector3(t) => t.validate(),
            TrackData::Quaternion(t) => t.validate(),
        }
    }
}

/// A track: the keyframes plus which node property they drive.
#[derive(Debug, Clone)]
pub struct Track {
    pub meta: TrackMeta,
    pub data: TrackData,
}

/// Named, time-bounded set of tracks.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    /// Seconds; the latest keyframe time across all tracks.
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    #[must_use]
    pub fn new(name: String, tracks: Vec<Track>) -> Self {
        let duration = tracks
            .iter()
            .map(|t| t.data.end_time())
            .fold(0.0_f32, f32::max);

        Self {
            name,
            duration,
            tracks,
        }
    }
}
