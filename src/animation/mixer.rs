use rustc_hash::FxHashMap;

use crate::animation::action::{AnimationAction, TrackValue};
use crate::animation::binding::TargetPath;
use crate::scene::{NodeHandle, Scene};

/// Owns the actions of one animated subtree and writes their sampled values
/// into the scene.
///
/// When an action is stopped, the properties it drove return to the pose
/// they had when the action was added (unless another active action keeps
/// driving them).
pub struct AnimationMixer {
    root: NodeHandle,
    actions: Vec<AnimationAction>,
    rest_pose: FxHashMap<(NodeHandle, TargetPath), TrackValue>,
    pending_restore: Vec<(NodeHandle, TargetPath)>,
}

impl AnimationMixer {
    #[must_use]
    pub fn new(root: NodeHandle) -> Self {
        Self {
            root,
            actions: Vec::new(),
            rest_pose: FxHashMap::default(),
            pending_restore: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// Adds an action, recording the current pose of every property it binds.
    pub fn add_action(&mut self, action: AnimationAction, scene: &Scene) {
        for binding in &action.bindings {
            let key = (binding.node_handle, binding.target);
            if self.rest_pose.contains_key(&key) {
                continue;
            }
            if let Some(node) = scene.get_node(binding.node_handle) {
                let t = &node.transform;
                let value = match binding.target {
                    TargetPath::Translation => TrackValue::Vector3(t.position),
                    TargetPath::Rotation => TrackValue::Quaternion(t.rotation),
                    TargetPath::Scale => TrackValue::Vector3(t.scale),
                };
                self.rest_pose.insert(key, value);
            }
        }
        self.actions.push(action);
    }

    #[must_use]
    pub fn actions(&self) -> &[AnimationAction] {
        &self.actions
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    #[must_use]
    pub fn index_of(&self, clip_name: &str) -> Option<usize> {
        self.actions.iter().position(|a| a.name() == clip_name)
    }

    #[must_use]
    pub fn action(&self, clip_name: &str) -> Option<&AnimationAction> {
        self.actions.iter().find(|a| a.name() == clip_name)
    }

    pub fn action_at_mut(&mut self, index: usize) -> Option<&mut AnimationAction> {
        self.actions.get_mut(index)
    }

    /// Stops the action at `index`. Returns whether it was active.
    pub fn stop_action(&mut self, index: usize) -> bool {
        let Some(action) = self.actions.get_mut(index) else {
            return false;
        };
        let was_active = action.is_active();
        if was_active {
            self.pending_restore.extend(
                action
                    .bindings
                    .iter()
                    .map(|b| (b.node_handle, b.target)),
            );
        }
        action.stop();
        was_active
    }

    pub fn stop_all(&mut self) {
        for index in 0..self.actions.len() {
            self.stop_action(index);
        }
    }

    /// Iterator over the names of active clips.
    pub fn active_clip_names(&self) -> impl Iterator<Item = &str> {
        self.actions
            .iter()
            .filter(|a| a.is_active())
            .map(AnimationAction::name)
    }

    /// Advances every action by `dt` seconds and applies the result.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        for key in self.pending_restore.drain(..) {
            let Some(value) = self.rest_pose.get(&key) else {
                continue;
            };
            if let Some(node) = scene.get_node_mut(key.0) {
                write_value(&mut node.transform, key.1, *value);
            }
        }

        for action in &mut self.actions {
            if action.update(dt) {
                log::debug!("Clip '{}' finished", action.name());
            }

            if !action.enabled || action.weight <= 0.0 {
                continue;
            }

            for i in 0..action.bindings.len() {
                let (track_index, node_handle, target) = {
                    let b = &action.bindings[i];
                    (b.track_index, b.node_handle, b.target)
                };
                let Some(value) = action.sample_track(track_index) else {
                    continue;
                };
                if let Some(node) = scene.get_node_mut(node_handle) {
                    write_value(&mut node.transform, target, value);
                }
            }
        }
    }
}

fn write_value(transform: &mut crate::scene::Transform, target: TargetPath, value: TrackValue) {
    match (target, value) {
        (TargetPath::Translation, TrackValue::Vector3(v)) => transform.position = v,
        (TargetPath::Scale, TrackValue::Vector3(v)) => transform.scale = v,
        (TargetPath::Rotation, TrackValue::Quaternion(q)) => transform.rotation = q,
        _ => return,
    }
    transform.mark_dirty();
}
