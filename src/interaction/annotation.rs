//! Clickable hotspot markers anchored to 3D positions.
//!
//! Each annotation owns at most one [`Subscription`]. It exists exactly when
//! the annotation is visible, has a callback and the manager has a camera.
//! Every mutation of one of those three goes through `reconcile`, which drops
//! the old subscription before deciding whether to bind a new one.

use glam::{Vec2, Vec3};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

use crate::interaction::input::Input;
use crate::interaction::listener::{ClickCallback, Subscription};
use crate::scene::{CameraKey, NodeHandle, Scene};

new_key_type! {
    pub struct AnnotationKey;
}

pub const DEFAULT_ANNOTATION_SIZE: f32 = 0.5;

fn default_size() -> f32 {
    DEFAULT_ANNOTATION_SIZE
}

fn default_true() -> bool {
    true
}

/// Serializable description of an annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDesc {
    pub name: String,
    pub position: Vec3,
    pub icon: String,
    #[serde(default = "default_size")]
    pub width: f32,
    #[serde(default = "default_size")]
    pub height: f32,
    #[serde(default = "default_true")]
    pub visible: bool,
}

pub struct Annotation {
    name: String,
    node: NodeHandle,
    position: Vec3,
    icon: String,
    visible: bool,
    callback: Option<ClickCallback>,
    subscription: Option<Subscription>,
}

impl Annotation {
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The sprite node.
    #[inline]
    #[must_use]
    pub fn node(&self) -> NodeHandle {
        self.node
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    #[inline]
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    #[must_use]
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    #[inline]
    #[must_use]
    pub fn subscription(&self) -> Option<&Subscription> {
        self.subscription.as_ref()
    }
}

#[derive(Default)]
pub struct AnnotationManager {
    annotations: SlotMap<AnnotationKey, Annotation>,
    by_name: FxHashMap<String, AnnotationKey>,
    camera: Option<CameraKey>,
}

impl AnnotationManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the sprite and registers the annotation without a callback.
    ///
    /// Re-registering a name is not supported: it is logged and ignored.
    pub fn add_annotation(
        &mut self,
        scene: &mut Scene,
        name: &str,
        position: Vec3,
        icon: &str,
        width: f32,
        height: f32,
    ) -> Option<AnnotationKey> {
        if self.by_name.contains_key(name) {
            log::error!("Annotation '{name}' already exists.");
            return None;
        }

        let node = scene.create_sprite(name, icon, position, width, height);
        let key = self.annotations.insert(Annotation {
            name: name.to_string(),
            node,
            position,
            icon: icon.to_string(),
            visible: true,
            callback: None,
            subscription: None,
        });
        self.by_name.insert(name.to_string(), key);
        self.reconcile(key);
        Some(key)
    }

    pub fn add(&mut self, scene: &mut Scene, desc: &AnnotationDesc) -> Option<AnnotationKey> {
        let key = self.add_annotation(scene, &desc.name, desc.position, &desc.icon, desc.width, desc.height)?;
        if !desc.visible {
            self.apply_visibility(scene, key, false);
        }
        Some(key)
    }

    /// Shows or hides one annotation. Returns `false` for unknown names.
    pub fn set_annotation_visibility(&mut self, scene: &mut Scene, name: &str, visible: bool) -> bool {
        let Some(&key) = self.by_name.get(name) else {
            log::warn!("Annotation '{name}' not found.");
            return false;
        };
        self.apply_visibility(scene, key, visible);
        true
    }

    pub fn set_all_visibility(&mut self, scene: &mut Scene, visible: bool) {
        let keys: Vec<_> = self.annotations.keys().collect();
        for key in keys {
            self.apply_visibility(scene, key, visible);
        }
    }

    fn apply_visibility(&mut self, scene: &mut Scene, key: AnnotationKey, visible: bool) {
        let Some(annotation) = self.annotations.get_mut(key) else {
            return;
        };
        annotation.visible = visible;
        if let Some(node) = scene.get_node_mut(annotation.node) {
            node.visible = visible;
        }
        self.reconcile(key);
    }

    /// Assigns or replaces the click callback. Returns `false` for unknown
    /// names.
    pub fn trigger_interaction(&mut self, name: &str, callback: impl FnMut() + 'static) -> bool {
        let Some(&key) = self.by_name.get(name) else {
            log::warn!("Annotation '{name}' not found.");
            return false;
        };
        if let Some(annotation) = self.annotations.get_mut(key) {
            annotation.callback = Some(Box::new(callback));
        }
        self.reconcile(key);
        true
    }

    /// Sets the camera used for picking and reconciles every annotation.
    pub fn set_camera(&mut self, camera: Option<CameraKey>) {
        self.camera = camera;
        let keys: Vec<_> = self.annotations.keys().collect();
        for key in keys {
            self.reconcile(key);
        }
    }

    #[inline]
    #[must_use]
    pub fn camera(&self) -> Option<CameraKey> {
        self.camera
    }

    fn reconcile(&mut self, key: AnnotationKey) {
        let has_camera = self.camera.is_some();
        let Some(annotation) = self.annotations.get_mut(key) else {
            return;
        };

        annotation.subscription = None;

        if annotation.visible && annotation.callback.is_some() && has_camera {
            annotation.subscription = Some(Subscription::bind(vec![annotation.node]));
        }
    }

    /// Delivers a click at `screen_pos` to every bound annotation whose
    /// sprite is under the pointer. Returns the names of the fired
    /// annotations.
    pub fn handle_click(&mut self, scene: &Scene, input: &Input, screen_pos: Vec2) -> Vec<String> {
        let mut fired = Vec::new();
        let Some(camera_key) = self.camera else {
            return fired;
        };
        let Some(camera) = scene.get_camera(camera_key) else {
            log::warn!("Annotation camera is no longer in the scene.");
            return fired;
        };
        let Some(ray) = input.pick_ray(camera, screen_pos) else {
            return fired;
        };

        for annotation in self.annotations.values_mut() {
            let Some(subscription) = &annotation.subscription else {
                continue;
            };
            if subscription.hit_test(scene, &ray).is_none() {
                continue;
            }
            if let Some(callback) = annotation.callback.as_mut() {
                log::debug!("Annotation '{}' clicked", annotation.name);
                callback();
                fired.push(annotation.name.clone());
            }
        }
        fired
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn key(&self, name: &str) -> Option<AnnotationKey> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Annotation> {
        self.key(name).and_then(|k| self.annotations.get(k))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    #[must_use]
    pub fn is_visible(&self, name: &str) -> bool {
        self.get(name).is_some_and(Annotation::is_visible)
    }

    #[must_use]
    pub fn has_listener(&self, name: &str) -> bool {
        self.get(name).is_some_and(|a| a.subscription.is_some())
    }

    /// Number of live click subscriptions across all annotations.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.annotations
            .values()
            .filter(|a| a.subscription.is_some())
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.values()
    }
}
