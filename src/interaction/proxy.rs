//! Proxy regions: hit-volumes placed over mesh geometry that act as
//! secondary hotspots.
//!
//! A region at opacity 0 is invisible to the eye but still hittable. A
//! *hidden* region is neither drawn nor hit-tested: hiding clears both
//! `visible` and `pickable` on its node, and the scene's ray query skips
//! non-pickable nodes even when a caller still holds the region's handle.

use glam::Vec3;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

use crate::errors::{Result, VitrineError};
use crate::interaction::listener::{ClickCallback, Subscription};
use crate::scene::node::VolumeMaterial;
use crate::scene::raycast::Ray;
use crate::scene::shape::Shape;
use crate::scene::{NodeHandle, Scene};

new_key_type! {
    pub struct RegionKey;
}

pub const DEFAULT_REGION_COLOR: u32 = 0x23_c7_1e;

/// Peak opacity of the pulse.
pub const PULSE_AMPLITUDE: f32 = 0.3;
/// Angular rate of the pulse in rad/s.
pub const PULSE_RATE: f32 = 2.0;

/// Pulse opacity after `elapsed` seconds.
#[inline]
#[must_use]
pub fn pulse_opacity(elapsed: f32) -> f32 {
    (PULSE_RATE * elapsed).sin().abs() * PULSE_AMPLITUDE
}

fn default_color() -> u32 {
    DEFAULT_REGION_COLOR
}

/// Serializable description of a proxy region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDesc {
    pub name: String,
    #[serde(default)]
    pub shape: Shape,
    pub position: Vec3,
    /// XYZ Euler angles in radians.
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default)]
    pub opacity: f32,
    #[serde(default = "default_color")]
    pub color: u32,
    /// Spawn hidden.
    #[serde(default)]
    pub hidden: bool,
}

impl RegionDesc {
    #[must_use]
    pub fn new(name: &str, shape: Shape, position: Vec3) -> Self {
        Self {
            name: name.to_string(),
            shape,
            position,
            rotation: Vec3::ZERO,
            opacity: 0.0,
            color: DEFAULT_REGION_COLOR,
            hidden: false,
        }
    }
}

pub struct ProxyRegion {
    name: String,
    node: NodeHandle,
    pulsing: bool,
    elapsed: f32,
    callback: Option<ClickCallback>,
    /// Name a hit node must carry for the callback to fire.
    detect_name: String,
    subscription: Option<Subscription>,
}

impl ProxyRegion {
    /// Creates the region's volume node in `scene`.
    pub fn spawn(scene: Option<&mut Scene>, desc: &RegionDesc) -> Result<Self> {
        let Some(scene) = scene else {
            return Err(VitrineError::Config(format!(
                "proxy region '{}' needs a scene",
                desc.name
            )));
        };
        if !desc.shape.is_valid() {
            return Err(VitrineError::Config(format!(
                "proxy region '{}' has invalid dimensions: {:?}",
                desc.name, desc.shape
            )));
        }
        if !(0.0..=1.0).contains(&desc.opacity) {
            return Err(VitrineError::Config(format!(
                "proxy region '{}' opacity {} is outside [0, 1]",
                desc.name, desc.opacity
            )));
        }

        let material = VolumeMaterial::with_opacity(desc.color, desc.opacity);
        let node = scene.create_volume(&desc.name, desc.shape, material, desc.position);
        if let Some(n) = scene.get_node_mut(node) {
            n.transform
                .set_rotation_euler(desc.rotation.x, desc.rotation.y, desc.rotation.z);
        }

        let mut region = Self {
            name: desc.name.clone(),
            node,
            pulsing: false,
            elapsed: 0.0,
            callback: None,
            detect_name: desc.name.clone(),
            subscription: None,
        };
        if desc.hidden {
            region.hide(scene);
        }
        Ok(region)
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn node(&self) -> NodeHandle {
        self.node
    }

    pub fn hide(&mut self, scene: &mut Scene) {
        if let Some(node) = scene.get_node_mut(self.node) {
            node.visible = false;
            node.pickable = false;
        }
    }

    pub fn show(&mut self, scene: &mut Scene) {
        if let Some(node) = scene.get_node_mut(self.node) {
            node.visible = true;
            node.pickable = true;
        }
    }

    #[must_use]
    pub fn is_visible(&self, scene: &Scene) -> bool {
        scene.get_node(self.node).is_some_and(|n| n.visible)
    }

    #[must_use]
    pub fn is_pickable(&self, scene: &Scene) -> bool {
        scene.get_node(self.node).is_some_and(|n| n.pickable)
    }

    #[must_use]
    pub fn opacity(&self, scene: &Scene) -> Option<f32> {
        scene
            .get_node(self.node)
            .and_then(|n| n.volume_material())
            .map(|m| m.opacity)
    }

    pub fn set_opacity(&mut self, scene: &mut Scene, opacity: f32) {
        if let Some(material) = scene
            .get_node_mut(self.node)
            .and_then(|n| n.volume_material_mut())
        {
            material.opacity = opacity;
            material.transparent = opacity < 1.0;
        }
    }

    pub fn set_opacity_pulse(&mut self, enabled: bool) {
        self.pulsing = enabled;
    }

    #[inline]
    #[must_use]
    pub fn is_pulsing(&self) -> bool {
        self.pulsing
    }

    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advances the pulse. Call once per frame.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        if !self.pulsing {
            return;
        }
        self.elapsed += dt;
        self.set_opacity(scene, pulse_opacity(self.elapsed));
    }

    /// Sets the volume's rotation from XYZ Euler angles in radians.
    pub fn set_rotation(&mut self, scene: &mut Scene, x: f32, y: f32, z: f32) {
        if let Some(node) = scene.get_node_mut(self.node) {
            node.transform.set_rotation_euler(x, y, z);
        }
    }

    /// Binds `callback` to clicks on this region, replacing any previous
    /// binding. The callback fires only when the hit node is named `name`.
    pub fn proxy_detection(&mut self, name: &str, callback: impl FnMut() + 'static) {
        self.subscription = None;
        self.detect_name = name.to_string();
        self.callback = Some(Box::new(callback));
        self.subscription = Some(Subscription::bind(vec![self.node]));
    }

    #[inline]
    #[must_use]
    pub fn has_listener(&self) -> bool {
        self.subscription.is_some()
    }

    /// Ray-tests this region only. Returns whether the callback fired.
    pub fn handle_click(&mut self, scene: &Scene, ray: &Ray) -> bool {
        let Some(subscription) = &self.subscription else {
            return false;
        };
        let Some(hit) = subscription.hit_test(scene, ray) else {
            return false;
        };
        if hit.name != self.detect_name {
            log::debug!(
                "Region '{}' hit node '{}', expected '{}'",
                self.name,
                hit.name,
                self.detect_name
            );
            return false;
        }
        match self.callback.as_mut() {
            Some(callback) => {
                log::debug!("Region '{}' clicked", self.name);
                callback();
                true
            }
            None => false,
        }
    }
}

/// Name-addressed collection of proxy regions.
#[derive(Default)]
pub struct RegionManager {
    regions: SlotMap<RegionKey, ProxyRegion>,
    by_name: FxHashMap<String, RegionKey>,
}

impl RegionManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a region. Duplicate names are a configuration error.
    pub fn add(&mut self, scene: &mut Scene, desc: &RegionDesc) -> Result<RegionKey> {
        if self.by_name.contains_key(&desc.name) {
            return Err(VitrineError::Config(format!(
                "proxy region '{}' already exists",
                desc.name
            )));
        }
        let region = ProxyRegion::spawn(Some(scene), desc)?;
        let key = self.regions.insert(region);
        self.by_name.insert(desc.name.clone(), key);
        Ok(key)
    }

    #[must_use]
    pub fn key(&self, name: &str) -> Option<RegionKey> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ProxyRegion> {
        self.key(name).and_then(|k| self.regions.get(k))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ProxyRegion> {
        let key = self.key(name)?;
        self.regions.get_mut(key)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    fn lookup_mut(&mut self, name: &str) -> Option<&mut ProxyRegion> {
        let region = self.get_mut(name);
        if region.is_none() {
            log::warn!("Proxy region '{name}' not found.");
        }
        region
    }

    pub fn show(&mut self, scene: &mut Scene, name: &str) -> bool {
        let Some(region) = self.lookup_mut(name) else {
            return false;
        };
        region.show(scene);
        true
    }

    pub fn hide(&mut self, scene: &mut Scene, name: &str) -> bool {
        let Some(region) = self.lookup_mut(name) else {
            return false;
        };
        region.hide(scene);
        true
    }

    pub fn set_opacity_pulse(&mut self, name: &str, enabled: bool) -> bool {
        let Some(region) = self.lookup_mut(name) else {
            return false;
        };
        region.set_opacity_pulse(enabled);
        true
    }

    pub fn proxy_detection(&mut self, name: &str, callback: impl FnMut() + 'static) -> bool {
        let Some(region) = self.lookup_mut(name) else {
            return false;
        };
        region.proxy_detection(name, callback);
        true
    }

    pub fn update_all(&mut self, dt: f32, scene: &mut Scene) {
        for region in self.regions.values_mut() {
            region.update(dt, scene);
        }
    }

    /// Delivers a click ray to every region. Returns the names of the fired
    /// regions.
    pub fn handle_click(&mut self, scene: &Scene, ray: &Ray) -> Vec<String> {
        self.regions
            .values_mut()
            .filter_map(|r| r.handle_click(scene, ray).then(|| r.name.clone()))
            .collect()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.regions.values().filter(|r| r.has_listener()).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProxyRegion> {
        self.regions.values()
    }
}
