use glam::{Affine3A, Vec3};
use slotmap::SlotMap;

use crate::scene::camera::Camera;
use crate::scene::{CameraKey, NodeHandle};
use crate::scene::node::{Node, NodeKind, Sprite, Volume, VolumeMaterial};
use crate::scene::raycast::{self, Hit, Ray};
use crate::scene::shape::Shape;

/// Scene graph container.
///
/// `Scene` is a pure data layer: an arena of nodes plus the list of roots.
/// A renderer walks it to draw; the interaction layer adds sprites and
/// volumes to it and queries it with picking rays.
#[derive(Debug, Default)]
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,
    pub cameras: SlotMap<CameraKey, Camera>,
    pub active_camera: Option<CameraKey>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node as a new root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Inserts a node without attaching it anywhere. Used when building a
    /// subtree that only becomes visible once its root is attached.
    pub(crate) fn insert_detached(&mut self, node: Node) -> NodeHandle {
        self.nodes.insert(node)
    }

    pub fn add_to_parent(&mut self, child: Node, parent: NodeHandle) -> NodeHandle {
        let handle = self.nodes.insert(child);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(handle);
            if let Some(c) = self.nodes.get_mut(handle) {
                c.parent = Some(parent);
            }
        } else {
            log::error!("Parent node not found, adding child as root");
            self.root_nodes.push(handle);
        }
        handle
    }

    /// Registers a camera. The first camera added becomes the active one.
    pub fn add_camera(&mut self, camera: Camera) -> CameraKey {
        let key = self.cameras.insert(camera);
        if self.active_camera.is_none() {
            self.active_camera = Some(key);
        }
        key
    }

    #[must_use]
    pub fn get_camera(&self, key: CameraKey) -> Option<&Camera> {
        self.cameras.get(key)
    }

    pub fn get_camera_mut(&mut self, key: CameraKey) -> Option<&mut Camera> {
        self.cameras.get_mut(key)
    }

    #[must_use]
    pub fn main_camera(&self) -> Option<&Camera> {
        self.active_camera.and_then(|k| self.cameras.get(k))
    }

    pub fn main_camera_mut(&mut self) -> Option<&mut Camera> {
        self.active_camera.and_then(|k| self.cameras.get_mut(k))
    }

    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        self.add_node(Node::new(name))
    }

    /// Adds a camera-facing marker node.
    ///
    /// The quad is `width` x `height` world units, centred on `position`.
    pub fn create_sprite(
        &mut self,
        name: &str,
        icon: &str,
        position: Vec3,
        width: f32,
        height: f32,
    ) -> NodeHandle {
        let mut node = Node::with_kind(
            name,
            NodeKind::Sprite(Sprite {
                icon: icon.to_string(),
                depth_test: true,
            }),
        );
        node.transform.position = position;
        node.transform.scale = Vec3::new(width, height, 1.0);
        self.add_node(node)
    }

    /// Adds an analytic volume node.
    pub fn create_volume(
        &mut self,
        name: &str,
        shape: Shape,
        material: VolumeMaterial,
        position: Vec3,
    ) -> NodeHandle {
        let mut node = Node::with_kind(name, NodeKind::Volume(Volume { shape, material }));
        node.transform.position = position;
        self.add_node(node)
    }

    /// Parents `child` under `parent`, detaching it from its previous parent
    /// or from the root list.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(parent) {
            log::error!("Parent node not found during attach!");
            return;
        }

        self.detach(child);

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
    }

    /// Attaches a detached subtree as a new root.
    pub fn attach_root(&mut self, handle: NodeHandle) {
        if !self.nodes.contains_key(handle) {
            log::error!("Cannot attach unknown node as root");
            return;
        }
        self.detach(handle);
        self.root_nodes.push(handle);
    }

    /// Unlinks a node from its parent (or from the root list). The node and
    /// its subtree stay in the arena.
    pub fn detach(&mut self, handle: NodeHandle) {
        let old_parent = self.nodes.get(handle).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(parent) = self.nodes.get_mut(p)
                && let Some(i) = parent.children.iter().position(|&x| x == handle)
            {
                parent.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == handle) {
            self.root_nodes.remove(i);
        }
        if let Some(node) = self.nodes.get_mut(handle) {
            node.parent = None;
        }
    }

    /// Removes a node and its whole subtree.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        if !self.nodes.contains_key(handle) {
            return;
        }
        self.detach(handle);

        let mut stack = vec![handle];
        while let Some(h) = stack.pop() {
            if let Some(node) = self.nodes.remove(h) {
                stack.extend(node.children);
            }
        }
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth-first search for a node named `name` in the subtree at `root`.
    #[must_use]
    pub fn find_node_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        let mut stack = vec![root];
        while let Some(h) = stack.pop() {
            let node = self.nodes.get(h)?;
            if node.name == name {
                return Some(h);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Whether `handle` is reachable from one of the scene roots.
    #[must_use]
    pub fn is_attached(&self, handle: NodeHandle) -> bool {
        let mut current = handle;
        loop {
            match self.nodes.get(current).and_then(|n| n.parent) {
                Some(p) => current = p,
                None => return self.root_nodes.contains(&current),
            }
        }
    }

    // ========================================================================
    // Matrix update
    // ========================================================================

    /// Recomputes world matrices for every attached node.
    pub fn update_matrix_world(&mut self) {
        let mut stack: Vec<(NodeHandle, Affine3A, bool)> = self
            .root_nodes
            .iter()
            .map(|&h| (h, Affine3A::IDENTITY, false))
            .collect();

        while let Some((handle, parent_world, parent_changed)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(handle) else {
                continue;
            };
            let local_changed = node.transform.update_local_matrix();
            let changed = local_changed || parent_changed;
            if changed {
                let world = parent_world * *node.transform.local_matrix();
                node.transform.set_world_matrix(world);
            }
            let world = *node.transform.world_matrix();
            for &child in &node.children {
                stack.push((child, world, changed));
            }
        }
    }

    /// World matrix computed from the current TRS values up the parent chain,
    /// independent of whether `update_matrix_world` ran this frame.
    #[must_use]
    pub fn compute_world_matrix(&self, handle: NodeHandle) -> Option<Affine3A> {
        let mut node = self.nodes.get(handle)?;
        let mut world = local_of(node);
        while let Some(parent) = node.parent {
            node = self.nodes.get(parent)?;
            world = local_of(node) * world;
        }
        Some(world)
    }

    // ========================================================================
    // Ray queries
    // ========================================================================

    /// Nearest hit among `targets` and their descendants.
    ///
    /// Nodes with `pickable == false` are skipped together with their
    /// subtree. Visibility does not affect picking.
    #[must_use]
    pub fn raycast(&self, ray: &Ray, targets: &[NodeHandle]) -> Option<Hit> {
        let mut best: Option<Hit> = None;

        let mut stack: Vec<NodeHandle> = targets.to_vec();
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            if !node.pickable {
                continue;
            }
            stack.extend(node.children.iter().copied());

            let Some(world) = self.compute_world_matrix(handle) else {
                continue;
            };
            if let Some(t) = raycast::intersect_kind(ray, &node.kind, &world)
                && best.as_ref().is_none_or(|b| t < b.distance)
            {
                best = Some(Hit {
                    node: handle,
                    name: node.name.clone(),
                    distance: t,
                    point: ray.at(t),
                });
            }
        }

        best
    }

    /// Nearest hit among all attached nodes.
    #[must_use]
    pub fn raycast_all(&self, ray: &Ray) -> Option<Hit> {
        self.raycast(ray, &self.root_nodes)
    }
}

fn local_of(node: &Node) -> Affine3A {
    let t = &node.transform;
    Affine3A::from_scale_rotation_translation(t.scale, t.rotation, t.position)
}
