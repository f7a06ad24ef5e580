use std::sync::Arc;

use crate::animation::clip::AnimationClip;
use crate::scene::node::{MeshBounds, Node, NodeKind};
use crate::scene::transform::Transform;
use crate::scene::{NodeHandle, Scene};

/// Prefab node: plain data, children referenced by index.
#[derive(Debug, Clone, Default)]
pub struct PrefabNode {
    pub name: String,
    pub transform: Transform,
    /// Indices into `Prefab::nodes`.
    pub children_indices: Vec<usize>,
    /// Local bounds of the node's mesh, if it has one.
    pub mesh_bounds: Option<MeshBounds>,
}

/// Decoded asset, independent of any scene.
///
/// A prefab holds no `NodeHandle`s; decoding can therefore fail at any point
/// without leaving anything behind. [`Prefab::instantiate`] turns it into
/// scene nodes in one step.
#[derive(Debug, Clone, Default)]
pub struct Prefab {
    pub nodes: Vec<PrefabNode>,
    /// Indices of the nodes directly under the asset root.
    pub root_indices: Vec<usize>,
    pub animations: Vec<Arc<AnimationClip>>,
}

impl Prefab {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the node tree under a new group named `root_name`, then attaches
    /// that group as a scene root.
    pub fn instantiate(&self, scene: &mut Scene, root_name: &str) -> PrefabInstance {
        let root = scene.insert_detached(Node::new(root_name));

        let handles: Vec<NodeHandle> = self
            .nodes
            .iter()
            .map(|p| {
                let kind = p.mesh_bounds.map_or(NodeKind::Group, NodeKind::Mesh);
                let mut node = Node::with_kind(&p.name, kind);
                node.transform = p.transform.clone();
                node.transform.mark_dirty();
                scene.insert_detached(node)
            })
            .collect();

        for (index, p) in self.nodes.iter().enumerate() {
            for &child in &p.children_indices {
                if let Some(&child_handle) = handles.get(child) {
                    scene.attach(child_handle, handles[index]);
                }
            }
        }
        for &index in &self.root_indices {
            if let Some(&handle) = handles.get(index) {
                scene.attach(handle, root);
            }
        }

        scene.attach_root(root);
        PrefabInstance { root, nodes: handles }
    }
}

/// Scene handles of an instantiated prefab.
#[derive(Debug, Clone)]
pub struct PrefabInstance {
    /// The group holding the asset's top-level nodes.
    pub root: NodeHandle,
    /// Handle of `Prefab::nodes[i]` at index `i`.
    pub nodes: Vec<NodeHandle>,
}
