//! Handle to a loaded asset.

use std::sync::Arc;

use crate::animation::clip::AnimationClip;
use crate::scene::NodeHandle;

/// A loaded asset: its root node in the scene plus its animation clips.
///
/// Created once per successful load and immutable afterwards.
#[derive(Debug, Clone)]
pub struct AssetHandle {
    root: NodeHandle,
    nodes: Vec<NodeHandle>,
    clips: Vec<Arc<AnimationClip>>,
    source: String,
}

impl AssetHandle {
    #[must_use]
    pub fn new(root: NodeHandle, clips: Vec<Arc<AnimationClip>>, source: impl Into<String>) -> Self {
        Self {
            root,
            nodes: Vec::new(),
            clips,
            source: source.into(),
        }
    }

    /// Sets the table from file node index to scene handle.
    #[must_use]
    pub fn with_nodes(mut self, nodes: Vec<NodeHandle>) -> Self {
        self.nodes = nodes;
        self
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// Scene handles of the file's nodes, indexed like the file.
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[NodeHandle] {
        &self.nodes
    }

    #[must_use]
    pub fn node(&self, index: usize) -> Option<NodeHandle> {
        self.nodes.get(index).copied()
    }

    /// Clips in file order.
    #[inline]
    #[must_use]
    pub fn clips(&self) -> &[Arc<AnimationClip>] {
        &self.clips
    }

    #[must_use]
    pub fn clip(&self, name: &str) -> Option<&Arc<AnimationClip>> {
        self.clips.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn clip_names(&self) -> Vec<String> {
        self.clips.iter().map(|c| c.name.clone()).collect()
    }

    /// Path or URL the asset was loaded from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}
