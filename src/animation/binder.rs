use crate::animation::binding::PropertyBinding;
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

pub struct Binder;

impl Binder {
    /// Resolves each track's target node.
    ///
    /// Tracks that carry a node index are looked up in `nodes`, the asset's
    /// index-to-handle table, so duplicate node names bind correctly. Other
    /// tracks fall back to the first node named `node_name` inside the
    /// subtree at `root`. Unresolved tracks are dropped with a debug log.
    #[must_use]
    pub fn bind(scene: &Scene, root: NodeHandle, nodes: &[NodeHandle], clip: &AnimationClip) -> Vec<PropertyBinding> {
        let mut bindings = Vec::with_capacity(clip.tracks.len());

        for (track_index, track) in clip.tracks.iter().enumerate() {
            let resolved = match track.meta.node_index {
                Some(index) => nodes.get(index).copied().filter(|&h| scene.get_node(h).is_some()),
                None => scene.find_node_by_name(root, &track.meta.node_name),
            };
            match resolved {
                Some(node_handle) => bindings.push(PropertyBinding {
                    track_index,
                    node_handle,
                    target: track.meta.target,
                }),
                None => log::debug!(
                    "Clip '{}': no node for track on '{}', skipped",
                    clip.name,
                    track.meta.node_name
                ),
            }
        }

        bindings
    }
}
