use std::sync::Arc;

use base64::Engine as _;
use glam::{Quat, Vec3};

use crate::animation::binding::TargetPath;
use crate::animation::clip::{AnimationClip, Track, TrackData, TrackMeta};
use crate::animation::tracks::{InterpolationMode, KeyframeTrack};
use crate::assets::io::AssetReader;
use crate::assets::prefab::{Prefab, PrefabNode};
use crate::errors::{Result, VitrineError};
use crate::scene::node::MeshBounds;

// ============================================================================
// Buffers
// ============================================================================

const DATA_URI_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Resolves every buffer of `gltf`: the GLB `BIN` chunk, embedded base64
/// `data:` URIs, and relative URIs read through `reader`. External buffers
/// are fetched concurrently.
pub async fn load_buffers<R: AssetReader>(gltf: &gltf::Gltf, reader: &R) -> Result<Vec<Vec<u8>>> {
    let futures = gltf.buffers().map(|buffer| async move {
        let mut data = match buffer.source() {
            gltf::buffer::Source::Bin => gltf
                .blob
                .as_deref()
                .map(<[u8]>::to_vec)
                .ok_or_else(|| VitrineError::Parse("Missing GLB binary chunk".into()))?,
            gltf::buffer::Source::Uri(uri) if uri.starts_with(DATA_URI_PREFIX) => decode_data_uri(uri)?,
            gltf::buffer::Source::Uri(uri) => reader.read_bytes(uri).await?,
        };

        if data.len() < buffer.length() {
            return Err(VitrineError::Parse(format!(
                "buffer {} holds {} byte(s), {} declared",
                buffer.index(),
                data.len(),
                buffer.length()
            )));
        }
        // GLB chunks are padded to 4 bytes.
        data.truncate(buffer.length());
        Ok::<_, VitrineError>(data)
    });

    futures::future::try_join_all(futures).await
}

fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let Some((_, payload)) = uri.split_once(BASE64_MARKER) else {
        return Err(VitrineError::Parse(format!(
            "unsupported data URI: {}",
            uri.chars().take(48).collect::<String>()
        )));
    };
    Ok(base64::engine::general_purpose::STANDARD.decode(payload)?)
}

// ============================================================================
// Decoding
// ============================================================================

/// Turns a parsed glTF document into a [`Prefab`].
///
/// Only the parts the exhibit uses are read: the default scene's node
/// hierarchy with names and TRS, mesh bounds, and node animations.
pub struct GltfLoader<'a> {
    gltf: &'a gltf::Gltf,
    buffers: &'a [Vec<u8>],
}

impl<'a> GltfLoader<'a> {
    #[must_use]
    pub fn new(gltf: &'a gltf::Gltf, buffers: &'a [Vec<u8>]) -> Self {
        Self { gltf, buffers }
    }

    pub fn decode(&self) -> Result<Prefab> {
        let unsupported: Vec<_> = self.gltf.extensions_required().collect();
        if !unsupported.is_empty() {
            log::warn!("glTF file requires unsupported extensions: {unsupported:?}");
        }

        let mut prefab = Prefab::new();
        prefab.nodes = self.gltf.nodes().map(|n| Self::load_node(&n)).collect();

        if let Some(scene) = self.gltf.default_scene().or_else(|| self.gltf.scenes().next()) {
            prefab.root_indices = scene.nodes().map(|n| n.index()).collect();
        } else {
            // No scene: every parentless node is a root.
            let mut has_parent = vec![false; prefab.nodes.len()];
            for node in &prefab.nodes {
                for &child in &node.children_indices {
                    has_parent[child] = true;
                }
            }
            prefab.root_indices = (0..prefab.nodes.len()).filter(|&i| !has_parent[i]).collect();
        }

        prefab.animations = self.load_animations()?.into_iter().map(Arc::new).collect();
        Ok(prefab)
    }

    fn node_name(node: &gltf::Node) -> String {
        node.name()
            .map_or_else(|| format!("Node_{}", node.index()), str::to_string)
    }

    fn load_node(node: &gltf::Node) -> PrefabNode {
        let mut p = PrefabNode {
            name: Self::node_name(node),
            children_indices: node.children().map(|c| c.index()).collect(),
            mesh_bounds: node.mesh().and_then(|m| Self::mesh_bounds(&m)),
            ..PrefabNode::default()
        };
        let (t, r, s) = node.transform().decomposed();
        p.transform.position = Vec3::from_array(t);
        p.transform.rotation = Quat::from_array(r);
        p.transform.scale = Vec3::from_array(s);
        p
    }

    /// Union of the primitives' accessor bounds.
    fn mesh_bounds(mesh: &gltf::Mesh) -> Option<MeshBounds> {
        mesh.primitives()
            .map(|p| {
                let b = p.bounding_box();
                MeshBounds {
                    min: Vec3::from_array(b.min),
                    max: Vec3::from_array(b.max),
                }
            })
            .reduce(|a, b| MeshBounds {
                min: a.min.min(b.min),
                max: a.max.max(b.max),
            })
    }

    fn load_animations(&self) -> Result<Vec<AnimationClip>> {
        let mut animations = Vec::new();

        for (anim_index, anim) in self.gltf.animations().enumerate() {
            let mut tracks = Vec::new();

            for channel in anim.channels() {
                let reader = channel.reader(|buffer| self.buffers.get(buffer.index()).map(Vec::as_slice));
                let target = channel.target();
                let node_index = target.node().index();
                let node_name = Self::node_name(&target.node());

                let times: Vec<f32> = reader
                    .read_inputs()
                    .ok_or_else(|| VitrineError::Parse(format!("animation {anim_index}: unreadable keyframe times")))?
                    .collect();

                let interpolation = match channel.sampler().interpolation() {
                    gltf::animation::Interpolation::Linear => InterpolationMode::Linear,
                    gltf::animation::Interpolation::Step => InterpolationMode::Step,
                    gltf::animation::Interpolation::CubicSpline => InterpolationMode::CubicSpline,
                };

                let outputs = reader.read_outputs().ok_or_else(|| {
                    VitrineError::Parse(format!("animation {anim_index}: unreadable keyframe values"))
                })?;

                let (target_path, data) = match outputs {
                    gltf::animation::util::ReadOutputs::Translations(iter) => (
                        TargetPath::Translation,
                        TrackData::Vector3(KeyframeTrack::new(
                            times,
                            iter.map(Vec3::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    gltf::animation::util::ReadOutputs::Rotations(iter) => (
                        TargetPath::Rotation,
                        TrackData::Quaternion(KeyframeTrack::new(
                            times,
                            iter.into_f32().map(Quat::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    gltf::animation::util::ReadOutputs::Scales(iter) => (
                        TargetPath::Scale,
                        TrackData::Vector3(KeyframeTrack::new(
                            times,
                            iter.map(Vec3::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    gltf::animation::util::ReadOutputs::MorphTargetWeights(_) => {
                        log::debug!("Skipping morph-weight channel on '{node_name}'");
                        continue;
                    }
                };

                data.validate().map_err(|e| {
                    VitrineError::Parse(format!("animation {anim_index}, channel on '{node_name}': {e}"))
                })?;

                tracks.push(Track {
                    meta: TrackMeta {
                        node_name,
                        node_index: Some(node_index),
                        target: target_path,
                    },
                    data,
                });
            }

            let name = anim
                .name()
                .map_or_else(|| format!("animation_{anim_index}"), str::to_string);
            animations.push(AnimationClip::new(name, tracks));
        }

        Ok(animations)
    }
}
