use glam::{Affine3A, Vec3};

use crate::scene::NodeHandle;
use crate::scene::shape::Shape;
use crate::scene::transform::Transform;

/// A scene node.
///
/// Nodes form a tree through parent/child handles. Everything that can be
/// hit-tested hangs off a node through [`NodeKind`].
///
/// # Visibility vs. pickability
///
/// `visible` controls drawing only. `pickable` controls participation in ray
/// queries. A transparent proxy volume is visible-but-invisible-to-the-eye and
/// still pickable; a hidden proxy volume is neither.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,

    /// Drawn by the renderer.
    pub visible: bool,
    /// Participates in ray queries.
    pub pickable: bool,

    pub kind: NodeKind,
}

/// What a node carries besides its transform.
#[derive(Debug, Clone, Default)]
pub enum NodeKind {
    /// Pure grouping/transform node.
    #[default]
    Group,
    /// Camera-facing textured marker with a unit quad scaled by the
    /// node's transform.
    Sprite(Sprite),
    /// Analytic 3D volume with a flat material.
    Volume(Volume),
    /// Imported mesh, represented by its local bounding box.
    Mesh(MeshBounds),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Image reference resolved by the host's texture loader.
    pub icon: String,
    pub depth_test: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    pub shape: Shape,
    pub material: VolumeMaterial,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeMaterial {
    /// 0xRRGGBB
    pub color: u32,
    pub opacity: f32,
    pub transparent: bool,
}

impl VolumeMaterial {
    /// Material with the given opacity; transparent iff opacity < 1.
    #[must_use]
    pub fn with_opacity(color: u32, opacity: f32) -> Self {
        Self {
            color,
            opacity,
            transparent: opacity < 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Node {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            visible: true,
            pickable: true,
            kind: NodeKind::Group,
        }
    }

    #[must_use]
    pub fn with_kind(name: &str, kind: NodeKind) -> Self {
        Self {
            kind,
            ..Self::new(name)
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }

    /// Mutable access to the volume material, if this is a volume node.
    pub fn volume_material_mut(&mut self) -> Option<&mut VolumeMaterial> {
        match &mut self.kind {
            NodeKind::Volume(v) => Some(&mut v.material),
            _ => None,
        }
    }

    #[must_use]
    pub fn volume_material(&self) -> Option<&VolumeMaterial> {
        match &self.kind {
            NodeKind::Volume(v) => Some(&v.material),
            _ => None,
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("")
    }
}
