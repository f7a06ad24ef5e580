//! Picking rays and hit records.

use glam::{Affine3A, Quat, Vec3};

use crate::scene::NodeHandle;
use crate::scene::node::{MeshBounds, NodeKind};
use crate::scene::shape::{self, Shape};

/// A world-space ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
    /// Orientation sprites turn towards. Rays built from a camera use the
    /// camera rotation; free rays face sprites back along the ray.
    pub facing: Option<Quat>,
}

impl Ray {
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            facing: None,
        }
    }

    #[must_use]
    pub fn facing(mut self, rotation: Quat) -> Self {
        self.facing = Some(rotation);
        self
    }

    #[inline]
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Result of a successful ray query.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub node: NodeHandle,
    /// Name of the node that was hit.
    pub name: String,
    pub distance: f32,
    pub point: Vec3,
}

/// Intersects a ray with a single node's geometry given its world matrix.
///
/// Returns the world-space distance along the ray.
pub(crate) fn intersect_kind(ray: &Ray, kind: &NodeKind, world: &Affine3A) -> Option<f32> {
    match kind {
        NodeKind::Group => None,
        NodeKind::Sprite(_) => intersect_sprite(ray, world),
        NodeKind::Volume(volume) => intersect_local_shape(ray, world, |o, d| {
            volume.shape.intersect_local(o, d)
        }),
        NodeKind::Mesh(MeshBounds { min, max }) => {
            intersect_local_shape(ray, world, |o, d| shape::ray_aabb(o, d, *min, *max))
        }
    }
}

fn intersect_local_shape(
    ray: &Ray,
    world: &Affine3A,
    f: impl Fn(Vec3, Vec3) -> Option<f32>,
) -> Option<f32> {
    if world.matrix3.determinant().abs() < 1e-12 {
        return None;
    }
    let inv = world.inverse();
    let o_local = inv.transform_point3(ray.origin);
    let d_local = inv.transform_vector3(ray.direction);
    f(o_local, d_local)
}

/// Camera-facing unit quad scaled by the node's world scale.
fn intersect_sprite(ray: &Ray, world: &Affine3A) -> Option<f32> {
    let (scale, _, center) = world.to_scale_rotation_translation();

    let (right, up, normal) = match ray.facing {
        Some(q) => (q * Vec3::X, q * Vec3::Y, q * Vec3::Z),
        None => {
            let n = -ray.direction;
            let right = Vec3::Y.cross(n).try_normalize().unwrap_or(Vec3::X);
            (right, n.cross(right), n)
        }
    };

    let denom = ray.direction.dot(normal);
    if denom.abs() < 1e-8 {
        return None;
    }
    let t = (center - ray.origin).dot(normal) / denom;
    if t < 0.0 {
        return None;
    }

    let offset = ray.at(t) - center;
    let u = offset.dot(right);
    let v = offset.dot(up);
    if u.abs() <= scale.x * 0.5 && v.abs() <= scale.y * 0.5 {
        Some(t)
    } else {
        None
    }
}

/// Convenience for shapes placed without a scene (tests, tooling).
#[must_use]
pub fn intersect_shape(ray: &Ray, shape: &Shape, world: &Affine3A) -> Option<f32> {
    intersect_local_shape(ray, world, |o, d| shape.intersect_local(o, d))
}
