//! Analytic hit-volume shapes.
//!
//! All intersection routines work in the shape's local space: the shape is
//! centred at the origin and, for cylinders, its axis is +Y. Callers transform
//! the ray with the inverse world matrix first (see [`crate::scene::raycast`]),
//! which keeps the returned `t` valid in world space.

use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    /// Truncated cone; equal radii give a plain cylinder.
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
    },
    Box {
        size: Vec3,
    },
}

impl Default for Shape {
    fn default() -> Self {
        Shape::Cylinder {
            radius_top: 1.0,
            radius_bottom: 1.0,
            height: 2.0,
        }
    }
}

impl Shape {
    /// All dimensions strictly positive (cone radii may be zero at one end).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match *self {
            Shape::Cylinder {
                radius_top,
                radius_bottom,
                height,
            } => {
                height > 0.0
                    && radius_top >= 0.0
                    && radius_bottom >= 0.0
                    && (radius_top > 0.0 || radius_bottom > 0.0)
            }
            Shape::Box { size } => size.cmpgt(Vec3::ZERO).all(),
        }
    }

    /// Nearest non-negative ray parameter at which `origin + t * dir` enters
    /// (or, from inside, leaves) the shape.
    #[must_use]
    pub fn intersect_local(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        match *self {
            Shape::Cylinder {
                radius_top,
                radius_bottom,
                height,
            } => ray_cone_frustum(origin, dir, radius_top, radius_bottom, height),
            Shape::Box { size } => {
                let he = size * 0.5;
                ray_aabb(origin, dir, -he, he)
            }
        }
    }
}

/// Slab-method ray/AABB intersection.
#[must_use]
pub fn ray_aabb(origin: Vec3, dir: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        if d.abs() < 1e-12 {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (min[axis] - o) * inv;
        let mut t1 = (max[axis] - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }

    if t_far < 0.0 {
        return None;
    }
    Some(if t_near >= 0.0 { t_near } else { t_far })
}

/// Ray against a Y-axis truncated cone centred at the origin, caps included.
fn ray_cone_frustum(origin: Vec3, dir: Vec3, r_top: f32, r_bottom: f32, height: f32) -> Option<f32> {
    let half = height * 0.5;
    // r(y) = r_mid + k * y
    let k = (r_top - r_bottom) / height;
    let r_mid = (r_top + r_bottom) * 0.5;

    let mut best: Option<f32> = None;
    let mut consider = |t: f32| {
        if t >= 0.0 && best.is_none_or(|b| t < b) {
            best = Some(t);
        }
    };

    // Lateral surface: x^2 + z^2 = (r_mid + k*y)^2
    let ry = r_mid + k * origin.y;
    let a = dir.x * dir.x + dir.z * dir.z - k * k * dir.y * dir.y;
    let b = 2.0 * (origin.x * dir.x + origin.z * dir.z - k * ry * dir.y);
    let c = origin.x * origin.x + origin.z * origin.z - ry * ry;

    let on_side = |t: f32| {
        let y = origin.y + t * dir.y;
        y.abs() <= half && r_mid + k * y >= 0.0
    };

    if a.abs() > 1e-12 {
        let disc = b * b - 4.0 * a * c;
        if disc >= 0.0 {
            let sq = disc.sqrt();
            for t in [(-b - sq) / (2.0 * a), (-b + sq) / (2.0 * a)] {
                if on_side(t) {
                    consider(t);
                }
            }
        }
    } else if b.abs() > 1e-12 {
        let t = -c / b;
        if on_side(t) {
            consider(t);
        }
    }

    // Caps
    if dir.y.abs() > 1e-12 {
        for (y_cap, r_cap) in [(half, r_top), (-half, r_bottom)] {
            let t = (y_cap - origin.y) / dir.y;
            let x = origin.x + t * dir.x;
            let z = origin.z + t * dir.z;
            if x * x + z * z <= r_cap * r_cap {
                consider(t);
            }
        }
    }

    best
}
