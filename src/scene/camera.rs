use glam::{Affine3A, Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::scene::raycast::Ray;
use crate::scene::transform::Transform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionType {
    #[default]
    Perspective,
    Orthographic,
}

/// Viewing camera.
///
/// Unlike scene nodes the camera carries its own transform; the exhibit owns
/// a single camera per view and the orbit rig moves it directly.
#[derive(Debug, Clone)]
pub struct Camera {
    pub name: String,

    pub projection_type: ProjectionType,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Half-height of the view volume in orthographic mode.
    pub ortho_size: f32,

    pub transform: Transform,

    pub(crate) view_matrix: Mat4,
    pub(crate) projection_matrix: Mat4,
    pub(crate) view_projection_matrix: Mat4,
}

impl Camera {
    /// Perspective camera; `fov` is given in degrees.
    #[must_use]
    pub fn new_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            name: "Camera".to_string(),
            projection_type: ProjectionType::Perspective,
            fov: fov.to_radians(),
            aspect,
            near,
            far,
            ortho_size: 10.0,
            transform: Transform::new(),
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
        };

        cam.update_matrices();
        cam
    }

    /// Places the camera at `eye` looking at `target` with +Y up.
    pub fn look_at(&mut self, eye: Vec3, target: Vec3) {
        self.transform.position = eye;
        self.transform.look_at(target, Vec3::Y);
        self.update_matrices();
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_matrices();
    }

    /// Recomputes view, projection and view-projection matrices from the
    /// current transform and projection parameters.
    pub fn update_matrices(&mut self) {
        self.projection_matrix = match self.projection_type {
            ProjectionType::Perspective => {
                Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
            }
            ProjectionType::Orthographic => {
                let w = self.ortho_size * self.aspect;
                let h = self.ortho_size;
                Mat4::orthographic_rh(-w, w, -h, h, self.near, self.far)
            }
        };

        self.transform.update_local_matrix();
        let world = *self.transform.local_matrix();
        self.transform.set_world_matrix(world);

        self.view_matrix = Mat4::from(world).inverse();
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    #[inline]
    #[must_use]
    pub fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        self.transform.world_matrix()
    }

    #[inline]
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.view_projection_matrix
    }

    /// Builds a world-space picking ray through a normalized-device
    /// coordinate (x right, y up, both in [-1, 1]).
    #[must_use]
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_projection_matrix.inverse();
        // Depth range: near = 0, far = 1
        let near = inv.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inv.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));

        let origin = match self.projection_type {
            ProjectionType::Perspective => self.position(),
            ProjectionType::Orthographic => near,
        };

        Ray::new(origin, far - near).facing(self.rotation())
    }

    /// Projects a world-space point into normalized device coordinates.
    #[must_use]
    pub fn project(&self, world: Vec3) -> Vec2 {
        let p = self.view_projection_matrix.project_point3(world);
        Vec2::new(p.x, p.y)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new_perspective(75.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}
