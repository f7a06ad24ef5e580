use glam::Vec3;

use crate::scene::camera::Camera;

/// In-flight interpolation of the orbit target.
#[derive(Debug, Clone, Copy)]
struct TargetTransition {
    start: Vec3,
    end: Vec3,
    duration: f32,
    elapsed: f32,
}

/// Keeps the camera aimed at an orbit target and smoothly re-targets it.
///
/// The camera position is left to the host's orbit controls; the rig only
/// owns the point the camera looks at.
#[derive(Debug, Clone)]
pub struct CameraRig {
    target: Vec3,
    transition: Option<TargetTransition>,
}

impl CameraRig {
    #[must_use]
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            transition: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Starts moving the target towards `end` over `duration` seconds.
    /// A running transition is replaced, starting from the current target.
    pub fn focus(&mut self, end: Vec3, duration: f32) {
        if duration <= 0.0 {
            self.target = end;
            self.transition = None;
            return;
        }
        self.transition = Some(TargetTransition {
            start: self.target,
            end,
            duration,
            elapsed: 0.0,
        });
    }

    /// Advances the transition and re-aims the camera.
    pub fn update(&mut self, dt: f32, camera: &mut Camera) {
        if let Some(tr) = &mut self.transition {
            tr.elapsed += dt;
            let t = (tr.elapsed / tr.duration).min(1.0);
            self.target = tr.start.lerp(tr.end, t);
            if t >= 1.0 {
                self.transition = None;
            }
        }

        camera.transform.look_at(self.target, Vec3::Y);
        camera.update_matrices();
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}
