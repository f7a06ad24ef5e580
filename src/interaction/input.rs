use glam::Vec2;

use crate::scene::Camera;
use crate::scene::raycast::Ray;

/// Pointer state in window pixels.
#[derive(Default, Debug, Clone)]
pub struct Input {
    /// Position of the last click, origin at the top-left corner.
    pub cursor_position: Vec2,
    /// Viewport size in pixels.
    pub screen_size: Vec2,
}

impl Input {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let mut input = Self::default();
        input.handle_resize(width, height);
        input
    }

    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.screen_size = Vec2::new(width as f32, height as f32);
    }

    #[must_use]
    pub fn aspect(&self) -> Option<f32> {
        (self.screen_size.x > 0.0 && self.screen_size.y > 0.0)
            .then(|| self.screen_size.x / self.screen_size.y)
    }

    /// Converts a pixel position to normalized device coordinates,
    /// `x` right and `y` up in `[-1, 1]`. `None` while the viewport is empty.
    #[must_use]
    pub fn to_ndc(&self, screen_pos: Vec2) -> Option<Vec2> {
        if self.screen_size.x <= 0.0 || self.screen_size.y <= 0.0 {
            return None;
        }
        Some(Vec2::new(
            screen_pos.x / self.screen_size.x * 2.0 - 1.0,
            -(screen_pos.y / self.screen_size.y) * 2.0 + 1.0,
        ))
    }

    /// Picking ray through `screen_pos`.
    #[must_use]
    pub fn pick_ray(&self, camera: &Camera, screen_pos: Vec2) -> Option<Ray> {
        self.to_ndc(screen_pos).map(|ndc| camera.ray_from_ndc(ndc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndc_corners() {
        let input = Input::new(800, 600);
        assert_eq!(input.to_ndc(Vec2::new(0.0, 0.0)), Some(Vec2::new(-1.0, 1.0)));
        assert_eq!(input.to_ndc(Vec2::new(800.0, 600.0)), Some(Vec2::new(1.0, -1.0)));
        assert_eq!(input.to_ndc(Vec2::new(400.0, 300.0)), Some(Vec2::ZERO));
    }

    #[test]
    fn empty_viewport_has_no_ndc() {
        let input = Input::default();
        assert!(input.to_ndc(Vec2::ONE).is_none());
        assert!(input.aspect().is_none());
    }
}
