//! Scene camera component.
//!
//! A [`Camera`] embeds an [`OrthographicCamera`] and remembers the
//! orthographic size and depth range so the projection can be rebuilt when
//! the viewport changes. The render pass picks the first camera with
//! `primary` set (storage order) to drive runtime rendering.

use bevy_ecs::prelude::Component;

use crate::render::camera::OrthographicCamera;

pub const DEFAULT_ORTHOGRAPHIC_SIZE: f32 = 10.0;
pub const DEFAULT_ORTHOGRAPHIC_NEAR: f32 = -1.0;
pub const DEFAULT_ORTHOGRAPHIC_FAR: f32 = 1.0;

#[derive(Component, Clone, Debug)]
pub struct Camera {
    pub camera: OrthographicCamera,
    /// Only one camera should be primary. With several, the first one in
    /// storage order wins.
    pub primary: bool,
    /// When set, viewport resizes leave the projection alone.
    pub fixed_aspect_ratio: bool,
    /// Visible height in world units.
    pub orthographic_size: f32,
    pub orthographic_near: f32,
    pub orthographic_far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            camera: OrthographicCamera::new(-1.0, 1.0, -1.0, 1.0),
            primary: true,
            fixed_aspect_ratio: false,
            orthographic_size: DEFAULT_ORTHOGRAPHIC_SIZE,
            orthographic_near: DEFAULT_ORTHOGRAPHIC_NEAR,
            orthographic_far: DEFAULT_ORTHOGRAPHIC_FAR,
        }
    }
}

impl Camera {
    /// Camera with the given orthographic size and a square projection.
    pub fn with_size(orthographic_size: f32) -> Self {
        let mut camera = Self {
            orthographic_size,
            ..Self::default()
        };
        camera.apply_aspect_ratio(1.0);
        camera
    }

    /// Builder: set the primary flag.
    pub fn primary(mut self, primary: bool) -> Self {
        self.primary = primary;
        self
    }

    /// Rebuild the projection for an aspect ratio (width / height) from the
    /// stored size and depth range.
    pub fn apply_aspect_ratio(&mut self, aspect_ratio: f32) {
        let half_height = self.orthographic_size * 0.5;
        let half_width = half_height * aspect_ratio;
        self.camera.set_projection_with_depth(
            -half_width,
            half_width,
            -half_height,
            half_height,
            self.orthographic_near,
            self.orthographic_far,
        );
    }

    /// Resize for a viewport in pixels. Zero-area viewports and fixed-aspect
    /// cameras are left untouched; returns whether the projection changed.
    pub fn set_viewport_size(&mut self, width: u32, height: u32) -> bool {
        if self.fixed_aspect_ratio || width == 0 || height == 0 {
            return false;
        }
        self.apply_aspect_ratio(width as f32 / height as f32);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_default_is_primary() {
        let camera = Camera::default();
        assert!(camera.primary);
        assert!(!camera.fixed_aspect_ratio);
        assert!(approx_eq(camera.orthographic_size, 10.0));
    }

    #[test]
    fn test_viewport_resize_matches_aspect() {
        let mut camera = Camera::default();
        assert!(camera.set_viewport_size(1920, 1080));
        let (l, r, b, t) = camera.camera.bounds();
        assert!(approx_eq((r - l) / (t - b), 1920.0 / 1080.0));
        assert!(approx_eq(t - b, 10.0));
    }

    #[test]
    fn test_fixed_aspect_ignores_resize() {
        let mut camera = Camera::with_size(4.0);
        camera.fixed_aspect_ratio = true;
        assert!(!camera.set_viewport_size(1920, 1080));
        assert_eq!(camera.camera.bounds(), (-2.0, 2.0, -2.0, 2.0));
    }

    #[test]
    fn test_zero_area_viewport_is_ignored() {
        let mut camera = Camera::with_size(4.0);
        assert!(!camera.set_viewport_size(0, 1080));
        assert!(!camera.set_viewport_size(1920, 0));
        assert_eq!(camera.camera.bounds(), (-2.0, 2.0, -2.0, 2.0));
    }
}
