//! 2D orthographic camera.
//!
//! Holds the projection bounds, the view position and z-rotation, and caches
//! the combined view-projection matrix uploaded by
//! [`RenderBackend::begin_scene`](super::backend::RenderBackend::begin_scene).

use glam::{Mat4, Vec3};

const DEFAULT_NEAR: f32 = -1.0;
const DEFAULT_FAR: f32 = 1.0;

/// Orthographic projection plus a view transform.
///
/// Rotation is expressed in degrees around the z axis.
#[derive(Clone, Debug, PartialEq)]
pub struct OrthographicCamera {
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    near: f32,
    far: f32,
    position: Vec3,
    rotation: f32,
    projection: Mat4,
    view: Mat4,
    view_projection: Mat4,
}

impl Default for OrthographicCamera {
    fn default() -> Self {
        Self::new(-1.0, 1.0, -1.0, 1.0)
    }
}

impl OrthographicCamera {
    /// Create a camera with the given bounds and the default `[-1, 1]` depth range.
    pub fn new(left: f32, right: f32, bottom: f32, top: f32) -> Self {
        let mut camera = Self {
            left,
            right,
            bottom,
            top,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            position: Vec3::ZERO,
            rotation: 0.0,
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            view_projection: Mat4::IDENTITY,
        };
        camera.recalculate_projection();
        camera
    }

    /// Replace the projection bounds, keeping the current depth range.
    pub fn set_projection(&mut self, left: f32, right: f32, bottom: f32, top: f32) {
        self.left = left;
        self.right = right;
        self.bottom = bottom;
        self.top = top;
        self.recalculate_projection();
    }

    /// Replace the projection bounds and the depth range.
    pub fn set_projection_with_depth(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) {
        self.near = near;
        self.far = far;
        self.set_projection(left, right, bottom, top);
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.recalculate_view();
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Set the z rotation in degrees.
    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees;
        self.recalculate_view();
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Projection bounds as `(left, right, bottom, top)`.
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        (self.left, self.right, self.bottom, self.top)
    }

    pub fn depth_range(&self) -> (f32, f32) {
        (self.near, self.far)
    }

    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection
    }

    pub fn view_matrix(&self) -> &Mat4 {
        &self.view
    }

    pub fn view_projection_matrix(&self) -> &Mat4 {
        &self.view_projection
    }

    fn recalculate_projection(&mut self) {
        self.projection = Mat4::orthographic_rh_gl(
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.near,
            self.far,
        );
        self.view_projection = self.projection * self.view;
    }

    fn recalculate_view(&mut self) {
        let transform = Mat4::from_translation(self.position)
            * Mat4::from_rotation_z(self.rotation.to_radians());
        self.view = transform.inverse();
        self.view_projection = self.projection * self.view;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_projection_maps_bounds_to_clip_space() {
        let camera = OrthographicCamera::new(-8.0, 8.0, -4.5, 4.5);
        let top_right = *camera.view_projection_matrix() * Vec4::new(8.0, 4.5, 0.0, 1.0);
        assert!(approx_eq(top_right.x, 1.0));
        assert!(approx_eq(top_right.y, 1.0));
        let bottom_left = *camera.view_projection_matrix() * Vec4::new(-8.0, -4.5, 0.0, 1.0);
        assert!(approx_eq(bottom_left.x, -1.0));
        assert!(approx_eq(bottom_left.y, -1.0));
    }

    #[test]
    fn test_position_moves_view() {
        let mut camera = OrthographicCamera::new(-1.0, 1.0, -1.0, 1.0);
        camera.set_position(Vec3::new(5.0, 2.0, 0.0));
        // The camera position lands at the clip-space origin.
        let center = *camera.view_projection_matrix() * Vec4::new(5.0, 2.0, 0.0, 1.0);
        assert!(approx_eq(center.x, 0.0));
        assert!(approx_eq(center.y, 0.0));
    }

    #[test]
    fn test_set_projection_keeps_view() {
        let mut camera = OrthographicCamera::default();
        camera.set_position(Vec3::new(1.0, 0.0, 0.0));
        camera.set_projection(-2.0, 2.0, -1.0, 1.0);
        assert_eq!(camera.position(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(camera.bounds(), (-2.0, 2.0, -1.0, 1.0));
        let p = *camera.view_projection_matrix() * Vec4::new(3.0, 0.0, 0.0, 1.0);
        assert!(approx_eq(p.x, 1.0));
    }

    #[test]
    fn test_rotation_in_degrees() {
        let mut camera = OrthographicCamera::default();
        camera.set_rotation(90.0);
        // A point on +y ends up on +x after undoing a 90 degree camera rotation.
        let p = *camera.view_matrix() * Vec4::new(0.0, 1.0, 0.0, 1.0);
        assert!(approx_eq(p.x, 1.0));
        assert!(approx_eq(p.y, 0.0));
    }
}
