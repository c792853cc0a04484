//! Free-fly camera driven by the editor.
//!
//! Input polling lives outside this crate, so panning and zooming are
//! exposed as explicit calls that an input layer can forward to.

use glam::{Mat4, Vec3};

use super::camera::OrthographicCamera;

const MIN_ZOOM: f32 = 0.25;
const ZOOM_STEP: f32 = 0.25;

/// Orthographic camera with an aspect ratio and a zoom level.
///
/// The visible half-height equals the zoom level; the half-width is
/// `aspect_ratio * zoom`.
#[derive(Clone, Debug)]
pub struct EditorCamera {
    camera: OrthographicCamera,
    aspect_ratio: f32,
    zoom: f32,
    viewport_width: f32,
    viewport_height: f32,
}

impl Default for EditorCamera {
    fn default() -> Self {
        Self::new(1280.0 / 720.0)
    }
}

impl EditorCamera {
    pub fn new(aspect_ratio: f32) -> Self {
        let mut editor = Self {
            camera: OrthographicCamera::default(),
            aspect_ratio,
            zoom: 1.0,
            viewport_width: 1280.0,
            viewport_height: 720.0,
        };
        editor.calculate_view();
        editor
    }

    /// Update the aspect ratio from a viewport size. Zero-area sizes are ignored.
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.viewport_width = width;
        self.viewport_height = height;
        self.aspect_ratio = width / height;
        self.calculate_view();
    }

    pub fn viewport_size(&self) -> (f32, f32) {
        (self.viewport_width, self.viewport_height)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn zoom_level(&self) -> f32 {
        self.zoom
    }

    pub fn set_zoom_level(&mut self, level: f32) {
        self.zoom = level.max(MIN_ZOOM);
        self.calculate_view();
    }

    /// Apply a scroll-wheel delta. Positive values zoom in.
    pub fn zoom(&mut self, scroll_delta: f32) {
        self.set_zoom_level(self.zoom - scroll_delta * ZOOM_STEP);
    }

    /// Move the camera by a direction scaled by the zoom level and `dt`,
    /// so panning feels the same at every zoom.
    pub fn pan(&mut self, dx: f32, dy: f32, dt: f32) {
        let mut position = self.camera.position();
        position.x += dx * self.zoom * dt;
        position.y += dy * self.zoom * dt;
        self.camera.set_position(position);
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.camera.set_position(position);
    }

    pub fn position(&self) -> Vec3 {
        self.camera.position()
    }

    pub fn camera(&self) -> &OrthographicCamera {
        &self.camera
    }

    pub fn view_projection_matrix(&self) -> &Mat4 {
        self.camera.view_projection_matrix()
    }

    fn calculate_view(&mut self) {
        self.camera.set_projection(
            -self.aspect_ratio * self.zoom,
            self.aspect_ratio * self.zoom,
            -self.zoom,
            self.zoom,
        );
    }
}
