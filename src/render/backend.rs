//! Render backend contract.
//!
//! The scene only decides *what* to draw; a backend implementing
//! [`RenderBackend`] turns the submitted quads into GPU work. The
//! [`RecordingBackend`] keeps the submissions in memory, which is what the
//! headless binary and the tests use.

use std::sync::Arc;

use glam::{Mat4, Vec4};

use super::texture::Texture2D;

/// Sink for 2D draw submissions.
///
/// Calls always come in `begin_scene`, zero or more quads, `end_scene` order.
pub trait RenderBackend {
    fn begin_scene(&mut self, view_projection: &Mat4);
    fn draw_quad(&mut self, transform: &Mat4, color: Vec4);
    fn draw_textured_quad(
        &mut self,
        transform: &Mat4,
        texture: &Arc<Texture2D>,
        tiling_factor: f32,
        tint: Vec4,
    );
    fn end_scene(&mut self);
}

/// A single recorded submission.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    BeginScene {
        view_projection: Mat4,
    },
    Quad {
        transform: Mat4,
        color: Vec4,
    },
    TexturedQuad {
        transform: Mat4,
        texture: Arc<Texture2D>,
        tiling_factor: f32,
        tint: Vec4,
    },
    EndScene,
}

/// Backend that stores every submission.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    commands: Vec<DrawCommand>,
    scenes: usize,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of `begin_scene` calls seen since creation or the last [`clear`](Self::clear).
    pub fn scene_count(&self) -> usize {
        self.scenes
    }

    /// Number of quads (flat and textured) recorded.
    pub fn quad_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Quad { .. } | DrawCommand::TexturedQuad { .. }))
            .count()
    }

    /// The view-projection of the most recent `begin_scene`, if any.
    pub fn last_view_projection(&self) -> Option<Mat4> {
        self.commands.iter().rev().find_map(|c| match c {
            DrawCommand::BeginScene { view_projection } => Some(*view_projection),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.scenes = 0;
    }
}

impl RenderBackend for RecordingBackend {
    fn begin_scene(&mut self, view_projection: &Mat4) {
        self.scenes += 1;
        self.commands.push(DrawCommand::BeginScene {
            view_projection: *view_projection,
        });
    }

    fn draw_quad(&mut self, transform: &Mat4, color: Vec4) {
        self.commands.push(DrawCommand::Quad {
            transform: *transform,
            color,
        });
    }

    fn draw_textured_quad(
        &mut self,
        transform: &Mat4,
        texture: &Arc<Texture2D>,
        tiling_factor: f32,
        tint: Vec4,
    ) {
        self.commands.push(DrawCommand::TexturedQuad {
            transform: *transform,
            texture: Arc::clone(texture),
            tiling_factor,
            tint,
        });
    }

    fn end_scene(&mut self) {
        self.commands.push(DrawCommand::EndScene);
    }
}
