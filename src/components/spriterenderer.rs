use std::sync::Arc;

use bevy_ecs::prelude::Component;
use glam::Vec4;

use crate::render::texture::Texture2D;

/// Draws the entity as a unit quad, flat-colored or textured.
///
/// `color` tints the texture when one is attached. The texture is shared
/// with every other sprite using the same asset.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct SpriteRenderer {
    pub color: Vec4,
    pub texture: Option<Arc<Texture2D>>,
    pub tiling_factor: f32,
}

impl Default for SpriteRenderer {
    fn default() -> Self {
        Self {
            color: Vec4::ONE,
            texture: None,
            tiling_factor: 1.0,
        }
    }
}

impl SpriteRenderer {
    pub fn from_color(color: Vec4) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    pub fn from_texture(texture: Arc<Texture2D>) -> Self {
        Self {
            texture: Some(texture),
            ..Self::default()
        }
    }
}
