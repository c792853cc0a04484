//! Sprite submission.
//!
//! Both passes submit every entity carrying [`Transform`] and
//! [`SpriteRenderer`] exactly once, in storage order, between a
//! `begin_scene`/`end_scene` pair. They differ only in where the
//! view-projection comes from:
//!
//! - [`render_runtime`] uses the scene's primary [`Camera`] and draws nothing
//!   when there is none.
//! - [`render_editor`] uses an external [`EditorCamera`].

use bevy_ecs::prelude::*;
use glam::Mat4;

use crate::components::camera::Camera;
use crate::components::spriterenderer::SpriteRenderer;
use crate::components::transform::Transform;
use crate::render::backend::RenderBackend;
use crate::render::editorcamera::EditorCamera;
use crate::systems::camera::primary_camera_entity;

fn submit_sprites(world: &mut World, backend: &mut dyn RenderBackend) {
    let mut query = world.query::<(&Transform, &SpriteRenderer)>();
    for (transform, sprite) in query.iter(world) {
        let model = transform.matrix();
        match &sprite.texture {
            Some(texture) => {
                backend.draw_textured_quad(&model, texture, sprite.tiling_factor, sprite.color)
            }
            None => backend.draw_quad(&model, sprite.color),
        }
    }
}

/// Render through the primary camera. Returns `false` without touching the
/// backend when the scene has no primary camera.
///
/// The camera's view position follows the world translation of its entity;
/// the entity's rotation and scale do not affect the projection.
pub fn render_runtime(world: &mut World, backend: &mut dyn RenderBackend) -> bool {
    let Some(camera_entity) = primary_camera_entity(world) else {
        return false;
    };
    let Some(transform) = world.get::<Transform>(camera_entity).copied() else {
        return false;
    };
    let view_projection: Mat4 = {
        let Some(mut camera) = world.get_mut::<Camera>(camera_entity) else {
            return false;
        };
        camera
            .camera
            .set_position(transform.matrix().w_axis.truncate());
        *camera.camera.view_projection_matrix()
    };

    backend.begin_scene(&view_projection);
    submit_sprites(world, backend);
    backend.end_scene();
    true
}

/// Render through the editor's free-fly camera.
pub fn render_editor(world: &mut World, editor_camera: &EditorCamera, backend: &mut dyn RenderBackend) {
    backend.begin_scene(editor_camera.view_projection_matrix());
    submit_sprites(world, backend);
    backend.end_scene();
}
