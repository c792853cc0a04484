//! Scene camera resolution.
//!
//! Runtime rendering uses the first entity (storage order) whose [`Camera`]
//! is flagged primary. Ties between several primary cameras are not
//! resolved any further.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::camera::Camera;
use crate::components::transform::Transform;

/// The primary camera entity, if any.
pub fn primary_camera_entity(world: &mut World) -> Option<Entity> {
    let mut query = world.query::<(Entity, &Transform, &Camera)>();
    query
        .iter(world)
        .find(|(_, _, camera)| camera.primary)
        .map(|(entity, _, _)| entity)
}

/// Rebuild the projection of every camera for a viewport in pixels.
///
/// Zero-area viewports are ignored, as are cameras with a fixed aspect ratio.
pub fn resize_cameras(world: &mut World, width: u32, height: u32) {
    if width == 0 || height == 0 {
        debug!("Ignoring zero-area viewport {}x{}", width, height);
        return;
    }

    let mut query = world.query::<&mut Camera>();
    for mut camera in query.iter_mut(world) {
        camera.set_viewport_size(width, height);
    }
}
