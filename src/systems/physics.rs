//! Physics bridge between scene components and the rapier2d world.
//!
//! - [`start_physics`] builds a [`PhysicsWorld2D`] from every entity carrying a
//!   [`RigidBody2D`] (plus its optional [`BoxCollider2D`]) and inserts it as a
//!   resource.
//! - [`physics_step_system`] advances the world by the scene's delta and
//!   writes body poses back into [`Transform`]s.
//! - [`stop_physics`] removes the world and clears every runtime handle.
//! - [`remove_entity_body`] and [`remove_entity_collider`] tear down one
//!   entity's rapier objects while the world keeps running.
//!
//! Only `translation.x`, `translation.y` and `rotation.z` are ever written
//! back; depth, the other rotation axes and scale stay as authored.

use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::components::boxcollider::BoxCollider2D;
use crate::components::rigidbody::RigidBody2D;
use crate::components::transform::Transform;
use crate::resources::physicsworld::{
    BodyDefinition, BoxFixtureDefinition, PhysicsSettings, PhysicsWorld2D,
};
use crate::resources::worldtime::WorldTime;

/// Create the physics world and one body per [`RigidBody2D`] entity.
///
/// Bodies start at `(translation.x, translation.y)` with angle `rotation.z`.
/// A [`BoxCollider2D`] on the same entity becomes a box fixture whose half
/// extents are `size * scale.xy`. Component values are used as they are.
pub fn start_physics(world: &mut World, settings: &PhysicsSettings) {
    if world.contains_resource::<PhysicsWorld2D>() {
        warn!("Physics already running, restarting it");
        stop_physics(world);
    }

    let mut physics = PhysicsWorld2D::new(settings);

    let mut query =
        world.query::<(&Transform, &mut RigidBody2D, Option<&mut BoxCollider2D>)>();
    for (transform, mut rigidbody, collider) in query.iter_mut(world) {
        let body = physics.create_body(&BodyDefinition {
            body_type: rigidbody.body_type,
            position: transform.translation.truncate(),
            angle: transform.rotation.z,
            fixed_rotation: rigidbody.fixed_rotation,
        });
        rigidbody.runtime_body = Some(body);

        if let Some(mut collider) = collider {
            let fixture = physics.create_box_fixture(
                body,
                &BoxFixtureDefinition {
                    half_extents: collider.scaled_half_extents(transform.scale.truncate()),
                    offset: collider.offset,
                    density: collider.density,
                    friction: collider.friction,
                    restitution: collider.restitution,
                    restitution_threshold: collider.restitution_threshold,
                },
            );
            collider.runtime_collider = Some(fixture);
        }
    }

    debug!(
        "Physics started with {} bodies and {} colliders",
        physics.body_count(),
        physics.collider_count()
    );
    world.insert_resource(physics);
}

/// Destroy the physics world. Every stored handle is cleared since it would
/// dangle afterwards.
pub fn stop_physics(world: &mut World) {
    if world.remove_resource::<PhysicsWorld2D>().is_none() {
        return;
    }

    let mut bodies = world.query::<&mut RigidBody2D>();
    for mut rigidbody in bodies.iter_mut(world) {
        rigidbody.runtime_body = None;
    }
    let mut colliders = world.query::<&mut BoxCollider2D>();
    for mut collider in colliders.iter_mut(world) {
        collider.runtime_collider = None;
    }
    debug!("Physics stopped");
}

/// Remove the body of one entity, together with its fixture, while the
/// simulation runs. The entity's handles are cleared.
pub fn remove_entity_body(world: &mut World, entity: Entity) {
    let Some(body) = world
        .get::<RigidBody2D>(entity)
        .and_then(|rigidbody| rigidbody.runtime_body)
    else {
        return;
    };
    if let Some(mut physics) = world.get_resource_mut::<PhysicsWorld2D>() {
        physics.remove_body(body);
    }

    if let Some(mut rigidbody) = world.get_mut::<RigidBody2D>(entity) {
        rigidbody.runtime_body = None;
    }
    if let Some(mut collider) = world.get_mut::<BoxCollider2D>(entity) {
        collider.runtime_collider = None;
    }
    debug!("Removed physics body of entity {}", entity);
}

/// Remove only the fixture of one entity; its body keeps simulating.
pub fn remove_entity_collider(world: &mut World, entity: Entity) {
    let Some(fixture) = world
        .get_mut::<BoxCollider2D>(entity)
        .and_then(|mut collider| collider.runtime_collider.take())
    else {
        return;
    };
    if let Some(mut physics) = world.get_resource_mut::<PhysicsWorld2D>() {
        physics.remove_collider(fixture);
    }
}

/// Step the simulation by the current delta and copy poses back.
///
/// Does nothing while the physics world does not exist.
pub fn physics_step_system(
    physics: Option<ResMut<PhysicsWorld2D>>,
    time: Res<WorldTime>,
    mut query: Query<(&RigidBody2D, &mut Transform)>,
) {
    let Some(mut physics) = physics else {
        return;
    };

    physics.step(time.delta);

    for (rigidbody, mut transform) in query.iter_mut() {
        let Some(body) = rigidbody.runtime_body else {
            continue;
        };
        if let Some((position, angle)) = physics.body_pose(body) {
            transform.translation.x = position.x;
            transform.translation.y = position.y;
            transform.rotation.z = angle;
        }
    }
}
