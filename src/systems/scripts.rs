//! Native script host.
//!
//! Drives the [`Behavior`](crate::components::nativescript::Behavior) bound to
//! each [`NativeScript`] component. Both systems are exclusive: a behavior
//! gets the whole world through its [`ScriptContext`], so the instance is
//! taken out of its component for the duration of the call and put back
//! afterwards.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::nativescript::{Behavior, NativeScript, ScriptContext};
use crate::resources::worldtime::WorldTime;

fn scripted_entities(world: &mut World) -> Vec<Entity> {
    let mut query = world.query_filtered::<Entity, With<NativeScript>>();
    query.iter(world).collect()
}

/// Take the instance out of the component, creating it if needed.
/// The flag tells whether it was just created.
fn take_instance(world: &mut World, entity: Entity) -> Option<(Box<dyn Behavior>, bool)> {
    let mut script = world.get_mut::<NativeScript>(entity)?;
    match script.instance.take() {
        Some(instance) => Some((instance, false)),
        None => {
            debug!("Instantiating native script '{}'", script.name());
            Some((script.instantiate(), true))
        }
    }
}

/// Hand the instance back. If the component went away during the callback,
/// the instance is dropped.
fn restore_instance(world: &mut World, entity: Entity, instance: Box<dyn Behavior>) {
    if let Some(mut script) = world.get_mut::<NativeScript>(entity) {
        script.instance = Some(instance);
    }
}

/// Run every script for one frame, in storage order.
///
/// Scripts without an instance are instantiated and receive `on_create`
/// exactly once before their first `on_update`.
pub fn run_native_scripts(world: &mut World) {
    let dt = world
        .get_resource::<WorldTime>()
        .map(|time| time.delta)
        .unwrap_or(0.0);

    for entity in scripted_entities(world) {
        let Some((mut instance, created)) = take_instance(world, entity) else {
            continue;
        };

        let mut ctx = ScriptContext::new(entity, world);
        if created {
            instance.on_create(&mut ctx);
        }
        instance.on_update(&mut ctx, dt);

        restore_instance(world, entity, instance);
    }
}

/// Call `on_destroy` on every live instance and drop it. Bindings stay so the
/// scripts are created again on the next run.
pub fn destroy_native_scripts(world: &mut World) {
    for entity in scripted_entities(world) {
        let Some(mut instance) = world
            .get_mut::<NativeScript>(entity)
            .and_then(|mut script| script.instance.take())
        else {
            continue;
        };

        instance.on_destroy(&mut ScriptContext::new(entity, world));
    }
}
