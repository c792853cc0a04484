//! Native behavior scripts attached to entities.
//!
//! A [`NativeScript`] component stores a constructor for a concrete
//! [`Behavior`] type without the scene knowing that type. The
//! [`run_native_scripts`](crate::systems::scripts::run_native_scripts) system
//! builds the instance on the first update, calls [`Behavior::on_create`]
//! once, then [`Behavior::on_update`] every frame.
//!
//! # Example
//!
//! ```ignore
//! #[derive(Default)]
//! struct Spinner;
//!
//! impl Behavior for Spinner {
//!     fn on_update(&mut self, ctx: &mut ScriptContext, dt: f32) {
//!         if let Ok(transform) = ctx.get_mut::<Transform>() {
//!             transform.rotation.z += dt;
//!         }
//!     }
//! }
//!
//! scene.create_entity("Spinner").add(NativeScript::bind::<Spinner>());
//! ```

use std::fmt;

use bevy_ecs::component::Mutable;
use bevy_ecs::prelude::*;

use crate::components::identity::Identity;
use crate::components::tag::Tag;
use crate::error::SceneError;
use crate::resources::pendingdestroy::PendingDestroy;
use crate::resources::worldtime::WorldTime;
use crate::uuid::Uuid;

/// Per-entity logic compiled into the application.
///
/// All callbacks default to doing nothing.
pub trait Behavior: Send + Sync + 'static {
    /// Called once, right after the instance is created.
    fn on_create(&mut self, _ctx: &mut ScriptContext) {}

    /// Called every runtime frame with the frame delta in seconds.
    fn on_update(&mut self, _ctx: &mut ScriptContext, _dt: f32) {}

    /// Called once before the instance is dropped when the runtime stops.
    fn on_destroy(&mut self, _ctx: &mut ScriptContext) {}
}

/// Function building a fresh boxed behavior.
pub type ScriptConstructor = fn() -> Box<dyn Behavior>;

fn construct<T: Behavior + Default>() -> Box<dyn Behavior> {
    Box::new(T::default())
}

/// Access to the scene world, bound to the entity that owns the script.
pub struct ScriptContext<'w> {
    entity: Entity,
    world: &'w mut World,
}

impl<'w> ScriptContext<'w> {
    pub fn new(entity: Entity, world: &'w mut World) -> Self {
        Self { entity, world }
    }

    /// The entity this script is attached to.
    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn uuid(&self) -> Option<Uuid> {
        self.world.get::<Identity>(self.entity).map(Identity::uuid)
    }

    pub fn name(&self) -> Option<&str> {
        self.world.get::<Tag>(self.entity).map(Tag::as_str)
    }

    pub fn has<T: Component>(&self) -> bool {
        self.world.get::<T>(self.entity).is_some()
    }

    pub fn get<T: Component>(&self) -> Result<&T, SceneError> {
        self.world
            .get::<T>(self.entity)
            .ok_or_else(|| SceneError::missing::<T>(self.entity))
    }

    pub fn get_mut<T: Component<Mutability = Mutable>>(&mut self) -> Result<&mut T, SceneError> {
        let entity = self.entity;
        self.world
            .get_mut::<T>(entity)
            .map(Mut::into_inner)
            .ok_or_else(|| SceneError::missing::<T>(entity))
    }

    /// Current simulation time.
    pub fn time(&self) -> WorldTime {
        self.world
            .get_resource::<WorldTime>()
            .copied()
            .unwrap_or_default()
    }

    /// Read access to the whole world, e.g. to look at other entities.
    pub fn world(&self) -> &World {
        self.world
    }

    /// Mutable access to a component of any entity.
    pub fn get_other_mut<T: Component<Mutability = Mutable>>(
        &mut self,
        entity: Entity,
    ) -> Result<&mut T, SceneError> {
        self.world
            .get_mut::<T>(entity)
            .map(Mut::into_inner)
            .ok_or_else(|| SceneError::missing::<T>(entity))
    }

    /// Ask for `entity` to be destroyed. It stays alive until every script
    /// of the current tick has run, then goes through the scene so its
    /// identity and physics body are released too.
    pub fn destroy_entity(&mut self, entity: Entity) {
        self.world
            .get_resource_or_insert_with(PendingDestroy::default)
            .push(entity);
    }
}

/// Binds a behavior type to an entity.
///
/// The instance is owned exclusively by this component once created.
#[derive(Component)]
pub struct NativeScript {
    pub instance: Option<Box<dyn Behavior>>,
    name: String,
    constructor: ScriptConstructor,
}

impl NativeScript {
    /// Bind the behavior type `T`. The script is registered under
    /// `std::any::type_name::<T>()`.
    pub fn bind<T: Behavior + Default>() -> Self {
        Self::from_constructor(std::any::type_name::<T>(), construct::<T>)
    }

    pub fn from_constructor(name: impl Into<String>, constructor: ScriptConstructor) -> Self {
        Self {
            instance: None,
            name: name.into(),
            constructor,
        }
    }

    /// Name used to carry the binding through snapshots.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn constructor(&self) -> ScriptConstructor {
        self.constructor
    }

    pub fn instantiate(&self) -> Box<dyn Behavior> {
        (self.constructor)()
    }

    pub fn is_instantiated(&self) -> bool {
        self.instance.is_some()
    }
}

impl fmt::Debug for NativeScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeScript")
            .field("name", &self.name)
            .field("instantiated", &self.instance.is_some())
            .finish()
    }
}
