//! Entity handle bound to its scene.
//!
//! A [`SceneEntity`] pairs a `bevy_ecs` [`Entity`] with a mutable borrow of
//! the [`Scene`] that owns it, so component access reads like
//! `scene.create_entity("Player").add(SpriteRenderer::default())`.

use std::any::TypeId;

use bevy_ecs::component::Mutable;
use bevy_ecs::prelude::*;
use log::warn;

use super::Scene;
use crate::components::boxcollider::BoxCollider2D;
use crate::components::camera::Camera;
use crate::components::identity::Identity;
use crate::components::nativescript::NativeScript;
use crate::components::rigidbody::RigidBody2D;
use crate::components::tag::Tag;
use crate::components::transform::Transform;
use crate::error::SceneError;
use crate::systems::physics::{remove_entity_body, remove_entity_collider};
use crate::uuid::Uuid;

/// Components every live entity carries. They can not be removed.
fn is_mandatory<T: Component>() -> bool {
    let id = TypeId::of::<T>();
    id == TypeId::of::<Transform>() || id == TypeId::of::<Tag>() || id == TypeId::of::<Identity>()
}

pub struct SceneEntity<'s> {
    entity: Entity,
    scene: &'s mut Scene,
}

impl<'s> SceneEntity<'s> {
    pub(crate) fn new(entity: Entity, scene: &'s mut Scene) -> Self {
        Self { entity, scene }
    }

    pub fn id(&self) -> Entity {
        self.entity
    }

    pub fn uuid(&self) -> Result<Uuid, SceneError> {
        self.get::<Identity>().map(Identity::uuid)
    }

    pub fn name(&self) -> Result<&str, SceneError> {
        self.get::<Tag>().map(Tag::as_str)
    }

    pub fn has<T: Component>(&self) -> bool {
        self.scene.world().get::<T>(self.entity).is_some()
    }

    /// Attach `component` and return it.
    ///
    /// If the entity already has a `T`, the new value is discarded with a
    /// warning and the existing component is returned unchanged.
    pub fn add<T: Component<Mutability = Mutable>>(
        &mut self,
        component: T,
    ) -> Result<&mut T, SceneError> {
        if self.has::<T>() {
            warn!(
                "Entity {} already has component {}, keeping the existing one",
                self.entity,
                std::any::type_name::<T>()
            );
        } else {
            let entity = self.entity;
            self.scene
                .world_mut()
                .get_entity_mut(entity)
                .map_err(|_| SceneError::NoSuchEntity(entity))?
                .insert(component);
            self.on_component_added::<T>();
        }
        self.get_mut::<T>()
    }

    /// Builder form of [`add`](Self::add) that discards the returned reference.
    pub fn with<T: Component<Mutability = Mutable>>(mut self, component: T) -> Self {
        if let Err(e) = self.add(component) {
            warn!("{}", e);
        }
        self
    }

    pub fn get<T: Component>(&self) -> Result<&T, SceneError> {
        self.scene
            .world()
            .get::<T>(self.entity)
            .ok_or_else(|| SceneError::missing::<T>(self.entity))
    }

    pub fn get_mut<T: Component<Mutability = Mutable>>(&mut self) -> Result<&mut T, SceneError> {
        let entity = self.entity;
        self.scene
            .world_mut()
            .get_mut::<T>(entity)
            .map(Mut::into_inner)
            .ok_or_else(|| SceneError::missing::<T>(entity))
    }

    /// Detach and return a component.
    ///
    /// Removing an absent component logs a warning and returns `None`.
    /// [`Transform`], [`Tag`] and [`Identity`] are never removed. While the
    /// runtime is active, removing a [`RigidBody2D`] destroys its body and
    /// removing a [`BoxCollider2D`] destroys its fixture.
    pub fn remove<T: Component>(&mut self) -> Option<T> {
        if is_mandatory::<T>() {
            warn!(
                "Refusing to remove {} from entity {}",
                std::any::type_name::<T>(),
                self.entity
            );
            return None;
        }

        let id = TypeId::of::<T>();
        if id == TypeId::of::<RigidBody2D>() {
            remove_entity_body(self.scene.world_mut(), self.entity);
        } else if id == TypeId::of::<BoxCollider2D>() {
            remove_entity_collider(self.scene.world_mut(), self.entity);
        }

        let removed = self
            .scene
            .world_mut()
            .get_entity_mut(self.entity)
            .ok()
            .and_then(|mut entity| entity.take::<T>());
        if removed.is_none() {
            warn!(
                "Entity {} has no component {} to remove",
                self.entity,
                std::any::type_name::<T>()
            );
        }
        removed
    }

    /// Destroy the entity and all its components.
    pub fn destroy(self) {
        self.scene.destroy_entity(self.entity);
    }

    fn on_component_added<T: Component>(&mut self) {
        let id = TypeId::of::<T>();
        if id == TypeId::of::<Camera>() {
            let viewport = self.scene.viewport();
            if let Some(mut camera) = self.scene.world_mut().get_mut::<Camera>(self.entity) {
                camera.set_viewport_size(viewport.width, viewport.height);
            }
        } else if id == TypeId::of::<NativeScript>() {
            let binding = self
                .scene
                .world()
                .get::<NativeScript>(self.entity)
                .map(|script| (script.name().to_string(), script.constructor()));
            if let Some((name, constructor)) = binding {
                self.scene.scripts_mut().register_named(name, constructor);
            }
        }
    }
}
