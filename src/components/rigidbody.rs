//! 2D rigid body component.
//!
//! The [`RigidBody2D`] component describes how an entity takes part in the
//! physics simulation. It carries only authoring data plus an opaque handle
//! to the body owned by the running
//! [`PhysicsWorld2D`](crate::resources::physicsworld::PhysicsWorld2D).
//!
//! The handle is `None` while editing. It is issued by
//! [`start_physics`](crate::systems::physics::start_physics) and cleared again
//! by [`stop_physics`](crate::systems::physics::stop_physics); handles from a
//! previous run must never be reused.

use bevy_ecs::prelude::Component;
use rapier2d::prelude::RigidBodyHandle;
use serde::{Deserialize, Serialize};

/// How the physics engine treats a body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    /// Never moves; infinite mass.
    #[default]
    Static,
    /// Moved by velocity only, unaffected by forces or contacts.
    Kinematic,
    /// Fully simulated.
    Dynamic,
}

#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct RigidBody2D {
    pub body_type: BodyType,
    /// Lock the body's angle; contacts will not spin it.
    pub fixed_rotation: bool,
    /// Body owned by the running physics world, if any.
    pub runtime_body: Option<RigidBodyHandle>,
}

impl RigidBody2D {
    pub fn new(body_type: BodyType) -> Self {
        Self {
            body_type,
            ..Self::default()
        }
    }

    /// Builder: lock rotation.
    pub fn with_fixed_rotation(mut self, fixed_rotation: bool) -> Self {
        self.fixed_rotation = fixed_rotation;
        self
    }

    pub fn is_simulated(&self) -> bool {
        self.runtime_body.is_some()
    }
}
