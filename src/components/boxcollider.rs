use bevy_ecs::prelude::Component;
use glam::Vec2;
use rapier2d::prelude::ColliderHandle;

/// Box-shaped collision fixture attached to an entity's [`RigidBody2D`].
///
/// `size` holds half extents in local units; the physics bridge multiplies it
/// by the entity's scale. `offset` is the box center relative to the body and
/// is not scaled. Without a rigid body the collider is ignored.
///
/// [`RigidBody2D`]: super::rigidbody::RigidBody2D
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct BoxCollider2D {
    pub offset: Vec2,
    pub size: Vec2,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Impact speed below which contacts do not bounce.
    pub restitution_threshold: f32,
    /// Fixture owned by the running physics world, if any.
    pub runtime_collider: Option<ColliderHandle>,
}

impl Default for BoxCollider2D {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            size: Vec2::splat(0.5),
            density: 1.0,
            friction: 0.5,
            restitution: 0.0,
            restitution_threshold: 0.5,
            runtime_collider: None,
        }
    }
}

impl BoxCollider2D {
    /// Create a BoxCollider2D with the given half extents.
    pub fn new(half_width: f32, half_height: f32) -> Self {
        Self {
            size: Vec2::new(half_width, half_height),
            ..Self::default()
        }
    }

    /// Modify BoxCollider2D with the given offset.
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Half extents after applying an entity scale.
    pub fn scaled_half_extents(&self, scale: Vec2) -> Vec2 {
        self.size * scale
    }
}
