//! ECS components for scene entities.
//!
//! Every entity carries [`identity`], [`tag`] and [`transform`] from the
//! moment it is created. The rest are optional.
//!
//! Submodules overview:
//! - [`boxcollider`] – box fixture attached to the entity's rigid body
//! - [`camera`] – orthographic scene camera and its primary flag
//! - [`identity`] – durable identifier that survives snapshots
//! - [`nativescript`] – compiled behavior bound to an entity
//! - [`rigidbody`] – physics body description and runtime handle
//! - [`spriterenderer`] – tinted or textured quad
//! - [`tag`] – display name
//! - [`transform`] – translation, rotation and scale

pub mod boxcollider;
pub mod camera;
pub mod identity;
pub mod nativescript;
pub mod rigidbody;
pub mod spriterenderer;
pub mod tag;
pub mod transform;
