//! Scene systems.
//!
//! Functions that advance a scene's world. Most are exclusive (`&mut World`)
//! because they hand the world to behaviors or to a render backend.
//!
//! Submodules overview
//! - [`camera`] – primary camera lookup and viewport resizing
//! - [`physics`] – create, step and tear down the physics world
//! - [`render`] – submit sprites to a [`RenderBackend`](crate::render::backend::RenderBackend)
//! - [`scripts`] – instantiate and run native behaviors
//! - [`time`] – update simulation time and delta

pub mod camera;
pub mod physics;
pub mod render;
pub mod scripts;
pub mod time;
