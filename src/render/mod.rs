//! Rendering contracts used by the scene.
//!
//! - [`backend`] – the [`RenderBackend`](backend::RenderBackend) trait and an in-memory recorder
//! - [`camera`] – orthographic projection/view math
//! - [`editorcamera`] – the free-fly camera used while editing
//! - [`texture`] – shared, path-addressed texture references

pub mod backend;
pub mod camera;
pub mod editorcamera;
pub mod texture;
