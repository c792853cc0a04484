//! Aberred Scene library.
//!
//! Simulation core of a 2D scene editor/runtime built on `bevy_ecs`:
//! component storage with durable identities, a rapier2d physics bridge,
//! native behavior scripts, camera-driven sprite submission and an edit/play
//! session that isolates the authored scene through JSON snapshots.

pub mod components;
pub mod error;
pub mod render;
pub mod resources;
pub mod scene;
pub mod systems;
pub mod uuid;
