//! ECS resources made available to systems.
//!
//! Long-lived data inserted into a scene's world and read by the systems of
//! the per-frame pipeline.
//!
//! Overview
//! - `engineconfig` – INI-backed engine settings
//! - `pendingdestroy` – entities scripts asked to destroy this tick
//! - `physicsworld` – rapier2d world, present only while the simulation runs
//! - `scriptregistry` – behavior constructors by name, used by snapshots
//! - `texturestore` – shared texture references keyed by path
//! - `viewport` – current viewport dimensions in pixels
//! - `worldtime` – simulation time and delta
pub mod engineconfig;
pub mod pendingdestroy;
pub mod physicsworld;
pub mod scriptregistry;
pub mod texturestore;
pub mod viewport;
pub mod worldtime;
