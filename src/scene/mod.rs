//! Scenes: an ECS world plus the per-frame pipeline that drives it.
//!
//! A [`Scene`] owns a `bevy_ecs` [`World`] in which every entity carries
//! [`Transform`], [`Tag`] and [`Identity`]. The runtime tick runs, in order:
//!
//! 1. [`update_world_time`]
//! 2. [`physics_step_system`] (no-op unless the runtime was started)
//! 3. [`run_native_scripts`]
//! 4. entities scripts asked to destroy are destroyed
//! 5. [`render_runtime`] through the primary camera
//!
//! The editor tick only renders, through an external [`EditorCamera`].
//!
//! Submodules:
//! - [`entity`] – [`SceneEntity`], a handle bound to its scene
//! - [`serializer`] – JSON snapshot codec
//! - [`session`] – edit/play state machine

pub mod entity;
pub mod serializer;
pub mod session;

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use log::{debug, info, warn};
use rustc_hash::FxHashMap;

use crate::components::identity::Identity;
use crate::components::tag::Tag;
use crate::components::transform::Transform;
use crate::error::SceneError;
use crate::render::backend::RenderBackend;
use crate::render::editorcamera::EditorCamera;
use crate::resources::pendingdestroy::PendingDestroy;
use crate::resources::physicsworld::{PhysicsSettings, PhysicsWorld2D};
use crate::resources::scriptregistry::ScriptRegistry;
use crate::resources::texturestore::TextureStore;
use crate::resources::viewport::ViewportSize;
use crate::resources::worldtime::WorldTime;
use crate::systems::camera::{primary_camera_entity, resize_cameras};
use crate::systems::physics::{
    physics_step_system, remove_entity_body, start_physics, stop_physics,
};
use crate::systems::render::{render_editor, render_runtime};
use crate::systems::scripts::{destroy_native_scripts, run_native_scripts};
use crate::systems::time::update_world_time;
use crate::uuid::Uuid;

pub use entity::SceneEntity;

const DEFAULT_ENTITY_NAME: &str = "Entity";
const DEFAULT_SCENE_NAME: &str = "Untitled";

fn runtime_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule.add_systems((physics_step_system, run_native_scripts).chain());
    schedule
}

pub struct Scene {
    name: String,
    world: World,
    entity_map: FxHashMap<Uuid, Entity>,
    runtime_schedule: Schedule,
    physics_settings: PhysicsSettings,
    scripts: ScriptRegistry,
    textures: TextureStore,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(DEFAULT_SCENE_NAME)
    }
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(ViewportSize::default());
        world.insert_resource(PendingDestroy::default());

        Self {
            name: name.into(),
            world,
            entity_map: FxHashMap::default(),
            runtime_schedule: runtime_schedule(),
            physics_settings: PhysicsSettings::default(),
            scripts: ScriptRegistry::default(),
            textures: TextureStore::default(),
        }
    }

    /// Builder: use these physics settings when the runtime starts.
    pub fn with_physics_settings(mut self, settings: PhysicsSettings) -> Self {
        self.physics_settings = settings;
        self
    }

    /// An empty scene sharing `other`'s name, physics settings, script
    /// registry, texture references and viewport.
    pub fn empty_like(other: &Scene) -> Self {
        let mut scene = Self::new(other.name.clone()).with_physics_settings(other.physics_settings);
        scene.scripts = other.scripts.clone();
        scene.textures = other.textures.clone();
        scene.world.insert_resource(other.viewport());
        scene
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn physics_settings(&self) -> &PhysicsSettings {
        &self.physics_settings
    }

    pub fn set_physics_settings(&mut self, settings: PhysicsSettings) {
        self.physics_settings = settings;
    }

    pub fn scripts(&self) -> &ScriptRegistry {
        &self.scripts
    }

    pub fn scripts_mut(&mut self) -> &mut ScriptRegistry {
        &mut self.scripts
    }

    pub fn textures(&self) -> &TextureStore {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut TextureStore {
        &mut self.textures
    }

    pub fn viewport(&self) -> ViewportSize {
        self.world
            .get_resource::<ViewportSize>()
            .copied()
            .unwrap_or_default()
    }

    pub fn time(&self) -> WorldTime {
        self.world
            .get_resource::<WorldTime>()
            .copied()
            .unwrap_or_default()
    }

    /// Whether the physics runtime is active.
    pub fn is_running(&self) -> bool {
        self.world.contains_resource::<PhysicsWorld2D>()
    }

    /// Create an entity with a fresh identity.
    ///
    /// An empty `name` becomes `"Entity"`.
    pub fn create_entity(&mut self, name: &str) -> SceneEntity<'_> {
        self.create_entity_with_uuid(name, Uuid::new())
    }

    /// Create an entity with a known identity, e.g. when loading a snapshot.
    pub fn create_entity_with_uuid(&mut self, name: &str, uuid: Uuid) -> SceneEntity<'_> {
        let name = if name.is_empty() {
            DEFAULT_ENTITY_NAME
        } else {
            name
        };
        let entity = self
            .world
            .spawn((Transform::default(), Tag::new(name), Identity::new(uuid)))
            .id();

        if let Some(previous) = self.entity_map.insert(uuid, entity) {
            warn!(
                "Identity {} was already used by entity {}, now mapped to {}",
                uuid, previous, entity
            );
        }
        debug!("Created entity {} '{}' ({})", entity, name, uuid);

        SceneEntity::new(entity, self)
    }

    /// Destroy an entity and all its components. Returns `false` when the
    /// entity does not exist.
    ///
    /// While the runtime is active the entity's physics body goes with it.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        let Some(uuid) = self.world.get::<Identity>(entity).map(Identity::uuid) else {
            debug!("Entity {} already destroyed", entity);
            return false;
        };

        remove_entity_body(&mut self.world, entity);
        if self.entity_map.get(&uuid) == Some(&entity) {
            self.entity_map.remove(&uuid);
        }
        self.world.despawn(entity)
    }

    /// Re-bind an existing entity handle.
    pub fn entity(&mut self, entity: Entity) -> Result<SceneEntity<'_>, SceneError> {
        if self.world.get::<Identity>(entity).is_none() {
            return Err(SceneError::NoSuchEntity(entity));
        }
        Ok(SceneEntity::new(entity, self))
    }

    pub fn find_entity_by_uuid(&self, uuid: Uuid) -> Option<Entity> {
        self.entity_map.get(&uuid).copied()
    }

    /// First entity (storage order) whose tag equals `name`.
    pub fn find_entity_by_name(&mut self, name: &str) -> Option<Entity> {
        let mut query = self.world.query::<(Entity, &Tag)>();
        query
            .iter(&self.world)
            .find(|(_, tag)| tag.as_str() == name)
            .map(|(entity, _)| entity)
    }

    pub fn entity_count(&self) -> usize {
        self.entity_map.len()
    }

    /// All entities in storage order.
    pub fn entities(&mut self) -> Vec<Entity> {
        let mut query = self.world.query_filtered::<Entity, With<Identity>>();
        query.iter(&self.world).collect()
    }

    pub fn get_primary_camera_entity(&mut self) -> Option<Entity> {
        primary_camera_entity(&mut self.world)
    }

    /// Start the physics runtime.
    pub fn on_runtime_start(&mut self) {
        info!("Scene '{}' runtime started", self.name);
        start_physics(&mut self.world, &self.physics_settings);
    }

    /// Destroy every entity a script queued through
    /// [`ScriptContext::destroy_entity`](crate::components::nativescript::ScriptContext::destroy_entity).
    fn flush_pending_destroys(&mut self) {
        let pending = self
            .world
            .get_resource_mut::<PendingDestroy>()
            .map(|mut pending| pending.take())
            .unwrap_or_default();
        for entity in pending {
            self.destroy_entity(entity);
        }
    }

    /// Tear down script instances and the physics runtime.
    pub fn on_runtime_stop(&mut self) {
        destroy_native_scripts(&mut self.world);
        self.flush_pending_destroys();
        stop_physics(&mut self.world);
        info!("Scene '{}' runtime stopped", self.name);
    }

    /// Full runtime tick: time, physics, scripts, queued destroys, then
    /// render through the primary camera.
    pub fn on_update(&mut self, dt: f32, backend: &mut dyn RenderBackend) {
        update_world_time(&mut self.world, dt);
        self.runtime_schedule.run(&mut self.world);
        self.flush_pending_destroys();
        render_runtime(&mut self.world, backend);
        self.world.clear_trackers();
    }

    /// Render-only runtime tick. Nothing is simulated.
    pub fn on_render_runtime(&mut self, _dt: f32, backend: &mut dyn RenderBackend) {
        render_runtime(&mut self.world, backend);
    }

    /// Editor tick: render through `camera`. Nothing is simulated.
    pub fn on_update_editor(
        &mut self,
        _dt: f32,
        camera: &EditorCamera,
        backend: &mut dyn RenderBackend,
    ) {
        render_editor(&mut self.world, camera, backend);
    }

    /// Remember the viewport size and resize every camera without a fixed
    /// aspect ratio. Zero-area sizes are stored but resize nothing.
    pub fn on_viewport_resize(&mut self, width: u32, height: u32) {
        self.world.insert_resource(ViewportSize::new(width, height));
        resize_cameras(&mut self.world, width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::camera::Camera;
    use crate::render::backend::RecordingBackend;

    #[test]
    fn test_create_entity_has_mandatory_components() {
        let mut scene = Scene::new("test");
        let entity = scene.create_entity("Player");
        assert!(entity.has::<Transform>());
        assert!(entity.has::<Tag>());
        assert!(entity.has::<Identity>());
        assert_eq!(entity.name().unwrap(), "Player");
    }

    #[test]
    fn test_empty_name_defaults() {
        let mut scene = Scene::new("test");
        let entity = scene.create_entity("");
        assert_eq!(entity.name().unwrap(), "Entity");
    }

    #[test]
    fn test_create_with_uuid_is_findable() {
        let mut scene = Scene::new("test");
        let uuid = Uuid::from_u64(42);
        let entity = scene.create_entity_with_uuid("Known", uuid).id();
        assert_eq!(scene.find_entity_by_uuid(uuid), Some(entity));
        assert_eq!(scene.find_entity_by_name("Known"), Some(entity));
        assert_eq!(scene.entity_count(), 1);
    }

    #[test]
    fn test_identity_matches_uuid_lookup() {
        let mut scene = Scene::new("test");
        let ids: Vec<Entity> = (0..8).map(|_| scene.create_entity("E").id()).collect();
        for id in ids {
            let uuid = scene.world().get::<Identity>(id).unwrap().uuid();
            assert_eq!(scene.find_entity_by_uuid(uuid), Some(id));
            assert_eq!(scene.entity(id).unwrap().uuid().unwrap(), uuid);
        }
    }

    #[test]
    fn test_destroy_entity_twice() {
        let mut scene = Scene::new("test");
        let entity = scene.create_entity("Temp");
        let uuid = entity.uuid().unwrap();
        let entity = entity.id();

        assert!(scene.destroy_entity(entity));
        assert!(!scene.destroy_entity(entity));
        assert!(scene.find_entity_by_uuid(uuid).is_none());
        assert!(matches!(
            scene.entity(entity),
            Err(SceneError::NoSuchEntity(_))
        ));
    }

    #[test]
    fn test_entities_in_creation_order() {
        let mut scene = Scene::new("test");
        let a = scene.create_entity("A").id();
        let b = scene.create_entity("B").id();
        let c = scene.create_entity("C").id();
        assert_eq!(scene.entities(), vec![a, b, c]);
    }

    #[test]
    fn test_editor_tick_does_not_advance_time() {
        let mut scene = Scene::new("test");
        let mut backend = RecordingBackend::new();
        scene.on_update_editor(0.5, &EditorCamera::default(), &mut backend);
        assert_eq!(scene.time().frame_count, 0);
        assert_eq!(backend.scene_count(), 1);
    }

    #[test]
    fn test_runtime_tick_without_camera_skips_render() {
        let mut scene = Scene::new("test");
        let mut backend = RecordingBackend::new();
        scene.on_update(0.5, &mut backend);
        assert_eq!(scene.time().frame_count, 1);
        assert!(backend.commands().is_empty());
    }

    #[test]
    fn test_empty_like_copies_settings() {
        let mut scene = Scene::new("Level").with_physics_settings(PhysicsSettings {
            velocity_iterations: 10,
            ..PhysicsSettings::default()
        });
        scene.on_viewport_resize(800, 600);
        scene.textures_mut().load("wall.png");
        scene.create_entity("Wall").with(Camera::default());

        let copy = Scene::empty_like(&scene);
        assert_eq!(copy.name(), "Level");
        assert_eq!(copy.physics_settings().velocity_iterations, 10);
        assert_eq!(copy.viewport(), ViewportSize::new(800, 600));
        assert_eq!(copy.textures().len(), 1);
        assert_eq!(copy.entity_count(), 0);
    }
}
