//! Edit/play session integration tests: the authored scene survives play
//! mode untouched, failed transitions roll back, and each mode renders and
//! simulates what it should.

use std::sync::atomic::{AtomicUsize, Ordering};

use aberredscene::components::boxcollider::BoxCollider2D;
use aberredscene::components::camera::Camera;
use aberredscene::components::nativescript::{Behavior, NativeScript, ScriptContext};
use aberredscene::components::rigidbody::{BodyType, RigidBody2D};
use aberredscene::components::spriterenderer::SpriteRenderer;
use aberredscene::components::tag::Tag;
use aberredscene::components::transform::Transform;
use aberredscene::error::SceneError;
use aberredscene::render::backend::RecordingBackend;
use aberredscene::scene::Scene;
use aberredscene::scene::session::{SceneSession, SceneState};
use aberredscene::uuid::Uuid;
use glam::{Vec3, Vec4};

const DT: f32 = 1.0 / 60.0;

/// Identity, name and transform of every entity, sorted by identity.
fn contents(scene: &mut Scene) -> Vec<(Uuid, String, Transform)> {
    let mut rows: Vec<_> = scene
        .entities()
        .into_iter()
        .map(|e| {
            let entity = scene.entity(e).unwrap();
            (
                entity.uuid().unwrap(),
                entity.name().unwrap().to_string(),
                *entity.get::<Transform>().unwrap(),
            )
        })
        .collect();
    rows.sort_by_key(|(uuid, _, _)| *uuid);
    rows
}

fn physics_scene() -> Scene {
    let mut scene = Scene::new("Playground");
    scene.create_entity("Camera").with(Camera::default());

    let mut ground = scene
        .create_entity("Ground")
        .with(SpriteRenderer::from_color(Vec4::new(0.0, 1.0, 0.0, 1.0)))
        .with(RigidBody2D::new(BodyType::Static))
        .with(BoxCollider2D::default());
    *ground.get_mut::<Transform>().unwrap() =
        Transform::from_translation(Vec3::new(0.0, -3.0, 0.0)).with_scale(Vec3::new(3.0, 1.0, 1.0));

    let mut falling = scene
        .create_entity("Box")
        .with(SpriteRenderer::from_color(Vec4::new(1.0, 0.0, 0.0, 1.0)))
        .with(RigidBody2D::new(BodyType::Dynamic))
        .with(BoxCollider2D::default());
    *falling.get_mut::<Transform>().unwrap() = Transform::from_translation(Vec3::new(0.0, 3.0, 0.0))
        .with_rotation(Vec3::new(0.0, 0.0, 10f32.to_radians()));

    scene
}

fn height_of(scene: &mut Scene, name: &str) -> f32 {
    let entity = scene.find_entity_by_name(name).unwrap();
    scene.world().get::<Transform>(entity).unwrap().translation.y
}

#[test]
fn play_then_stop_restores_authored_scene() {
    let mut session = SceneSession::new(physics_scene());
    let before = contents(session.editor_scene_mut());

    session.on_scene_play().unwrap();
    assert_eq!(session.state(), SceneState::Play);

    let mut backend = RecordingBackend::new();
    for _ in 0..60 {
        session.on_update(DT, &mut backend);
    }
    assert!(height_of(session.active_scene_mut(), "Box") < 3.0);

    session.on_scene_stop();
    assert_eq!(session.state(), SceneState::Edit);
    assert!(session.runtime_scene().is_none());
    assert_eq!(contents(session.active_scene_mut()), before);
}

#[test]
fn runtime_copy_matches_authored_scene() {
    let mut session = SceneSession::new(physics_scene());
    let authored = contents(session.editor_scene_mut());
    let authored_ids: Vec<_> = session.editor_scene_mut().entities();

    session.on_scene_play().unwrap();
    assert_eq!(contents(session.active_scene_mut()), authored);
    assert_eq!(session.active_scene().name(), "Playground");

    let runtime = session.active_scene();
    assert!(runtime.is_running());
    assert!(!session.editor_scene().is_running());
    for entity in authored_ids {
        assert!(session.editor_scene().world().get::<Tag>(entity).is_some());
    }
}

#[test]
fn failed_snapshot_aborts_play() {
    let mut session =
        SceneSession::new(physics_scene()).with_snapshot_dir("/definitely/not/a/real/dir");
    let before = contents(session.editor_scene_mut());

    let result = session.on_scene_play();
    assert!(matches!(result, Err(SceneError::Io(_))));
    assert_eq!(session.state(), SceneState::Edit);
    assert!(session.runtime_scene().is_none());
    assert!(!session.active_scene().is_running());
    assert_eq!(contents(session.active_scene_mut()), before);

    let mut backend = RecordingBackend::new();
    session.on_update(DT, &mut backend);
    assert!((height_of(session.active_scene_mut(), "Box") - 3.0).abs() < 1e-6);
}

#[test]
fn snapshot_dir_is_used_and_cleaned_up() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = SceneSession::new(physics_scene()).with_snapshot_dir(dir.path());
    session.on_scene_play().unwrap();
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn edit_mode_does_not_simulate() {
    let mut session = SceneSession::new(physics_scene());
    let mut backend = RecordingBackend::new();
    for _ in 0..30 {
        session.on_update(DT, &mut backend);
    }
    assert!((height_of(session.active_scene_mut(), "Box") - 3.0).abs() < 1e-6);
    assert_eq!(backend.scene_count(), 30);
}

#[test]
fn each_mode_renders_through_its_camera() {
    let mut session = SceneSession::new(physics_scene());
    session.on_viewport_resize(1280, 720);
    session.editor_camera_mut().set_position(Vec3::new(0.0, 0.0, 0.0));

    let mut backend = RecordingBackend::new();
    session.on_update(DT, &mut backend);
    assert_eq!(
        backend.last_view_projection(),
        Some(*session.editor_camera().view_projection_matrix())
    );
    assert_eq!(backend.quad_count(), 2);

    session.on_scene_play().unwrap();
    backend.clear();
    session.on_update(DT, &mut backend);

    let runtime = session.active_scene_mut();
    let camera = runtime.get_primary_camera_entity().unwrap();
    let expected = *runtime
        .world()
        .get::<Camera>(camera)
        .unwrap()
        .camera
        .view_projection_matrix();
    assert_eq!(backend.last_view_projection(), Some(expected));
    assert_eq!(backend.quad_count(), 2);
}

#[test]
fn viewport_resize_reaches_runtime_cameras() {
    let mut session = SceneSession::new(physics_scene());
    session.on_scene_play().unwrap();
    session.on_viewport_resize(1920, 1080);

    let runtime = session.active_scene_mut();
    let camera = runtime.get_primary_camera_entity().unwrap();
    let (l, r, b, t) = runtime.world().get::<Camera>(camera).unwrap().camera.bounds();
    assert!(((r - l) / (t - b) - 1920.0 / 1080.0).abs() < 1e-5);

    let (w, h) = session.editor_camera().viewport_size();
    assert_eq!((w, h), (1920.0, 1080.0));
    assert_eq!(session.editor_scene().viewport().width, 1920);
}

#[test]
fn runtime_copy_is_sized_for_current_viewport() {
    let mut session = SceneSession::new(physics_scene());
    session.on_viewport_resize(1000, 500);
    session.on_scene_play().unwrap();

    let runtime = session.active_scene_mut();
    let camera = runtime.get_primary_camera_entity().unwrap();
    let (l, r, b, t) = runtime.world().get::<Camera>(camera).unwrap().camera.bounds();
    assert!(((r - l) / (t - b) - 2.0).abs() < 1e-5);
}

static CREATED: AtomicUsize = AtomicUsize::new(0);
static DESTROYED: AtomicUsize = AtomicUsize::new(0);

/// Slides its entity right by one unit per update.
#[derive(Default)]
struct Slider;

impl Behavior for Slider {
    fn on_create(&mut self, _ctx: &mut ScriptContext) {
        CREATED.fetch_add(1, Ordering::SeqCst);
    }

    fn on_update(&mut self, ctx: &mut ScriptContext, _dt: f32) {
        if let Ok(transform) = ctx.get_mut::<Transform>() {
            transform.translation.x += 1.0;
        }
    }

    fn on_destroy(&mut self, _ctx: &mut ScriptContext) {
        DESTROYED.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn scripts_run_only_in_play_mode() {
    let mut scene = Scene::new("Scripted");
    let slider = scene
        .create_entity("Slider")
        .with(NativeScript::bind::<Slider>())
        .id();
    let mut session = SceneSession::new(scene);
    let mut backend = RecordingBackend::new();

    session.on_update(DT, &mut backend);
    let x = |session: &SceneSession, entity| {
        session
            .editor_scene()
            .world()
            .get::<Transform>(entity)
            .unwrap()
            .translation
            .x
    };
    assert_eq!(x(&session, slider), 0.0);

    let created_before = CREATED.load(Ordering::SeqCst);
    let destroyed_before = DESTROYED.load(Ordering::SeqCst);

    session.on_scene_play().unwrap();
    for _ in 0..3 {
        session.on_update(DT, &mut backend);
    }
    let runtime_slider = session.active_scene_mut().find_entity_by_name("Slider").unwrap();
    let runtime_x = session
        .active_scene()
        .world()
        .get::<Transform>(runtime_slider)
        .unwrap()
        .translation
        .x;
    assert_eq!(runtime_x, 3.0);
    assert_eq!(CREATED.load(Ordering::SeqCst), created_before + 1);

    session.on_scene_stop();
    assert_eq!(DESTROYED.load(Ordering::SeqCst), destroyed_before + 1);
    assert_eq!(x(&session, slider), 0.0);
    assert!(
        !session
            .editor_scene()
            .world()
            .get::<NativeScript>(slider)
            .unwrap()
            .is_instantiated()
    );
}

#[test]
fn repeated_play_sessions_start_fresh() {
    let mut session = SceneSession::new(physics_scene());
    let mut backend = RecordingBackend::new();

    let mut heights = Vec::new();
    for _ in 0..2 {
        session.on_scene_play().unwrap();
        for _ in 0..30 {
            session.on_update(DT, &mut backend);
        }
        heights.push(height_of(session.active_scene_mut(), "Box"));
        session.on_scene_stop();
    }
    assert!((heights[0] - heights[1]).abs() < 1e-4);
}
