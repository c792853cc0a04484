//! Aberred Scene headless runner.
//!
//! Loads a scene snapshot (or builds a small demo scene), optionally enters
//! play mode, runs a number of frames against a recording render backend and
//! logs where every entity ended up.
//!
//! # Running
//!
//! ```text
//! aberredscene --play --frames 120
//! aberredscene --scene level.json --config config.ini --play
//! aberredscene --save demo.json
//! ```

use std::path::PathBuf;

use aberredscene::components::boxcollider::BoxCollider2D;
use aberredscene::components::camera::Camera;
use aberredscene::components::nativescript::{Behavior, NativeScript, ScriptContext};
use aberredscene::components::rigidbody::{BodyType, RigidBody2D};
use aberredscene::components::spriterenderer::SpriteRenderer;
use aberredscene::components::tag::Tag;
use aberredscene::components::transform::Transform;
use aberredscene::render::backend::RecordingBackend;
use aberredscene::resources::engineconfig::EngineConfig;
use aberredscene::scene::Scene;
use aberredscene::scene::serializer::SceneSerializer;
use aberredscene::scene::session::{SceneSession, SceneState};
use clap::Parser;
use glam::{Vec3, Vec4};
use log::{debug, error, info, warn};

#[derive(Parser)]
#[command(version, about = "Headless runner for Aberred scenes")]
struct Cli {
    /// Scene snapshot to load. A demo scene is built when omitted.
    #[arg(long, value_name = "PATH")]
    scene: Option<PathBuf>,

    /// INI configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of frames to run.
    #[arg(long, default_value_t = 60)]
    frames: u32,

    /// Seconds per frame.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Enter play mode before running the frames.
    #[arg(long)]
    play: bool,

    /// Write the authored scene to this path before running.
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,
}

/// Logs the height of its entity once per second of simulation.
#[derive(Default)]
struct Altimeter {
    since_report: f32,
}

impl Behavior for Altimeter {
    fn on_create(&mut self, ctx: &mut ScriptContext) {
        debug!("Altimeter attached to {:?}", ctx.name());
    }

    fn on_update(&mut self, ctx: &mut ScriptContext, dt: f32) {
        self.since_report += dt;
        if self.since_report < 1.0 {
            return;
        }
        self.since_report = 0.0;
        if let Ok(transform) = ctx.get::<Transform>() {
            info!("{:?} at height {:.3}", ctx.name(), transform.translation.y);
        }
    }
}

fn demo_scene() -> Scene {
    let mut scene = Scene::new("Demo");

    scene.create_entity("Camera").with(Camera::default());

    let mut ground = scene
        .create_entity("Ground")
        .with(SpriteRenderer::from_color(Vec4::new(0.2, 0.8, 0.3, 1.0)))
        .with(RigidBody2D::new(BodyType::Static))
        .with(BoxCollider2D::default());
    if let Ok(transform) = ground.get_mut::<Transform>() {
        *transform = Transform::from_translation(Vec3::new(0.0, -3.0, 0.0))
            .with_scale(Vec3::new(3.0, 1.0, 1.0));
    }

    let mut crate_box = scene
        .create_entity("Box")
        .with(SpriteRenderer::from_color(Vec4::new(0.8, 0.2, 0.3, 1.0)))
        .with(RigidBody2D::new(BodyType::Dynamic))
        .with(BoxCollider2D::default())
        .with(NativeScript::bind::<Altimeter>());
    if let Ok(transform) = crate_box.get_mut::<Transform>() {
        *transform = Transform::from_translation(Vec3::new(0.0, 3.0, 0.0))
            .with_rotation(Vec3::new(0.0, 0.0, 10f32.to_radians()));
    }

    scene
}

fn load_config(path: Option<PathBuf>) -> EngineConfig {
    let mut config = match path {
        Some(path) => EngineConfig::with_path(path),
        None => EngineConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        warn!("{}, using defaults", e);
    }
    config
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config);

    let scene = match &cli.scene {
        Some(path) => {
            let mut scene = Scene::default();
            scene.scripts_mut().register::<Altimeter>();
            if let Err(e) = SceneSerializer::new(&mut scene).deserialize(path) {
                error!("Failed to load scene {:?}: {}", path, e);
                std::process::exit(1);
            }
            scene
        }
        None => demo_scene(),
    };

    let mut session = SceneSession::from_config(scene, &config);

    if let Some(path) = &cli.save {
        match SceneSerializer::new(session.editor_scene_mut()).serialize(path) {
            Ok(()) => info!("Saved scene to {:?}", path),
            Err(e) => error!("Failed to save scene to {:?}: {}", path, e),
        }
    }

    if cli.play && session.on_scene_play().is_err() {
        std::process::exit(1);
    }

    let mut backend = RecordingBackend::new();
    for _ in 0..cli.frames {
        session.on_update(cli.dt, &mut backend);
    }
    info!(
        "Ran {} frames in {:?} mode: {} scenes, {} quads submitted",
        cli.frames,
        session.state(),
        backend.scene_count(),
        backend.quad_count()
    );

    let scene = session.active_scene_mut();
    for entity in scene.entities() {
        let world = scene.world();
        if let (Some(tag), Some(transform)) =
            (world.get::<Tag>(entity), world.get::<Transform>(entity))
        {
            info!(
                "{}: translation=({:.3}, {:.3}, {:.3}) rotation.z={:.3}",
                tag.as_str(),
                transform.translation.x,
                transform.translation.y,
                transform.translation.z,
                transform.rotation.z
            );
        }
    }

    if session.state() == SceneState::Play {
        session.on_scene_stop();
    }
}
