//! Edit/play state machine.
//!
//! [`SceneSession`] keeps the authored scene safe while a simulation runs.
//! Entering play mode writes the authored scene to a temporary snapshot file
//! and reads it back into a brand-new scene; that copy is what physics and
//! scripts mutate. Stopping drops the copy and the authored scene becomes
//! active again, exactly as it was.
//!
//! ```ignore
//! let mut session = SceneSession::new(scene);
//! session.on_scene_play()?;
//! session.on_update(1.0 / 60.0, &mut backend);
//! session.on_scene_stop();
//! ```

use std::path::{Path, PathBuf};

use log::{error, info, warn};
use tempfile::NamedTempFile;

use super::Scene;
use super::serializer::SceneSerializer;
use crate::error::SceneError;
use crate::render::backend::RenderBackend;
use crate::render::editorcamera::EditorCamera;
use crate::resources::engineconfig::EngineConfig;

/// Which scene is live.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SceneState {
    /// The authored scene is rendered through the editor camera.
    #[default]
    Edit,
    /// A runtime copy is simulated and rendered through its primary camera.
    Play,
}

pub struct SceneSession {
    state: SceneState,
    editor_scene: Scene,
    runtime_scene: Option<Scene>,
    editor_camera: EditorCamera,
    snapshot_dir: Option<PathBuf>,
}

impl SceneSession {
    pub fn new(scene: Scene) -> Self {
        let viewport = scene.viewport();
        let mut editor_camera = EditorCamera::default();
        editor_camera.set_viewport_size(viewport.width as f32, viewport.height as f32);

        Self {
            state: SceneState::Edit,
            editor_scene: scene,
            runtime_scene: None,
            editor_camera,
            snapshot_dir: None,
        }
    }

    /// Session whose scene uses the configured physics settings, viewport
    /// and snapshot directory.
    pub fn from_config(mut scene: Scene, config: &EngineConfig) -> Self {
        scene.set_physics_settings(config.physics);
        let mut session = Self::new(scene);
        session.snapshot_dir = config.snapshot_dir.clone();
        session.on_viewport_resize(config.viewport_width, config.viewport_height);
        session
    }

    /// Builder: write play-mode snapshots into `dir` instead of the system
    /// temporary directory.
    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = Some(dir.into());
        self
    }

    pub fn snapshot_dir(&self) -> Option<&Path> {
        self.snapshot_dir.as_deref()
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    /// The scene currently being updated: the runtime copy in play mode,
    /// the authored scene otherwise.
    pub fn active_scene(&self) -> &Scene {
        self.runtime_scene.as_ref().unwrap_or(&self.editor_scene)
    }

    pub fn active_scene_mut(&mut self) -> &mut Scene {
        self.runtime_scene.as_mut().unwrap_or(&mut self.editor_scene)
    }

    /// The authored scene, whatever the state.
    pub fn editor_scene(&self) -> &Scene {
        &self.editor_scene
    }

    pub fn editor_scene_mut(&mut self) -> &mut Scene {
        &mut self.editor_scene
    }

    pub fn runtime_scene(&self) -> Option<&Scene> {
        self.runtime_scene.as_ref()
    }

    pub fn editor_camera(&self) -> &EditorCamera {
        &self.editor_camera
    }

    pub fn editor_camera_mut(&mut self) -> &mut EditorCamera {
        &mut self.editor_camera
    }

    /// Round trip the authored scene through a snapshot file into a fresh
    /// scene. Nothing is kept if any step fails.
    fn build_runtime_scene(&mut self) -> Result<Scene, SceneError> {
        let mut snapshot = match &self.snapshot_dir {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new()?,
        };
        SceneSerializer::new(&mut self.editor_scene).serialize_to_writer(&mut snapshot)?;

        let mut runtime = Scene::empty_like(&self.editor_scene);
        SceneSerializer::new(&mut runtime).deserialize(snapshot.path())?;

        let viewport = runtime.viewport();
        runtime.on_viewport_resize(viewport.width, viewport.height);
        Ok(runtime)
    }

    /// Edit → Play.
    ///
    /// On failure the session stays in edit mode with the authored scene
    /// untouched, and the error is returned. Does nothing in play mode.
    pub fn on_scene_play(&mut self) -> Result<(), SceneError> {
        if self.state == SceneState::Play {
            warn!("Already in play mode");
            return Ok(());
        }

        let mut runtime = match self.build_runtime_scene() {
            Ok(scene) => scene,
            Err(e) => {
                error!("Could not enter play mode: {}", e);
                return Err(e);
            }
        };
        runtime.on_runtime_start();

        self.runtime_scene = Some(runtime);
        self.state = SceneState::Play;
        info!("Entered play mode");
        Ok(())
    }

    /// Play → Edit. The runtime copy is discarded. Does nothing in edit mode.
    pub fn on_scene_stop(&mut self) {
        if self.state == SceneState::Edit {
            warn!("Not in play mode");
            return;
        }

        if let Some(mut runtime) = self.runtime_scene.take() {
            runtime.on_runtime_stop();
        }
        self.state = SceneState::Edit;
        info!("Entered edit mode");
    }

    /// Advance the live scene one frame and render it.
    pub fn on_update(&mut self, dt: f32, backend: &mut dyn RenderBackend) {
        match self.state {
            SceneState::Edit => {
                self.editor_scene
                    .on_update_editor(dt, &self.editor_camera, backend);
            }
            SceneState::Play => {
                if let Some(runtime) = self.runtime_scene.as_mut() {
                    runtime.on_update(dt, backend);
                }
            }
        }
    }

    pub fn on_viewport_resize(&mut self, width: u32, height: u32) {
        self.editor_camera
            .set_viewport_size(width as f32, height as f32);
        self.editor_scene.on_viewport_resize(width, height);
        if let Some(runtime) = self.runtime_scene.as_mut() {
            runtime.on_viewport_resize(width, height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_edit() {
        let session = SceneSession::new(Scene::new("test"));
        assert_eq!(session.state(), SceneState::Edit);
        assert!(session.runtime_scene().is_none());
    }

    #[test]
    fn test_stop_in_edit_is_noop() {
        let mut session = SceneSession::new(Scene::new("test"));
        session.on_scene_stop();
        assert_eq!(session.state(), SceneState::Edit);
    }

    #[test]
    fn test_play_twice_keeps_runtime() {
        let mut session = SceneSession::new(Scene::new("test"));
        session.active_scene_mut().create_entity("A");
        session.on_scene_play().unwrap();
        session.on_scene_play().unwrap();
        assert_eq!(session.state(), SceneState::Play);
        assert_eq!(session.active_scene().entity_count(), 1);
    }

    #[test]
    fn test_from_config() {
        let mut config = EngineConfig::new();
        config.physics.velocity_iterations = 9;
        config.viewport_width = 640;
        config.viewport_height = 480;
        config.snapshot_dir = Some(std::env::temp_dir());

        let session = SceneSession::from_config(Scene::new("test"), &config);
        assert_eq!(session.editor_scene().physics_settings().velocity_iterations, 9);
        assert_eq!(session.editor_scene().viewport().width, 640);
        assert_eq!(session.editor_camera().viewport_size(), (640.0, 480.0));
        assert!(session.snapshot_dir().is_some());
    }
}
