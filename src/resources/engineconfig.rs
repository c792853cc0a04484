//! Engine configuration.
//!
//! Settings loaded from an INI file. Defaults are safe for startup; any key
//! missing from the file keeps its current value.
//!
//! # Configuration File Format
//!
//! ```ini
//! [physics]
//! gravity_x = 0.0
//! gravity_y = -9.8
//! velocity_iterations = 6
//! position_iterations = 2
//!
//! [viewport]
//! width = 1280
//! height = 720
//!
//! [snapshot]
//! dir = /tmp
//! ```

use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::resources::physicsworld::PhysicsSettings;
use crate::resources::viewport::ViewportSize;

const DEFAULT_VIEWPORT_WIDTH: u32 = 1280;
const DEFAULT_VIEWPORT_HEIGHT: u32 = 720;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub physics: PhysicsSettings,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Directory for the transient play-mode snapshot. `None` uses the
    /// system temporary directory.
    pub snapshot_dir: Option<PathBuf>,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            physics: PhysicsSettings::default(),
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            snapshot_dir: None,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    pub fn viewport(&self) -> ViewportSize {
        ViewportSize::new(self.viewport_width, self.viewport_height)
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config)
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config)
    }

    fn apply(&mut self, config: &Ini) -> Result<(), String> {
        // [physics] section
        if let Some(x) = config
            .getfloat("physics", "gravity_x")
            .map_err(|e| format!("physics.gravity_x: {}", e))?
        {
            self.physics.gravity.x = x as f32;
        }
        if let Some(y) = config
            .getfloat("physics", "gravity_y")
            .map_err(|e| format!("physics.gravity_y: {}", e))?
        {
            self.physics.gravity.y = y as f32;
        }
        if let Some(iterations) = config
            .getuint("physics", "velocity_iterations")
            .map_err(|e| format!("physics.velocity_iterations: {}", e))?
        {
            self.physics.velocity_iterations = iterations as usize;
        }
        if let Some(iterations) = config
            .getuint("physics", "position_iterations")
            .map_err(|e| format!("physics.position_iterations: {}", e))?
        {
            self.physics.position_iterations = iterations as usize;
        }

        // [viewport] section
        if let Some(width) = config
            .getuint("viewport", "width")
            .map_err(|e| format!("viewport.width: {}", e))?
        {
            self.viewport_width = width as u32;
        }
        if let Some(height) = config
            .getuint("viewport", "height")
            .map_err(|e| format!("viewport.height: {}", e))?
        {
            self.viewport_height = height as u32;
        }

        // [snapshot] section
        if let Some(dir) = config.get("snapshot", "dir") {
            self.snapshot_dir = if dir.is_empty() {
                None
            } else {
                Some(PathBuf::from(dir))
            };
        }

        info!(
            "Loaded config: gravity=({}, {}), iterations={}/{}, viewport={}x{}, snapshot_dir={:?}",
            self.physics.gravity.x,
            self.physics.gravity.y,
            self.physics.velocity_iterations,
            self.physics.position_iterations,
            self.viewport_width,
            self.viewport_height,
            self.snapshot_dir
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [physics] section
        config.set(
            "physics",
            "gravity_x",
            Some(self.physics.gravity.x.to_string()),
        );
        config.set(
            "physics",
            "gravity_y",
            Some(self.physics.gravity.y.to_string()),
        );
        config.set(
            "physics",
            "velocity_iterations",
            Some(self.physics.velocity_iterations.to_string()),
        );
        config.set(
            "physics",
            "position_iterations",
            Some(self.physics.position_iterations.to_string()),
        );

        // [viewport] section
        config.set("viewport", "width", Some(self.viewport_width.to_string()));
        config.set("viewport", "height", Some(self.viewport_height.to_string()));

        // [snapshot] section
        if let Some(dir) = &self.snapshot_dir {
            config.set("snapshot", "dir", Some(dir.to_string_lossy().into_owned()));
        }

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
