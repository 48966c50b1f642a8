//! Stage configuration resource.
//!
//! Stage size, viewport size and demo-driver settings loaded from an INI
//! file. Defaults are safe to run with when no file is present.
//!
//! # Configuration File Format
//!
//! ```ini
//! [stage]
//! width = 800
//! height = 600
//!
//! [viewport]
//! width = 1600
//! height = 900
//!
//! [demo]
//! ticks = 120
//! clips = 3
//! speed = 4.0
//! ```

use bevy_ecs::prelude::Resource;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::error::ConfigError;

const DEFAULT_STAGE_WIDTH: u32 = 800;
const DEFAULT_STAGE_HEIGHT: u32 = 600;
const DEFAULT_VIEWPORT_WIDTH: u32 = 1600;
const DEFAULT_VIEWPORT_HEIGHT: u32 = 900;
const DEFAULT_TICKS: u32 = 120;
const DEFAULT_CLIPS: u32 = 3;
const DEFAULT_SPEED: f32 = 4.0;
const DEFAULT_CONFIG_PATH: &str = "./stage.ini";

/// Logical stage dimensions, fixed when the stage is built.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct StageSize {
    pub width: f32,
    pub height: f32,
}

/// Stage and demo configuration.
#[derive(Resource, Debug, Clone)]
pub struct StageConfig {
    /// Logical stage width.
    pub stage_width: u32,
    /// Logical stage height.
    pub stage_height: u32,
    /// Drawing surface width in pixels.
    pub viewport_width: u32,
    /// Drawing surface height in pixels.
    pub viewport_height: u32,
    /// Number of ticks the demo driver runs.
    pub ticks: u32,
    /// Number of wandering clips the demo spawns.
    pub clips: u32,
    /// Seek speed of the demo clips, in stage units per tick.
    pub speed: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl StageConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            stage_width: DEFAULT_STAGE_WIDTH,
            stage_height: DEFAULT_STAGE_HEIGHT,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            ticks: DEFAULT_TICKS,
            clips: DEFAULT_CLIPS,
            speed: DEFAULT_SPEED,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        config.load(&self.config_path).map_err(ConfigError::Load)?;

        // [stage] section
        if let Some(width) = config.getuint("stage", "width").ok().flatten() {
            self.stage_width = width as u32;
        }
        if let Some(height) = config.getuint("stage", "height").ok().flatten() {
            self.stage_height = height as u32;
        }

        // [viewport] section
        if let Some(width) = config.getuint("viewport", "width").ok().flatten() {
            self.viewport_width = width as u32;
        }
        if let Some(height) = config.getuint("viewport", "height").ok().flatten() {
            self.viewport_height = height as u32;
        }

        // [demo] section
        if let Some(ticks) = config.getuint("demo", "ticks").ok().flatten() {
            self.ticks = ticks as u32;
        }
        if let Some(clips) = config.getuint("demo", "clips").ok().flatten() {
            self.clips = clips as u32;
        }
        if let Some(speed) = config.getfloat("demo", "speed").ok().flatten() {
            self.speed = speed as f32;
        }

        info!(
            "Loaded config: {}x{} stage, {}x{} viewport, ticks={}, clips={}, speed={}",
            self.stage_width,
            self.stage_height,
            self.viewport_width,
            self.viewport_height,
            self.ticks,
            self.clips,
            self.speed
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        let mut config = Ini::new();

        config.set("stage", "width", Some(self.stage_width.to_string()));
        config.set("stage", "height", Some(self.stage_height.to_string()));

        config.set("viewport", "width", Some(self.viewport_width.to_string()));
        config.set("viewport", "height", Some(self.viewport_height.to_string()));

        config.set("demo", "ticks", Some(self.ticks.to_string()));
        config.set("demo", "clips", Some(self.clips.to_string()));
        config.set("demo", "speed", Some(self.speed.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| ConfigError::Save(e.to_string()))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    pub fn stage_size(&self) -> StageSize {
        StageSize {
            width: self.stage_width as f32,
            height: self.stage_height as f32,
        }
    }

    /// Viewport size as `(width, height)`.
    pub fn viewport_size(&self) -> (f32, f32) {
        (self.viewport_width as f32, self.viewport_height as f32)
    }
}
