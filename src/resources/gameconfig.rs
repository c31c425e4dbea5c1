//! Game configuration.
//!
//! Settings loaded from an INI configuration file, with defaults for safe
//! startup.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 800
//! height = 600
//! title = Beer
//! target_fps = 60
//!
//! [scene]
//! map = assets/maps/defense.json
//! character = assets/characters/hero.json
//! stride = 16
//! time_scale = 1.0
//! ```

use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_WINDOW_WIDTH: u32 = 800;
const DEFAULT_WINDOW_HEIGHT: u32 = 600;
const DEFAULT_WINDOW_TITLE: &str = "Beer";
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_MAP_PATH: &str = "assets/maps/defense.json";
const DEFAULT_STRIDE: f32 = 16.0;
const DEFAULT_TIME_SCALE: f32 = 1.0;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    pub window_title: String,
    /// Target frames per second.
    pub target_fps: u32,
    /// Tile map descriptor loaded at startup.
    pub map_path: PathBuf,
    /// Optional player character descriptor.
    pub character_path: Option<PathBuf>,
    /// Distance in units the player's destination moves per key press.
    pub stride: f32,
    /// Multiplier applied to every frame delta.
    pub time_scale: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
            target_fps: DEFAULT_TARGET_FPS,
            map_path: PathBuf::from(DEFAULT_MAP_PATH),
            character_path: None,
            stride: DEFAULT_STRIDE,
            time_scale: DEFAULT_TIME_SCALE,
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
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(title) = config.get("window", "title") {
            self.window_title = title;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }

        // [scene] section
        if let Some(map) = config.get("scene", "map") {
            self.map_path = PathBuf::from(map);
        }
        if let Some(character) = config.get("scene", "character") {
            self.character_path = Some(PathBuf::from(character));
        }
        if let Some(stride) = config.getfloat("scene", "stride").ok().flatten() {
            self.stride = stride as f32;
        }
        if let Some(scale) = config.getfloat("scene", "time_scale").ok().flatten() {
            self.time_scale = scale as f32;
        }

        info!(
            "Loaded config: {}x{} window \"{}\", fps={}, map={:?}, character={:?}, stride={}, time_scale={}",
            self.window_width,
            self.window_height,
            self.window_title,
            self.target_fps,
            self.map_path,
            self.character_path,
            self.stride,
            self.time_scale
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [window] section
        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "title", Some(self.window_title.clone()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));

        // [scene] section
        config.set("scene", "map", Some(self.map_path.display().to_string()));
        if let Some(character) = &self.character_path {
            config.set("scene", "character", Some(character.display().to_string()));
        }
        config.set("scene", "stride", Some(self.stride.to_string()));
        config.set("scene", "time_scale", Some(self.time_scale.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Get the window size.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}
