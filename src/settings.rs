//! # Settings
//!
//! Client configuration loaded once at startup from a JSON file.
//!
//! Every field has a default, so a partial file only overrides what it names and a missing
//! file simply yields [`Settings::default`].
//!
//! ```json
//! { "render_distance": 8, "show_fps": false }
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable that overrides the settings file location.
pub const SETTINGS_PATH_ENV: &str = "COSMICLAND_SETTINGS";
/// Settings file looked up in the working directory when the variable is unset.
pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";

/// Default capacity of the screen registry.
pub const MAX_SCREENS: usize = 8;

/// Errors raised while reading a settings file.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The file exists but could not be read.
    #[error("could not read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid settings JSON.
    #[error("could not parse settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Capacity of the screen registry
    pub max_screens: usize,
    /// Initial window width in pixels
    pub window_width: u32,
    /// Initial window height in pixels
    pub window_height: u32,
    /// Render distance of the visibility walk, in sub-chunks
    pub render_distance: u32,
    /// Minimum time between two FPS label refreshes
    pub fps_refresh_interval_ms: u64,
    /// Whether the in-world HUD is displayed
    pub show_fps: bool,
    /// Whether the visibility walk rejects sub-chunks outside the view cone
    pub frustum_culling: bool,
    /// Full opening angle of the view cone, in degrees
    pub view_cone_degrees: f64,
    /// Terrain generation seed
    pub world_seed: u32,
    /// Radius, in chunks, of the area generated around spawn
    pub world_radius: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_screens: MAX_SCREENS,
            window_width: 854,
            window_height: 480,
            render_distance: 6,
            fps_refresh_interval_ms: 1000,
            show_fps: true,
            frustum_culling: true,
            view_cone_degrees: 110.0,
            world_seed: 0,
            world_radius: 6,
        }
    }
}

impl Settings {
    /// Reads settings from a JSON file.
    ///
    /// # Arguments
    /// * `path` - Location of the settings file
    ///
    /// # Returns
    /// The parsed settings, with defaults for every field the file leaves out
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Reads settings from `$COSMICLAND_SETTINGS` or `settings.json`, falling back to the
    /// defaults when the file is missing or invalid.
    pub fn load_or_default() -> Self {
        let path = std::env::var(SETTINGS_PATH_ENV)
            .unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string());
        Self::load_from_or_default(path)
    }

    /// Reads settings from `path`, falling back to the defaults when the file is missing
    /// or invalid.
    pub fn load_from_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No settings file at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("{} ({}), using defaults", err, path.display());
                Self::default()
            }
        }
    }

    /// The FPS label refresh interval as a `Duration`.
    pub fn fps_refresh_interval(&self) -> web_time::Duration {
        web_time::Duration::from_millis(self.fps_refresh_interval_ms)
    }
}
