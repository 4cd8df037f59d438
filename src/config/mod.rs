//! Configuration module for the HMI player
//!
//! This module handles the player configuration file (`hmi.toml`):
//! - Window geometry and background colour
//! - Paths of the scene document and the variable snapshot
//! - Frame-loop timing (see [`timing`])
//! - Font and image candidate paths for asset resolution
//!
//! # Lookup order
//!
//! 1. An explicit `--config <path>` from the command line
//! 2. `hmi.toml` in the working directory
//! 3. The platform config directory under `dev.xsmall.hmi-player`:
//!    - **Linux**: `~/.config/dev.xsmall.hmi-player/hmi.toml`
//!    - **macOS**: `~/Library/Application Support/dev.xsmall.hmi-player/hmi.toml`
//!    - **Windows**: `%APPDATA%\dev.xsmall.hmi-player\hmi.toml`
//!
//! Every field has a default, so a missing file (or a missing section) is
//! never an error.

pub mod timing;

pub use timing::TimingSettings;

use crate::error::{HmiError, Result};
use crate::types::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for config directories
pub const APP_ID: &str = "dev.xsmall.hmi-player";

/// Config filename
pub const CONFIG_FILE: &str = "hmi.toml";

/// Default scene document path
pub const DEFAULT_SCENE_FILE: &str = "objects.json";

/// Default snapshot path
pub const DEFAULT_SNAPSHOT_FILE: &str = "saved_state.json";

// ==================== Config Directory ====================

/// Get the platform config directory for the player
pub fn config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// Candidate config file locations, in lookup order
pub fn config_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(path) = explicit {
        candidates.push(path.to_path_buf());
    }
    candidates.push(PathBuf::from(CONFIG_FILE));
    if let Some(dir) = config_dir() {
        candidates.push(dir.join(CONFIG_FILE));
    }
    candidates
}

// ==================== Sections ====================

/// Window settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Surface clear colour
    pub background: Color,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "XSmall-HMI SCADA Player".to_string(),
            width: 1024,
            height: 768,
            background: Color::rgb(16, 41, 79),
        }
    }
}

/// File locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Scene document (created with the default scene if missing)
    pub scene: PathBuf,

    /// Variable snapshot written by autosave
    pub snapshot: PathBuf,

    /// Optional directory for daily-rolling log files
    pub log_dir: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            scene: PathBuf::from(DEFAULT_SCENE_FILE),
            snapshot: PathBuf::from(DEFAULT_SNAPSHOT_FILE),
            log_dir: None,
        }
    }
}

/// Typeface resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Tried in order; the first readable file wins
    pub candidates: Vec<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        let candidates = [
            "../assets/fonts/helveticabold.ttf",
            "assets/fonts/helveticabold.ttf",
            "assets/fonts/arial.ttf",
            "../../assets/fonts/helveticabold.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
            "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
            "C:/Windows/Fonts/arialbd.ttf",
        ];
        Self {
            candidates: candidates.iter().map(PathBuf::from).collect(),
        }
    }
}

/// Image asset resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// How many `../` levels to try in front of a requested path
    pub search_parents: usize,

    /// Tried after the requested path and its parent variants
    pub image_fallbacks: Vec<PathBuf>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            search_parents: 2,
            image_fallbacks: vec![
                PathBuf::from("assets/images/logo.png"),
                PathBuf::from("../assets/images/logo.png"),
            ],
        }
    }
}

/// Scene evaluation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Tolerance for indicator condition matching. 0.0 keeps exact equality,
    /// which is only reliable for integer-valued status variables.
    pub condition_tolerance: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            condition_tolerance: 0.0,
        }
    }
}

/// Demonstration behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Seed demo variables and run the temperature control step
    pub enabled: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// ==================== Player Config ====================

/// Complete player configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub window: WindowConfig,
    pub paths: PathsConfig,
    pub timing: TimingSettings,
    pub fonts: FontConfig,
    pub assets: AssetConfig,
    pub scene: SceneConfig,
    pub demo: DemoConfig,
}

impl PlayerConfig {
    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            HmiError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        toml::from_str(&content)
            .map_err(|e| HmiError::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Load the first existing candidate, returning defaults on any error.
    ///
    /// Nothing is logged here; the caller reports the [`ConfigOrigin`] once
    /// logging is up.
    pub fn load_or_default(explicit: Option<&Path>) -> (Self, ConfigOrigin) {
        for candidate in config_candidates(explicit) {
            if !candidate.exists() {
                continue;
            }
            return match Self::load(&candidate) {
                Ok(config) => (config, ConfigOrigin::File(candidate)),
                Err(e) => (Self::default(), ConfigOrigin::Invalid(e)),
            };
        }

        match explicit {
            Some(path) => (Self::default(), ConfigOrigin::Missing(path.to_path_buf())),
            None => (Self::default(), ConfigOrigin::Defaults),
        }
    }

    /// Save to a config file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| HmiError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| HmiError::Config(format!("Failed to write config: {}", e)))
    }
}

/// Where the active configuration came from
#[derive(Debug)]
pub enum ConfigOrigin {
    /// Read from this file
    File(PathBuf),
    /// No config file anywhere
    Defaults,
    /// The explicitly requested file does not exist
    Missing(PathBuf),
    /// A file was found but could not be read or parsed
    Invalid(HmiError),
}

impl ConfigOrigin {
    pub fn is_fallback(&self) -> bool {
        matches!(self, ConfigOrigin::Missing(_) | ConfigOrigin::Invalid(_))
    }

    pub fn log(&self) {
        match self {
            ConfigOrigin::File(path) => tracing::info!("Loaded configuration from {:?}", path),
            ConfigOrigin::Defaults => tracing::debug!("No configuration file, using defaults"),
            ConfigOrigin::Missing(path) => {
                tracing::warn!("Config file {:?} not found, using defaults", path)
            }
            ConfigOrigin::Invalid(e) => tracing::warn!("{}, using defaults", e),
        }
    }
}

// ==================== Tests ====================
