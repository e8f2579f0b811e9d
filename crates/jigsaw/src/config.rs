use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::puzzle::win::DEFAULT_TOLERANCE;
use crate::puzzle::BoardSettings;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Grid size must be at least 1")]
    ZeroGridSize,

    #[error("Tolerance must be positive, got {0}")]
    NonPositiveTolerance(f32),

    #[error("At least one puzzle image is required")]
    NoImages,

    #[error("Play area fill must be within (0, 1], got {0}")]
    FillOutOfRange(f32),

    #[cfg(target_arch = "wasm32")]
    #[error("Could not read host config: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PuzzleImage {
    pub name: String,
    /// Asset path, relative to the bit's assets folder.
    pub path: String,
}

impl PuzzleImage {
    fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_owned(),
            path: path.to_owned(),
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct JigsawConfig {
    /// Pieces per row and per column.
    pub grid_size: u32,
    /// Pixels a piece may sit from home and still count as placed.
    pub tolerance: f32,
    /// Share of the free window area the square play area takes.
    pub play_area_fill: f32,
    pub images: Vec<PuzzleImage>,
    /// Fixed shuffle seed, for reproducible layouts.
    pub seed: Option<u64>,
}

impl Default for JigsawConfig {
    fn default() -> Self {
        Self {
            grid_size: 6,
            tolerance: DEFAULT_TOLERANCE,
            play_area_fill: 0.92,
            images: vec![
                PuzzleImage::new("Sunset", "puzzles/sunset.png"),
                PuzzleImage::new("Checker", "puzzles/checker.png"),
                PuzzleImage::new("Rings", "puzzles/rings.png"),
            ],
            seed: None,
        }
    }
}

impl JigsawConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::ZeroGridSize);
        }
        if !(self.tolerance > 0.0) {
            return Err(ConfigError::NonPositiveTolerance(self.tolerance));
        }
        if !(self.play_area_fill > 0.0 && self.play_area_fill <= 1.0) {
            return Err(ConfigError::FillOutOfRange(self.play_area_fill));
        }
        if self.images.is_empty() {
            return Err(ConfigError::NoImages);
        }
        Ok(())
    }

    pub const fn board_settings(&self) -> BoardSettings {
        BoardSettings {
            grid_size: self.grid_size,
            tolerance: self.tolerance,
        }
    }

    pub fn rng(&self) -> fastrand::Rng {
        self.seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed)
    }

    /// Config for this run: the host page's `window.jigsawConfig` on wasm,
    /// defaults otherwise. Invalid configs fall back to defaults.
    pub fn load() -> Self {
        match Self::from_host().and_then(|config| config.validate().map(|()| config)) {
            Ok(config) => config,
            Err(err) => {
                error!("Ignoring jigsaw config: {err}");
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn from_host() -> Result<Self, ConfigError> {
        Ok(Self::default())
    }

    #[cfg(target_arch = "wasm32")]
    fn from_host() -> Result<Self, ConfigError> {
        let Some(window) = web_sys::window() else {
            return Ok(Self::default());
        };
        let Some(value) = window.get("jigsawConfig") else {
            return Ok(Self::default());
        };
        serde_wasm_bindgen::from_value(value.into())
            .map_err(|err| ConfigError::Malformed(err.to_string()))
    }
}
