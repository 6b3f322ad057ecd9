//! # Configuration
//!
//! Asset locations and motion constants. Every value has a fixed default
//! matching the static asset layout of the page (`/models`, `/textures`,
//! `/hdr`); builder methods exist for demos and tests that serve assets
//! from somewhere else.

use std::path::{Path, PathBuf};

use cgmath::Vector3;

use crate::animation::Easing;

/// Where assets live and which files make up the scenes
#[derive(Debug, Clone)]
pub struct ShowcaseConfig {
    /// Directory that asset paths such as `/models/keyboard.obj` are resolved against
    pub asset_root: PathBuf,
    pub keyboard_model: String,
    pub keycap_model: String,
    pub environment_map: String,
    pub environment_intensity: f32,
    /// Initial viewport size in pixels, until the first resize
    pub viewport: (u32, u32),
    pub motion: MotionConfig,
    /// Seed for keycap float timing, so runs are reproducible
    pub float_seed: u64,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("."),
            keyboard_model: "/models/keyboard.obj".to_string(),
            keycap_model: "/models/keycap.obj".to_string(),
            environment_map: "/hdr/blue-studio.hdr".to_string(),
            environment_intensity: 1.5,
            viewport: (1280, 720),
            motion: MotionConfig::default(),
            float_seed: 0x6b65_7973,
        }
    }
}

impl ShowcaseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: Set the directory assets are served from
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    /// Builder pattern: Set the keyboard model path
    pub fn with_keyboard_model(mut self, path: &str) -> Self {
        self.keyboard_model = path.to_string();
        self
    }

    /// Builder pattern: Set the initial viewport size
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = (width, height);
        self
    }

    /// Builder pattern: Set the keycap float seed
    pub fn with_float_seed(mut self, seed: u64) -> Self {
        self.float_seed = seed;
        self
    }

    /// Builder pattern: Set the configurator motion
    pub fn with_motion(mut self, motion: MotionConfig) -> Self {
        self.motion = motion;
        self
    }

    /// Resolves a site-absolute asset path (`/textures/x.png`) to a file path
    pub fn resolve(&self, asset_path: &str) -> PathBuf {
        resolve_asset_path(&self.asset_root, asset_path)
    }
}

/// Joins a site-absolute asset path onto a root directory
pub fn resolve_asset_path(root: &Path, asset_path: &str) -> PathBuf {
    root.join(asset_path.trim_start_matches('/'))
}

/// Timing and offsets of the configurator skin swap
#[derive(Debug, Clone, Copy)]
pub struct MotionConfig {
    /// Where the keyboard sits while idle
    pub resting_position: Vector3<f32>,
    /// Offset from rest the keyboard is lifted to before the swap
    pub raised_offset: Vector3<f32>,
    pub lift_duration: f32,
    pub lift_ease: Easing,
    pub settle_duration: f32,
    pub settle_ease: Easing,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            resting_position: Vector3::new(0.0, 0.0, 0.0),
            raised_offset: Vector3::new(0.0, 0.6, 0.0),
            lift_duration: 0.3,
            lift_ease: Easing::Power2In,
            settle_duration: 0.6,
            settle_ease: Easing::BackOut(1.7),
        }
    }
}

impl MotionConfig {
    pub fn raised_position(&self) -> Vector3<f32> {
        self.resting_position + self.raised_offset
    }
}
