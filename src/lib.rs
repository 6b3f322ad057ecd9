// src/lib.rs
//! Keyscene
//!
//! Scene, material and animation core for an interactive 3D keyboard product
//! page: a hero scene with a floating keyboard and keycaps, and a configurator
//! scene where the keyboard's skin can be swapped.
//!
//! The keyboard model is fetched once per [`AppContext`], bound to a shared
//! [`MaterialSet`](gfx::resources::MaterialSet) and cloned into each scene.
//! Everything runs on one thread; [`ShowcaseApp::frame`] is the only driver.

pub mod animation;
pub mod app;
pub mod config;
pub mod configurator;
pub mod error;
pub mod gfx;
pub mod keyboard;
pub mod loaders;
pub mod prelude;
pub mod scenes;
pub mod themes;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export main types for convenience
pub use app::{AppContext, AppEvent, ShowcaseApp};
pub use config::{MotionConfig, ShowcaseConfig};
pub use error::{AssetError, AssetResult};

/// Creates an app reading models and textures from `asset_root` on disk
pub fn from_asset_root(asset_root: impl Into<std::path::PathBuf>) -> ShowcaseApp {
    let config = ShowcaseConfig::new().with_asset_root(asset_root);
    let source = std::rc::Rc::new(loaders::ObjAssetSource::new(config.asset_root.clone()));
    let textures = std::rc::Rc::new(gfx::resources::FileTextureLoader::new(config.asset_root.clone()));
    ShowcaseApp::new(config, source, textures)
}
