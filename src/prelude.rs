//! # Keyscene Prelude
//!
//! Commonly used types in one import:
//!
//! ```no_run
//! use keyscene::prelude::*;
//!
//! let mut app = keyscene::from_asset_root("./public");
//! app.resize(1920, 1080);
//! app.frame(1.0 / 60.0);
//! app.click_theme("kick");
//! ```

// Re-export core application types
pub use crate::app::{AppContext, AppEvent, ShowcaseApp};
pub use crate::config::{MotionConfig, ShowcaseConfig};
pub use crate::error::{AssetError, AssetResult};

// Re-export scene and resource types
pub use crate::gfx::resources::{
    FileTextureLoader, MaterialHandle, MaterialRole, MaterialSet, TextureHandle, TextureLoader,
    TextureOptions,
};
pub use crate::gfx::scene::{Mesh, Object, Scene, SharedObject};
pub use crate::loaders::{AssetSource, ObjAssetSource};

// Re-export the keyboard pipeline and configurator
pub use crate::configurator::{ConfiguratorController, ThemeButton, TransitionOutcome};
pub use crate::keyboard::{KeyboardModelLoader, MeshRole};
pub use crate::themes::{find_theme, list_themes, ThemeDescriptor};

// Re-export animation
pub use crate::animation::{AnimationClock, Easing, ScrollTimeline, ScrollTrigger, TweenOptions};

// Re-export common external dependencies
pub use cgmath::Vector3;
