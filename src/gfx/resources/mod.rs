// src/gfx/resources/mod.rs
//! Surface resources
//!
//! Handles materials and textures shared by loaded models.

pub mod material;
pub mod texture;

// Re-export main types
pub use material::{Material, MaterialHandle, MaterialRole, MaterialSet};
pub use texture::{
    ColorSpace, FileTextureLoader, TextureData, TextureHandle, TextureLoader, TextureOptions,
    WrapMode,
};
