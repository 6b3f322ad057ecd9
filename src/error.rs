//! Error types for asset loading
//!
//! Loads can be shared between several waiters, so [`AssetError`] is cheap to
//! clone: wrapped sources live behind an [`Arc`].

use std::sync::Arc;

use thiserror::Error;

/// Failure while fetching or decoding a model or texture
#[derive(Debug, Clone, Error)]
pub enum AssetError {
    #[error("asset not found: {path}")]
    NotFound { path: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("failed to parse model {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: Arc<tobj::LoadError>,
    },

    #[error("failed to decode image {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: Arc<image::ImageError>,
    },

    #[error("model {path} contains no meshes")]
    Empty { path: String },
}

impl AssetError {
    /// Path of the asset that failed
    pub fn path(&self) -> &str {
        match self {
            AssetError::NotFound { path }
            | AssetError::Io { path, .. }
            | AssetError::Parse { path, .. }
            | AssetError::Image { path, .. }
            | AssetError::Empty { path } => path,
        }
    }
}

pub type AssetResult<T> = Result<T, AssetError>;
