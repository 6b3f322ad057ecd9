//! # Model Loading
//!
//! [`AssetSource`] is the seam between the scenes and whatever fetches and
//! parses model files. [`ObjAssetSource`] reads Wavefront OBJ files from the
//! asset root with `tobj`; each OBJ object/group becomes one named [`Mesh`].

use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use log::{debug, info};

use crate::config::resolve_asset_path;
use crate::error::{AssetError, AssetResult};
use crate::gfx::scene::{Mesh, MeshGeometry, Object};

/// Fetches and parses a model into an unbound object graph
///
/// Meshes come back without materials; binding is the caller's job.
pub trait AssetSource {
    fn load_model(&self, path: &str) -> LocalBoxFuture<'static, AssetResult<Object>>;
}

/// Loads OBJ models relative to an asset root
pub struct ObjAssetSource {
    root: PathBuf,
}

impl ObjAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for ObjAssetSource {
    fn load_model(&self, path: &str) -> LocalBoxFuture<'static, AssetResult<Object>> {
        let file = resolve_asset_path(&self.root, path);
        async move { load_obj_object(&file) }.boxed_local()
    }
}

/// Parses an OBJ file into an [`Object`] with one mesh per model
pub fn load_obj_object(path: &Path) -> AssetResult<Object> {
    let display = path.display().to_string();
    match std::fs::metadata(path) {
        Ok(_) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(AssetError::NotFound { path: display });
        }
        Err(err) => {
            return Err(AssetError::Io {
                path: display,
                source: Arc::new(err),
            });
        }
    }

    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| AssetError::Parse {
        path: display.clone(),
        source: Arc::new(source),
    })?;

    if models.is_empty() {
        return Err(AssetError::Empty { path: display });
    }

    let meshes: Vec<Mesh> = models
        .into_iter()
        .map(|model| {
            let mesh = model.mesh;
            debug!(
                "  mesh '{}': {} vertices, {} triangles",
                model.name,
                mesh.positions.len() / 3,
                mesh.indices.len() / 3
            );
            let geometry = MeshGeometry::from_arrays(
                &mesh.positions,
                &mesh.normals,
                &mesh.texcoords,
                mesh.indices,
            );
            Mesh::new(&model.name, Rc::new(geometry))
        })
        .collect();

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());

    info!("Loaded model {} ({} meshes)", display, meshes.len());
    Ok(Object::new(&name, meshes))
}
