//! # Scene Management Module
//!
//! Object hierarchies and the scene container the hero and configurator
//! scenes are assembled from.
//!
//! ## Key Components
//!
//! - [`Scene`] - Camera, lighting and the objects to draw
//! - [`Object`] - A placed model made of named [`Mesh`]es
//! - [`Transform`] - Position, rotation and scale
//! - [`Vertex3D`] / [`MeshGeometry`] - Vertex data shared between clones
//!
//! ## Object Management
//!
//! Objects in the scene support:
//! - Named meshes with shared geometry and materials
//! - Shadow casting/receiving flags per mesh
//! - Transform operations (position, rotation, scale)
//! - Cheap cloning for independent instances of one loaded model

pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use object::{Mesh, Object, SharedObject, Transform};
pub use scene::{Scene, SceneStatistics};
pub use vertex::{MeshGeometry, Vertex3D};
