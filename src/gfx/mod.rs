//! # Graphics Module
//!
//! Scene description for the keyboard page: cameras, lights, materials,
//! textures and the object graph. There is no GPU backend here; a renderer
//! reads these types each frame.
//!
//! ## Architecture Overview
//!
//! - **Camera** ([`camera`]) - Perspective camera animated by scroll tracks
//! - **Lighting** ([`lights`]) - Ambient, shadow-casting directional lights and an HDR environment
//! - **Scene Management** ([`scene`]) - Objects, meshes and shared geometry
//! - **Resource Management** ([`resources`]) - Materials and deferred texture handles
//!
//! ## Key Features
//!
//! - **Shared materials** - Cloned models point at the same materials, so a skin swap is one write
//! - **Deferred textures** - Handles exist before their pixels and fill in when the loader is pumped
//!
//! [`Scene`]: scene::Scene

pub mod camera;
pub mod lights;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::PerspectiveCamera;
pub use lights::{DirectionalLight, Lighting};
pub use scene::Scene;
