use crate::gfx::{camera::PerspectiveCamera, lights::Lighting};

use super::object::SharedObject;

/// Camera, lights and the objects a renderer draws each frame
///
/// Objects are shared handles so loaders and tweens can keep mutating them
/// after they have been added.
pub struct Scene {
    pub name: String,
    pub camera: PerspectiveCamera,
    pub lighting: Lighting,
    pub objects: Vec<SharedObject>,
}

impl Scene {
    /// Creates an empty scene
    pub fn new(name: &str, camera: PerspectiveCamera, lighting: Lighting) -> Self {
        Self {
            name: name.to_string(),
            camera,
            lighting,
            objects: Vec::new(),
        }
    }

    /// Adds an object and returns its index
    pub fn add_object(&mut self, object: SharedObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    /// Finds an object by name
    pub fn find_object(&self, name: &str) -> Option<SharedObject> {
        self.objects
            .iter()
            .find(|object| object.borrow().name == name)
            .cloned()
    }

    /// Updates projection for a new viewport size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    /// Gets all object names for display
    pub fn get_object_names(&self) -> Vec<String> {
        self.objects
            .iter()
            .map(|obj| obj.borrow().name.clone())
            .collect()
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        let (mesh_count, total_triangles, total_vertices) = self.objects.iter().fold(
            (0, 0, 0),
            |(meshes, triangles, vertices), object| {
                let object = object.borrow();
                (
                    meshes + object.meshes.len(),
                    triangles + object.triangle_count(),
                    vertices + object.vertex_count(),
                )
            },
        );

        SceneStatistics {
            object_count: self.objects.len(),
            mesh_count,
            total_triangles,
            total_vertices,
        }
    }
}

/// Scene statistics for debugging and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub mesh_count: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
}
