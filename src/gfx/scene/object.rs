use std::cell::RefCell;
use std::rc::Rc;

use cgmath::{Matrix4, Rad, Vector3};

use super::vertex::MeshGeometry;
use crate::gfx::resources::material::MaterialHandle;

/// Position, Euler rotation (radians, XYZ order) and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Builder pattern: Set position
    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.position = position;
        self
    }

    /// Builder pattern: Set rotation
    pub fn with_rotation(mut self, rotation: Vector3<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: Set uniform scale
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vector3::new(scale, scale, scale);
        self
    }

    /// Composes the matrix as T * R * S
    pub fn matrix(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.position);
        let r = Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z));
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        t * r * s
    }
}

/// A named piece of a model with its surface
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub geometry: Rc<MeshGeometry>,
    pub material: Option<MaterialHandle>,
    pub transform: Transform,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Mesh {
    pub fn new(name: &str, geometry: Rc<MeshGeometry>) -> Self {
        Self {
            name: name.to_string(),
            geometry,
            material: None,
            transform: Transform::default(),
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    /// Assigns a material to this mesh
    pub fn set_material(&mut self, material: MaterialHandle) {
        self.material = Some(material);
    }
}

/// A model placed in a scene
///
/// `Clone` gives an independent instance: transforms and mesh records are
/// copied, while geometry and materials stay shared with the original.
#[derive(Debug, Clone)]
pub struct Object {
    pub name: String,
    pub transform: Transform,
    pub meshes: Vec<Mesh>,
    pub visible: bool,
}

/// Object shared between a scene and the tweens animating it
pub type SharedObject = Rc<RefCell<Object>>;

impl Object {
    /// Create a new Object with identity transformation
    pub fn new(name: &str, meshes: Vec<Mesh>) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::default(),
            meshes,
            visible: true,
        }
    }

    /// Wraps the object for shared, mutable access
    pub fn into_shared(self) -> SharedObject {
        Rc::new(RefCell::new(self))
    }

    /// First mesh with the given name
    pub fn mesh(&self, name: &str) -> Option<&Mesh> {
        self.meshes.iter().find(|mesh| mesh.name == name)
    }

    pub fn mesh_mut(&mut self, name: &str) -> Option<&mut Mesh> {
        self.meshes.iter_mut().find(|mesh| mesh.name == name)
    }

    /// Set translation
    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.transform.position = position;
    }

    /// Apply translation
    pub fn translate(&mut self, delta: Vector3<f32>) {
        self.transform.position += delta;
    }

    /// Set rotation (radians)
    pub fn set_rotation(&mut self, rotation: Vector3<f32>) {
        self.transform.rotation = rotation;
    }

    /// Set uniform scale
    pub fn set_scale(&mut self, scale: f32) {
        self.transform.scale = Vector3::new(scale, scale, scale);
    }

    /// Reset to identity transform
    pub fn reset_transform(&mut self) {
        self.transform = Transform::default();
    }

    /// World matrix of a mesh inside this object
    pub fn mesh_world_matrix(&self, mesh: &Mesh) -> Matrix4<f32> {
        self.transform.matrix() * mesh.transform.matrix()
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.geometry.vertex_count()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.geometry.triangle_count()).sum()
    }
}
