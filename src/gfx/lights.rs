//! Scene lighting description
//!
//! Lights are plain data; scroll tracks and tweens animate their fields.

use cgmath::Vector3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: Vector3<f32>,
    pub target: Vector3<f32>,
    pub cast_shadow: bool,
    /// Square shadow map resolution
    pub shadow_map_size: u32,
}

impl DirectionalLight {
    pub fn new(position: Vector3<f32>, intensity: f32) -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity,
            position,
            target: Vector3::new(0.0, 0.0, 0.0),
            cast_shadow: false,
            shadow_map_size: 1024,
        }
    }

    /// Builder pattern: Enable shadow casting
    pub fn with_shadows(mut self, map_size: u32) -> Self {
        self.cast_shadow = true;
        self.shadow_map_size = map_size;
        self
    }
}

/// Image-based lighting from an HDR environment map
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub hdr_path: String,
    pub intensity: f32,
    /// Also draw the map as the background
    pub as_background: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lighting {
    pub ambient: AmbientLight,
    pub directional: Vec<DirectionalLight>,
    pub environment: Option<Environment>,
}

impl Lighting {
    pub fn new(ambient_intensity: f32) -> Self {
        Self {
            ambient: AmbientLight {
                color: [1.0, 1.0, 1.0],
                intensity: ambient_intensity,
            },
            directional: Vec::new(),
            environment: None,
        }
    }

    /// Builder pattern: Add a directional light
    pub fn with_directional(mut self, light: DirectionalLight) -> Self {
        self.directional.push(light);
        self
    }

    /// Builder pattern: Set the HDR environment
    pub fn with_environment(mut self, hdr_path: &str, intensity: f32) -> Self {
        self.environment = Some(Environment {
            hdr_path: hdr_path.to_string(),
            intensity,
            as_background: false,
        });
        self
    }

    /// Whether any light renders a shadow map
    pub fn casts_shadows(&self) -> bool {
        self.directional.iter().any(|light| light.cast_shadow)
    }
}
