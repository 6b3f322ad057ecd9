//! Perspective camera used by both scenes

use cgmath::*;

/// Maps OpenGL clip depth (-1..1) to the 0..1 range modern APIs expect
#[rustfmt::skip]
pub const CLIP_DEPTH_CORRECTION: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub aspect: f32,
    /// Vertical field of view
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl PerspectiveCamera {
    pub fn new(fovy: f32, width: u32, height: u32) -> Self {
        let mut camera = Self {
            position: Vector3::new(0.0, 0.0, 5.0),
            target: Vector3::zero(),
            up: Vector3::unit_y(),
            aspect: 1.0,
            fovy: Deg(fovy),
            znear: 0.1,
            zfar: 100.0,
        };
        camera.resize(width, height);
        camera
    }

    /// Builder pattern: Set eye position
    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.position = position;
        self
    }

    /// Builder pattern: Set the point looked at
    pub fn looking_at(mut self, target: Vector3<f32>) -> Self {
        self.target = target;
        self
    }

    /// Updates the aspect ratio; zero-sized viewports are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(
            Point3::from_vec(self.position),
            Point3::from_vec(self.target),
            self.up,
        )
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        CLIP_DEPTH_CORRECTION * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_updates_aspect() {
        let mut camera = PerspectiveCamera::new(45.0, 800, 600);
        assert!((camera.aspect - 4.0 / 3.0).abs() < 1e-6);

        camera.resize(1920, 1080);
        assert!((camera.aspect - 16.0 / 9.0).abs() < 1e-6);

        camera.resize(0, 1080);
        assert!((camera.aspect - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        let camera = PerspectiveCamera::new(45.0, 800, 600)
            .with_position(Vector3::new(0.0, 2.0, 6.0))
            .looking_at(Vector3::new(0.0, 0.5, 0.0));

        let clip = camera.view_projection() * Vector4::new(0.0, 0.5, 0.0, 1.0);
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
    }
}
