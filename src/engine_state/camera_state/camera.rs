//! # First-Person Camera
//!
//! View and projection math for the player's eye, plus the `CameraPose`
//! snapshot that crosses over to the renderer.
//!
//! Yaw 0 looks along +X and positive yaw turns toward +Z. Positive pitch looks
//! up. Clip-space depth is in [0, 1].

use cgmath::{perspective, InnerSpace, Matrix4, Point3, Rad, Vector3};
use std::f32::consts::FRAC_PI_2;

use crate::engine_state::rendering::Viewport;

/// Remaps clip-space depth from OpenGL's [-1, 1] to [0, 1]: z is halved, then
/// shifted up by half.
#[rustfmt::skip]
pub const OPENGL_TO_ZERO_ONE_DEPTH: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Largest pitch magnitude; looking straight up or down breaks `look_to_rh`.
pub const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// Eye position and look angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
}

impl Camera {
    pub fn new(position: Point3<f32>, yaw: Rad<f32>, pitch: Rad<f32>) -> Self {
        Self {
            position,
            yaw,
            pitch,
        }
    }

    /// Unit vector the camera looks along.
    pub fn forward(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        Vector3::new(pitch_cos * yaw_cos, pitch_sin, pitch_cos * yaw_sin).normalize()
    }

    /// World to view space.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.forward(), Vector3::unit_y())
    }
}

/// Perspective settings that follow the viewport's aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    aspect: f32,
    fov_y: Rad<f32>,
    near: f32,
    far: f32,
}

impl Projection {
    /// # Arguments
    /// * `viewport` - Output size; a zero height counts as one pixel
    /// * `fov_y` - Vertical field of view
    /// * `near`, `far` - Clipping plane distances
    pub fn new(viewport: Viewport, fov_y: impl Into<Rad<f32>>, near: f32, far: f32) -> Self {
        Self {
            aspect: viewport.aspect_ratio(),
            fov_y: fov_y.into(),
            near,
            far,
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.aspect = viewport.aspect_ratio();
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// View to clip space, with depth in [0, 1].
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_ZERO_ONE_DEPTH * perspective(self.fov_y, self.aspect, self.near, self.far)
    }
}

/// Camera data handed to the renderer once per tick.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraPose {
    /// Eye position in world space
    pub position: [f32; 3],
    /// Yaw in radians
    pub yaw: f32,
    /// Pitch in radians
    pub pitch: f32,
    /// Combined projection * view matrix, column major
    pub view_proj: [[f32; 4]; 4],
}

impl CameraPose {
    /// Builds the pose for `camera` seen through `projection`.
    pub fn new(camera: &Camera, projection: &Projection) -> Self {
        let view_proj = projection.projection_matrix() * camera.view_matrix();
        Self {
            position: camera.position.into(),
            yaw: camera.yaw.0,
            pitch: camera.pitch.0,
            view_proj: view_proj.into(),
        }
    }
}
