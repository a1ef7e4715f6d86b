//! # Camera State Management
//!
//! This module handles all camera-related functionality including:
//! - Camera position and orientation tracking
//! - View and projection matrix calculations
//! - Following the player's body from eye height
//!
//! ## Core Components
//! - `Camera`: Represents the camera's position and orientation in 3D space
//! - `Projection`: Manages the camera's projection matrix
//! - `CameraPose`: Plain-data snapshot handed to the renderer each tick

use cgmath::{Deg, Point3, Rad, Vector3};

use super::rendering::Viewport;

pub mod camera;

pub use camera::{Camera, CameraPose, Projection, SAFE_FRAC_PI_2};

/// Height of the eyes above the body's feet.
pub const EYE_HEIGHT: f32 = 1.6;

/// Vertical field of view used for new projections.
pub const DEFAULT_FOVY: Deg<f32> = Deg(75.0);
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 1000.0;

/// Owns the camera and its projection.
///
/// The camera has no motion of its own: every tick it is moved to the body's
/// eye point and takes the body's look direction.
#[derive(Debug)]
pub struct CameraState {
    /// The current camera position and orientation
    pub camera: Camera,
    /// Perspective settings for the current viewport
    pub projection: Projection,
}

impl CameraState {
    /// Creates a camera at the origin looking along +X.
    ///
    /// # Arguments
    /// * `viewport` - The initial output size, used for the aspect ratio
    pub fn new(viewport: Viewport) -> Self {
        CameraState {
            camera: Camera::new(Point3::new(0.0, 0.0, 0.0), Rad(0.0), Rad(0.0)),
            projection: Projection::new(viewport, DEFAULT_FOVY, Z_NEAR, Z_FAR),
        }
    }

    /// Moves the camera to the eye point of a body standing at `feet`.
    ///
    /// # Returns
    /// The pose to hand to the renderer for this tick
    pub fn follow(&mut self, feet: Point3<f32>, yaw: Rad<f32>, pitch: Rad<f32>) -> CameraPose {
        self.camera.position = feet + Vector3::new(0.0, EYE_HEIGHT, 0.0);
        self.camera.yaw = yaw;
        self.camera.pitch = pitch;
        self.pose()
    }

    /// Updates the projection for a new output size.
    pub fn resize(&mut self, viewport: Viewport) {
        self.projection.resize(viewport);
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose::new(&self.camera, &self.projection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_places_the_eye_above_the_feet() {
        let mut state = CameraState::new(Viewport {
            width: 1280,
            height: 720,
        });
        let pose = state.follow(Point3::new(3.5, 64.0, -2.5), Rad(1.0), Rad(-0.25));

        assert_eq!(pose.position, [3.5, 64.0 + EYE_HEIGHT, -2.5]);
        assert_eq!(pose.yaw, 1.0);
        assert_eq!(pose.pitch, -0.25);
    }
}
