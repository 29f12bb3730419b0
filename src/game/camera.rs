//=========================================================================
// Camera
//=========================================================================
//
// First-person view attached to the player body.
//
// Coordinates: +X right, +Y up, +Z forward. Viewport points run from
// (0, 0) at the bottom-left to (1, 1) at the top-right.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Quat, Vec2, Vec3};

//=== Internal Dependencies ===============================================

use crate::core::physics::{Ray, Transform};

//=== Camera ==============================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Quat,

    /// Vertical field of view in radians.
    pub fov_y: f32,

    /// Width over height.
    pub aspect: f32,

    /// Eye offset above the body centre.
    pub eye_height: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y: 60f32.to_radians(),
            aspect: 16.0 / 9.0,
            eye_height: 0.6,
        }
    }
}

impl Camera {
    /// Screen centre in viewport coordinates.
    pub const CENTER: Vec2 = Vec2::new(0.5, 0.5);

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Snaps the camera to a body's eye point and facing.
    pub fn follow(&mut self, body: &Transform) {
        self.position = body.position + Vec3::Y * self.eye_height;
        self.rotation = body.rotation;
    }

    /// Ray from the eye through a viewport point.
    pub fn viewport_point_to_ray(&self, point: Vec2) -> Ray {
        let half_height = (self.fov_y * 0.5).tan();
        let local = Vec3::new(
            (2.0 * point.x - 1.0) * half_height * self.aspect,
            (2.0 * point.y - 1.0) * half_height,
            1.0,
        );
        Ray::new(self.position, self.rotation * local)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
