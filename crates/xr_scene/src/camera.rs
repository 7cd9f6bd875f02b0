//! Perspective cameras and viewport coordinate mapping.

use xr_math::{Mat4, Vec2};

/// A perspective camera attached to a scene node. The camera looks down the
/// node's local −Z axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    #[must_use]
    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y_degrees,
            aspect,
            near,
            far,
        }
    }

    /// OpenGL-style projection (clip-space depth in `[-1, 1]`).
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(75.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}

/// Screen rectangle of the element receiving pointer events, in client
/// pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[must_use]
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Map client coordinates to normalised device coordinates: `x` and `y`
    /// in `[-1, 1]`, `y` pointing up.
    #[must_use]
    pub fn normalize(&self, client: Vec2) -> Vec2 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            (client.x - self.left) / self.width * 2.0 - 1.0,
            -((client.y - self.top) / self.height) * 2.0 + 1.0,
        )
    }
}
