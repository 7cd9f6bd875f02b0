//! # xr_math
//!
//! Math types for the XR interaction runtime. Re-exports [`glam`] for linear
//! algebra and defines the spatial types hit testing is built from.

pub mod ray;
pub mod transform;

// Re-export glam types for convenience.
pub use glam::{EulerRot, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

pub use ray::{Aabb, Ray};
pub use transform::Transform3D;
