//! Rays, axis-aligned bounds and ray/primitive intersection.
//!
//! Intersection routines work in the primitive's local space. A world ray
//! transformed by a node's inverse world matrix keeps its `t` parameter, so
//! the `t` returned here is the world-space distance as long as the world
//! ray's direction was unit length.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

const PARALLEL_EPSILON: f32 = 1e-6;

/// A half-line `origin + t * direction`, `t >= 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray with a normalised direction.
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Evaluate the point at parameter `t` along the ray.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Transform the ray by an affine matrix without renormalising, so that
    /// `t` values are preserved between the two spaces.
    #[must_use]
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        Self {
            origin: matrix.transform_point3(self.origin),
            direction: matrix.transform_vector3(self.direction),
        }
    }

    /// Sphere of `radius` centred at the origin.
    #[must_use]
    pub fn intersect_sphere(&self, radius: f32) -> Option<f32> {
        let a = self.direction.length_squared();
        if a < PARALLEL_EPSILON {
            return None;
        }
        let b = 2.0 * self.origin.dot(self.direction);
        let c = self.origin.length_squared() - radius * radius;
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        let near = (-b - root) / (2.0 * a);
        let far = (-b + root) / (2.0 * a);
        if near >= 0.0 {
            Some(near)
        } else if far >= 0.0 {
            Some(far)
        } else {
            None
        }
    }

    /// Slab test against an axis-aligned box.
    #[must_use]
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let o = self.origin[axis];
            let d = self.direction[axis];
            if d.abs() < PARALLEL_EPSILON {
                if o < aabb.min[axis] || o > aabb.max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (aabb.min[axis] - o) * inv;
            let mut t1 = (aabb.max[axis] - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }

    /// Double-sided rectangle in the local XY plane, centred at the origin.
    #[must_use]
    pub fn intersect_quad(&self, width: f32, height: f32) -> Option<f32> {
        if self.direction.z.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = -self.origin.z / self.direction.z;
        if t < 0.0 {
            return None;
        }
        let p = self.at(t);
        (p.x.abs() <= width * 0.5 && p.y.abs() <= height * 0.5).then_some(t)
    }

    /// Double-sided disc in the local XZ plane, centred at the origin.
    #[must_use]
    pub fn intersect_disc(&self, radius: f32) -> Option<f32> {
        if self.direction.y.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = -self.origin.y / self.direction.y;
        if t < 0.0 {
            return None;
        }
        let p = self.at(t);
        (p.x * p.x + p.z * p.z <= radius * radius).then_some(t)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box centred at the origin with the given half extents.
    #[must_use]
    pub fn from_half_extents(half: Vec3) -> Self {
        Self::new(-half, half)
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[must_use]
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[must_use]
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Bounds of this box after an affine transform (all eight corners).
    #[must_use]
    pub fn transformed(&self, matrix: &Mat4) -> Aabb {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            let p = matrix.transform_point3(corner);
            min = min.min(p);
            max = max.max(p);
        }
        Aabb { min, max }
    }
}
