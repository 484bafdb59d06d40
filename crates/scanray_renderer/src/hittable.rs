//! Hittable trait and SurfacePoint for ray-object intersection.

use scanray_math::{Ray, Vec3};

/// Smallest ray parameter accepted as a hit. Keeps secondary rays from
/// re-hitting the surface they start on.
pub const EPSILON: f64 = 1e-6;

/// Record of a ray-surface intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    /// Point of intersection
    pub position: Vec3,
    /// Outward unit normal
    pub normal: Vec3,
    /// Incoming direction mirrored about the normal (unit length)
    pub reflected: Vec3,
    /// Ray parameter t where the intersection occurs
    pub distance: f64,
}

/// Trait for objects that can be hit by rays.
///
/// Rays are pre-scaled, so only hits with `t` in `[EPSILON, 1]` count.
pub trait Hittable: Send + Sync {
    /// Find the nearest accepted hit along `ray`.
    fn intersect(&self, ray: &Ray) -> Option<SurfacePoint>;

    /// Test whether `ray` hits this object at all. Used for shadow rays,
    /// where the hit details are not needed.
    fn occludes(&self, ray: &Ray) -> bool;
}
