//! Vector helpers with the exact arithmetic the renderer depends on.

use crate::Vec3;

/// Dot product.
#[inline]
pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a.dot(b)
}

/// Cross product.
#[inline]
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    a.cross(b)
}

/// Divide a vector by its magnitude.
///
/// Unlike `DVec3::normalize` this divides instead of multiplying by the
/// reciprocal length, and a zero vector yields NaN components.
#[inline]
pub fn normalize(v: Vec3) -> Vec3 {
    v / v.length()
}

/// Reflect `v` about the normal `n`.
///
/// For an incoming direction the result points away from the surface.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    let d = dot(v, n);
    -(2.0 * d * n - v)
}
