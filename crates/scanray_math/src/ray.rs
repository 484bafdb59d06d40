use crate::Vec3;

/// A ray in 3D space with origin and direction.
///
/// The direction is not normalized. Rays are pre-scaled to a fixed
/// magnitude so that the useful part of the ray lies in `t ∈ [ε, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + direction * t
    #[inline]
    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }
}
