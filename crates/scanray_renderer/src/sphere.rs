//! Ray-sphere intersection.

use crate::hittable::{Hittable, SurfacePoint, EPSILON};
use scanray_core::Sphere;
use scanray_math::{normalize, reflect, Ray};

/// Solve |o + t·d - c|² = r² for t.
///
/// Returns both roots unless the ray misses, or both roots fall before
/// `EPSILON`, or both fall beyond 1.
fn roots(sphere: &Sphere, ray: &Ray) -> Option<(f64, f64)> {
    let (o, d, p) = (ray.origin, ray.direction, sphere.center);

    let a = d.x * d.x + d.y * d.y + d.z * d.z;
    let b = 2.0 * d.x * (o.x - p.x) + 2.0 * d.y * (o.y - p.y) + 2.0 * d.z * (o.z - p.z);
    let c = p.x * p.x + p.y * p.y + p.z * p.z + o.x * o.x + o.y * o.y + o.z * o.z
        + 2.0 * (-p.x * o.x - p.y * o.y - p.z * o.z)
        - sphere.radius * sphere.radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let t1 = (-b + sqrt_d) / (2.0 * a);
    let t2 = (-b - sqrt_d) / (2.0 * a);

    if (t1 < EPSILON && t2 < EPSILON) || (t1 > 1.0 && t2 > 1.0) {
        return None;
    }

    Some((t1, t2))
}

impl Hittable for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<SurfacePoint> {
        let (mut t1, mut t2) = roots(self, ray)?;

        // A root behind the origin falls back to the other one. The chosen
        // root may still exceed 1 when the ray starts inside the sphere.
        if t1 < EPSILON {
            t1 = t2;
        }
        if t2 < EPSILON {
            t2 = t1;
        }
        let distance = if t1 < t2 { t1 } else { t2 };

        let position = ray.at(distance);
        let normal = (position - self.center) / self.radius;
        let reflected = normalize(reflect(ray.direction, normal));

        Some(SurfacePoint {
            position,
            normal,
            reflected,
            distance,
        })
    }

    fn occludes(&self, ray: &Ray) -> bool {
        roots(self, ray).is_some()
    }
}
