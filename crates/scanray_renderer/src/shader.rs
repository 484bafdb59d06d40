//! Recursive trace and Phong shading.
//!
//! Implements Whitted-style ray tracing with:
//! - Nearest-hit search over every sphere (no acceleration structure)
//! - Hard shadows from point lights
//! - Phong diffuse and specular terms
//! - Mirror reflection bounded by a fixed depth

use crate::camera::RaySampler;
use crate::hittable::{Hittable, SurfacePoint};
use scanray_core::{Scene, Sphere};
use scanray_math::{dot, normalize, Color, Ray};

/// Recursion limit: rays traced at this depth or deeper return black.
pub const MAX_RAY_DEPTH: u32 = 5;

/// Magnitude of every primary and reflection ray direction.
pub const RAY_MAGNITUDE: f64 = 1000.0;

/// Compute the color seen along a ray.
///
/// Misses return black; there is no background or environment light.
pub fn trace(scene: &Scene, ray: &Ray, depth: u32) -> Color {
    if depth >= MAX_RAY_DEPTH {
        return Color::ZERO;
    }

    let mut nearest: Option<(&Sphere, SurfacePoint)> = None;
    for sphere in scene.traversal() {
        if let Some(sp) = sphere.intersect(ray) {
            // Strict comparison: ties keep the sphere seen first
            if nearest.map_or(true, |(_, best)| sp.distance < best.distance) {
                nearest = Some((sphere, sp));
            }
        }
    }

    match nearest {
        Some((sphere, sp)) => shade(scene, sphere, &sp, depth),
        None => Color::ZERO,
    }
}

/// Direct Phong illumination at a surface point, plus the reflected color
/// when the material is reflective.
///
/// The result is not clamped; that happens when the pixel is packed.
pub fn shade(scene: &Scene, sphere: &Sphere, sp: &SurfacePoint, depth: u32) -> Color {
    let material = &sphere.material;
    let mut color = Color::ZERO;

    for light in scene.lights() {
        let to_light = light.position - sp.position;
        let shadow_ray = Ray::new(sp.position, to_light);

        if scene.traversal().any(|s| s.occludes(&shadow_ray)) {
            continue;
        }

        let light_dir = normalize(to_light);
        let diffuse = dot(sp.normal, light_dir).max(0.0);
        let specular = if material.specular_power > 0.0 {
            dot(sp.reflected, light_dir)
                .max(0.0)
                .powf(material.specular_power)
        } else {
            0.0
        };

        color += diffuse * material.color + Color::splat(specular);
    }

    if material.reflectivity > 0.0 {
        let ray = Ray::new(sp.position, sp.reflected * RAY_MAGNITUDE);
        color += trace(scene, &ray, depth + 1) * material.reflectivity;
    }

    color
}

/// Render a single pixel by averaging `samples` primary rays.
pub fn render_pixel(scene: &Scene, sampler: &RaySampler, x: u32, y: u32, samples: u32) -> Color {
    let rcp_samples = 1.0 / samples as f64;
    let mut pixel_color = Color::ZERO;

    for sample in 0..samples {
        let ray = sampler.primary_ray(x, y, sample);
        pixel_color += trace(scene, &ray, 0);
    }

    pixel_color * rcp_samples
}
