//! Primary ray generation.

use crate::config::RenderConfig;
use crate::jitter::JitterTables;
use crate::shader::RAY_MAGNITUDE;
use scanray_core::Camera;
use scanray_math::{cross, normalize, DMat3, DVec2, Ray, Vec3};

/// Fixed field of view in radians (π/4). The scene file's fov is ignored.
pub const FIELD_OF_VIEW: f64 = 0.78539816;
const HALF_FOV: f64 = FIELD_OF_VIEW * 0.5;

/// Film-plane y offset. Not 0.5, so the image is framed off-center
/// vertically.
pub const VERTICAL_OFFSET: f64 = 0.65;

/// Jitter offsets are scaled by this over the image width.
const JITTER_SPREAD: f64 = 1.5;

/// Maps (pixel, sample) to a primary ray for one camera and resolution.
#[derive(Clone, Debug)]
pub struct RaySampler {
    origin: Vec3,
    /// Camera-to-world basis (columns right, up, forward), rounded to f32
    basis: DMat3,
    width: f64,
    height: f64,
    aspect: f64,
    jitter_scale: f64,
    jitter: JitterTables,
}

impl RaySampler {
    /// Create a sampler for `camera` at the resolution in `config`.
    ///
    /// A camera looking straight up or down has no valid basis; its rays
    /// come out degenerate rather than failing.
    pub fn new(camera: &Camera, config: &RenderConfig, jitter: JitterTables) -> Self {
        let forward = normalize(camera.target - camera.position);
        let right = cross(Vec3::Y, forward);
        let up = cross(forward, right);

        // The basis is kept at single precision; output depends on it
        let basis = DMat3::from_cols(
            right.as_vec3().as_dvec3(),
            up.as_vec3().as_dvec3(),
            forward.as_vec3().as_dvec3(),
        );

        let width = config.width as f64;

        Self {
            origin: camera.position,
            basis,
            width,
            height: config.height as f64,
            aspect: config.aspect(),
            jitter_scale: JITTER_SPREAD / width,
            jitter,
        }
    }

    /// Generate the primary ray for sample `sample` of pixel (x, y).
    pub fn primary_ray(&self, x: u32, y: u32, sample: u32) -> Ray {
        let film = self.sample_position(x, y, sample);
        let local = Vec3::new(
            film.x * RAY_MAGNITUDE,
            film.y * RAY_MAGNITUDE,
            (1.0 / HALF_FOV) * RAY_MAGNITUDE,
        );

        // The camera position is added to the direction as well as used
        // as the origin; rendered images depend on this.
        let direction = self.basis * local + self.origin;
        Ray::new(self.origin, direction)
    }

    /// Film-plane position for a sample. Sample 0 is never jittered.
    pub fn sample_position(&self, x: u32, y: u32, sample: u32) -> DVec2 {
        let mut pos = DVec2::new(
            (x as f64 / self.width) - 0.5,
            -((y as f64 / self.height) - VERTICAL_OFFSET) / self.aspect,
        );

        if sample != 0 {
            let jitter = self.jitter.offset(x, y, sample);
            pos.x += jitter.x * self.jitter_scale;
            pos.y += jitter.y * self.jitter_scale / self.aspect;
        }

        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sampler(camera: Camera, width: u32, height: u32) -> RaySampler {
        let config = RenderConfig::new(width, height);
        RaySampler::new(&camera, &config, JitterTables::from_seed(0))
    }

    fn looking_down_z() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO, 45.0)
    }

    #[test]
    fn test_basis_for_axis_aligned_camera() {
        let s = sampler(looking_down_z(), 100, 100);
        assert_eq!(s.basis.x_axis, Vec3::X);
        assert_eq!(s.basis.y_axis, Vec3::Y);
        assert_eq!(s.basis.z_axis, Vec3::Z);
    }

    #[test]
    fn test_sample_position_framing() {
        let s = sampler(looking_down_z(), 100, 100);

        let corner = s.sample_position(0, 0, 0);
        assert_eq!(corner.x, -0.5);
        assert!((corner.y - 0.65).abs() < 1e-12);

        // Row 65 sits on the horizon, not row 50
        let horizon = s.sample_position(50, 65, 0);
        assert_eq!(horizon.x, 0.0);
        assert!(horizon.y.abs() < 1e-12);
    }

    #[test]
    fn test_aspect_correction() {
        let s = sampler(looking_down_z(), 200, 100);
        assert_eq!(s.aspect, RenderConfig::new(200, 100).aspect());

        let top = s.sample_position(0, 0, 0);
        assert!((top.y - 0.65 / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_primary_ray() {
        let s = sampler(looking_down_z(), 100, 100);
        let ray = s.primary_ray(50, 65, 0);

        assert_eq!(ray.origin, Vec3::new(0.0, 0.0, -5.0));
        assert!(ray.direction.x.abs() < 1e-9);
        assert!(ray.direction.y.abs() < 1e-9);
        let expected_z = RAY_MAGNITUDE / HALF_FOV - 5.0;
        assert!((ray.direction.z - expected_z).abs() < 1e-9);
    }

    #[test]
    fn test_jitter_only_for_nonzero_samples() {
        let s = sampler(looking_down_z(), 64, 48);
        let base = s.sample_position(10, 10, 0);

        let jittered = s.sample_position(10, 10, 3);
        let spread = JITTER_SPREAD / 64.0;
        assert!((jittered.x - base.x).abs() <= 0.5 * spread + 1e-12);
        assert!((jittered.y - base.y).abs() <= 0.5 * spread + 1e-12);

        assert_eq!(s.primary_ray(10, 10, 0), s.primary_ray(10, 10, 0));
    }

    #[test]
    fn test_camera_parallel_to_world_up_is_degenerate() {
        let straight_up = Camera::new(Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0), 45.0);
        let s = sampler(straight_up, 10, 10);

        // right = up × forward vanishes, collapsing the basis
        assert_eq!(s.basis.x_axis, Vec3::ZERO);
        assert_eq!(s.basis.y_axis, Vec3::ZERO);
    }
}
