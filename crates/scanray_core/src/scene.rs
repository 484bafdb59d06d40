//! Scene model for scanray.
//!
//! A `Scene` is built once by the loader and is read-only afterwards.
//! Worker threads share it by plain reference.

use scanray_math::{Color, Vec3};

/// Maximum number of point lights a scene can hold.
pub const MAX_LIGHTS: usize = 16;

/// Surface description for a sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// Base color (RGB, nominally 0-1 but not clamped)
    pub color: Color,

    /// Phong specular exponent (0 disables the specular term)
    pub specular_power: f64,

    /// Reflection coefficient in [0, 1] (0 disables reflection rays)
    pub reflectivity: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::ONE,
            specular_power: 0.0,
            reflectivity: 0.0,
        }
    }
}

impl Material {
    /// Create a new material.
    pub fn new(color: Color, specular_power: f64, reflectivity: f64) -> Self {
        Self {
            color,
            specular_power,
            reflectivity,
        }
    }

    /// Create a purely diffuse material.
    pub fn diffuse(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }
}

/// A sphere primitive. The radius is expected to be positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f64,
    pub material: Material,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f64, material: Material) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }
}

/// A point light. Lights have no color or falloff.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub position: Vec3,
}

impl Light {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }
}

/// Pinhole camera placement.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Camera {
    /// Eye position
    pub position: Vec3,

    /// Look-at point
    pub target: Vec3,

    /// Field of view as written in the scene file.
    ///
    /// Stored for completeness; ray generation uses a fixed field of view.
    pub fov: f64,
}

impl Camera {
    /// Create a new camera.
    pub fn new(position: Vec3, target: Vec3, fov: f64) -> Self {
        Self {
            position,
            target,
            fov,
        }
    }
}

/// A complete scene: spheres, point lights, and a camera.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// Spheres in load order
    spheres: Vec<Sphere>,

    /// Point lights in load order, at most `MAX_LIGHTS`
    lights: Vec<Light>,

    /// Camera, if the scene defined one
    camera: Option<Camera>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sphere to the scene.
    pub fn add_sphere(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
    }

    /// Add a light to the scene.
    ///
    /// Returns the light back if the scene already holds `MAX_LIGHTS`.
    pub fn add_light(&mut self, light: Light) -> Result<(), Light> {
        if self.lights.len() >= MAX_LIGHTS {
            return Err(light);
        }
        self.lights.push(light);
        Ok(())
    }

    /// Set the camera. A later call replaces an earlier one.
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = Some(camera);
    }

    /// Builder-style `add_sphere`.
    pub fn with_sphere(mut self, sphere: Sphere) -> Self {
        self.add_sphere(sphere);
        self
    }

    /// Builder-style `set_camera`.
    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.set_camera(camera);
        self
    }

    /// Spheres in load order.
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// Spheres in intersection order: most recently loaded first.
    ///
    /// Nearest-hit ties go to the first sphere yielded here, so this order
    /// is observable in the rendered image.
    pub fn traversal(&self) -> impl Iterator<Item = &Sphere> + '_ {
        self.spheres.iter().rev()
    }

    /// Point lights in load order.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// The scene camera, or an all-zero camera if none was defined.
    pub fn camera(&self) -> Camera {
        self.camera.unwrap_or_default()
    }

    /// Whether the scene defined a camera.
    pub fn has_camera(&self) -> bool {
        self.camera.is_some()
    }

    /// Get sphere count.
    pub fn sphere_count(&self) -> usize {
        self.spheres.len()
    }

    /// Get light count.
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_sphere(x: f64) -> Sphere {
        Sphere::new(Vec3::new(x, 0.0, 0.0), 1.0, Material::default())
    }

    #[test]
    fn test_scene_creation() {
        let mut scene = Scene::new();
        scene.add_sphere(unit_sphere(0.0));
        scene.add_sphere(unit_sphere(2.0));
        scene.add_light(Light::new(Vec3::Y)).unwrap();

        assert_eq!(scene.sphere_count(), 2);
        assert_eq!(scene.light_count(), 1);
        assert!(!scene.has_camera());
        assert_eq!(scene.camera(), Camera::default());
    }

    #[test]
    fn test_traversal_is_reverse_load_order() {
        let scene = Scene::new()
            .with_sphere(unit_sphere(0.0))
            .with_sphere(unit_sphere(1.0))
            .with_sphere(unit_sphere(2.0));

        let xs: Vec<f64> = scene.traversal().map(|s| s.center.x).collect();
        assert_eq!(xs, vec![2.0, 1.0, 0.0]);

        let loaded: Vec<f64> = scene.spheres().iter().map(|s| s.center.x).collect();
        assert_eq!(loaded, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_light_capacity() {
        let mut scene = Scene::new();
        for i in 0..MAX_LIGHTS {
            assert!(scene.add_light(Light::new(Vec3::splat(i as f64))).is_ok());
        }

        let extra = Light::new(Vec3::ONE * 100.0);
        assert_eq!(scene.add_light(extra), Err(extra));
        assert_eq!(scene.light_count(), MAX_LIGHTS);
    }

    #[test]
    fn test_camera_replaced() {
        let scene = Scene::new()
            .with_camera(Camera::new(Vec3::ZERO, Vec3::Z, 45.0))
            .with_camera(Camera::new(Vec3::X, Vec3::Z, 30.0));

        assert!(scene.has_camera());
        assert_eq!(scene.camera().position, Vec3::X);
        assert_eq!(scene.camera().fov, 30.0);
    }
}
