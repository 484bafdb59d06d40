//! Double-precision geometry kernel for scanray.
//!
//! Built on `glam`'s `f64` types. Every operation here is pure and
//! allocation-free; zero-length vectors are not guarded against and
//! propagate as NaN/Inf.

// Re-export glam for convenience
pub use glam;
pub use glam::{DMat3, DVec2, DVec3};

mod ray;
mod vector;

pub use ray::Ray;
pub use vector::{cross, dot, normalize, reflect};

/// Three-component vector used for positions, directions, and RGB colors.
pub type Vec3 = DVec3;

/// RGB color, unclamped until pixel packing.
pub type Color = DVec3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_is_double_precision() {
        // 0.1 + 0.2 is not representable the same way in f32
        let v = Vec3::new(0.1, 0.2, 0.0);
        assert_eq!(v.x + v.y, 0.1_f64 + 0.2_f64);
        assert_ne!(v.x + v.y, f64::from(0.1_f32 + 0.2_f32));
    }

    #[test]
    fn test_color_is_unclamped() {
        let lit = Color::splat(0.75) + Color::new(0.75, -1.0, 0.25);
        assert_eq!(lit, Color::new(1.5, -0.25, 1.0));
    }

    #[test]
    fn test_colors_and_vectors_mix() {
        // Shading scales colors by geometric terms directly
        let normal: Vec3 = normalize(Vec3::new(0.0, 3.0, 4.0));
        let shade: Color = dot(normal, Vec3::Z) * Color::ONE;
        assert!((shade - Color::splat(0.8)).length() < 1e-12);
    }
}
