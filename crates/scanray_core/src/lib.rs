//! scanray core - scene model and scene-description loading.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Sphere`, `Material`, `Light`, `Camera`
//! - **Loading**: the line-oriented scene text format
//!
//! # Example
//!
//! ```
//! use scanray_core::parse_scene;
//!
//! let scene = parse_scene("l 0 10 0\ns 0 0 0 1 1 1 1 0 0\n").unwrap();
//! assert_eq!(scene.sphere_count(), 1);
//! assert_eq!(scene.light_count(), 1);
//! ```

pub mod loader;
pub mod scene;

// Re-export commonly used types
pub use loader::{load_scene, load_scene_file, parse_scene, SceneError, SceneResult};
pub use scene::{Camera, Light, Material, Scene, Sphere, MAX_LIGHTS};
