//! scanray renderer - multithreaded recursive ray tracing.
//!
//! Whitted-style tracing of spheres lit by point lights: Phong direct
//! lighting with hard shadows plus mirror reflection, bounded at a fixed
//! recursion depth. Scanlines are handed out to a fixed pool of worker
//! threads through a single atomic cursor.

mod camera;
mod config;
mod framebuffer;
mod hittable;
mod jitter;
mod scheduler;
mod shader;
mod sphere;

pub use camera::{RaySampler, FIELD_OF_VIEW, VERTICAL_OFFSET};
pub use config::{ConfigError, RenderConfig};
pub use framebuffer::{pack_pixel, unpack_pixel, Framebuffer};
pub use hittable::{Hittable, SurfacePoint, EPSILON};
pub use jitter::{JitterTables, TABLE_SIZE};
pub use scheduler::{
    render, RenderError, RenderJob, RenderResult, RenderStats, ScanlineCursor, StartGate,
    SCANLINE_BLOCK,
};
pub use shader::{render_pixel, shade, trace, MAX_RAY_DEPTH, RAY_MAGNITUDE};

/// Re-export the scene model and math types
pub use scanray_core::{Camera, Light, Material, Scene, Sphere};
pub use scanray_math::{Color, Ray, Vec3};
