//! miniRT math - vector, matrix and camera types for the ray tracer.
//!
//! Vectors and matrices are glam's `Vec2`/`Vec3`/`Vec4`/`Mat4`, re-exported
//! here so every crate in the workspace shares one portable implementation.
//! The few operations glam spells differently live on [`VectorExt`].

// Re-export glam for convenience
pub use glam::*;

mod camera;
mod interval;
mod ray;
mod vector;

pub use camera::Camera;
pub use interval::Interval;
pub use ray::Ray;
pub use vector::VectorExt;

/// Tolerance shared by the intersection tests and the shading cutoffs.
pub const EPSILON: f32 = 1e-5;

/// "Infinitely far" depth value used to clear the depth buffer.
pub const HUGE: f32 = f32::MAX;
