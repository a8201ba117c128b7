//! Math types shared by the bounce shading kernels.
//!
//! Re-exports `glam` and adds the handful of constants and helpers that
//! every reimplementation of the scatter kernels must agree on.

// Re-export glam for convenience
pub use glam::*;

mod ray;
pub use ray::Ray;

/// Color type alias (linear RGB, typically 0-1 per channel)
pub type Color = Vec3;

/// Offset applied along the normal when spawning a secondary ray, so the
/// new ray does not immediately re-hit the surface it left.
pub const EPSILON: f32 = 0.00001;

pub const PI: f32 = std::f32::consts::PI;

pub const TWO_PI: f32 = std::f32::consts::TAU;

/// `sqrt(1/3)`: threshold used to pick a helper axis that is never parallel
/// to a unit normal (at least one component of a unit vector is below it,
/// unless all three equal it exactly).
pub const SQRT_OF_ONE_THIRD: f32 = 0.577_350_27;

/// Reflect `v` about the normal `n`.
///
/// `v - 2 * dot(v, n) * n`. `n` is expected to be unit length.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Arithmetic mean of the three channels.
#[inline]
pub fn mean_intensity(c: Color) -> f32 {
    (c.x + c.y + c.z) / 3.0
}
