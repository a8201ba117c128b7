//! Cosine-weighted hemisphere sampling.

use bounce_math::{Vec3, SQRT_OF_ONE_THIRD, TWO_PI};
use rand::{Rng, RngCore};

/// Sample a direction in the hemisphere around `normal` with density
/// proportional to `cos(theta)` (Lambertian importance sampling).
///
/// `normal` must be unit length; this is not checked. Exactly two uniforms
/// are drawn from `rng`: the polar term first, then the azimuth.
pub fn sample_cosine_hemisphere(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let u1: f32 = rng.gen();
    let u2: f32 = rng.gen();

    let cos_theta = u1.sqrt();
    let sin_theta = (1.0 - u1).sqrt();
    let phi = u2 * TWO_PI;

    let (perp1, perp2) = orthonormal_basis(normal);

    cos_theta * normal + phi.cos() * sin_theta * perp1 + phi.sin() * sin_theta * perp2
}

/// Build two unit vectors perpendicular to `normal` and to each other.
///
/// The helper axis is the first of X, Y, Z whose component in `normal` is
/// below `sqrt(1/3)`, so it can never be parallel to a unit normal.
pub fn orthonormal_basis(normal: Vec3) -> (Vec3, Vec3) {
    let helper = if normal.x.abs() < SQRT_OF_ONE_THIRD {
        Vec3::X
    } else if normal.y.abs() < SQRT_OF_ONE_THIRD {
        Vec3::Y
    } else {
        Vec3::Z
    };

    let perp1 = normal.cross(helper).normalize();
    let perp2 = normal.cross(perp1).normalize();
    (perp1, perp2)
}
