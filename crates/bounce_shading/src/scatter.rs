//! Material scattering.
//!
//! Updates a path's ray and throughput weight in place after a surface hit.
//! Three branches exist, picked from the material once per call:
//!
//! - diffuse: cosine-weighted bounce, weight scaled by the albedo
//! - mirror: reflection, weight scaled by the specular color
//! - glossy: a Phong-style lobe, weight scaled by whichever of
//!   the specular/diffuse colors wins, divided by its probability
//!
//! [`ScatterMode::Compat`] reproduces the legacy kernel exactly, including
//! its known quirks. [`ScatterMode::Corrected`] reflects the incoming
//! direction, orients the glossy lobe around the normal and picks the lobe
//! stochastically.

use bounce_math::{reflect, Color, Ray, Vec3, EPSILON, TWO_PI};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::hemisphere::{orthonormal_basis, sample_cosine_hemisphere};
use crate::material::{Material, MaterialKind};

/// Selects between the legacy and the corrected scattering formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScatterMode {
    /// Legacy behavior, bit for bit:
    /// mirrors reflect the hit position instead of the ray direction,
    /// the glossy lobe uses `acos(1 / xi^(n+1))` in world axes (NaN for
    /// almost every draw), and the lobe is picked by `max` instead of at
    /// random.
    #[default]
    Compat,
    Corrected,
}

/// Scatters rays off [`Material`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScatterer {
    mode: ScatterMode,
}

impl MaterialScatterer {
    pub fn new(mode: ScatterMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ScatterMode {
        self.mode
    }

    /// Scatter `ray` off `material` at `hit_point`.
    ///
    /// The new origin is `hit_point` pushed along `normal` by [`EPSILON`].
    /// `weight` is multiplied component-wise by the branch's color factor.
    ///
    /// Uniforms drawn from `rng`:
    ///
    /// | branch  | compat | corrected |
    /// |---------|--------|-----------|
    /// | diffuse | 2      | 2         |
    /// | mirror  | 0      | 0         |
    /// | glossy  | 2      | 3         |
    ///
    /// Nothing is validated. A zero normal, a zero draw in the glossy lobe,
    /// or a material whose colors are both black all produce NaN, which is
    /// left in `ray`/`weight` for the caller to see.
    pub fn scatter(
        &self,
        ray: &mut Ray,
        weight: &mut Color,
        hit_point: Vec3,
        normal: Vec3,
        material: &Material,
        rng: &mut dyn RngCore,
    ) {
        ray.origin = hit_point + normal * EPSILON;

        match (material.kind(), self.mode) {
            (MaterialKind::Diffuse, _) => {
                ray.direction = sample_cosine_hemisphere(normal, rng);
                *weight *= material.color;
            }
            (MaterialKind::Mirror, ScatterMode::Compat) => {
                ray.direction = reflect(hit_point, normal);
                *weight *= material.specular.color;
            }
            (MaterialKind::Mirror, ScatterMode::Corrected) => {
                ray.direction = reflect(ray.direction, normal);
                *weight *= material.specular.color;
            }
            (MaterialKind::Glossy, ScatterMode::Compat) => {
                scatter_glossy_compat(ray, weight, material, rng);
            }
            (MaterialKind::Glossy, ScatterMode::Corrected) => {
                scatter_glossy_corrected(ray, weight, normal, material, rng);
            }
        }
    }
}

/// Scatter with the legacy kernel ([`ScatterMode::Compat`]).
pub fn scatter_ray(
    ray: &mut Ray,
    weight: &mut Color,
    hit_point: Vec3,
    normal: Vec3,
    material: &Material,
    rng: &mut dyn RngCore,
) {
    MaterialScatterer::new(ScatterMode::Compat).scatter(ray, weight, hit_point, normal, material, rng);
}

fn scatter_glossy_compat(
    ray: &mut Ray,
    weight: &mut Color,
    material: &Material,
    rng: &mut dyn RngCore,
) {
    let xi1: f32 = rng.gen();
    let xi2: f32 = rng.gen();

    let theta = (1.0 / xi1.powf(material.specular.exponent + 1.0)).acos();
    let phi = TWO_PI * xi2;
    ray.direction = spherical_direction(theta, phi).normalize();

    let (p_specular, p_diffuse) = material.lobe_probabilities();
    if p_specular >= p_diffuse {
        *weight *= material.specular.color * (1.0 / p_specular);
    } else {
        *weight *= material.color * (1.0 / p_diffuse);
    }
}

fn scatter_glossy_corrected(
    ray: &mut Ray,
    weight: &mut Color,
    normal: Vec3,
    material: &Material,
    rng: &mut dyn RngCore,
) {
    let (p_specular, p_diffuse) = material.lobe_probabilities();
    let xi_lobe: f32 = rng.gen();

    // NaN probabilities fall through to the diffuse lobe and poison the weight
    if xi_lobe < p_specular {
        let xi1: f32 = rng.gen();
        let xi2: f32 = rng.gen();

        // Phong lobe: cos(theta) = xi^(1/(n+1))
        let theta = xi1.powf(1.0 / (material.specular.exponent + 1.0)).acos();
        let phi = TWO_PI * xi2;
        let local = spherical_direction(theta, phi);

        let (perp1, perp2) = orthonormal_basis(normal);
        ray.direction = (local.x * perp1 + local.y * perp2 + local.z * normal).normalize();
        *weight *= material.specular.color * (1.0 / p_specular);
    } else {
        ray.direction = sample_cosine_hemisphere(normal, rng);
        *weight *= material.color * (1.0 / p_diffuse);
    }
}

#[inline]
fn spherical_direction(theta: f32, phi: f32) -> Vec3 {
    Vec3::new(phi.cos() * theta.sin(), phi.sin() * theta.sin(), theta.cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequenceRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_vec_near(a: Vec3, b: Vec3, tol: f32) {
        assert!((a - b).length() < tol, "{a} != {b}");
    }

    fn scatter_with(
        mode: ScatterMode,
        material: &Material,
        hit_point: Vec3,
        normal: Vec3,
        uniforms: Vec<f32>,
    ) -> (Ray, Color, usize) {
        let mut ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::new(1.0, -1.0, 0.0).normalize());
        let mut weight = Color::new(1.0, 0.5, 2.0);
        let mut rng = SequenceRng::new(uniforms);
        MaterialScatterer::new(mode).scatter(&mut ray, &mut weight, hit_point, normal, material, &mut rng);
        (ray, weight, rng.draws())
    }

    #[test]
    fn test_default_mode_is_compat() {
        assert_eq!(MaterialScatterer::default().mode(), ScatterMode::Compat);
    }

    #[test]
    fn test_diffuse_branch() {
        let mat = Material::diffuse(Color::new(0.5, 0.25, 1.0));
        let hit = Vec3::new(2.0, 0.0, 3.0);
        let (ray, weight, draws) = scatter_with(ScatterMode::Compat, &mat, hit, Vec3::Z, vec![0.25, 0.5]);

        assert_eq!(draws, 2);
        assert_eq!(ray.origin, hit + Vec3::Z * EPSILON);
        assert_eq!(weight, Color::new(0.5, 0.125, 2.0));

        // Same direction as the sampler on the same uniforms
        let mut rng = SequenceRng::new(vec![0.25, 0.5]);
        assert_eq!(ray.direction, sample_cosine_hemisphere(Vec3::Z, &mut rng));
    }

    #[test]
    fn test_diffuse_is_mode_independent() {
        let mat = Material::diffuse(Color::splat(0.7));
        let a = scatter_with(ScatterMode::Compat, &mat, Vec3::ONE, Vec3::Y, vec![0.375, 0.625]);
        let b = scatter_with(ScatterMode::Corrected, &mat, Vec3::ONE, Vec3::Y, vec![0.375, 0.625]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_mirror_reflects_position() {
        let mat = Material::mirror(Color::new(0.9, 0.8, 0.7));
        let hit = Vec3::new(1.0, 1.0, 0.0);
        let (ray, weight, draws) = scatter_with(ScatterMode::Compat, &mat, hit, Vec3::Y, vec![0.5]);

        assert_eq!(draws, 0);
        assert_eq!(ray.origin, Vec3::new(1.0, 1.0 + EPSILON, 0.0));
        assert_eq!(ray.direction, reflect(hit, Vec3::Y));
        assert_eq!(ray.direction, Vec3::new(1.0, -1.0, 0.0));
        assert_vec_near(weight, Color::new(0.9, 0.4, 1.4), 1e-6);
    }

    #[test]
    fn test_mirror_corrected_reflects_direction() {
        let mat = Material::mirror(Color::ONE);
        let hit = Vec3::new(5.0, 0.0, 0.0);
        let (ray, weight, draws) = scatter_with(ScatterMode::Corrected, &mat, hit, Vec3::Y, vec![0.5]);

        assert_eq!(draws, 0);
        assert_vec_near(ray.direction, Vec3::new(1.0, 1.0, 0.0).normalize(), 1e-6);
        assert_eq!(weight, Color::new(1.0, 0.5, 2.0));
    }

    #[test]
    fn test_glossy_compat_direction_is_nan() {
        let mat = Material::glossy(Color::splat(0.2), Color::splat(0.6), 10.0);
        let hit = Vec3::new(0.0, 2.0, 0.0);
        let (ray, _, draws) = scatter_with(ScatterMode::Compat, &mat, hit, Vec3::Y, vec![0.5, 0.25]);

        assert_eq!(draws, 2);
        assert!(ray.direction.is_nan());
        assert_eq!(ray.origin, hit + Vec3::Y * EPSILON);
    }

    #[test]
    fn test_glossy_compat_zero_draw_is_nan() {
        let mat = Material::glossy(Color::splat(0.2), Color::splat(0.6), 3.0);
        let (ray, _, _) = scatter_with(ScatterMode::Compat, &mat, Vec3::ZERO, Vec3::Y, vec![0.0, 0.0]);
        assert!(ray.direction.is_nan());
    }

    #[test]
    fn test_glossy_compat_lobe_ignores_normal() {
        // exponent -1 makes xi^(n+1) == 1, so theta == 0 and the lobe points
        // straight down +Z even though the normal is +Y.
        let mat = Material::glossy(Color::splat(0.2), Color::splat(0.6), -1.0);
        let (ray, _, _) = scatter_with(ScatterMode::Compat, &mat, Vec3::ZERO, Vec3::Y, vec![0.5, 0.25]);
        assert_eq!(ray.direction, Vec3::Z);
    }

    #[test]
    fn test_glossy_compat_specular_wins() {
        let mat = Material::glossy(Color::splat(0.2), Color::splat(0.6), 10.0);
        let (_, weight, _) = scatter_with(ScatterMode::Compat, &mat, Vec3::ZERO, Vec3::Y, vec![0.5, 0.5]);
        // (1, 0.5, 2) * 0.6 / 0.75
        assert_vec_near(weight, Color::new(0.8, 0.4, 1.6), 1e-5);
    }

    #[test]
    fn test_glossy_compat_diffuse_wins() {
        let mat = Material::glossy(Color::new(0.9, 0.6, 0.3), Color::new(0.1, 0.2, 0.3), 10.0);
        let (_, weight, _) = scatter_with(ScatterMode::Compat, &mat, Vec3::ZERO, Vec3::Y, vec![0.5, 0.5]);
        // p_diffuse = 0.6 / 0.8
        let expected = Color::new(1.0, 0.5, 2.0) * Color::new(0.9, 0.6, 0.3) / 0.75;
        assert_vec_near(weight, expected, 1e-5);
    }

    #[test]
    fn test_glossy_compat_tie_picks_specular() {
        let mat = Material::glossy(Color::new(0.5, 0.0, 0.0), Color::new(0.0, 0.5, 0.0), 10.0);
        let (_, weight, _) = scatter_with(ScatterMode::Compat, &mat, Vec3::ZERO, Vec3::Y, vec![0.5, 0.5]);
        // specular color * 2
        assert_vec_near(weight, Color::new(0.0, 0.5, 0.0), 1e-6);
    }

    #[test]
    fn test_glossy_black_material_is_nan() {
        let mat = Material::glossy(Color::ZERO, Color::ZERO, 10.0);
        for mode in [ScatterMode::Compat, ScatterMode::Corrected] {
            let (_, weight, _) = scatter_with(mode, &mat, Vec3::ZERO, Vec3::Y, vec![0.5, 0.5, 0.5]);
            assert!(weight.is_nan(), "{mode:?}");
        }
    }

    #[test]
    fn test_glossy_corrected_specular_lobe() {
        let exponent = 3.0;
        let mat = Material::glossy(Color::splat(0.2), Color::splat(0.6), exponent);
        let (ray, weight, draws) =
            scatter_with(ScatterMode::Corrected, &mat, Vec3::ZERO, Vec3::Z, vec![0.5, 0.25, 0.5]);

        assert_eq!(draws, 3);
        assert!((ray.direction.length() - 1.0).abs() < 1e-5);
        let cos_theta = 0.25f32.powf(1.0 / (exponent + 1.0));
        assert!((ray.direction.dot(Vec3::Z) - cos_theta).abs() < 1e-5);
        assert_vec_near(weight, Color::new(0.8, 0.4, 1.6), 1e-5);
    }

    #[test]
    fn test_glossy_corrected_diffuse_lobe() {
        let mat = Material::glossy(Color::splat(0.2), Color::splat(0.6), 3.0);
        let (ray, weight, draws) =
            scatter_with(ScatterMode::Corrected, &mat, Vec3::ZERO, Vec3::Z, vec![0.875, 0.25, 0.5]);

        assert_eq!(draws, 3);
        let mut rng = SequenceRng::new(vec![0.25, 0.5]);
        assert_eq!(ray.direction, sample_cosine_hemisphere(Vec3::Z, &mut rng));
        // (1, 0.5, 2) * 0.2 / 0.25
        assert_vec_near(weight, Color::new(0.8, 0.4, 1.6), 1e-5);
    }

    #[test]
    fn test_glossy_corrected_stays_in_hemisphere() {
        let mat = Material::glossy(Color::splat(0.5), Color::splat(0.5), 50.0);
        let scatterer = MaterialScatterer::new(ScatterMode::Corrected);
        let mut rng = StdRng::seed_from_u64(7);
        let normal = Vec3::new(0.3, -0.8, 0.5).normalize();

        for _ in 0..5000 {
            let mut ray = Ray::default();
            let mut weight = Color::ONE;
            scatterer.scatter(&mut ray, &mut weight, Vec3::ZERO, normal, &mat, &mut rng);
            assert!(ray.is_finite());
            assert!((ray.direction.length() - 1.0).abs() < 1e-5);
            assert!(ray.direction.dot(normal) >= -1e-6);
        }
    }

    #[test]
    fn test_scatter_ray_matches_compat() {
        let mat = Material::mirror(Color::splat(0.5));
        let mut ray = Ray::default();
        let mut weight = Color::ONE;
        let mut rng = SequenceRng::new(Vec::new());
        scatter_ray(&mut ray, &mut weight, Vec3::new(1.0, 1.0, 0.0), Vec3::Y, &mat, &mut rng);

        let (expected, expected_weight, _) =
            scatter_with(ScatterMode::Compat, &mat, Vec3::new(1.0, 1.0, 0.0), Vec3::Y, vec![]);
        assert_eq!(ray, expected);
        assert_eq!(weight * Color::new(1.0, 0.5, 2.0), expected_weight);
    }
}
