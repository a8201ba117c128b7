#![allow(dead_code)]

use bounce_shading::{Color, Material, MaterialScatterer, Ray, ScatterMode, SequenceRng, Vec3};

pub type Rng = rand::rngs::SmallRng;

pub const TOLERANCE: f32 = 1e-5;

/// Install the test logger once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn assert_vec_near(actual: Vec3, expected: Vec3) {
    assert!(
        (actual - expected).length() < TOLERANCE,
        "{actual} != {expected}"
    );
}

/// Result of a single scatter call driven by a fixed uniform sequence.
pub struct Scattered {
    pub ray: Ray,
    pub weight: Color,
    pub draws: usize,
}

pub fn scatter_fixed(
    mode: ScatterMode,
    material: &Material,
    hit_point: Vec3,
    normal: Vec3,
    weight: Color,
    uniforms: Vec<f32>,
) -> Scattered {
    let mut ray = Ray::new(Vec3::new(0.0, 3.0, 1.0), Vec3::new(0.0, -1.0, 0.0));
    let mut weight = weight;
    let mut rng = SequenceRng::new(uniforms);
    MaterialScatterer::new(mode).scatter(&mut ray, &mut weight, hit_point, normal, material, &mut rng);
    Scattered {
        ray,
        weight,
        draws: rng.draws(),
    }
}
