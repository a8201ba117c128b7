//! Furnace test for the scatter kernels.
//!
//! Traces paths bouncing around the inside of a unit sphere made of a single
//! material and reports the mean throughput after each bounce, in both
//! scatter modes. A white diffuse sphere should keep every weight at 1.
//!
//! Usage: `cargo run --example furnace [config.json]`
//! Set `RUST_LOG=debug` to see per-bounce batch statistics.

use anyhow::{Context, Result};
use bounce_shading::{
    scatter_batch, Color, Material, MaterialScatterer, PathState, Ray, ScatterMode,
    ShadingConfig, SurfaceHit, Vec3,
};

const PATHS: usize = 100_000;
const BOUNCES: u32 = 6;

fn main() -> Result<()> {
    env_logger::init();

    let mut config = match std::env::args().nth(1) {
        Some(path) => ShadingConfig::from_path(&path)
            .with_context(|| format!("Failed to load shading config {path}"))?,
        None => default_config(),
    };
    if config.materials.is_empty() {
        log::warn!("Config has no materials, using the default set");
        config.materials = default_config().materials;
    }

    println!("Bounce Furnace Test");
    println!("===================");
    println!("{} paths, {} bounces, seed {}", PATHS, BOUNCES, config.seed);

    for (index, material) in config.materials.iter().enumerate() {
        println!();
        println!("Material {index}: {:?}", material.kind());
        for mode in [ScatterMode::Compat, ScatterMode::Corrected] {
            let start = std::time::Instant::now();
            let mean = run_furnace(&MaterialScatterer::new(mode), material, config.seed)?;
            println!(
                "  {:<10} mean weight ({:.4}, {:.4}, {:.4})  ({:?})",
                format!("{mode:?}"),
                mean.x,
                mean.y,
                mean.z,
                start.elapsed()
            );
        }
    }

    Ok(())
}

fn default_config() -> ShadingConfig {
    ShadingConfig {
        seed: 2024,
        materials: vec![
            Material::diffuse(Color::ONE),
            Material::diffuse(Color::new(0.8, 0.5, 0.2)),
            Material::mirror(Color::splat(0.9)),
            Material::glossy(Color::splat(0.3), Color::splat(0.6), 40.0),
        ],
        ..Default::default()
    }
}

/// Bounce every path off the inside of the unit sphere `BOUNCES` times and
/// return the mean weight over the paths that stayed finite.
fn run_furnace(scatterer: &MaterialScatterer, material: &Material, seed: u64) -> Result<Color> {
    let materials = [*material];
    let mut paths = vec![PathState::new(Ray::new(Vec3::ZERO, Vec3::Y)); PATHS];

    for bounce in 0..BOUNCES {
        let hits: Vec<SurfaceHit> = paths.iter().map(|p| hit_unit_sphere(&p.ray)).collect();
        scatter_batch(scatterer, &mut paths, &hits, &materials, seed, bounce)
            .context("Scatter failed")?;
    }

    let finite: Vec<&PathState> = paths.iter().filter(|p| p.is_finite()).collect();
    if finite.len() < paths.len() {
        println!("  {} of {} paths went non-finite", paths.len() - finite.len(), paths.len());
    }
    if finite.is_empty() {
        return Ok(Color::splat(f32::NAN));
    }
    let sum: Color = finite.iter().map(|p| p.weight).sum();
    Ok(sum / finite.len() as f32)
}

/// Intersect a ray starting inside the unit sphere with the sphere wall.
/// The normal faces inward, towards the ray's origin.
fn hit_unit_sphere(ray: &Ray) -> SurfaceHit {
    let d = ray.direction.normalize();
    let b = ray.origin.dot(d);
    let c = ray.origin.length_squared() - 1.0;
    let t = -b + (b * b - c).max(0.0).sqrt();
    let point = ray.origin + d * t;

    SurfaceHit {
        point,
        normal: -point.normalize(),
        material: 0,
    }
}
