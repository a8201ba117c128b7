//! Parallel scattering of many independent paths.
//!
//! One call scatters every in-flight path against its surface hit for a
//! single bounce. Each path gets its own random stream from
//! [`path_rng`], so the result is the same on any number of threads.

use bounce_math::{Color, Ray, Vec3};
use rayon::prelude::*;
use thiserror::Error;

use crate::material::{Material, MaterialKind};
use crate::rng::path_rng;
use crate::scatter::MaterialScatterer;

/// Errors returned before any path is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error("{paths} paths but {hits} hits")]
    LengthMismatch { paths: usize, hits: usize },

    #[error("Path {path} references material {material}, but only {available} exist")]
    UnknownMaterial {
        path: usize,
        material: usize,
        available: usize,
    },
}

pub type BatchResult<T> = Result<T, BatchError>;

/// One in-flight light path: the ray to trace next and its throughput.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathState {
    pub ray: Ray,
    pub weight: Color,
}

impl PathState {
    /// A fresh path with unit throughput.
    pub fn new(ray: Ray) -> Self {
        Self {
            ray,
            weight: Color::ONE,
        }
    }

    /// Returns true if neither the ray nor the weight carries NaN/Inf.
    pub fn is_finite(&self) -> bool {
        self.ray.is_finite() && self.weight.is_finite()
    }
}

/// Where a path's ray hit the scene, as reported by the intersector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub point: Vec3,
    /// Unit surface normal
    pub normal: Vec3,
    /// Index into the material table
    pub material: usize,
}

/// Per-batch counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub diffuse: usize,
    pub mirror: usize,
    pub glossy: usize,
    /// Paths whose ray or weight is NaN/Inf after scattering
    pub non_finite: usize,
}

impl BatchStats {
    fn record(kind: MaterialKind, finite: bool) -> Self {
        let mut stats = Self::default();
        match kind {
            MaterialKind::Diffuse => stats.diffuse = 1,
            MaterialKind::Mirror => stats.mirror = 1,
            MaterialKind::Glossy => stats.glossy = 1,
        }
        if !finite {
            stats.non_finite = 1;
        }
        stats
    }

    fn merge(self, other: Self) -> Self {
        Self {
            diffuse: self.diffuse + other.diffuse,
            mirror: self.mirror + other.mirror,
            glossy: self.glossy + other.glossy,
            non_finite: self.non_finite + other.non_finite,
        }
    }

    /// Total number of paths scattered.
    pub fn total(&self) -> usize {
        self.diffuse + self.mirror + self.glossy
    }
}

/// Scatter every path in `paths` off the matching entry of `hits`.
///
/// `paths[i]` hit `hits[i]`. The stream for path `i` is
/// `path_rng(seed, i, bounce)`. Inputs are checked up front; on error no
/// path has been modified. NaN/Inf produced by the kernel are kept and
/// counted, not repaired.
pub fn scatter_batch(
    scatterer: &MaterialScatterer,
    paths: &mut [PathState],
    hits: &[SurfaceHit],
    materials: &[Material],
    seed: u64,
    bounce: u32,
) -> BatchResult<BatchStats> {
    if paths.len() != hits.len() {
        return Err(BatchError::LengthMismatch {
            paths: paths.len(),
            hits: hits.len(),
        });
    }
    if let Some((path, hit)) = hits
        .iter()
        .enumerate()
        .find(|(_, hit)| hit.material >= materials.len())
    {
        return Err(BatchError::UnknownMaterial {
            path,
            material: hit.material,
            available: materials.len(),
        });
    }

    let stats = paths
        .par_iter_mut()
        .zip(hits.par_iter())
        .enumerate()
        .map(|(index, (path, hit))| {
            let material = &materials[hit.material];
            let mut rng = path_rng(seed, index as u64, bounce);
            scatterer.scatter(
                &mut path.ray,
                &mut path.weight,
                hit.point,
                hit.normal,
                material,
                &mut rng,
            );
            BatchStats::record(material.kind(), path.is_finite())
        })
        .reduce(BatchStats::default, BatchStats::merge);

    log::debug!(
        "Bounce {}: scattered {} paths ({} diffuse, {} mirror, {} glossy)",
        bounce,
        stats.total(),
        stats.diffuse,
        stats.mirror,
        stats.glossy
    );
    if stats.non_finite > 0 {
        log::warn!(
            "Bounce {}: {} of {} paths carry NaN/Inf",
            bounce,
            stats.non_finite,
            stats.total()
        );
    }

    Ok(stats)
}
