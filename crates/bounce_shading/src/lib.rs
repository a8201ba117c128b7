//! Bounce shading kernels.
//!
//! The two routines a path tracer calls once per bounce per path after an
//! intersection:
//!
//! - [`sample_cosine_hemisphere`]: cosine-weighted diffuse bounce directions
//! - [`MaterialScatterer::scatter`]: update a path's ray and throughput from a
//!   [`Material`]
//!
//! Intersection, the integrator loop and termination live elsewhere. The
//! kernels hold no global state; every call only touches the ray, weight and
//! random stream it is given, so independent paths can run concurrently.
//! [`scatter_batch`] does exactly that with rayon.
//!
//! # Example
//!
//! ```
//! use bounce_shading::{Material, MaterialScatterer, Ray, Color, Vec3};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::SmallRng::seed_from_u64(1);
//! let mut ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
//! let mut weight = Color::ONE;
//!
//! let material = Material::diffuse(Color::splat(0.5));
//! MaterialScatterer::default().scatter(&mut ray, &mut weight, Vec3::ZERO, Vec3::Y, &material, &mut rng);
//!
//! assert_eq!(weight, Color::splat(0.5));
//! assert!(ray.direction.dot(Vec3::Y) >= 0.0);
//! ```

mod batch;
mod config;
mod hemisphere;
mod material;
mod rng;
mod scatter;

pub use batch::{scatter_batch, BatchError, BatchResult, BatchStats, PathState, SurfaceHit};
pub use config::{ConfigError, ConfigResult, ShadingConfig};
pub use hemisphere::{orthonormal_basis, sample_cosine_hemisphere};
pub use material::{Material, MaterialError, MaterialKind, MaterialResult, SpecularProperties};
pub use rng::{path_rng, SequenceRng};
pub use scatter::{scatter_ray, MaterialScatterer, ScatterMode};

/// Re-export Vec3 and common math types from bounce_math
pub use bounce_math::{reflect, Color, Ray, Vec3, EPSILON, PI, SQRT_OF_ONE_THIRD, TWO_PI};
