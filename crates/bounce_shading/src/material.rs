//! Material description consumed by the scatter kernels.

use bounce_math::{mean_intensity, Color};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by [`Material::validate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterialError {
    #[error("Non-finite value in {field}")]
    NonFinite { field: &'static str },

    #[error("Negative component in {field}")]
    NegativeComponent { field: &'static str },
}

pub type MaterialResult<T> = Result<T, MaterialError>;

/// Specular lobe parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecularProperties {
    /// Specular tint
    pub color: Color,

    /// Lobe sharpness. 0 means perfect mirror.
    pub exponent: f32,
}

/// A simple reflective/diffuse surface material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Diffuse albedo
    pub color: Color,

    /// Whether the specular lobe is active at all
    pub has_reflective: bool,

    pub specular: SpecularProperties,
}

/// Which scattering branch a material takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    Diffuse,
    Mirror,
    Glossy,
}

impl Default for Material {
    fn default() -> Self {
        Self::diffuse(Color::new(0.5, 0.5, 0.5)) // Grey default
    }
}

impl Material {
    /// Create a purely diffuse material.
    pub fn diffuse(color: Color) -> Self {
        Self {
            color,
            has_reflective: false,
            specular: SpecularProperties::default(),
        }
    }

    /// Create a perfect mirror tinted by `specular_color`.
    pub fn mirror(specular_color: Color) -> Self {
        Self {
            color: Color::ZERO,
            has_reflective: true,
            specular: SpecularProperties {
                color: specular_color,
                exponent: 0.0,
            },
        }
    }

    /// Create a glossy material mixing a diffuse albedo with a specular lobe.
    ///
    /// An `exponent` of exactly 0 degenerates to [`MaterialKind::Mirror`].
    pub fn glossy(color: Color, specular_color: Color, exponent: f32) -> Self {
        Self {
            color,
            has_reflective: true,
            specular: SpecularProperties {
                color: specular_color,
                exponent,
            },
        }
    }

    /// Classify the material into the branch the scatterer will take.
    #[inline]
    pub fn kind(&self) -> MaterialKind {
        if !self.has_reflective {
            MaterialKind::Diffuse
        } else if self.specular.exponent == 0.0 {
            MaterialKind::Mirror
        } else {
            MaterialKind::Glossy
        }
    }

    /// Probability of taking the specular and diffuse lobes, split by the
    /// mean intensity of each color.
    ///
    /// Both are NaN when the two colors are black.
    pub fn lobe_probabilities(&self) -> (f32, f32) {
        let specular_intensity = mean_intensity(self.specular.color);
        let diffuse_intensity = mean_intensity(self.color);
        let total = specular_intensity + diffuse_intensity;
        (specular_intensity / total, diffuse_intensity / total)
    }

    /// Check that every value is finite and no color channel is negative.
    ///
    /// The scatter kernels never call this; it is meant for material
    /// loading, where bad input can still be reported.
    pub fn validate(&self) -> MaterialResult<()> {
        check_color("color", self.color)?;
        check_color("specular.color", self.specular.color)?;
        if !self.specular.exponent.is_finite() {
            return Err(MaterialError::NonFinite {
                field: "specular.exponent",
            });
        }
        Ok(())
    }
}

fn check_color(field: &'static str, c: Color) -> MaterialResult<()> {
    if !c.is_finite() {
        return Err(MaterialError::NonFinite { field });
    }
    if c.min_element() < 0.0 {
        return Err(MaterialError::NegativeComponent { field });
    }
    Ok(())
}
