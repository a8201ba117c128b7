//! Shading configuration.
//!
//! A small JSON document selects the scatter mode, the base seed for
//! per-path random streams, and an optional material table:
//!
//! ```json
//! {
//!     "mode": "corrected",
//!     "seed": 7,
//!     "materials": [
//!         { "color": [0.8, 0.8, 0.8] },
//!         { "has_reflective": true, "specular": { "color": [1, 1, 1], "exponent": 0 } }
//!     ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::material::{Material, MaterialError};
use crate::scatter::{MaterialScatterer, ScatterMode};

/// Errors that can occur while loading a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid material {index}: {source}")]
    InvalidMaterial {
        index: usize,
        #[source]
        source: MaterialError,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for the shading stage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    /// Which scatter formulas to use
    pub mode: ScatterMode,

    /// Base seed for per-path random streams
    pub seed: u64,

    /// Material table, indexed by `SurfaceHit::material`
    pub materials: Vec<Material>,
}

impl ShadingConfig {
    /// Parse a configuration from JSON text and validate its materials.
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let config: ShadingConfig = serde_json::from_str(text)?;
        config.validate()?;

        log::debug!(
            "Loaded shading config: mode={:?}, seed={}, {} materials",
            config.mode,
            config.seed,
            config.materials.len()
        );
        Ok(config)
    }

    /// Load a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        log::info!("Loading shading config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate every material in the table.
    pub fn validate(&self) -> ConfigResult<()> {
        for (index, material) in self.materials.iter().enumerate() {
            if let Err(source) = material.validate() {
                log::warn!("Rejecting material {}: {}", index, source);
                return Err(ConfigError::InvalidMaterial { index, source });
            }
        }
        Ok(())
    }

    /// Build a scatterer for the configured mode.
    pub fn scatterer(&self) -> MaterialScatterer {
        MaterialScatterer::new(self.mode)
    }
}
