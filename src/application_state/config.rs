//! # Engine Configuration
//!
//! The world seed and render distance are the engine's only external
//! parameters. They come from an optional JSON file, can be overridden by
//! environment variables, and are validated before the engine starts.
//!
//! ```json
//! { "seed": 1337, "render_distance": 6 }
//! ```
//!
//! Missing fields fall back to their defaults.

use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Environment variable overriding the world seed.
pub const SEED_ENV_VAR: &str = "VOXEL_SEED";
/// Environment variable overriding the render distance.
pub const RENDER_DISTANCE_ENV_VAR: &str = "VOXEL_RENDER_DISTANCE";

pub const DEFAULT_RENDER_DISTANCE: i32 = 5;
/// Largest accepted render distance, in chunks.
pub const MAX_RENDER_DISTANCE: i32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for every noise layer and tree placement
    pub seed: u32,
    /// Chebyshev radius of the loaded window, in chunks
    pub render_distance: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            seed: 0,
            render_distance: DEFAULT_RENDER_DISTANCE,
        }
    }
}

impl EngineConfig {
    /// Reads a configuration file.
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| EngineError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&raw)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(raw: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Default configuration with the process environment applied.
    pub fn from_env() -> EngineResult<Self> {
        Self::default().with_env()
    }

    /// Applies `VOXEL_SEED` and `VOXEL_RENDER_DISTANCE` from the process
    /// environment.
    pub fn with_env(self) -> EngineResult<Self> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides looked up by variable name. Unset variables leave the
    /// field alone; unparsable values are an error.
    pub fn with_overrides<F>(mut self, lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(SEED_ENV_VAR) {
            self.seed = parse_override(SEED_ENV_VAR, &value)?;
        }
        if let Some(value) = lookup(RENDER_DISTANCE_ENV_VAR) {
            self.render_distance = parse_override(RENDER_DISTANCE_ENV_VAR, &value)?;
        }
        Ok(self)
    }

    /// Checks that the values are usable.
    pub fn validate(&self) -> EngineResult<()> {
        if !(1..=MAX_RENDER_DISTANCE).contains(&self.render_distance) {
            return Err(EngineError::InvalidRenderDistance(self.render_distance));
        }
        Ok(())
    }
}

fn parse_override<T: std::str::FromStr>(name: &'static str, value: &str) -> EngineResult<T> {
    value.trim().parse().map_err(|_| {
        warn!("Rejected {name}={value:?}");
        EngineError::InvalidEnvOverride {
            name,
            value: value.to_string(),
        }
    })
}
