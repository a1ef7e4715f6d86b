//! # Engine Errors
//!
//! Error type shared by the configuration layer and engine startup.
//!
//! Runtime operations on the voxel grid never fail: out-of-range reads return
//! `None`, out-of-range writes are ignored and collision resolution always
//! produces a position. Only startup can fail, which is what this module covers.

use std::path::PathBuf;

use crate::engine_state::voxels::block::{block_side::BlockSide, block_type::BlockType};

/// Result alias used by fallible engine entry points.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced while loading configuration or starting the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Invalid value {value:?} for environment variable {name}")]
    InvalidEnvOverride { name: &'static str, value: String },

    #[error("Render distance {0} is outside the supported range 1..=32")]
    InvalidRenderDistance(i32),

    #[error("Block atlas has no tile for {block_type:?} on side {side:?}")]
    MissingAtlasTile {
        block_type: BlockType,
        side: BlockSide,
    },

    #[error("Atlas tile ({column}, {row}) is outside a {tiles_per_row}x{tiles_per_row} atlas")]
    AtlasTileOutOfBounds {
        column: u8,
        row: u8,
        tiles_per_row: u8,
    },
}
