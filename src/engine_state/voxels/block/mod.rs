//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, block face handling, the block data
//! structure and the registry mapping each block face to a tile in the shared
//! texture atlas.

use block_side::BlockSide;
use block_type::{BlockType, BLOCK_TYPE_COUNT};
use log::debug;

use crate::error::{EngineError, EngineResult};

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// Number of tiles along each edge of the texture atlas.
pub const ATLAS_TILES_PER_ROW: u8 = 16;

/// Maps each solid block type to its atlas tile `(column, row)` for each face.
///
/// The inner array is in `BlockSide` order: [Front, Back, Bottom, Top, Left, Right].
/// AIR has no entry since it is never meshed.
pub static DEFAULT_ATLAS_LAYOUT: [(BlockType, [(u8, u8); 6]); BLOCK_TYPE_COUNT - 1] = [
    (BlockType::GRASS, [(3, 0), (3, 0), (2, 0), (0, 0), (3, 0), (3, 0)]),
    (BlockType::DIRT, [(2, 0); 6]),
    (BlockType::STONE, [(1, 0); 6]),
    (BlockType::BEDROCK, [(1, 1); 6]),
    (BlockType::WATER, [(13, 12); 6]),
    (BlockType::SAND, [(2, 1); 6]),
    (BlockType::WOOD, [(4, 1), (4, 1), (5, 1), (5, 1), (4, 1), (4, 1)]),
    (BlockType::LEAVES, [(5, 3); 6]),
];

/// Represents a single voxel block in the world.
///
/// Blocks only exist for occupied cells; an empty cell is simply `None`.
/// The coordinates are world coordinates, not chunk-local ones.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    /// The type of this block. Never `AIR`.
    pub block_type: BlockType,
    /// World X coordinate
    pub x: i32,
    /// World Y coordinate
    pub y: i32,
    /// World Z coordinate
    pub z: i32,
}

impl Block {
    /// Creates a new block of the specified type at the given world position.
    pub fn new(block_type: BlockType, x: i32, y: i32, z: i32) -> Self {
        Block { block_type, x, y, z }
    }
}

/// A tile position in the texture atlas, in tile units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AtlasTile {
    pub column: u8,
    pub row: u8,
}

/// A rectangle in normalized atlas UV space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UvRect {
    /// Lower corner (u, v)
    pub origin: [f32; 2],
    /// Width and height of the tile in UV units
    pub size: f32,
}

/// Static catalog of block faces and their atlas tiles.
///
/// The registry is only constructible through [`BlockRegistry::new`], which
/// rejects incomplete or out-of-bounds tables, so every lookup made during
/// meshing is infallible.
#[derive(Clone, Debug)]
pub struct BlockRegistry {
    tiles: [[AtlasTile; 6]; BLOCK_TYPE_COUNT],
    tiles_per_row: u8,
}

impl BlockRegistry {
    /// Builds a registry from `(block type, side, tile)` entries.
    ///
    /// # Errors
    /// * `MissingAtlasTile` if any non-air block type lacks a tile for any side
    /// * `AtlasTileOutOfBounds` if a tile lies outside the atlas grid
    pub fn new<I>(tiles_per_row: u8, entries: I) -> EngineResult<Self>
    where
        I: IntoIterator<Item = (BlockType, BlockSide, AtlasTile)>,
    {
        let mut tiles = [[AtlasTile::default(); 6]; BLOCK_TYPE_COUNT];
        let mut present = [[false; 6]; BLOCK_TYPE_COUNT];

        for (block_type, side, tile) in entries {
            if tile.column >= tiles_per_row || tile.row >= tiles_per_row {
                return Err(EngineError::AtlasTileOutOfBounds {
                    column: tile.column,
                    row: tile.row,
                    tiles_per_row,
                });
            }
            tiles[block_type as usize][side as usize] = tile;
            present[block_type as usize][side as usize] = true;
        }

        for block_type in BlockType::all().into_iter().filter(|b| b.is_occupied()) {
            for side in BlockSide::all() {
                if !present[block_type as usize][side as usize] {
                    return Err(EngineError::MissingAtlasTile { block_type, side });
                }
            }
        }

        debug!("Block registry validated for a {tiles_per_row}x{tiles_per_row} atlas");
        Ok(BlockRegistry {
            tiles,
            tiles_per_row,
        })
    }

    /// The registry for the standard 16x16 atlas layout.
    pub fn standard() -> EngineResult<Self> {
        Self::new(
            ATLAS_TILES_PER_ROW,
            DEFAULT_ATLAS_LAYOUT.iter().flat_map(|(block_type, faces)| {
                BlockSide::all().into_iter().map(move |side| {
                    let (column, row) = faces[side as usize];
                    (*block_type, side, AtlasTile { column, row })
                })
            }),
        )
    }

    /// Gets the atlas tile for one face of a block type.
    pub fn tile(&self, block_type: BlockType, side: BlockSide) -> AtlasTile {
        self.tiles[block_type as usize][side as usize]
    }

    /// Gets the normalized UV rectangle for one face of a block type.
    pub fn uv_rect(&self, block_type: BlockType, side: BlockSide) -> UvRect {
        let tile = self.tile(block_type, side);
        let size = 1.0 / self.tiles_per_row as f32;
        UvRect {
            origin: [tile.column as f32 * size, tile.row as f32 * size],
            size,
        }
    }
}
