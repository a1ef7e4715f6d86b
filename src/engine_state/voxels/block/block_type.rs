//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides functionality for block type identification, conversion and
//! the solidity rules used by collision.

use num_derive::FromPrimitive;

use super::BlockTypeSize;

/// The number of `BlockType` variants, including `AIR`.
pub const BLOCK_TYPE_COUNT: usize = 9;

/// Enumerates all possible block types in the voxel world.
///
/// The discriminants are stable and double as indices into the atlas table of
/// the block registry. The `FromPrimitive` derive allows conversion from the
/// compact `BlockTypeSize` representation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive)]
pub enum BlockType {
    /// The absence of matter. Never stored as a block.
    AIR = 0,

    /// Surface block above the beach line.
    GRASS = 1,

    /// Sub-surface layer between stone and the top block.
    DIRT = 2,

    /// Bulk of every column.
    STONE = 3,

    /// Bottom layer of the world at y = 0.
    BEDROCK = 4,

    /// Fills low columns up to the water level. Not solid for collision.
    WATER = 5,

    /// Surface block near the water level.
    SAND = 6,

    /// Tree trunks.
    WOOD = 7,

    /// Tree canopies.
    LEAVES = 8,
}

impl BlockType {
    /// Every block type in discriminant order.
    pub fn all() -> [BlockType; BLOCK_TYPE_COUNT] {
        [
            BlockType::AIR,
            BlockType::GRASS,
            BlockType::DIRT,
            BlockType::STONE,
            BlockType::BEDROCK,
            BlockType::WATER,
            BlockType::SAND,
            BlockType::WOOD,
            BlockType::LEAVES,
        ]
    }

    /// Converts a `BlockTypeSize` to a `BlockType`.
    ///
    /// Returns `None` for values that don't name a block type.
    pub fn from_int(btype: BlockTypeSize) -> Option<Self> {
        num_traits::FromPrimitive::from_u8(btype)
    }

    /// Whether a block of this type occupies its cell (anything but air).
    pub fn is_occupied(self) -> bool {
        self != BlockType::AIR
    }

    /// Whether a moving body is stopped by this block type.
    ///
    /// Water occupies its cell for meshing purposes but can be walked and
    /// fallen through.
    pub fn is_solid(self) -> bool {
        !matches!(self, BlockType::AIR | BlockType::WATER)
    }
}
