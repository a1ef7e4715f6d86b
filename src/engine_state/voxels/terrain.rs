//! # Terrain Generation
//!
//! Deterministic procedural terrain. A column's surface height comes from
//! three layers of 2D Perlin noise at different scales:
//!
//! - mountains: very low frequency, only the positive half, squared
//! - hills: medium frequency, signed
//! - detail: high frequency, small amplitude
//!
//! Columns are filled bottom up (bedrock, stone, dirt, then a grass or sand
//! cap) and low columns are flooded with water up to [`WATER_LEVEL`]. A small
//! fraction of high, interior columns grow a tree.
//!
//! Everything here is a pure function of the world seed and the chunk
//! coordinates, so a chunk regenerated later is identical to the first one.

use fastrand::Rng;
use log::trace;
use noise::{NoiseFn, Perlin};

use super::block::block_type::BlockType;
use super::chunk::{Chunk, CHUNK_HEIGHT, CHUNK_SIZE};

/// Surface height of the sea. Columns below it are flooded.
pub const WATER_LEVEL: i32 = 60;

/// Height every column starts from before the noise layers are added.
const BASE_HEIGHT: f64 = 60.0;

const MOUNTAIN_SCALE: f64 = 0.002;
const MOUNTAIN_AMPLITUDE: f64 = 60.0;
const HILL_SCALE: f64 = 0.01;
const HILL_AMPLITUDE: f64 = 20.0;
const DETAIL_SCALE: f64 = 0.05;
const DETAIL_AMPLITUDE: f64 = 5.0;

/// Thickness of the dirt band under the surface block.
const DIRT_DEPTH: i32 = 4;

/// Chance that an eligible column grows a tree.
const TREE_CHANCE: f32 = 0.01;
/// Trees stay this many cells away from the chunk's side walls so the whole
/// canopy fits inside the chunk.
const TREE_MARGIN: i32 = 3;
const TRUNK_MIN_HEIGHT: i32 = 4;
/// Number of extra trunk heights above the minimum (4, 5 or 6 tall).
const TRUNK_HEIGHT_VARIANTS: i32 = 3;
const CANOPY_LAYERS: i32 = 3;
const CANOPY_RADIUS: i32 = 2;

/// Generates chunk contents from a world seed.
pub struct TerrainGenerator {
    seed: u32,
    mountains: Perlin,
    hills: Perlin,
    detail: Perlin,
}

impl TerrainGenerator {
    /// Creates a generator. Each noise layer gets its own seed derived from
    /// the world seed so the layers are not correlated.
    pub fn new(seed: u32) -> Self {
        TerrainGenerator {
            seed,
            mountains: Perlin::new(seed),
            hills: Perlin::new(seed.wrapping_add(1)),
            detail: Perlin::new(seed.wrapping_add(2)),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Surface height of the column at world (x, z).
    ///
    /// # Returns
    /// The y of the topmost terrain block, clamped to `[1, CHUNK_HEIGHT - 1]`.
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        let (x, z) = (x as f64, z as f64);

        let mountain_noise = self.mountains.get([x * MOUNTAIN_SCALE, z * MOUNTAIN_SCALE]);
        let mountains = mountain_noise.max(0.0).powi(2) * MOUNTAIN_AMPLITUDE;
        let hills = self.hills.get([x * HILL_SCALE, z * HILL_SCALE]) * HILL_AMPLITUDE;
        let details = self.detail.get([x * DETAIL_SCALE, z * DETAIL_SCALE]) * DETAIL_AMPLITUDE;

        let height = (BASE_HEIGHT + mountains + hills + details).floor() as i32;
        height.clamp(1, CHUNK_HEIGHT - 1)
    }

    /// Creates and fills the chunk at the given chunk-grid coordinates.
    pub fn generate_chunk(&self, chunk_x: i32, chunk_z: i32) -> Chunk {
        let mut chunk = Chunk::empty(chunk_x, chunk_z);
        self.fill_chunk(&mut chunk);
        chunk
    }

    /// Writes terrain into an empty chunk.
    pub fn fill_chunk(&self, chunk: &mut Chunk) {
        let mut heights = [[0; CHUNK_SIZE as usize]; CHUNK_SIZE as usize];

        for lx in 0..CHUNK_SIZE {
            for lz in 0..CHUNK_SIZE {
                let height = self.height_at(
                    chunk.world_x_offset() + lx,
                    chunk.world_z_offset() + lz,
                );
                heights[lx as usize][lz as usize] = height;
                Self::fill_column(chunk, lx, lz, height);
            }
        }

        // Trees go in after every column so no column fill can cut into a canopy.
        let mut rng = Rng::with_seed(self.chunk_seed(chunk.chunk_x, chunk.chunk_z));
        let mut trees = 0;
        for lx in 0..CHUNK_SIZE {
            for lz in 0..CHUNK_SIZE {
                let height = heights[lx as usize][lz as usize];
                if !Self::can_grow_tree(lx, lz, height) {
                    continue;
                }
                if rng.f32() < TREE_CHANCE {
                    let trunk_height = TRUNK_MIN_HEIGHT + rng.i32(0..TRUNK_HEIGHT_VARIANTS);
                    Self::grow_tree(chunk, lx, height + 1, lz, trunk_height);
                    trees += 1;
                }
            }
        }

        trace!(
            "Generated chunk ({}, {}) with {} blocks and {} trees",
            chunk.chunk_x,
            chunk.chunk_z,
            chunk.block_count(),
            trees
        );
    }

    fn fill_column(chunk: &mut Chunk, lx: i32, lz: i32, height: i32) {
        chunk.set_block(lx, 0, lz, BlockType::BEDROCK);

        let dirt_start = (height - DIRT_DEPTH).max(1);
        for y in 1..dirt_start {
            chunk.set_block(lx, y, lz, BlockType::STONE);
        }
        for y in dirt_start..height {
            chunk.set_block(lx, y, lz, BlockType::DIRT);
        }

        let surface = if height <= WATER_LEVEL + 2 {
            BlockType::SAND
        } else {
            BlockType::GRASS
        };
        chunk.set_block(lx, height, lz, surface);

        for y in (height + 1)..=WATER_LEVEL {
            chunk.set_block(lx, y, lz, BlockType::WATER);
        }
    }

    fn can_grow_tree(lx: i32, lz: i32, height: i32) -> bool {
        let interior = TREE_MARGIN..=(CHUNK_SIZE - 1 - TREE_MARGIN);
        height > WATER_LEVEL + 3
            && height < CHUNK_HEIGHT - 10
            && interior.contains(&lx)
            && interior.contains(&lz)
    }

    /// Places a trunk starting at (lx, base_y, lz) and a rounded canopy whose
    /// lowest layer surrounds the top trunk cell.
    fn grow_tree(chunk: &mut Chunk, lx: i32, base_y: i32, lz: i32, trunk_height: i32) {
        for dy in 0..trunk_height {
            chunk.set_block(lx, base_y + dy, lz, BlockType::WOOD);
        }

        let trunk_top = base_y + trunk_height - 1;
        for layer in 0..CANOPY_LAYERS {
            let y = trunk_top + layer;
            let radius = if layer == CANOPY_LAYERS - 1 {
                CANOPY_RADIUS - 1
            } else {
                CANOPY_RADIUS
            };

            for dx in -radius..=radius {
                for dz in -radius..=radius {
                    if dx.abs() == CANOPY_RADIUS && dz.abs() == CANOPY_RADIUS {
                        continue;
                    }
                    if dx == 0 && dz == 0 && y <= trunk_top {
                        continue;
                    }
                    // Leaves only fill empty space.
                    if chunk.is_block_solid(lx + dx, y, lz + dz) {
                        continue;
                    }
                    chunk.set_block(lx + dx, y, lz + dz, BlockType::LEAVES);
                }
            }
        }
    }

    fn chunk_seed(&self, chunk_x: i32, chunk_z: i32) -> u64 {
        let x = chunk_x as u32 as u64;
        let z = chunk_z as u32 as u64;
        ((self.seed as u64) << 32)
            ^ x.wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ z.wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_is_deterministic_per_seed() {
        let a = TerrainGenerator::new(1234);
        let b = TerrainGenerator::new(1234);
        for (x, z) in [(0, 0), (17, -40), (-1000, 250), (31_337, 7)] {
            assert_eq!(a.height_at(x, z), b.height_at(x, z));
        }
    }

    #[test]
    fn height_stays_in_world_bounds() {
        let generator = TerrainGenerator::new(99);
        for x in (-2000..2000).step_by(37) {
            for z in (-2000..2000).step_by(41) {
                let h = generator.height_at(x, z);
                assert!((1..CHUNK_HEIGHT).contains(&h), "height {h} at ({x}, {z})");
            }
        }
    }

    #[test]
    fn columns_are_layered() {
        let generator = TerrainGenerator::new(7);
        let chunk = generator.generate_chunk(0, 0);

        for lx in 0..CHUNK_SIZE {
            for lz in 0..CHUNK_SIZE {
                let height = generator.height_at(lx, lz);
                assert_eq!(
                    chunk.get_block(lx, 0, lz).map(|b| b.block_type),
                    Some(BlockType::BEDROCK)
                );

                let top = chunk.get_block(lx, height, lz).map(|b| b.block_type);
                if height <= WATER_LEVEL + 2 {
                    assert_eq!(top, Some(BlockType::SAND));
                } else {
                    assert_eq!(top, Some(BlockType::GRASS));
                }

                if height > DIRT_DEPTH + 1 {
                    assert_eq!(
                        chunk.get_block(lx, height - 1, lz).map(|b| b.block_type),
                        Some(BlockType::DIRT)
                    );
                    assert_eq!(
                        chunk.get_block(lx, height - DIRT_DEPTH - 1, lz).map(|b| b.block_type),
                        Some(BlockType::STONE)
                    );
                }

                for y in (height + 1)..=WATER_LEVEL {
                    assert_eq!(
                        chunk.get_block(lx, y, lz).map(|b| b.block_type),
                        Some(BlockType::WATER)
                    );
                }
            }
        }
    }

    #[test]
    fn chunks_regenerate_identically() {
        let generator = TerrainGenerator::new(42);
        for (cx, cz) in [(0, 0), (-3, 5), (12, -9)] {
            let first: Vec<_> = generator.generate_chunk(cx, cz).iter_blocks().collect();
            let second: Vec<_> = generator.generate_chunk(cx, cz).iter_blocks().collect();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn tree_keeps_its_trunk_and_rounded_canopy() {
        let mut chunk = Chunk::empty(0, 0);
        chunk.set_block(8, 70, 8, BlockType::GRASS);
        TerrainGenerator::grow_tree(&mut chunk, 8, 71, 8, 5);

        let kind = |x, y, z| chunk.get_block(x, y, z).map(|b| b.block_type);
        for y in 71..76 {
            assert_eq!(kind(8, y, 8), Some(BlockType::WOOD));
        }
        // Lowest canopy layer surrounds the top trunk cell.
        assert_eq!(kind(6, 75, 8), Some(BlockType::LEAVES));
        assert_eq!(kind(6, 75, 6), None);
        // Top layer has radius 1.
        assert_eq!(kind(9, 77, 9), Some(BlockType::LEAVES));
        assert_eq!(kind(10, 77, 8), None);
        // The cell above the trunk is capped with leaves.
        assert_eq!(kind(8, 76, 8), Some(BlockType::LEAVES));
    }

    #[test]
    fn trees_only_grow_on_high_interior_columns() {
        assert!(TerrainGenerator::can_grow_tree(3, 12, WATER_LEVEL + 4));
        assert!(!TerrainGenerator::can_grow_tree(2, 8, WATER_LEVEL + 4));
        assert!(!TerrainGenerator::can_grow_tree(8, 13, WATER_LEVEL + 4));
        assert!(!TerrainGenerator::can_grow_tree(8, 8, WATER_LEVEL + 3));
        assert!(!TerrainGenerator::can_grow_tree(8, 8, CHUNK_HEIGHT - 10));
    }
}
