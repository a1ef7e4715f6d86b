//! # Chunk Module
//!
//! This module provides the `Chunk` struct for managing a 16x128x16 column of
//! voxel data, together with the mesh derived from it.
//!
//! ## Storage
//!
//! Chunks keep two parallel structures:
//! - `solid_array`: A bit vector (1 bit per cell) indicating which cells are occupied
//! - `blocks`: A dense vector of block types, with `AIR` marking empty cells
//!
//! The bit vector makes face culling a single bit test per neighbor and lets
//! iteration skip runs of air quickly; the dense vector gives O(1) lookups.
//!
//! ## Mesh Lifecycle
//!
//! The chunk exclusively owns its mesh. Any block change marks the chunk dirty;
//! `build_mesh` rebuilds only when dirty (or after the mesh was disposed), so
//! repeated calls on an unchanged chunk return the same mesh untouched.

use bitvec::prelude::BitVec;
use log::trace;

use super::block::{block_side::BlockSide, block_type::BlockType, Block, BlockRegistry};
use crate::engine_state::rendering::meshing::{Face, MeshData};
use chunk_iteration::ChunkBlockIterator;

pub mod chunk_iteration;

/// The width and depth of a chunk in blocks.
pub const CHUNK_SIZE: i32 = 16;
/// The height of a chunk (and of the world) in blocks.
pub const CHUNK_HEIGHT: i32 = 128;
/// The number of cells in one horizontal layer of a chunk.
pub const CHUNK_LAYER_SIZE: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;
/// The total number of cells in a chunk.
pub const CHUNK_VOLUME: usize = CHUNK_LAYER_SIZE * CHUNK_HEIGHT as usize;

/// Represents a 16x128x16 column of voxel blocks in the world.
pub struct Chunk {
    /// Chunk-grid X coordinate
    pub chunk_x: i32,
    /// Chunk-grid Z coordinate
    pub chunk_z: i32,

    /// One bit per cell, set when the cell holds a non-air block.
    ///
    /// Cells are stored x fastest, then z, then y.
    solid_array: BitVec,

    /// Block type per cell, `AIR` for empty cells.
    blocks: Vec<BlockType>,

    /// The mesh from the last build, if it has not been disposed since.
    mesh: Option<MeshData>,

    /// Set whenever a block changed since the last mesh build.
    dirty: bool,
}

impl Chunk {
    /// Creates a new, completely empty chunk.
    pub fn empty(chunk_x: i32, chunk_z: i32) -> Self {
        Chunk {
            chunk_x,
            chunk_z,
            solid_array: BitVec::repeat(false, CHUNK_VOLUME),
            blocks: vec![BlockType::AIR; CHUNK_VOLUME],
            mesh: None,
            dirty: true,
        }
    }

    /// Converts local coordinates to a cell index, or `None` when out of range.
    pub(crate) fn index(lx: i32, ly: i32, lz: i32) -> Option<usize> {
        if !(0..CHUNK_SIZE).contains(&lx)
            || !(0..CHUNK_HEIGHT).contains(&ly)
            || !(0..CHUNK_SIZE).contains(&lz)
        {
            return None;
        }
        Some(lx as usize + CHUNK_SIZE as usize * lz as usize + CHUNK_LAYER_SIZE * ly as usize)
    }

    /// Converts a cell index back to local coordinates.
    pub(crate) fn coordinates(index: usize) -> (usize, usize, usize) {
        let size = CHUNK_SIZE as usize;
        (index % size, index / CHUNK_LAYER_SIZE, (index / size) % size)
    }

    /// World X coordinate of local x = 0.
    pub fn world_x_offset(&self) -> i32 {
        self.chunk_x * CHUNK_SIZE
    }

    /// World Z coordinate of local z = 0.
    pub fn world_z_offset(&self) -> i32 {
        self.chunk_z * CHUNK_SIZE
    }

    /// Places a block at chunk-local coordinates.
    ///
    /// Coordinates outside the chunk are ignored. Setting `AIR` clears the
    /// cell. The chunk is marked dirty either way once the write lands.
    pub fn set_block(&mut self, lx: i32, ly: i32, lz: i32, block_type: BlockType) {
        let Some(index) = Self::index(lx, ly, lz) else {
            return;
        };
        self.blocks[index] = block_type;
        self.solid_array.set(index, block_type.is_occupied());
        self.dirty = true;
    }

    /// Gets the block at chunk-local coordinates.
    ///
    /// # Returns
    /// `None` when the coordinates are out of range or the cell is empty.
    pub fn get_block(&self, lx: i32, ly: i32, lz: i32) -> Option<Block> {
        let index = Self::index(lx, ly, lz)?;
        self.block_at_index(index)
    }

    pub(crate) fn block_at_index(&self, index: usize) -> Option<Block> {
        let block_type = self.blocks[index];
        if !block_type.is_occupied() {
            return None;
        }
        let (lx, ly, lz) = Self::coordinates(index);
        Some(Block::new(
            block_type,
            self.world_x_offset() + lx as i32,
            ly as i32,
            self.world_z_offset() + lz as i32,
        ))
    }

    /// Checks whether the cell at chunk-local coordinates is occupied.
    ///
    /// # Returns
    /// `true` if the cell holds a block, `false` if it's empty or out of bounds.
    pub fn is_block_solid(&self, lx: i32, ly: i32, lz: i32) -> bool {
        Self::index(lx, ly, lz).is_some_and(|index| self.solid_array[index])
    }

    /// Determines which faces of the block at (x, y, z) must be drawn.
    ///
    /// A face is exposed when the neighboring cell is empty or lies outside
    /// this chunk. Neighboring chunks are not consulted, so faces on the chunk
    /// boundary are always exposed.
    ///
    /// # Returns
    /// An array of 6 booleans in `BlockSide` order.
    pub fn exposed_sides(&self, x: i32, y: i32, z: i32) -> [bool; 6] {
        let mut exposed = [false; 6];
        for side in BlockSide::all() {
            let [dx, dy, dz] = side.neighbor_offset();
            exposed[side as usize] = !self.is_block_solid(x + dx, y + dy, z + dz);
        }
        exposed
    }

    /// Iterates over every occupied cell in storage order.
    pub fn iter_blocks(&self) -> ChunkBlockIterator<'_> {
        ChunkBlockIterator::new(self)
    }

    /// The number of occupied cells.
    pub fn block_count(&self) -> usize {
        self.solid_array.count_ones()
    }

    pub(crate) fn solid_array(&self) -> &BitVec {
        &self.solid_array
    }

    /// Forces the next `build_mesh` to rebuild.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The current mesh, if one has been built and not disposed.
    pub fn mesh(&self) -> Option<&MeshData> {
        self.mesh.as_ref()
    }

    /// Returns the chunk's mesh, rebuilding it first if blocks changed.
    ///
    /// A clean chunk returns its cached mesh without touching it.
    pub fn build_mesh(&mut self, registry: &BlockRegistry) -> &MeshData {
        let mesh = match self.mesh.take() {
            Some(mesh) if !self.dirty => mesh,
            _ => {
                let mesh = self.generate_mesh(registry);
                self.dirty = false;
                mesh
            }
        };
        self.mesh.insert(mesh)
    }

    /// Releases the mesh buffers. Safe to call any number of times.
    pub fn dispose_mesh(&mut self) {
        if self.mesh.take().is_some() {
            trace!("Disposed mesh of chunk ({}, {})", self.chunk_x, self.chunk_z);
        }
    }

    fn generate_mesh(&self, registry: &BlockRegistry) -> MeshData {
        let mut mesh = MeshData::new([
            self.world_x_offset() as f32,
            0.0,
            self.world_z_offset() as f32,
        ]);

        for (position, block_type) in self.iter_blocks() {
            let exposed =
                self.exposed_sides(position.x as i32, position.y as i32, position.z as i32);
            for side in BlockSide::all() {
                if !exposed[side as usize] {
                    continue;
                }
                let face = Face::new(
                    position.x,
                    position.y,
                    position.z,
                    side,
                    registry.uv_rect(block_type, side),
                );
                mesh.push_face(&face);
            }
        }

        trace!(
            "Built mesh for chunk ({}, {}): {} faces from {} blocks",
            self.chunk_x,
            self.chunk_z,
            mesh.face_count(),
            self.block_count()
        );
        mesh
    }
}
