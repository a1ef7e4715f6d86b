//! # Chunk Iteration Module
//!
//! This module provides an iterator for traversing all non-air blocks in a
//! chunk.
//!
//! The `ChunkBlockIterator` walks the set bits of the chunk's occupancy bit
//! vector, so long runs of air (the whole sky above the terrain) are skipped a
//! machine word at a time rather than cell by cell.

use bitvec::order::Lsb0;
use bitvec::slice::IterOnes;
use cgmath::Point3;

use crate::engine_state::voxels::block::block_type::BlockType;

use super::Chunk;

/// An iterator over all non-air blocks in a chunk.
///
/// Yields the chunk-local position and type of every occupied cell, in
/// storage order (x fastest, then z, then y).
pub struct ChunkBlockIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk,
    /// Remaining occupied cell indices
    occupied: IterOnes<'a, usize, Lsb0>,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates a new `ChunkBlockIterator` for the given chunk.
    ///
    /// # Arguments
    /// * `chunk_ref` - A reference to the chunk to iterate over
    ///
    /// # Returns
    /// A new `ChunkBlockIterator` positioned at the first non-air block
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        ChunkBlockIterator {
            chunk_ref,
            occupied: chunk_ref.solid_array().iter_ones(),
        }
    }
}

impl Iterator for ChunkBlockIterator<'_> {
    type Item = (Point3<usize>, BlockType);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.occupied.next()?;
        let (x, y, z) = Chunk::coordinates(index);
        Some((Point3::new(x, y, z), self.chunk_ref.blocks[index]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.occupied.size_hint()
    }
}
