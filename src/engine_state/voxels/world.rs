//! # World Module
//!
//! This module provides the `WorldStreamer` which manages the collection of
//! chunks in the voxel world. It serves as the central coordinator for chunk
//! generation, streaming, and global block access.
//!
//! ## Architecture
//!
//! The world uses a sparse storage approach where only chunks that have been
//! requested are kept in memory. A chunk, once generated, is kept for the rest
//! of the session: terrain is deterministic, so there is nothing to gain from
//! regenerating it. What streaming toggles is whether a chunk is *loaded*,
//! meaning it has a mesh and is registered with the renderer.
//!
//! ## Streaming Window
//!
//! The loaded set is a square (Chebyshev) window around the chunk containing
//! the viewer. Chunks enter the window at distance `render_distance` and leave
//! it only beyond `render_distance + 1`, so walking back and forth across a
//! chunk border does not thrash.
//!
//! ## Mesh Hand-off
//!
//! Mesh registrations and removals are queued per chunk and handed to the
//! renderer by [`WorldStreamer::flush_mesh_updates`]. Only the latest update for
//! a chunk survives, so a chunk loaded and unloaded between two flushes costs
//! the renderer nothing.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use cgmath::Point3;
use log::{debug, trace};

use super::block::{block_type::BlockType, Block, BlockRegistry};
use super::chunk::{Chunk, CHUNK_HEIGHT, CHUNK_SIZE};
use super::terrain::TerrainGenerator;
use crate::engine_state::rendering::RenderSink;

/// Chunk-grid coordinate of a chunk column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkKey {
    pub x: i32,
    pub z: i32,
}

impl ChunkKey {
    pub fn new(x: i32, z: i32) -> Self {
        ChunkKey { x, z }
    }

    /// The chunk containing world block column (x, z).
    pub fn containing(x: i32, z: i32) -> Self {
        ChunkKey {
            x: x.div_euclid(CHUNK_SIZE),
            z: z.div_euclid(CHUNK_SIZE),
        }
    }

    /// The chunk containing a continuous world position.
    pub fn from_position(position: Point3<f32>) -> Self {
        Self::containing(position.x.floor() as i32, position.z.floor() as i32)
    }

    /// Max of the per-axis distances, in chunks.
    pub fn chebyshev_distance(&self, other: &ChunkKey) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }

    pub fn offset(&self, dx: i32, dz: i32) -> Self {
        ChunkKey::new(self.x + dx, self.z + dz)
    }
}

impl fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Read access to blocks by world coordinate.
///
/// Collision works against this trait rather than the streamer so it can be
/// driven by any block source.
pub trait BlockQuery {
    /// The block at the given world cell, or `None` when the cell is empty,
    /// out of the world's vertical range, or not generated.
    fn get_block(&self, x: i32, y: i32, z: i32) -> Option<Block>;

    /// Whether the cell blocks movement. Water and empty cells do not.
    fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.get_block(x, y, z)
            .is_some_and(|block| block.block_type.is_solid())
    }
}

/// A pending change to what the renderer should draw for a chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MeshUpdate {
    /// Register (or replace) the chunk's current mesh
    Upload,
    /// Stop drawing the chunk
    Remove,
}

/// What a change of streaming center did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamingReport {
    /// Chunks that entered the loaded set, in key order
    pub loaded: Vec<ChunkKey>,
    /// Chunks that left the loaded set, in key order
    pub unloaded: Vec<ChunkKey>,
}

/// Owns every generated chunk and decides which are loaded.
pub struct WorldStreamer {
    chunks: HashMap<ChunkKey, Chunk>,
    loaded: HashSet<ChunkKey>,
    generator: TerrainGenerator,
    registry: BlockRegistry,
    render_distance: i32,
    center: Option<ChunkKey>,
    pending_meshes: BTreeMap<ChunkKey, MeshUpdate>,
}

impl WorldStreamer {
    /// Creates an empty world.
    ///
    /// # Arguments
    /// * `generator` - Terrain source for newly requested chunks
    /// * `registry` - Atlas table used when meshing
    /// * `render_distance` - Chebyshev radius of the loaded window, in chunks
    pub fn new(generator: TerrainGenerator, registry: BlockRegistry, render_distance: i32) -> Self {
        WorldStreamer {
            chunks: HashMap::new(),
            loaded: HashSet::new(),
            generator,
            registry,
            render_distance: render_distance.max(0),
            center: None,
            pending_meshes: BTreeMap::new(),
        }
    }

    /// Generates the chunk at `key` if it does not exist yet.
    ///
    /// # Returns
    /// The chunk, freshly generated or the one already stored.
    pub fn ensure_generated(&mut self, key: ChunkKey) -> &mut Chunk {
        let generator = &self.generator;
        self.chunks.entry(key).or_insert_with(|| {
            trace!("Generating chunk {key}");
            generator.generate_chunk(key.x, key.z)
        })
    }

    /// Moves the streaming window to the chunk containing `position`.
    ///
    /// Every chunk within `render_distance` is generated and loaded (meshed and
    /// queued for registration). Loaded chunks farther than
    /// `render_distance + 1` are unloaded: their mesh is released and queued
    /// for removal, while the block data stays in memory.
    pub fn set_active_center(&mut self, position: Point3<f32>) -> StreamingReport {
        let center = ChunkKey::from_position(position);
        self.center = Some(center);

        let radius = self.render_distance;
        let mut report = StreamingReport::default();

        for dx in -radius..=radius {
            for dz in -radius..=radius {
                let key = center.offset(dx, dz);
                if self.loaded.contains(&key) {
                    continue;
                }
                self.ensure_generated(key);
                if let Some(chunk) = self.chunks.get_mut(&key) {
                    chunk.build_mesh(&self.registry);
                }
                self.pending_meshes.insert(key, MeshUpdate::Upload);
                self.loaded.insert(key);
                report.loaded.push(key);
            }
        }

        let mut far: Vec<ChunkKey> = self
            .loaded
            .iter()
            .filter(|key| key.chebyshev_distance(&center) > radius + 1)
            .copied()
            .collect();
        far.sort();

        for key in far {
            if let Some(chunk) = self.chunks.get_mut(&key) {
                chunk.dispose_mesh();
            }
            self.pending_meshes.insert(key, MeshUpdate::Remove);
            self.loaded.remove(&key);
            report.unloaded.push(key);
        }

        report.loaded.sort();
        debug!(
            "Streaming center {center}: {} loaded, {} unloaded, {} resident",
            report.loaded.len(),
            report.unloaded.len(),
            self.loaded.len()
        );
        report
    }

    /// Per-tick streaming entry point. Only re-centers when `position` is in a
    /// different chunk than last time (or on the first call).
    pub fn update(&mut self, position: Point3<f32>) -> Option<StreamingReport> {
        if self.center == Some(ChunkKey::from_position(position)) {
            return None;
        }
        Some(self.set_active_center(position))
    }

    /// Returns the block at world coordinates without generating anything.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Option<Block> {
        let key = ChunkKey::containing(x, z);
        let chunk = self.chunks.get(&key)?;
        chunk.get_block(x.rem_euclid(CHUNK_SIZE), y, z.rem_euclid(CHUNK_SIZE))
    }

    /// Writes a block at world coordinates.
    ///
    /// Ignored when the owning chunk was never generated or `y` is out of
    /// range. A loaded owner is remeshed right away, and so is each loaded
    /// neighbor sharing the face the cell sits on. Unloaded chunks are only
    /// marked dirty and remesh when they are next loaded.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block_type: BlockType) {
        let key = ChunkKey::containing(x, z);
        if !(0..CHUNK_HEIGHT).contains(&y) || !self.chunks.contains_key(&key) {
            return;
        }

        let (lx, lz) = (x.rem_euclid(CHUNK_SIZE), z.rem_euclid(CHUNK_SIZE));
        if let Some(chunk) = self.chunks.get_mut(&key) {
            chunk.set_block(lx, y, lz, block_type);
        }
        self.refresh_mesh(key);

        let mut neighbors = Vec::with_capacity(2);
        if lx == 0 {
            neighbors.push(key.offset(-1, 0));
        } else if lx == CHUNK_SIZE - 1 {
            neighbors.push(key.offset(1, 0));
        }
        if lz == 0 {
            neighbors.push(key.offset(0, -1));
        } else if lz == CHUNK_SIZE - 1 {
            neighbors.push(key.offset(0, 1));
        }
        for neighbor in neighbors {
            self.refresh_mesh(neighbor);
        }
    }

    fn refresh_mesh(&mut self, key: ChunkKey) {
        let Some(chunk) = self.chunks.get_mut(&key) else {
            return;
        };
        chunk.mark_dirty();
        if self.loaded.contains(&key) {
            chunk.build_mesh(&self.registry);
            self.pending_meshes.insert(key, MeshUpdate::Upload);
            trace!("Remeshed chunk {key}");
        }
    }

    /// Hands every queued mesh change to the renderer, in key order.
    ///
    /// # Returns
    /// The number of updates delivered.
    pub fn flush_mesh_updates(&mut self, sink: &mut dyn RenderSink) -> usize {
        let updates = std::mem::take(&mut self.pending_meshes);
        let count = updates.len();

        for (key, update) in updates {
            match update {
                MeshUpdate::Upload => {
                    if let Some(mesh) = self.chunks.get(&key).and_then(Chunk::mesh) {
                        sink.register_mesh(key, mesh);
                    }
                }
                MeshUpdate::Remove => sink.unregister_mesh(key),
            }
        }

        if count > 0 {
            debug!("Flushed {count} mesh updates");
        }
        count
    }

    /// Queued mesh changes not yet flushed.
    pub fn pending_mesh_updates(&self) -> impl Iterator<Item = (&ChunkKey, &MeshUpdate)> {
        self.pending_meshes.iter()
    }

    /// One above the topmost non-air cell of column (x, z), or `None` when the
    /// column's chunk was never generated.
    pub fn spawn_height(&self, x: i32, z: i32) -> Option<i32> {
        let chunk = self.chunks.get(&ChunkKey::containing(x, z))?;
        let (lx, lz) = (x.rem_euclid(CHUNK_SIZE), z.rem_euclid(CHUNK_SIZE));
        let top = (0..CHUNK_HEIGHT)
            .rev()
            .find(|&y| chunk.is_block_solid(lx, y, lz))
            .unwrap_or(-1);
        Some(top + 1)
    }

    pub fn is_loaded(&self, key: ChunkKey) -> bool {
        self.loaded.contains(&key)
    }

    pub fn is_generated(&self, key: ChunkKey) -> bool {
        self.chunks.contains_key(&key)
    }

    /// Loaded keys, sorted.
    pub fn loaded_keys(&self) -> Vec<ChunkKey> {
        let mut keys: Vec<ChunkKey> = self.loaded.iter().copied().collect();
        keys.sort();
        keys
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    pub fn generated_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunk(&self, key: ChunkKey) -> Option<&Chunk> {
        self.chunks.get(&key)
    }

    /// The chunk the window is centered on, once streaming has started.
    pub fn center(&self) -> Option<ChunkKey> {
        self.center
    }

    pub fn render_distance(&self) -> i32 {
        self.render_distance
    }

    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }
}

impl BlockQuery for WorldStreamer {
    fn get_block(&self, x: i32, y: i32, z: i32) -> Option<Block> {
        WorldStreamer::get_block(self, x, y, z)
    }
}
