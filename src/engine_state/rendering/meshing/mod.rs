//! # Meshing
//!
//! Turns chunk block data into triangle meshes.
//!
//! Chunks are meshed with per-face culling: a quad is emitted for each side of
//! a block whose neighbor is empty or outside the chunk. The chunk itself
//! drives the iteration (see `Chunk::build_mesh`); this module owns the face
//! geometry and the buffers it is written into.

pub mod face;
pub mod mesh;

pub use face::Face;
pub use mesh::MeshData;
