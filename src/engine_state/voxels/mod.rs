//! # Voxel Engine Core
//!
//! This module contains the core voxel functionality, providing the foundation
//! for representing, generating, and streaming a voxel-based world.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components:
//!
//! * **Block**: Block types, block faces and the atlas registry
//! * **Chunk**: Fixed-size 16x128x16 columns of blocks that mesh themselves
//! * **Terrain**: Deterministic height function, column fill and tree placement
//! * **World**: Owns the chunks, streams them around the viewer and answers
//!   block queries by world coordinate
//!
//! ## Data Flow
//!
//! 1. The world asks the terrain generator to fill chunks entering the window
//! 2. Newly loaded or edited chunks rebuild their mesh
//! 3. Mesh changes are queued and flushed to the renderer once per tick
//! 4. Collision reads blocks back through the world's `BlockQuery` impl
//!
//! Everything here runs on the caller's thread; generation and meshing are
//! synchronous and finish within the tick that requests them.

pub mod block;
pub mod chunk;
pub mod terrain;
pub mod world;
