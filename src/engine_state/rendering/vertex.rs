//! Vertex data structures for voxel rendering.
//!
//! This module defines the interleaved vertex format handed to the rendering
//! collaborator when it prefers a single vertex buffer over separate streams.

/// A vertex in the voxel rendering pipeline.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Normal: [f32; 3] (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
///
/// Total size: 32 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Chunk-local position
    pub position: [f32; 3],
    /// Face normal
    pub normal: [f32; 3],
    /// Atlas UV coordinates (normalized 0.0-1.0)
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Creates a new vertex with the given attributes.
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Vertex {
            position,
            normal,
            tex_coords,
        }
    }

    /// Size of one vertex in bytes, for stride calculations.
    pub const fn stride() -> usize {
        std::mem::size_of::<Vertex>()
    }
}
