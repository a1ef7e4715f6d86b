//! Mesh data structures and operations for voxel rendering.
//!
//! `MeshData` is the indexed triangle list handed to the rendering
//! collaborator. Attributes are stored as separate streams, and can be
//! interleaved into `Vertex` records for a single-buffer upload.

use super::face::Face;
use crate::engine_state::rendering::Vertex;

/// Indexed triangle list for one chunk.
///
/// Positions are chunk-local; `origin` is the world-space translation of the
/// chunk. Every face contributes four vertices and six indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// World-space offset of the chunk's local origin
    pub origin: [f32; 3],
    /// Vertex positions (x, y, z)
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex normals, constant across each face
    pub normals: Vec<[f32; 3]>,
    /// Per-vertex atlas coordinates
    pub uvs: Vec<[f32; 2]>,
    /// Triangle indices, two triangles per face
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Creates an empty mesh anchored at `origin`.
    pub fn new(origin: [f32; 3]) -> Self {
        MeshData {
            origin,
            ..Default::default()
        }
    }

    /// Appends a face as four vertices and two counter-clockwise triangles.
    pub fn push_face(&mut self, face: &Face) {
        let base = self.positions.len() as u32;
        let normal = face.block_side.normal();

        for (corner, uv) in face.corners.iter().zip(face.uvs) {
            self.positions.push([corner.x, corner.y, corner.z]);
            self.normals.push(normal);
            self.uvs.push(uv);
        }

        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Number of quads in the mesh.
    pub fn face_count(&self) -> usize {
        self.positions.len() / 4
    }

    /// Number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Whether the mesh has no geometry.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Interleaves the attribute streams into GPU-ready vertices.
    pub fn interleaved(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .map(|((position, normal), uv)| Vertex::new(*position, *normal, *uv))
            .collect()
    }

    /// The raw bytes of the index buffer.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
