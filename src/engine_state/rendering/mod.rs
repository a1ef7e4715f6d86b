//! # Rendering Interface
//!
//! The engine does not draw anything itself. It hands chunk meshes, camera
//! poses and viewport changes to a rendering collaborator implementing
//! [`RenderSink`].
//!
//! ## Key Components
//! - `RenderSink`: The interface the engine drives once per tick
//! - `HeadlessRenderer`: A sink that keeps bookkeeping only, used by the
//!   headless driver and by tests
//! - `meshing`: Chunk mesh buffers and face geometry
//! - `Vertex`: Interleaved vertex format for single-buffer uploads

use std::collections::HashMap;

use log::{debug, trace};

use super::camera_state::CameraPose;
use super::voxels::world::ChunkKey;
use meshing::MeshData;

pub mod meshing;
mod vertex;

pub use vertex::Vertex;

/// Size of the output surface, reported on resize.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Width over height. A zero height is treated as one pixel.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// The rendering collaborator.
///
/// Meshes are borrowed for the duration of the call; a sink that needs them
/// later must copy or upload them. `unregister_mesh` may be called for a key
/// that was never registered and must tolerate it.
pub trait RenderSink {
    /// Makes (or replaces) the mesh drawn for a chunk.
    fn register_mesh(&mut self, key: ChunkKey, mesh: &MeshData);

    /// Stops drawing a chunk.
    fn unregister_mesh(&mut self, key: ChunkKey);

    /// Receives the camera pose for the frame.
    fn update_camera(&mut self, pose: &CameraPose);

    /// Receives a new viewport size.
    fn resize(&mut self, viewport: Viewport);
}

/// Summary of a registered mesh kept by [`HeadlessRenderer`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RegisteredMesh {
    pub face_count: usize,
    pub index_count: usize,
    /// How many times this key has been (re)registered
    pub uploads: u32,
}

/// A render sink that records what it was given instead of drawing it.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    meshes: HashMap<ChunkKey, RegisteredMesh>,
    camera: Option<CameraPose>,
    viewport: Option<Viewport>,
    total_uploads: u64,
    total_removals: u64,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys currently registered.
    pub fn registered_keys(&self) -> impl Iterator<Item = &ChunkKey> {
        self.meshes.keys()
    }

    pub fn mesh(&self, key: ChunkKey) -> Option<&RegisteredMesh> {
        self.meshes.get(&key)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Total faces across every registered mesh.
    pub fn total_faces(&self) -> usize {
        self.meshes.values().map(|m| m.face_count).sum()
    }

    pub fn total_uploads(&self) -> u64 {
        self.total_uploads
    }

    pub fn total_removals(&self) -> u64 {
        self.total_removals
    }

    pub fn camera(&self) -> Option<&CameraPose> {
        self.camera.as_ref()
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }
}

impl RenderSink for HeadlessRenderer {
    fn register_mesh(&mut self, key: ChunkKey, mesh: &MeshData) {
        trace!("Registering mesh for chunk {key} ({} faces)", mesh.face_count());
        let uploads = self.meshes.get(&key).map_or(0, |m| m.uploads) + 1;
        self.meshes.insert(
            key,
            RegisteredMesh {
                face_count: mesh.face_count(),
                index_count: mesh.indices.len(),
                uploads,
            },
        );
        self.total_uploads += 1;
    }

    fn unregister_mesh(&mut self, key: ChunkKey) {
        if self.meshes.remove(&key).is_some() {
            trace!("Unregistered mesh for chunk {key}");
            self.total_removals += 1;
        }
    }

    fn update_camera(&mut self, pose: &CameraPose) {
        self.camera = Some(*pose);
    }

    fn resize(&mut self, viewport: Viewport) {
        debug!("Viewport resized to {}x{}", viewport.width, viewport.height);
        self.viewport = Some(viewport);
    }
}
