//! # Block Side Module
//!
//! This module defines the different faces/sides of a voxel block.
//! It provides the neighbor offsets used for face culling and the normals
//! emitted into chunk meshes.

/// Represents the six possible faces of a voxel block.
///
/// Each variant is assigned a unique integer value that indexes the per-face
/// columns of the atlas table.
///
/// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, PartialOrd, Ord)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// This is the order in which faces of a block are emitted into a mesh.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// Offset from a cell to the neighboring cell this face touches.
    pub fn neighbor_offset(self) -> [i32; 3] {
        match self {
            BlockSide::FRONT => [0, 0, 1],
            BlockSide::BACK => [0, 0, -1],
            BlockSide::BOTTOM => [0, -1, 0],
            BlockSide::TOP => [0, 1, 0],
            BlockSide::LEFT => [-1, 0, 0],
            BlockSide::RIGHT => [1, 0, 0],
        }
    }

    /// Outward unit normal of this face.
    pub fn normal(self) -> [f32; 3] {
        let [x, y, z] = self.neighbor_offset();
        [x as f32, y as f32, z as f32]
    }
}
