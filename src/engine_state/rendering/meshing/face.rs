use cgmath::Point3;

use crate::engine_state::voxels::block::{block_side::BlockSide, UvRect};

/// Represents a single quad face of a voxel in the mesh.
///
/// A face is defined by four corner points listed counter-clockwise when seen
/// from outside the block, so that `(0, 1, 2)` and `(0, 2, 3)` are both front
/// facing for a renderer that culls clockwise triangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Corners in chunk-local coordinates, counter-clockwise from outside
    pub corners: [Point3<f32>; 4],
    /// Texture coordinates matching `corners`
    pub uvs: [[f32; 2]; 4],
    /// Which side of the block this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// Creates a new face for a voxel at the given chunk-local coordinates.
    ///
    /// # Arguments
    /// * `i`, `j`, `k` - The coordinates of the voxel in chunk space
    /// * `block_side` - Which side of the block this face represents
    /// * `uv` - The atlas rectangle to map onto the face
    pub fn new(i: usize, j: usize, k: usize, block_side: BlockSide, uv: UvRect) -> Self {
        let (x, y, z) = (i as f32, j as f32, k as f32);
        let p = Point3::new;

        let corners = match block_side {
            BlockSide::FRONT => [
                p(x, y, z + 1.0),
                p(x + 1.0, y, z + 1.0),
                p(x + 1.0, y + 1.0, z + 1.0),
                p(x, y + 1.0, z + 1.0),
            ],
            BlockSide::BACK => [
                p(x + 1.0, y, z),
                p(x, y, z),
                p(x, y + 1.0, z),
                p(x + 1.0, y + 1.0, z),
            ],
            BlockSide::BOTTOM => [
                p(x, y, z),
                p(x + 1.0, y, z),
                p(x + 1.0, y, z + 1.0),
                p(x, y, z + 1.0),
            ],
            BlockSide::TOP => [
                p(x, y + 1.0, z + 1.0),
                p(x + 1.0, y + 1.0, z + 1.0),
                p(x + 1.0, y + 1.0, z),
                p(x, y + 1.0, z),
            ],
            BlockSide::LEFT => [
                p(x, y, z),
                p(x, y, z + 1.0),
                p(x, y + 1.0, z + 1.0),
                p(x, y + 1.0, z),
            ],
            BlockSide::RIGHT => [
                p(x + 1.0, y, z + 1.0),
                p(x + 1.0, y, z),
                p(x + 1.0, y + 1.0, z),
                p(x + 1.0, y + 1.0, z + 1.0),
            ],
        };

        // Corner 0 is the lower-left of the face as seen from outside.
        let [u, v] = uv.origin;
        let s = uv.size;
        let uvs = [[u, v + s], [u + s, v + s], [u + s, v], [u, v]];

        Face {
            corners,
            uvs,
            block_side,
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{EuclideanSpace, InnerSpace, Vector3};

    use super::*;

    #[test]
    fn winding_agrees_with_normal() {
        let uv = UvRect {
            origin: [0.0, 0.0],
            size: 1.0 / 16.0,
        };
        for side in BlockSide::all() {
            let face = Face::new(2, 3, 4, side, uv);
            let [a, b, c, d] = face.corners;
            let normal: Vector3<f32> = side.normal().into();

            for (p0, p1, p2) in [(a, b, c), (a, c, d)] {
                let cross = (p1 - p0).cross(p2 - p0);
                assert!(cross.dot(normal) > 0.0, "{side:?} is wound clockwise");
            }

            // The face lies on the outer plane of the cell.
            let center = Point3::centroid(&face.corners);
            let offset = center - Point3::new(2.5, 3.5, 4.5);
            assert!((offset - normal * 0.5).magnitude() < 1e-6, "{side:?} misplaced");
        }
    }
}
