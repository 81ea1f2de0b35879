use cgmath::Point3;

use crate::engine_state::{
    rendering::vertex::VERTICES_PER_FACE,
    voxels::block::{block_side::BlockSide, BlockId},
};

/// Corner order for faces whose first in-plane axis runs left to right when viewed
/// from outside: back, front, bottom and top.
const CORNERS_FORWARD: [(i32, i32); VERTICES_PER_FACE] = [(0, 0), (1, 0), (1, 1), (1, 1), (0, 1), (0, 0)];

/// Corner order for the left and right faces.
const CORNERS_REVERSED: [(i32, i32); VERTICES_PER_FACE] = [(1, 1), (0, 1), (0, 0), (0, 0), (1, 0), (1, 1)];

/// The two in-plane axes (u, v) spanned by a face on the given side.
pub fn face_axes(side: BlockSide) -> (usize, usize) {
    match side {
        BlockSide::BACK | BlockSide::FRONT => (0, 1),
        BlockSide::LEFT | BlockSide::RIGHT => (2, 1),
        BlockSide::BOTTOM | BlockSide::TOP => (0, 2),
    }
}

/// Represents a single quad face of a voxel in the mesh.
///
/// A unit face covers one side of one cell. Greedy meshing produces faces that
/// extend `width` cells along the face's u axis and `height` cells along its v axis
/// (see [`face_axes`]) starting from `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// The cell, in chunk coordinates, at the minimum corner of the face
    pub origin: Point3<i32>,
    /// Extent along the u axis in cells
    pub width: i32,
    /// Extent along the v axis in cells
    pub height: i32,
    /// The block the face belongs to
    pub block_id: BlockId,
    /// Which side of the block this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// Creates the face covering one side of the cell at `origin`.
    pub fn new(origin: Point3<i32>, block_id: BlockId, block_side: BlockSide) -> Self {
        Face {
            origin,
            width: 1,
            height: 1,
            block_id,
            block_side,
        }
    }

    /// Number of unit faces this face covers.
    pub fn area(&self) -> i32 {
        self.width * self.height
    }

    /// The six corners of the face's two triangles, in emission order.
    ///
    /// The winding is fixed per side so backface culling in the renderer sees the
    /// same orientation for every face on that side.
    pub fn corners(&self) -> [Point3<f32>; VERTICES_PER_FACE] {
        let axis = self.block_side.axis();
        let (u, v) = face_axes(self.block_side);
        let pattern = match self.block_side {
            BlockSide::LEFT | BlockSide::RIGHT => CORNERS_REVERSED,
            _ => CORNERS_FORWARD,
        };

        let origin = [self.origin.x, self.origin.y, self.origin.z];
        let plane = origin[axis] + i32::from(self.block_side.is_positive());

        pattern.map(|(a, b)| {
            let mut corner = [0; 3];
            corner[axis] = plane;
            corner[u] = origin[u] + a * self.width;
            corner[v] = origin[v] + b * self.height;
            Point3::new(corner[0] as f32, corner[1] as f32, corner[2] as f32)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32, z: f32) -> Point3<f32> {
        Point3::new(x, y, z)
    }

    #[test]
    fn unit_faces_match_reference_winding() {
        let at = |side| Face::new(Point3::new(2, 3, 4), 1, side).corners();

        assert_eq!(
            at(BlockSide::BACK),
            [p(2., 3., 4.), p(3., 3., 4.), p(3., 4., 4.), p(3., 4., 4.), p(2., 4., 4.), p(2., 3., 4.)]
        );
        assert_eq!(
            at(BlockSide::FRONT),
            [p(2., 3., 5.), p(3., 3., 5.), p(3., 4., 5.), p(3., 4., 5.), p(2., 4., 5.), p(2., 3., 5.)]
        );
        assert_eq!(
            at(BlockSide::LEFT),
            [p(2., 4., 5.), p(2., 4., 4.), p(2., 3., 4.), p(2., 3., 4.), p(2., 3., 5.), p(2., 4., 5.)]
        );
        assert_eq!(
            at(BlockSide::RIGHT),
            [p(3., 4., 5.), p(3., 4., 4.), p(3., 3., 4.), p(3., 3., 4.), p(3., 3., 5.), p(3., 4., 5.)]
        );
        assert_eq!(
            at(BlockSide::BOTTOM),
            [p(2., 3., 4.), p(3., 3., 4.), p(3., 3., 5.), p(3., 3., 5.), p(2., 3., 5.), p(2., 3., 4.)]
        );
        assert_eq!(
            at(BlockSide::TOP),
            [p(2., 4., 4.), p(3., 4., 4.), p(3., 4., 5.), p(3., 4., 5.), p(2., 4., 5.), p(2., 4., 4.)]
        );
    }

    #[test]
    fn extents_stretch_along_face_axes() {
        let face = Face {
            origin: Point3::new(0, 5, 0),
            width: 3,
            height: 2,
            block_id: 1,
            block_side: BlockSide::TOP,
        };
        assert_eq!(face.area(), 6);
        assert_eq!(
            face.corners(),
            [p(0., 6., 0.), p(3., 6., 0.), p(3., 6., 2.), p(3., 6., 2.), p(0., 6., 2.), p(0., 6., 0.)]
        );
    }
}
