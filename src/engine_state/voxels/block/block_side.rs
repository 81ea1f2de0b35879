//! # Block Side Module
//!
//! This module defines the different faces/sides of a voxel block.
//! It provides the neighbor offsets used for face culling and the fixed
//! per-direction colors written into the vertex buffer.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The discriminants match the order in which the mesher tests and emits faces
/// for every cell: [BACK, FRONT, LEFT, RIGHT, BOTTOM, TOP]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The back face (facing negative Z)
    BACK = 0,

    /// The front face (facing positive Z)
    FRONT = 1,

    /// The left face (facing negative X)
    LEFT = 2,

    /// The right face (facing positive X)
    RIGHT = 3,

    /// The bottom face (facing negative Y)
    BOTTOM = 4,

    /// The top face (facing positive Y)
    TOP = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in emission order.
    ///
    /// The order is: [BACK, FRONT, LEFT, RIGHT, BOTTOM, TOP]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::BACK,
            BlockSide::FRONT,
            BlockSide::LEFT,
            BlockSide::RIGHT,
            BlockSide::BOTTOM,
            BlockSide::TOP,
        ]
    }

    /// The offset from a cell to the neighbor this face looks at.
    pub fn normal(&self) -> Vector3<i32> {
        match self {
            BlockSide::BACK => Vector3::new(0, 0, -1),
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
        }
    }

    /// The RGB color every vertex of a face on this side is given.
    ///
    /// Color encodes direction, not material. Block-aware tinting is layered on top
    /// by the mesher when a registry is supplied.
    pub fn color(&self) -> [f32; 3] {
        match self {
            BlockSide::BACK => [0.5, 0.5, 0.5],
            BlockSide::FRONT => [0.2, 0.8, 0.2],
            BlockSide::LEFT => [0.3, 0.3, 0.7],
            BlockSide::RIGHT => [0.8, 0.2, 0.2],
            BlockSide::BOTTOM => [0.2, 0.2, 0.2],
            BlockSide::TOP => [0.9, 0.9, 0.1],
        }
    }

    /// Brightness factor applied to a block's base color when meshing with block tints.
    pub fn shade(&self) -> f32 {
        match self {
            BlockSide::TOP => 1.0,
            BlockSide::BACK | BlockSide::FRONT => 0.8,
            BlockSide::LEFT | BlockSide::RIGHT => 0.65,
            BlockSide::BOTTOM => 0.5,
        }
    }

    /// Index of the axis this face is perpendicular to (0 = X, 1 = Y, 2 = Z).
    pub fn axis(&self) -> usize {
        match self {
            BlockSide::LEFT | BlockSide::RIGHT => 0,
            BlockSide::BOTTOM | BlockSide::TOP => 1,
            BlockSide::BACK | BlockSide::FRONT => 2,
        }
    }

    /// Whether the face lies on the positive side of its cell.
    pub fn is_positive(&self) -> bool {
        matches!(self, BlockSide::FRONT | BlockSide::RIGHT | BlockSide::TOP)
    }
}
