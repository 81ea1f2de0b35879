//! Greedy meshing implementation for voxel rendering.
//!
//! This module implements the greedy meshing algorithm which combines adjacent coplanar
//! faces of the same block type into larger quads, reducing the number of vertices
//! needed to render a chunk. The merged faces cover exactly the unit faces the culled
//! mesher would emit, so the rendered surface is identical.
//!
//! For every side and every slice of the chunk along that side's axis, a 2D mask of
//! visible faces is built. Rectangles are then grown from the mask row by row: first
//! as wide as possible along u, then as tall as every row allows along v.

use cgmath::Point3;

use crate::engine_state::voxels::{
    block::{block_side::BlockSide, BlockId},
    chunk::{Chunk, CHUNK_DIMENSION},
};

use super::face::{face_axes, Face};

const SLICE_DIMENSION: usize = CHUNK_DIMENSION as usize;

/// Visible faces of one slice, indexed `[v * SLICE_DIMENSION + u]`.
type SliceMask = [Option<BlockId>; SLICE_DIMENSION * SLICE_DIMENSION];

/// Produces merged faces for every side of the chunk.
///
/// # Arguments
/// * `chunk` - The chunk to mesh
/// * `is_visible` - Decides whether the given side of the solid cell at a local
///   position borders air
///
/// # Returns
/// Faces grouped by side in [`BlockSide::all`] order, then by slice.
pub fn greedy_faces<F>(chunk: &Chunk, is_visible: F) -> Vec<Face>
where
    F: Fn(Point3<i32>, BlockSide) -> bool,
{
    let mut faces = Vec::new();

    for side in BlockSide::all() {
        for depth in 0..CHUNK_DIMENSION {
            let mut mask = build_mask(chunk, side, depth, &is_visible);
            merge_mask(&mut mask, side, depth, &mut faces);
        }
    }

    faces
}

/// Local position of the cell at `(u, v)` in slice `depth` of `side`.
fn cell_position(side: BlockSide, depth: i32, u: i32, v: i32) -> Point3<i32> {
    let (u_axis, v_axis) = face_axes(side);
    let mut position = [0; 3];
    position[side.axis()] = depth;
    position[u_axis] = u;
    position[v_axis] = v;
    Point3::new(position[0], position[1], position[2])
}

fn build_mask<F>(chunk: &Chunk, side: BlockSide, depth: i32, is_visible: &F) -> SliceMask
where
    F: Fn(Point3<i32>, BlockSide) -> bool,
{
    let mut mask = [None; SLICE_DIMENSION * SLICE_DIMENSION];

    for v in 0..CHUNK_DIMENSION {
        for u in 0..CHUNK_DIMENSION {
            let local = cell_position(side, depth, u, v);
            if chunk.is_air(local.x, local.y, local.z) || !is_visible(local, side) {
                continue;
            }
            mask[v as usize * SLICE_DIMENSION + u as usize] =
                Some(chunk.get_block(local.x, local.y, local.z));
        }
    }

    mask
}

/// Consumes the mask, emitting one face per maximal rectangle.
fn merge_mask(mask: &mut SliceMask, side: BlockSide, depth: i32, faces: &mut Vec<Face>) {
    for v in 0..SLICE_DIMENSION {
        let mut u = 0;
        while u < SLICE_DIMENSION {
            let Some(block_id) = mask[v * SLICE_DIMENSION + u] else {
                u += 1;
                continue;
            };

            let mut width = 1;
            while u + width < SLICE_DIMENSION && mask[v * SLICE_DIMENSION + u + width] == Some(block_id)
            {
                width += 1;
            }

            let mut height = 1;
            'grow: while v + height < SLICE_DIMENSION {
                let row = (v + height) * SLICE_DIMENSION;
                for offset in 0..width {
                    if mask[row + u + offset] != Some(block_id) {
                        break 'grow;
                    }
                }
                height += 1;
            }

            for row in v..v + height {
                for column in u..u + width {
                    mask[row * SLICE_DIMENSION + column] = None;
                }
            }

            faces.push(Face {
                origin: cell_position(side, depth, u as i32, v as i32),
                width: width as i32,
                height: height as i32,
                block_id,
                block_side: side,
            });

            u += width;
        }
    }
}
