//! # Chunk Iteration Module
//!
//! This module provides an iterator over all non-air blocks in a chunk.
//!
//! ## Order
//!
//! Cells are visited with X as the outermost loop, then Y, then Z. The mesher
//! appends faces in exactly this order, so the layout of a vertex buffer is fully
//! determined by the chunk contents. The solidity bit vector is consulted first so
//! air cells are skipped without reading their ids.

use cgmath::Point3;

use crate::engine_state::voxels::block::BlockId;

use super::{Chunk, CHUNK_DIMENSION};

/// An iterator over all non-air blocks in a chunk.
///
/// Yields the local position of each solid cell together with its block id.
pub struct ChunkBlockIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk,
    /// Current X position within the chunk
    local_x: i32,
    /// Current Y position within the chunk
    local_y: i32,
    /// Current Z position within the chunk
    local_z: i32,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates a new `ChunkBlockIterator` positioned before the first cell.
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        ChunkBlockIterator {
            chunk_ref,
            local_x: 0,
            local_y: 0,
            local_z: 0,
        }
    }

    /// Moves the cursor to the next cell, returning `false` once it leaves the chunk.
    fn advance(&mut self) -> bool {
        self.local_z += 1;
        if self.local_z == CHUNK_DIMENSION {
            self.local_z = 0;
            self.local_y += 1;
            if self.local_y == CHUNK_DIMENSION {
                self.local_y = 0;
                self.local_x += 1;
            }
        }
        self.local_x < CHUNK_DIMENSION
    }
}

impl Iterator for ChunkBlockIterator<'_> {
    type Item = (Point3<i32>, BlockId);

    fn next(&mut self) -> Option<Self::Item> {
        if self.chunk_ref.is_empty() {
            return None;
        }

        while self.local_x < CHUNK_DIMENSION {
            let (x, y, z) = (self.local_x, self.local_y, self.local_z);
            self.advance();

            if !self.chunk_ref.is_air(x, y, z) {
                return Some((Point3::new(x, y, z), self.chunk_ref.get_block(x, y, z)));
            }
        }

        None
    }
}
