//! # Chunk Module
//!
//! This module provides the `Chunk` struct for managing 16x16x16 blocks of voxel
//! data.
//!
//! ## Storage
//!
//! A chunk keeps two views of the same cells:
//! - `blocks`: a flat array of `CHUNK_VOLUME` block ids, indexed by
//!   `x + y * CHUNK_DIMENSION + z * CHUNK_PLANE_SIZE`
//! - `solid_array`: a bit vector (1 bit per block) mirroring which cells are not air
//!
//! The bit vector answers the air checks issued by the mesher (six per solid cell)
//! without touching the id array, and keeps the solid count cheap to maintain.
//!
//! ## Boundaries
//!
//! Every accessor is total over `i32` coordinates. Reads outside the chunk return
//! air, writes outside the chunk are discarded. Face culling relies on this: a
//! neighbor outside the chunk counts as air, so boundary faces are always emitted
//! unless the caller supplies world-level neighbor data.

use bitvec::vec::BitVec;
use cgmath::Point3;

use super::block::{BlockId, AIR};

pub mod chunk_iteration;

use chunk_iteration::ChunkBlockIterator;

/// The dimension (width, height, depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;
/// The number of blocks in a single 2D plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of blocks in a chunk (CHUNK_DIMENSION³).
pub const CHUNK_VOLUME: usize = (CHUNK_PLANE_SIZE * CHUNK_DIMENSION) as usize;

/// Represents a 16x16x16 collection of voxel blocks in the world.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    /// The world is a single chunk layer, so `y` is always 0 for generated chunks.
    position: Point3<i32>,

    /// Block ids in flattened order.
    blocks: Box<[BlockId]>,

    /// One bit per cell, set when the cell is not air.
    solid_array: BitVec,

    /// Number of set bits in `solid_array`.
    solid_count: usize,
}

impl Chunk {
    /// Creates a new, completely empty chunk (all blocks are air).
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the new chunk
    pub fn empty(position: Point3<i32>) -> Self {
        Chunk {
            position,
            blocks: vec![AIR; CHUNK_VOLUME].into_boxed_slice(),
            solid_array: BitVec::repeat(false, CHUNK_VOLUME),
            solid_count: 0,
        }
    }

    /// The chunk coordinate of this chunk.
    pub fn position(&self) -> Point3<i32> {
        self.position
    }

    /// Converts local coordinates to an index into the block array.
    ///
    /// # Returns
    /// `None` if any coordinate lies outside `[0, CHUNK_DIMENSION)`.
    #[inline]
    pub fn flatten(x: i32, y: i32, z: i32) -> Option<usize> {
        if Self::in_bounds(x, y, z) {
            Some((x + y * CHUNK_DIMENSION + z * CHUNK_PLANE_SIZE) as usize)
        } else {
            None
        }
    }

    /// Inverse of [`Chunk::flatten`] for indices below `CHUNK_VOLUME`.
    #[inline]
    pub fn unflatten(index: usize) -> Point3<i32> {
        let index = index as i32;
        Point3::new(
            index % CHUNK_DIMENSION,
            (index / CHUNK_DIMENSION) % CHUNK_DIMENSION,
            index / CHUNK_PLANE_SIZE,
        )
    }

    #[inline]
    fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        (0..CHUNK_DIMENSION).contains(&x)
            && (0..CHUNK_DIMENSION).contains(&y)
            && (0..CHUNK_DIMENSION).contains(&z)
    }

    /// Writes a block at local coordinates. Out-of-range writes are silently discarded.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, id: BlockId) {
        let Some(index) = Self::flatten(x, y, z) else {
            return;
        };

        let was_solid = self.solid_array[index];
        let is_solid = id != AIR;
        match (was_solid, is_solid) {
            (false, true) => self.solid_count += 1,
            (true, false) => self.solid_count -= 1,
            _ => {}
        }

        self.blocks[index] = id;
        self.solid_array.set(index, is_solid);
    }

    /// Reads the block at local coordinates, or air when out of range.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockId {
        Self::flatten(x, y, z).map_or(AIR, |index| self.blocks[index])
    }

    /// `true` for air cells and for every coordinate outside the chunk.
    pub fn is_air(&self, x: i32, y: i32, z: i32) -> bool {
        Self::flatten(x, y, z).map_or(true, |index| !self.solid_array[index])
    }

    /// Number of non-air cells.
    pub fn solid_count(&self) -> usize {
        self.solid_count
    }

    /// `true` if every cell is air.
    pub fn is_empty(&self) -> bool {
        self.solid_count == 0
    }

    /// Iterates the solid cells in meshing order (x outer, y middle, z inner).
    pub fn solid_blocks(&self) -> ChunkBlockIterator<'_> {
        ChunkBlockIterator::new(self)
    }

    /// Converts local coordinates of this chunk to world block coordinates.
    pub fn to_world(&self, local: Point3<i32>) -> Point3<i32> {
        Point3::new(
            self.position.x * CHUNK_DIMENSION + local.x,
            self.position.y * CHUNK_DIMENSION + local.y,
            self.position.z * CHUNK_DIMENSION + local.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn origin() -> Point3<i32> {
        Point3::new(0, 0, 0)
    }

    #[test]
    fn flatten_is_a_bijection() {
        let mut seen = HashSet::new();
        for z in 0..CHUNK_DIMENSION {
            for y in 0..CHUNK_DIMENSION {
                for x in 0..CHUNK_DIMENSION {
                    let index = Chunk::flatten(x, y, z).unwrap();
                    assert!(index < CHUNK_VOLUME);
                    assert!(seen.insert(index));
                    assert_eq!(Chunk::unflatten(index), Point3::new(x, y, z));
                }
            }
        }
        assert_eq!(seen.len(), CHUNK_VOLUME);
    }

    #[test]
    fn flatten_uses_x_fastest() {
        assert_eq!(Chunk::flatten(1, 0, 0), Some(1));
        assert_eq!(Chunk::flatten(0, 1, 0), Some(16));
        assert_eq!(Chunk::flatten(0, 0, 1), Some(256));
        assert_eq!(Chunk::flatten(16, 0, 0), None);
        assert_eq!(Chunk::flatten(0, -1, 0), None);
    }

    #[test]
    fn out_of_bounds_is_air() {
        let mut chunk = Chunk::empty(origin());
        for z in 0..CHUNK_DIMENSION {
            for y in 0..CHUNK_DIMENSION {
                for x in 0..CHUNK_DIMENSION {
                    chunk.set_block(x, y, z, 1);
                }
            }
        }

        let outside = [
            (-1, 0, 0),
            (0, -1, 0),
            (0, 0, -1),
            (16, 0, 0),
            (0, 16, 0),
            (0, 0, 16),
            (i32::MIN, 3, 3),
            (3, i32::MAX, 3),
        ];
        for (x, y, z) in outside {
            assert!(chunk.is_air(x, y, z), "({x}, {y}, {z}) should be air");
            assert_eq!(chunk.get_block(x, y, z), AIR);
        }
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut chunk = Chunk::empty(origin());
        chunk.set_block(3, 4, 5, 7);
        chunk.set_block(15, 15, 15, u16::MAX);

        assert_eq!(chunk.get_block(3, 4, 5), 7);
        assert_eq!(chunk.get_block(15, 15, 15), u16::MAX);
        assert!(!chunk.is_air(3, 4, 5));
        assert_eq!(chunk.solid_count(), 2);
    }

    #[test]
    fn out_of_range_writes_are_discarded() {
        let mut chunk = Chunk::empty(origin());
        chunk.set_block(-1, 0, 0, 1);
        chunk.set_block(0, 16, 0, 1);
        chunk.set_block(0, 0, 100, 1);

        assert!(chunk.is_empty());
        assert!(chunk.blocks.iter().all(|&id| id == AIR));
    }

    #[test]
    fn writing_air_clears_solidity() {
        let mut chunk = Chunk::empty(origin());
        chunk.set_block(1, 1, 1, 2);
        chunk.set_block(1, 1, 1, 2);
        assert_eq!(chunk.solid_count(), 1);

        chunk.set_block(1, 1, 1, AIR);
        assert!(chunk.is_air(1, 1, 1));
        assert!(chunk.is_empty());
    }

    #[test]
    fn to_world_offsets_by_chunk_position() {
        let chunk = Chunk::empty(Point3::new(-2, 0, 3));
        assert_eq!(chunk.to_world(Point3::new(1, 2, 3)), Point3::new(-31, 2, 51));
    }
}
