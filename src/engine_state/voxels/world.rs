//! # World Module
//!
//! This module provides the `World` struct which manages the loaded chunks of the
//! voxel world and answers world-space queries against them.
//!
//! ## Architecture
//!
//! The world is a single layer of chunks in chunk-Y. Chunks are stored sparsely in a
//! hash map keyed by their horizontal chunk coordinate `(cx, cz)`. A key that is not
//! present is "not generated yet" and reads as air.
//!
//! ## Coordinate Mapping
//!
//! World block coordinates map to chunk coordinates with floor division and to local
//! coordinates with floor modulo (`div_euclid` / `rem_euclid`), so `x = -1` belongs
//! to chunk `-1` at local `15` rather than to chunk `0`. Float positions are floored
//! to block coordinates first.

use std::collections::HashMap;
use std::sync::Arc;

use cgmath::{Point2, Point3};
use log::{debug, info};
use web_time::Instant;

use super::block::{BlockId, AIR};
use super::chunk::{Chunk, CHUNK_DIMENSION};
use super::terrain::TerrainGenerator;

/// Default half-extent, in chunks, of the square generated by [`World::init_start_map`].
pub const START_MAP_RADIUS: i32 = 2;

/// Read access to blocks by integer world coordinates.
///
/// This is the capability the mesher uses to look across chunk boundaries.
pub trait BlockLookup {
    /// The block at world block coordinates, air when nothing is loaded there.
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId;
}

/// Splits a world block coordinate into (chunk coordinate, local coordinate).
#[inline]
pub fn split_coordinate(world: i32) -> (i32, i32) {
    (
        world.div_euclid(CHUNK_DIMENSION),
        world.rem_euclid(CHUNK_DIMENSION),
    )
}

/// Floors a world-space position component to the block that contains it.
#[inline]
pub fn block_coordinate(world: f32) -> i32 {
    world.floor() as i32
}

/// Represents a voxel world composed of multiple chunks.
pub struct World {
    /// A mapping from horizontal chunk coordinates to chunk data.
    /// Every chunk's own position equals its key.
    chunks: HashMap<Point2<i32>, Arc<Chunk>>,

    /// Generator used to populate chunks and to answer ground-height queries.
    generator: TerrainGenerator,

    /// Half-extent of the start map in chunks.
    start_radius: i32,
}

impl World {
    /// Creates a new, empty world.
    pub fn new(generator: TerrainGenerator) -> Self {
        Self::with_start_radius(generator, START_MAP_RADIUS)
    }

    /// Creates an empty world whose start map spans `-start_radius..=start_radius`.
    pub fn with_start_radius(generator: TerrainGenerator, start_radius: i32) -> Self {
        World {
            chunks: HashMap::new(),
            generator,
            start_radius: start_radius.max(0),
        }
    }

    /// The generator chunks of this world come from.
    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    /// The chunk coordinates covered by the start map, row by row.
    pub fn start_map_coordinates(&self) -> impl Iterator<Item = Point2<i32>> {
        let radius = self.start_radius;
        (-radius..=radius).flat_map(move |cx| (-radius..=radius).map(move |cz| Point2::new(cx, cz)))
    }

    /// Generates the square of chunks around the origin and stores them.
    ///
    /// Any chunk already stored at those coordinates is replaced. Because generation
    /// is deterministic, repeated calls leave the world with identical contents.
    ///
    /// # Returns
    /// Every chunk now stored in the world, in map order.
    pub fn init_start_map(&mut self) -> Vec<Arc<Chunk>> {
        let start = Instant::now();

        let coordinates: Vec<_> = self.start_map_coordinates().collect();
        for coordinate in coordinates {
            let chunk = self.generator.generate_chunk(coordinate.x, coordinate.y);
            self.insert_chunk(chunk);
        }

        info!(
            "Generated start map of {} chunks in {:?}",
            self.chunks.len(),
            start.elapsed()
        );

        self.chunks.values().cloned().collect()
    }

    /// Stores a chunk under its own horizontal coordinate, replacing any previous one.
    pub fn insert_chunk(&mut self, chunk: Chunk) -> Arc<Chunk> {
        let position = chunk.position();
        let key = Point2::new(position.x, position.z);
        debug!("Storing chunk at ({}, {})", key.x, key.y);

        let chunk = Arc::new(chunk);
        self.chunks.insert(key, chunk.clone());
        chunk
    }

    /// Retrieves the chunk at the specified horizontal chunk coordinates.
    pub fn get_chunk_at(&self, cx: i32, cz: i32) -> Option<&Arc<Chunk>> {
        self.chunks.get(&Point2::new(cx, cz))
    }

    /// Iterates `(key, chunk)` pairs in map order.
    pub fn chunks(&self) -> impl Iterator<Item = (Point2<i32>, &Arc<Chunk>)> {
        self.chunks.iter().map(|(key, chunk)| (*key, chunk))
    }

    /// Number of stored chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// The block containing a world-space position.
    ///
    /// Positions in chunks that were never generated, and positions outside the
    /// single chunk layer vertically, read as air.
    pub fn get_block_at(&self, x: f32, y: f32, z: f32) -> BlockId {
        self.block_at(block_coordinate(x), block_coordinate(y), block_coordinate(z))
    }

    /// Height of the ground at a horizontal world-space position.
    ///
    /// Answered from the terrain function, not from stored blocks. That is only
    /// correct while blocks cannot be placed or destroyed; once they can, this has
    /// to scan `get_block_at` downwards from the top of the chunk layer.
    pub fn get_ground_height(&self, x: f32, z: f32) -> i32 {
        self.generator
            .height_at(block_coordinate(x), block_coordinate(z))
    }
}

impl BlockLookup for World {
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId {
        if !(0..CHUNK_DIMENSION).contains(&y) {
            return AIR;
        }

        let (cx, local_x) = split_coordinate(x);
        let (cz, local_z) = split_coordinate(z);

        match self.get_chunk_at(cx, cz) {
            Some(chunk) => chunk.get_block(local_x, y, local_z),
            None => AIR,
        }
    }
}

impl BlockLookup for Chunk {
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId {
        let origin = self.to_world(Point3::new(0, 0, 0));
        self.get_block(x - origin.x, y - origin.y, z - origin.z)
    }
}
