//! # Voxel Engine Core
//!
//! This module contains the voxel data model: blocks, chunks, terrain generation and
//! the world that ties them together.
//!
//! ## Architecture
//!
//! * **Block**: Block ids, the built-in block types, block faces and the registry
//! * **Chunk**: Fixed-size 3D arrays of block ids with total (never faulting) accessors
//! * **Terrain**: The deterministic height function and chunk population
//! * **World**: Stores chunks by horizontal chunk coordinate and answers world-space queries
//! * **Tasks**: Background chunk generation
//!
//! ## Data Flow
//!
//! 1. The world asks the terrain generator for the chunks of the start map
//! 2. Chunks are stored keyed by `(cx, cz)`
//! 3. The mesher turns each chunk into a vertex buffer, optionally consulting the
//!    world for blocks across chunk seams
//! 4. Physics queries the world for block occupancy and ground height
//!
//! ## Thread Safety
//!
//! * Terrain generation is a pure function and can run on any thread
//! * Chunks are immutable once stored and are shared through `Arc`
//! * The world is only mutated while the start map is built

pub mod block;
pub mod chunk;
pub mod tasks;
pub mod terrain;
pub mod world;
