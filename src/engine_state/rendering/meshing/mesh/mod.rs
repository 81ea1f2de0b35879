//! Mesh generation for voxel rendering.
//!
//! This module converts chunk block data into flat, GPU-friendly vertex buffers.
//! Faces touching another solid block are culled. Optionally, coplanar faces of the
//! same block type are merged with greedy meshing to cut the vertex count further.
//!
//! # Architecture
//! - [`ChunkMesher`]: Configurable mesher (culled or greedy, direction or block colors)
//! - [`Face`]: A rectangular face on one side of one or more cells
//! - Greedy meshing: Mask-based merging of adjacent coplanar faces
//!
//! # Usage
//! ```
//! use cgmath::Point3;
//! use voxel_world::engine_state::{
//!     rendering::meshing::mesh::generate_mesh,
//!     voxels::{block::STONE, chunk::Chunk},
//! };
//!
//! let mut chunk = Chunk::empty(Point3::new(0, 0, 0));
//! chunk.set_block(0, 0, 0, STONE);
//! assert_eq!(generate_mesh(&chunk).vertex_count(), 36);
//! ```

mod face;
mod greedy;
#[allow(clippy::module_inception)]
mod mesh;

pub use face::{face_axes, Face};
pub use greedy::greedy_faces;
pub use mesh::*;
