//! Chunk meshing for voxel rendering.
//!
//! This module converts a chunk's block data into a flat triangle-list vertex buffer.
//! Only faces bordering air are emitted. Inside the chunk that is decided from the
//! chunk itself; on the chunk boundary the mesher either treats the outside as air
//! or, when given a [`BlockLookup`], asks the world what is actually there.

use std::sync::Arc;

use cgmath::Point3;
use log::debug;
use web_time::Instant;

use crate::engine_state::{
    rendering::vertex::{VertexBuffer, VERTICES_PER_FACE},
    voxels::{
        block::{block_side::BlockSide, is_air_id, registry::BlockRegistry},
        chunk::Chunk,
        world::BlockLookup,
    },
};

use super::{face::Face, greedy};

/// How the mesher turns visible block sides into faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeshingStrategy {
    /// One unit face per visible block side, in cell order.
    #[default]
    Culled,
    /// Coplanar visible sides of the same block type are merged into rectangles.
    Greedy,
}

/// Converts chunks into vertex buffers.
///
/// A mesher is cheap to clone and holds no per-chunk state, so one instance can be
/// shared by every meshing task.
#[derive(Debug, Clone, Default)]
pub struct ChunkMesher {
    strategy: MeshingStrategy,
    /// When present, faces are colored by block type instead of by direction only.
    palette: Option<Arc<BlockRegistry>>,
}

impl ChunkMesher {
    /// Creates a mesher that emits one face per visible block side, colored by direction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables greedy face merging.
    pub fn greedy(mut self, enabled: bool) -> Self {
        self.strategy = if enabled {
            MeshingStrategy::Greedy
        } else {
            MeshingStrategy::Culled
        };
        self
    }

    /// Colors faces by the base color of their block, shaded per direction.
    ///
    /// Blocks missing from the registry keep the plain direction color.
    pub fn with_tint(mut self, registry: Arc<BlockRegistry>) -> Self {
        self.palette = Some(registry);
        self
    }

    /// How faces are turned into quads.
    pub fn strategy(&self) -> MeshingStrategy {
        self.strategy
    }

    /// Collects the visible faces of a chunk.
    ///
    /// # Arguments
    /// * `chunk` - The chunk to mesh
    /// * `neighbors` - Optional world lookup used for faces on the chunk boundary
    ///
    /// # Returns
    /// The faces in emission order. For the culled strategy that is cell order
    /// (x outer, then y, then z) with the six sides of each cell in
    /// [`BlockSide::all`] order.
    pub fn generate_faces(&self, chunk: &Chunk, neighbors: Option<&dyn BlockLookup>) -> Vec<Face> {
        if chunk.is_empty() {
            return Vec::new();
        }

        match self.strategy {
            MeshingStrategy::Culled => {
                let mut faces = Vec::new();
                for (local, block_id) in chunk.solid_blocks() {
                    for side in BlockSide::all() {
                        if is_face_visible(chunk, local, side, neighbors) {
                            faces.push(Face::new(local, block_id, side));
                        }
                    }
                }
                faces
            }
            MeshingStrategy::Greedy => greedy::greedy_faces(chunk, |local, side| {
                is_face_visible(chunk, local, side, neighbors)
            }),
        }
    }

    /// Meshes a chunk on its own, treating everything outside it as air.
    pub fn generate_mesh(&self, chunk: &Chunk) -> VertexBuffer {
        self.build(chunk, None)
    }

    /// Meshes a chunk, culling boundary faces against the blocks `world` reports.
    pub fn generate_mesh_in_world(&self, chunk: &Chunk, world: &dyn BlockLookup) -> VertexBuffer {
        self.build(chunk, Some(world))
    }

    fn build(&self, chunk: &Chunk, neighbors: Option<&dyn BlockLookup>) -> VertexBuffer {
        let start = Instant::now();
        let faces = self.generate_faces(chunk, neighbors);

        let mut buffer = VertexBuffer::with_capacity(faces.len() * VERTICES_PER_FACE);
        for face in &faces {
            buffer.push_face(face.corners(), self.face_color(face));
        }

        debug!(
            "Meshed chunk at {:?}: {} faces, {} vertices in {:?}",
            chunk.position(),
            faces.len(),
            buffer.vertex_count(),
            start.elapsed()
        );
        buffer
    }

    fn face_color(&self, face: &Face) -> [f32; 3] {
        let definition = self
            .palette
            .as_ref()
            .and_then(|registry| registry.definition(face.block_id));

        match definition {
            Some(definition) => {
                let shade = face.block_side.shade();
                definition.color.map(|channel| channel * shade)
            }
            None => face.block_side.color(),
        }
    }
}

/// Meshes a chunk in isolation with the default mesher.
pub fn generate_mesh(chunk: &Chunk) -> VertexBuffer {
    ChunkMesher::new().generate_mesh(chunk)
}

/// Whether the given side of the cell at `local` borders air.
///
/// Neighbors outside the chunk are air unless `neighbors` says otherwise.
pub(super) fn is_face_visible(
    chunk: &Chunk,
    local: Point3<i32>,
    side: BlockSide,
    neighbors: Option<&dyn BlockLookup>,
) -> bool {
    let neighbor = local + side.normal();
    if Chunk::flatten(neighbor.x, neighbor.y, neighbor.z).is_some() {
        return chunk.is_air(neighbor.x, neighbor.y, neighbor.z);
    }

    match neighbors {
        Some(lookup) => {
            let world = chunk.to_world(neighbor);
            is_air_id(lookup.block_at(world.x, world.y, world.z))
        }
        None => true,
    }
}
