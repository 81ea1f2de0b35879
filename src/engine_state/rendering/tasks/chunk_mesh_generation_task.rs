//! Task for generating mesh data for chunks in a background thread.
//!
//! This module contains the `ChunkMeshGenerationTask` which is responsible for
//! generating the vertex buffer of a chunk in a background thread. This keeps the
//! owning thread responsive while many chunks are meshed in parallel.

use std::sync::Arc;

use cgmath::Point3;

use crate::{
    core::MtResource,
    engine_state::{
        rendering::{meshing::ChunkMesher, vertex::VertexBuffer},
        task_management::task::{Task, TaskContext, TaskResult},
        voxels::{chunk::Chunk, world::World},
    },
};

/// A task that generates mesh data for a chunk in a background thread.
///
/// This task is responsible for:
/// 1. Meshing the chunk, looking across its seams when a world is attached
/// 2. Handing the vertex buffer to the mesh manager for upload
pub struct ChunkMeshGenerationTask {
    /// The chunk that needs mesh generation
    chunk: Arc<Chunk>,
    /// Mesher configuration shared by all meshing tasks
    mesher: ChunkMesher,
    /// World to consult for neighboring blocks; `None` meshes the chunk in isolation
    world: Option<MtResource<World>>,
}

impl ChunkMeshGenerationTask {
    /// Creates a new chunk mesh generation task.
    ///
    /// # Arguments
    /// * `chunk` - The chunk that needs mesh generation
    /// * `mesher` - The mesher to run
    /// * `world` - Optional world used to cull faces on chunk seams
    pub fn new(chunk: Arc<Chunk>, mesher: ChunkMesher, world: Option<MtResource<World>>) -> Self {
        ChunkMeshGenerationTask {
            chunk,
            mesher,
            world,
        }
    }
}

impl Task for ChunkMeshGenerationTask {
    /// Meshes the chunk on a worker thread.
    ///
    /// The world is only read; workers meshing different chunks hold read guards
    /// at the same time.
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let buffer = match &self.world {
            Some(world) => self
                .mesher
                .generate_mesh_in_world(&self.chunk, &*world.get()),
            None => self.mesher.generate_mesh(&self.chunk),
        };

        Box::new(ChunkMeshGenerationTaskResult {
            chunk_position: self.chunk.position(),
            buffer,
        })
    }
}

/// The result of a chunk mesh generation task.
pub struct ChunkMeshGenerationTaskResult {
    /// Position of the meshed chunk
    chunk_position: Point3<i32>,
    /// The generated vertex buffer
    buffer: VertexBuffer,
}

impl TaskResult for ChunkMeshGenerationTaskResult {
    /// Queues the vertex buffer with the mesh manager. Spawns no follow-up tasks.
    fn handle_result(self: Box<Self>, context: &mut TaskContext) -> Vec<Box<dyn Task + Send>> {
        let ChunkMeshGenerationTaskResult {
            chunk_position,
            buffer,
        } = *self;
        context.mesh_manager.queue_mesh(chunk_position, buffer);
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::{
        block::STONE, chunk::CHUNK_DIMENSION, terrain::TerrainGenerator,
    };

    fn world_with_seam() -> (MtResource<World>, Arc<Chunk>) {
        let mut world = World::new(TerrainGenerator::default());
        let mut left = Chunk::empty(Point3::new(0, 0, 0));
        left.set_block(CHUNK_DIMENSION - 1, 0, 0, STONE);
        let mut right = Chunk::empty(Point3::new(1, 0, 0));
        right.set_block(0, 0, 0, STONE);

        let left = world.insert_chunk(left);
        world.insert_chunk(right);
        (MtResource::new(world), left)
    }

    fn run(task: ChunkMeshGenerationTask, world: MtResource<World>) -> TaskContext {
        let mut context = TaskContext::new(world, ChunkMesher::new(), true);
        let follow_ups = task.process().handle_result(&mut context);
        assert!(follow_ups.is_empty());
        context
    }

    #[test]
    fn attached_world_culls_the_seam() {
        let (world, chunk) = world_with_seam();
        let task = ChunkMeshGenerationTask::new(chunk, ChunkMesher::new(), Some(world.clone()));

        let mut context = run(task, world);
        let pending = context.mesh_manager.take_pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].0, Point3::new(0, 0, 0));
        assert_eq!(pending[0].1.vertex_count(), 30);
    }

    #[test]
    fn detached_task_meshes_in_isolation() {
        let (world, chunk) = world_with_seam();
        let task = ChunkMeshGenerationTask::new(chunk, ChunkMesher::new(), None);

        let mut context = run(task, world);
        assert_eq!(context.mesh_manager.take_pending()[0].1.vertex_count(), 36);
    }
}
