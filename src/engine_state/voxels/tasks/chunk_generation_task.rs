//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask` which generates chunk data on a
//! worker thread. Generation is a pure function of the terrain parameters and the
//! chunk coordinates, so the task needs no access to the world while it runs; the
//! finished chunk is stored by its result on the owning thread.

use cgmath::Point2;
use log::debug;

use crate::engine_state::{
    task_management::task::{Task, TaskContext, TaskResult},
    voxels::{chunk::Chunk, terrain::TerrainGenerator},
};

/// A task that generates one chunk of terrain.
///
/// This task is responsible for:
/// 1. Generating the chunk data at the specified coordinates
/// 2. Handing the chunk back for storage in the world
/// 3. Optionally scheduling mesh generation for the stored chunk
pub struct ChunkGenerationTask {
    /// Terrain parameters to generate with
    generator: TerrainGenerator,
    /// The horizontal chunk coordinates to generate
    position: Point2<i32>,
    /// Whether to mesh the chunk as soon as it is stored
    mesh_when_stored: bool,
}

impl ChunkGenerationTask {
    /// Creates a task that only generates and stores the chunk.
    ///
    /// Use this when meshing has to wait for neighboring chunks, as when a whole
    /// area is generated before any of it is meshed.
    pub fn new(generator: TerrainGenerator, cx: i32, cz: i32) -> Self {
        ChunkGenerationTask {
            generator,
            position: Point2::new(cx, cz),
            mesh_when_stored: false,
        }
    }

    /// Creates a task that also schedules meshing once the chunk is stored.
    pub fn with_meshing(generator: TerrainGenerator, cx: i32, cz: i32) -> Self {
        ChunkGenerationTask {
            mesh_when_stored: true,
            ..Self::new(generator, cx, cz)
        }
    }
}

impl Task for ChunkGenerationTask {
    /// Generates the chunk. Runs on a worker thread.
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let chunk = self
            .generator
            .generate_chunk(self.position.x, self.position.y);

        Box::new(ChunkGenerationTaskResult {
            chunk,
            mesh_when_stored: self.mesh_when_stored,
        })
    }
}

/// The result of a chunk generation task.
pub struct ChunkGenerationTaskResult {
    /// The generated chunk
    chunk: Chunk,
    mesh_when_stored: bool,
}

impl TaskResult for ChunkGenerationTaskResult {
    /// Stores the chunk in the world, replacing any chunk at the same coordinates.
    ///
    /// # Returns
    /// The chunk's meshing task if one was requested, otherwise nothing.
    fn handle_result(self: Box<Self>, context: &mut TaskContext) -> Vec<Box<dyn Task + Send>> {
        let ChunkGenerationTaskResult {
            chunk,
            mesh_when_stored,
        } = *self;
        let chunk = context.world.get_mut().insert_chunk(chunk);
        debug!("Stored generated chunk {:?}", chunk.position());

        if mesh_when_stored {
            let mesh_task: Box<dyn Task + Send> = Box::new(context.mesh_task(chunk));
            vec![mesh_task]
        } else {
            Vec::new()
        }
    }
}
