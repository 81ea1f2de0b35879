//! # Task System Core Traits
//!
//! This module defines the fundamental building blocks of the task system,
//! which provides a framework for executing work asynchronously across multiple threads.
//!
//! ## Core Components
//! - `Task`: Represents a unit of work that can be executed asynchronously
//! - `TaskResult`: Represents the result of a completed task
//! - `TaskContext`: The owning thread's state that results are applied to
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` is called on the owning thread with the `TaskContext`
//! 5. The result can update the context and spawn follow-up tasks
//!
//! ## Thread Safety
//! - `Task` must be `Send` and `Sync`: the manager keeps a shared handle to every
//!   dispatched task so it can be requeued if its worker dies before starting it
//! - `TaskResult` must be `Send` to be transferred back to the owning thread
//! - Shared state reaches tasks through `MtResource` handles

use std::sync::Arc;

use crate::{
    core::MtResource,
    engine_state::{
        rendering::{
            meshing::{ChunkMesher, MeshManager},
            tasks::chunk_mesh_generation_task::ChunkMeshGenerationTask,
        },
        voxels::{chunk::Chunk, world::World},
    },
};

/// A trait representing a unit of work that can be executed asynchronously.
///
/// Tasks are the primary mechanism for offloading work from the owning thread to
/// background workers. They should be self-contained and own all the data they
/// need to perform their work.
pub trait Task: Send + Sync {
    /// Processes the task and returns a result.
    ///
    /// This runs on a worker thread, or inline on the owning thread when the
    /// manager has no workers.
    ///
    /// # Returns
    /// A boxed `TaskResult` that will be processed on the owning thread.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// A trait representing the result of processing a `Task`.
///
/// Task results are processed on the owning thread and can:
/// - Store generated data in the world
/// - Hand finished meshes to the mesh manager
/// - Spawn new tasks for further processing
pub trait TaskResult: Send {
    /// Applies the result on the owning thread.
    ///
    /// # Arguments
    /// * `context` - The engine state results are allowed to modify
    ///
    /// # Returns
    /// Follow-up tasks to schedule (can be empty).
    fn handle_result(self: Box<Self>, context: &mut TaskContext) -> Vec<Box<dyn Task + Send>>;
}

/// State owned by the thread that drives the [`TaskManager`](super::TaskManager).
pub struct TaskContext {
    /// The world chunks are stored in and meshing workers read from
    pub world: MtResource<World>,
    /// Collects meshes until the renderer uploads them
    pub mesh_manager: MeshManager,
    /// Mesher handed to every meshing task
    pub mesher: ChunkMesher,
    /// Whether meshing tasks consult the world for blocks across chunk seams
    pub cull_chunk_seams: bool,
}

impl TaskContext {
    /// Creates a context with an empty mesh manager.
    pub fn new(world: MtResource<World>, mesher: ChunkMesher, cull_chunk_seams: bool) -> Self {
        TaskContext {
            world,
            mesh_manager: MeshManager::new(),
            mesher,
            cull_chunk_seams,
        }
    }

    /// Builds the meshing task for a stored chunk using this context's settings.
    pub fn mesh_task(&self, chunk: Arc<Chunk>) -> ChunkMeshGenerationTask {
        let world = self.cull_chunk_seams.then(|| self.world.clone());
        ChunkMeshGenerationTask::new(chunk, self.mesher.clone(), world)
    }
}
