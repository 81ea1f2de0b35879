//! # Engine State Module
//!
//! The core engine module that manages the state and functionality of the voxel engine.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `config` - Serializable engine configuration
//! * `player` - First-person movement and collisions
//! * `performance` - Frame rate statistics
//! * `rendering` - Meshing, mesh management and the render backend seam
//! * `task_management` - Manages asynchronous tasks and worker threads
//! * `voxels` - Handles voxel data, chunks, and world generation
//!
//! ## Architecture
//!
//! `EngineState` is the central coordinator. It owns the world (shared with
//! worker threads through an `MtResource`), the task manager that generates and
//! meshes chunks, the renderer that uploads and draws meshes, and the player.
//!
//! ## Start Map Pipeline
//!
//! 1. One generation task per start-map chunk runs on the workers
//! 2. The owning thread stores the chunks as results arrive
//! 3. Barrier: meshing starts only after every chunk is stored, so seam culling
//!    sees all neighbors
//! 4. One meshing task per chunk runs on the workers, reading the world
//! 5. Finished meshes are uploaded to the backend

use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use cgmath::Point3;
use log::info;
use web_time::Instant;

use crate::core::MtResource;

pub mod config;
pub mod performance;
pub mod player;
pub mod rendering;
pub mod task_management;
pub mod voxels;

pub use config::{TerrainConfig, WorldConfig};
pub use performance::{FrameReport, FrameStats};
pub use player::{Player, PlayerAction};

use rendering::{meshing::ChunkMesher, ChunkRenderer, RenderBackend};
use task_management::{resolve_worker_count, task::TaskContext, TaskManager};
use voxels::{
    block::registry::BlockRegistry, chunk::Chunk,
    tasks::chunk_generation_task::ChunkGenerationTask, terrain::TerrainGenerator, world::World,
};

/// The main state container for the voxel engine.
///
/// # Examples
///
/// ```
/// use voxel_world::engine_state::{
///     rendering::HeadlessBackend, voxels::block::registry::BlockRegistry, EngineState,
///     PlayerAction, WorldConfig,
/// };
/// use web_time::Instant;
///
/// let mut engine = EngineState::new(
///     WorldConfig::default(),
///     BlockRegistry::builtin(),
///     HeadlessBackend::new(),
/// )
/// .unwrap();
/// engine.init_start_map().unwrap();
///
/// engine.update(&PlayerAction::default(), 1.0 / 60.0);
/// engine.render_frame(Instant::now()).unwrap();
/// ```
pub struct EngineState<B: RenderBackend> {
    /// Configuration the engine was built with
    config: WorldConfig,
    /// Block types known to the engine
    registry: Arc<BlockRegistry>,
    /// The voxel world containing all chunk data
    world: MtResource<World>,
    /// Task manager for generation and meshing
    task_manager: TaskManager,
    /// Uploads and draws chunk meshes
    renderer: ChunkRenderer<B>,
    /// The local player
    player: Player,
    /// Frame rate statistics
    frame_stats: FrameStats,
}

impl<B: RenderBackend> EngineState<B> {
    /// Creates a new engine state with all subsystems initialized.
    ///
    /// No chunks are generated yet; call [`EngineState::init_start_map`].
    ///
    /// # Arguments
    /// * `config` - Engine configuration
    /// * `registry` - Block registry, frozen after mods registered their blocks
    /// * `backend` - The render backend meshes are uploaded to
    ///
    /// # Errors
    /// Fails if the terrain configuration names blocks missing from the registry.
    pub fn new(config: WorldConfig, registry: BlockRegistry, backend: B) -> Result<Self> {
        let registry = Arc::new(registry);
        let generator = TerrainGenerator::from_config(&config.terrain, &registry)
            .context("invalid terrain configuration")?;
        let world = MtResource::new(World::with_start_radius(generator, config.start_radius));

        let mut mesher = ChunkMesher::new().greedy(config.greedy_meshing);
        if config.tint_by_block {
            mesher = mesher.with_tint(registry.clone());
        }

        let context = TaskContext::new(world.clone(), mesher, config.cull_chunk_seams);
        let task_manager = TaskManager::new(resolve_worker_count(config.worker_threads), context);

        info!(
            "Engine created: {} block types, start radius {}, meshing {:?}, seam culling {}",
            registry.len(),
            config.start_radius,
            task_manager.context().mesher.strategy(),
            config.cull_chunk_seams
        );

        Ok(EngineState {
            config,
            registry,
            world,
            task_manager,
            renderer: ChunkRenderer::new(backend),
            player: Player::default(),
            frame_stats: FrameStats::new(Instant::now()),
        })
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Block types known to the engine.
    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    /// Shared handle to the world.
    pub fn world(&self) -> &MtResource<World> {
        &self.world
    }

    /// The local player.
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The renderer holding every uploaded chunk mesh.
    pub fn renderer(&self) -> &ChunkRenderer<B> {
        &self.renderer
    }

    /// The worker pool generating and meshing chunks.
    pub fn task_manager(&self) -> &TaskManager {
        &self.task_manager
    }

    /// Generates, meshes and uploads the start map.
    ///
    /// Blocks until every chunk is generated, meshed and uploaded. Calling it again
    /// regenerates the same chunks and replaces their meshes.
    ///
    /// # Returns
    /// The number of chunks in the world afterwards.
    ///
    /// # Errors
    /// Fails if a start map chunk could not be generated or meshed, or if the
    /// backend rejects an upload.
    pub fn init_start_map(&mut self) -> Result<usize> {
        let start = Instant::now();

        let (generator, coordinates) = {
            let world = self.world.get();
            let coordinates: Vec<_> = world.start_map_coordinates().collect();
            (*world.generator(), coordinates)
        };
        for coordinate in &coordinates {
            self.task_manager
                .publish_task(Box::new(ChunkGenerationTask::new(
                    generator,
                    coordinate.x,
                    coordinate.y,
                )));
        }
        self.task_manager.run_until_idle();

        let missing = {
            let world = self.world.get();
            coordinates
                .iter()
                .filter(|coordinate| world.get_chunk_at(coordinate.x, coordinate.y).is_none())
                .count()
        };
        ensure!(
            missing == 0,
            "{} of {} start map chunks failed to generate",
            missing,
            coordinates.len()
        );

        let chunk_count = self.world.get().chunk_count();
        info!(
            "Generated {} start map chunks in {:?}",
            chunk_count,
            start.elapsed()
        );

        let chunks: Vec<Arc<Chunk>> = self
            .world
            .get()
            .chunks()
            .map(|(_, chunk)| chunk.clone())
            .collect();
        for chunk in chunks {
            let task = self.task_manager.context().mesh_task(chunk);
            self.task_manager.publish_task(Box::new(task));
        }
        self.task_manager.run_until_idle();

        let mesh_manager = &self.task_manager.context().mesh_manager;
        let unmeshed = coordinates
            .iter()
            .filter(|coordinate| {
                !mesh_manager.is_chunk_meshed(Point3::new(coordinate.x, 0, coordinate.y))
            })
            .count();
        ensure!(
            unmeshed == 0,
            "{} of {} start map chunks failed to mesh",
            unmeshed,
            coordinates.len()
        );

        let uploaded = self.upload_pending_meshes()?;
        info!(
            "Start map ready: {} chunks, {} with geometry, in {:?}",
            chunk_count,
            uploaded,
            start.elapsed()
        );

        Ok(chunk_count)
    }

    /// Schedules generation of one more chunk, meshed as soon as it is stored.
    ///
    /// Its mesh is uploaded by a later [`EngineState::process_tasks`]. Neighbors
    /// that were meshed earlier keep their faces toward the new chunk.
    pub fn request_chunk(&mut self, cx: i32, cz: i32) {
        let generator = *self.world.get().generator();
        self.task_manager
            .publish_task(Box::new(ChunkGenerationTask::with_meshing(generator, cx, cz)));
    }

    /// Applies finished task results, dispatches queued tasks and uploads new meshes.
    ///
    /// Never blocks on workers. Call once per frame.
    ///
    /// # Returns
    /// The number of chunks that received new geometry.
    pub fn process_tasks(&mut self) -> Result<usize> {
        self.task_manager.process_completed_tasks();
        self.task_manager.process_queued_tasks();
        self.upload_pending_meshes()
    }

    /// Blocks until all scheduled work is done, then uploads the results.
    pub fn finish_tasks(&mut self) -> Result<usize> {
        self.task_manager.run_until_idle();
        self.upload_pending_meshes()
    }

    fn upload_pending_meshes(&mut self) -> Result<usize> {
        let pending = self.task_manager.context_mut().mesh_manager.take_pending();
        if pending.is_empty() {
            return Ok(0);
        }

        let uploaded = self
            .renderer
            .upload_all(pending)
            .context("failed to upload chunk meshes")?;
        Ok(uploaded)
    }

    /// Moves the player by one simulation step.
    pub fn update(&mut self, actions: &PlayerAction, dt: f32) {
        let world = self.world.get();
        self.player.update(&world, actions, dt);
    }

    /// Rotates the player's view by a mouse movement.
    pub fn handle_mouse_input(&mut self, dx: f64, dy: f64) {
        self.player.handle_mouse_input(dx, dy);
    }

    /// Processes tasks, draws every chunk and records the frame.
    ///
    /// # Arguments
    /// * `now` - The time the frame finished
    ///
    /// # Returns
    /// A frame report whenever a one-second measurement window completes.
    pub fn render_frame(&mut self, now: Instant) -> Result<Option<FrameReport>> {
        self.process_tasks()?;
        self.renderer
            .draw_frame()
            .context("failed to draw frame")?;

        let report = self.frame_stats.update(now);
        if let Some(report) = report {
            info!(
                "FPS: {} | Frame Time: {:.2} ms",
                report.fps, report.frame_time_ms
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::HeadlessBackend;

    fn engine(config: WorldConfig) -> EngineState<HeadlessBackend> {
        EngineState::new(config, BlockRegistry::builtin(), HeadlessBackend::new()).unwrap()
    }

    #[test]
    fn unknown_terrain_blocks_are_rejected() {
        let mut config = WorldConfig::default();
        config.terrain.grass = "base:marble".to_string();

        let result = EngineState::new(config, BlockRegistry::builtin(), HeadlessBackend::new());
        let message = format!("{:#}", result.err().unwrap());
        assert!(message.contains("base:marble"));
    }

    #[test]
    fn start_map_is_generated_meshed_and_uploaded() {
        let mut engine = engine(WorldConfig::default());
        assert_eq!(engine.init_start_map().unwrap(), 25);

        assert_eq!(engine.task_manager().context().mesh_manager.meshed_count(), 25);
        assert_eq!(engine.renderer().renderable_count(), 25);
        assert_eq!(engine.renderer().backend().uploads().len(), 25);
    }

    #[test]
    fn seam_culling_reduces_uploaded_vertices() {
        let uploaded_vertices = |cull_chunk_seams| {
            let mut engine = engine(WorldConfig {
                cull_chunk_seams,
                start_radius: 1,
                ..WorldConfig::default()
            });
            engine.init_start_map().unwrap();
            engine
                .renderer()
                .backend()
                .uploads()
                .iter()
                .map(|upload| upload.vertex_count)
                .sum::<usize>()
        };

        assert!(uploaded_vertices(true) < uploaded_vertices(false));
    }

    #[test]
    fn requested_chunks_arrive_after_processing() {
        let mut engine = engine(WorldConfig {
            start_radius: 0,
            ..WorldConfig::default()
        });
        engine.init_start_map().unwrap();
        engine.request_chunk(5, -5);
        engine.finish_tasks().unwrap();

        assert!(engine.world().get().get_chunk_at(5, -5).is_some());
        assert!(engine.renderer().has_renderable(Point3::new(5, 0, -5)));
    }

    #[test]
    fn frames_draw_every_renderable() {
        let mut engine = engine(WorldConfig {
            start_radius: 1,
            worker_threads: 1,
            ..WorldConfig::default()
        });
        engine.init_start_map().unwrap();

        let start = Instant::now();
        engine.render_frame(start).unwrap();
        assert_eq!(engine.renderer().backend().draws().len(), 9);
    }
}
