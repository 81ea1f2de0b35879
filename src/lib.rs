#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A chunked voxel world: procedural terrain, face-culled meshing and a
//! multi-threaded generation pipeline, rendered through a pluggable backend.
//!
//! ## Key Modules
//!
//! * `core` - Core utilities and data structures used throughout the engine
//! * `engine_state` - The main engine components including rendering, voxels, and task management
//!
//! ## Architecture
//!
//! The engine keeps a clear separation between:
//! * Voxel data (chunks, terrain, the world map and block registry)
//! * Meshing (culled or greedy geometry, optionally culled across chunk seams)
//! * Task scheduling and execution on worker threads
//! * The render backend that receives vertex buffers
//!
//! ## Usage
//!
//! ```no_run
//! fn main() -> anyhow::Result<()> {
//!     voxel_world::run(None)
//! }
//! ```

use std::path::PathBuf;

use anyhow::Result;
use log::info;
use web_time::{Duration, Instant};

pub mod core;
pub mod engine_state;

use engine_state::{
    rendering::HeadlessBackend, voxels::block::registry::BlockRegistry, EngineState,
    PlayerAction, WorldConfig,
};

/// Simulated frames run by [`run`].
pub const DEMO_FRAMES: u32 = 180;
/// Simulated duration of one frame.
pub const DEMO_FRAME_TIME: Duration = Duration::from_micros(16_667);

/// Initializes logging, builds the world and simulates a short walk across it.
///
/// Rendering goes to the in-memory [`HeadlessBackend`]; frame timings are
/// simulated at 60 frames per second.
///
/// # Arguments
/// * `config_path` - Optional JSON configuration; defaults are used without one
///
/// # Errors
/// Fails if the configuration cannot be loaded or names unknown blocks.
pub fn run(config_path: Option<PathBuf>) -> Result<()> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match config_path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            WorldConfig::load(&path)?
        }
        None => WorldConfig::default(),
    };

    let mut engine = EngineState::new(config, BlockRegistry::builtin(), HeadlessBackend::new())?;
    let config = engine.config();
    info!(
        "Greedy meshing: {}, block tint: {}, worker threads: {}",
        config.greedy_meshing,
        config.tint_by_block,
        engine.task_manager().worker_count()
    );
    engine.init_start_map()?;

    let ground = engine.world().get().get_ground_height(0.0, 0.0);
    info!("Ground height at the origin: {}", ground);

    let walk = PlayerAction {
        move_forward: true,
        ..Default::default()
    };
    let dt = DEMO_FRAME_TIME.as_secs_f32();
    let start = Instant::now();

    for frame in 1..=DEMO_FRAMES {
        engine.handle_mouse_input(0.5, 0.0);
        engine.update(&walk, dt);
        engine.render_frame(start + DEMO_FRAME_TIME * frame)?;
    }

    let player = engine.player();
    let backend = engine.renderer().backend();
    info!(
        "Player at ({:.2}, {:.2}, {:.2}), grounded: {}",
        player.position.x,
        player.position.y,
        player.position.z,
        player.is_grounded()
    );
    info!(
        "Drew {} chunks per frame over {} frames ({} vertices in the last frame)",
        engine.renderer().renderable_count(),
        DEMO_FRAMES,
        backend.drawn_vertices()
    );

    Ok(())
}
