//! # Voxel World Entry Point
//!
//! Calls into the library's `run()` function, passing the optional
//! configuration file given as the first argument.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- world.json
//! ```

use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    voxel_world::run(config_path)
}
