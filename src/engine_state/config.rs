//! # Engine Configuration
//!
//! Tunables for world generation and meshing. Every field has a default, so an
//! empty JSON object (or no file at all) yields the standard world.
//!
//! ```json
//! {
//!     "terrain": { "base_height": 6, "amplitude": 2.5 },
//!     "start_radius": 3,
//!     "greedy_meshing": true
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use super::voxels::{
    block::block_type::BlockType,
    terrain::{DEFAULT_AMPLITUDE, DEFAULT_BASE_HEIGHT, DEFAULT_WAVELENGTH},
    world::START_MAP_RADIUS,
};

/// Largest terrain height, above or below zero, a configuration may produce.
pub const MAX_TERRAIN_EXTENT: f64 = 1_048_576.0;

/// Parameters of the terrain height function and the blocks it places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Height of the terrain where both wave terms are zero
    pub base_height: i32,
    /// Peak deviation of each wave term
    pub amplitude: f64,
    /// Horizontal stretch of the waves, in blocks
    pub wavelength: f64,
    /// Registry key of the block filling columns below the surface
    pub stone: String,
    /// Registry key of the surface block
    pub grass: String,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig {
            base_height: DEFAULT_BASE_HEIGHT,
            amplitude: DEFAULT_AMPLITUDE,
            wavelength: DEFAULT_WAVELENGTH,
            stone: BlockType::STONE.key().to_string(),
            grass: BlockType::GRASS.key().to_string(),
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Terrain height function and blocks
    pub terrain: TerrainConfig,
    /// The start map spans chunk coordinates `-start_radius..=start_radius` on both axes
    pub start_radius: i32,
    /// Worker threads for generation and meshing; `0` uses one per available core
    pub worker_threads: usize,
    /// Cull faces between two loaded chunks instead of treating the outside as air
    pub cull_chunk_seams: bool,
    /// Merge coplanar faces of the same block into larger quads
    pub greedy_meshing: bool,
    /// Color faces by block type instead of by direction only
    pub tint_by_block: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            terrain: TerrainConfig::default(),
            start_radius: START_MAP_RADIUS,
            worker_threads: 0,
            cull_chunk_seams: true,
            greedy_meshing: false,
            tint_by_block: false,
        }
    }
}

impl WorldConfig {
    /// Parses a configuration from JSON text. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: WorldConfig =
            serde_json::from_str(json).context("invalid world configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        Self::from_json_str(&json)
            .with_context(|| format!("failed to load config file {}", path.display()))
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize world configuration")
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.terrain.wavelength.is_finite() && self.terrain.wavelength > 0.0,
            "terrain.wavelength must be a positive number, got {}",
            self.terrain.wavelength
        );
        ensure!(
            self.terrain.amplitude.is_finite(),
            "terrain.amplitude must be finite"
        );
        let extent = f64::from(self.terrain.base_height).abs() + 2.0 * self.terrain.amplitude.abs();
        ensure!(
            extent <= MAX_TERRAIN_EXTENT,
            "|terrain.base_height| + 2 * |terrain.amplitude| must not exceed {}, got {}",
            MAX_TERRAIN_EXTENT,
            extent
        );
        ensure!(
            self.start_radius >= 0,
            "start_radius must not be negative, got {}",
            self.start_radius
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = WorldConfig::from_json_str("{}").unwrap();
        assert_eq!(config, WorldConfig::default());
        assert_eq!(config.terrain.stone, "base:stone");
        assert_eq!(config.start_radius, 2);
        assert!(config.cull_chunk_seams);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = WorldConfig::from_json_str(
            r#"{ "terrain": { "amplitude": 1.5 }, "greedy_meshing": true }"#,
        )
        .unwrap();

        assert_eq!(config.terrain.amplitude, 1.5);
        assert_eq!(config.terrain.base_height, 5);
        assert!(config.greedy_meshing);
        assert!(!config.tint_by_block);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(WorldConfig::from_json_str(r#"{ "terrain": { "wavelength": 0 } }"#).is_err());
        assert!(WorldConfig::from_json_str(r#"{ "start_radius": -1 }"#).is_err());
        assert!(WorldConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn terrain_heights_beyond_the_extent_are_rejected() {
        let steep = WorldConfig::from_json_str(r#"{ "terrain": { "amplitude": 1e12 } }"#);
        assert!(format!("{:#}", steep.unwrap_err()).contains("terrain.amplitude"));

        let high = format!(r#"{{ "terrain": {{ "base_height": {} }} }}"#, i32::MAX);
        assert!(WorldConfig::from_json_str(&high).is_err());
        let deep = format!(r#"{{ "terrain": {{ "base_height": {} }} }}"#, i32::MIN);
        assert!(WorldConfig::from_json_str(&deep).is_err());

        let tall = WorldConfig::from_json_str(
            r#"{ "terrain": { "base_height": -1000, "amplitude": -500 } }"#,
        )
        .unwrap();
        assert_eq!(tall.terrain.amplitude, -500.0);
    }

    #[test]
    fn serialized_config_parses_back() {
        let mut config = WorldConfig::default();
        config.worker_threads = 3;
        let json = config.to_json_string().unwrap();
        assert_eq!(WorldConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn missing_file_names_the_path() {
        let error = WorldConfig::load("/nonexistent/world.json").unwrap_err();
        assert!(format!("{error:#}").contains("/nonexistent/world.json"));
    }
}
