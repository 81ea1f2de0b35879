//! # Terrain Generation
//!
//! Heights come from a closed-form function of the horizontal world coordinates:
//!
//! ```text
//! height(x, z) = base + round(sin(x / wavelength) * amplitude + cos(z / wavelength) * amplitude)
//! ```
//!
//! There is no seed and no randomness. The same coordinates always produce the same
//! height, which physics relies on when it asks the world for ground height instead
//! of scanning stored blocks.

use anyhow::{anyhow, Result};
use cgmath::Point3;

use super::block::{registry::BlockRegistry, BlockId, GRASS, STONE};
use super::chunk::{Chunk, CHUNK_DIMENSION};
use crate::engine_state::config::TerrainConfig;

/// Base terrain height in blocks.
pub const DEFAULT_BASE_HEIGHT: i32 = 5;
/// Peak deviation contributed by each of the two wave terms.
pub const DEFAULT_AMPLITUDE: f64 = 3.0;
/// Horizontal stretch applied to world coordinates before the wave terms.
pub const DEFAULT_WAVELENGTH: f64 = 8.0;

/// Stateless, deterministic terrain generator.
///
/// Cheap to copy, so every generation task carries its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainGenerator {
    base_height: i32,
    amplitude: f64,
    wavelength: f64,
    stone: BlockId,
    grass: BlockId,
}

impl TerrainGenerator {
    /// Creates a generator from explicit parameters and block ids.
    ///
    /// # Arguments
    /// * `base_height` - Height where both wave terms are zero
    /// * `amplitude` - Peak deviation of each wave term
    /// * `wavelength` - Horizontal stretch of the waves, in blocks
    /// * `stone` - Block filling columns below the surface
    /// * `grass` - Surface block
    pub fn new(
        base_height: i32,
        amplitude: f64,
        wavelength: f64,
        stone: BlockId,
        grass: BlockId,
    ) -> Self {
        TerrainGenerator {
            base_height,
            amplitude,
            wavelength,
            stone,
            grass,
        }
    }

    /// Builds a generator from configuration, resolving block keys through the registry.
    ///
    /// # Errors
    /// Fails if a configured block key is not registered.
    pub fn from_config(config: &TerrainConfig, registry: &BlockRegistry) -> Result<Self> {
        let resolve = |key: &str| {
            registry
                .id_of(key)
                .ok_or_else(|| anyhow!("terrain block `{key}` is not registered"))
        };

        Ok(TerrainGenerator::new(
            config.base_height,
            config.amplitude,
            config.wavelength,
            resolve(&config.stone)?,
            resolve(&config.grass)?,
        ))
    }

    /// Height of the terrain column at the given world block coordinates.
    ///
    /// The topmost solid block of the column sits at `height - 1`. Heights outside
    /// the `i32` range saturate.
    pub fn height_at(&self, global_x: i32, global_z: i32) -> i32 {
        let wave = (global_x as f64 / self.wavelength).sin() * self.amplitude
            + (global_z as f64 / self.wavelength).cos() * self.amplitude;
        self.base_height.saturating_add(wave.round() as i32)
    }

    /// Generates the chunk at horizontal chunk coordinates `(cx, cz)`.
    ///
    /// Every column is stone below `height - 1`, grass at `height - 1` and air above.
    pub fn generate_chunk(&self, cx: i32, cz: i32) -> Chunk {
        let mut chunk = Chunk::empty(Point3::new(cx, 0, cz));

        for x in 0..CHUNK_DIMENSION {
            for z in 0..CHUNK_DIMENSION {
                let height = self.height_at(cx * CHUNK_DIMENSION + x, cz * CHUNK_DIMENSION + z);

                for y in 0..height.min(CHUNK_DIMENSION) {
                    let id = if y < height - 1 { self.stone } else { self.grass };
                    chunk.set_block(x, y, z, id);
                }
            }
        }

        chunk
    }
}

impl Default for TerrainGenerator {
    fn default() -> Self {
        TerrainGenerator::new(
            DEFAULT_BASE_HEIGHT,
            DEFAULT_AMPLITUDE,
            DEFAULT_WAVELENGTH,
            STONE,
            GRASS,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::AIR;

    #[test]
    fn height_matches_the_formula() {
        let generator = TerrainGenerator::default();
        assert_eq!(generator.height_at(0, 0), 8);

        for (x, z) in [(-40, 13), (7, -7), (100, 250), (-1, -1)] {
            let expected = 5 + ((x as f64 / 8.0).sin() * 3.0 + (z as f64 / 8.0).cos() * 3.0).round() as i32;
            assert_eq!(generator.height_at(x, z), expected);
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let generator = TerrainGenerator::default();
        for (x, z) in [(0, 0), (-17, 33), (5, -90)] {
            assert_eq!(generator.height_at(x, z), generator.height_at(x, z));
        }
        assert_eq!(generator.generate_chunk(-1, 2), generator.generate_chunk(-1, 2));
    }

    #[test]
    fn columns_are_stone_capped_with_grass() {
        let generator = TerrainGenerator::default();
        let chunk = generator.generate_chunk(-2, 1);
        assert_eq!(chunk.position(), Point3::new(-2, 0, 1));

        for x in 0..CHUNK_DIMENSION {
            for z in 0..CHUNK_DIMENSION {
                let height = generator.height_at(-32 + x, 16 + z);
                for y in 0..CHUNK_DIMENSION {
                    let expected = if y < height - 1 {
                        STONE
                    } else if y == height - 1 {
                        GRASS
                    } else {
                        AIR
                    };
                    assert_eq!(chunk.get_block(x, y, z), expected, "column ({x}, {z}) at y {y}");
                }
            }
        }
    }

    #[test]
    fn tall_columns_are_clipped_to_the_chunk() {
        let generator = TerrainGenerator::new(40, 0.0, 8.0, STONE, GRASS);
        let chunk = generator.generate_chunk(0, 0);
        assert_eq!(chunk.solid_count(), super::super::chunk::CHUNK_VOLUME);
        assert_eq!(chunk.get_block(0, 15, 0), STONE);
    }

    #[test]
    fn extreme_parameters_saturate() {
        let steep = TerrainGenerator::new(5, 1e12, 8.0, STONE, GRASS);
        assert_eq!(steep.height_at(4, 0), i32::MAX);

        let high = TerrainGenerator::new(i32::MAX, DEFAULT_AMPLITUDE, 8.0, STONE, GRASS);
        assert_eq!(high.height_at(0, 0), i32::MAX);

        let deep = TerrainGenerator::new(i32::MIN, DEFAULT_AMPLITUDE, 8.0, STONE, GRASS);
        assert_eq!(deep.height_at(0, 32), i32::MIN);
        assert!(deep.generate_chunk(0, 0).is_empty());
    }

    #[test]
    fn config_keys_resolve_through_registry() {
        let registry = BlockRegistry::builtin();
        let mut config = TerrainConfig::default();
        assert_eq!(
            TerrainGenerator::from_config(&config, &registry).unwrap(),
            TerrainGenerator::default()
        );

        config.grass = "base:moss".to_string();
        assert!(TerrainGenerator::from_config(&config, &registry).is_err());
    }
}
