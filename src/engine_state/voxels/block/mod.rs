//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block identifiers, the built-in block types, the six block faces and
//! the namespaced block registry.

use block_type::BlockType;

pub mod block_side;
pub mod block_type;
pub mod registry;

/// The underlying integer type used to identify block types in memory.
///
/// `0` is reserved for air. Collision, meshing and terrain generation all rely on it.
pub type BlockId = u16;

/// The block id for air (empty space).
pub const AIR: BlockId = BlockType::AIR as BlockId;

/// The block id of the built-in stone block.
pub const STONE: BlockId = BlockType::STONE as BlockId;

/// The block id of the built-in grass block.
pub const GRASS: BlockId = BlockType::GRASS as BlockId;

/// Returns `true` if the id denotes air.
#[inline]
pub fn is_air_id(id: BlockId) -> bool {
    id == AIR
}
