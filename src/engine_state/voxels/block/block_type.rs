//! # Block Type Module
//!
//! This module defines the block types the engine ships with. Extensions add further
//! types through the [`registry`](super::registry) instead of growing this enum.

use std::fmt;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::BlockId;

/// Enumerates the built-in block types.
///
/// The discriminants are the block ids stored in chunks. The `FromPrimitive` derive
/// allows conversion back from a raw id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// An air block, which is non-solid and never rendered.
    AIR = 0,

    /// Solid stone, filling every column below its surface block.
    STONE = 1,

    /// Grass, the single surface block on top of each terrain column.
    GRASS = 2,
}

impl BlockType {
    /// Converts a raw `BlockId` to a built-in `BlockType`.
    ///
    /// # Returns
    /// `None` if the id belongs to a block registered by an extension.
    pub fn from_id(id: BlockId) -> Option<Self> {
        FromPrimitive::from_u16(id)
    }

    /// The namespaced registry key of this block type.
    pub fn key(&self) -> &'static str {
        match self {
            BlockType::AIR => "base:air",
            BlockType::STONE => "base:stone",
            BlockType::GRASS => "base:grass",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
