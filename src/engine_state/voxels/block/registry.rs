//! # Block Registry
//!
//! Block types beyond the built-in ones are described as data: a table from
//! namespaced keys (`namespace:name`) to render attributes. The table is assembled
//! with a [`BlockRegistryBuilder`], extensions contribute through the [`Mod`]
//! trait, and the finished [`BlockRegistry`] is immutable and passed explicitly to
//! whoever needs it (terrain generation, tinted meshing).

use std::collections::HashMap;

use log::{debug, info, warn};
use phf::phf_map;
use serde::{Deserialize, Serialize};

use super::BlockId;

/// Static description of a block type shipped with the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuiltinBlock {
    /// The fixed id of the block
    pub id: BlockId,
    /// Human readable name
    pub name: &'static str,
    /// Whether light and sight pass through the block
    pub transparent: bool,
    /// Base RGB color used for tinted meshing
    pub color: [f32; 3],
}

/// The blocks every registry starts with, keyed by namespaced id.
pub static BUILTIN_BLOCKS: phf::Map<&'static str, BuiltinBlock> = phf_map! {
    "base:air" => BuiltinBlock { id: 0, name: "Air", transparent: true, color: [0.0, 0.0, 0.0] },
    "base:stone" => BuiltinBlock { id: 1, name: "Stone", transparent: false, color: [0.55, 0.55, 0.55] },
    "base:grass" => BuiltinBlock { id: 2, name: "Grass", transparent: false, color: [0.35, 0.75, 0.25] },
};

/// Render and gameplay attributes of a registered block type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDefinition {
    /// Human readable name
    pub name: String,
    /// Whether light and sight pass through the block
    #[serde(default)]
    pub transparent: bool,
    /// Base RGB color in `[0, 1]`
    pub color: [f32; 3],
}

impl BlockDefinition {
    /// Creates an opaque block definition.
    pub fn new(name: impl Into<String>, color: [f32; 3]) -> Self {
        BlockDefinition {
            name: name.into(),
            transparent: false,
            color,
        }
    }
}

impl From<&BuiltinBlock> for BlockDefinition {
    fn from(builtin: &BuiltinBlock) -> Self {
        BlockDefinition {
            name: builtin.name.to_string(),
            transparent: builtin.transparent,
            color: builtin.color,
        }
    }
}

/// An extension that contributes block types before the registry is frozen.
pub trait Mod {
    /// Name used in log output.
    fn name(&self) -> &str;

    /// Registers the extension's blocks.
    fn register_blocks(&self, registry: &mut BlockRegistryBuilder);
}

/// Mutable staging area for a [`BlockRegistry`].
#[derive(Debug, Clone)]
pub struct BlockRegistryBuilder {
    keys: Vec<String>,
    definitions: Vec<BlockDefinition>,
    index: HashMap<String, BlockId>,
}

impl BlockRegistryBuilder {
    /// Creates a builder pre-populated with [`BUILTIN_BLOCKS`] in id order.
    pub fn new() -> Self {
        let mut builtins: Vec<(&&str, &BuiltinBlock)> = BUILTIN_BLOCKS.entries().collect();
        builtins.sort_by_key(|(_, block)| block.id);

        let mut builder = BlockRegistryBuilder {
            keys: Vec::with_capacity(builtins.len()),
            definitions: Vec::with_capacity(builtins.len()),
            index: HashMap::with_capacity(builtins.len()),
        };
        for (key, block) in builtins {
            debug_assert_eq!(block.id as usize, builder.keys.len());
            builder.index.insert(key.to_string(), block.id);
            builder.keys.push(key.to_string());
            builder.definitions.push(block.into());
        }
        builder
    }

    /// Registers a block under `namespace:id`.
    ///
    /// A key that is already present keeps its id and has its definition replaced.
    ///
    /// # Returns
    /// The id of the block, or `None` if the id space is exhausted.
    pub fn register(
        &mut self,
        namespace: &str,
        id: &str,
        definition: BlockDefinition,
    ) -> Option<BlockId> {
        let key = format!("{namespace}:{id}");

        if let Some(&existing) = self.index.get(&key) {
            warn!("Block {key} is already registered and will be overwritten");
            self.definitions[existing as usize] = definition;
            return Some(existing);
        }

        let Ok(block_id) = BlockId::try_from(self.keys.len()) else {
            warn!("Cannot register {key}: block id space exhausted");
            return None;
        };

        debug!("Registered block {key} as id {block_id}");
        self.index.insert(key.clone(), block_id);
        self.keys.push(key);
        self.definitions.push(definition);
        Some(block_id)
    }

    /// Lets each extension register its blocks, in order.
    pub fn load_mods(&mut self, mods: &[Box<dyn Mod>]) {
        for extension in mods {
            info!("Loading blocks from mod {}", extension.name());
            extension.register_blocks(self);
        }
    }

    /// Freezes the table.
    pub fn build(self) -> BlockRegistry {
        BlockRegistry {
            keys: self.keys,
            definitions: self.definitions,
            index: self.index,
        }
    }
}

impl Default for BlockRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable lookup table from block ids and namespaced keys to block definitions.
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    keys: Vec<String>,
    definitions: Vec<BlockDefinition>,
    index: HashMap<String, BlockId>,
}

impl BlockRegistry {
    /// A registry holding only the built-in blocks.
    pub fn builtin() -> Self {
        BlockRegistryBuilder::new().build()
    }

    /// Looks up the id registered under a namespaced key.
    pub fn id_of(&self, key: &str) -> Option<BlockId> {
        self.index.get(key).copied()
    }

    /// Render attributes of a block id.
    pub fn definition(&self, id: BlockId) -> Option<&BlockDefinition> {
        self.definitions.get(id as usize)
    }

    /// The `namespace:name` key of a block id.
    pub fn key(&self, id: BlockId) -> Option<&str> {
        self.keys.get(id as usize).map(String::as_str)
    }

    /// Number of registered block types, air included.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Never true for a built registry, which always holds the built-in blocks.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterates `(id, key, definition)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &str, &BlockDefinition)> {
        self.keys
            .iter()
            .zip(self.definitions.iter())
            .enumerate()
            .map(|(id, (key, definition))| (id as BlockId, key.as_str(), definition))
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
