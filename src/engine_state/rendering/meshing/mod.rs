//! Mesh generation and management for voxel rendering.
//!
//! This module sits between chunk data and the render backend. Meshing runs on
//! worker threads; the resulting vertex buffers are handed to the [`MeshManager`] on
//! the owning thread, where they wait until the renderer uploads them.
//!
//! # Architecture
//! - `MeshManager`: Tracks which chunks are meshed and holds buffers awaiting upload
//! - `ChunkRenderer`: Owns the backend handles of uploaded chunk meshes and draws them
//! - `mesh/`: Contains the core mesh generation algorithms
//!
//! # Lifecycle of a chunk mesh
//! 1. A meshing task produces a [`VertexBuffer`] for a chunk position
//! 2. [`MeshManager::queue_mesh`] stores it, replacing any older pending buffer
//! 3. [`MeshManager::take_pending`] drains the buffers in chunk order for upload
//! 4. [`ChunkRenderer::upload`] moves each buffer into the backend

use std::collections::{HashMap, HashSet};

use cgmath::Point3;
use log::debug;

/// Core mesh generation algorithms and data structures.
///
/// This module contains the culled and greedy meshers that convert voxel data
/// into triangle lists.
pub mod mesh;
mod renderer;

// Re-export the mesh module's public interface for external use
pub use mesh::*;

// Re-export the renderer module's public interface for external use
pub use renderer::*;

use super::vertex::VertexBuffer;

/// Central bookkeeping for chunk meshes between meshing and upload.
///
/// The manager never meshes anything itself. It records the outcome of meshing
/// tasks and lets the renderer collect the buffers that still need uploading.
#[derive(Debug, Default)]
pub struct MeshManager {
    /// Buffers produced but not yet uploaded, keyed by chunk position
    pending: HashMap<Point3<i32>, VertexBuffer>,
    /// Every chunk position a mesh was produced for
    meshed_chunks: HashSet<Point3<i32>>,
}

impl MeshManager {
    /// Creates an empty mesh manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a freshly generated mesh until it is uploaded.
    ///
    /// A chunk re-meshed before its previous buffer was uploaded keeps only the
    /// newest buffer; the stale one is dropped here.
    pub fn queue_mesh(&mut self, chunk_position: Point3<i32>, buffer: VertexBuffer) {
        debug!(
            "Queued mesh for chunk {:?} ({} vertices)",
            chunk_position,
            buffer.vertex_count()
        );
        self.meshed_chunks.insert(chunk_position);
        self.pending.insert(chunk_position, buffer);
    }

    /// Checks if a chunk has been meshed.
    pub fn is_chunk_meshed(&self, chunk_position: Point3<i32>) -> bool {
        self.meshed_chunks.contains(&chunk_position)
    }

    /// Number of chunks a mesh was produced for.
    pub fn meshed_count(&self) -> usize {
        self.meshed_chunks.len()
    }

    /// Number of buffers waiting for upload.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Removes and returns every pending buffer, ordered by chunk position.
    ///
    /// # Returns
    /// `(chunk_position, buffer)` pairs sorted by x, then y, then z so uploads
    /// happen in a stable order regardless of which worker finished first.
    pub fn take_pending(&mut self) -> Vec<(Point3<i32>, VertexBuffer)> {
        let mut pending: Vec<_> = self.pending.drain().collect();
        pending.sort_by_key(|(position, _)| (position.x, position.y, position.z));
        pending
    }

    /// Forgets a chunk, dropping any buffer still waiting for upload.
    ///
    /// # Returns
    /// `true` if the chunk had been meshed.
    pub fn unload_chunk(&mut self, chunk_position: Point3<i32>) -> bool {
        self.pending.remove(&chunk_position);
        self.meshed_chunks.remove(&chunk_position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::{block::STONE, chunk::Chunk};

    fn mesh_of_one_block() -> VertexBuffer {
        let mut chunk = Chunk::empty(Point3::new(0, 0, 0));
        chunk.set_block(0, 0, 0, STONE);
        generate_mesh(&chunk)
    }

    #[test]
    fn pending_meshes_drain_in_position_order() {
        let mut manager = MeshManager::new();
        manager.queue_mesh(Point3::new(1, 0, 0), mesh_of_one_block());
        manager.queue_mesh(Point3::new(-1, 0, 2), VertexBuffer::new());
        manager.queue_mesh(Point3::new(-1, 0, -2), mesh_of_one_block());

        let positions: Vec<_> = manager.take_pending().into_iter().map(|(p, _)| p).collect();
        assert_eq!(
            positions,
            vec![Point3::new(-1, 0, -2), Point3::new(-1, 0, 2), Point3::new(1, 0, 0)]
        );
        assert_eq!(manager.pending_count(), 0);
        assert_eq!(manager.meshed_count(), 3);
    }

    #[test]
    fn requeueing_keeps_the_newest_buffer() {
        let mut manager = MeshManager::new();
        let position = Point3::new(0, 0, 0);
        manager.queue_mesh(position, mesh_of_one_block());
        manager.queue_mesh(position, VertexBuffer::new());

        let pending = manager.take_pending();
        assert_eq!(pending.len(), 1);
        assert!(pending[0].1.is_empty());
    }

    #[test]
    fn unloading_forgets_the_chunk() {
        let mut manager = MeshManager::new();
        let position = Point3::new(2, 0, 2);
        manager.queue_mesh(position, mesh_of_one_block());

        assert!(manager.is_chunk_meshed(position));
        assert!(manager.unload_chunk(position));
        assert!(!manager.is_chunk_meshed(position));
        assert!(manager.take_pending().is_empty());
        assert!(!manager.unload_chunk(position));
    }
}
