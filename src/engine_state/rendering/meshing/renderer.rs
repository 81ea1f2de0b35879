//! Chunk renderer for the voxel engine.
//!
//! This module keeps one backend resource per chunk with visible geometry and
//! issues one draw per such chunk every frame.
//!
//! # Architecture
//!
//! The chunk renderer is responsible for:
//! 1. Moving finished vertex buffers into the backend
//! 2. Replacing and releasing backend resources when a chunk is re-meshed or removed
//! 3. Translating each chunk's local geometry to its world position when drawing

use std::collections::HashMap;

use cgmath::{Point3, Vector3};
use log::{debug, info};

use crate::engine_state::{
    rendering::{vertex::VertexBuffer, RenderBackend},
    voxels::chunk::CHUNK_DIMENSION,
};

/// An uploaded chunk mesh.
struct ChunkRenderable<H> {
    handle: H,
    vertex_count: usize,
}

/// Draws chunk meshes through a [`RenderBackend`].
///
/// Chunks whose mesh is empty own no backend resource and are never drawn.
pub struct ChunkRenderer<B: RenderBackend> {
    /// The graphics backend
    backend: B,
    /// Uploaded meshes keyed by chunk position
    renderables: HashMap<Point3<i32>, ChunkRenderable<B::Handle>>,
}

impl<B: RenderBackend> ChunkRenderer<B> {
    /// Creates a renderer with no uploaded chunks.
    pub fn new(backend: B) -> Self {
        ChunkRenderer {
            backend,
            renderables: HashMap::new(),
        }
    }

    /// The backend meshes are uploaded to.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Number of chunks with uploaded geometry.
    pub fn renderable_count(&self) -> usize {
        self.renderables.len()
    }

    /// Whether a chunk currently has uploaded geometry.
    pub fn has_renderable(&self, chunk_position: Point3<i32>) -> bool {
        self.renderables.contains_key(&chunk_position)
    }

    /// Uploads the mesh of one chunk, taking ownership of its vertex buffer.
    ///
    /// The buffer is dropped when this call returns on every path: after a
    /// successful upload, when the upload fails, and when it is empty. An empty
    /// buffer also releases whatever the chunk had uploaded before.
    ///
    /// # Arguments
    /// * `chunk_position` - Position of the chunk in chunk coordinates
    /// * `buffer` - The chunk's freshly generated mesh
    ///
    /// # Returns
    /// `Ok(true)` if the chunk now has a renderable, `Ok(false)` if the mesh was empty.
    pub fn upload(&mut self, chunk_position: Point3<i32>, buffer: VertexBuffer) -> Result<bool, B::Error> {
        if buffer.is_empty() {
            debug!("Chunk {:?} has no visible faces", chunk_position);
            self.remove(chunk_position);
            return Ok(false);
        }

        let vertex_count = buffer.vertex_count();
        let handle = self.backend.upload(buffer.as_floats(), vertex_count)?;

        let previous = self.renderables.insert(
            chunk_position,
            ChunkRenderable {
                handle,
                vertex_count,
            },
        );
        if let Some(previous) = previous {
            self.backend.release(previous.handle);
        }

        debug!(
            "Uploaded chunk {:?} with {} vertices",
            chunk_position, vertex_count
        );
        Ok(true)
    }

    /// Uploads a batch of meshes, stopping at the first backend failure.
    ///
    /// # Returns
    /// The number of chunks that received a renderable.
    pub fn upload_all(
        &mut self,
        meshes: impl IntoIterator<Item = (Point3<i32>, VertexBuffer)>,
    ) -> Result<usize, B::Error> {
        let mut uploaded = 0;
        for (chunk_position, buffer) in meshes {
            if self.upload(chunk_position, buffer)? {
                uploaded += 1;
            }
        }

        info!(
            "Uploaded {} chunk meshes ({} renderable)",
            uploaded,
            self.renderables.len()
        );
        Ok(uploaded)
    }

    /// Releases the renderable of a chunk, if it has one.
    pub fn remove(&mut self, chunk_position: Point3<i32>) -> bool {
        match self.renderables.remove(&chunk_position) {
            Some(renderable) => {
                self.backend.release(renderable.handle);
                true
            }
            None => false,
        }
    }

    /// Draws every renderable once, translated to its chunk's world position.
    ///
    /// Chunks are drawn in position order so frames are reproducible.
    ///
    /// # Returns
    /// The number of draw calls issued.
    pub fn draw_frame(&mut self) -> Result<usize, B::Error> {
        let mut positions: Vec<Point3<i32>> = self.renderables.keys().copied().collect();
        positions.sort_by_key(|position| (position.x, position.y, position.z));

        self.backend.begin_frame();
        for position in &positions {
            let renderable = &self.renderables[position];
            self.backend.draw(
                &renderable.handle,
                renderable.vertex_count,
                model_offset(*position),
            )?;
        }

        Ok(positions.len())
    }

    /// Releases every renderable.
    pub fn clear(&mut self) {
        for (_, renderable) in self.renderables.drain() {
            self.backend.release(renderable.handle);
        }
    }
}

impl<B: RenderBackend> Drop for ChunkRenderer<B> {
    fn drop(&mut self) {
        self.clear();
    }
}

/// World-space translation of a chunk's local geometry.
pub fn model_offset(chunk_position: Point3<i32>) -> Vector3<f32> {
    Vector3::new(
        (chunk_position.x * CHUNK_DIMENSION) as f32,
        (chunk_position.y * CHUNK_DIMENSION) as f32,
        (chunk_position.z * CHUNK_DIMENSION) as f32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::{
        rendering::{headless::HeadlessBackend, meshing::generate_mesh},
        voxels::{block::STONE, chunk::Chunk},
    };

    fn single_block_mesh() -> VertexBuffer {
        let mut chunk = Chunk::empty(Point3::new(0, 0, 0));
        chunk.set_block(1, 1, 1, STONE);
        generate_mesh(&chunk)
    }

    #[test]
    fn empty_meshes_never_reach_the_backend() {
        let mut renderer = ChunkRenderer::new(HeadlessBackend::new());
        assert_eq!(renderer.upload(Point3::new(0, 0, 0), VertexBuffer::new()), Ok(false));

        assert_eq!(renderer.renderable_count(), 0);
        assert!(renderer.backend().uploads().is_empty());
        assert_eq!(renderer.draw_frame(), Ok(0));
    }

    #[test]
    fn draws_are_translated_by_chunk_position() {
        let mut renderer = ChunkRenderer::new(HeadlessBackend::new());
        renderer.upload(Point3::new(1, 0, -2), single_block_mesh()).unwrap();
        renderer.upload(Point3::new(-1, 0, 0), single_block_mesh()).unwrap();

        assert_eq!(renderer.draw_frame(), Ok(2));
        let draws = renderer.backend().draws();
        assert_eq!(draws[0].model_offset, Vector3::new(-16.0, 0.0, 0.0));
        assert_eq!(draws[1].model_offset, Vector3::new(16.0, 0.0, -32.0));
        assert!(draws.iter().all(|draw| draw.vertex_count == 36));

        assert_eq!(renderer.draw_frame(), Ok(2));
        assert_eq!(renderer.backend().draws().len(), 2);
        assert_eq!(renderer.backend().drawn_vertices(), 72);
    }

    #[test]
    fn reupload_releases_the_previous_handle() {
        let mut renderer = ChunkRenderer::new(HeadlessBackend::new());
        let position = Point3::new(0, 0, 0);
        renderer.upload(position, single_block_mesh()).unwrap();
        renderer.upload(position, single_block_mesh()).unwrap();

        assert_eq!(renderer.renderable_count(), 1);
        assert_eq!(renderer.backend().released().len(), 1);
        assert_eq!(renderer.backend().live_count(), 1);

        renderer.upload(position, VertexBuffer::new()).unwrap();
        assert_eq!(renderer.renderable_count(), 0);
        assert_eq!(renderer.backend().live_count(), 0);
    }

    #[test]
    fn clear_releases_everything() {
        let mut renderer = ChunkRenderer::new(HeadlessBackend::new());
        for x in 0..3 {
            renderer.upload(Point3::new(x, 0, 0), single_block_mesh()).unwrap();
        }
        renderer.clear();
        assert_eq!(renderer.backend().released().len(), 3);
        assert_eq!(renderer.backend().live_count(), 0);
    }
}
