//! Rendering system for the voxel engine.
//!
//! This module contains the rendering-side functionality: the vertex format, mesh
//! generation and management, and the renderer that feeds chunk meshes to a
//! backend. The graphics API itself is abstracted behind [`RenderBackend`], so the
//! rest of the engine never touches GPU objects directly.

use cgmath::Vector3;

pub mod headless;
pub mod meshing;
pub mod tasks;
pub mod vertex;

// Re-export commonly used types
pub use headless::HeadlessBackend;
pub use meshing::{ChunkRenderer, MeshManager};
pub use vertex::{Vertex, VertexBuffer};

/// A graphics API capable of storing and drawing triangle-list vertex buffers.
///
/// Vertex data is interleaved `x, y, z, r, g, b` floats (see
/// [`vertex::FLOATS_PER_VERTEX`]). Positions are chunk-local; the draw call
/// supplies the chunk's world-space translation.
pub trait RenderBackend {
    /// Backend-side resource holding one uploaded vertex buffer.
    type Handle;

    /// Failure reported by the backend.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Copies vertex data into a backend resource.
    ///
    /// # Arguments
    /// * `vertices` - Interleaved position and color floats
    /// * `vertex_count` - Number of vertices in `vertices`
    fn upload(&mut self, vertices: &[f32], vertex_count: usize) -> Result<Self::Handle, Self::Error>;

    /// Called once before the draws of each frame.
    fn begin_frame(&mut self) {}

    /// Draws an uploaded buffer as a triangle list translated by `model_offset`.
    fn draw(
        &mut self,
        handle: &Self::Handle,
        vertex_count: usize,
        model_offset: Vector3<f32>,
    ) -> Result<(), Self::Error>;

    /// Frees the backend resource behind `handle`.
    fn release(&mut self, handle: Self::Handle);
}
