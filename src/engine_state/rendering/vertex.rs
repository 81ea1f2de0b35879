//! Vertex data structures for voxel rendering.
//!
//! This module defines the vertex format produced by the mesher and the flat buffer
//! that carries it to the rendering backend.

use cgmath::Point3;

/// Number of `f32` values per vertex: position (x, y, z) followed by color (r, g, b).
pub const FLOATS_PER_VERTEX: usize = 6;

/// Vertices emitted for one visible face (two triangles, no index buffer).
pub const VERTICES_PER_FACE: usize = 6;

/// A vertex in the voxel rendering pipeline.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes), chunk-local block-grid units
/// - Color: 3x f32 (12 bytes), each in `[0, 1]`
///
/// Total size: 24 bytes, matching a stride of `FLOATS_PER_VERTEX` floats.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in chunk-local block coordinates
    pub position: [f32; 3],
    /// RGB color
    pub color: [f32; 3],
}

impl Vertex {
    /// Creates a new vertex.
    pub fn new(position: Point3<f32>, color: [f32; 3]) -> Self {
        Vertex {
            position: position.into(),
            color,
        }
    }
}

/// A triangle-list vertex buffer for one chunk.
///
/// The buffer owns its storage. Handing it to the backend moves it, and whatever
/// the backend does with it, it is released when the last owner drops it, empty
/// or not.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexBuffer {
    vertices: Vec<Vertex>,
}

impl VertexBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        VertexBuffer {
            vertices: Vec::new(),
        }
    }

    /// Creates an empty buffer with room for `vertices` vertices.
    pub fn with_capacity(vertices: usize) -> Self {
        VertexBuffer {
            vertices: Vec::with_capacity(vertices),
        }
    }

    /// Appends one face worth of vertices.
    pub fn push_face(&mut self, corners: [Point3<f32>; VERTICES_PER_FACE], color: [f32; 3]) {
        self.vertices
            .extend(corners.into_iter().map(|corner| Vertex::new(corner, color)));
    }

    /// The vertices in triangle-list order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// The interleaved `x, y, z, r, g, b` float view of the buffer, ready for upload.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The raw bytes of the buffer.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of quads, two triangles each.
    pub fn face_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_FACE
    }

    /// `true` when the buffer holds no geometry.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
