//! An in-memory render backend.
//!
//! [`HeadlessBackend`] implements [`RenderBackend`] without a graphics device. It
//! keeps a copy of every uploaded buffer and a log of uploads, draws and releases,
//! which makes it suitable for running the engine without a window and for
//! inspecting what a real backend would have been asked to do.

use std::collections::HashMap;
use std::convert::Infallible;

use cgmath::Vector3;

use super::RenderBackend;

/// Handle to a buffer stored by the [`HeadlessBackend`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct HeadlessHandle(u64);

impl HeadlessHandle {
    /// The id recorded for this handle in the backend's logs.
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// One recorded upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRecord {
    /// Handle the buffer was stored under
    pub handle_id: u64,
    /// Vertices the caller declared
    pub vertex_count: usize,
    /// Floats actually received
    pub float_count: usize,
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    /// Handle of the drawn buffer
    pub handle_id: u64,
    /// Vertices drawn
    pub vertex_count: usize,
    /// World-space translation of the chunk
    pub model_offset: Vector3<f32>,
}

/// A render backend that stores buffers in memory and records every call.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_handle: u64,
    /// Vertex data of every buffer not yet released
    live: HashMap<u64, Vec<f32>>,
    uploads: Vec<UploadRecord>,
    draws: Vec<DrawRecord>,
    released: Vec<u64>,
}

impl HeadlessBackend {
    /// Creates a backend with no buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every upload, in upload order.
    pub fn uploads(&self) -> &[UploadRecord] {
        &self.uploads
    }

    /// Draw calls issued since the current frame began.
    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    /// Ids of released handles, in release order.
    pub fn released(&self) -> &[u64] {
        &self.released
    }

    /// Number of buffers uploaded and not yet released.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// The stored vertex data behind a live handle.
    pub fn buffer(&self, handle_id: u64) -> Option<&[f32]> {
        self.live.get(&handle_id).map(Vec::as_slice)
    }

    /// Total vertices drawn in the current frame.
    pub fn drawn_vertices(&self) -> usize {
        self.draws.iter().map(|draw| draw.vertex_count).sum()
    }
}

impl RenderBackend for HeadlessBackend {
    type Handle = HeadlessHandle;
    type Error = Infallible;

    fn upload(&mut self, vertices: &[f32], vertex_count: usize) -> Result<Self::Handle, Self::Error> {
        let handle_id = self.next_handle;
        self.next_handle += 1;

        self.live.insert(handle_id, vertices.to_vec());
        self.uploads.push(UploadRecord {
            handle_id,
            vertex_count,
            float_count: vertices.len(),
        });

        Ok(HeadlessHandle(handle_id))
    }

    fn begin_frame(&mut self) {
        self.draws.clear();
    }

    fn draw(
        &mut self,
        handle: &Self::Handle,
        vertex_count: usize,
        model_offset: Vector3<f32>,
    ) -> Result<(), Self::Error> {
        self.draws.push(DrawRecord {
            handle_id: handle.0,
            vertex_count,
            model_offset,
        });
        Ok(())
    }

    fn release(&mut self, handle: Self::Handle) {
        self.live.remove(&handle.0);
        self.released.push(handle.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_the_lifecycle_of_a_buffer() {
        let mut backend = HeadlessBackend::new();
        let floats = [0.0, 1.0, 2.0, 0.5, 0.5, 0.5];

        let handle = backend.upload(&floats, 1).unwrap();
        assert_eq!(backend.buffer(handle.id()), Some(&floats[..]));
        assert_eq!(backend.uploads()[0].float_count, 6);

        backend.draw(&handle, 1, Vector3::new(16.0, 0.0, 0.0)).unwrap();
        assert_eq!(backend.drawn_vertices(), 1);
        backend.begin_frame();
        assert!(backend.draws().is_empty());

        let id = handle.id();
        backend.release(handle);
        assert_eq!(backend.released(), &[id]);
        assert_eq!(backend.live_count(), 0);
        assert!(backend.buffer(id).is_none());
    }

    #[test]
    fn handles_are_unique() {
        let mut backend = HeadlessBackend::new();
        let first = backend.upload(&[], 0).unwrap();
        let second = backend.upload(&[], 0).unwrap();
        assert_ne!(first, second);
    }
}
