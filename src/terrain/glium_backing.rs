use super::backing::GeometryBackend;
use super::pool::VertexBlock;
use super::Vertex;
use crate::error::BackendError;
use glium::backend::{Context, Facade};
use glium::buffer::{Buffer, Mapping};
use glium::index::PrimitiveType;
use glium::{IndexBuffer, VertexBuffer};
use std::rc::Rc;

/// Stores the geometry of every patch in OpenGL buffers: a single dynamic vertex buffer sized
/// to the vertex pool, and one triangle list index buffer per patch.
pub struct GliumBackend {
    context: Rc<Context>,
    vertex_buffer: VertexBuffer<Vertex>,
}

impl GliumBackend {
    pub fn new<F: ?Sized + Facade>(
        facade: &F,
        vertex_capacity: usize,
    ) -> Result<GliumBackend, BackendError> {
        let vertex_buffer = VertexBuffer::empty_dynamic(facade, vertex_capacity)
            .map_err(|e| BackendError::VertexBuffer(e.to_string()))?;
        Ok(GliumBackend {
            context: facade.get_context().clone(),
            vertex_buffer,
        })
    }

    /// The shared vertex buffer every patch index buffer refers to.
    pub fn vertex_buffer(&self) -> &VertexBuffer<Vertex> {
        &self.vertex_buffer
    }

    /// Returns the context corresponding to this backend.
    pub fn get_context(&self) -> &Rc<Context> {
        &self.context
    }
}

impl GeometryBackend for GliumBackend {
    type IndexBuffer = IndexBuffer<u32>;
    type VertexLock<'a> = Mapping<'a, [Vertex]> where Self: 'a;

    fn vertex_capacity(&self) -> usize {
        self.vertex_buffer.len()
    }

    fn lock_vertex_range(
        &mut self,
        block: &VertexBlock,
    ) -> Result<Self::VertexLock<'_>, BackendError> {
        let capacity = self.vertex_buffer.len();
        let range = block.range();
        let buffer: &mut Buffer<[Vertex]> = &mut self.vertex_buffer;
        match buffer.slice_mut(range.clone()) {
            Some(slice) => Ok(slice.map()),
            None => Err(BackendError::VertexRange {
                offset: range.start,
                end: range.end,
                capacity,
            }),
        }
    }

    fn create_index_buffer(&mut self, indices: &[u32]) -> Result<Self::IndexBuffer, BackendError> {
        IndexBuffer::new(&self.context, PrimitiveType::TrianglesList, indices)
            .map_err(|e| BackendError::IndexBuffer(e.to_string()))
    }
}
