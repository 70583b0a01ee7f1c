use super::pool::VertexBlock;
use super::Vertex;
use crate::error::BackendError;
use std::ops::DerefMut;

/// The graphics side of the terrain: one shared vertex buffer and any number of index buffers.
///
/// The terrain core never draws; it only fills vertex ranges and creates index buffers that the
/// caller later draws against the shared vertex buffer.
pub trait GeometryBackend {
    /// Handle to an uploaded triangle list.
    type IndexBuffer;

    /// Writable view of a locked vertex range, released when dropped.
    type VertexLock<'a>: DerefMut<Target = [Vertex]>
    where
        Self: 'a;

    /// Number of vertices in the shared vertex buffer.
    fn vertex_capacity(&self) -> usize;

    /// Locks the vertices covered by `block` for writing.
    fn lock_vertex_range(
        &mut self,
        block: &VertexBlock,
    ) -> Result<Self::VertexLock<'_>, BackendError>;

    /// Uploads a triangle list that indexes the shared vertex buffer.
    fn create_index_buffer(&mut self, indices: &[u32]) -> Result<Self::IndexBuffer, BackendError>;
}

fn check_range(block: &VertexBlock, capacity: usize) -> Result<(), BackendError> {
    let range = block.range();
    if range.end > capacity {
        Err(BackendError::VertexRange {
            offset: range.start,
            end: range.end,
            capacity,
        })
    } else {
        Ok(())
    }
}

/// Keeps all geometry in system memory. Used for headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    vertices: Vec<Vertex>,
    index_buffers_created: usize,
}

impl MemoryBackend {
    pub fn new(vertex_capacity: usize) -> MemoryBackend {
        MemoryBackend {
            vertices: vec![Vertex::default(); vertex_capacity],
            index_buffers_created: 0,
        }
    }

    /// The whole shared vertex buffer.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Number of index buffers created so far.
    pub fn index_buffers_created(&self) -> usize {
        self.index_buffers_created
    }
}

impl GeometryBackend for MemoryBackend {
    type IndexBuffer = Vec<u32>;
    type VertexLock<'a> = &'a mut [Vertex] where Self: 'a;

    fn vertex_capacity(&self) -> usize {
        self.vertices.len()
    }

    fn lock_vertex_range(
        &mut self,
        block: &VertexBlock,
    ) -> Result<Self::VertexLock<'_>, BackendError> {
        check_range(block, self.vertices.len())?;
        Ok(&mut self.vertices[block.range()])
    }

    fn create_index_buffer(&mut self, indices: &[u32]) -> Result<Self::IndexBuffer, BackendError> {
        self.index_buffers_created += 1;
        Ok(indices.to_vec())
    }
}
