use super::Vertex;
use crate::error::BuildError;

/// Positional, bounds-checked writer over the locked vertices of one patch.
///
/// Vertex `(row, col)` lives at offset `row * edge + col` of the block. The index buffers built
/// by [`crate::terrain::stitch`] rely on this raster order.
pub struct VertexWriter<'a> {
    vertices: &'a mut [Vertex],
    edge: usize,
}

impl<'a> VertexWriter<'a> {
    pub fn new(vertices: &'a mut [Vertex], edge: usize) -> Result<VertexWriter<'a>, BuildError> {
        if vertices.len() != edge * edge {
            return Err(BuildError::VertexCount {
                edge,
                actual: vertices.len(),
            });
        }
        Ok(VertexWriter { vertices, edge })
    }

    pub fn edge(&self) -> usize {
        self.edge
    }

    pub fn set(&mut self, row: usize, col: usize, vertex: Vertex) {
        assert!(
            row < self.edge && col < self.edge,
            "vertex ({}, {}) outside a {}x{} patch",
            row,
            col,
            self.edge,
            self.edge
        );
        self.vertices[row * self.edge + col] = vertex;
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Vertex> {
        if row < self.edge && col < self.edge {
            self.vertices.get(row * self.edge + col)
        } else {
            None
        }
    }
}
