/// A single terrain vertex as laid out in the shared vertex buffer.
///
/// Field order and stride (32 bytes) are part of the contract with the shaders that consume the
/// buffer; do not reorder.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// Patch-local parametric coordinate, (0,0) at the top left corner.
    pub uv: [f32; 2],
}

implement_vertex!(Vertex, position, normal, uv);
