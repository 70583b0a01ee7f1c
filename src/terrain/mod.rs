//! Adaptive level of detail terrain built from square patches that tile into one watertight
//! surface, whatever mix of lod levels adjacent patches use.

mod backing;
pub mod constants;
mod face;
mod glium_backing;
mod ground;
mod lod;
mod patch;
mod patch_set;
mod pool;
pub mod stitch;
mod vertex;
mod writer;

pub use self::backing::{GeometryBackend, MemoryBackend};
pub use self::face::Face;
pub use self::glium_backing::GliumBackend;
pub use self::ground::{FlatGround, GroundSample, GroundSampler, Projection, SphereGround};
pub use self::lod::{LodLayout, LodLevel};
pub use self::patch::{Patch, PatchBounds, PatchId};
pub use self::patch_set::{PatchSet, UpdateStats};
pub use self::pool::{VertexBlock, VertexPool};
pub use self::stitch::{build_indices, EdgeRun, PatchGrid, Side};
pub use self::vertex::Vertex;
pub use self::writer::VertexWriter;
