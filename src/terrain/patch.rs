use super::backing::GeometryBackend;
use super::ground::GroundSampler;
use super::lod::LodLevel;
use super::pool::{VertexBlock, VertexPool};
use super::stitch::{build_indices, PatchGrid, Side};
use super::writer::VertexWriter;
use super::Vertex;
use crate::error::{BuildError, PoolError};
use nalgebra::{Point3, Vector3};

/// Stable index of a patch within its patch set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatchId(pub usize);

/// The four corners of a patch. Interior points are found by bilinear interpolation, which
/// reproduces the corners exactly so adjacent patches agree on their shared borders.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PatchBounds {
    pub top_left: Point3<f64>,
    pub top_right: Point3<f64>,
    pub bottom_left: Point3<f64>,
    pub bottom_right: Point3<f64>,
}

fn lerp(a: &Vector3<f64>, b: &Vector3<f64>, t: f64) -> Vector3<f64> {
    a * (1.0 - t) + b * t
}

impl PatchBounds {
    pub fn new(
        top_left: Point3<f64>,
        top_right: Point3<f64>,
        bottom_left: Point3<f64>,
        bottom_right: Point3<f64>,
    ) -> PatchBounds {
        PatchBounds {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
        }
    }

    /// A parallelogram spanned by `u` and `v` from `origin`.
    pub fn from_axes(origin: Point3<f64>, u: Vector3<f64>, v: Vector3<f64>) -> PatchBounds {
        PatchBounds::new(origin, origin + u, origin + v, origin + u + v)
    }

    /// The point at parametric `(u, v)`; `u` runs left to right and `v` top to bottom.
    pub fn point_at(&self, u: f64, v: f64) -> Point3<f64> {
        let top = lerp(&self.top_left.coords, &self.top_right.coords, u);
        let bottom = lerp(&self.bottom_left.coords, &self.bottom_right.coords, u);
        Point3::from(lerp(&top, &bottom, v))
    }

    pub fn centre(&self) -> Point3<f64> {
        self.point_at(0.5, 0.5)
    }

    pub fn u_axis(&self) -> Vector3<f64> {
        (self.top_right - self.top_left).normalize()
    }

    pub fn v_axis(&self) -> Vector3<f64> {
        (self.bottom_left - self.top_left).normalize()
    }

    pub fn width(&self) -> f64 {
        (self.top_right - self.top_left).norm()
    }

    pub fn height(&self) -> f64 {
        (self.bottom_left - self.top_left).norm()
    }

    /// Bounds of cell `(row, col)` when these bounds are divided into `rows` by `cols` cells.
    pub fn cell(&self, rows: usize, cols: usize, row: usize, col: usize) -> PatchBounds {
        let u = |c: usize| c as f64 / cols as f64;
        let v = |r: usize| r as f64 / rows as f64;
        PatchBounds::new(
            self.point_at(u(col), v(row)),
            self.point_at(u(col + 1), v(row)),
            self.point_at(u(col), v(row + 1)),
            self.point_at(u(col + 1), v(row + 1)),
        )
    }
}

/// One square vertex grid of the terrain at a single lod level.
///
/// A patch distinguishes the level it is asked to render at from the level of the block it
/// currently holds. The two differ while a rebuild is pending, and neighbours always stitch
/// against what is resident.
pub struct Patch<I> {
    id: PatchId,
    bounds: PatchBounds,
    lod_level: LodLevel,
    block: Option<VertexBlock>,
    neighbours: [Option<PatchId>; 4],
    index_buffer: Option<I>,
    index_count: usize,
    visible: bool,
    centre: Point3<f64>,
    rebuild_vertices: bool,
    rebuild_indices: bool,
}

impl<I> Patch<I> {
    pub fn new(id: PatchId, bounds: PatchBounds, lod_level: LodLevel) -> Patch<I> {
        Patch {
            id,
            bounds,
            lod_level,
            block: None,
            neighbours: [None; 4],
            index_buffer: None,
            index_count: 0,
            visible: true,
            centre: bounds.centre(),
            rebuild_vertices: true,
            rebuild_indices: true,
        }
    }

    pub fn id(&self) -> PatchId {
        self.id
    }

    pub fn bounds(&self) -> &PatchBounds {
        &self.bounds
    }

    /// The level the patch should render at.
    pub fn lod_level(&self) -> LodLevel {
        self.lod_level
    }

    /// Requests a new level. Takes effect on the next successful `pre_build`/`build`.
    pub fn set_lod_level(&mut self, level: LodLevel) -> bool {
        if self.lod_level == level {
            return false;
        }
        self.lod_level = level;
        self.rebuild_vertices = true;
        self.rebuild_indices = true;
        true
    }

    /// The level of the vertices currently held, if any.
    pub fn resident_level(&self) -> Option<LodLevel> {
        self.block.as_ref().map(VertexBlock::level)
    }

    pub fn block(&self) -> Option<&VertexBlock> {
        self.block.as_ref()
    }

    /// The resident vertex grid, as seen by stitching neighbours.
    pub fn grid(&self) -> Option<PatchGrid> {
        self.block.as_ref().map(VertexBlock::grid)
    }

    pub fn neighbour(&self, side: Side) -> Option<PatchId> {
        self.neighbours[side.index()]
    }

    pub fn neighbours(&self) -> &[Option<PatchId>; 4] {
        &self.neighbours
    }

    /// Replaces the link on `side`. Only the own side of the link is changed.
    pub fn set_neighbour(&mut self, side: Side, neighbour: Option<PatchId>) {
        if self.neighbours[side.index()] != neighbour {
            self.neighbours[side.index()] = neighbour;
            self.rebuild_indices = true;
        }
    }

    pub fn index_buffer(&self) -> Option<&I> {
        self.index_buffer.as_ref()
    }

    pub fn index_count(&self) -> usize {
        self.index_count
    }

    pub fn triangle_count(&self) -> usize {
        self.index_count / 3
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Centre of the patch on the ground, known once the vertices have been built.
    pub fn centre(&self) -> Point3<f64> {
        self.centre
    }

    pub fn needs_vertex_rebuild(&self) -> bool {
        self.rebuild_vertices
    }

    pub fn needs_index_rebuild(&self) -> bool {
        self.rebuild_indices
    }

    pub fn needs_rebuild(&self) -> bool {
        self.rebuild_vertices || self.rebuild_indices
    }

    /// Marks the seams stale, e.g. because a neighbour changed level.
    pub fn invalidate_indices(&mut self) {
        self.rebuild_indices = true;
    }

    /// Makes sure a block of the requested level is resident.
    ///
    /// The new block is allocated before the old one is released, so on
    /// [`PoolError::Exhausted`] the patch keeps its stale geometry and stays dirty for a retry.
    /// Returns true if the resident level changed.
    pub fn pre_build(&mut self, pool: &mut VertexPool) -> Result<bool, PoolError> {
        if self.resident_level() == Some(self.lod_level) {
            return Ok(false);
        }

        let block = pool.allocate(self.lod_level)?;
        if let Some(old) = self.block.replace(block) {
            pool.release(old);
        }
        self.rebuild_vertices = true;
        self.rebuild_indices = true;
        Ok(true)
    }

    /// Regenerates whatever is stale: the vertices from the ground sampler, then the index
    /// buffer from the resident grids of the neighbours (indexed by [`Side::index`]).
    pub fn build<B, S>(
        &mut self,
        neighbours: &[Option<PatchGrid>; 4],
        backend: &mut B,
        sampler: &S,
    ) -> Result<(), BuildError>
    where
        B: GeometryBackend<IndexBuffer = I>,
        S: GroundSampler + ?Sized,
    {
        let block = self.block.as_ref().ok_or(BuildError::NotAllocated(self.id))?;
        let level = block.level();

        if self.rebuild_vertices {
            let edge = block.edge_vertex_count();
            let mut lock = backend.lock_vertex_range(block)?;
            let mut writer = VertexWriter::new(&mut lock, edge)?;
            let step = 1.0 / (edge - 1) as f64;
            for row in 0..edge {
                let v = row as f64 * step;
                for col in 0..edge {
                    let u = col as f64 * step;
                    let sample = sampler.sample(&self.bounds.point_at(u, v));
                    writer.set(
                        row,
                        col,
                        Vertex {
                            position: [
                                sample.position.x as f32,
                                sample.position.y as f32,
                                sample.position.z as f32,
                            ],
                            normal: [
                                sample.normal.x as f32,
                                sample.normal.y as f32,
                                sample.normal.z as f32,
                            ],
                            uv: [u as f32, v as f32],
                        },
                    );
                }
            }
            self.centre = sampler.sample(&self.bounds.centre()).position;
            self.rebuild_vertices = false;
            self.rebuild_indices = true;
        }

        if self.rebuild_indices {
            self.build_seams(neighbours, backend)?;
        }

        debug!(
            "Built patch {:?} at lod {} ({} triangles)",
            self.id,
            level,
            self.index_count / 3
        );
        Ok(())
    }

    /// Rebuilds only the index buffer, against whatever vertices are resident. Used to keep
    /// the seams of a patch whose vertex rebuild was deferred in step with its neighbours.
    pub fn build_seams<B>(
        &mut self,
        neighbours: &[Option<PatchGrid>; 4],
        backend: &mut B,
    ) -> Result<(), BuildError>
    where
        B: GeometryBackend<IndexBuffer = I>,
    {
        let grid = self.grid().ok_or(BuildError::NotAllocated(self.id))?;
        let indices = build_indices(&grid, neighbours);
        self.index_buffer = Some(backend.create_index_buffer(&indices)?);
        self.index_count = indices.len();
        self.rebuild_indices = false;
        Ok(())
    }

    /// Hands the index buffer to `draw` if the patch is visible and has been built.
    pub fn render<F>(&self, draw: F) -> bool
    where
        F: FnOnce(&I),
    {
        match &self.index_buffer {
            Some(index_buffer) if self.visible => {
                draw(index_buffer);
                true
            }
            _ => false,
        }
    }

    /// Gives the vertex block back to the pool and drops the index buffer.
    pub fn release(&mut self, pool: &mut VertexPool) {
        if let Some(block) = self.block.take() {
            pool.release(block);
        }
        self.index_buffer = None;
        self.index_count = 0;
        self.rebuild_vertices = true;
        self.rebuild_indices = true;
    }
}
