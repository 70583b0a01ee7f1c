use nalgebra::{Point3, Vector3};
use patchwork::error::{BackendError, BuildError};
use patchwork::terrain::{
    FlatGround, GeometryBackend, LodLayout, LodLevel, MemoryBackend, PatchBounds, PatchId,
    PatchSet, Side, SphereGround, Vertex, VertexBlock, VertexPool,
};
use std::collections::HashMap;

type FlatSet = PatchSet<MemoryBackend, FlatGround>;

/// Every patch is this wide, so all vertices of the default layout land on whole units.
const PATCH_SIZE: f64 = 8.0;

fn flat_set(capacities: &[usize]) -> FlatSet {
    let pool = VertexPool::new(LodLayout::default(), capacities).unwrap();
    let backend = MemoryBackend::new(pool.total_vertices());
    PatchSet::new(pool, backend, FlatGround::default())
}

fn flat_grid(set: &mut FlatSet, rows: usize, cols: usize, level: LodLevel) -> Vec<PatchId> {
    let bounds = PatchBounds::from_axes(
        Point3::origin(),
        Vector3::x() * PATCH_SIZE * cols as f64,
        Vector3::z() * PATCH_SIZE * rows as f64,
    );
    set.add_grid(rows, cols, &bounds, level).unwrap()
}

type Position = (i64, i64);

fn position(vertex: &Vertex) -> Position {
    let [x, y, z] = vertex.position;
    assert_eq!(y, 0.0);
    assert_eq!(x.fract(), 0.0);
    assert_eq!(z.fract(), 0.0);
    (x as i64, z as i64)
}

/// Checks that the drawn patches of a flat `rows` by `cols` grid form one consistently wound
/// surface without overlaps, gaps or T-junctions: every edge inside the grid is used exactly
/// once in each direction, and only the outer border is open.
fn assert_watertight(set: &FlatSet, rows: usize, cols: usize) {
    let (width, depth) = ((cols as f64 * PATCH_SIZE) as i64, (rows as f64 * PATCH_SIZE) as i64);
    let vertices = set.backend().vertices();
    let mut doubled_area = 0;
    let mut edges: HashMap<(Position, Position), usize> = HashMap::new();

    set.render(|patch, indices| {
        assert_eq!(indices.len(), patch.index_count());
        for triangle in indices.chunks(3) {
            let [a, b, c] =
                [triangle[0], triangle[1], triangle[2]].map(|i| position(&vertices[i as usize]));
            let area = (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0);
            assert!(area > 0, "patch {:?} has a flipped or degenerate triangle", patch.id());
            doubled_area += area;
            for edge in [(a, b), (b, c), (c, a)] {
                *edges.entry(edge).or_insert(0) += 1;
            }
        }
    });

    assert_eq!(doubled_area, 2 * width * depth);
    for (&(a, b), &count) in &edges {
        assert_eq!(count, 1, "edge {:?} is covered twice", (a, b));
        if !edges.contains_key(&(b, a)) {
            let on_border = (a.0 == b.0 && (a.0 == 0 || a.0 == width))
                || (a.1 == b.1 && (a.1 == 0 || a.1 == depth));
            assert!(on_border, "crack along {:?}", (a, b));
        }
    }
}

/// Small deterministic generator for level assignments.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

#[test]
fn uniform_grid_is_watertight() {
    for level in 0..4 {
        let mut set = flat_set(&[16, 16, 16, 16]);
        flat_grid(&mut set, 3, 3, LodLevel(level));
        let stats = set.update().unwrap();
        assert_eq!(stats.rebuilt, 9);
        assert_watertight(&set, 3, 3);
    }
}

#[test]
fn random_mixed_levels_are_watertight() {
    let mut rng = Lcg(7);
    for _ in 0..64 {
        let mut set = flat_set(&[16, 16, 16, 16]);
        let ids = flat_grid(&mut set, 4, 4, LodLevel(3));
        let levels: Vec<(PatchId, LodLevel)> = ids
            .iter()
            .map(|id| (*id, LodLevel((rng.next() % 4) as u8)))
            .collect();
        set.set_lods(&levels).unwrap();
        let stats = set.update().unwrap();
        assert_eq!(stats.deferred, 0);
        assert_watertight(&set, 4, 4);
    }
}

#[test]
fn coarsest_patch_between_finer_neighbours() {
    let mut set = flat_set(&[4, 4, 4, 8]);
    let ids = flat_grid(&mut set, 3, 3, LodLevel(3));
    set.set_lods(&[
        (ids[1], LodLevel(0)),
        (ids[3], LodLevel(1)),
        (ids[5], LodLevel(2)),
        (ids[7], LodLevel(0)),
    ])
    .unwrap();
    set.update().unwrap();
    assert_watertight(&set, 3, 3);

    // The centre patch carries every seam of its four finer neighbours.
    let centre = set.patch(ids[4]).unwrap();
    assert_eq!(centre.resident_level(), Some(LodLevel(3)));
    assert_eq!(centre.triangle_count(), (8 + 4 + 2 + 8) - 2);
}

#[test]
fn rebuilding_after_level_changes_stays_watertight() {
    let mut set = flat_set(&[16, 16, 16, 16]);
    let ids = flat_grid(&mut set, 4, 4, LodLevel(2));
    set.update().unwrap();

    let mut rng = Lcg(42);
    for _ in 0..32 {
        let id = ids[(rng.next() % 16) as usize];
        let level = LodLevel((rng.next() % 4) as u8);
        set.set_lod(id, level).unwrap();
        set.update().unwrap();
        assert!(set.patches().all(|p| !p.needs_rebuild()));
        assert_watertight(&set, 4, 4);
    }
}

#[test]
fn deferred_patches_keep_stitching_to_their_neighbours() {
    let mut set = flat_set(&[4, 2, 4, 4]);
    let ids = flat_grid(&mut set, 1, 3, LodLevel(2));
    set.update().unwrap();

    set.set_lods(&[(ids[0], LodLevel(1)), (ids[1], LodLevel(1)), (ids[2], LodLevel(1))])
        .unwrap();
    let stats = set.update().unwrap();
    assert_eq!(stats.deferred, 1);
    assert_eq!(set.patch(ids[2]).unwrap().resident_level(), Some(LodLevel(2)));
    assert_watertight(&set, 1, 3);

    set.set_lod(ids[0], LodLevel(2)).unwrap();
    let stats = set.update().unwrap();
    assert_eq!(stats.deferred, 0);
    assert_eq!(set.patch(ids[2]).unwrap().resident_level(), Some(LodLevel(1)));
    assert_eq!(set.pool().allocated_blocks(LodLevel(1)), 2);
    assert_watertight(&set, 1, 3);
}

#[test]
fn seams_stay_stale_until_the_patch_itself_is_rebuilt() {
    use patchwork::terrain::Patch;

    let layout = LodLayout::default();
    let mut pool = VertexPool::new(layout, &[2, 2, 2, 2]).unwrap();
    let mut backend = MemoryBackend::new(pool.total_vertices());
    let ground = FlatGround::default();
    let left_bounds = PatchBounds::from_axes(
        Point3::origin(),
        Vector3::x() * PATCH_SIZE,
        Vector3::z() * PATCH_SIZE,
    );
    let right_bounds = PatchBounds::from_axes(
        Point3::new(PATCH_SIZE, 0.0, 0.0),
        Vector3::x() * PATCH_SIZE,
        Vector3::z() * PATCH_SIZE,
    );
    let mut left: Patch<Vec<u32>> = Patch::new(PatchId(0), left_bounds, LodLevel(2));
    let mut right: Patch<Vec<u32>> = Patch::new(PatchId(1), right_bounds, LodLevel(2));
    left.set_neighbour(Side::Right, Some(right.id()));
    right.set_neighbour(Side::Left, Some(left.id()));

    for patch in [&mut left, &mut right] {
        patch.pre_build(&mut pool).unwrap();
    }
    let (left_grid, right_grid) = (left.grid(), right.grid());
    left.build(&[None, None, right_grid, None], &mut backend, &ground).unwrap();
    right.build(&[left_grid, None, None, None], &mut backend, &ground).unwrap();
    let before = left.index_buffer().cloned();

    right.set_lod_level(LodLevel(1));
    right.pre_build(&mut pool).unwrap();
    right.build(&[left.grid(), None, None, None], &mut backend, &ground).unwrap();
    assert_eq!(left.index_buffer().cloned(), before);

    left.invalidate_indices();
    left.build(&[None, None, right.grid(), None], &mut backend, &ground).unwrap();
    assert_ne!(left.index_buffer().cloned(), before);
    // Two extra fine segments on the shared edge, one extra triangle each.
    assert_eq!(left.triangle_count(), 8 + 2);
}

/// Hands out vertex ranges but refuses to create index buffers.
struct FailingBackend(MemoryBackend);

impl GeometryBackend for FailingBackend {
    type IndexBuffer = Vec<u32>;
    type VertexLock<'a> = &'a mut [Vertex] where Self: 'a;

    fn vertex_capacity(&self) -> usize {
        self.0.vertex_capacity()
    }

    fn lock_vertex_range(
        &mut self,
        block: &VertexBlock,
    ) -> Result<Self::VertexLock<'_>, BackendError> {
        self.0.lock_vertex_range(block)
    }

    fn create_index_buffer(&mut self, _indices: &[u32]) -> Result<Self::IndexBuffer, BackendError> {
        Err(BackendError::IndexBuffer("out of memory".to_string()))
    }
}

#[test]
fn backend_failures_abort_the_update() {
    let pool = VertexPool::with_default_capacities(LodLayout::default()).unwrap();
    let backend = FailingBackend(MemoryBackend::new(pool.total_vertices()));
    let mut set = PatchSet::new(pool, backend, FlatGround::default());
    set.add_patch(
        PatchBounds::from_axes(Point3::origin(), Vector3::x(), Vector3::z()),
        LodLevel(1),
    )
    .unwrap();
    assert_eq!(
        set.update(),
        Err(BuildError::Backend(BackendError::IndexBuffer("out of memory".to_string())))
    );
}

#[test]
fn cube_sphere_vertices_lie_on_the_sphere() {
    let pool = VertexPool::new(LodLayout::default(), &[8, 32, 64, 64]).unwrap();
    let backend = MemoryBackend::new(pool.total_vertices());
    let ground = SphereGround::new(Point3::origin(), 100.0).with_cube_morph(1.0);
    let mut set = PatchSet::new(pool, backend, ground);
    let faces = set.add_cube_sphere(2, 1.0, LodLevel(2)).unwrap();
    let front = faces.iter().find(|(face, _)| *face == patchwork::terrain::Face::Front).unwrap();
    set.set_lod(front.1[0], LodLevel(1)).unwrap();
    let stats = set.update().unwrap();
    assert_eq!(stats.rebuilt, 24);
    assert_eq!(stats.deferred, 0);

    for patch in set.patches() {
        let block = patch.block().unwrap();
        for vertex in &set.backend().vertices()[block.range()] {
            let [x, y, z] = vertex.position;
            let radius = (x * x + y * y + z * z).sqrt();
            assert!((radius - 100.0).abs() < 1e-3, "vertex at radius {}", radius);
        }
        assert!((patch.centre().coords.norm() - 100.0).abs() < 1e-9);
    }
}
