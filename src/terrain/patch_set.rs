use super::backing::GeometryBackend;
use super::constants::MAX_PATCH_COUNT;
use super::face::Face;
use super::ground::GroundSampler;
use super::lod::{LodLayout, LodLevel};
use super::patch::{Patch, PatchBounds, PatchId};
use super::pool::VertexPool;
use super::stitch::{PatchGrid, Side};
use crate::error::{BuildError, TopologyError};
use crate::id_arena::{IdArena, IdGenerator, SimpleIdArena};
use std::collections::{HashMap, HashSet};

/// What a call to [`PatchSet::update`] did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateStats {
    /// Patches whose vertices or indices were rebuilt.
    pub rebuilt: usize,

    /// Patches that could not get a vertex block and kept their stale geometry.
    pub deferred: usize,

    /// Triangles across every built patch after the update.
    pub triangles: usize,
}

/// Owns a set of patches together with the vertex pool, geometry backend and ground sampler
/// they are built from, and keeps their neighbour links and seams consistent.
pub struct PatchSet<B: GeometryBackend, S> {
    layout: LodLayout,
    pool: VertexPool,
    backend: B,
    sampler: S,
    patches: Vec<Option<Patch<B::IndexBuffer>>>,
    ids: SimpleIdArena,
    max_neighbour_delta: usize,
}

impl<B, S> PatchSet<B, S>
where
    B: GeometryBackend,
    S: GroundSampler,
{
    pub fn new(pool: VertexPool, backend: B, sampler: S) -> PatchSet<B, S> {
        let layout = *pool.layout();
        if backend.vertex_capacity() < pool.total_vertices() {
            warn!(
                "Backend holds {} vertices but the pool spans {}",
                backend.vertex_capacity(),
                pool.total_vertices()
            );
        }
        PatchSet {
            layout,
            pool,
            backend,
            sampler,
            patches: Vec::new(),
            ids: SimpleIdArena::with_capacity(MAX_PATCH_COUNT),
            max_neighbour_delta: layout.max_lod_levels() - 1,
        }
    }

    /// Limits the number of patches and how many levels adjacent patches may differ by. Only
    /// valid before any patch is added.
    pub fn with_limits(
        mut self,
        max_patches: usize,
        max_neighbour_delta: usize,
    ) -> Result<Self, TopologyError> {
        if !self.is_empty() {
            return Err(TopologyError::InvalidLayout(
                "patch limits must be set before patches are added".to_string(),
            ));
        }
        if max_neighbour_delta >= self.layout.max_lod_levels() {
            return Err(TopologyError::InvalidLayout(format!(
                "neighbour delta {} exceeds the {} lod levels of the layout",
                max_neighbour_delta,
                self.layout.max_lod_levels()
            )));
        }
        self.ids = SimpleIdArena::with_capacity(max_patches);
        self.max_neighbour_delta = max_neighbour_delta;
        Ok(self)
    }

    pub fn layout(&self) -> &LodLayout {
        &self.layout
    }

    pub fn pool(&self) -> &VertexPool {
        &self.pool
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    pub fn max_neighbour_delta(&self) -> usize {
        self.max_neighbour_delta
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn patch(&self, id: PatchId) -> Option<&Patch<B::IndexBuffer>> {
        self.patches.get(id.0).and_then(Option::as_ref)
    }

    fn patch_mut(&mut self, id: PatchId) -> Result<&mut Patch<B::IndexBuffer>, TopologyError> {
        self.patches
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(TopologyError::UnknownPatch(id))
    }

    fn existing(&self, id: PatchId) -> Result<&Patch<B::IndexBuffer>, TopologyError> {
        self.patch(id).ok_or(TopologyError::UnknownPatch(id))
    }

    pub fn patches(&self) -> impl Iterator<Item = &Patch<B::IndexBuffer>> {
        self.patches.iter().filter_map(Option::as_ref)
    }

    pub fn ids(&self) -> impl Iterator<Item = PatchId> + '_ {
        self.patches().map(Patch::id)
    }

    /// Adds an unlinked patch. Its geometry is built by the next [`PatchSet::update`].
    pub fn add_patch(
        &mut self,
        bounds: PatchBounds,
        level: LodLevel,
    ) -> Result<PatchId, TopologyError> {
        self.layout.check(level)?;
        let slot = self.ids.acquire().ok_or(TopologyError::PatchCapacity {
            capacity: self.ids.capacity(),
        })?;
        if self.patches.len() <= slot {
            self.patches.resize_with(slot + 1, || None);
        }
        let id = PatchId(slot);
        self.patches[slot] = Some(Patch::new(id, bounds, level));
        Ok(id)
    }

    /// Removes a patch, clearing the links its neighbours hold to it and returning its block.
    pub fn remove_patch(&mut self, id: PatchId) -> Result<(), TopologyError> {
        let mut patch = self
            .patches
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(TopologyError::UnknownPatch(id))?;
        patch.release(&mut self.pool);
        self.ids.release(id.0);

        for side in Side::values() {
            let neighbour = patch
                .neighbour(*side)
                .and_then(|n| self.patches.get_mut(n.0))
                .and_then(Option::as_mut);
            if let Some(neighbour) = neighbour {
                if neighbour.neighbour(side.opposite()) == Some(id) {
                    neighbour.set_neighbour(side.opposite(), None);
                }
            }
        }
        Ok(())
    }

    fn check_delta(
        &self,
        patch: PatchId,
        level: LodLevel,
        neighbour: PatchId,
        neighbour_level: LodLevel,
    ) -> Result<(), TopologyError> {
        if level.delta(neighbour_level) > self.max_neighbour_delta {
            Err(TopologyError::UnsupportedLodDelta {
                patch,
                level,
                neighbour,
                neighbour_level,
                max_delta: self.max_neighbour_delta,
            })
        } else {
            Ok(())
        }
    }

    /// Links `first` to `second` across `side` of `first`. Either may be `None`, which clears
    /// the link on the other one. Links that pointed to either patch from elsewhere are cleared
    /// so every link stays mutual.
    fn link(
        &mut self,
        first: Option<PatchId>,
        side: Side,
        second: Option<PatchId>,
    ) -> Result<(), TopologyError> {
        let opposite = side.opposite();
        if let (Some(a), Some(b)) = (first, second) {
            if a == b {
                return Err(TopologyError::SelfLink(a));
            }
            let level_a = self.existing(a)?.lod_level();
            let level_b = self.existing(b)?.lod_level();
            self.check_delta(a, level_a, b, level_b)?;
        }
        for (this, this_side, other) in [(first, side, second), (second, opposite, first)] {
            if let Some(this) = this {
                let previous = self.existing(this)?.neighbour(this_side);
                if let Some(previous) = previous.filter(|p| Some(*p) != other) {
                    let previous = self.patch_mut(previous)?;
                    if previous.neighbour(this_side.opposite()) == Some(this) {
                        previous.set_neighbour(this_side.opposite(), None);
                    }
                }
                self.patch_mut(this)?.set_neighbour(this_side, other);
            }
        }
        Ok(())
    }

    /// Makes `right` the right neighbour of `left` and `left` the left neighbour of `right`.
    pub fn link_left_right(
        &mut self,
        left: Option<PatchId>,
        right: Option<PatchId>,
    ) -> Result<(), TopologyError> {
        self.link(left, Side::Right, right)
    }

    /// Makes `bottom` the bottom neighbour of `top` and `top` the top neighbour of `bottom`.
    pub fn link_top_bottom(
        &mut self,
        top: Option<PatchId>,
        bottom: Option<PatchId>,
    ) -> Result<(), TopologyError> {
        self.link(top, Side::Bottom, bottom)
    }

    /// Tiles `bounds` with `rows` by `cols` linked patches. Ids are returned in row major order.
    pub fn add_grid(
        &mut self,
        rows: usize,
        cols: usize,
        bounds: &PatchBounds,
        level: LodLevel,
    ) -> Result<Vec<PatchId>, TopologyError> {
        self.layout.check(level)?;
        if self.ids.available() < rows * cols {
            return Err(TopologyError::PatchCapacity {
                capacity: self.ids.capacity(),
            });
        }

        let mut ids = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                ids.push(self.add_patch(bounds.cell(rows, cols, row, col), level)?);
            }
        }
        for row in 0..rows {
            for col in 0..cols {
                let id = ids[row * cols + col];
                if col + 1 < cols {
                    self.link_left_right(Some(id), Some(ids[row * cols + col + 1]))?;
                }
                if row + 1 < rows {
                    self.link_top_bottom(Some(id), Some(ids[(row + 1) * cols + col]))?;
                }
            }
        }
        info!("Added a {}x{} patch grid at lod {}", rows, cols, level);
        Ok(ids)
    }

    /// Covers the six faces of a cube with `patches_per_face` squared patches each. Patches are
    /// linked within their face only.
    pub fn add_cube_sphere(
        &mut self,
        patches_per_face: usize,
        half_extent: f64,
        level: LodLevel,
    ) -> Result<Vec<(Face, Vec<PatchId>)>, TopologyError> {
        let total = 6 * patches_per_face * patches_per_face;
        if self.ids.available() < total {
            return Err(TopologyError::PatchCapacity {
                capacity: self.ids.capacity(),
            });
        }
        let mut faces = Vec::with_capacity(6);
        for face in Face::values() {
            let corners = face.corners(half_extent);
            let ids = self.add_grid(patches_per_face, patches_per_face, &corners, level)?;
            faces.push((*face, ids));
        }
        Ok(faces)
    }

    fn validate(
        &self,
        id: PatchId,
        level: LodLevel,
        proposed: &HashMap<PatchId, LodLevel>,
    ) -> Result<(), TopologyError> {
        self.layout.check(level)?;
        let patch = self.existing(id)?;
        for neighbour in patch.neighbours().iter().flatten() {
            let neighbour_level = match proposed.get(neighbour) {
                Some(level) => *level,
                None => self.existing(*neighbour)?.lod_level(),
            };
            self.check_delta(id, level, *neighbour, neighbour_level)?;
        }
        Ok(())
    }

    fn apply(&mut self, id: PatchId, level: LodLevel) -> Result<(), TopologyError> {
        let patch = self.patch_mut(id)?;
        if patch.set_lod_level(level) {
            let neighbours = *patch.neighbours();
            for neighbour in neighbours.iter().flatten() {
                self.patch_mut(*neighbour)?.invalidate_indices();
            }
        }
        Ok(())
    }

    /// Requests a new level for a patch. Fails without changing anything if the level is
    /// outside the layout or too far from a linked neighbour's level.
    pub fn set_lod(&mut self, id: PatchId, level: LodLevel) -> Result<(), TopologyError> {
        self.validate(id, level, &HashMap::new())?;
        self.apply(id, level)
    }

    /// Requests several levels at once. The batch is validated as a whole, so intermediate
    /// states may break the neighbour delta, and nothing changes if the result would.
    pub fn set_lods(&mut self, levels: &[(PatchId, LodLevel)]) -> Result<(), TopologyError> {
        let proposed: HashMap<PatchId, LodLevel> = levels.iter().copied().collect();
        for (id, level) in &proposed {
            self.validate(*id, *level, &proposed)?;
        }
        for (id, level) in levels {
            self.apply(*id, *level)?;
        }
        Ok(())
    }

    pub fn set_visible(&mut self, id: PatchId, visible: bool) -> Result<(), TopologyError> {
        self.patch_mut(id)?.set_visible(visible);
        Ok(())
    }

    fn neighbour_grids(&self, id: PatchId) -> Result<[Option<PatchGrid>; 4], TopologyError> {
        let patch = self.existing(id)?;
        let mut grids = [None; 4];
        for side in Side::values() {
            if let Some(neighbour) = patch.neighbour(*side) {
                grids[side.index()] = self.existing(neighbour)?.grid();
            }
        }
        Ok(grids)
    }

    /// Rebuilds every stale patch.
    ///
    /// First every patch that needs a block at a new level tries to get one. Patches whose pool
    /// is exhausted keep their old vertices and are retried by the next update, though their
    /// seams are still rebuilt. Then the vertices and seams of everything else that is stale are
    /// rebuilt against the resident neighbour grids. Backend failures abort the update.
    pub fn update(&mut self) -> Result<UpdateStats, BuildError> {
        let mut stats = UpdateStats::default();
        let dirty: Vec<PatchId> = self
            .patches()
            .filter(|p| p.needs_rebuild())
            .map(Patch::id)
            .collect();

        let mut deferred = HashSet::new();
        for &id in &dirty {
            let patch = self
                .patches
                .get_mut(id.0)
                .and_then(Option::as_mut)
                .ok_or(TopologyError::UnknownPatch(id))?;
            match patch.pre_build(&mut self.pool) {
                Ok(true) => {
                    let neighbours = *patch.neighbours();
                    for neighbour in neighbours.iter().flatten() {
                        self.patch_mut(*neighbour)?.invalidate_indices();
                    }
                }
                Ok(false) => {}
                Err(err) => {
                    warn!("Deferring rebuild of patch {:?}: {}", id, err);
                    deferred.insert(id);
                }
            }
        }
        stats.deferred = deferred.len();

        let stale: Vec<PatchId> = self
            .patches()
            .filter(|p| p.needs_rebuild())
            .map(Patch::id)
            .collect();
        for id in stale {
            let neighbours = self.neighbour_grids(id)?;
            let patch = self
                .patches
                .get_mut(id.0)
                .and_then(Option::as_mut)
                .ok_or(TopologyError::UnknownPatch(id))?;
            if !deferred.contains(&id) {
                patch.build(&neighbours, &mut self.backend, &self.sampler)?;
                stats.rebuilt += 1;
            } else if patch.block().is_some() && patch.needs_index_rebuild() {
                // Keeps the stale vertices but stitches them to the neighbours as they are now.
                patch.build_seams(&neighbours, &mut self.backend)?;
            }
        }

        stats.triangles = self.patches().map(Patch::triangle_count).sum();
        if stats.rebuilt > 0 || stats.deferred > 0 {
            info!(
                "Rebuilt {} patches, deferred {}, {} triangles in total",
                stats.rebuilt, stats.deferred, stats.triangles
            );
        }
        Ok(stats)
    }

    /// Calls `draw` with the index buffer of every visible built patch. Returns the number of
    /// patches drawn.
    pub fn render<F>(&self, mut draw: F) -> usize
    where
        F: FnMut(&Patch<B::IndexBuffer>, &B::IndexBuffer),
    {
        self.patches()
            .filter(|patch| patch.render(|index_buffer| draw(*patch, index_buffer)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{FlatGround, MemoryBackend};
    use nalgebra::{Point3, Vector3};

    type TestSet = PatchSet<MemoryBackend, FlatGround>;

    fn set_with_capacities(capacities: &[usize]) -> TestSet {
        let pool = VertexPool::new(LodLayout::default(), capacities).unwrap();
        let backend = MemoryBackend::new(pool.total_vertices());
        PatchSet::new(pool, backend, FlatGround::default())
    }

    fn bounds(x: f64, z: f64) -> PatchBounds {
        PatchBounds::from_axes(Point3::new(x, 0.0, z), Vector3::x(), Vector3::z())
    }

    fn square(size: f64) -> PatchBounds {
        PatchBounds::from_axes(Point3::origin(), Vector3::x() * size, Vector3::z() * size)
    }

    #[test]
    fn links_are_mutual() {
        let mut set = set_with_capacities(&[4, 4, 4, 4]);
        let a = set.add_patch(bounds(0.0, 0.0), LodLevel(1)).unwrap();
        let b = set.add_patch(bounds(1.0, 0.0), LodLevel(1)).unwrap();
        let c = set.add_patch(bounds(1.0, 0.0), LodLevel(1)).unwrap();

        set.link_left_right(Some(a), Some(b)).unwrap();
        assert_eq!(set.patch(a).unwrap().neighbour(Side::Right), Some(b));
        assert_eq!(set.patch(b).unwrap().neighbour(Side::Left), Some(a));

        // Relinking a to c drops the stale back link of b.
        set.link_left_right(Some(a), Some(c)).unwrap();
        assert_eq!(set.patch(b).unwrap().neighbour(Side::Left), None);
        assert_eq!(set.patch(c).unwrap().neighbour(Side::Left), Some(a));

        set.link_left_right(Some(a), None).unwrap();
        assert_eq!(set.patch(a).unwrap().neighbour(Side::Right), None);
        assert_eq!(set.patch(c).unwrap().neighbour(Side::Left), None);
    }

    #[test]
    fn grids_are_linked_in_row_major_order() {
        let mut set = set_with_capacities(&[1, 1, 1, 16]);
        let ids = set.add_grid(3, 2, &square(3.0), LodLevel(3)).unwrap();
        assert_eq!(ids.len(), 6);
        let middle = set.patch(ids[2]).unwrap();
        assert_eq!(middle.neighbour(Side::Top), Some(ids[0]));
        assert_eq!(middle.neighbour(Side::Right), Some(ids[3]));
        assert_eq!(middle.neighbour(Side::Bottom), Some(ids[4]));
        assert_eq!(middle.neighbour(Side::Left), None);
    }

    #[test]
    fn rejects_lod_jumps_between_neighbours() {
        let mut set = set_with_capacities(&[4, 4, 4, 4]).with_limits(16, 1).unwrap();
        let ids = set.add_grid(1, 2, &square(2.0), LodLevel(3)).unwrap();
        assert_eq!(
            set.set_lod(ids[0], LodLevel(1)),
            Err(TopologyError::UnsupportedLodDelta {
                patch: ids[0],
                level: LodLevel(1),
                neighbour: ids[1],
                neighbour_level: LodLevel(3),
                max_delta: 1
            })
        );
        assert_eq!(set.patch(ids[0]).unwrap().lod_level(), LodLevel(3));
        assert!(set.set_lod(ids[0], LodLevel(2)).is_ok());
        assert_eq!(
            set.set_lod(ids[0], LodLevel(4)),
            Err(TopologyError::InvalidLodLevel {
                level: LodLevel(4),
                max_lod_levels: 4
            })
        );
    }

    #[test]
    fn limits_are_fixed_once_patches_exist() {
        let mut set = set_with_capacities(&[4, 4, 4, 4]);
        set.add_patch(bounds(0.0, 0.0), LodLevel(3)).unwrap();
        assert!(set.with_limits(16, 1).is_err());
        assert!(set_with_capacities(&[4, 4, 4, 4]).with_limits(16, 4).is_err());
    }

    #[test]
    fn batches_are_validated_as_a_whole() {
        let mut set = set_with_capacities(&[4, 4, 4, 4]).with_limits(16, 1).unwrap();
        let ids = set.add_grid(1, 2, &square(2.0), LodLevel(3)).unwrap();
        set.set_lods(&[(ids[0], LodLevel(1)), (ids[1], LodLevel(2))]).unwrap();
        assert_eq!(set.patch(ids[0]).unwrap().lod_level(), LodLevel(1));

        assert!(set.set_lods(&[(ids[0], LodLevel(3)), (ids[1], LodLevel(1))]).is_err());
        assert_eq!(set.patch(ids[0]).unwrap().lod_level(), LodLevel(1));
        assert_eq!(set.patch(ids[1]).unwrap().lod_level(), LodLevel(2));
    }

    #[test]
    fn lod_changes_invalidate_neighbour_seams() {
        let mut set = set_with_capacities(&[4, 4, 4, 4]);
        let ids = set.add_grid(1, 3, &square(3.0), LodLevel(2)).unwrap();
        set.update().unwrap();
        assert!(set.patches().all(|p| !p.needs_rebuild()));

        set.set_lod(ids[0], LodLevel(1)).unwrap();
        assert!(set.patch(ids[0]).unwrap().needs_vertex_rebuild());
        assert!(set.patch(ids[1]).unwrap().needs_index_rebuild());
        assert!(!set.patch(ids[1]).unwrap().needs_vertex_rebuild());
        assert!(!set.patch(ids[2]).unwrap().needs_rebuild());

        let stats = set.update().unwrap();
        assert_eq!(stats.rebuilt, 2);
        assert_eq!(stats.deferred, 0);
    }

    #[test]
    fn exhausted_levels_defer_and_retry() {
        let mut set = set_with_capacities(&[1, 4, 4, 4]);
        let ids = set.add_grid(1, 2, &square(2.0), LodLevel(1)).unwrap();
        set.update().unwrap();

        set.set_lods(&[(ids[0], LodLevel(0)), (ids[1], LodLevel(0))]).unwrap();
        let stats = set.update().unwrap();
        assert_eq!(stats.deferred, 1);
        assert_eq!(set.patch(ids[0]).unwrap().resident_level(), Some(LodLevel(0)));
        assert_eq!(set.patch(ids[1]).unwrap().resident_level(), Some(LodLevel(1)));
        assert!(set.patch(ids[1]).unwrap().needs_vertex_rebuild());

        set.set_lod(ids[0], LodLevel(1)).unwrap();
        let stats = set.update().unwrap();
        assert_eq!(stats.deferred, 0);
        assert_eq!(set.patch(ids[0]).unwrap().resident_level(), Some(LodLevel(1)));
        assert_eq!(set.patch(ids[1]).unwrap().resident_level(), Some(LodLevel(0)));
        assert!(set.patches().all(|p| !p.needs_rebuild()));
    }

    #[test]
    fn removing_a_patch_returns_its_block_and_unlinks_it() {
        let mut set = set_with_capacities(&[4, 4, 4, 4]);
        let ids = set.add_grid(2, 2, &square(2.0), LodLevel(2)).unwrap();
        set.update().unwrap();
        assert_eq!(set.pool().allocated_blocks(LodLevel(2)), 4);

        set.remove_patch(ids[0]).unwrap();
        assert_eq!(set.pool().allocated_blocks(LodLevel(2)), 3);
        assert_eq!(set.patch(ids[1]).unwrap().neighbour(Side::Left), None);
        assert_eq!(set.patch(ids[2]).unwrap().neighbour(Side::Top), None);
        assert!(set.patch(ids[1]).unwrap().needs_index_rebuild());
        assert_eq!(set.remove_patch(ids[0]), Err(TopologyError::UnknownPatch(ids[0])));

        // The slot is recycled.
        let id = set.add_patch(bounds(0.0, 0.0), LodLevel(2)).unwrap();
        assert_eq!(id, ids[0]);
    }

    #[test]
    fn patches_cannot_neighbour_themselves() {
        let mut set = set_with_capacities(&[4, 4, 4, 4]);
        let a = set.add_patch(bounds(0.0, 0.0), LodLevel(3)).unwrap();
        assert_eq!(
            set.link_left_right(Some(a), Some(a)),
            Err(TopologyError::SelfLink(a))
        );
        assert_eq!(set.patch(a).unwrap().neighbours(), &[None; 4]);

        set.update().unwrap();
        set.remove_patch(a).unwrap();
        assert_eq!(set.pool().allocated_blocks(LodLevel(3)), 0);
        assert!(set.is_empty());
        assert_eq!(set.patches().count(), 0);
    }

    #[test]
    fn patch_capacity_is_enforced_up_front() {
        let mut set = set_with_capacities(&[4, 4, 4, 4]).with_limits(3, 3).unwrap();
        assert_eq!(
            set.add_grid(2, 2, &square(2.0), LodLevel(3)),
            Err(TopologyError::PatchCapacity { capacity: 3 })
        );
        assert!(set.is_empty());
    }

    #[test]
    fn renders_visible_patches_only() {
        let mut set = set_with_capacities(&[4, 4, 4, 4]);
        let ids = set.add_grid(1, 3, &square(3.0), LodLevel(3)).unwrap();
        assert_eq!(set.render(|_, _| ()), 0);

        set.update().unwrap();
        set.set_visible(ids[1], false).unwrap();
        let mut drawn = Vec::new();
        assert_eq!(set.render(|patch, indices| drawn.push((patch.id(), indices.len()))), 2);
        assert_eq!(drawn, vec![(ids[0], 6), (ids[2], 6)]);
    }

    #[test]
    fn cube_spheres_cover_six_faces() {
        let mut set = set_with_capacities(&[1, 1, 1, 64]);
        let faces = set.add_cube_sphere(2, 1.0, LodLevel(3)).unwrap();
        assert_eq!(faces.len(), 6);
        assert_eq!(set.len(), 24);
        let stats = set.update().unwrap();
        assert_eq!(stats.rebuilt, 24);
        assert_eq!(stats.triangles, 48);
    }
}
