use super::constants::default_block_capacities;
use super::lod::{LodLayout, LodLevel};
use super::stitch::PatchGrid;
use crate::error::PoolError;
use crate::id_arena::{IdArena, IdGenerator, SimpleIdArena};
use std::ops::Range;

/// A range of the shared vertex storage big enough for one patch at `level`.
///
/// Blocks are not `Clone`: the holder owns the range exclusively until it hands the block back
/// to [`VertexPool::release`].
#[derive(Debug, PartialEq, Eq)]
pub struct VertexBlock {
    level: LodLevel,
    slot: usize,
    offset: usize,
    edge: usize,
}

impl VertexBlock {
    pub fn level(&self) -> LodLevel {
        self.level
    }

    /// Index of the first vertex of the block in the shared storage.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of vertices in the block.
    pub fn len(&self) -> usize {
        self.edge * self.edge
    }

    pub fn is_empty(&self) -> bool {
        self.edge == 0
    }

    /// Number of vertices along one edge of the patch stored in this block.
    pub fn edge_vertex_count(&self) -> usize {
        self.edge
    }

    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len()
    }

    /// Slot of the block within its level's partition.
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// The vertex grid this block holds, addressed in shared storage indices.
    pub fn grid(&self) -> PatchGrid {
        PatchGrid::new(self.offset as u32, self.edge as u32, self.level)
    }
}

/// One level's partition of the shared storage.
#[derive(Debug)]
struct Partition {
    slots: SimpleIdArena,
    first_vertex: usize,
    edge: usize,
}

impl Partition {
    fn block_len(&self) -> usize {
        self.edge * self.edge
    }
}

/// Fixed capacity vertex storage budget, partitioned at construction into equally sized blocks
/// per lod level. The pool never grows; running out is reported as [`PoolError::Exhausted`].
#[derive(Debug)]
pub struct VertexPool {
    layout: LodLayout,
    partitions: Vec<Partition>,
    total_vertices: usize,
}

impl VertexPool {
    /// Creates a pool with `capacities[level]` blocks for every level of `layout`.
    pub fn new(layout: LodLayout, capacities: &[usize]) -> Result<VertexPool, PoolError> {
        if capacities.len() != layout.max_lod_levels() {
            return Err(PoolError::CapacityMismatch {
                levels: layout.max_lod_levels(),
                actual: capacities.len(),
            });
        }

        let mut first_vertex = 0;
        let partitions = layout
            .levels()
            .zip(capacities.iter())
            .map(|(level, &capacity)| {
                let partition = Partition {
                    slots: SimpleIdArena::with_capacity(capacity),
                    first_vertex,
                    edge: layout.edge_vertex_count(level),
                };
                first_vertex += capacity * partition.block_len();
                partition
            })
            .collect();

        debug!(
            "Partitioned {} vertices across {} lod levels",
            first_vertex,
            layout.max_lod_levels()
        );

        Ok(VertexPool {
            layout,
            partitions,
            total_vertices: first_vertex,
        })
    }

    /// Creates a pool with the default block budget for `layout`.
    pub fn with_default_capacities(layout: LodLayout) -> Result<VertexPool, PoolError> {
        VertexPool::new(layout, &default_block_capacities(layout.max_lod_levels()))
    }

    pub fn layout(&self) -> &LodLayout {
        &self.layout
    }

    /// Size of the shared vertex storage backing every block of the pool.
    pub fn total_vertices(&self) -> usize {
        self.total_vertices
    }

    fn partition(&self, level: LodLevel) -> Result<&Partition, PoolError> {
        self.partitions
            .get(level.index())
            .ok_or(PoolError::UnknownLevel { level })
    }

    /// Hands out any free block of `level`.
    pub fn allocate(&mut self, level: LodLevel) -> Result<VertexBlock, PoolError> {
        let partition = self
            .partitions
            .get_mut(level.index())
            .ok_or(PoolError::UnknownLevel { level })?;

        match partition.slots.acquire() {
            Some(slot) => {
                let block = VertexBlock {
                    level,
                    slot,
                    offset: partition.first_vertex + slot * partition.block_len(),
                    edge: partition.edge,
                };
                trace!("Allocated lod {} block {} at {:?}", level, slot, block.range());
                Ok(block)
            }
            None => {
                let capacity = partition.slots.capacity();
                warn!("Vertex pool exhausted for lod {} ({} blocks)", level, capacity);
                Err(PoolError::Exhausted { level, capacity })
            }
        }
    }

    /// Returns a block to its level's free list.
    pub fn release(&mut self, block: VertexBlock) {
        trace!("Released lod {} block {}", block.level, block.slot);
        match self.partitions.get_mut(block.level.index()) {
            Some(partition) => {
                let offset = partition.first_vertex + block.slot * partition.block_len();
                debug_assert!(
                    block.edge == partition.edge && block.offset == offset,
                    "block at {:?} does not belong to this pool",
                    block.range()
                );
                partition.slots.release(block.slot)
            }
            None => debug_assert!(false, "block of foreign lod {} released", block.level),
        }
    }

    pub fn capacity(&self, level: LodLevel) -> usize {
        self.partition(level).map(|p| p.slots.capacity()).unwrap_or(0)
    }

    pub fn allocated_blocks(&self, level: LodLevel) -> usize {
        self.partition(level).map(|p| p.slots.len()).unwrap_or(0)
    }

    pub fn free_blocks(&self, level: LodLevel) -> usize {
        self.partition(level).map(|p| p.slots.available()).unwrap_or(0)
    }
}
