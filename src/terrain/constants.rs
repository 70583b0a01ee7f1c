/// Number of lod levels a default layout carries; level 0 is the finest.
pub const MAX_LOD_LEVELS: usize = 4;

/// Deepest layout supported; the finest grid of such a layout is 2049 vertices along an edge.
pub const MAX_SUPPORTED_LOD_LEVELS: usize = 12;

/// Blocks reserved for the finest level of a default pool.
pub const FINEST_LEVEL_BLOCKS: usize = 32;

/// Blocks reserved for every other level of a default pool.
pub const COARSE_LEVEL_BLOCKS: usize = 64;

pub const MAX_PATCH_COUNT: usize = 4096;

/// Block capacities for a pool covering `levels` lod levels.
pub fn default_block_capacities(levels: usize) -> Vec<usize> {
    (0..levels)
        .map(|level| {
            if level == 0 {
                FINEST_LEVEL_BLOCKS
            } else {
                COARSE_LEVEL_BLOCKS
            }
        })
        .collect()
}
