use super::constants::{MAX_LOD_LEVELS, MAX_SUPPORTED_LOD_LEVELS};
use crate::error::TopologyError;
use std::fmt;

/// A discrete resolution tier. Level 0 is the finest, every next level halves the number of
/// segments along a patch edge.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LodLevel(pub u8);

impl LodLevel {
    pub const FINEST: LodLevel = LodLevel(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Number of levels between `self` and `other`.
    pub fn delta(self, other: LodLevel) -> usize {
        (self.0 as i32 - other.0 as i32).unsigned_abs() as usize
    }

    /// True if `self` renders with fewer vertices than `other`.
    pub fn is_coarser_than(self, other: LodLevel) -> bool {
        self.0 > other.0
    }
}

impl fmt::Display for LodLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for LodLevel {
    fn from(level: u8) -> Self {
        LodLevel(level)
    }
}

/// Describes the resolution of every lod level.
///
/// A layout with `n` levels has a finest edge of `2^(n-1)` segments. Each coarser level halves
/// that, down to a single segment (two vertices) at level `n-1`, so the edge vertex counts are
/// always a power of two plus one and adjacent levels line up vertex for vertex.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LodLayout {
    max_lod_levels: usize,
}

impl Default for LodLayout {
    fn default() -> Self {
        LodLayout {
            max_lod_levels: MAX_LOD_LEVELS,
        }
    }
}

impl LodLayout {
    pub fn new(max_lod_levels: usize) -> Result<LodLayout, TopologyError> {
        if max_lod_levels == 0 || max_lod_levels > MAX_SUPPORTED_LOD_LEVELS {
            return Err(TopologyError::InvalidLayout(format!(
                "{} lod levels requested, expected 1..={}",
                max_lod_levels, MAX_SUPPORTED_LOD_LEVELS
            )));
        }
        Ok(LodLayout { max_lod_levels })
    }

    pub fn max_lod_levels(&self) -> usize {
        self.max_lod_levels
    }

    /// The coarsest level of this layout.
    pub fn coarsest(&self) -> LodLevel {
        LodLevel((self.max_lod_levels - 1) as u8)
    }

    pub fn contains(&self, level: LodLevel) -> bool {
        level.index() < self.max_lod_levels
    }

    pub fn levels(&self) -> impl Iterator<Item = LodLevel> {
        (0..self.max_lod_levels as u8).map(LodLevel)
    }

    /// Returns `level` if it belongs to the layout.
    pub fn check(&self, level: LodLevel) -> Result<LodLevel, TopologyError> {
        if self.contains(level) {
            Ok(level)
        } else {
            Err(TopologyError::InvalidLodLevel {
                level,
                max_lod_levels: self.max_lod_levels,
            })
        }
    }

    /// Number of segments along the edge of a level 0 patch.
    pub fn base(&self) -> usize {
        1 << (self.max_lod_levels - 1)
    }

    /// Number of vertices along one edge of a patch at `level`.
    pub fn edge_vertex_count(&self, level: LodLevel) -> usize {
        debug_assert!(self.contains(level));
        (self.base() >> level.index()) + 1
    }

    /// Number of vertices in a patch at `level`.
    pub fn vertex_count(&self, level: LodLevel) -> usize {
        let edge = self.edge_vertex_count(level);
        edge * edge
    }

    /// How many fine edge segments span one coarse edge segment.
    pub fn ratio(coarse: LodLevel, fine: LodLevel) -> usize {
        debug_assert!(coarse >= fine);
        1 << (coarse.index() - fine.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_edge_sizes() {
        let layout = LodLayout::default();
        let edges: Vec<usize> = layout.levels().map(|l| layout.edge_vertex_count(l)).collect();
        assert_eq!(edges, vec![9, 5, 3, 2]);
        assert_eq!(layout.base(), 8);
        assert_eq!(layout.coarsest(), LodLevel(3));
    }

    #[test]
    fn edge_sizes_are_power_of_two_plus_one_and_decreasing() {
        for levels in 1..=MAX_SUPPORTED_LOD_LEVELS {
            let layout = LodLayout::new(levels).unwrap();
            let mut previous = usize::MAX;
            for level in layout.levels() {
                let edge = layout.edge_vertex_count(level);
                assert!(edge >= 2);
                assert!((edge - 1).is_power_of_two());
                assert_eq!(edge, layout.base() / (1 << level.index()) + 1);
                assert!(edge < previous);
                previous = edge;
            }
            assert_eq!(layout.edge_vertex_count(layout.coarsest()), 2);
        }
    }

    #[test]
    fn ratios_line_up_adjacent_edges() {
        let layout = LodLayout::default();
        for fine in layout.levels() {
            for coarse in layout.levels().filter(|l| *l >= fine) {
                let ratio = LodLayout::ratio(coarse, fine);
                assert!(ratio.is_power_of_two());
                let m = layout.edge_vertex_count(coarse);
                let k = layout.edge_vertex_count(fine);
                assert_eq!(k, (m - 1) * ratio + 1);
            }
        }
    }

    #[test]
    fn rejects_out_of_range_layouts_and_levels() {
        assert!(LodLayout::new(0).is_err());
        assert!(LodLayout::new(MAX_SUPPORTED_LOD_LEVELS + 1).is_err());

        let layout = LodLayout::default();
        assert!(layout.check(LodLevel(3)).is_ok());
        assert_eq!(
            layout.check(LodLevel(4)),
            Err(TopologyError::InvalidLodLevel {
                level: LodLevel(4),
                max_lod_levels: 4
            })
        );
    }

    #[test]
    fn level_ordering_means_coarser() {
        assert!(LodLevel(2).is_coarser_than(LodLevel(1)));
        assert!(!LodLevel(1).is_coarser_than(LodLevel(1)));
        assert_eq!(LodLevel(0).delta(LodLevel(3)), 3);
    }
}
