//! Index buffer construction for patches whose neighbours use a different lod level.
//!
//! Only the coarser side of a mismatched edge stitches. It drops its own outermost row along
//! that edge and fills the band between its first inner row and the finer neighbour's edge
//! vertices, so every fine vertex on the seam is referenced and no T-junction remains. The
//! neighbour's index buffer is never touched.
//!
//! All triangles are wound counter-clockwise in `(col, row)` space, the same way as the two
//! triangles of a regular interior quad.

use super::lod::{LodLayout, LodLevel};
use std::ops::Range;

/// Every side, in [`Side::index`] order.
static SIDES: [Side; 4] = [Side::Left, Side::Top, Side::Right, Side::Bottom];

/// One side of a patch, named from the patch's own point of view.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Top,
    Right,
    Bottom,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn values() -> impl Iterator<Item = &'static Side> {
        SIDES.iter()
    }

    /// Strips along these sides walk their runs against the interior winding.
    fn flips_strip(self) -> bool {
        match self {
            Side::Top | Side::Right => true,
            Side::Left | Side::Bottom => false,
        }
    }
}

/// A patch vertex grid resident in the shared vertex buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PatchGrid {
    pub base: u32,
    pub edge: u32,
    pub level: LodLevel,
}

impl PatchGrid {
    pub fn new(base: u32, edge: u32, level: LodLevel) -> PatchGrid {
        debug_assert!(edge >= 2);
        PatchGrid { base, edge, level }
    }

    /// Shared buffer index of vertex `(row, col)`.
    pub fn index(&self, row: u32, col: u32) -> u32 {
        debug_assert!(row < self.edge && col < self.edge);
        self.base + row * self.edge + col
    }

    /// The vertices `inset` rows or columns in from `side`, in increasing row or column order.
    pub fn edge_run(&self, side: Side, inset: u32) -> EdgeRun {
        debug_assert!(inset < self.edge);
        let last = self.edge - 1;
        let (first, step) = match side {
            Side::Left => (self.index(0, inset), self.edge),
            Side::Right => (self.index(0, last - inset), self.edge),
            Side::Top => (self.index(inset, 0), 1),
            Side::Bottom => (self.index(last - inset, 0), 1),
        };
        EdgeRun {
            first,
            step,
            len: self.edge as usize,
        }
    }
}

/// Evenly strided run of vertex indices.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EdgeRun {
    pub first: u32,
    pub step: u32,
    pub len: usize,
}

impl EdgeRun {
    pub fn at(&self, i: usize) -> u32 {
        debug_assert!(i < self.len);
        self.first + i as u32 * self.step
    }

    pub fn last(&self) -> u32 {
        self.at(self.len - 1)
    }

    /// The `len` vertices starting at position `start`.
    pub fn sub(&self, start: usize, len: usize) -> EdgeRun {
        debug_assert!(start + len <= self.len);
        EdgeRun {
            first: self.first + start as u32 * self.step,
            step: self.step,
            len,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> {
        let run = *self;
        (0..run.len).map(move |i| run.at(i))
    }
}

fn push_triangle(out: &mut Vec<u32>, flip: bool, a: u32, b: u32, c: u32) {
    if flip {
        out.extend_from_slice(&[a, c, b]);
    } else {
        out.extend_from_slice(&[a, b, c]);
    }
}

/// Triangulates the band between a coarse run of `m` vertices and a parallel fine run of
/// `(m - 1) * ratio + 1` vertices spanning the same extent.
///
/// The walk follows the fine run one segment at a time. An error accumulator starts at `ratio`
/// and counts down the fine steps left before the coarse cursor moves on, so coarse steps land
/// on the fine vertex aligned with the next coarse vertex. Each fine step emits
/// `(fine, coarse, next fine)` and each coarse step `(coarse, next coarse, fine)`. The last
/// coarse segment is closed by `(last fine, coarse, next coarse)` once the fine run is used up,
/// giving `(k - 1) + (m - 1)` triangles. With `flip` set the last two corners of every triangle
/// are swapped. Returns the number of triangles emitted.
pub fn stitch_strip(
    coarse: EdgeRun,
    fine: EdgeRun,
    ratio: usize,
    flip: bool,
    out: &mut Vec<u32>,
) -> usize {
    debug_assert!(ratio.is_power_of_two());
    if coarse.len < 2 || fine.len < 2 {
        return 0;
    }
    debug_assert_eq!(fine.len, (coarse.len - 1) * ratio + 1);

    let mut triangles = 0;
    let mut c = 0;
    let mut error = ratio;
    for f in 0..fine.len - 1 {
        if error == 0 && c + 1 < coarse.len {
            push_triangle(out, flip, coarse.at(c), coarse.at(c + 1), fine.at(f));
            triangles += 1;
            c += 1;
            error = ratio;
        }
        push_triangle(out, flip, fine.at(f), coarse.at(c), fine.at(f + 1));
        triangles += 1;
        error -= 1;
    }

    // Closes the coarse segments the walk has not stepped over.
    while c + 1 < coarse.len {
        push_triangle(out, flip, fine.last(), coarse.at(c), coarse.at(c + 1));
        triangles += 1;
        c += 1;
    }
    triangles
}

/// Stitches the band along `side` between rows or columns `from..=to` of the own patch.
fn band(
    own: &PatchGrid,
    side: Side,
    neighbour: &PatchGrid,
    from: usize,
    to: usize,
    out: &mut Vec<u32>,
) -> usize {
    let ratio = LodLayout::ratio(own.level, neighbour.level);
    debug_assert_eq!(neighbour.edge as usize - 1, (own.edge as usize - 1) * ratio);
    let coarse = own.edge_run(side, 1).sub(from, to - from + 1);
    let fine = neighbour
        .edge_run(side.opposite(), 0)
        .sub(from * ratio, (to - from) * ratio + 1);
    stitch_strip(coarse, fine, ratio, side.flips_strip(), out)
}

/// The neighbour on `side` if the own patch is responsible for the seam between them.
fn seam(own: &PatchGrid, neighbour: Option<&PatchGrid>) -> Option<PatchGrid> {
    neighbour
        .filter(|n| own.level.is_coarser_than(n.level))
        .copied()
}

/// Emits the strip of the full `side` of `own` against a finer `neighbour`.
///
/// Returns false and emits nothing when there is no neighbour or `own` is not coarser than it;
/// in that case the seam is either regular or stitched from the other side.
pub fn stitch_side(
    own: &PatchGrid,
    side: Side,
    neighbour: Option<&PatchGrid>,
    out: &mut Vec<u32>,
) -> bool {
    match seam(own, neighbour) {
        Some(neighbour) => {
            band(own, side, &neighbour, 0, own.edge as usize - 1, out);
            true
        }
        None => false,
    }
}

fn quads(own: &PatchGrid, rows: Range<u32>, cols: Range<u32>, out: &mut Vec<u32>) {
    for row in rows {
        for col in cols.clone() {
            let top_left = own.index(row, col);
            let top_right = own.index(row, col + 1);
            let bottom_left = own.index(row + 1, col);
            let bottom_right = own.index(row + 1, col + 1);
            out.extend_from_slice(&[top_left, top_right, bottom_left]);
            out.extend_from_slice(&[top_right, bottom_right, bottom_left]);
        }
    }
}

fn fan(centre: u32, rim: &[u32], out: &mut Vec<u32>) {
    for pair in rim.windows(2) {
        out.extend_from_slice(&[centre, pair[0], pair[1]]);
    }
}

/// The seam vertices along `side`: the finer neighbour's edge if stitched, else the own edge.
fn boundary_run(own: &PatchGrid, side: Side, seam: &Option<PatchGrid>) -> EdgeRun {
    match seam {
        Some(neighbour) => neighbour.edge_run(side.opposite(), 0),
        None => own.edge_run(side, 0),
    }
}

/// Triangulates a coarsest patch, which has no inner row to stitch against, as the convex
/// polygon formed by its boundary. The boundary is split at the top left and bottom right
/// corners into two chains that are zipped together in order of distance along the diagonal.
fn zip_boundary(own: &PatchGrid, seams: &[Option<PatchGrid>; 4], out: &mut Vec<u32>) {
    let runs = SIDES.map(|side| boundary_run(own, side, &seams[side.index()]));
    let [left, top, right, bottom] = runs;
    let span = runs.iter().map(|r| r.len - 1).max().unwrap_or(1);

    let chain = |first: EdgeRun, second: EdgeRun| -> Vec<(u32, usize)> {
        let first_scale = span / (first.len - 1);
        let second_scale = span / (second.len - 1);
        first
            .iter()
            .enumerate()
            .map(|(i, index)| (index, i * first_scale))
            .chain(
                second
                    .iter()
                    .enumerate()
                    .skip(1)
                    .map(|(i, index)| (index, span + i * second_scale)),
            )
            .collect()
    };
    let a = chain(top, right);
    let b = chain(left, bottom);
    let (na, nb) = (a.len(), b.len());

    out.extend_from_slice(&[a[0].0, a[1].0, b[1].0]);
    let (mut i, mut j) = (1, 1);
    while i < na - 2 || j < nb - 2 {
        let advance_a = j == nb - 2 || (i < na - 2 && a[i + 1].1 <= b[j + 1].1);
        if advance_a {
            out.extend_from_slice(&[a[i].0, a[i + 1].0, b[j].0]);
            i += 1;
        } else {
            out.extend_from_slice(&[a[i].0, b[j + 1].0, b[j].0]);
            j += 1;
        }
    }
    out.extend_from_slice(&[a[i].0, a[na - 1].0, b[j].0]);
}

/// Builds the complete triangle list of `own` given the resident grids of its neighbours,
/// indexed by [`Side::index`].
///
/// Stitched sides get a band each. Where two stitched sides meet, the corner cell is covered by
/// a fan around the inner corner vertex and the bands are trimmed to leave it free. The
/// remaining interior is triangulated as regular quads.
pub fn build_indices(own: &PatchGrid, neighbours: &[Option<PatchGrid>; 4]) -> Vec<u32> {
    let seams = SIDES.map(|side| seam(own, neighbours[side.index()].as_ref()));
    let last = own.edge - 1;
    let mut out = Vec::with_capacity(6 * (last * last) as usize + 3 * 4 * own.edge as usize);

    if seams.iter().all(Option::is_none) {
        quads(own, 0..last, 0..last, &mut out);
        return out;
    }
    if own.edge < 3 {
        zip_boundary(own, &seams, &mut out);
        return out;
    }

    let [left, top, right, bottom] = seams;
    let first_row = top.is_some() as u32;
    let last_row = last - bottom.is_some() as u32;
    let first_col = left.is_some() as u32;
    let last_col = last - right.is_some() as u32;

    for (side, stitched) in [(Side::Left, &left), (Side::Right, &right)] {
        if let Some(neighbour) = stitched {
            band(own, side, neighbour, first_row as usize, last_row as usize, &mut out);
        }
    }
    for (side, stitched) in [(Side::Top, &top), (Side::Bottom, &bottom)] {
        if let Some(neighbour) = stitched {
            band(own, side, neighbour, first_col as usize, last_col as usize, &mut out);
        }
    }

    let run = |side: Side, neighbour: &PatchGrid| {
        (
            neighbour.edge_run(side.opposite(), 0),
            LodLayout::ratio(own.level, neighbour.level),
        )
    };
    let mut rim = Vec::new();
    if let (Some(l), Some(t)) = (&left, &top) {
        let ((l, lr), (t, tr)) = (run(Side::Left, l), run(Side::Top, t));
        rim.clear();
        rim.extend((0..=lr).rev().map(|i| l.at(i)));
        rim.extend((1..=tr).map(|i| t.at(i)));
        fan(own.index(1, 1), &rim, &mut out);
    }
    if let (Some(t), Some(r)) = (&top, &right) {
        let ((t, tr), (r, rr)) = (run(Side::Top, t), run(Side::Right, r));
        rim.clear();
        rim.extend((t.len - 1 - tr..t.len).map(|i| t.at(i)));
        rim.extend((1..=rr).map(|i| r.at(i)));
        fan(own.index(1, last - 1), &rim, &mut out);
    }
    if let (Some(r), Some(b)) = (&right, &bottom) {
        let ((r, rr), (b, br)) = (run(Side::Right, r), run(Side::Bottom, b));
        rim.clear();
        rim.extend((r.len - 1 - rr..r.len).map(|i| r.at(i)));
        rim.extend((b.len - 1 - br..b.len - 1).rev().map(|i| b.at(i)));
        fan(own.index(last - 1, last - 1), &rim, &mut out);
    }
    if let (Some(b), Some(l)) = (&bottom, &left) {
        let ((b, br), (l, lr)) = (run(Side::Bottom, b), run(Side::Left, l));
        rim.clear();
        rim.extend((0..=br).rev().map(|i| b.at(i)));
        rim.extend((l.len - 1 - lr..l.len - 1).rev().map(|i| l.at(i)));
        fan(own.index(last - 1, 1), &rim, &mut out);
    }

    quads(own, first_row..last_row, first_col..last_col, &mut out);
    out
}
