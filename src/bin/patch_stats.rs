#[macro_use]
extern crate log;

use nalgebra::{Point3, Vector3};
use patchwork::terrain::{Face, LodLayout, LodLevel, MemoryBackend, PatchId, PatchSet, SphereGround};
use patchwork::TerrainConfig;
use std::error::Error;

/// Levels for the patches of one face: the patch closest to `focus` gets the finest level and
/// every ring of patches around it one level coarser, so neighbours never differ by more than
/// one level.
fn ring_levels(
    face: Face,
    ids: &[PatchId],
    patches_per_face: usize,
    focus: &Vector3<f64>,
    layout: &LodLayout,
) -> Vec<(PatchId, LodLevel)> {
    let bounds = face.corners(1.0);
    let centre = |i: usize| {
        let (row, col) = (i / patches_per_face, i % patches_per_face);
        let cell = bounds.cell(patches_per_face, patches_per_face, row, col);
        cell.centre().coords.normalize().dot(focus)
    };
    let closest = (0..ids.len())
        .max_by(|a, b| centre(*a).total_cmp(&centre(*b)))
        .unwrap_or(0);
    let (focus_row, focus_col) = (closest / patches_per_face, closest % patches_per_face);

    ids.iter()
        .enumerate()
        .map(|(i, id)| {
            let (row, col) = (i / patches_per_face, i % patches_per_face);
            let ring = row.abs_diff(focus_row).max(col.abs_diff(focus_col));
            (*id, LodLevel(ring.min(layout.coarsest().index()) as u8))
        })
        .collect()
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => TerrainConfig::load(path)?,
        None => TerrainConfig::default(),
    };

    let pool = config.pool()?;
    let layout = *pool.layout();
    let backend = MemoryBackend::new(pool.total_vertices());
    let sampler = SphereGround::new(Point3::origin(), config.radius).with_cube_morph(1.0);
    let mut set = PatchSet::new(pool, backend, sampler)
        .with_limits(config.max_patches, config.neighbour_delta())?;
    let faces = set.add_cube_sphere(config.patches_per_face, 1.0, layout.coarsest())?;

    let focus = Vector3::from(config.focus)
        .try_normalize(1e-12)
        .unwrap_or_else(Vector3::z);
    let focus_face = Face::values()
        .copied()
        .max_by(|a, b| a.normal().dot(&focus).total_cmp(&b.normal().dot(&focus)))
        .unwrap_or(Face::Front);
    info!("Refining {:?} face towards {:?}", focus_face, focus);

    for (face, ids) in faces.iter().filter(|(face, _)| *face == focus_face) {
        let levels = ring_levels(*face, ids, config.patches_per_face, &focus, &layout);
        set.set_lods(&levels)?;
    }

    let mut stats = set.update()?;
    if stats.deferred > 0 {
        // A second pass picks up blocks released by patches that moved to another level.
        stats = set.update()?;
    }

    for level in layout.levels() {
        info!(
            "lod {}: {} of {} blocks in use ({} vertices each)",
            level,
            set.pool().allocated_blocks(level),
            set.pool().capacity(level),
            layout.vertex_count(level)
        );
    }
    let drawn = set.render(|_, _| ());
    info!(
        "{} patches, {} drawn, {} triangles, {} deferred",
        set.len(),
        drawn,
        stats.triangles,
        stats.deferred
    );
    Ok(())
}

fn main() {
    pretty_env_logger::init();

    if let Err(err) = run() {
        error!("{}", err);
        std::process::exit(1);
    }
}
