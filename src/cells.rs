//! Cell attribute migration (the second migration stage).
//!
//! For every land cell in the new polygon mesh, finds the nearest land cell
//! in the parent mesh and copies the discrete attributes forward. The
//! area-dependent quantities (suitability, population) are rescaled by the
//! cell-area ratio divided by the global scale factor. Water cells are
//! skipped and keep zeroed buffers; their biomes are handled by the recolor
//! pass.

use rayon::prelude::*;

use crate::dataset::{CellData, MapDataset};
use crate::error::ResampleError;
use crate::mesh::PolygonMesh;
use crate::pipeline::ResampleContext;
use crate::spatial::SpatialIndex;

/// Build a nearest-cell index over the land cells of a mesh.
pub(crate) fn land_index(mesh: &PolygonMesh) -> SpatialIndex {
    SpatialIndex::build(
        mesh.points
            .iter()
            .enumerate()
            .filter(|&(cell, _)| !mesh.is_water(cell))
            .map(|(cell, &(x, y))| (x, y, cell as u32)),
    )
}

/// Attributes migrated for one land cell.
struct Migrated {
    biome: u8,
    flux: u16,
    suitability: f32,
    population: f32,
    culture: u16,
    state: u16,
    religion: u16,
    province: u16,
}

/// Migrate per-cell attributes from the parent dataset onto `cells`.
///
/// The per-cell lookups are independent and run in parallel; results are
/// written back in cell-index order so output is deterministic.
pub fn migrate_attributes(
    parent: &MapDataset,
    mesh: &PolygonMesh,
    cells: &mut CellData,
    ctx: &ResampleContext,
) -> Result<(), ResampleError> {
    let parent_land = land_index(&parent.mesh);
    if parent_land.is_empty() {
        return Err(ResampleError::NoLandCells {
            stage: "cell attribute migration",
        });
    }

    let migrated: Vec<Option<Migrated>> = (0..mesh.len())
        .into_par_iter()
        .map(|cell| {
            if mesh.is_water(cell) {
                return None;
            }
            let (x, y) = mesh.points[cell];
            let (px, py) = (ctx.inverse)(x, y);
            // The land index is non-empty, checked above.
            let parent_cell = parent_land.nearest(px, py)? as usize;

            let area_ratio = mesh.areas[cell] / parent.mesh.areas[parent_cell];
            let scale_ratio = area_ratio / ctx.scale;

            Some(Migrated {
                biome: parent.cells.biome[parent_cell],
                flux: parent.cells.flux[parent_cell],
                suitability: parent.cells.suitability[parent_cell] * scale_ratio,
                population: parent.cells.population[parent_cell] * scale_ratio,
                culture: parent.cells.culture[parent_cell],
                state: parent.cells.state[parent_cell],
                religion: parent.cells.religion[parent_cell],
                province: parent.cells.province[parent_cell],
            })
        })
        .collect();

    for (cell, entry) in migrated.into_iter().enumerate() {
        let Some(m) = entry else { continue };
        cells.biome[cell] = m.biome;
        cells.flux[cell] = m.flux;
        cells.suitability[cell] = m.suitability;
        cells.population[cell] = m.population;
        cells.culture[cell] = m.culture;
        cells.state[cell] = m.state;
        cells.religion[cell] = m.religion;
        cells.province[cell] = m.province;
    }

    Ok(())
}
