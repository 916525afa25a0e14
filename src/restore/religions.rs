//! Religion restoration. Same shape as culture restoration: tombstone
//! religions without a migrated footprint, reproject surviving centers with
//! a pole-of-inaccessibility fallback.

use crate::dataset::{CellData, MapDataset};
use crate::entities::Religion;
use crate::error::ResampleError;
use crate::mesh::{round2, PolygonMesh};
use crate::pipeline::{PoleLocator, ResampleContext};
use crate::restore::valid_ids;

pub fn restore_religions(
    parent: &MapDataset,
    mesh: &PolygonMesh,
    cells: &CellData,
    poles: &dyn PoleLocator,
    ctx: &ResampleContext,
) -> Result<Vec<Religion>, ResampleError> {
    let valid = valid_ids(&cells.religion);
    let pole_map = poles.poles(mesh, &|cell| cells.religion[cell]);

    parent
        .religions
        .iter()
        .map(|religion| {
            if religion.id == 0 || religion.removed {
                return Ok(religion.clone());
            }
            if !valid.contains(&religion.id) {
                log::debug!(
                    "religion {} ({}) lost its footprint",
                    religion.id,
                    religion.name
                );
                return Ok(Religion {
                    removed: true,
                    lock: false,
                    ..religion.clone()
                });
            }

            let (px, py) = parent.mesh.points[religion.center as usize];
            let (x, y) = (ctx.projection)(px, py);
            let (x, y) = (round2(x), round2(y));
            let (cx, cy) = if ctx.bounds.contains(x, y) {
                (x, y)
            } else {
                pole_map.get(&religion.id).copied().unwrap_or((x, y))
            };
            let center = mesh
                .find_cell(cx, cy)
                .ok_or_else(|| ResampleError::no_nearest("religion restoration", cx, cy))?
                as u32;

            Ok(Religion {
                center,
                ..religion.clone()
            })
        })
        .collect()
}
