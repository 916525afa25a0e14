//! Province restoration.
//!
//! Runs after burg restoration. A surviving province centers on its
//! associated burg's new cell, or a recomputed pole of inaccessibility when
//! that burg did not survive.

use crate::dataset::{CellData, MapDataset};
use crate::entities::{Burg, Province};
use crate::error::ResampleError;
use crate::mesh::PolygonMesh;
use crate::pipeline::{PoleLocator, ResampleContext};
use crate::restore::valid_ids;

pub fn restore_provinces(
    parent: &MapDataset,
    mesh: &PolygonMesh,
    cells: &CellData,
    burgs: &[Burg],
    poles: &dyn PoleLocator,
    ctx: &ResampleContext,
) -> Result<Vec<Province>, ResampleError> {
    let valid = valid_ids(&cells.province);

    let mut provinces: Vec<Province> = parent
        .provinces
        .iter()
        .map(|province| {
            if province.id == 0 || province.removed {
                return province.clone();
            }
            if !valid.contains(&province.id) {
                log::debug!(
                    "province {} ({}) lost its footprint",
                    province.id,
                    province.name
                );
                return Province {
                    removed: true,
                    lock: false,
                    ..province.clone()
                };
            }
            province.clone()
        })
        .collect();

    let pole_map = poles.poles(mesh, &|cell| cells.province[cell]);

    for province in &mut provinces {
        if province.id == 0 || province.removed {
            continue;
        }
        let burg = if province.burg == 0 {
            None
        } else {
            burgs.get(province.burg as usize).filter(|b| !b.removed)
        };
        province.center = match burg {
            Some(burg) => burg.cell,
            None => {
                let (px, py) = pole_map
                    .get(&province.id)
                    .copied()
                    .unwrap_or_else(|| {
                        let (x, y) = parent.mesh.points[province.center as usize];
                        (ctx.projection)(x, y)
                    });
                mesh.find_cell(px, py)
                    .ok_or_else(|| ResampleError::no_nearest("province restoration", px, py))?
                    as u32
            }
        };
    }

    Ok(provinces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic;

    #[test]
    fn province_centers_on_its_burg() {
        let parent = synthetic::parent_dataset_with_burgs();
        let ctx = synthetic::context(1.0, parent.bounds);
        let mesh = parent.mesh.clone();
        let cells = parent.cells.clone();

        let provinces = restore_provinces(
            &parent,
            &mesh,
            &cells,
            &parent.burgs,
            &synthetic::CentroidPoles,
            &ctx,
        )
        .unwrap();

        let province = &provinces[1];
        assert!(!province.removed);
        assert_eq!(province.center, parent.burgs[province.burg as usize].cell);
    }

    #[test]
    fn footprint_loss_tombstones() {
        let parent = synthetic::parent_dataset_with_burgs();
        let ctx = synthetic::context(1.0, parent.bounds);
        let mesh = parent.mesh.clone();
        let mut cells = parent.cells.clone();
        cells.province.iter_mut().for_each(|p| *p = 0);

        let provinces = restore_provinces(
            &parent,
            &mesh,
            &cells,
            &parent.burgs,
            &synthetic::CentroidPoles,
            &ctx,
        )
        .unwrap();

        for province in provinces.iter().filter(|p| p.id != 0) {
            assert!(province.removed);
            assert!(!province.lock);
        }
    }
}
