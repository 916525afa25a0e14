//! Culture restoration.

use crate::dataset::{CellData, MapDataset};
use crate::entities::Culture;
use crate::error::ResampleError;
use crate::mesh::{round2, PolygonMesh};
use crate::pipeline::{PoleLocator, ResampleContext};
use crate::restore::valid_ids;

/// Restore the culture table. A culture whose id no longer appears in the
/// migrated culture buffer is tombstoned; survivors get their center
/// reprojected, falling back to the pole of inaccessibility of their new
/// footprint when the projected center leaves the map.
pub fn restore_cultures(
    parent: &MapDataset,
    mesh: &PolygonMesh,
    cells: &CellData,
    poles: &dyn PoleLocator,
    ctx: &ResampleContext,
) -> Result<Vec<Culture>, ResampleError> {
    let valid = valid_ids(&cells.culture);
    let pole_map = poles.poles(mesh, &|cell| cells.culture[cell]);

    parent
        .cultures
        .iter()
        .map(|culture| {
            if culture.id == 0 || culture.removed {
                return Ok(culture.clone());
            }
            if !valid.contains(&culture.id) {
                log::debug!("culture {} ({}) lost its footprint", culture.id, culture.name);
                return Ok(Culture {
                    removed: true,
                    lock: false,
                    ..culture.clone()
                });
            }

            let (px, py) = parent.mesh.points[culture.center as usize];
            let (x, y) = (ctx.projection)(px, py);
            let (x, y) = (round2(x), round2(y));
            let (cx, cy) = if ctx.bounds.contains(x, y) {
                (x, y)
            } else {
                pole_map.get(&culture.id).copied().unwrap_or((x, y))
            };
            let center = mesh
                .find_cell(cx, cy)
                .ok_or_else(|| ResampleError::no_nearest("culture restoration", cx, cy))?
                as u32;

            Ok(Culture {
                center,
                ..culture.clone()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic;

    #[test]
    fn tombstones_cultures_without_footprint() {
        let parent = synthetic::parent_dataset();
        let ctx = synthetic::context(1.0, parent.bounds);
        let mesh = parent.mesh.clone();
        let mut cells = CellData::sized(mesh.len());
        // Only culture 1 keeps cells.
        for cell in 0..mesh.len() {
            cells.culture[cell] = if mesh.is_water(cell) { 0 } else { 1 };
        }

        let cultures = restore_cultures(
            &parent,
            &mesh,
            &cells,
            &synthetic::CentroidPoles,
            &ctx,
        )
        .unwrap();

        assert_eq!(cultures.len(), parent.cultures.len());
        assert!(!cultures[1].removed);
        assert!(cultures[2].removed);
        assert!(!cultures[2].lock, "removal must unlock");
    }

    #[test]
    fn out_of_bounds_center_falls_back_to_pole() {
        let parent = synthetic::parent_dataset();
        // Shift everything off the map; footprints stay valid.
        let shift = 10_000.0;
        let projection = move |x: f32, y: f32| (x + shift, y + shift);
        let inverse = move |x: f32, y: f32| (x - shift, y - shift);
        let ctx = crate::pipeline::ResampleContext {
            projection: &projection,
            inverse: &inverse,
            scale: 1.0,
            bounds: parent.bounds,
        };
        let mesh = parent.mesh.clone();
        let cells = parent.cells.clone();

        let cultures = restore_cultures(
            &parent,
            &mesh,
            &cells,
            &synthetic::CentroidPoles,
            &ctx,
        )
        .unwrap();

        for culture in cultures.iter().filter(|c| c.id != 0 && !c.removed) {
            assert!(
                (culture.center as usize) < mesh.len(),
                "center must resolve to a mesh cell"
            );
        }
    }
}
