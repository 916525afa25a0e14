//! Burg (settlement) restoration.
//!
//! Runs before states and provinces, which repair their capital and burg
//! references against the restored table. Collisions (two burgs resolving
//! to the same cell) keep the first writer and tombstone later ones, in
//! original table order.

use crate::cells::land_index;
use crate::dataset::{CellData, MapDataset};
use crate::entities::Burg;
use crate::error::ResampleError;
use crate::mesh::{round2, Point, PolygonMesh};
use crate::pipeline::ResampleContext;

/// Restore the burg table and fill the burg-occupancy cell buffer.
pub fn restore_burgs(
    parent: &MapDataset,
    mesh: &PolygonMesh,
    cells: &mut CellData,
    ctx: &ResampleContext,
) -> Result<Vec<Burg>, ResampleError> {
    let land = land_index(mesh);

    parent
        .burgs
        .iter()
        .map(|burg| {
            if burg.id == 0 || burg.removed {
                return Ok(burg.clone());
            }

            let mut burg = burg.clone();
            // Population tracks the map-wide population rate change.
            burg.population *= ctx.scale;

            let (xp, yp) = (ctx.projection)(burg.x, burg.y);
            if !ctx.bounds.contains(xp, yp) {
                log::debug!("burg {} ({}) left the map", burg.id, burg.name);
                burg.removed = true;
                burg.lock = false;
                return Ok(burg);
            }

            let closest = mesh
                .find_cell(xp, yp)
                .ok_or_else(|| ResampleError::no_nearest("burg restoration", xp, yp))?;
            let cell = if mesh.is_water(closest) {
                land.nearest(xp, yp)
                    .ok_or_else(|| ResampleError::no_nearest("burg land placement", xp, yp))?
                    as usize
            } else {
                closest
            };

            if cells.burg[cell] != 0 {
                log::warn!(
                    "cell {} already has burg {}, removing burg {} ({})",
                    cell,
                    cells.burg[cell],
                    burg.id,
                    burg.name
                );
                burg.removed = true;
                burg.lock = false;
                return Ok(burg);
            }
            cells.burg[cell] = burg.id;

            let (x, y) = burg_coordinates(mesh, cells, &burg, closest, cell, xp, yp);
            burg.cell = cell as u32;
            burg.x = x;
            burg.y = y;
            Ok(burg)
        })
        .collect()
}

/// Anchor coordinate for a placed burg: ports with a navigable haven snap
/// toward the water edge, burgs relocated to a different cell snap to that
/// cell's center, and everything else keeps the raw reprojected point.
fn burg_coordinates(
    mesh: &PolygonMesh,
    cells: &CellData,
    burg: &Burg,
    closest: usize,
    cell: usize,
    xp: f32,
    yp: f32,
) -> Point {
    let haven = cells.haven[cell];
    if burg.port && haven != 0 {
        return edge_point(mesh, cell, haven as usize);
    }
    if closest != cell {
        return mesh.points[cell];
    }
    (round2(xp), round2(yp))
}

/// Point on the cell's water-facing side: halfway between the cell center
/// and its haven's center.
fn edge_point(mesh: &PolygonMesh, cell: usize, haven: usize) -> Point {
    let (cx, cy) = mesh.points[cell];
    let (hx, hy) = mesh.points[haven];
    (round2((cx + hx) / 2.0), round2((cy + hy) / 2.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic;

    #[test]
    fn out_of_bounds_burg_is_tombstoned_and_occupies_nothing() {
        let parent = synthetic::parent_dataset_with_burgs();
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
        let mut cells = CellData::sized(mesh.len());

        let burgs = restore_burgs(&parent, &mesh, &mut cells, &ctx).unwrap();

        for burg in burgs.iter().filter(|b| b.id != 0) {
            assert!(burg.removed);
            assert!(!burg.lock);
        }
        assert!(cells.burg.iter().all(|&b| b == 0));
    }

    #[test]
    fn colliding_burgs_keep_first_writer() {
        let mut parent = synthetic::parent_dataset_with_burgs();
        // Place burg 2 on top of burg 1.
        parent.burgs[2].x = parent.burgs[1].x;
        parent.burgs[2].y = parent.burgs[1].y;
        let ctx = synthetic::context(1.0, parent.bounds);
        let mesh = parent.mesh.clone();
        let mut cells = CellData::sized(mesh.len());

        let burgs = restore_burgs(&parent, &mesh, &mut cells, &ctx).unwrap();

        assert!(!burgs[1].removed);
        assert!(burgs[2].removed);
        let active: Vec<_> = burgs
            .iter()
            .filter(|b| b.id != 0 && !b.removed && b.cell == burgs[1].cell)
            .collect();
        assert_eq!(active.len(), 1);
    }

    #[test]
    fn population_rescales_by_global_scale() {
        let parent = synthetic::parent_dataset_with_burgs();
        let scale = 0.5;
        let ctx = synthetic::context(scale, parent.bounds);
        let mesh = parent.mesh.clone();
        let mut cells = CellData::sized(mesh.len());

        let burgs = restore_burgs(&parent, &mesh, &mut cells, &ctx).unwrap();

        for (new, old) in burgs.iter().zip(&parent.burgs) {
            if new.id == 0 || new.removed {
                continue;
            }
            assert!((new.population - old.population * scale).abs() < 1e-4);
        }
    }

    #[test]
    fn port_with_haven_anchors_toward_the_water_edge() {
        let mut parent = synthetic::parent_dataset_with_burgs();
        let mesh = parent.mesh.clone();
        // Coastal cell 32 borders the ocean column; cell 31 is its haven.
        let (cx, cy) = mesh.points[32];
        parent.burgs[1].x = cx;
        parent.burgs[1].y = cy;
        parent.burgs[1].port = true;
        let ctx = synthetic::context(1.0, parent.bounds);
        let mut cells = CellData::sized(mesh.len());
        cells.haven[32] = 31;

        let burgs = restore_burgs(&parent, &mesh, &mut cells, &ctx).unwrap();

        let burg = &burgs[1];
        assert!(!burg.removed);
        assert_eq!(burg.cell, 32);
        let (hx, hy) = mesh.points[31];
        assert_eq!(burg.x, (cx + hx) / 2.0);
        assert_eq!(burg.y, (cy + hy) / 2.0);
        // The anchor sits strictly between the cell center and the haven.
        assert!((burg.x - cx).abs() < (hx - cx).abs());
    }

    #[test]
    fn water_landing_snaps_to_nearest_land_cell() {
        let parent = synthetic::parent_dataset_with_burgs();
        let ctx = synthetic::context(1.0, parent.bounds);
        let mesh = parent.mesh.clone();
        let mut cells = CellData::sized(mesh.len());
        // Aim burg 1 at a water cell.
        let mut parent = parent;
        let water_cell = (0..mesh.len()).find(|&c| mesh.is_water(c)).unwrap();
        let (wx, wy) = mesh.points[water_cell];
        parent.burgs[1].x = wx;
        parent.burgs[1].y = wy;

        let burgs = restore_burgs(&parent, &mesh, &mut cells, &ctx).unwrap();

        let burg = &burgs[1];
        assert!(!burg.removed);
        assert!(!mesh.is_water(burg.cell as usize));
    }
}
