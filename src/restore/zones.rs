//! Zone restoration.
//!
//! A zone's footprint is rebuilt cell by cell: every original member cell
//! reprojects to a point and re-expands to a disk whose radius matches the
//! parent cell's area scaled by the global factor. Out-of-bounds members
//! contribute nothing; the union over all members (deduplicated) becomes
//! the new footprint.

use std::collections::HashSet;
use std::f32::consts::PI;

use crate::dataset::MapDataset;
use crate::entities::Zone;
use crate::mesh::PolygonMesh;
use crate::pipeline::ResampleContext;

pub fn restore_zones(
    parent: &MapDataset,
    mesh: &PolygonMesh,
    ctx: &ResampleContext,
) -> Vec<Zone> {
    parent
        .zones
        .iter()
        .map(|zone| {
            let mut seen: HashSet<u32> = HashSet::new();
            let mut cells: Vec<u32> = Vec::new();

            for &member in &zone.cells {
                let (px, py) = parent.mesh.points[member as usize];
                let (x, y) = (ctx.projection)(px, py);
                if !ctx.bounds.contains(x, y) {
                    continue;
                }
                let radius =
                    (parent.mesh.areas[member as usize] / PI).sqrt() * ctx.scale;
                for cell in mesh.cells_within(x, y, radius) {
                    let cell = cell as u32;
                    if seen.insert(cell) {
                        cells.push(cell);
                    }
                }
            }

            Zone {
                id: zone.id,
                name: zone.name.clone(),
                cells,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic;

    #[test]
    fn footprint_is_deduplicated_union() {
        let mut parent = synthetic::parent_dataset();
        // Two adjacent members; at scale 2 their disks overlap.
        parent.zones = vec![synthetic::zone(1, vec![44, 45])];
        let ctx = synthetic::context(2.0, parent.bounds);
        let mesh = parent.mesh.clone();

        let zones = restore_zones(&parent, &mesh, &ctx);

        assert_eq!(zones.len(), 1);
        let cells = &zones[0].cells;
        assert!(!cells.is_empty());
        let unique: HashSet<_> = cells.iter().collect();
        assert_eq!(unique.len(), cells.len(), "no duplicate cells");
        assert!(cells.contains(&44));
        assert!(cells.contains(&45));
    }

    #[test]
    fn out_of_bounds_members_contribute_nothing() {
        let mut parent = synthetic::parent_dataset();
        parent.zones = vec![synthetic::zone(1, vec![44])];
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

        let zones = restore_zones(&parent, &mesh, &ctx);
        assert!(zones[0].cells.is_empty());
    }
}
