//! Marker restoration. Markers that reproject outside the map are deleted
//! from the table; survivors are re-anchored to their nearest new cell.

use crate::dataset::MapDataset;
use crate::entities::Marker;
use crate::error::ResampleError;
use crate::mesh::{round2, PolygonMesh};
use crate::pipeline::ResampleContext;

pub fn restore_markers(
    parent: &MapDataset,
    mesh: &PolygonMesh,
    ctx: &ResampleContext,
) -> Result<Vec<Marker>, ResampleError> {
    let mut markers: Vec<Marker> = Vec::with_capacity(parent.markers.len());

    for marker in &parent.markers {
        let (x, y) = (ctx.projection)(marker.x, marker.y);
        if !ctx.bounds.contains(x, y) {
            log::debug!("marker {} ({}) left the map, deleting", marker.id, marker.icon);
            continue;
        }
        let cell = mesh
            .find_cell(x, y)
            .ok_or_else(|| ResampleError::no_nearest("marker restoration", x, y))?;
        markers.push(Marker {
            id: marker.id,
            icon: marker.icon.clone(),
            x: round2(x),
            y: round2(y),
            cell: cell as u32,
        });
    }

    Ok(markers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic;

    #[test]
    fn keeps_in_bounds_markers_and_deletes_the_rest() {
        let mut parent = synthetic::parent_dataset();
        parent.markers = vec![
            synthetic::marker(1, 15.0, 15.0),
            synthetic::marker(2, -400.0, 10.0),
            synthetic::marker(3, 85.0, 85.0),
        ];
        let ctx = synthetic::context(1.0, parent.bounds);
        let mesh = parent.mesh.clone();

        let markers = restore_markers(&parent, &mesh, &ctx).unwrap();

        let ids: Vec<u32> = markers.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 3]);
        for marker in &markers {
            assert_eq!(marker.cell, mesh.find_cell(marker.x, marker.y).unwrap() as u32);
        }
    }
}
