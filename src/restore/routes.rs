//! Route restoration.
//!
//! Unlike rivers, route points are clipped to bounds individually; the
//! route keeps whatever survives. Routes shrinking below 2 points are
//! dropped. The route's geographic feature id is re-read from its first
//! surviving point's cell.

use crate::dataset::{CellData, MapDataset};
use crate::entities::{Route, RoutePoint};
use crate::error::ResampleError;
use crate::mesh::{round2, FieldMesh, PolygonMesh};
use crate::pipeline::ResampleContext;

pub fn restore_routes(
    parent: &MapDataset,
    field: &FieldMesh,
    mesh: &PolygonMesh,
    cells: &CellData,
    ctx: &ResampleContext,
) -> Result<Vec<Route>, ResampleError> {
    let margin = field.spacing * 2.0;
    let mut routes: Vec<Route> = Vec::with_capacity(parent.routes.len());

    for route in &parent.routes {
        let mut points: Vec<RoutePoint> = Vec::with_capacity(route.points.len());
        for point in &route.points {
            let (x, y) = (ctx.projection)(point.x, point.y);
            if !ctx.bounds.contains_with_margin(x, y, margin) {
                continue;
            }
            let cell = mesh
                .find_cell(x, y)
                .ok_or_else(|| ResampleError::no_nearest("route restoration", x, y))?;
            points.push(RoutePoint {
                x: round2(x),
                y: round2(y),
                cell: cell as u32,
            });
        }

        if points.len() < 2 {
            log::debug!("route {} left the map, dropping", route.id);
            continue;
        }

        let feature = cells.feature[points[0].cell as usize];
        routes.push(Route {
            id: route.id,
            group: route.group.clone(),
            feature,
            points,
        });
    }

    Ok(routes)
}
