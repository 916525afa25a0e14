//! River geometry reconstruction.
//!
//! Each parent river's polyline is pushed through the forward projection;
//! points falling outside the map (with a tolerance of twice the field-mesh
//! spacing) are dropped, and the resulting point-to-point gaps are filled
//! by least-cost routing through cells. Water cells are impassable and land
//! cells cost their elevation, so filled segments prefer low terrain.
//! Basin ids and approximate lengths are recomputed once the whole set is
//! rebuilt, since basin resolution walks the surviving parent chain.

use std::collections::HashMap;

use crate::dataset::{CellData, MapDataset};
use crate::entities::{River, RiverId};
use crate::error::ResampleError;
use crate::mesh::{round2, FieldMesh, Point, PolygonMesh};
use crate::pipeline::{Pathfinder, ResampleContext};

/// Rebuild all rivers against the new mesh. Fills the river-occupancy and
/// confluence cell buffers as a side effect.
pub fn rebuild_rivers(
    parent: &MapDataset,
    field: &FieldMesh,
    mesh: &PolygonMesh,
    cells: &mut CellData,
    pathfinder: &dyn Pathfinder,
    ctx: &ResampleContext,
) -> Result<Vec<River>, ResampleError> {
    let margin = field.spacing * 2.0;
    let cost = |cell: usize| -> Option<f32> {
        if mesh.is_water(cell) {
            None
        } else {
            Some(mesh.heights[cell] as f32)
        }
    };

    let mut rivers: Vec<River> = Vec::with_capacity(parent.rivers.len());

    for river in &parent.rivers {
        let parent_points: Vec<Point> = match &river.points {
            Some(points) => points.clone(),
            None => river
                .cells
                .iter()
                .map(|&cell| parent.mesh.points[cell as usize])
                .collect(),
        };

        let surviving: Vec<Point> = parent_points
            .iter()
            .map(|&(px, py)| (ctx.projection)(px, py))
            .filter(|&(x, y)| ctx.bounds.contains_with_margin(x, y, margin))
            .map(|(x, y)| (round2(x), round2(y)))
            .collect();

        if surviving.len() < 2 {
            log::debug!("river {} ({}) left the map, dropping", river.id, river.name);
            continue;
        }

        let points = fill_gaps(&surviving, mesh, pathfinder, &cost)?;

        let mut traversed: Vec<u32> = Vec::with_capacity(points.len());
        for &(x, y) in &points {
            let cell = mesh
                .find_cell(x, y)
                .ok_or_else(|| ResampleError::no_nearest("river reconstruction", x, y))?;
            traversed.push(cell as u32);
        }

        for &cell in &traversed {
            let cell = cell as usize;
            if cells.river[cell] != 0 && cells.river[cell] != river.id {
                cells.confluence[cell] = 1;
            }
            cells.river[cell] = river.id;
        }

        let source = traversed[0];
        let mouth = traversed[traversed.len() - 2];

        rivers.push(River {
            id: river.id,
            name: river.name.clone(),
            parent: river.parent,
            basin: river.basin,
            width_factor: river.width_factor * ctx.scale,
            length: 0.0,
            source,
            mouth,
            cells: traversed,
            points: Some(points),
        });
    }

    // Basin lookup needs the full surviving set resolved first.
    let parents: HashMap<RiverId, RiverId> =
        rivers.iter().map(|r| (r.id, r.parent)).collect();
    for river in &mut rivers {
        river.basin = basin_of(river.id, &parents);
        river.length = approximate_length(river.points.as_deref().unwrap_or_default());
    }

    Ok(rivers)
}

/// Fill gaps between consecutive points by routing through cells; the path
/// cells' centers are appended between the endpoints.
fn fill_gaps(
    points: &[Point],
    mesh: &PolygonMesh,
    pathfinder: &dyn Pathfinder,
    cost: &dyn Fn(usize) -> Option<f32>,
) -> Result<Vec<Point>, ResampleError> {
    let mut filled: Vec<Point> = Vec::with_capacity(points.len());

    for (i, &point) in points.iter().enumerate() {
        filled.push(point);
        let Some(&(nx, ny)) = points.get(i + 1) else { continue };

        let start = mesh
            .find_cell(point.0, point.1)
            .ok_or_else(|| ResampleError::no_nearest("river gap filling", point.0, point.1))?;
        let exit = mesh
            .find_cell(nx, ny)
            .ok_or_else(|| ResampleError::no_nearest("river gap filling", nx, ny))?;

        if let Some(path) = pathfinder.path(mesh, start, exit, cost) {
            filled.extend(path.into_iter().map(|cell| mesh.points[cell]));
        }
    }

    Ok(filled)
}

/// Terminal downstream river id: the end of the parent chain within the
/// surviving set.
fn basin_of(id: RiverId, parents: &HashMap<RiverId, RiverId>) -> RiverId {
    let mut current = id;
    // The chain cannot be longer than the river count; guards against
    // parent cycles in malformed input.
    for _ in 0..parents.len() {
        match parents.get(&current) {
            Some(&up) if up != 0 && up != current && parents.contains_key(&up) => current = up,
            _ => break,
        }
    }
    current
}

/// Cumulative Euclidean length over a point sequence.
fn approximate_length(points: &[Point]) -> f32 {
    let sum: f32 = points
        .windows(2)
        .map(|pair| {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt()
        })
        .sum();
    round2(sum)
}
