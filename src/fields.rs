//! Climate-field resampling (the first migration stage).
//!
//! Fills the new field mesh's elevation/temperature/precipitation buffers
//! by inverse-projecting every new point into parent space and copying the
//! values backing the nearest parent cell. Coarsening runs (scale >= 2) get
//! one smoothing pass that never flips a point's water/land status.

use crate::dataset::MapDataset;
use crate::error::ResampleError;
use crate::mesh::{FieldMesh, MIN_LAND_HEIGHT};
use crate::pipeline::ResampleContext;

/// Resample elevation, temperature and precipitation onto `field`.
pub fn resample_climate(
    parent: &MapDataset,
    field: &mut FieldMesh,
    ctx: &ResampleContext,
) -> Result<(), ResampleError> {
    let len = field.len();
    field.heights = vec![0; len];
    field.temperature = vec![0; len];
    field.precipitation = vec![0; len];

    for point in 0..len {
        let (x, y) = field.points[point];
        let (px, py) = (ctx.inverse)(x, y);
        let parent_cell = parent
            .mesh
            .find_cell(px, py)
            .ok_or_else(|| ResampleError::no_nearest("climate resampling", px, py))?;
        let backing = parent.mesh.field_ref[parent_cell] as usize;

        field.heights[point] = parent.field.heights[backing];
        field.temperature[point] = parent.field.temperature[backing];
        field.precipitation[point] = parent.field.precipitation[backing];
    }

    if ctx.scale >= 2.0 {
        smooth_heightmap(field);
    }

    Ok(())
}

/// Replace each point's elevation with the mean of itself and its direct
/// neighbors, clamped so water stays water and land stays land.
fn smooth_heightmap(field: &mut FieldMesh) {
    let snapshot = field.heights.clone();

    for point in 0..snapshot.len() {
        let mut sum = snapshot[point] as u32;
        let mut count = 1u32;
        for &neighbor in &field.neighbors[point] {
            sum += snapshot[neighbor as usize] as u32;
            count += 1;
        }
        let mean = (sum as f32 / count as f32).round() as u8;

        field.heights[point] = if snapshot[point] < MIN_LAND_HEIGHT {
            mean.min(MIN_LAND_HEIGHT - 1)
        } else {
            mean.max(MIN_LAND_HEIGHT)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic;

    #[test]
    fn copies_parent_climate_through_identity() {
        let parent = synthetic::parent_dataset();
        let mut field = synthetic::field_mesh(parent.bounds, 10, 10);
        let ctx = synthetic::context(1.0, parent.bounds);

        resample_climate(&parent, &mut field, &ctx).unwrap();

        assert_eq!(field.heights.len(), field.len());
        // An identity projection at equal density reproduces parent values.
        for point in 0..field.len() {
            let (x, y) = field.points[point];
            let parent_cell = parent.mesh.find_cell(x, y).unwrap();
            let backing = parent.mesh.field_ref[parent_cell] as usize;
            assert_eq!(field.heights[point], parent.field.heights[backing]);
            assert_eq!(field.temperature[point], parent.field.temperature[backing]);
        }
    }

    #[test]
    fn smoothing_never_flips_water_status() {
        let parent = synthetic::parent_dataset();
        let mut field = synthetic::field_mesh(parent.bounds, 5, 5);
        let ctx = synthetic::context(2.0, parent.bounds);

        resample_climate(&parent, &mut field, &ctx).unwrap();

        // Record status before smoothing by re-running the copy step alone.
        let mut unsmoothed = synthetic::field_mesh(parent.bounds, 5, 5);
        let flat_ctx = synthetic::context(1.0, parent.bounds);
        resample_climate(&parent, &mut unsmoothed, &flat_ctx).unwrap();

        for point in 0..field.len() {
            assert_eq!(
                unsmoothed.heights[point] < MIN_LAND_HEIGHT,
                field.heights[point] < MIN_LAND_HEIGHT,
                "smoothing flipped water status of point {point}"
            );
        }
    }

    #[test]
    fn empty_parent_mesh_is_fatal() {
        let mut parent = synthetic::parent_dataset();
        parent.mesh = crate::mesh::PolygonMesh::default();
        let mut field = synthetic::field_mesh(parent.bounds, 3, 3);
        let ctx = synthetic::context(1.0, parent.bounds);

        let err = resample_climate(&parent, &mut field, &ctx).unwrap_err();
        assert!(matches!(err, ResampleError::NoNearestCell { .. }));
    }
}
