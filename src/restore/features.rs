//! Feature metadata restoration.
//!
//! The new feature table (which regions exist, their kinds and first cells)
//! is produced by the terrain classifier; this pass only carries names,
//! groups and lake heights forward from the parent region containing each
//! new region's representative point.

use crate::dataset::MapDataset;
use crate::entities::Feature;
use crate::mesh::PolygonMesh;
use crate::pipeline::ResampleContext;

pub fn restore_feature_details(
    parent: &MapDataset,
    mesh: &PolygonMesh,
    features: &mut [Feature],
    ctx: &ResampleContext,
) {
    for feature in features.iter_mut() {
        if feature.id == 0 {
            continue;
        }
        let (x, y) = mesh.points[feature.first_cell as usize];
        let (px, py) = (ctx.inverse)(x, y);
        let Some(parent_cell) = parent.mesh.find_cell(px, py) else { continue };

        let parent_id = parent.cells.feature[parent_cell] as usize;
        let Some(parent_feature) = parent.features.get(parent_id) else { continue };

        if let Some(group) = &parent_feature.group {
            feature.group = Some(group.clone());
        }
        if let Some(name) = &parent_feature.name {
            feature.name = Some(name.clone());
        }
        if let Some(height) = parent_feature.height {
            feature.height = Some(height);
        }
    }
}
