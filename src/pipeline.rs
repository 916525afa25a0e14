//! Resampling pipeline orchestration.
//!
//! Rebuilds a complete map dataset at a new resolution/projection while
//! preserving every semantic entity derived on the original dataset. The
//! stages run strictly in order because each depends on the finalized
//! output of the previous one: climate fields first, then the new meshes,
//! then cell attributes and rivers, then the entity restorers (cultures,
//! burgs, states, religions, provinces, routes, feature metadata, markers,
//! zones).
//!
//! The run is all-or-nothing: it returns a complete, internally consistent
//! dataset or an error naming the failed stage; a partial dataset is never
//! produced.

use std::collections::HashMap;

use crate::biomes::IslandRules;
use crate::cells;
use crate::dataset::{CellData, MapDataset};
use crate::entities::Feature;
use crate::error::ResampleError;
use crate::fields;
use crate::islands;
use crate::mesh::{FieldMesh, MapBounds, Point, PolygonMesh};
use crate::restore;
use crate::rivers;

/// Caller-supplied parameters of one resampling run.
///
/// `projection` maps old coordinate space to new, `inverse` maps back; the
/// pair need not be an exact mathematical inverse, only practically
/// consistent. `scale` is the ratio of new resolution density to old:
/// values below 1 upscale (denser mesh), above 1 downscale.
pub struct ResampleContext<'a> {
    pub projection: &'a (dyn Fn(f32, f32) -> (f32, f32) + Sync),
    pub inverse: &'a (dyn Fn(f32, f32) -> (f32, f32) + Sync),
    pub scale: f32,
    /// Extent of the new map.
    pub bounds: MapBounds,
}

/// Builds the new meshes. Mesh generation itself (point placement, graph
/// construction, polygon areas) is outside the resampler.
pub trait MeshBuilder {
    /// A fresh field mesh over `bounds` with geometry and latitude filled
    /// and climate buffers empty.
    fn build_field_mesh(&self, bounds: MapBounds) -> FieldMesh;

    /// The polygon mesh derived from a populated field mesh.
    fn build_polygon_mesh(&self, field: &FieldMesh) -> PolygonMesh;
}

/// Classifies terrain on the freshly built meshes: ocean/lake features, the
/// per-cell feature-id and haven buffers, and temperature re-derivation.
pub trait TerrainClassifier {
    /// Runs after climate resampling, before the polygon mesh is built.
    fn markup_field(&self, field: &mut FieldMesh);

    /// Runs after the polygon mesh is built; fills `cells.feature` and
    /// `cells.haven` and returns the feature table (entry 0 the sentinel).
    fn markup_mesh(&self, mesh: &PolygonMesh, cells: &mut CellData) -> Vec<Feature>;
}

/// Least-cost routing between two cells. `cost` returns the traversal cost
/// of entering a cell, or `None` for impassable cells.
pub trait Pathfinder {
    /// Cells strictly between `from` and `to`, or `None` when unreachable.
    fn path(
        &self,
        mesh: &PolygonMesh,
        from: usize,
        to: usize,
        cost: &dyn Fn(usize) -> Option<f32>,
    ) -> Option<Vec<usize>>;
}

/// Pole-of-inaccessibility lookup per cell group (state, culture, religion
/// or province footprints). Group 0 is ignored.
pub trait PoleLocator {
    fn poles(
        &self,
        mesh: &PolygonMesh,
        group_of: &dyn Fn(usize) -> u16,
    ) -> HashMap<u16, Point>;
}

/// External collaborators consumed by a run.
pub struct Collaborators<'a> {
    pub mesh_builder: &'a dyn MeshBuilder,
    pub classifier: &'a dyn TerrainClassifier,
    pub pathfinder: &'a dyn Pathfinder,
    pub poles: &'a dyn PoleLocator,
}

/// Resample `parent` onto a new mesh.
///
/// The parent dataset is read-only for the whole run; the returned dataset
/// is complete and internally consistent or the run fails with an error
/// identifying the stage.
pub fn resample(
    parent: &MapDataset,
    ctx: &ResampleContext,
    collaborators: &Collaborators,
    rules: &IslandRules,
) -> Result<MapDataset, ResampleError> {
    log::info!(
        "resampling {} cells at scale {} onto {}x{}",
        parent.mesh.len(),
        ctx.scale,
        ctx.bounds.width,
        ctx.bounds.height
    );

    let mut out = MapDataset::empty(ctx.bounds);

    log::info!("stage: climate field resampling");
    out.field = collaborators.mesh_builder.build_field_mesh(ctx.bounds);
    fields::resample_climate(parent, &mut out.field, ctx)?;
    collaborators.classifier.markup_field(&mut out.field);

    log::info!("stage: polygon mesh construction");
    out.mesh = collaborators.mesh_builder.build_polygon_mesh(&out.field);
    out.cells = CellData::sized(out.mesh.len());
    out.features = collaborators.classifier.markup_mesh(&out.mesh, &mut out.cells);

    log::info!("stage: cell attribute migration");
    cells::migrate_attributes(parent, &out.mesh, &mut out.cells, ctx)?;
    islands::recolor(&out.field, &out.mesh, &mut out.cells, rules);

    log::info!("stage: river reconstruction");
    out.rivers = rivers::rebuild_rivers(
        parent,
        &out.field,
        &out.mesh,
        &mut out.cells,
        collaborators.pathfinder,
        ctx,
    )?;

    log::info!("stage: entity restoration");
    out.cultures =
        restore::cultures::restore_cultures(parent, &out.mesh, &out.cells, collaborators.poles, ctx)?;
    out.burgs = restore::burgs::restore_burgs(parent, &out.mesh, &mut out.cells, ctx)?;
    out.states = restore::states::restore_states(
        parent,
        &out.mesh,
        &out.cells,
        &out.burgs,
        collaborators.poles,
        ctx,
    )?;
    out.religions = restore::religions::restore_religions(
        parent,
        &out.mesh,
        &out.cells,
        collaborators.poles,
        ctx,
    )?;
    out.provinces = restore::provinces::restore_provinces(
        parent,
        &out.mesh,
        &out.cells,
        &out.burgs,
        collaborators.poles,
        ctx,
    )?;
    out.routes = restore::routes::restore_routes(parent, &out.field, &out.mesh, &out.cells, ctx)?;
    restore::features::restore_feature_details(parent, &out.mesh, &mut out.features, ctx);
    out.markers = restore::markers::restore_markers(parent, &out.mesh, ctx)?;
    out.zones = restore::zones::restore_zones(parent, &out.mesh, ctx);

    log::info!(
        "resampling done: {} rivers, {} active burgs",
        out.rivers.len(),
        out.burgs.iter().filter(|b| b.id != 0 && !b.removed).count()
    );

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic;

    fn run(parent: &MapDataset, scale: f32) -> MapDataset {
        let _ = env_logger::builder().is_test(true).try_init();
        let ctx = synthetic::context(scale, parent.bounds);
        let collaborators = Collaborators {
            mesh_builder: &synthetic::GridMeshBuilder { per_side: 10 },
            classifier: &synthetic::ElevationClassifier,
            pathfinder: &synthetic::DijkstraPathfinder,
            poles: &synthetic::CentroidPoles,
        };
        resample(parent, &ctx, &collaborators, &IslandRules::default()).unwrap()
    }

    #[test]
    fn identity_run_preserves_entity_id_spaces() {
        let parent = synthetic::full_parent_dataset();
        let out = run(&parent, 1.0);

        assert_eq!(out.cultures.len(), parent.cultures.len());
        assert_eq!(out.burgs.len(), parent.burgs.len());
        assert_eq!(out.states.len(), parent.states.len());
        assert_eq!(out.religions.len(), parent.religions.len());
        assert_eq!(out.provinces.len(), parent.provinces.len());
        for (i, culture) in out.cultures.iter().enumerate() {
            assert_eq!(culture.id as usize, i);
        }
    }

    #[test]
    fn runs_are_deterministic() {
        let parent = synthetic::full_parent_dataset();
        let a = run(&parent, 0.5);
        let b = run(&parent, 0.5);

        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn at_most_one_active_burg_per_cell() {
        let parent = synthetic::full_parent_dataset();
        let out = run(&parent, 0.5);

        let mut seen = std::collections::HashSet::new();
        for burg in out.burgs.iter().filter(|b| b.id != 0 && !b.removed) {
            assert!(seen.insert(burg.cell), "cell {} occupied twice", burg.cell);
        }
    }

    #[test]
    fn rivers_stay_minimal_and_in_range() {
        let parent = synthetic::full_parent_dataset();
        let out = run(&parent, 0.5);

        for river in &out.rivers {
            assert!(river.points.as_ref().unwrap().len() >= 2);
            assert!(river.cells.len() >= 2);
            assert!(river.cells.iter().all(|&c| (c as usize) < out.mesh.len()));
        }
    }

    #[test]
    fn upscale_halves_river_width_factor() {
        let parent = synthetic::full_parent_dataset();
        let out = run(&parent, 0.5);

        let original = &parent.rivers[0];
        let river = out.rivers.iter().find(|r| r.id == original.id).unwrap();
        assert!((river.width_factor - original.width_factor * 0.5).abs() < 1e-6);
        assert!(river.cells.len() >= original.cells.len());
    }

    #[test]
    fn parent_is_untouched_by_the_run() {
        let parent = synthetic::full_parent_dataset();
        let before = serde_json::to_string(&parent).unwrap();
        let _ = run(&parent, 0.5);
        let after = serde_json::to_string(&parent).unwrap();
        assert_eq!(before, after);
    }
}
