//! Map dataset container.
//!
//! Bundles the field mesh, the polygon mesh, the per-cell attribute buffers
//! and every entity table into one struct so the pipeline can pass a whole
//! map around. During a resampling run the parent dataset is held as a
//! read-only snapshot; the in-progress dataset is the only mutable state
//! and only becomes "current" once the run fully succeeds.

use serde::{Deserialize, Serialize};

use crate::entities::{Burg, Culture, Feature, Marker, Province, Religion, River, Route, State, Zone};
use crate::mesh::{FieldMesh, MapBounds, PolygonMesh};

/// Per-cell attribute buffers, all sized to the polygon mesh.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CellData {
    pub biome: Vec<u8>,
    /// Flow accumulation.
    pub flux: Vec<u16>,
    /// Suitability score; area-dependent, rescaled on migration.
    pub suitability: Vec<f32>,
    /// Population; area-dependent, rescaled on migration.
    pub population: Vec<f32>,
    pub culture: Vec<u16>,
    pub state: Vec<u16>,
    /// Occupying burg id, 0 = none.
    pub burg: Vec<u16>,
    pub religion: Vec<u16>,
    pub province: Vec<u16>,
    /// Occupying river id, 0 = none.
    pub river: Vec<u16>,
    /// 1 where two or more rivers claim the cell.
    pub confluence: Vec<u8>,
    /// Geographic feature id, 0 = none.
    pub feature: Vec<u16>,
    /// For coastal cells, an adjacent navigable water cell; 0 = none.
    pub haven: Vec<u32>,
}

impl CellData {
    /// Zero-initialized buffers for a mesh of `len` cells.
    pub fn sized(len: usize) -> Self {
        Self {
            biome: vec![0; len],
            flux: vec![0; len],
            suitability: vec![0.0; len],
            population: vec![0.0; len],
            culture: vec![0; len],
            state: vec![0; len],
            burg: vec![0; len],
            religion: vec![0; len],
            province: vec![0; len],
            river: vec![0; len],
            confluence: vec![0; len],
            feature: vec![0; len],
            haven: vec![0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.biome.len()
    }

    pub fn is_empty(&self) -> bool {
        self.biome.is_empty()
    }
}

/// A complete map dataset at one resolution.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MapDataset {
    pub bounds: MapBounds,
    pub field: FieldMesh,
    pub mesh: PolygonMesh,
    pub cells: CellData,
    pub rivers: Vec<River>,
    pub cultures: Vec<Culture>,
    pub burgs: Vec<Burg>,
    pub states: Vec<State>,
    pub religions: Vec<Religion>,
    pub provinces: Vec<Province>,
    pub routes: Vec<Route>,
    pub markers: Vec<Marker>,
    pub zones: Vec<Zone>,
    /// Feature metadata indexed by feature id; entry 0 is the sentinel.
    pub features: Vec<Feature>,
}

impl MapDataset {
    /// An empty dataset over `bounds`, used as the assembly target during a
    /// resampling run.
    pub fn empty(bounds: MapBounds) -> Self {
        Self {
            bounds,
            field: FieldMesh::default(),
            mesh: PolygonMesh::default(),
            cells: CellData::default(),
            rivers: Vec::new(),
            cultures: Vec::new(),
            burgs: Vec::new(),
            states: Vec::new(),
            religions: Vec::new(),
            provinces: Vec::new(),
            routes: Vec::new(),
            markers: Vec::new(),
            zones: Vec::new(),
            features: vec![Feature::none()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sized_buffers_match_length() {
        let cells = CellData::sized(7);
        assert_eq!(cells.len(), 7);
        assert_eq!(cells.population.len(), 7);
        assert_eq!(cells.haven.len(), 7);
        assert!(cells.biome.iter().all(|&b| b == 0));
    }
}
