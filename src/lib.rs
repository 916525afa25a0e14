//! Map resampling library
//!
//! Rebuilds a complete map dataset at a new spatial resolution/projection
//! while preserving every semantic entity (biomes, rivers, political
//! borders, settlements, cultures, religions) derived on the original
//! dataset.

pub mod biomes;
pub mod cells;
pub mod dataset;
pub mod entities;
pub mod error;
pub mod fields;
pub mod islands;
pub mod mesh;
pub mod persistence;
pub mod pipeline;
pub mod restore;
pub mod rivers;
pub mod spatial;
pub mod synthetic;

pub use biomes::{BiomeTable, IslandRules};
pub use dataset::{CellData, MapDataset};
pub use error::ResampleError;
pub use mesh::{FieldMesh, MapBounds, PolygonMesh};
pub use pipeline::{
    Collaborators, MeshBuilder, Pathfinder, PoleLocator, ResampleContext, TerrainClassifier,
    resample,
};
