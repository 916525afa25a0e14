//! Dataset persistence.
//!
//! Versioned JSON save/load of a complete [`MapDataset`]. The polygon
//! mesh's spatial index is not serialized and is rebuilt on load.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dataset::MapDataset;
use crate::error::ResampleError;

/// Wrapper for the save file format.
#[derive(Serialize, Deserialize)]
struct DatasetSaveFile {
    /// Format version for forward compatibility
    version: u32,
    dataset: MapDataset,
}

const SAVE_VERSION: u32 = 1;

/// Save a dataset to a JSON file.
pub fn save_dataset(dataset: &MapDataset, path: &Path) -> Result<(), ResampleError> {
    let save = DatasetSaveFile {
        version: SAVE_VERSION,
        dataset: dataset.clone(),
    };
    let bytes = serde_json::to_vec(&save)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Load a dataset from a JSON file and rebuild its spatial index.
pub fn load_dataset(path: &Path) -> Result<MapDataset, ResampleError> {
    let bytes = fs::read(path)?;
    let save: DatasetSaveFile = serde_json::from_slice(&bytes)?;

    if save.version > SAVE_VERSION {
        return Err(ResampleError::UnsupportedVersion {
            found: save.version,
            supported: SAVE_VERSION,
        });
    }

    let mut dataset = save.dataset;
    dataset.mesh.rebuild_index();
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic;

    #[test]
    fn roundtrip_restores_the_spatial_index() {
        let dataset = synthetic::full_parent_dataset();
        let dir = std::env::temp_dir();
        let path = dir.join("map_resampler_roundtrip.json");

        save_dataset(&dataset, &path).unwrap();
        let loaded = load_dataset(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.mesh.len(), dataset.mesh.len());
        assert_eq!(loaded.burgs.len(), dataset.burgs.len());
        // The rebuilt index answers queries.
        assert_eq!(loaded.mesh.find_cell(35.0, 35.0), dataset.mesh.find_cell(35.0, 35.0));
    }

    #[test]
    fn newer_versions_are_rejected() {
        let dataset = synthetic::parent_dataset();
        let path = std::env::temp_dir().join("map_resampler_version.json");

        let save = DatasetSaveFile {
            version: SAVE_VERSION + 1,
            dataset,
        };
        fs::write(&path, serde_json::to_vec(&save).unwrap()).unwrap();
        let err = load_dataset(&path).unwrap_err();
        fs::remove_file(&path).ok();

        assert!(matches!(err, ResampleError::UnsupportedVersion { .. }));
    }
}
