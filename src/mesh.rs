//! Mesh data containers: the coarse climate field mesh and the irregular
//! polygon (cell) mesh all map entities are positioned on.
//!
//! Both meshes are rebuilt wholesale by the caller-supplied mesh builder,
//! never patched in place; a point's index is its identity for the lifetime
//! of the mesh.

use serde::{Deserialize, Serialize};

use crate::spatial::SpatialIndex;

/// A 2D map coordinate.
pub type Point = (f32, f32);

/// Elevation at or above this value is land, below is water.
pub const MIN_LAND_HEIGHT: u8 = 20;

/// Round a coordinate to 2 decimal places, the precision all reprojected
/// coordinates are stored at.
pub fn round2(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}

/// The rectangular extent of a map in its own coordinate space.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MapBounds {
    pub width: f32,
    pub height: f32,
}

impl MapBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether `(x, y)` lies inside the map.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.contains_with_margin(x, y, 0.0)
    }

    /// Whether `(x, y)` lies inside the map expanded by `margin` on every
    /// side. River and route reprojection tolerate a margin of twice the
    /// field-mesh spacing.
    pub fn contains_with_margin(&self, x: f32, y: f32, margin: f32) -> bool {
        x + margin >= 0.0 && x - margin <= self.width && y + margin >= 0.0 && y - margin <= self.height
    }
}

/// The coarse, regularly-spaced point set carrying raw climate fields.
///
/// Owned independently from the polygon mesh; polygon cells reference their
/// backing field point through [`PolygonMesh::field_ref`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FieldMesh {
    pub points: Vec<Point>,
    /// Distance between adjacent points.
    pub spacing: f32,
    /// Adjacent point indices per point.
    pub neighbors: Vec<Vec<u32>>,
    /// Geographic latitude per point, degrees, positive north.
    pub latitude: Vec<f32>,
    /// Elevation, 0-100. Values below [`MIN_LAND_HEIGHT`] are water.
    pub heights: Vec<u8>,
    /// Temperature, degrees Celsius.
    pub temperature: Vec<i8>,
    /// Precipitation.
    pub precipitation: Vec<u8>,
}

impl FieldMesh {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_water(&self, point: usize) -> bool {
        self.heights[point] < MIN_LAND_HEIGHT
    }
}

/// The irregular polygon mesh: one point per cell, cell index is identity.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PolygonMesh {
    /// Cell center per cell.
    pub points: Vec<Point>,
    /// Adjacent cell indices per cell.
    pub neighbors: Vec<Vec<u32>>,
    /// Polygon area per cell.
    pub areas: Vec<f32>,
    /// Elevation per cell, 0-100.
    pub heights: Vec<u8>,
    /// Backing field-mesh point per cell.
    pub field_ref: Vec<u32>,
    /// Nearest-cell index over `points`; rebuilt after deserialization.
    #[serde(skip)]
    index: SpatialIndex,
}

impl PolygonMesh {
    pub fn new(
        points: Vec<Point>,
        neighbors: Vec<Vec<u32>>,
        areas: Vec<f32>,
        heights: Vec<u8>,
        field_ref: Vec<u32>,
    ) -> Self {
        let mut mesh = Self {
            points,
            neighbors,
            areas,
            heights,
            field_ref,
            index: SpatialIndex::default(),
        };
        mesh.rebuild_index();
        mesh
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_water(&self, cell: usize) -> bool {
        self.heights[cell] < MIN_LAND_HEIGHT
    }

    /// Rebuild the embedded nearest-cell index from `points`.
    pub fn rebuild_index(&mut self) {
        self.index = SpatialIndex::build(
            self.points
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| (x, y, i as u32)),
        );
    }

    /// The cell whose center is nearest to `(x, y)`.
    pub fn find_cell(&self, x: f32, y: f32) -> Option<usize> {
        self.index.nearest(x, y).map(|c| c as usize)
    }

    /// All cells whose centers lie within `radius` of `(x, y)`.
    pub fn cells_within(&self, x: f32, y: f32, radius: f32) -> Vec<usize> {
        self.index
            .within_radius(x, y, radius)
            .into_iter()
            .map(|c| c as usize)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_margin() {
        let bounds = MapBounds::new(100.0, 50.0);
        assert!(bounds.contains(0.0, 0.0));
        assert!(bounds.contains(100.0, 50.0));
        assert!(!bounds.contains(-0.1, 10.0));
        assert!(!bounds.contains(10.0, 50.1));
        // A margin admits points just outside.
        assert!(bounds.contains_with_margin(-3.0, 10.0, 4.0));
        assert!(bounds.contains_with_margin(103.9, 10.0, 4.0));
        assert!(!bounds.contains_with_margin(-4.1, 10.0, 4.0));
    }

    #[test]
    fn rounding() {
        assert_eq!(round2(1.004_9), 1.0);
        assert_eq!(round2(1.005_1), 1.01);
        assert_eq!(round2(-2.336), -2.34);
    }

    #[test]
    fn find_cell_uses_cell_centers() {
        let mesh = PolygonMesh::new(
            vec![(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)],
            vec![vec![1, 2], vec![0], vec![0]],
            vec![50.0; 3],
            vec![30, 10, 25],
            vec![0, 1, 2],
        );
        assert_eq!(mesh.find_cell(1.0, 1.0), Some(0));
        assert_eq!(mesh.find_cell(9.0, 2.0), Some(1));
        assert!(mesh.is_water(1));
        assert!(!mesh.is_water(2));
    }
}
