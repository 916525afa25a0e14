//! Map entity tables.
//!
//! Political and cultural entities (cultures, states, religions, provinces,
//! burgs) are stored in tables where the entry index is the entity id.
//! Index 0 is a sentinel entry and removal only flips the `removed` flag,
//! so every id stored in a cell buffer or cross-reference stays a valid
//! array index forever.

use serde::{Deserialize, Serialize};

use crate::mesh::Point;

pub type CultureId = u16;
pub type StateId = u16;
pub type ReligionId = u16;
pub type ProvinceId = u16;
pub type BurgId = u16;
pub type RiverId = u16;
pub type FeatureId = u16;

/// A river: a polyline, the cells it traverses and derived metrics.
///
/// A river with fewer than 2 surviving points after reprojection is dropped
/// entirely rather than tombstoned.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct River {
    pub id: RiverId,
    pub name: String,
    /// The river this one flows into; 0 or self for terminal rivers.
    pub parent: RiverId,
    /// Terminal downstream river id, derived from the parent chain.
    pub basin: RiverId,
    pub width_factor: f32,
    /// Approximate length, cumulative over the point sequence.
    pub length: f32,
    /// First traversed cell.
    pub source: u32,
    /// Second-to-last traversed cell.
    pub mouth: u32,
    pub cells: Vec<u32>,
    /// Stored polyline; when absent the traversed cell centers stand in.
    pub points: Option<Vec<Point>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Culture {
    pub id: CultureId,
    pub name: String,
    pub center: u32,
    pub removed: bool,
    pub lock: bool,
}

/// A settlement. At most one non-removed burg occupies any given cell.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Burg {
    pub id: BurgId,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub cell: u32,
    pub state: StateId,
    /// Real population count, independent of any display multiplier.
    pub population: f32,
    pub capital: bool,
    pub port: bool,
    pub removed: bool,
    pub lock: bool,
}

/// A military unit owned by a state; carries a current position and a home
/// base position, both reprojected independently.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Regiment {
    pub name: String,
    pub cell: u32,
    pub x: f32,
    pub y: f32,
    pub bx: f32,
    pub by: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct State {
    pub id: StateId,
    pub name: String,
    /// Capital burg id, 0 if none.
    pub capital: BurgId,
    /// Display center cell: the capital's cell while the capital survives.
    pub center: u32,
    pub neighbors: Vec<StateId>,
    pub military: Vec<Regiment>,
    pub removed: bool,
    pub lock: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Religion {
    pub id: ReligionId,
    pub name: String,
    pub center: u32,
    pub removed: bool,
    pub lock: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Province {
    pub id: ProvinceId,
    pub name: String,
    pub state: StateId,
    /// Associated burg id, 0 if none.
    pub burg: BurgId,
    pub center: u32,
    pub removed: bool,
    pub lock: bool,
}

/// A point along a route, annotated with its resolved cell.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoutePoint {
    pub x: f32,
    pub y: f32,
    pub cell: u32,
}

/// An overland or sea route. Routes with fewer than 2 surviving points are
/// dropped; the feature id comes from the first surviving point's cell.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Route {
    pub id: u32,
    pub group: String,
    pub feature: FeatureId,
    pub points: Vec<RoutePoint>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Marker {
    pub id: u32,
    pub icon: String,
    pub x: f32,
    pub y: f32,
    pub cell: u32,
}

/// A named region of cells (e.g. a plague area or disputed territory).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Zone {
    pub id: u32,
    pub name: String,
    pub cells: Vec<u32>,
}

/// Kind of a contiguous geographic feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureKind {
    None,
    Ocean,
    Lake,
    Island,
}

/// Metadata for a contiguous geographic feature (an island, a lake, the
/// ocean). Feature id 0 is the "no feature" sentinel.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Feature {
    pub id: FeatureId,
    pub kind: FeatureKind,
    /// Lowest-index cell of the feature, its representative point.
    pub first_cell: u32,
    pub group: Option<String>,
    pub name: Option<String>,
    pub height: Option<f32>,
}

impl Feature {
    /// The sentinel entry at table index 0.
    pub fn none() -> Self {
        Self {
            id: 0,
            kind: FeatureKind::None,
            first_cell: 0,
            group: None,
            name: None,
            height: None,
        }
    }
}
