//! Synthetic datasets and reference collaborators.
//!
//! Deterministic grid-based worlds used by the test suite, plus minimal
//! in-crate implementations of the collaborator traits (mesh builder,
//! classifier, pathfinder, pole locator) that double as reference
//! implementations for callers wiring up the pipeline.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::dataset::{CellData, MapDataset};
use crate::entities::{
    Burg, Culture, Feature, FeatureKind, Marker, Province, Religion, River, Route, RoutePoint,
    State, Zone,
};
use crate::mesh::{FieldMesh, MapBounds, Point, PolygonMesh};
use crate::pipeline::{MeshBuilder, Pathfinder, PoleLocator, ResampleContext, TerrainClassifier};

fn identity(x: f32, y: f32) -> (f32, f32) {
    (x, y)
}

static IDENTITY: fn(f32, f32) -> (f32, f32) = identity;

/// A context with identity projections over `bounds`.
pub fn context(scale: f32, bounds: MapBounds) -> ResampleContext<'static> {
    ResampleContext {
        projection: &IDENTITY,
        inverse: &IDENTITY,
        scale,
        bounds,
    }
}

/// A square grid field mesh over `bounds` with `nx` x `ny` points, flat
/// temperate latitude and empty climate buffers.
pub fn field_mesh(bounds: MapBounds, nx: usize, ny: usize) -> FieldMesh {
    let spacing = bounds.width / nx as f32;
    let mut points = Vec::with_capacity(nx * ny);
    let mut neighbors = Vec::with_capacity(nx * ny);
    for y in 0..ny {
        for x in 0..nx {
            points.push((
                x as f32 * spacing + spacing / 2.0,
                y as f32 * spacing + spacing / 2.0,
            ));
            neighbors.push(grid_neighbors(x, y, nx, ny));
        }
    }
    FieldMesh {
        latitude: vec![40.0; points.len()],
        points,
        spacing,
        neighbors,
        heights: Vec::new(),
        temperature: Vec::new(),
        precipitation: Vec::new(),
    }
}

fn grid_neighbors(x: usize, y: usize, nx: usize, ny: usize) -> Vec<u32> {
    let mut out = Vec::with_capacity(4);
    if x > 0 {
        out.push((y * nx + x - 1) as u32);
    }
    if x + 1 < nx {
        out.push((y * nx + x + 1) as u32);
    }
    if y > 0 {
        out.push(((y - 1) * nx + x) as u32);
    }
    if y + 1 < ny {
        out.push(((y + 1) * nx + x) as u32);
    }
    out
}

/// A 10x10 parent dataset over a 100x100 map: the two left columns are
/// ocean, the rest land split between two states/cultures/religions/
/// provinces (north half id 1, south half id 2).
pub fn parent_dataset() -> MapDataset {
    let bounds = MapBounds::new(100.0, 100.0);
    let nx = 10;
    let ny = 10;
    let mut field = field_mesh(bounds, nx, ny);
    let len = nx * ny;

    let mut heights = vec![0u8; len];
    for y in 0..ny {
        for x in 0..nx {
            heights[y * nx + x] = if x < 2 { 10 } else { 30 };
        }
    }
    field.heights = heights.clone();
    field.temperature = vec![10; len];
    field.precipitation = vec![20; len];

    let mesh = PolygonMesh::new(
        field.points.clone(),
        field.neighbors.clone(),
        vec![field.spacing * field.spacing; len],
        heights,
        (0..len as u32).collect(),
    );

    let mut cells = CellData::sized(len);
    for y in 0..ny {
        for x in 0..nx {
            let cell = y * nx + x;
            if mesh.is_water(cell) {
                cells.feature[cell] = 2;
                continue;
            }
            let half = if y < ny / 2 { 1 } else { 2 };
            cells.biome[cell] = crate::biomes::GRASSLAND;
            cells.flux[cell] = (cell % 5) as u16;
            cells.suitability[cell] = 10.0;
            cells.population[cell] = cell as f32;
            cells.culture[cell] = half;
            cells.state[cell] = half;
            cells.religion[cell] = half;
            cells.province[cell] = half;
            cells.feature[cell] = 1;
        }
    }

    let mut dataset = MapDataset::empty(bounds);
    dataset.field = field;
    dataset.mesh = mesh;
    dataset.cells = cells;
    dataset.cultures = vec![
        culture(0, "Wildlands", 0),
        culture(1, "Northfolk", 22),
        culture(2, "Southfolk", 72),
    ];
    dataset.religions = vec![
        religion(0, "No religion", 0),
        religion(1, "Sky Temple", 23),
        religion(2, "Deep Shrine", 73),
    ];
    dataset.states = vec![
        state(0, "Neutrals", 0, 0),
        state(1, "Nordmark", 1, 22),
        state(2, "Sudmark", 2, 72),
    ];
    dataset.states[1].neighbors = vec![2];
    dataset.states[2].neighbors = vec![1];
    dataset.provinces = vec![
        province(0, "", 0, 0, 0),
        province(1, "North Province", 1, 1, 22),
        province(2, "South Province", 2, 2, 72),
    ];
    dataset.features = vec![
        Feature::none(),
        Feature {
            id: 1,
            kind: FeatureKind::Island,
            first_cell: 2,
            group: None,
            name: None,
            height: None,
        },
        Feature {
            id: 2,
            kind: FeatureKind::Ocean,
            first_cell: 0,
            group: None,
            name: None,
            height: None,
        },
    ];
    dataset
}

/// [`parent_dataset`] plus two placed burgs (capitals of the two states).
pub fn parent_dataset_with_burgs() -> MapDataset {
    let mut dataset = parent_dataset();
    let b1 = dataset.mesh.points[33];
    let b2 = dataset.mesh.points[77];
    dataset.burgs = vec![
        Burg {
            id: 0,
            name: String::new(),
            x: 0.0,
            y: 0.0,
            cell: 0,
            state: 0,
            population: 0.0,
            capital: false,
            port: false,
            removed: false,
            lock: false,
        },
        burg(1, "Northport", b1, 33, 1),
        burg(2, "Southgate", b2, 77, 2),
    ];
    dataset.cells.burg[33] = 1;
    dataset.cells.burg[77] = 2;
    dataset
}

/// [`parent_dataset`] plus one river crossing the land half of row 4.
pub fn parent_dataset_with_river() -> MapDataset {
    let mut dataset = parent_dataset();
    let points: Vec<Point> = (2..7).map(|x| dataset.mesh.points[4 * 10 + x]).collect();
    dataset.rivers = vec![river(1, points, &dataset.mesh)];
    dataset
}

/// The full fixture: burgs, a river, a route, markers and a zone.
pub fn full_parent_dataset() -> MapDataset {
    let mut dataset = parent_dataset_with_burgs();
    let points: Vec<Point> = (2..7).map(|x| dataset.mesh.points[4 * 10 + x]).collect();
    dataset.rivers = vec![river(1, points, &dataset.mesh)];
    dataset.routes = vec![route(1, vec![(35.0, 35.0), (55.0, 55.0), (75.0, 75.0)])];
    dataset.markers = vec![marker(1, 45.0, 25.0), marker(2, 65.0, 85.0)];
    dataset.zones = vec![zone(1, vec![44, 45, 54])];
    dataset
}

pub fn culture(id: u16, name: &str, center: u32) -> Culture {
    Culture {
        id,
        name: name.to_string(),
        center,
        removed: false,
        lock: false,
    }
}

pub fn religion(id: u16, name: &str, center: u32) -> Religion {
    Religion {
        id,
        name: name.to_string(),
        center,
        removed: false,
        lock: false,
    }
}

pub fn state(id: u16, name: &str, capital: u16, center: u32) -> State {
    State {
        id,
        name: name.to_string(),
        capital,
        center,
        neighbors: Vec::new(),
        military: Vec::new(),
        removed: false,
        lock: false,
    }
}

pub fn province(id: u16, name: &str, state: u16, burg: u16, center: u32) -> Province {
    Province {
        id,
        name: name.to_string(),
        state,
        burg,
        center,
        removed: false,
        lock: false,
    }
}

pub fn burg(id: u16, name: &str, point: Point, cell: u32, state: u16) -> Burg {
    Burg {
        id,
        name: name.to_string(),
        x: point.0,
        y: point.1,
        cell,
        state,
        population: 100.0,
        capital: true,
        port: false,
        removed: false,
        lock: false,
    }
}

/// A river whose traversed cells are resolved from `points` against `mesh`.
pub fn river(id: u16, points: Vec<Point>, mesh: &PolygonMesh) -> River {
    let cells: Vec<u32> = points
        .iter()
        .filter_map(|&(x, y)| mesh.find_cell(x, y).map(|c| c as u32))
        .collect();
    River {
        id,
        name: format!("River {id}"),
        parent: 0,
        basin: id,
        width_factor: 1.0,
        length: 0.0,
        source: cells.first().copied().unwrap_or(0),
        mouth: cells.get(cells.len().saturating_sub(2)).copied().unwrap_or(0),
        cells,
        points: Some(points),
    }
}

pub fn route(id: u32, points: Vec<Point>) -> Route {
    Route {
        id,
        group: "roads".to_string(),
        feature: 0,
        points: points
            .into_iter()
            .map(|(x, y)| RoutePoint { x, y, cell: 0 })
            .collect(),
    }
}

pub fn marker(id: u32, x: f32, y: f32) -> Marker {
    Marker {
        id,
        icon: "tower".to_string(),
        x,
        y,
        cell: 0,
    }
}

pub fn zone(id: u32, cells: Vec<u32>) -> Zone {
    Zone {
        id,
        name: format!("Zone {id}"),
        cells,
    }
}

/// A 7x7 world that is open water except for the listed cells, which get
/// `height`. Latitude is tropical everywhere.
pub fn island_world(land: &[(usize, usize)], height: u8) -> (FieldMesh, PolygonMesh) {
    let n = 7;
    let bounds = MapBounds::new(70.0, 70.0);
    let mut field = field_mesh(bounds, n, n);
    let len = n * n;
    field.latitude = vec![10.0; len];

    let mut heights = vec![5u8; len];
    for &(x, y) in land {
        heights[y * n + x] = height;
    }
    field.heights = heights.clone();
    field.temperature = vec![25; len];
    field.precipitation = vec![10; len];

    let mesh = PolygonMesh::new(
        field.points.clone(),
        field.neighbors.clone(),
        vec![field.spacing * field.spacing; len],
        heights,
        (0..len as u32).collect(),
    );
    (field, mesh)
}

/// Square-grid mesh builder.
pub struct GridMeshBuilder {
    pub per_side: usize,
}

impl MeshBuilder for GridMeshBuilder {
    fn build_field_mesh(&self, bounds: MapBounds) -> FieldMesh {
        field_mesh(bounds, self.per_side, self.per_side)
    }

    fn build_polygon_mesh(&self, field: &FieldMesh) -> PolygonMesh {
        PolygonMesh::new(
            field.points.clone(),
            field.neighbors.clone(),
            vec![field.spacing * field.spacing; field.len()],
            field.heights.clone(),
            (0..field.len() as u32).collect(),
        )
    }
}

/// Feature markup from elevation alone: one land feature, one ocean.
pub struct ElevationClassifier;

impl TerrainClassifier for ElevationClassifier {
    fn markup_field(&self, _field: &mut FieldMesh) {}

    fn markup_mesh(&self, mesh: &PolygonMesh, cells: &mut CellData) -> Vec<Feature> {
        let mut first_land = None;
        let mut first_water = None;
        for cell in 0..mesh.len() {
            if mesh.is_water(cell) {
                cells.feature[cell] = 2;
                first_water.get_or_insert(cell);
            } else {
                cells.feature[cell] = 1;
                first_land.get_or_insert(cell);
                if let Some(&water) = mesh.neighbors[cell]
                    .iter()
                    .find(|&&n| mesh.is_water(n as usize))
                {
                    cells.haven[cell] = water;
                }
            }
        }

        vec![
            Feature::none(),
            Feature {
                id: 1,
                kind: FeatureKind::Island,
                first_cell: first_land.unwrap_or(0) as u32,
                group: None,
                name: None,
                height: None,
            },
            Feature {
                id: 2,
                kind: FeatureKind::Ocean,
                first_cell: first_water.unwrap_or(0) as u32,
                group: None,
                name: None,
                height: None,
            },
        ]
    }
}

/// Uniform-cost shortest path over the cell graph.
pub struct DijkstraPathfinder;

#[derive(Clone, Copy, PartialEq, Eq)]
struct Node {
    cost: u32,
    cell: usize,
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.cell.cmp(&self.cell))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Pathfinder for DijkstraPathfinder {
    fn path(
        &self,
        mesh: &PolygonMesh,
        from: usize,
        to: usize,
        cost: &dyn Fn(usize) -> Option<f32>,
    ) -> Option<Vec<usize>> {
        if from == to {
            return None;
        }

        let len = mesh.len();
        let mut dist = vec![u32::MAX; len];
        let mut prev = vec![usize::MAX; len];
        let mut heap = std::collections::BinaryHeap::new();
        dist[from] = 0;
        heap.push(Node { cost: 0, cell: from });

        while let Some(Node { cost: d, cell }) = heap.pop() {
            if cell == to {
                break;
            }
            if d > dist[cell] {
                continue;
            }
            for &neighbor in &mesh.neighbors[cell] {
                let neighbor = neighbor as usize;
                let Some(step) = cost(neighbor) else { continue };
                let next = d + (step * 100.0).round() as u32 + 1;
                if next < dist[neighbor] {
                    dist[neighbor] = next;
                    prev[neighbor] = cell;
                    heap.push(Node { cost: next, cell: neighbor });
                }
            }
        }

        if dist[to] == u32::MAX {
            return None;
        }

        let mut path = Vec::new();
        let mut cell = prev[to];
        while cell != usize::MAX && cell != from {
            path.push(cell);
            cell = prev[cell];
        }
        path.reverse();
        Some(path)
    }
}

/// Poles of inaccessibility approximated by group centroids.
pub struct CentroidPoles;

impl PoleLocator for CentroidPoles {
    fn poles(
        &self,
        mesh: &PolygonMesh,
        group_of: &dyn Fn(usize) -> u16,
    ) -> HashMap<u16, Point> {
        let mut sums: HashMap<u16, (f32, f32, u32)> = HashMap::new();
        for cell in 0..mesh.len() {
            let group = group_of(cell);
            if group == 0 {
                continue;
            }
            let (x, y) = mesh.points[cell];
            let entry = sums.entry(group).or_insert((0.0, 0.0, 0));
            entry.0 += x;
            entry.1 += y;
            entry.2 += 1;
        }
        sums.into_iter()
            .map(|(group, (x, y, n))| (group, (x / n as f32, y / n as f32)))
            .collect()
    }
}
