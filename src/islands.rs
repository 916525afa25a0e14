//! Post-migration biome recoloring: coastal shelf variants and small-island
//! reclassification.
//!
//! Runs after cell attribute migration, once the biome buffer is filled for
//! land cells. The coastal pass colors shallow water bordering specific
//! biome classes; the island pass walks land connectivity with a hard visit
//! cap, so the island predicate is a connectivity-size threshold rather
//! than a true topological test.

use crate::biomes::IslandRules;
use crate::dataset::CellData;
use crate::mesh::{FieldMesh, PolygonMesh, MIN_LAND_HEIGHT};

/// Apply both recolor passes.
pub fn recolor(field: &FieldMesh, mesh: &PolygonMesh, cells: &mut CellData, rules: &IslandRules) {
    recolor_coast(mesh, cells, rules);
    recolor_islands(field, mesh, cells, rules);
}

/// Shallow-water recolor: cells one elevation step below the land threshold
/// take a shelf variant determined by their neighbors' biomes. Rules apply
/// in order, first match wins; unmatched cells stay open water.
fn recolor_coast(mesh: &PolygonMesh, cells: &mut CellData, rules: &IslandRules) {
    for cell in 0..mesh.len() {
        if mesh.heights[cell] != MIN_LAND_HEIGHT - 1 {
            continue;
        }
        'rules: for rule in &rules.shelf_rules {
            for &neighbor in &mesh.neighbors[cell] {
                if rule.neighbors.contains(&cells.biome[neighbor as usize]) {
                    cells.biome[cell] = rule.variant;
                    break 'rules;
                }
            }
        }
    }
}

/// Island recolor: a land cell outside the temperate latitude band seeds a
/// bounded walk over connected land; if the whole component fits under the
/// cap it is recolored to the tropical or polar island variant.
fn recolor_islands(field: &FieldMesh, mesh: &PolygonMesh, cells: &mut CellData, rules: &IslandRules) {
    let mut probed = vec![false; mesh.len()];

    for cell in 0..mesh.len() {
        if mesh.is_water(cell) || probed[cell] {
            continue;
        }
        let biome = cells.biome[cell];
        if biome == rules.tropical_island || biome == rules.polar_island {
            continue;
        }

        let latitude = field.latitude[mesh.field_ref[cell] as usize].abs();
        let variant = if latitude <= rules.tropical_max_lat {
            rules.tropical_island
        } else if latitude >= rules.polar_min_lat {
            rules.polar_island
        } else {
            continue;
        };

        match bounded_component(mesh, cell, rules.max_island_cells) {
            Some(component) => {
                for member in &component {
                    cells.biome[*member] = variant;
                }
                for member in component {
                    probed[member] = true;
                }
            }
            None => {
                // Mainland: only the seed is marked, every probe stays bounded.
                probed[cell] = true;
            }
        }
    }
}

/// Collect the connected land component containing `seed` with an explicit
/// worklist. Returns `None` once more than `cap` cells have been visited.
fn bounded_component(mesh: &PolygonMesh, seed: usize, cap: usize) -> Option<Vec<usize>> {
    let mut visited: Vec<usize> = Vec::with_capacity(cap);
    let mut stack: Vec<usize> = vec![seed];

    while let Some(cell) = stack.pop() {
        if visited.contains(&cell) {
            continue;
        }
        visited.push(cell);
        if visited.len() > cap {
            return None;
        }
        for &neighbor in &mesh.neighbors[cell] {
            let neighbor = neighbor as usize;
            if !mesh.is_water(neighbor) && !visited.contains(&neighbor) {
                stack.push(neighbor);
            }
        }
    }

    Some(visited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biomes;
    use crate::synthetic;

    #[test]
    fn shallow_cell_takes_first_matching_rule() {
        let (_field, mesh) = synthetic::island_world(&[(3, 3)], 19);
        let mut cells = CellData::sized(mesh.len());
        // The lone shallow cell at (3,3) borders a forest cell and a
        // rainforest cell; the forest rule comes first.
        let shallow = 3 * 7 + 3;
        cells.biome[shallow - 1] = biomes::FOREST;
        cells.biome[shallow + 1] = biomes::RAINFOREST;

        let rules = IslandRules::default();
        recolor_coast(&mesh, &mut cells, &rules);

        assert_eq!(cells.biome[shallow], biomes::CORAL_SHELF);
    }

    #[test]
    fn unmatched_shallow_cell_stays_marine() {
        let (_, mesh) = synthetic::island_world(&[(3, 3)], 19);
        let mut cells = CellData::sized(mesh.len());
        let shallow = 3 * 7 + 3;

        let rules = IslandRules::default();
        recolor_coast(&mesh, &mut cells, &rules);

        assert_eq!(cells.biome[shallow], biomes::MARINE);
    }

    #[test]
    fn small_component_is_recolored_as_island() {
        // Two connected land cells in otherwise open water, tropical
        // latitude.
        let (field, mesh) = synthetic::island_world(&[(2, 2), (2, 3)], 30);
        let mut cells = CellData::sized(mesh.len());
        cells.biome[2 * 7 + 2] = biomes::GRASSLAND;
        cells.biome[3 * 7 + 2] = biomes::GRASSLAND;

        let rules = IslandRules::default();
        recolor_islands(&field, &mesh, &mut cells, &rules);

        assert_eq!(cells.biome[2 * 7 + 2], biomes::TROPICAL_ISLAND);
        assert_eq!(cells.biome[3 * 7 + 2], biomes::TROPICAL_ISLAND);
    }

    #[test]
    fn component_over_the_cap_is_left_alone() {
        // A 6x6 block of land is 36 cells, over the 30-cell cap.
        let mut land = Vec::new();
        for y in 0..6 {
            for x in 0..6 {
                land.push((x, y));
            }
        }
        let (field, mesh) = synthetic::island_world(&land, 30);
        let mut cells = CellData::sized(mesh.len());
        for &(x, y) in &land {
            cells.biome[y * 7 + x] = biomes::GRASSLAND;
        }

        let rules = IslandRules::default();
        recolor_islands(&field, &mesh, &mut cells, &rules);

        for &(x, y) in &land {
            assert_eq!(cells.biome[y * 7 + x], biomes::GRASSLAND);
        }
    }

    #[test]
    fn walk_never_visits_more_than_cap_plus_one() {
        let mut land = Vec::new();
        for y in 0..6 {
            for x in 0..6 {
                land.push((x, y));
            }
        }
        let (_, mesh) = synthetic::island_world(&land, 30);
        assert!(bounded_component(&mesh, 0, 30).is_none());
        assert!(bounded_component(&mesh, 0, 36).is_some());
    }
}
