//! State restoration.
//!
//! Runs after burg restoration: a surviving state's display center is its
//! capital's new cell, or a recomputed pole of inaccessibility when the
//! capital did not survive. Military regiments carry their own anchors and
//! are reprojected independently.

use crate::dataset::{CellData, MapDataset};
use crate::entities::{Burg, Regiment, State};
use crate::error::ResampleError;
use crate::mesh::{round2, PolygonMesh};
use crate::pipeline::{PoleLocator, ResampleContext};
use crate::restore::valid_ids;

pub fn restore_states(
    parent: &MapDataset,
    mesh: &PolygonMesh,
    cells: &CellData,
    burgs: &[Burg],
    poles: &dyn PoleLocator,
    ctx: &ResampleContext,
) -> Result<Vec<State>, ResampleError> {
    let valid = valid_ids(&cells.state);

    let mut states: Vec<State> = parent
        .states
        .iter()
        .map(|state| {
            if state.id == 0 || state.removed {
                return Ok(state.clone());
            }
            if !valid.contains(&state.id) {
                log::debug!("state {} ({}) lost its footprint", state.id, state.name);
                return Ok(State {
                    removed: true,
                    lock: false,
                    ..state.clone()
                });
            }

            let military = state
                .military
                .iter()
                .map(|regiment| restore_regiment(parent, mesh, regiment, ctx))
                .collect::<Result<Vec<_>, _>>()?;

            let neighbors = state
                .neighbors
                .iter()
                .copied()
                .filter(|id| valid.contains(id))
                .collect();

            Ok(State {
                military,
                neighbors,
                ..state.clone()
            })
        })
        .collect::<Result<_, ResampleError>>()?;

    let pole_map = poles.poles(mesh, &|cell| cells.state[cell]);

    for state in &mut states {
        if state.id == 0 || state.removed {
            continue;
        }
        let capital = if state.capital == 0 {
            None
        } else {
            burgs.get(state.capital as usize).filter(|b| !b.removed)
        };
        state.center = match capital {
            Some(capital) => capital.cell,
            None => {
                let (px, py) = pole_map
                    .get(&state.id)
                    .copied()
                    .unwrap_or_else(|| {
                        let (x, y) = parent.mesh.points[state.center as usize];
                        (ctx.projection)(x, y)
                    });
                mesh.find_cell(px, py)
                    .ok_or_else(|| ResampleError::no_nearest("state restoration", px, py))?
                    as u32
            }
        };
    }

    Ok(states)
}

fn restore_regiment(
    parent: &MapDataset,
    mesh: &PolygonMesh,
    regiment: &Regiment,
    ctx: &ResampleContext,
) -> Result<Regiment, ResampleError> {
    let (cx, cy) = parent.mesh.points[regiment.cell as usize];
    let (cx, cy) = (ctx.projection)(cx, cy);
    let cell = mesh
        .find_cell(cx, cy)
        .ok_or_else(|| ResampleError::no_nearest("regiment restoration", cx, cy))? as u32;

    let (bx, by) = (ctx.projection)(regiment.bx, regiment.by);
    let (x, y) = (ctx.projection)(regiment.x, regiment.y);

    Ok(Regiment {
        name: regiment.name.clone(),
        cell,
        x: round2(x),
        y: round2(y),
        bx: round2(bx),
        by: round2(by),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic;

    #[test]
    fn surviving_state_centers_on_living_capital() {
        let parent = synthetic::parent_dataset_with_burgs();
        let ctx = synthetic::context(1.0, parent.bounds);
        let mesh = parent.mesh.clone();
        let cells = parent.cells.clone();
        let mut burg_cells = CellData::sized(mesh.len());
        let burgs =
            crate::restore::burgs::restore_burgs(&parent, &mesh, &mut burg_cells, &ctx).unwrap();

        let states = restore_states(
            &parent,
            &mesh,
            &cells,
            &burgs,
            &synthetic::CentroidPoles,
            &ctx,
        )
        .unwrap();

        let state = &states[1];
        assert!(!state.removed);
        assert_eq!(state.center, burgs[state.capital as usize].cell);
    }

    #[test]
    fn dead_capital_falls_back_to_pole() {
        let parent = synthetic::parent_dataset_with_burgs();
        let ctx = synthetic::context(1.0, parent.bounds);
        let mesh = parent.mesh.clone();
        let cells = parent.cells.clone();
        let mut burgs = parent.burgs.clone();
        burgs[parent.states[1].capital as usize].removed = true;

        let states = restore_states(
            &parent,
            &mesh,
            &cells,
            &burgs,
            &synthetic::CentroidPoles,
            &ctx,
        )
        .unwrap();

        let state = &states[1];
        assert!(!state.removed);
        assert!((state.center as usize) < mesh.len());
        assert_eq!(cells.state[state.center as usize], state.id);
    }

    #[test]
    fn neighbor_lists_drop_dead_states() {
        let mut parent = synthetic::parent_dataset_with_burgs();
        parent.states[1].neighbors = vec![2, 9];
        let ctx = synthetic::context(1.0, parent.bounds);
        let mesh = parent.mesh.clone();
        let cells = parent.cells.clone();

        let states = restore_states(
            &parent,
            &mesh,
            &cells,
            &parent.burgs,
            &synthetic::CentroidPoles,
            &ctx,
        )
        .unwrap();

        // State 9 has no cells in the migrated buffer.
        assert_eq!(states[1].neighbors, vec![2]);
    }

    #[test]
    fn regiment_anchors_are_reprojected() {
        let mut parent = synthetic::parent_dataset_with_burgs();
        parent.states[1].military = vec![Regiment {
            name: "1st legion".into(),
            cell: 22,
            x: parent.mesh.points[22].0,
            y: parent.mesh.points[22].1,
            bx: parent.mesh.points[23].0,
            by: parent.mesh.points[23].1,
        }];
        let shift = 5.0;
        let projection = move |x: f32, y: f32| (x + shift, y);
        let inverse = move |x: f32, y: f32| (x - shift, y);
        let ctx = crate::pipeline::ResampleContext {
            projection: &projection,
            inverse: &inverse,
            scale: 1.0,
            bounds: parent.bounds,
        };
        let mesh = parent.mesh.clone();
        let cells = parent.cells.clone();

        let states = restore_states(
            &parent,
            &mesh,
            &cells,
            &parent.burgs,
            &synthetic::CentroidPoles,
            &ctx,
        )
        .unwrap();

        let regiment = &states[1].military[0];
        assert!((regiment.x - (parent.mesh.points[22].0 + shift)).abs() < 0.01);
        assert!((regiment.bx - (parent.mesh.points[23].0 + shift)).abs() < 0.01);
    }
}
