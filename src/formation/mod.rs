use std::collections::HashSet;
use std::fmt;

use crate::error::FormationError;
use crate::types::{AmoebaState, Cell, FormationKind};

mod extent;
mod growth;
mod matcher;
mod quadrants;
mod tables;

pub use self::extent::{current_extent, longest_empty_column_run, Extent};
pub use self::growth::GrowthFormation;
pub use self::matcher::get_n_moves;
pub use self::quadrants::quadrant_points;
pub use self::tables::StaticFormation;

pub trait Formation: fmt::Debug {
    fn kind(&self) -> FormationKind;

    fn update(&mut self, _phase: u8) {}

    fn next_formation_points(&self, state: &AmoebaState) -> Vec<Cell>;

    fn next_phase(&self, phase: u8, state: &AmoebaState, retract: &[Cell], moves: &[Cell]) -> u8;

    fn retractable_points(&self, goal: &HashSet<Cell>, state: &AmoebaState) -> Vec<Cell> {
        state
            .periphery
            .iter()
            .copied()
            .filter(|cell| !goal.contains(cell))
            .collect()
    }

    fn moveable_points(
        &self,
        candidates: &[Cell],
        goal: &HashSet<Cell>,
        _state: &AmoebaState,
    ) -> Vec<Cell> {
        candidates
            .iter()
            .copied()
            .filter(|cell| goal.contains(cell))
            .collect()
    }

    fn n_moves(
        &self,
        all_retractable: &[Cell],
        points_to_move_to: &[Cell],
        state: &AmoebaState,
        n_cells_can_move: usize,
    ) -> (Vec<Cell>, Vec<Cell>) {
        get_n_moves(
            all_retractable,
            points_to_move_to,
            &state.amoeba_map,
            n_cells_can_move,
        )
    }
}

pub fn build_formation(
    kind: FormationKind,
    grid_size: i32,
) -> Result<Box<dyn Formation>, FormationError> {
    Ok(match kind {
        FormationKind::Growth => Box::new(GrowthFormation::new(grid_size)),
        FormationKind::SpaceCurve => Box::new(StaticFormation::space_curve(grid_size)?),
        FormationKind::Quadratic => Box::new(StaticFormation::quadratic(grid_size)?),
        FormationKind::Quadrants => Box::new(StaticFormation::quadrants(grid_size)),
        FormationKind::ColumnMarch => return Err(FormationError::Unshaped(kind.as_str())),
    })
}

pub fn remove_duplicates(points: &[Cell]) -> Vec<Cell> {
    let mut seen = HashSet::new();
    points
        .iter()
        .copied()
        .filter(|point| seen.insert(*point))
        .collect()
}

pub fn first_cells(points: &[Cell], n_cells: usize) -> Vec<Cell> {
    let mut out = remove_duplicates(points);
    out.truncate(n_cells);
    out
}
