use std::collections::HashSet;

use tracing::debug;

use crate::constants::{FORWARD_MIN_PER_COLUMN, REORGANIZE_MIN_PER_COLUMN, REORGANIZE_TURNS};
use crate::formation::get_n_moves;
use crate::grid::Grid;
use crate::player::find_movable_cells;
use crate::types::{AmoebaState, Cell, TurnOutcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarchStage {
    Reorganize,
    Forward,
}

impl MarchStage {
    pub fn for_turn(turn: u8) -> Self {
        if turn < REORGANIZE_TURNS {
            Self::Reorganize
        } else {
            Self::Forward
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reorganize => "reorganize",
            Self::Forward => "forward",
        }
    }

    fn min_per_column(self) -> usize {
        match self {
            Self::Reorganize => REORGANIZE_MIN_PER_COLUMN,
            Self::Forward => FORWARD_MIN_PER_COLUMN,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ColumnMarch;

impl ColumnMarch {
    pub fn play(&self, state: &AmoebaState, turn: u8, budget: usize) -> TurnOutcome {
        let stage = MarchStage::for_turn(turn);
        let grid = &state.amoeba_map;
        if let Some(row) = split_row(grid) {
            debug!(row, "body split across rows");
        }

        let retractable = column_retract(grid, &state.periphery, stage.min_per_column());
        let movable = find_movable_cells(&retractable, &state.periphery, grid, &state.bacteria);
        let targets = match stage {
            MarchStage::Reorganize => {
                let movable: HashSet<Cell> = movable.into_iter().collect();
                sideways_expand(grid, &movable)
            }
            MarchStage::Forward => front_expand(grid, &movable),
        };
        let (retract, moves) = get_n_moves(&retractable, &targets, grid, budget);

        debug!(
            stage = stage.as_str(),
            turn,
            budget,
            retractable = retractable.len(),
            candidates = targets.len(),
            moves = moves.len(),
            "march computed"
        );

        TurnOutcome {
            retract,
            moves,
            info: turn.saturating_add(1),
        }
    }
}

pub fn column_retract(grid: &Grid, periphery: &[Cell], min_per_column: usize) -> Vec<Cell> {
    let rows: Vec<i32> = grid.occupied_cells().into_iter().map(|(_, y)| y).collect();
    let (Some(&top), Some(&bottom)) = (rows.iter().min(), rows.iter().max()) else {
        return Vec::new();
    };
    let periphery: HashSet<Cell> = periphery.iter().copied().collect();
    let mut counts = grid.column_counts();
    let mut retract = Vec::new();
    for y in top..bottom {
        for x in 0..grid.size() {
            let count = &mut counts[x as usize];
            if grid.get((x, y)) && *count > min_per_column && periphery.contains(&(x, y)) {
                retract.push((x, y));
                *count -= 1;
            }
        }
    }
    retract
}

pub fn sideways_expand(grid: &Grid, movable: &HashSet<Cell>) -> Vec<Cell> {
    let occupied = grid.occupied_cells();
    let (Some(&(left, _)), Some(&(right, _))) = (occupied.first(), occupied.last()) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for (column_x, dx) in [(left, -1), (right, 1)] {
        let column: Vec<Cell> = occupied
            .iter()
            .copied()
            .filter(|&(x, _)| x == column_x)
            .collect();
        if column.len() < 2 {
            if let Some(&(x, y)) = column.last() {
                out.push(grid.wrap(x, y + 1));
            }
        }
        for &(x, y) in &column[column.len().saturating_sub(2)..] {
            out.push(grid.wrap(x + dx, y));
        }
    }
    out.retain(|cell| movable.contains(cell));
    out
}

pub fn front_expand(grid: &Grid, movable: &[Cell]) -> Vec<Cell> {
    let frontline: Vec<Cell> = movable
        .iter()
        .copied()
        .filter(|&(x, y)| grid.get(grid.wrap(x, y - 1)))
        .collect();
    let Some(min_row) = frontline.iter().map(|&(_, y)| y).min() else {
        return Vec::new();
    };
    frontline.into_iter().filter(|&(_, y)| y == min_row).collect()
}

pub fn split_row(grid: &Grid) -> Option<i32> {
    let mut started = false;
    let mut gap = false;
    for y in 0..grid.size() {
        let occupied = (0..grid.size()).any(|x| grid.get((x, y)));
        if occupied {
            if gap {
                return Some(y - 1);
            }
            started = true;
        } else if started {
            gap = true;
        }
    }
    None
}
