use std::collections::{HashMap, HashSet};

use crate::connectivity::breaks_connectivity;
use crate::grid::Grid;
use crate::types::Cell;

/// A second sweep revisits candidates rejected before later removals landed.
const RETRACT_PASSES: usize = 2;

pub fn get_n_moves(
    all_retractable: &[Cell],
    points_to_move_to: &[Cell],
    grid: &Grid,
    n_cells_can_move: usize,
) -> (Vec<Cell>, Vec<Cell>) {
    let mut occurrences: HashMap<Cell, usize> = HashMap::new();
    for &point in points_to_move_to {
        *occurrences.entry(point).or_insert(0) += 1;
    }
    let mut valid_targets: Vec<Cell> = points_to_move_to
        .iter()
        .copied()
        .filter(|point| occurrences.get(point) == Some(&1))
        .collect();

    let mut scratch = grid.clone();
    let mut accepted = Vec::new();
    let mut accepted_set = HashSet::new();
    for _ in 0..RETRACT_PASSES {
        for &point in all_retractable {
            if accepted_set.contains(&point) || breaks_connectivity(point, &scratch) {
                continue;
            }
            accepted_set.insert(point);
            accepted.push(point);
            scratch.set(point, false);
        }
    }

    accepted.truncate(n_cells_can_move);
    valid_targets.truncate(n_cells_can_move);

    let paired = accepted.len().min(valid_targets.len());
    accepted.truncate(paired);
    valid_targets.truncate(paired);
    (accepted, valid_targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::is_connected;

    #[test]
    fn repeated_targets_are_dropped_entirely() {
        let grid = Grid::with_block(20, (5, 5), 4);
        let retractable = vec![(5, 5), (8, 8)];
        let targets = vec![(4, 6), (9, 6), (4, 6), (6, 4)];
        let (retract, moves) = get_n_moves(&retractable, &targets, &grid, 10);
        assert_eq!(moves, vec![(9, 6), (6, 4)]);
        assert_eq!(retract, vec![(5, 5), (8, 8)]);
    }

    #[test]
    fn lists_are_equal_length_and_within_budget() {
        let grid = Grid::with_block(30, (10, 10), 6);
        let periphery = grid.periphery();
        let targets: Vec<Cell> = (10..16).map(|x| (x, 9)).collect();
        for budget in 0..8 {
            let (retract, moves) = get_n_moves(&periphery, &targets, &grid, budget);
            assert_eq!(retract.len(), moves.len());
            assert!(retract.len() <= budget);
            assert!(retract.len() <= targets.len());
        }
    }

    #[test]
    fn accepted_batch_keeps_body_connected() {
        let cells = [(5, 5), (4, 5), (6, 5), (5, 4), (5, 6), (3, 5), (7, 5)];
        let grid = Grid::from_cells(12, &cells);
        let retractable = grid.periphery();
        let targets: Vec<Cell> = (0..12).map(|y| (10, y)).collect();
        let (retract, moves) = get_n_moves(&retractable, &targets, &grid, 20);
        assert_eq!(retract.len(), moves.len());

        let mut after = grid.clone();
        for cell in &retract {
            after.set(*cell, false);
        }
        assert!(after.count() > 0);
        assert!(is_connected(&after));
        let unique: HashSet<Cell> = retract.iter().copied().collect();
        assert_eq!(unique.len(), retract.len());
    }

    #[test]
    fn second_pass_accepts_cells_freed_by_later_removals() {
        // Line a-b-c: `b` is rejected first (bridge), then `c` goes, and on the
        // second pass `b` has become a tail.
        let grid = Grid::from_cells(10, &[(1, 1), (2, 1), (3, 1)]);
        let retractable = vec![(2, 1), (3, 1)];
        let targets = vec![(0, 5), (1, 5), (2, 5)];
        let (retract, _) = get_n_moves(&retractable, &targets, &grid, 5);
        assert_eq!(retract, vec![(3, 1), (2, 1)]);
    }

    #[test]
    fn nothing_to_pair_yields_empty_lists() {
        let grid = Grid::with_block(10, (2, 2), 3);
        let (retract, moves) = get_n_moves(&grid.periphery(), &[], &grid, 5);
        assert!(retract.is_empty());
        assert!(moves.is_empty());
        let (retract, moves) = get_n_moves(&[], &[(0, 0)], &grid, 5);
        assert!(retract.is_empty());
        assert!(moves.is_empty());
    }
}
