use std::collections::{HashSet, VecDeque};

use crate::grid::Grid;
use crate::types::Cell;

pub fn breaks_connectivity(cell: Cell, grid: &Grid) -> bool {
    let isolated_neighbors = grid.occupied_neighbors(cell);
    let Some(&start) = isolated_neighbors.first() else {
        return true;
    };

    let mut scratch = grid.clone();
    scratch.set(cell, false);

    let mut to_visit: HashSet<Cell> = isolated_neighbors.into_iter().collect();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if !visited.insert(current) {
            continue;
        }
        to_visit.remove(&current);
        if to_visit.is_empty() {
            return false;
        }
        for next in scratch.occupied_neighbors(current) {
            if !visited.contains(&next) {
                queue.push_back(next);
            }
        }
    }

    true
}

pub fn is_connected(grid: &Grid) -> bool {
    let occupied = grid.occupied_cells();
    let Some(&start) = occupied.first() else {
        return true;
    };

    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    seen.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for next in grid.occupied_neighbors(current) {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }

    seen.len() == occupied.len()
}
