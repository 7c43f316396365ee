use std::collections::HashSet;

use crate::types::Cell;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: i32,
    cells: Vec<bool>,
}

impl Grid {
    pub fn new(size: i32) -> Self {
        let size = size.max(1);
        Self {
            size,
            cells: vec![false; size as usize * size as usize],
        }
    }

    pub fn from_cells(size: i32, cells: &[Cell]) -> Self {
        let mut grid = Self::new(size);
        for &cell in cells {
            grid.set(cell, true);
        }
        grid
    }

    pub fn with_block(size: i32, origin: Cell, side: i32) -> Self {
        let mut grid = Self::new(size);
        for dx in 0..side {
            for dy in 0..side {
                grid.set((origin.0 + dx, origin.1 + dy), true);
            }
        }
        grid
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn wrap(&self, x: i32, y: i32) -> Cell {
        (x.rem_euclid(self.size), y.rem_euclid(self.size))
    }

    pub fn get(&self, cell: Cell) -> bool {
        self.cells[self.index(cell)]
    }

    pub fn set(&mut self, cell: Cell, occupied: bool) {
        let idx = self.index(cell);
        self.cells[idx] = occupied;
    }

    pub fn neighbors4(&self, cell: Cell) -> [Cell; 4] {
        let (x, y) = cell;
        [
            self.wrap(x - 1, y),
            self.wrap(x + 1, y),
            self.wrap(x, y + 1),
            self.wrap(x, y - 1),
        ]
    }

    pub fn occupied_neighbors(&self, cell: Cell) -> Vec<Cell> {
        self.neighbors4(cell)
            .into_iter()
            .filter(|&n| self.get(n))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn occupied_cells(&self) -> Vec<Cell> {
        let mut out = Vec::new();
        for x in 0..self.size {
            for y in 0..self.size {
                if self.get((x, y)) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    pub fn occupied_set(&self) -> HashSet<Cell> {
        self.occupied_cells().into_iter().collect()
    }

    pub fn column_count(&self, x: i32) -> usize {
        let x = x.rem_euclid(self.size);
        (0..self.size).filter(|&y| self.get((x, y))).count()
    }

    pub fn column_counts(&self) -> Vec<usize> {
        (0..self.size).map(|x| self.column_count(x)).collect()
    }

    pub fn periphery(&self) -> Vec<Cell> {
        self.occupied_cells()
            .into_iter()
            .filter(|&cell| self.neighbors4(cell).iter().any(|&n| !self.get(n)))
            .collect()
    }

    fn index(&self, cell: Cell) -> usize {
        let (x, y) = self.wrap(cell.0, cell.1);
        x as usize * self.size as usize + y as usize
    }
}

pub fn wrapped_range(start: i32, end: i32, size: i32) -> Vec<i32> {
    wrapped_range_step(start, end, 1, size)
}

pub fn wrapped_range_step(start: i32, end: i32, step: usize, size: i32) -> Vec<i32> {
    let size = size.max(1);
    let step = step.max(1);
    let start = start.rem_euclid(size);
    let end = end.rem_euclid(size);
    if start < end {
        return (start..end).step_by(step).collect();
    }
    (start..size).step_by(step).chain((0..end).step_by(step)).collect()
}
