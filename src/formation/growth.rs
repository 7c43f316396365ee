use std::collections::HashSet;

use crate::constants::{
    max_chunks, spine_row, ARRIVAL_RATIO, CHUNK_CELLS, CHUNK_HEIGHT, GATHER_COLUMN_RUN,
    GROWTH_SPREAD_THRESHOLD, SPREAD_COLUMN_RUN, TOOTH_GAP,
};
use crate::grid::wrapped_range;
use crate::types::{AmoebaState, Cell, FormationKind};

use super::extent::{current_extent, longest_empty_column_run, Extent};
use super::{first_cells, remove_duplicates, Formation};

/// Chunk layout, relative to its top-left corner:
///
/// ```text
/// |1|2|3|
/// |4|5|
/// |6|7|
/// ```
const CHUNK: [(i32, i32); CHUNK_CELLS] =
    [(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (0, 2), (1, 2)];

#[derive(Clone, Debug)]
pub struct GrowthFormation {
    grid_size: i32,
    phase: u8,
    fill_rows: Vec<Cell>,
}

impl GrowthFormation {
    pub fn new(grid_size: i32) -> Self {
        let spine = spine_row(grid_size);
        let mut fill_rows = Vec::with_capacity(grid_size.max(0) as usize * grid_size.max(0) as usize);
        for offset in 0..spine {
            for x in 0..grid_size {
                fill_rows.push((x, (spine - offset).rem_euclid(grid_size)));
            }
            for x in 0..grid_size {
                fill_rows.push((x, (spine + offset).rem_euclid(grid_size)));
            }
        }
        Self {
            grid_size,
            phase: 0,
            fill_rows,
        }
    }

    fn wrap(&self, x: i32, y: i32) -> Cell {
        (x.rem_euclid(self.grid_size), y.rem_euclid(self.grid_size))
    }

    fn chunk(&self, x_offset: i32, y_offset: i32) -> impl Iterator<Item = Cell> + '_ {
        CHUNK
            .iter()
            .map(move |&(dx, dy)| self.wrap(x_offset + dx, y_offset + dy))
    }

    fn tooth(&self, x: i32, y_offset: i32, n_cells: usize) -> Vec<Cell> {
        let n_chunks = (n_cells / CHUNK_CELLS).min(max_chunks(self.grid_size));
        let mut y = y_offset;
        let mut out = Vec::with_capacity((n_chunks + 1) * CHUNK_CELLS);
        for _ in 0..n_chunks {
            out.extend(self.chunk(x, y));
            y += CHUNK_HEIGHT;
        }
        out.extend(self.chunk(x, y).take(n_cells % CHUNK_CELLS));
        out
    }

    fn spine(&self, xs: impl IntoIterator<Item = i32>) -> Vec<Cell> {
        let row = spine_row(self.grid_size);
        xs.into_iter().map(|x| self.wrap(x, row)).collect()
    }

    fn rake(
        &self,
        left: i32,
        spine_xs: impl IntoIterator<Item = i32>,
        right: i32,
        y_offset: i32,
        n_cells: usize,
    ) -> Vec<Cell> {
        let mut out = self.tooth(left, y_offset, n_cells);
        out.extend(self.spine(spine_xs));
        out.extend(self.tooth(right, y_offset, n_cells));
        out
    }

    fn full_spine(&self) -> Vec<Cell> {
        self.spine(wrapped_range(0, self.grid_size, self.grid_size))
    }

    fn gathering_points(
        &self,
        extent: Extent,
        n_cells: usize,
        occupied: &HashSet<Cell>,
    ) -> Vec<Cell> {
        let x = extent.x_start;
        let y = extent.y_start;
        let previous = first_cells(
            &self.rake(x, x..x + TOOTH_GAP, x + TOOTH_GAP, y, n_cells),
            n_cells,
        );
        if !arrived(&previous, occupied) {
            return previous;
        }
        remove_duplicates(&self.rake(
            x + 1,
            x + 1..x + 1 + TOOTH_GAP,
            x + 1 + TOOTH_GAP,
            y,
            n_cells,
        ))
    }

    fn spreading_points(
        &self,
        extent: Extent,
        n_cells: usize,
        occupied: &HashSet<Cell>,
    ) -> Vec<Cell> {
        let Extent {
            x_start, x_end, y_start, ..
        } = extent;
        let size = self.grid_size;

        let mut previous = self.rake(
            x_start,
            wrapped_range(x_start, x_end - 2, size),
            x_end - 2,
            y_start,
            n_cells,
        );
        previous.extend(self.full_spine());
        let previous = first_cells(&previous, n_cells);
        if !arrived(&previous, occupied) {
            let mut held = previous;
            held.extend(self.fill_rows.iter().copied());
            return first_cells(&held, n_cells);
        }

        let mut ideal = if self.phase == 2 {
            self.rake(
                x_start - 1,
                wrapped_range(x_start, x_end - 1, size),
                x_end - 1,
                y_start,
                n_cells,
            )
        } else {
            self.rake(
                x_start + 1,
                wrapped_range(x_start + 1, x_end - 3, size),
                x_end - 3,
                y_start,
                n_cells,
            )
        };
        ideal.extend(self.full_spine());
        ideal.extend(self.fill_rows.iter().copied());
        remove_duplicates(&ideal)
    }
}

fn arrived(previous: &[Cell], occupied: &HashSet<Cell>) -> bool {
    let correct = previous.iter().filter(|cell| occupied.contains(cell)).count();
    correct as f32 >= previous.len() as f32 * ARRIVAL_RATIO
}

impl Formation for GrowthFormation {
    fn kind(&self) -> FormationKind {
        FormationKind::Growth
    }

    fn update(&mut self, phase: u8) {
        self.phase = phase;
    }

    fn next_formation_points(&self, state: &AmoebaState) -> Vec<Cell> {
        let grid = &state.amoeba_map;
        let Some(extent) = current_extent(grid) else {
            return Vec::new();
        };
        let n_cells = grid.count();
        let occupied = grid.occupied_set();
        match self.phase {
            0 | 1 => self.gathering_points(extent, n_cells, &occupied),
            _ => self.spreading_points(extent, n_cells, &occupied),
        }
    }

    fn next_phase(
        &self,
        phase: u8,
        state: &AmoebaState,
        _retract: &[Cell],
        _moves: &[Cell],
    ) -> u8 {
        let grid = &state.amoeba_map;
        let phase = if phase <= 1 { 0 } else { phase };
        if phase == 0 {
            return if grid.count() > GROWTH_SPREAD_THRESHOLD { 2 } else { 0 };
        }

        let empty_run = current_extent(grid)
            .map(|extent| longest_empty_column_run(extent.x_start, extent.x_end, grid).len())
            .unwrap_or(0);
        if phase == 2 && empty_run >= SPREAD_COLUMN_RUN {
            return 3;
        }
        if phase == 3 && empty_run <= GATHER_COLUMN_RUN {
            return 2;
        }
        phase
    }
}
