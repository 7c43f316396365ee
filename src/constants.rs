pub const DEFAULT_GRID_SIZE: i32 = 100;
pub const MIN_GRID_SIZE: i32 = 8;
pub const MAX_GRID_SIZE: i32 = 4096;

pub const BACTERIA_RATIO: f32 = 0.001;
pub const DENSITY_COUNTER_MAX: u8 = 7;
pub const PHASE_COUNT: u8 = 4;

pub const ARRIVAL_RATIO: f32 = 0.99;

pub const GROWTH_SPREAD_THRESHOLD: usize = 466 + 6;
pub const SPREAD_COLUMN_RUN: usize = 90;
pub const GATHER_COLUMN_RUN: usize = 6;
pub const SOLID_COLUMN_RATIO: f32 = 0.9;

pub const CHUNK_CELLS: usize = 7;
pub const CHUNK_HEIGHT: i32 = 3;
pub const TOOTH_GAP: i32 = 8;

pub const QUADRANT_STRIPE: usize = 8;

pub const REORGANIZE_TURNS: u8 = 10;
pub const REORGANIZE_MIN_PER_COLUMN: usize = 2;
pub const FORWARD_MIN_PER_COLUMN: usize = 1;

pub fn max_chunks(grid_size: i32) -> usize {
    (grid_size / CHUNK_HEIGHT).max(1) as usize
}

pub fn spine_row(grid_size: i32) -> i32 {
    grid_size / 2
}

pub fn n_cells_can_move(metabolism: f32, current_size: usize) -> usize {
    if metabolism <= 0.0 {
        return 0;
    }
    (metabolism as f64 * current_size as f64).floor() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_floors_metabolism_fraction() {
        assert_eq!(n_cells_can_move(0.5, 100), 50);
        assert_eq!(n_cells_can_move(0.3, 25), 7);
        assert_eq!(n_cells_can_move(1.0, 9), 9);
        assert_eq!(n_cells_can_move(0.0, 9), 0);
    }

    #[test]
    fn chunk_limits_follow_grid_size() {
        assert_eq!(max_chunks(DEFAULT_GRID_SIZE), 33);
        assert_eq!(spine_row(DEFAULT_GRID_SIZE), 50);
        assert_eq!(max_chunks(9), 3);
    }
}
