use std::collections::HashSet;

use crate::constants::QUADRANT_STRIPE;
use crate::types::Cell;

pub fn quadrant_points(grid_size: i32) -> Vec<Cell> {
    let n = grid_size.max(4);
    let mut points = top_quadrant(n);
    points.extend(bottom_quadrant(n));
    points.extend(right_quadrant(n));
    points.extend(left_quadrant(n));
    points
}

fn top_quadrant(n: i32) -> Vec<Cell> {
    let c = n / 2;
    let mut out = Vec::new();
    for k in 0..=c {
        out.push((c - k, c - k));
        if c - 1 - k >= 0 {
            out.push((c - 1 - k, c - k));
        }
    }
    for k in 0..n - c - 1 {
        out.push((c + 1 + k, c - k));
        out.push((c + 1 + k, c - k - 1));
    }
    out.push((n - 1, 0));

    let (mut start_col, mut end_col) = (2, n - 2);
    for row in (0..c).step_by(QUADRANT_STRIPE) {
        out.extend((start_col..end_col).map(|col| (col, row)));
        start_col += 1;
        end_col -= 1;
    }
    out
}

fn bottom_quadrant(n: i32) -> Vec<Cell> {
    let c = n / 2;
    let steps = n - c - 1;
    let mut out = Vec::new();
    for k in 0..steps {
        out.push((c - 1 - k, c + 1 + k));
        if c - 2 - k >= 0 {
            out.push((c - 2 - k, c + 1 + k));
        }
    }
    for k in 0..steps {
        out.push((c + 1 + k, c + 1 + k));
        if k + 1 < steps {
            out.push((c + 2 + k, c + 1 + k));
        }
    }

    let mut seen: HashSet<Cell> = out.iter().copied().collect();
    let mut col = 1;
    for row in (c + 1..n).rev().step_by(QUADRANT_STRIPE) {
        col += 1;
        for x in col..n - col + 1 {
            if !seen.insert((x, row)) {
                break;
            }
            out.push((x, row));
        }
    }
    out
}

fn right_quadrant(n: i32) -> Vec<Cell> {
    let c = n / 2;
    vertical_stripes((c + 2..n).rev().step_by(QUADRANT_STRIPE), n)
}

fn left_quadrant(n: i32) -> Vec<Cell> {
    let c = n / 2;
    vertical_stripes((0..c - 1).step_by(QUADRANT_STRIPE), n)
}

fn vertical_stripes(cols: impl Iterator<Item = i32>, n: i32) -> Vec<Cell> {
    let (mut start_row, mut end_row) = (1, n - 1);
    let mut out = Vec::new();
    for col in cols {
        out.extend((start_row..end_row).map(|row| (col, row)));
        start_row += 1;
        end_row -= 1;
    }
    out
}
