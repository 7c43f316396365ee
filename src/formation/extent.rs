use crate::constants::{max_chunks, CHUNK_CELLS, CHUNK_HEIGHT, SOLID_COLUMN_RATIO};
use crate::grid::{wrapped_range, Grid};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extent {
    pub x_start: i32,
    pub x_end: i32,
    pub y_start: i32,
    pub y_end: i32,
}

pub fn current_extent(grid: &Grid) -> Option<Extent> {
    let size = grid.size();
    let counts = grid.column_counts();
    let max_count = counts.iter().copied().max().unwrap_or(0);
    if max_count == 0 {
        return None;
    }
    let cutoff = max_count as f32 * SOLID_COLUMN_RATIO;
    let is_solid = |x: i32| counts[x as usize] as f32 >= cutoff;

    let xs: Vec<i32> = (0..size).filter(|&x| counts[x as usize] > 0).collect();
    let ys: Vec<i32> = (0..size)
        .filter(|&y| (0..size).any(|x| grid.get((x, y))))
        .collect();

    let span_x = contiguous_span(&xs, size);
    let solid_x: Vec<i32> = match (
        span_x.iter().position(|&x| is_solid(x)),
        span_x.iter().rposition(|&x| is_solid(x)),
    ) {
        (Some(first), Some(last)) => span_x[first..=last].to_vec(),
        _ => span_x,
    };
    let span_y = contiguous_span(&ys, size);

    Some(Extent {
        x_start: *solid_x.first()?,
        x_end: (*solid_x.last()? + 1).rem_euclid(size),
        y_start: *span_y.first()?,
        y_end: *span_y.last()?,
    })
}

/// First run of consecutive values in `sorted`. When the run starts at zero
/// and the values also reach `size - 1`, the run ending at the seam is
/// prepended, since both halves belong to the same wrapped span.
fn contiguous_span(sorted: &[i32], size: i32) -> Vec<i32> {
    let Some(&first) = sorted.first() else {
        return Vec::new();
    };
    let mut run = Vec::new();
    let mut expected = first;
    let mut gap_at = None;
    for (idx, &value) in sorted.iter().enumerate() {
        if value != expected {
            gap_at = Some(idx);
            break;
        }
        run.push(value);
        expected += 1;
    }

    let Some(gap_at) = gap_at else {
        return run;
    };
    if first != 0 || sorted.last() != Some(&(size - 1)) {
        return run;
    }
    let mut tail_start = sorted.len() - 1;
    while tail_start > gap_at && sorted[tail_start - 1] == sorted[tail_start] - 1 {
        tail_start -= 1;
    }
    let mut wrapped = sorted[tail_start..].to_vec();
    wrapped.extend(run);
    wrapped
}

pub fn longest_empty_column_run(start: i32, end: i32, grid: &Grid) -> Vec<i32> {
    let size = grid.size();
    let n_cells = grid.count();
    let chunks = (n_cells / CHUNK_CELLS).min(max_chunks(size));
    let expected_len = (CHUNK_HEIGHT as usize * chunks) % size as usize;
    let threshold = 3.0 * expected_len as f32 / 4.0;

    let empty_cols: Vec<i32> = wrapped_range(start, end + 1, size)
        .into_iter()
        .filter(|&x| grid.column_count(x) as f32 <= threshold)
        .collect();
    if empty_cols.is_empty() {
        return Vec::new();
    }

    let mut runs = vec![1usize; empty_cols.len()];
    for i in 1..empty_cols.len() {
        if empty_cols[i] == (empty_cols[i - 1] + 1).rem_euclid(size) {
            runs[i] = runs[i - 1] + 1;
        }
    }

    let longest = runs.iter().copied().max().unwrap_or(0);
    if longest <= 1 {
        return Vec::new();
    }
    let Some(end_idx) = runs.iter().position(|&run| run == longest) else {
        return Vec::new();
    };
    empty_cols[end_idx + 1 - longest..=end_idx].to_vec()
}
