//! Hand-built grids and matrices.

use shoal_core::PopCell;
use shoal_length::LengthGroupDivision;
use shoal_matrix::{AgeBandMatrix, BandedRow};

/// Evenly spaced grid. Panics on invalid input.
pub fn grid(min: f64, max: f64, dl: f64) -> LengthGroupDivision {
    LengthGroupDivision::new(min, max, dl)
        .unwrap_or_else(|e| panic!("bad test grid {min}..{max} by {dl}: {e}"))
}

/// Matrix from `(min_col, counts)` per age, every cell weighing `weight`.
pub fn matrix_from_counts(min_age: u32, rows: &[(usize, &[f64])], weight: f64) -> AgeBandMatrix {
    let rows = rows
        .iter()
        .map(|(min, counts)| {
            BandedRow::from_cells(*min, counts.iter().map(|&n| PopCell::new(n, weight)).collect())
        })
        .collect();
    AgeBandMatrix::from_rows(min_age, rows).expect("at least one age")
}

/// One-age matrix over `0..counts.len()`.
pub fn single_age(age: u32, counts: &[f64]) -> AgeBandMatrix {
    matrix_from_counts(age, &[(0, counts)], 1.0)
}

/// Counts of `age` over its window.
pub fn row_counts(m: &AgeBandMatrix, age: u32) -> Vec<f64> {
    m.row(age)
        .map(|r| r.cells().iter().map(|c| c.count).collect())
        .unwrap_or_default()
}
