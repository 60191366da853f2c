//! Test fixtures and seeded populations for Shoal development.
//!
//! - [`fixtures`]: hand-built grids and matrices for scenario tests.
//! - [`PopulationGen`]: deterministic random matrices, collections and
//!   migration matrices for property tests and benches.
//! - [`assert_cells_close`] / [`assert_matrices_close`]: approximate
//!   comparisons that report the offending cell.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::ops::Range;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use shoal_core::{AreaId, PopCell};
use shoal_matrix::{AgeBandMatrix, AgeBandMatrixCollection, BandedRow, MigrationMatrix};

pub use fixtures::{grid, matrix_from_counts, row_counts, single_age};

/// Seeded generator of population state.
///
/// The same seed always yields the same sequence of matrices.
pub struct PopulationGen {
    rng: ChaCha8Rng,
}

impl PopulationGen {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// A random cell with count in `counts` and weight in `0.1..5.0`.
    pub fn cell(&mut self, counts: Range<f64>) -> PopCell {
        PopCell::new(self.rng.random_range(counts), self.rng.random_range(0.1..5.0))
    }

    /// Matrix with every row spanning `0..bins`.
    pub fn matrix(&mut self, min_age: u32, ages: usize, bins: usize) -> AgeBandMatrix {
        let rows = (0..ages)
            .map(|_| BandedRow::from_cells(0, (0..bins).map(|_| self.cell(0.0..1e4)).collect()))
            .collect();
        AgeBandMatrix::from_rows(min_age, rows).expect("at least one age")
    }

    /// Matrix whose row windows drift upward with age, as growing fish do.
    pub fn ragged_matrix(&mut self, min_age: u32, ages: usize, bins: usize) -> AgeBandMatrix {
        let rows = (0..ages)
            .map(|_| {
                let start = self.rng.random_range(0..bins);
                let end = self.rng.random_range(start..=bins);
                BandedRow::from_cells(start, (start..end).map(|_| self.cell(0.0..1e4)).collect())
            })
            .collect();
        AgeBandMatrix::from_rows(min_age, rows).expect("at least one age")
    }

    /// Collection where each area holds a fresh random fill of `template`'s
    /// layout.
    pub fn collection(
        &mut self,
        areas: usize,
        template: &AgeBandMatrix,
    ) -> AgeBandMatrixCollection {
        let ids: Vec<AreaId> = (0..areas as u32).map(AreaId).collect();
        let mut c = AgeBandMatrixCollection::new(&ids, template).expect("at least one area");
        for (_, m) in c.iter_mut() {
            for age in m.ages() {
                let window = m.row(age).map(BandedRow::window).unwrap_or_default();
                for l in window {
                    let cell = self.cell(0.0..1e4);
                    m.set(age, l, cell);
                }
            }
        }
        c
    }

    /// Random migration matrix whose columns sum to one.
    pub fn conserving_migration(&mut self, size: usize) -> MigrationMatrix {
        let mut cols: Vec<Vec<f64>> = (0..size)
            .map(|_| (0..size).map(|_| self.rng.random_range(0.0..1.0)).collect())
            .collect();
        for col in &mut cols {
            let total: f64 = col.iter().sum();
            if total > 0.0 {
                col.iter_mut().for_each(|v| *v /= total);
            } else {
                col.iter_mut().for_each(|v| *v = 1.0 / size as f64);
            }
        }
        let rows = (0..size)
            .map(|target| cols.iter().map(|col| col[target]).collect())
            .collect();
        MigrationMatrix::from_rows(rows).expect("square and finite")
    }

    /// `len` ratios drawn from `range`.
    pub fn ratios(&mut self, len: usize, range: Range<f64>) -> Vec<f64> {
        (0..len).map(|_| self.rng.random_range(range.clone())).collect()
    }
}

/// Panics unless both fields of `a` and `b` agree within `tol` (relative to
/// the larger magnitude, with an absolute floor of `tol`).
#[track_caller]
pub fn assert_cells_close(a: PopCell, b: PopCell, tol: f64) {
    let close = |x: f64, y: f64| (x - y).abs() <= tol * x.abs().max(y.abs()).max(1.0);
    assert!(
        close(a.count, b.count) && close(a.weight, b.weight),
        "cells differ: {a:?} vs {b:?} (tol {tol})"
    );
}

/// Panics unless the matrices share a layout and every cell is close.
#[track_caller]
pub fn assert_matrices_close(a: &AgeBandMatrix, b: &AgeBandMatrix, tol: f64) {
    assert!(a.same_layout(b), "layouts differ");
    for age in a.ages() {
        for l in a.min_length(age)..a.max_length(age) {
            let (x, y) = (a.get(age, l), b.get(age, l));
            let close = |u: f64, v: f64| (u - v).abs() <= tol * u.abs().max(v.abs()).max(1.0);
            assert!(
                close(x.count, y.count) && close(x.weight, y.weight),
                "age {age}, length {l}: {x:?} vs {y:?} (tol {tol})"
            );
        }
    }
}
