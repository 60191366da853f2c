//! The age-band matrix and its in-place algebra.
//!
//! Every operation here is total over the current row windows. Problems
//! with the inputs (wrong vector lengths, negative ratios, empty conversion
//! bins) are reported to the supplied [`Diagnostics`] sink and the operation
//! carries on with a neutral value.

use std::ops::{Range, RangeInclusive};

use shoal_core::{is_zero, Diagnostics, PopCell, Warning, VERY_SMALL};
use shoal_length::{ConversionIndex, Regime};

use crate::error::ConfigError;
use crate::row::BandedRow;

/// Population of one stock in one area, by age class and length bin.
///
/// Rows are indexed by age from [`min_age`](Self::min_age) to
/// [`max_age`](Self::max_age). The number of rows and the minimum age are
/// fixed at construction; each row keeps its own window of length bins.
///
/// # Examples
///
/// ```
/// use shoal_core::PopCell;
/// use shoal_matrix::AgeBandMatrix;
///
/// let mut m = AgeBandMatrix::new(0, &[0..3, 0..3]).unwrap();
/// for l in 0..3 {
///     m.set(0, l, PopCell::new(1.0 + l as f64, 1.0));
///     m.set(1, l, PopCell::new(4.0 + l as f64, 1.0));
/// }
/// m.increment_age();
/// assert_eq!(m.get(1, 2).count, 9.0);
/// assert_eq!(m.get(0, 2), PopCell::ZERO);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AgeBandMatrix {
    min_age: u32,
    rows: Vec<BandedRow>,
}

impl AgeBandMatrix {
    /// Create a zeroed matrix with one row per window, starting at `min_age`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoAgeRows`] for an empty window list,
    /// [`ConfigError::InvalidWindow`] for a reversed window, and
    /// [`ConfigError::InvalidAgeRange`] if the age range overflows `u32`.
    pub fn new(min_age: u32, windows: &[Range<usize>]) -> Result<Self, ConfigError> {
        check_age_range(min_age, windows.len())?;
        let rows = windows
            .iter()
            .enumerate()
            .map(|(i, w)| {
                if w.start > w.end {
                    Err(ConfigError::InvalidWindow {
                        age: min_age + i as u32,
                        start: w.start,
                        end: w.end,
                    })
                } else {
                    Ok(BandedRow::new(w.clone()))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { min_age, rows })
    }

    /// Create a matrix from explicit rows, the first holding `min_age`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoAgeRows`] for an empty row list and
    /// [`ConfigError::InvalidAgeRange`] if the age range overflows `u32`.
    pub fn from_rows(min_age: u32, rows: Vec<BandedRow>) -> Result<Self, ConfigError> {
        check_age_range(min_age, rows.len())?;
        Ok(Self { min_age, rows })
    }

    // ── Accessors ──────────────────────────────────────────────────

    /// Youngest age class.
    pub fn min_age(&self) -> u32 {
        self.min_age
    }

    /// Oldest age class (the plus group).
    pub fn max_age(&self) -> u32 {
        self.min_age + self.rows.len() as u32 - 1
    }

    /// Number of age rows.
    pub fn age_count(&self) -> usize {
        self.rows.len()
    }

    /// Ages held by the matrix.
    pub fn ages(&self) -> RangeInclusive<u32> {
        self.min_age..=self.max_age()
    }

    fn index(&self, age: u32) -> Option<usize> {
        let i = age.checked_sub(self.min_age)? as usize;
        (i < self.rows.len()).then_some(i)
    }

    /// Row for `age`, if the matrix holds it.
    pub fn row(&self, age: u32) -> Option<&BandedRow> {
        self.index(age).map(|i| &self.rows[i])
    }

    /// Mutable row for `age`, if the matrix holds it.
    pub fn row_mut(&mut self, age: u32) -> Option<&mut BandedRow> {
        let i = self.index(age)?;
        Some(&mut self.rows[i])
    }

    /// All rows, youngest first.
    pub fn rows(&self) -> &[BandedRow] {
        &self.rows
    }

    /// First stored length bin for `age`; 0 for an age outside the matrix.
    pub fn min_length(&self, age: u32) -> usize {
        self.row(age).map_or(0, BandedRow::min_col)
    }

    /// One past the last stored length bin for `age`; 0 for an age outside
    /// the matrix.
    pub fn max_length(&self, age: u32) -> usize {
        self.row(age).map_or(0, BandedRow::max_col)
    }

    /// Cell at `(age, length)`, zero when outside the matrix.
    pub fn get(&self, age: u32, length: usize) -> PopCell {
        self.row(age).map_or(PopCell::ZERO, |r| r.get(length))
    }

    /// Mutable cell at `(age, length)`, `None` when outside the matrix.
    pub fn get_mut(&mut self, age: u32, length: usize) -> Option<&mut PopCell> {
        self.row_mut(age)?.get_mut(length)
    }

    /// Overwrite the cell at `(age, length)`. Returns `false` when outside.
    pub fn set(&mut self, age: u32, length: usize, cell: PopCell) -> bool {
        self.row_mut(age).is_some_and(|r| r.set(length, cell))
    }

    /// One past the largest stored length bin over all rows.
    pub fn width(&self) -> usize {
        self.rows.iter().map(BandedRow::max_col).max().unwrap_or(0)
    }

    /// Returns `true` if both matrices have the same ages and row windows.
    pub fn same_layout(&self, other: &AgeBandMatrix) -> bool {
        self.min_age == other.min_age
            && self.rows.len() == other.rows.len()
            && self
                .rows
                .iter()
                .zip(&other.rows)
                .all(|(a, b)| a.window() == b.window())
    }

    // ── Algebra ────────────────────────────────────────────────────

    /// Add `ratio * other` into `self` for every age in `ages` held by both.
    ///
    /// `ci` converts from `other`'s length grid (source) to `self`'s
    /// (target):
    ///
    /// - same spacing: cells are added across the index offset;
    /// - finer target: each target bin takes its covering source cell divided
    ///   evenly over the target bins sharing it;
    /// - coarser target: source cells are summed into the target bin holding
    ///   them. Only source bins between the first and last that overlap this
    ///   row's window are read.
    pub fn add(
        &mut self,
        other: &AgeBandMatrix,
        ci: &ConversionIndex,
        ratio: f64,
        ages: RangeInclusive<u32>,
        diag: &dyn Diagnostics,
    ) {
        let lo = self.min_age.max(other.min_age).max(*ages.start());
        let hi = self.max_age().min(other.max_age()).min(*ages.end());
        if lo > hi {
            return;
        }
        for age in lo..=hi {
            let target = &mut self.rows[(age - self.min_age) as usize];
            let source = &other.rows[(age - other.min_age) as usize];
            match ci.regime() {
                Regime::SameSpacing { offset } => add_shifted(target, source, offset, ratio),
                Regime::TargetFiner => add_split(target, source, ci, ratio, age, diag),
                Regime::TargetCoarser => add_pooled(target, source, ci, ratio),
            }
        }
    }

    /// Scale the count of every cell by a length-indexed ratio.
    ///
    /// The matrix lives on `ci`'s source grid and `ratio` on its target grid.
    /// Ratios that are numerically zero become exactly zero; negative ratios
    /// are reported and treated as zero. Mean weights never change.
    ///
    /// When the ratio grid is finer than the matrix grid no split is made:
    /// each matrix bin takes the ratio of the first finer bin it holds, and
    /// [`Warning::TargetFinerInMultiply`] is reported.
    pub fn multiply(&mut self, ratio: &[f64], ci: &ConversionIndex, diag: &dyn Diagnostics) {
        if ratio.len() != ci.target_len() {
            diag.warn(Warning::RatioLengthMismatch {
                expected: ci.target_len(),
                actual: ratio.len(),
            });
        }
        let ratio = sanitize(ratio, diag);
        let finer = ci.target_is_finer();
        if finer {
            diag.warn(Warning::TargetFinerInMultiply);
        }

        let factors: Vec<Option<f64>> = (0..ci.source_len())
            .map(|s| {
                let t = if finer {
                    ci.min_overlap(s).filter(|&t| ci.map_index(t) == Some(s))
                } else {
                    ci.source_to_target(s)
                };
                t.and_then(|t| ratio.get(t).copied())
            })
            .collect();

        for row in &mut self.rows {
            for (l, cell) in row.iter_mut() {
                if let Some(Some(r)) = factors.get(l) {
                    *cell *= *r;
                }
            }
        }
    }

    /// Scale the count of every cell in age row `i` by `ratio[i]`.
    ///
    /// A vector of the wrong length is reported; rows without a matching
    /// entry are left alone.
    pub fn multiply_by_age(&mut self, ratio: &[f64], diag: &dyn Diagnostics) {
        if ratio.len() != self.rows.len() {
            diag.warn(Warning::AgeRatioLengthMismatch {
                expected: self.rows.len(),
                actual: ratio.len(),
            });
        }
        for (row, &r) in self.rows.iter_mut().zip(ratio) {
            for cell in row.cells_mut() {
                *cell *= r;
            }
        }
    }

    /// Remove `consumption` from the population, bin by bin.
    ///
    /// `prior` holds the counts the consumption was computed from. Each
    /// length bin survives with ratio `1 - consumption / prior` when the
    /// prior count is above [`VERY_SMALL`], otherwise nothing is removed.
    /// The ratios are then applied with [`multiply`](Self::multiply), which
    /// clamps over-consumption to zero.
    pub fn subtract(
        &mut self,
        consumption: &[f64],
        ci: &ConversionIndex,
        prior: &[PopCell],
        diag: &dyn Diagnostics,
    ) {
        if consumption.len() != prior.len() {
            diag.warn(Warning::ConsumptionLengthMismatch {
                consumption: consumption.len(),
                prior: prior.len(),
            });
        }
        let ratio: Vec<f64> = consumption
            .iter()
            .enumerate()
            .map(|(l, &eaten)| match prior.get(l) {
                Some(p) if p.count > VERY_SMALL => 1.0 - eaten / p.count,
                _ => 1.0,
            })
            .collect();
        self.multiply(&ratio, ci, diag);
    }

    /// Accumulate every row into the length-indexed `out`.
    ///
    /// Cells are combined with [`PopCell`] accumulation, so counts add and
    /// weights average. Bins past the end of `out` are reported and skipped.
    pub fn sum_columns(&self, out: &mut [PopCell], diag: &dyn Diagnostics) {
        let needed = self.width();
        if out.len() < needed {
            diag.warn(Warning::ColumnSumLengthMismatch {
                needed,
                actual: out.len(),
            });
        }
        for row in &self.rows {
            for (l, cell) in row.iter() {
                if let Some(slot) = out.get_mut(l) {
                    *slot += *cell;
                }
            }
        }
    }

    /// Column sums over a fresh vector spanning [`width`](Self::width).
    pub fn column_sums(&self) -> Vec<PopCell> {
        let mut out = vec![PopCell::ZERO; self.width()];
        for row in &self.rows {
            for (l, cell) in row.iter() {
                out[l] += *cell;
            }
        }
        out
    }

    /// Move every age class up by one.
    ///
    /// The plus group absorbs the row below it over their common window.
    /// Every other row is replaced by the row below it over their common
    /// window and zeroed elsewhere. Lengths outside a common window are
    /// dropped. The youngest row ends up empty.
    pub fn increment_age(&mut self) {
        let n = self.rows.len();
        if n <= 1 {
            return;
        }

        let (lower, upper) = self.rows.split_at_mut(n - 1);
        let top = &mut upper[0];
        let below = &lower[n - 2];
        for l in top.overlap(below) {
            if let Some(cell) = top.get_mut(l) {
                *cell += below.get(l);
            }
        }

        for i in (1..n - 1).rev() {
            let (lower, upper) = self.rows.split_at_mut(i);
            let dst = &mut upper[0];
            let src = &lower[i - 1];
            let common = dst.overlap(src);
            for (l, cell) in dst.iter_mut() {
                *cell = if common.contains(&l) {
                    src.get(l)
                } else {
                    PopCell::ZERO
                };
            }
        }

        self.rows[0].set_to_zero();
    }

    /// Zero every stored cell.
    pub fn set_to_zero(&mut self) {
        for row in &mut self.rows {
            row.set_to_zero();
        }
    }

    /// Zero every cell whose count is below `min_count`.
    pub fn filter_counts(&mut self, min_count: f64) {
        for row in &mut self.rows {
            for cell in row.cells_mut() {
                if cell.count < min_count {
                    cell.clear();
                }
            }
        }
    }

    // ── Views ──────────────────────────────────────────────────────

    /// Counts per age, zero-filled from bin 0 to [`width`](Self::width).
    pub fn dense_counts(&self) -> Vec<Vec<f64>> {
        self.dense(|c| c.count)
    }

    /// Mean weights per age, zero-filled from bin 0 to [`width`](Self::width).
    pub fn dense_weights(&self) -> Vec<Vec<f64>> {
        self.dense(|c| c.weight)
    }

    fn dense(&self, field: impl Fn(&PopCell) -> f64) -> Vec<Vec<f64>> {
        let width = self.width();
        self.rows
            .iter()
            .map(|row| (0..width).map(|l| field(&row.get(l))).collect())
            .collect()
    }

    /// Sum of counts over every stored cell.
    pub fn total_count(&self) -> f64 {
        self.rows.iter().map(BandedRow::total_count).sum()
    }

    /// Sum of `count * weight` over every stored cell.
    pub fn total_biomass(&self) -> f64 {
        self.rows
            .iter()
            .flat_map(|r| r.cells())
            .map(PopCell::biomass)
            .sum()
    }
}

fn check_age_range(min_age: u32, rows: usize) -> Result<(), ConfigError> {
    if rows == 0 {
        return Err(ConfigError::NoAgeRows);
    }
    let span = u32::try_from(rows - 1).ok();
    match span.and_then(|s| min_age.checked_add(s)) {
        Some(_) => Ok(()),
        None => Err(ConfigError::InvalidAgeRange {
            min_age,
            max_age: u32::MAX,
        }),
    }
}

fn sanitize(ratio: &[f64], diag: &dyn Diagnostics) -> Vec<f64> {
    ratio
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            if is_zero(value) {
                0.0
            } else if value < 0.0 {
                diag.warn(Warning::NegativeRatio { index, value });
                0.0
            } else {
                value
            }
        })
        .collect()
}

// ── Add by regime ──────────────────────────────────────────────────

fn add_shifted(target: &mut BandedRow, source: &BandedRow, offset: isize, ratio: f64) {
    for (s, cell) in source.iter() {
        let Some(t) = s.checked_add_signed(offset) else {
            continue;
        };
        if let Some(slot) = target.get_mut(t) {
            *slot += *cell * ratio;
        }
    }
}

fn add_split(
    target: &mut BandedRow,
    source: &BandedRow,
    ci: &ConversionIndex,
    ratio: f64,
    age: u32,
    diag: &dyn Diagnostics,
) {
    let fine = ci.fine_range();
    let lo = target.min_col().max(fine.start);
    let hi = target.max_col().min(fine.end);
    let bins = (lo..hi).map(|t| (t, ci.map_index(t), ci.bin_count(t)));
    split_bins(target, source, bins, ratio, age, diag);
}

/// Spread source cells over `(target bin, source bin, sharing bins)` triples.
fn split_bins(
    target: &mut BandedRow,
    source: &BandedRow,
    bins: impl Iterator<Item = (usize, Option<usize>, usize)>,
    ratio: f64,
    age: u32,
    diag: &dyn Diagnostics,
) {
    for (t, s, nrof) in bins {
        // Only a non-contiguous fine range leaves a mapped bin unshared.
        if nrof == 0 {
            diag.warn(Warning::ZeroBinCount { age, length: t });
            continue;
        }
        let Some(s) = s else { continue };
        if !source.contains(s) {
            continue;
        }
        let share = source.get(s) * (ratio / nrof as f64);
        if let Some(slot) = target.get_mut(t) {
            *slot += share;
        }
    }
}

fn add_pooled(target: &mut BandedRow, source: &BandedRow, ci: &ConversionIndex, ratio: f64) {
    if target.is_empty() {
        return;
    }
    let first = ci.min_overlap(target.min_col());
    let last = ci.max_overlap(target.max_col() - 1);
    let (Some(first), Some(last)) = (first, last) else {
        return;
    };
    let lo = first.max(source.min_col());
    let hi = (last + 1).min(source.max_col());
    if lo >= hi {
        return;
    }
    let inside = |s: usize| ci.map_index(s).is_some_and(|t| target.contains(t));
    if !(inside(lo) && inside(hi - 1)) {
        return;
    }
    for s in lo..hi {
        let Some(t) = ci.map_index(s) else { continue };
        let cell = source.get(s) * ratio;
        if let Some(slot) = target.get_mut(t) {
            *slot += cell;
        }
    }
}
