//! A length-indexed row with its own window of stored bins.

use std::ops::Range;

use shoal_core::PopCell;

/// One age class of an [`AgeBandMatrix`](crate::AgeBandMatrix).
///
/// Only bins in `min_col()..max_col()` are stored. Reads outside the window
/// return [`PopCell::ZERO`]; writes outside it are ignored.
///
/// ```
/// use shoal_core::PopCell;
/// use shoal_matrix::BandedRow;
///
/// let mut row = BandedRow::new(2..5);
/// assert!(row.set(3, PopCell::new(7.0, 1.0)));
/// assert!(!row.set(6, PopCell::new(1.0, 1.0)));
/// assert_eq!(row.get(3).count, 7.0);
/// assert_eq!(row.get(0), PopCell::ZERO);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BandedRow {
    min_col: usize,
    cells: Vec<PopCell>,
}

impl BandedRow {
    /// Create a zeroed row covering `window`. A reversed window is empty.
    pub fn new(window: Range<usize>) -> Self {
        let len = window.end.saturating_sub(window.start);
        Self {
            min_col: window.start,
            cells: vec![PopCell::ZERO; len],
        }
    }

    /// Create a row whose first stored bin is `min_col`.
    pub fn from_cells(min_col: usize, cells: Vec<PopCell>) -> Self {
        Self { min_col, cells }
    }

    /// First stored length bin.
    pub fn min_col(&self) -> usize {
        self.min_col
    }

    /// One past the last stored length bin.
    pub fn max_col(&self) -> usize {
        self.min_col + self.cells.len()
    }

    /// The stored window as a range.
    pub fn window(&self) -> Range<usize> {
        self.min_col..self.max_col()
    }

    /// Number of stored bins.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the window is empty.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns `true` if `length` is inside the window.
    pub fn contains(&self, length: usize) -> bool {
        length >= self.min_col && length < self.max_col()
    }

    /// Cell at `length`, or zero outside the window.
    pub fn get(&self, length: usize) -> PopCell {
        length
            .checked_sub(self.min_col)
            .and_then(|i| self.cells.get(i))
            .copied()
            .unwrap_or(PopCell::ZERO)
    }

    /// Mutable cell at `length`, or `None` outside the window.
    pub fn get_mut(&mut self, length: usize) -> Option<&mut PopCell> {
        let i = length.checked_sub(self.min_col)?;
        self.cells.get_mut(i)
    }

    /// Overwrite the cell at `length`. Returns `false` (and does nothing)
    /// outside the window.
    pub fn set(&mut self, length: usize, cell: PopCell) -> bool {
        match self.get_mut(length) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Stored cells, starting at `min_col()`.
    pub fn cells(&self) -> &[PopCell] {
        &self.cells
    }

    /// Mutable stored cells, starting at `min_col()`.
    pub fn cells_mut(&mut self) -> &mut [PopCell] {
        &mut self.cells
    }

    /// Iterate over `(length, cell)` for every stored bin.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &PopCell)> + '_ {
        let min = self.min_col;
        self.cells.iter().enumerate().map(move |(i, c)| (min + i, c))
    }

    /// Iterate mutably over `(length, cell)` for every stored bin.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut PopCell)> + '_ {
        let min = self.min_col;
        self.cells.iter_mut().enumerate().map(move |(i, c)| (min + i, c))
    }

    /// Bins stored in both rows. May be empty (`start >= end`).
    pub fn overlap(&self, other: &BandedRow) -> Range<usize> {
        self.min_col.max(other.min_col)..self.max_col().min(other.max_col())
    }

    /// Zero every stored cell.
    pub fn set_to_zero(&mut self) {
        self.cells.fill(PopCell::ZERO);
    }

    /// Total count over the window.
    pub fn total_count(&self) -> f64 {
        self.cells.iter().map(|c| c.count).sum()
    }

    /// Narrow the window to `window`, dropping cells outside it.
    ///
    /// Returns `false` and leaves the row untouched if `window` is reversed
    /// or reaches outside the current window.
    pub fn shrink_window(&mut self, window: Range<usize>) -> bool {
        if window.start > window.end || window.start < self.min_col || window.end > self.max_col()
        {
            return false;
        }
        let from = window.start - self.min_col;
        self.cells.truncate(window.end - self.min_col);
        self.cells.drain(..from);
        self.min_col = window.start;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(min: usize, counts: &[f64]) -> BandedRow {
        BandedRow::from_cells(min, counts.iter().map(|&n| PopCell::new(n, 1.0)).collect())
    }

    #[test]
    fn window_bounds() {
        let r = row(3, &[1.0, 2.0, 3.0]);
        assert_eq!(r.window(), 3..6);
        assert!(r.contains(3));
        assert!(r.contains(5));
        assert!(!r.contains(6));
        assert!(!r.contains(2));
    }

    #[test]
    fn reads_outside_window_are_zero() {
        let r = row(3, &[1.0, 2.0, 3.0]);
        assert_eq!(r.get(0), PopCell::ZERO);
        assert_eq!(r.get(6), PopCell::ZERO);
        assert_eq!(r.get(4).count, 2.0);
    }

    #[test]
    fn writes_outside_window_are_ignored() {
        let mut r = row(3, &[1.0, 2.0, 3.0]);
        assert!(!r.set(1, PopCell::new(9.0, 9.0)));
        assert!(r.get_mut(10).is_none());
        assert_eq!(r.total_count(), 6.0);
    }

    #[test]
    fn overlap_of_offset_rows() {
        let a = row(0, &[1.0; 5]);
        let b = row(3, &[1.0; 4]);
        assert_eq!(a.overlap(&b), 3..5);
        let c = row(6, &[1.0]);
        assert!(a.overlap(&c).is_empty());
    }

    #[test]
    fn shrink_drops_edges() {
        let mut r = row(2, &[1.0, 2.0, 3.0, 4.0]);
        assert!(r.shrink_window(3..5));
        assert_eq!(r.window(), 3..5);
        assert_eq!(r.get(3).count, 2.0);
        assert_eq!(r.get(4).count, 3.0);
        assert_eq!(r.get(2), PopCell::ZERO);
    }

    #[test]
    fn shrink_refuses_growth() {
        let mut r = row(2, &[1.0, 2.0]);
        assert!(!r.shrink_window(1..4));
        assert!(!r.shrink_window(3..2));
        assert_eq!(r.window(), 2..4);
    }

    #[test]
    fn iter_reports_absolute_lengths() {
        let r = row(4, &[5.0, 6.0]);
        let lengths: Vec<usize> = r.iter().map(|(l, _)| l).collect();
        assert_eq!(lengths, vec![4, 5]);
    }
}
