//! Ordered, contiguous partitions of the length axis.

use shoal_core::{is_zero, Diagnostics, LengthEdge, Warning};

use crate::error::LengthError;

/// Relative tolerance for comparing bin edges computed by different routes.
const EDGE_TOLERANCE: f64 = 1e-8;

/// Returns `true` if two lengths name the same edge.
pub(crate) fn same_edge(a: f64, b: f64) -> bool {
    (a - b).abs() <= EDGE_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

/// An immutable partition of `[min_length, max_length)` into bins.
///
/// Bin `i` covers `[bin_min(i), bin_max(i))`. Bins are contiguous,
/// non-overlapping and strictly increasing.
///
/// # Examples
///
/// ```
/// use shoal_length::LengthGroupDivision;
///
/// let lengths = LengthGroupDivision::new(10.0, 20.0, 2.5).unwrap();
/// assert_eq!(lengths.len(), 4);
/// assert_eq!(lengths.dl(), Some(2.5));
/// assert_eq!(lengths.bin_of(12.5), Some(1));
/// assert_eq!(lengths.bin_of(20.0), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LengthGroupDivision {
    boundaries: Vec<f64>,
    dl: Option<f64>,
}

impl LengthGroupDivision {
    /// Build an evenly spaced division from `min` to `max` in steps of `dl`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any input is not finite, `dl <= 0`, `min >= max`, or
    /// the range is not a whole number of `dl`-wide bins.
    pub fn new(min: f64, max: f64, dl: f64) -> Result<Self, LengthError> {
        for (name, value) in [("min", min), ("max", max), ("dl", dl)] {
            if !value.is_finite() {
                return Err(LengthError::NonFinite { name, value });
            }
        }
        if dl <= 0.0 {
            return Err(LengthError::NonPositiveWidth { dl });
        }
        if min >= max {
            return Err(LengthError::EmptyRange { min, max });
        }
        let exact = (max - min) / dl;
        let bins = exact.round();
        if bins < 1.0 || !same_edge(exact, bins) {
            return Err(LengthError::NonIntegralBins { min, max, dl });
        }
        let bins = bins as usize;
        let mut boundaries: Vec<f64> = (0..=bins).map(|i| min + i as f64 * dl).collect();
        boundaries[bins] = max;
        Ok(Self {
            boundaries,
            dl: Some(dl),
        })
    }

    /// Build a division from explicit bin edges.
    ///
    /// `boundaries[i]` and `boundaries[i + 1]` bound bin `i`. If every bin
    /// has the same width the division reports it through [`dl`](Self::dl).
    ///
    /// # Errors
    ///
    /// Returns `Err` if fewer than two edges are given, an edge is not
    /// finite, or the edges are not strictly increasing.
    pub fn from_boundaries(boundaries: Vec<f64>) -> Result<Self, LengthError> {
        if boundaries.len() < 2 {
            return Err(LengthError::TooFewBoundaries {
                count: boundaries.len(),
            });
        }
        for &value in &boundaries {
            if !value.is_finite() {
                return Err(LengthError::NonFinite {
                    name: "boundary",
                    value,
                });
            }
        }
        for (index, pair) in boundaries.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(LengthError::NotIncreasing {
                    index: index + 1,
                    previous: pair[0],
                    value: pair[1],
                });
            }
        }
        let first = boundaries[1] - boundaries[0];
        let uniform = boundaries
            .windows(2)
            .all(|pair| same_edge(pair[1] - pair[0], first));
        Ok(Self {
            dl: uniform.then_some(first),
            boundaries,
        })
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Always returns `false`; construction rejects empty divisions.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Common bin width, or `None` if bins differ in width.
    pub fn dl(&self) -> Option<f64> {
        self.dl
    }

    /// Lower edge of the whole division.
    pub fn min_length(&self) -> f64 {
        self.boundaries[0]
    }

    /// Upper edge of the whole division.
    pub fn max_length(&self) -> f64 {
        self.boundaries[self.boundaries.len() - 1]
    }

    /// Lower edge of bin `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    pub fn bin_min(&self, i: usize) -> f64 {
        assert!(i < self.len(), "length group {i} out of range");
        self.boundaries[i]
    }

    /// Upper edge of bin `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    pub fn bin_max(&self, i: usize) -> f64 {
        assert!(i < self.len(), "length group {i} out of range");
        self.boundaries[i + 1]
    }

    /// Midpoint of bin `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    pub fn bin_mean(&self, i: usize) -> f64 {
        0.5 * (self.bin_min(i) + self.bin_max(i))
    }

    /// Index of the bin holding length `x`, or `None` outside the division.
    pub fn bin_of(&self, x: f64) -> Option<usize> {
        if !(x >= self.min_length() && x < self.max_length()) {
            return None;
        }
        // First edge strictly above x closes the bin.
        let above = self.boundaries.partition_point(|&b| b <= x);
        Some(above - 1)
    }

    /// All bin edges, `len() + 1` values.
    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    /// Iterate over `(min, max)` pairs of every bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.boundaries.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Returns `true` if `x` coincides with one of the bin edges.
    pub fn has_edge(&self, x: f64) -> bool {
        let i = self.boundaries.partition_point(|&b| b < x);
        let hit = |j: usize| self.boundaries.get(j).is_some_and(|&b| same_edge(b, x));
        hit(i) || (i > 0 && hit(i - 1))
    }
}

/// Check that `fine` refines `coarse`, reporting problems to `diag`.
///
/// Used when a subsystem (growth, consumption) keeps its own length grid
/// next to the stock grid. Reports [`Warning::NotFiner`] when an interior
/// edge of `coarse` inside the span of `fine` is not an edge of `fine`, and
/// [`Warning::LengthBoundsMismatch`] for each end where the two grids start
/// or stop at different lengths. Returns `true` if `fine` refines `coarse`.
pub fn check_finer(
    coarse: &LengthGroupDivision,
    fine: &LengthGroupDivision,
    diag: &dyn Diagnostics,
) -> bool {
    let span = fine.min_length()..fine.max_length();
    let refines = coarse
        .boundaries()
        .iter()
        .filter(|&&b| span.contains(&b))
        .all(|&b| fine.has_edge(b))
        && fine.len() >= coarse.len();
    if !refines {
        diag.warn(Warning::NotFiner {
            coarse_bins: coarse.len(),
            fine_bins: fine.len(),
        });
    }
    if !is_zero(coarse.min_length() - fine.min_length()) {
        diag.warn(Warning::LengthBoundsMismatch {
            edge: LengthEdge::Minimum,
            coarse: coarse.min_length(),
            fine: fine.min_length(),
        });
    }
    if !is_zero(coarse.max_length() - fine.max_length()) {
        diag.warn(Warning::LengthBoundsMismatch {
            edge: LengthEdge::Maximum,
            coarse: coarse.max_length(),
            fine: fine.max_length(),
        });
    }
    refines
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use shoal_core::RecordingDiagnostics;

    #[test]
    fn uniform_construction() {
        let d = LengthGroupDivision::new(5.0, 50.0, 5.0).unwrap();
        assert_eq!(d.len(), 9);
        assert_eq!(d.min_length(), 5.0);
        assert_eq!(d.max_length(), 50.0);
        assert_eq!(d.bin_min(2), 15.0);
        assert_eq!(d.bin_max(2), 20.0);
        assert_relative_eq!(d.bin_mean(2), 17.5);
    }

    #[test]
    fn fractional_width_is_accepted() {
        let d = LengthGroupDivision::new(0.0, 3.0, 0.1).unwrap();
        assert_eq!(d.len(), 30);
        assert_eq!(d.max_length(), 3.0);
    }

    #[test]
    fn rejects_bad_widths() {
        assert!(matches!(
            LengthGroupDivision::new(0.0, 10.0, 0.0),
            Err(LengthError::NonPositiveWidth { .. })
        ));
        assert!(matches!(
            LengthGroupDivision::new(0.0, 10.0, -1.0),
            Err(LengthError::NonPositiveWidth { .. })
        ));
        assert!(matches!(
            LengthGroupDivision::new(0.0, 10.0, 3.0),
            Err(LengthError::NonIntegralBins { .. })
        ));
        assert!(matches!(
            LengthGroupDivision::new(10.0, 10.0, 1.0),
            Err(LengthError::EmptyRange { .. })
        ));
        assert!(matches!(
            LengthGroupDivision::new(f64::NAN, 10.0, 1.0),
            Err(LengthError::NonFinite { name: "min", .. })
        ));
    }

    #[test]
    fn rejects_bad_boundaries() {
        assert!(matches!(
            LengthGroupDivision::from_boundaries(vec![1.0]),
            Err(LengthError::TooFewBoundaries { count: 1 })
        ));
        assert!(matches!(
            LengthGroupDivision::from_boundaries(vec![1.0, 2.0, 2.0]),
            Err(LengthError::NotIncreasing { index: 2, .. })
        ));
        assert!(matches!(
            LengthGroupDivision::from_boundaries(vec![1.0, 3.0, 2.0]),
            Err(LengthError::NotIncreasing { index: 2, .. })
        ));
    }

    #[test]
    fn irregular_boundaries_have_no_dl() {
        let d = LengthGroupDivision::from_boundaries(vec![0.0, 1.0, 3.0, 6.0]).unwrap();
        assert_eq!(d.len(), 3);
        assert_eq!(d.dl(), None);
        assert_eq!(d.bin_of(2.9), Some(1));
        assert_eq!(d.bin_of(3.0), Some(2));
        assert_eq!(d.bin_of(-0.1), None);
        assert_eq!(d.bin_of(6.0), None);
    }

    #[test]
    fn regular_boundaries_report_dl() {
        let d = LengthGroupDivision::from_boundaries(vec![2.0, 4.0, 6.0]).unwrap();
        assert_eq!(d.dl(), Some(2.0));
        assert_eq!(d, LengthGroupDivision::new(2.0, 6.0, 2.0).unwrap());
    }

    #[test]
    fn edges_detected() {
        let d = LengthGroupDivision::new(0.0, 1.0, 0.1).unwrap();
        assert!(d.has_edge(0.3));
        assert!(d.has_edge(1.0));
        assert!(!d.has_edge(0.35));
    }

    #[test]
    fn check_finer_accepts_refinement() {
        let coarse = LengthGroupDivision::new(0.0, 10.0, 2.0).unwrap();
        let fine = LengthGroupDivision::new(0.0, 10.0, 1.0).unwrap();
        let diag = RecordingDiagnostics::new();
        assert!(check_finer(&coarse, &fine, &diag));
        assert!(diag.is_empty());
    }

    #[test]
    fn check_finer_reports_misaligned_grid() {
        let coarse = LengthGroupDivision::new(0.0, 10.0, 2.0).unwrap();
        let fine = LengthGroupDivision::new(1.0, 9.0, 1.6).unwrap();
        let diag = RecordingDiagnostics::new();
        assert!(!check_finer(&coarse, &fine, &diag));
        let warnings = diag.take();
        assert!(matches!(warnings[0], Warning::NotFiner { .. }));
        assert!(warnings.contains(&Warning::LengthBoundsMismatch {
            edge: LengthEdge::Minimum,
            coarse: 0.0,
            fine: 1.0,
        }));
        assert!(warnings.contains(&Warning::LengthBoundsMismatch {
            edge: LengthEdge::Maximum,
            coarse: 10.0,
            fine: 9.0,
        }));
    }

    proptest! {
        #[test]
        fn bin_of_respects_bounds(
            min in -50.0f64..50.0,
            bins in 1usize..40,
            dl in 0.1f64..5.0,
            t in 0.0f64..1.0,
        ) {
            let max = min + bins as f64 * dl;
            let d = LengthGroupDivision::new(min, max, dl).unwrap();
            prop_assert_eq!(d.len(), bins);
            let x = min + t * (max - min);
            if let Some(i) = d.bin_of(x) {
                prop_assert!(d.bin_min(i) <= x);
                prop_assert!(x < d.bin_max(i));
            } else {
                prop_assert!(x >= d.max_length());
            }
        }
    }
}
