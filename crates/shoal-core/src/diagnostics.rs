//! Reconciliation warnings and the sinks that receive them.
//!
//! Arithmetic-layer problems (a zero divisor in a grid conversion, a
//! negative survival ratio, a vector of the wrong length) never abort a
//! running simulation. Operations substitute a neutral value and report the
//! problem to a [`Diagnostics`] sink supplied by the caller.

use std::cell::RefCell;
use std::fmt;

/// Which end of a length range a [`Warning::LengthBoundsMismatch`] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LengthEdge {
    /// The smallest length of the grid.
    Minimum,
    /// The largest length of the grid.
    Maximum,
}

impl fmt::Display for LengthEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minimum => write!(f, "minimum"),
            Self::Maximum => write!(f, "maximum"),
        }
    }
}

/// A recoverable reconciliation problem.
#[derive(Clone, Debug, PartialEq)]
pub enum Warning {
    /// A finer-grid split found no covering bins; the cell was skipped.
    ZeroBinCount {
        /// Age class being added.
        age: u32,
        /// Target length bin whose divisor was zero.
        length: usize,
    },
    /// A negative ratio was clamped to zero.
    NegativeRatio {
        /// Position in the ratio vector.
        index: usize,
        /// The offending value.
        value: f64,
    },
    /// `multiply` was given a ratio grid finer than the matrix grid.
    /// No per-bin split is applied; each matrix bin takes one ratio.
    TargetFinerInMultiply,
    /// A length-indexed ratio vector does not match the target grid.
    RatioLengthMismatch {
        /// Bins in the conversion index's target grid.
        expected: usize,
        /// Length of the supplied vector.
        actual: usize,
    },
    /// An age-indexed ratio vector does not match the number of age rows.
    AgeRatioLengthMismatch {
        /// Number of age rows.
        expected: usize,
        /// Length of the supplied vector.
        actual: usize,
    },
    /// Consumption and prior-count vectors differ in length.
    ConsumptionLengthMismatch {
        /// Length of the consumption vector.
        consumption: usize,
        /// Length of the prior-count vector.
        prior: usize,
    },
    /// A column-sum output is too short for the matrix's windows.
    ColumnSumLengthMismatch {
        /// Length needed to cover every row window.
        needed: usize,
        /// Length of the supplied output.
        actual: usize,
    },
    /// A migration matrix does not match the number of areas; nothing moved.
    MigrationSizeMismatch {
        /// Number of areas in the collection.
        areas: usize,
        /// Dimension of the migration matrix.
        matrix: usize,
    },
    /// Areas hold different length windows for one age; that age did not
    /// migrate.
    MigrationLayoutMismatch {
        /// Age class left in place.
        age: u32,
    },
    /// Two grids that should span the same lengths do not.
    LengthBoundsMismatch {
        /// Which end differs.
        edge: LengthEdge,
        /// Value on the coarse grid.
        coarse: f64,
        /// Value on the fine grid.
        fine: f64,
    },
    /// A grid expected to refine another does not.
    NotFiner {
        /// Bins in the grid expected to be coarser.
        coarse_bins: usize,
        /// Bins in the grid expected to be finer.
        fine_bins: usize,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroBinCount { age, length } => {
                write!(f, "divide by zero bin count at age {age}, length {length}")
            }
            Self::NegativeRatio { index, value } => {
                write!(f, "negative ratio {value} at index {index} clamped to zero")
            }
            Self::TargetFinerInMultiply => write!(f, "target is finer for multiply"),
            Self::RatioLengthMismatch { expected, actual } => {
                write!(f, "ratio vector has {actual} entries, grid has {expected} bins")
            }
            Self::AgeRatioLengthMismatch { expected, actual } => {
                write!(f, "age ratio vector has {actual} entries, matrix has {expected} ages")
            }
            Self::ConsumptionLengthMismatch { consumption, prior } => {
                write!(
                    f,
                    "consumption has {consumption} entries, prior numbers have {prior}"
                )
            }
            Self::ColumnSumLengthMismatch { needed, actual } => {
                write!(f, "column sum output has {actual} entries, needs {needed}")
            }
            Self::MigrationSizeMismatch { areas, matrix } => {
                write!(f, "migration matrix is {matrix}x{matrix} for {areas} areas")
            }
            Self::MigrationLayoutMismatch { age } => {
                write!(f, "areas disagree on length window at age {age}; not migrated")
            }
            Self::LengthBoundsMismatch { edge, coarse, fine } => {
                write!(f, "{edge} lengths don't match: {coarse} vs {fine}")
            }
            Self::NotFiner {
                coarse_bins,
                fine_bins,
            } => {
                write!(
                    f,
                    "grid with {fine_bins} bins does not refine grid with {coarse_bins} bins"
                )
            }
        }
    }
}

/// Sink for reconciliation warnings.
///
/// Passed by reference into every operation that can warn.
pub trait Diagnostics {
    /// Report one warning. Must not panic.
    fn warn(&self, warning: Warning);
}

impl<D: Diagnostics + ?Sized> Diagnostics for &D {
    fn warn(&self, warning: Warning) {
        (**self).warn(warning)
    }
}

/// Forwards warnings to [`tracing`] at WARN level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&self, warning: Warning) {
        tracing::warn!(target: "shoal", kind = warning_kind(&warning), "{warning}");
    }
}

fn warning_kind(warning: &Warning) -> &'static str {
    match warning {
        Warning::ZeroBinCount { .. } => "zero_bin_count",
        Warning::NegativeRatio { .. } => "negative_ratio",
        Warning::TargetFinerInMultiply => "target_finer_in_multiply",
        Warning::RatioLengthMismatch { .. } => "ratio_length_mismatch",
        Warning::AgeRatioLengthMismatch { .. } => "age_ratio_length_mismatch",
        Warning::ConsumptionLengthMismatch { .. } => "consumption_length_mismatch",
        Warning::ColumnSumLengthMismatch { .. } => "column_sum_length_mismatch",
        Warning::MigrationSizeMismatch { .. } => "migration_size_mismatch",
        Warning::MigrationLayoutMismatch { .. } => "migration_layout_mismatch",
        Warning::LengthBoundsMismatch { .. } => "length_bounds_mismatch",
        Warning::NotFiner { .. } => "not_finer",
    }
}

/// Collects warnings in memory.
///
/// ```
/// use shoal_core::{Diagnostics, RecordingDiagnostics, Warning};
///
/// let diag = RecordingDiagnostics::new();
/// diag.warn(Warning::TargetFinerInMultiply);
/// assert_eq!(diag.warnings(), vec![Warning::TargetFinerInMultiply]);
/// ```
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    warnings: RefCell<Vec<Warning>>,
}

impl RecordingDiagnostics {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every warning received so far, in order.
    pub fn warnings(&self) -> Vec<Warning> {
        self.warnings.borrow().clone()
    }

    /// Number of warnings received.
    pub fn len(&self) -> usize {
        self.warnings.borrow().len()
    }

    /// Returns `true` if nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.warnings.borrow().is_empty()
    }

    /// Drain and return every recorded warning.
    pub fn take(&self) -> Vec<Warning> {
        std::mem::take(&mut *self.warnings.borrow_mut())
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn warn(&self, warning: Warning) {
        self.warnings.borrow_mut().push(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_keeps_order() {
        let diag = RecordingDiagnostics::new();
        diag.warn(Warning::TargetFinerInMultiply);
        diag.warn(Warning::NegativeRatio {
            index: 3,
            value: -0.5,
        });
        assert_eq!(diag.len(), 2);
        let taken = diag.take();
        assert_eq!(taken[0], Warning::TargetFinerInMultiply);
        assert!(matches!(taken[1], Warning::NegativeRatio { index: 3, .. }));
        assert!(diag.is_empty());
    }

    #[test]
    fn tracing_sink_does_not_panic_without_subscriber() {
        TracingDiagnostics.warn(Warning::ZeroBinCount { age: 1, length: 2 });
    }

    #[test]
    fn reference_forwards() {
        let diag = RecordingDiagnostics::new();
        let by_ref: &dyn Diagnostics = &diag;
        (&by_ref).warn(Warning::TargetFinerInMultiply);
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn display_mentions_values() {
        let w = Warning::MigrationSizeMismatch {
            areas: 3,
            matrix: 2,
        };
        assert_eq!(w.to_string(), "migration matrix is 2x2 for 3 areas");
        let w = Warning::LengthBoundsMismatch {
            edge: LengthEdge::Minimum,
            coarse: 10.0,
            fine: 12.0,
        };
        assert_eq!(w.to_string(), "minimum lengths don't match: 10 vs 12");
        let w = Warning::MigrationLayoutMismatch { age: 2 };
        assert_eq!(
            w.to_string(),
            "areas disagree on length window at age 2; not migrated"
        );
    }
}
