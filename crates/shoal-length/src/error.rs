//! Error types for length-group construction.

use std::fmt;

/// Errors arising from constructing a [`LengthGroupDivision`](crate::LengthGroupDivision).
///
/// All of these are configuration errors: they are reported before any
/// simulation step runs and are never recovered from.
#[derive(Clone, Debug, PartialEq)]
pub enum LengthError {
    /// A bound or width is NaN or infinite.
    NonFinite {
        /// Which input was not finite.
        name: &'static str,
        /// The offending value.
        value: f64,
    },
    /// Bin width is zero or negative.
    NonPositiveWidth {
        /// The configured width.
        dl: f64,
    },
    /// `min` is not below `max`.
    EmptyRange {
        /// Configured minimum length.
        min: f64,
        /// Configured maximum length.
        max: f64,
    },
    /// `(max - min) / dl` is not a whole number of bins.
    NonIntegralBins {
        /// Configured minimum length.
        min: f64,
        /// Configured maximum length.
        max: f64,
        /// Configured width.
        dl: f64,
    },
    /// Fewer than two boundaries were supplied.
    TooFewBoundaries {
        /// Number of boundaries supplied.
        count: usize,
    },
    /// Boundaries are not strictly increasing.
    NotIncreasing {
        /// Index of the first boundary that is not above its predecessor.
        index: usize,
        /// The predecessor value.
        previous: f64,
        /// The offending value.
        value: f64,
    },
}

impl fmt::Display for LengthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { name, value } => write!(f, "{name} must be finite, got {value}"),
            Self::NonPositiveWidth { dl } => write!(f, "length group width must be positive, got {dl}"),
            Self::EmptyRange { min, max } => {
                write!(f, "minimum length {min} must be below maximum length {max}")
            }
            Self::NonIntegralBins { min, max, dl } => {
                write!(f, "range [{min}, {max}) is not a whole number of {dl}-wide groups")
            }
            Self::TooFewBoundaries { count } => {
                write!(f, "need at least 2 length boundaries, got {count}")
            }
            Self::NotIncreasing {
                index,
                previous,
                value,
            } => {
                write!(
                    f,
                    "length boundary {index} ({value}) is not above the previous one ({previous})"
                )
            }
        }
    }
}

impl std::error::Error for LengthError {}
