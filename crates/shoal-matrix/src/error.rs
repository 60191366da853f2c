//! Configuration errors for matrices, collections and migration.

use std::error::Error;
use std::fmt;

use shoal_core::AreaId;
use shoal_length::LengthError;

/// Structural errors detected while building population state.
///
/// These are fatal: they surface before any simulation step runs.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Length-group division construction failed.
    Length(LengthError),
    /// `min_age` is above `max_age`, or the age range overflows.
    InvalidAgeRange {
        /// Configured minimum age.
        min_age: u32,
        /// Configured maximum age.
        max_age: u32,
    },
    /// A matrix must have at least one age row.
    NoAgeRows,
    /// A row window starts after it ends.
    InvalidWindow {
        /// Age of the offending row.
        age: u32,
        /// Window start.
        start: usize,
        /// Window end (exclusive).
        end: usize,
    },
    /// A row window reaches past the length grid.
    WindowOutOfRange {
        /// Age of the offending row.
        age: u32,
        /// Window end (exclusive).
        end: usize,
        /// Number of bins in the length grid.
        bins: usize,
    },
    /// Number of per-age windows differs from the number of ages.
    WindowCount {
        /// Number of ages.
        expected: usize,
        /// Number of windows supplied.
        actual: usize,
    },
    /// A collection needs at least one area.
    NoAreas,
    /// The same area id was given twice.
    DuplicateArea {
        /// The repeated id.
        area: AreaId,
    },
    /// A matrix added to a collection has a different age/length layout.
    LayoutMismatch {
        /// Area whose matrix did not match.
        area: AreaId,
    },
    /// A migration matrix has no rows.
    EmptyMigration,
    /// A migration matrix row has the wrong number of entries.
    MigrationNotSquare {
        /// Index of the offending row.
        row: usize,
        /// Entries in that row.
        len: usize,
        /// Expected entries (number of rows).
        size: usize,
    },
    /// A migration fraction is NaN or infinite.
    MigrationNonFinite {
        /// Target area position.
        target: usize,
        /// Source area position.
        source: usize,
        /// The offending value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length(e) => write!(f, "length groups: {e}"),
            Self::InvalidAgeRange { min_age, max_age } => {
                write!(f, "invalid age range {min_age}..={max_age}")
            }
            Self::NoAgeRows => write!(f, "matrix must have at least one age"),
            Self::InvalidWindow { age, start, end } => {
                write!(f, "length window {start}..{end} for age {age} is reversed")
            }
            Self::WindowOutOfRange { age, end, bins } => {
                write!(f, "length window for age {age} ends at {end}, grid has {bins} groups")
            }
            Self::WindowCount { expected, actual } => {
                write!(f, "expected {expected} length windows, got {actual}")
            }
            Self::NoAreas => write!(f, "stock must live on at least one area"),
            Self::DuplicateArea { area } => write!(f, "area {area} listed more than once"),
            Self::LayoutMismatch { area } => {
                write!(f, "matrix for area {area} does not match the collection layout")
            }
            Self::EmptyMigration => write!(f, "migration matrix is empty"),
            Self::MigrationNotSquare { row, len, size } => {
                write!(f, "migration row {row} has {len} entries, expected {size}")
            }
            Self::MigrationNonFinite {
                target,
                source,
                value,
            } => {
                write!(f, "migration fraction [{target}][{source}] is not finite: {value}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Length(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LengthError> for ConfigError {
    fn from(e: LengthError) -> Self {
        Self::Length(e)
    }
}
