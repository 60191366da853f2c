//! Shoal: age- and length-structured population matrices for ecosystem
//! models.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Shoal sub-crates. For most users, adding `shoal` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use shoal::prelude::*;
//!
//! // Ages 0..=2 on lengths 10..20 cm in 2 cm groups, two areas.
//! let config = StockConfig::uniform(0, 2, 10.0, 20.0, 2.0, vec![AreaId(1), AreaId(2)]).unwrap();
//! let mut stock = config.build_collection().unwrap();
//! let diag = TracingDiagnostics;
//!
//! // Recruit 1000 fish of 5 g into the smallest group of area 1.
//! stock
//!     .get_mut(AreaId(1))
//!     .unwrap()
//!     .set(0, 0, PopCell::new(1000.0, 0.005));
//!
//! // Natural mortality on the stock's own grid.
//! let same = ConversionIndex::new(&config.lengths, &config.lengths);
//! for (_, area) in stock.iter_mut() {
//!     area.multiply(&[0.9; 5], &same, &diag);
//! }
//!
//! // Half of area 1 swims to area 2.
//! let m = MigrationMatrix::from_rows(vec![vec![0.5, 0.0], vec![0.5, 1.0]]).unwrap();
//! stock.migrate(&m, &diag);
//! assert_eq!(stock.get(AreaId(2)).unwrap().get(0, 0).count, 450.0);
//!
//! // A year passes.
//! for (_, area) in stock.iter_mut() {
//!     area.increment_age();
//! }
//! assert_eq!(stock.total_count(), 900.0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `shoal-core` | `PopCell`, numeric thresholds, diagnostics |
//! | [`length`] | `shoal-length` | Length-group divisions and conversion indices |
//! | [`matrix`] | `shoal-matrix` | Age-band matrices, collections, migration, stock config |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Population cells, thresholds and diagnostics (`shoal-core`).
///
/// Warnings raised by matrix operations arrive at a [`types::Diagnostics`]
/// sink; [`types::TracingDiagnostics`] logs them and
/// [`types::RecordingDiagnostics`] keeps them for inspection.
pub use shoal_core as types;

/// Length grids and grid reconciliation (`shoal-length`).
///
/// Build a [`length::ConversionIndex`] once per pair of
/// [`length::LengthGroupDivision`]s and reuse it every timestep.
pub use shoal_length as length;

/// Age-band matrices and their algebra (`shoal-matrix`).
pub use shoal_matrix as matrix;

/// Common imports for typical Shoal usage.
///
/// ```rust
/// use shoal::prelude::*;
/// ```
pub mod prelude {
    // Cells and diagnostics
    pub use shoal_core::{
        AreaId, Diagnostics, PopCell, RecordingDiagnostics, TracingDiagnostics, Warning,
    };

    // Length grids
    pub use shoal_length::{check_finer, ConversionIndex, LengthGroupDivision};

    // Matrices
    pub use shoal_matrix::{
        AgeBandMatrix, AgeBandMatrixCollection, BandedRow, ConfigError, MigrationMatrix,
        StockConfig,
    };
}
