//! Age-length population matrices for Shoal.
//!
//! An [`AgeBandMatrix`] holds the population of one stock in one area as a
//! stack of [`BandedRow`]s, one per age class, each with its own window of
//! active length bins. The algebra on it (add, multiply, subtract, ageing,
//! filtering, column sums) is what every biological process reduces to.
//!
//! An [`AgeBandMatrixCollection`] keeps one matrix per area and moves
//! individuals between them with a [`MigrationMatrix`].
//!
//! Grids that differ between subsystems are reconciled through a
//! [`ConversionIndex`](shoal_length::ConversionIndex).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod collection;
pub mod config;
pub mod error;
pub mod matrix;
pub mod migration;
pub mod row;

pub use collection::AgeBandMatrixCollection;
pub use config::StockConfig;
pub use error::ConfigError;
pub use matrix::AgeBandMatrix;
pub use migration::MigrationMatrix;
pub use row::BandedRow;
