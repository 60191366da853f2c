//! Length axes for Shoal populations.
//!
//! A [`LengthGroupDivision`] partitions the continuous length axis into
//! integer-indexed bins. A [`ConversionIndex`] is precomputed once for a
//! pair of divisions and tells the matrix algebra how bins of one grid map
//! onto bins of the other.
//!
//! # Regimes
//!
//! - **Same spacing**: equal widths, aligned edges. Indices differ by a
//!   constant [`offset`](ConversionIndex::offset).
//! - **Target finer**: every target bin sits inside one source bin.
//! - **Target coarser**: everything else, including unaligned grids.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod conversion;
pub mod division;
pub mod error;

pub use conversion::{ConversionIndex, Regime};
pub use division::{check_finer, LengthGroupDivision};
pub use error::LengthError;
