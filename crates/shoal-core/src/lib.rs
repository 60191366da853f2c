//! Core types for the Shoal population engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! scalar population cell ([`PopCell`]), the numeric thresholds shared by
//! every operation, and the diagnostics channel through which arithmetic
//! layers report reconciliation problems without interrupting a run.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod diagnostics;
pub mod numeric;

pub use cell::PopCell;
pub use diagnostics::{
    Diagnostics, LengthEdge, RecordingDiagnostics, TracingDiagnostics, Warning,
};
pub use numeric::{is_zero, RATHER_SMALL, VERY_SMALL};

/// External identifier of a spatial area.
///
/// Areas are numbered by the model configuration; collections map these ids
/// onto their own positional order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AreaId(pub u32);

impl std::fmt::Display for AreaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for AreaId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
