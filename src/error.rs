//! Crate-wide error type.

use thiserror::Error;

/// Errors surfaced by the input adapter and the spatial index.
///
/// A degenerate (empty) focus and load-cap rejection are deliberately
/// not represented here — both are normal trial outcomes, not
/// failures, so they flow through `TrialOutcome` instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PartitionError {
    /// A TSV input line could not be parsed into a position.
    #[error("line {line}: {reason}")]
    ParseError { line: usize, reason: String },

    /// An insert targeted a coordinate outside the index's board extent.
    ///
    /// This is a programmer error: callers are required to normalize
    /// positions (translate so the minimum is zero) before building the
    /// index.
    #[error("position ({x}, {y}) is out of bounds for the spatial index")]
    OutOfBounds { x: f64, y: f64 },

    /// A trial was requested before any positions were loaded.
    #[error("cannot run a trial: no positions have been loaded")]
    EmptyDataset,

    /// `num_focuses` was zero. At least one focus is required so every
    /// player has somewhere to be assigned.
    #[error("num_focuses must be at least 1, got {num_focuses}")]
    NoFocuses { num_focuses: usize },
}
