//! Error surface of the resampling pipeline.
//!
//! The run either fully succeeds or returns an error identifying the failed
//! migration stage. Entities that merely cannot be placed are tombstoned by
//! the restorers and never surface here.

use thiserror::Error;

/// Errors that abort a resampling run.
#[derive(Debug, Error)]
pub enum ResampleError {
    /// A nearest-cell query failed during a migration stage. This is a
    /// precondition violation: it can only happen when the queried point set
    /// is empty (e.g. a parent map with no land cells at all).
    #[error("no nearest cell for ({x:.2}, {y:.2}) during {stage}: spatial index is empty")]
    NoNearestCell {
        stage: &'static str,
        x: f32,
        y: f32,
    },

    /// The parent map has no land cells, so land-anchored attributes cannot
    /// be migrated.
    #[error("parent map has no land cells, cannot run {stage}")]
    NoLandCells { stage: &'static str },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dataset serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A saved dataset was written by a newer format version.
    #[error("unsupported save version {found} (newest supported is {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

impl ResampleError {
    /// Shorthand used by the migration stages for failed nearest lookups.
    pub(crate) fn no_nearest(stage: &'static str, x: f32, y: f32) -> Self {
        ResampleError::NoNearestCell { stage, x, y }
    }
}
