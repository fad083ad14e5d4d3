use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Per-candidate failures
// ---------------------------------------------------------------------------

/// Why a single candidate file could not be turned into a [`Dataset`].
///
/// These never escape a directory scan: the scanner records them against the
/// file and moves on to the next candidate.
///
/// [`Dataset`]: super::model::Dataset
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),

    #[error("group '{group}' has no members to descend into")]
    EmptyGroup { group: String },

    #[error("group '{group}' has no member named '{member}'")]
    MissingMember { group: String, member: String },

    #[error("invalid coordinates in '{field}': {reason}")]
    InvalidCoordinates { field: String, reason: String },

    #[error("coordinates do not cover a dense {height}x{width} grid: {reason}")]
    SparseGrid {
        height: usize,
        width: usize,
        reason: String,
    },

    #[error("cannot reshape {samples} samples into a {height}x{width} grid")]
    ShapeMismatch {
        samples: usize,
        height: usize,
        width: usize,
    },

    #[error("calibration has {calibration} values but spectra have {bands} bands")]
    CalibrationMismatch { calibration: usize, bands: usize },
}

// ---------------------------------------------------------------------------
// Scan failures
// ---------------------------------------------------------------------------

/// Failure of a whole directory scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("root directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// Every candidate was skipped, or there were none at all.
    #[error("Failed to load! No valid file found! ({attempted} candidate(s) tried)")]
    NoValidFile { attempted: usize },
}
