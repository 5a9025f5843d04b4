//! Error types for the vessel-mesh crate.

use thiserror::Error;
use vessel_mesh_dbihar::Status;

use crate::patch::Axis;

/// Main error type for vessel-mesh operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The perimeter does not have `2 (M + N)` points.
    #[error("Boundary point count mismatch: expected {expected}, got {actual}")]
    BoundaryPointCount { expected: usize, actual: usize },

    /// The derivative array does not match the perimeter.
    #[error("Derivative count mismatch: expected {expected}, got {actual}")]
    DerivativeCount { expected: usize, actual: usize },

    /// Solver mode flag other than 2 or 4.
    #[error("Unsupported solver mode: {0}")]
    UnsupportedSolverMode(i32),

    /// Invalid patch configuration.
    #[error("Invalid patch configuration: {0}")]
    InvalidPatch(String),

    /// Malformed ring-count sequence.
    #[error("Invalid ring counts: {0}")]
    InvalidRingCounts(String),

    /// The number of input points does not match the ring layout.
    #[error("Input point count mismatch: expected {expected}, got {actual}")]
    InputPointCount { expected: usize, actual: usize },

    /// The biharmonic solve for one axis reported a failure.
    #[error("Solve along {axis} failed: {status} (tolerance {tolerance}, {iterations} iterations)")]
    Solve {
        axis: Axis,
        status: Status,
        tolerance: f64,
        iterations: usize,
    },

    /// The solver returned a code outside the documented table.
    #[error("Solve along {axis} returned unknown status {code}")]
    UnknownSolverStatus { axis: Axis, code: i32 },

    /// Assembled connectivity is broken.
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    /// Index out of bounds.
    #[error("Index {index} out of bounds (max: {max})")]
    IndexOutOfBounds { index: usize, max: usize },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
