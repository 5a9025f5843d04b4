//! Rectangular patch solves.
//!
//! A [`Patch`] is a rectangle in parameter space, `[x0, x1] × [y0, y1]`,
//! divided into `m_quads × n_quads` cells. Its perimeter is handed in as an
//! ordered list of `2 (m_quads + n_quads)` points running bottom, right, top,
//! left. The interior is filled in by one clamped biharmonic solve per
//! coordinate axis.
//!
//! * [`solve_patch()`] – one-shot entry point using the built-in solver.
//! * [`PatchSolver`] – reusable solver object, generic over the
//!   [`BiharmonicSolver`] backend, with progress reporting.
use derive_more::Display;

use crate::{Error, Result};

pub mod boundary;
mod patch_solver;
mod solver;
mod workspace;

pub use boundary::{BoundaryLocation, DerivativeArrays, Segment, locate};
pub use patch_solver::{PatchSolver, solve_patch};
pub use solver::{BiharmonicSolver, Dbihar, SolveOutcome, SolveRequest};
pub use workspace::SolverMode;

/// A coordinate axis. Each one gets its own solve.
#[derive(Display, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    #[display("x")]
    X,
    #[display("y")]
    Y,
    #[display("z")]
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index into a `[f64; 3]`.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Shape of a rectangular patch in parameter space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Patch {
    /// Cells along the first parameter (`M`).
    pub m_quads: usize,
    /// Cells along the second parameter (`N`).
    pub n_quads: usize,
    /// `[A, B]`.
    pub x_range: [f64; 2],
    /// `[C, D]`.
    pub y_range: [f64; 2],
}

impl Patch {
    pub fn new(m_quads: usize, n_quads: usize, x_range: [f64; 2], y_range: [f64; 2]) -> Self {
        Self {
            m_quads,
            n_quads,
            x_range,
            y_range,
        }
    }

    /// A patch over the unit square.
    pub fn unit(m_quads: usize, n_quads: usize) -> Self {
        Self::new(m_quads, n_quads, [0.0, 1.0], [0.0, 1.0])
    }

    /// Interior points along the first parameter, `M - 1`.
    #[inline]
    pub fn m_dim(&self) -> usize {
        self.m_quads.saturating_sub(1)
    }

    /// Interior points along the second parameter, `N - 1`.
    #[inline]
    pub fn n_dim(&self) -> usize {
        self.n_quads.saturating_sub(1)
    }

    /// Number of perimeter points, `2 (M + N)`.
    #[inline]
    pub fn boundary_len(&self) -> usize {
        2 * (self.m_quads + self.n_quads)
    }

    /// Number of grid points, `(M + 1) (N + 1)`.
    #[inline]
    pub fn point_count(&self) -> usize {
        (self.m_quads + 1) * (self.n_quads + 1)
    }

    /// Row stride of the grid buffer, `M + 1`.
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.m_quads + 1
    }

    /// Rejects patches without interior points.
    pub fn validate(&self) -> Result<()> {
        if self.m_quads < 2 || self.n_quads < 2 {
            return Err(Error::InvalidPatch(format!(
                "{} × {} quads leaves no interior points, need at least 2 × 2",
                self.m_quads, self.n_quads
            )));
        }
        Ok(())
    }
}

/// Solver settings for a patch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolveOptions {
    pub mode: SolverMode,
    /// Relative residual the iterative mode has to reach.
    pub tolerance: f64,
    /// Iteration cap for the iterative mode.
    pub max_iterations: usize,
    /// Coefficient of the `Δu` term.
    pub alpha: f64,
    /// Coefficient of the `u` term.
    pub beta: f64,
}

impl Default for SolveOptions {
    /// Create options with the following defaults:
    ///
    /// | Property         | Value                                                      |
    /// |------------------|------------------------------------------------------------|
    /// | `mode`           | [`ConjugateGradient`](SolverMode::ConjugateGradient)       |
    /// | `tolerance`      | `1e-3`                                                     |
    /// | `max_iterations` | `10`                                                       |
    /// | `alpha`          | `0`                                                        |
    /// | `beta`           | `0`                                                        |
    fn default() -> Self {
        Self {
            mode: SolverMode::ConjugateGradient,
            tolerance: 1e-3,
            max_iterations: 10,
            alpha: 0.0,
            beta: 0.0,
        }
    }
}

/// What the solver reported for one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisReport {
    pub axis: Axis,
    /// Achieved relative residual.
    pub tolerance: f64,
    /// Iterations used, `0` for the direct mode.
    pub iterations: usize,
}

/// A fully populated patch grid.
#[derive(Clone, Debug)]
pub struct SolvedPatch {
    pub(crate) patch: Patch,
    pub(crate) points: Vec<[f64; 3]>,
    pub(crate) reports: [AxisReport; 3],
}

impl SolvedPatch {
    #[inline]
    pub fn patch(&self) -> &Patch {
        &self.patch
    }

    /// Grid points in row-major order, `row * (M + 1) + col`.
    #[inline]
    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    #[inline]
    pub fn into_points(self) -> Vec<[f64; 3]> {
        self.points
    }

    /// Point at `col ∈ [0, M]`, `row ∈ [0, N]`.
    #[inline]
    pub fn point(&self, col: usize, row: usize) -> Option<[f64; 3]> {
        if col > self.patch.m_quads || row > self.patch.n_quads {
            None
        } else {
            Some(self.points[row * self.patch.row_stride() + col])
        }
    }

    /// Per-axis solver reports, in axis order.
    #[inline]
    pub fn reports(&self) -> &[AxisReport; 3] {
        &self.reports
    }
}
