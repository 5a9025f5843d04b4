#[cfg(feature = "rayon")]
use rayon::prelude::*;
use vessel_mesh_dbihar::Status;

use super::{
    Axis, AxisReport, BiharmonicSolver, Dbihar, DerivativeArrays, Patch, SolveOptions,
    SolveOutcome, SolveRequest, SolvedPatch, locate,
};
use crate::{DERIVATIVES_ATTRIBUTE, Error, Progress, Result, Silent};

/// Fills rectangular patches from their perimeter.
///
/// # Examples
///
/// ```
/// use vessel_mesh::patch::{Patch, PatchSolver, SolveOptions, SolverMode};
///
/// let solver = PatchSolver::new(SolveOptions {
///     mode: SolverMode::Direct,
///     ..Default::default()
/// });
///
/// // Perimeter of the plane `z = y`, 4 × 4 quads.
/// let patch = Patch::unit(4, 4);
/// let boundary: Vec<[f64; 3]> = (0..patch.boundary_len())
///     .map(|p_id| {
///         let t = (p_id % 4) as f64 / 4.0;
///         let (x, y) = match p_id / 4 {
///             0 => (t, 0.0),
///             1 => (1.0, t),
///             2 => (1.0 - t, 1.0),
///             _ => (0.0, 1.0 - t),
///         };
///         [x, y, y]
///     })
///     .collect();
///
/// let mut fractions = Vec::new();
/// let solved = solver.solve(&patch, &boundary, None, &mut |f: f64| fractions.push(f))?;
/// assert_eq!(fractions.len(), 3);
///
/// let centre = solved.point(2, 2).unwrap();
/// assert!((centre[0] - 0.5).abs() < 1e-9);
/// assert!((centre[1] - centre[2]).abs() < 1e-9);
/// # Ok::<(), vessel_mesh::Error>(())
/// ```
pub struct PatchSolver<S = Dbihar> {
    solver: S,
    options: SolveOptions,
}

impl PatchSolver<Dbihar> {
    /// A solver using the built-in backend.
    pub fn new(options: SolveOptions) -> Self {
        Self::with_solver(Dbihar, options)
    }
}

impl Default for PatchSolver<Dbihar> {
    fn default() -> Self {
        Self::new(SolveOptions::default())
    }
}

impl<S: BiharmonicSolver> PatchSolver<S> {
    pub fn with_solver(solver: S, options: SolveOptions) -> Self {
        Self { solver, options }
    }

    #[inline]
    pub fn options(&self) -> &SolveOptions {
        &self.options
    }

    #[inline]
    pub fn backend(&self) -> &S {
        &self.solver
    }

    /// Solves `patch` given its perimeter and, optionally, one derivative
    /// vector per perimeter point.
    ///
    /// Missing derivatives are treated as zero. `progress` is advanced once
    /// per axis.
    pub fn solve(
        &self,
        patch: &Patch,
        boundary: &[[f64; 3]],
        derivatives: Option<&[[f64; 3]]>,
        progress: &mut impl Progress,
    ) -> Result<SolvedPatch> {
        patch.validate()?;

        let expected = patch.boundary_len();
        if boundary.len() != expected {
            return Err(Error::BoundaryPointCount {
                expected,
                actual: boundary.len(),
            });
        }
        match derivatives {
            Some(derivatives) if derivatives.len() != expected => {
                return Err(Error::DerivativeCount {
                    expected,
                    actual: derivatives.len(),
                });
            }
            None => log::warn!("no {DERIVATIVES_ATTRIBUTE} given, assuming zero derivatives"),
            _ => {}
        }

        #[cfg(feature = "rayon")]
        let grids = {
            let grids = Axis::ALL
                .into_par_iter()
                .map(|axis| self.solve_axis(patch, boundary, derivatives, axis))
                .collect::<Result<Vec<_>>>()?;
            for axis in Axis::ALL {
                progress.report((axis.index() + 1) as f64 / 3.0);
            }
            grids
        };

        #[cfg(not(feature = "rayon"))]
        let grids = {
            let mut grids = Vec::with_capacity(3);
            for axis in Axis::ALL {
                grids.push(self.solve_axis(patch, boundary, derivatives, axis)?);
                progress.report((axis.index() + 1) as f64 / 3.0);
            }
            grids
        };

        let mut points = vec![[0.0; 3]; patch.point_count()];
        let mut reports = [AxisReport {
            axis: Axis::X,
            tolerance: 0.0,
            iterations: 0,
        }; 3];
        for (grid, report) in grids {
            let component = report.axis.index();
            for (point, value) in points.iter_mut().zip(&grid) {
                point[component] = *value;
            }
            reports[component] = report;
        }

        Ok(SolvedPatch {
            patch: *patch,
            points,
            reports,
        })
    }

    fn solve_axis(
        &self,
        patch: &Patch,
        boundary: &[[f64; 3]],
        derivatives: Option<&[[f64; 3]]>,
        axis: Axis,
    ) -> Result<(Vec<f64>, AxisReport)> {
        let mut grid = vec![0.0; patch.point_count()];
        for (p_id, point) in boundary.iter().enumerate() {
            if let Some(location) = locate(patch, p_id) {
                grid[location.f_index] = point[axis.index()];
            }
        }

        let arrays = DerivativeArrays::extract(patch, derivatives, axis);
        let (m_dim, n_dim) = (patch.m_dim(), patch.n_dim());
        let mut workspace = vec![0.0; self.options.mode.workspace_len(m_dim, n_dim)];

        let request = SolveRequest {
            x_range: patch.x_range,
            y_range: patch.y_range,
            m_dim,
            n_dim,
            edges: arrays.as_edges(),
            row_stride: patch.row_stride(),
            mode_flag: self.options.mode.flag(),
            tolerance: self.options.tolerance,
            max_iterations: self.options.max_iterations,
            alpha: self.options.alpha,
            beta: self.options.beta,
        };
        let outcome = self.solver.solve(&request, &mut grid, &mut workspace);
        log::debug!(
            "{axis} solve ({} mode, {m_dim} × {n_dim}): code {}, residual {:e}, {} iterations",
            self.options.mode,
            outcome.code,
            outcome.tolerance,
            outcome.iterations
        );

        check(axis, &outcome)?;

        Ok((
            grid,
            AxisReport {
                axis,
                tolerance: outcome.tolerance,
                iterations: outcome.iterations,
            },
        ))
    }
}

fn check(axis: Axis, outcome: &SolveOutcome) -> Result<()> {
    if outcome.code > 0 {
        return Ok(());
    }
    match Status::try_from(outcome.code) {
        Ok(status) => Err(Error::Solve {
            axis,
            status,
            tolerance: outcome.tolerance,
            iterations: outcome.iterations,
        }),
        Err(_) => Err(Error::UnknownSolverStatus {
            axis,
            code: outcome.code,
        }),
    }
}

/// Solves one patch with the built-in backend.
///
/// Shorthand for [`PatchSolver::new(*options).solve(...)`](PatchSolver::solve)
/// without progress reporting.
pub fn solve_patch(
    boundary: &[[f64; 3]],
    derivatives: Option<&[[f64; 3]]>,
    patch: &Patch,
    options: &SolveOptions,
) -> Result<SolvedPatch> {
    PatchSolver::new(*options).solve(patch, boundary, derivatives, &mut Silent)
}
