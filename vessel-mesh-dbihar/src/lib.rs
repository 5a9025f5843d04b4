//! # Clamped Biharmonic Solve
//!
//! Low-level routine behind the `dbihar` calling contract: solves
//!
//! ```text
//! Δ²u + α Δu + β u = f
//! ```
//!
//! on the rectangle `[a, b] × [c, d]` sampled with `m × n` interior nodes,
//! given Dirichlet values on the boundary of the grid and the first
//! derivatives across the four edges.
//!
//! Two modes are provided. [`IFLAG_CONJUGATE_GRADIENT`] iterates on the
//! capacitance system of the nodes next to the boundary, with a sine
//! transform solver for the simply supported plate doing the bulk of the
//! work. [`IFLAG_DIRECT`] factors the banded system matrix.
//!
//! The grid is a flat buffer with row stride `idf`: node `(i, j)` with
//! `0 ≤ i ≤ m + 1` along `x` and `0 ≤ j ≤ n + 1` along `y` lives at
//! `f[j * idf + i]`. On entry the interior holds the right hand side, on
//! successful return the solution.
//!
//! Errors are reported the way the contract demands, as a non-positive
//! [`Outcome::iflag`]. Use [`Status`] to decode them.
mod banded;
mod cg;
mod fast;
mod status;
mod stencil;

pub use status::{
    IFLAG_CONJUGATE_GRADIENT, IFLAG_DIRECT, Status, conjugate_gradient_workspace, direct_workspace,
    required_workspace,
};

use banded::{Banded, FactorError};
use stencil::{Stencil, norm};

/// The domain and its sampling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rectangle {
    pub a: f64,
    pub b: f64,
    /// Interior nodes along `x`. Must be odd and at least 3.
    pub m: usize,
    pub c: f64,
    pub d: f64,
    /// Interior nodes along `y`. Must be odd and at least 3.
    pub n: usize,
}

impl Rectangle {
    /// Grid spacing `(hx, hy)`.
    #[inline]
    pub fn spacing(&self) -> (f64, f64) {
        (
            (self.b - self.a) / (self.m + 1) as f64,
            (self.d - self.c) / (self.n + 1) as f64,
        )
    }
}

/// Normal derivative data along the edges, excluding the corners.
///
/// `bda`/`bdb` hold `∂u/∂x` on `x = a`/`x = b` (`n` values each, bottom to
/// top), `bdc`/`bdd` hold `∂u/∂y` on `y = c`/`y = d` (`m` values each, left to
/// right).
#[derive(Clone, Copy, Debug)]
pub struct EdgeDerivatives<'a> {
    pub bda: &'a [f64],
    pub bdb: &'a [f64],
    pub bdc: &'a [f64],
    pub bdd: &'a [f64],
}

/// Solver selection and parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Control {
    pub alpha: f64,
    pub beta: f64,
    /// [`IFLAG_CONJUGATE_GRADIENT`] or [`IFLAG_DIRECT`].
    pub iflag: i32,
    /// Relative residual the conjugate gradient iteration has to reach,
    /// measured on the capacitance system.
    pub tol: f64,
    /// Maximum number of conjugate gradient iterations.
    pub itcg: usize,
}

impl Default for Control {
    fn default() -> Self {
        Self {
            alpha: 0.0,
            beta: 0.0,
            iflag: IFLAG_CONJUGATE_GRADIENT,
            tol: 1e-3,
            itcg: 10,
        }
    }
}

/// What [`dbihar()`] reports back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Outcome {
    /// The requested mode on success, a [`Status`] code otherwise.
    pub iflag: i32,
    /// Relative residual: of the capacitance system for the conjugate
    /// gradient mode, of the full system for the direct mode.
    pub tol: f64,
    /// Conjugate gradient iterations used. Always `0` for the direct mode.
    pub itcg: usize,
}

impl Outcome {
    #[inline]
    fn failed(status: Status) -> Self {
        Self {
            iflag: status.code(),
            tol: 0.0,
            itcg: 0,
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.iflag > 0
    }

    /// The decoded failure, `None` on success.
    pub fn status(&self) -> Option<Status> {
        if self.is_success() {
            None
        } else {
            Status::try_from(self.iflag).ok()
        }
    }
}

/// Solves the clamped plate problem in place.
///
/// `w` must hold at least [`required_workspace()`] entries for the requested
/// mode. The conjugate gradient mode uses its first `n` entries as transform
/// scratch. The direct mode only checks its length. Grid sized buffers are
/// allocated internally, and the contents of `w` on entry never matter.
///
/// On failure `f` is left untouched.
pub fn dbihar(
    rect: &Rectangle,
    edges: &EdgeDerivatives<'_>,
    f: &mut [f64],
    idf: usize,
    control: &Control,
    w: &mut [f64],
) -> Outcome {
    let (m, n) = (rect.m, rect.n);

    if m < 3 || n < 3 || m % 2 == 0 || n % 2 == 0 {
        return Outcome::failed(Status::InvalidDimensions);
    }
    if !(rect.a < rect.b) || !(rect.c < rect.d) {
        return Outcome::failed(Status::InvalidDomain);
    }

    let storage_ok = idf >= m + 2
        && f.len() >= (n + 1) * idf + m + 2
        && edges.bda.len() >= n
        && edges.bdb.len() >= n
        && edges.bdc.len() >= m
        && edges.bdd.len() >= m
        && required_workspace(control.iflag, m, n).is_some_and(|required| w.len() >= required);
    if !storage_ok {
        return Outcome::failed(Status::InsufficientStorage);
    }

    let mut stencil = Stencil::new(rect, control.alpha, control.beta);
    let load = stencil.boundary_load(f, idf, edges);

    let mut rhs = vec![0.0; m * n];
    for j in 1..=n {
        for i in 1..=m {
            let p = (j - 1) * m + (i - 1);
            rhs[p] = f[j * idf + i] - load[p];
        }
    }

    let mut solution = vec![0.0; m * n];
    let outcome = match control.iflag {
        IFLAG_CONJUGATE_GRADIENT => match cg::solve(rect, control, &rhs, &mut solution, &mut w[..n]) {
            Ok(converged) => Outcome {
                iflag: control.iflag,
                tol: converged.residual,
                itcg: converged.iterations,
            },
            Err(diverged) => {
                return Outcome {
                    iflag: Status::NotConverged.code(),
                    tol: diverged.residual,
                    itcg: diverged.iterations,
                };
            }
        },
        _ => {
            let mut banded = Banded::assemble(&stencil, m, n);
            match banded.factor() {
                Ok(()) => {}
                Err(FactorError::Negative) => {
                    return Outcome::failed(Status::FactorizationFailed);
                }
                Err(FactorError::Singular) => return Outcome::failed(Status::SingularSystem),
            }

            solution.copy_from_slice(&rhs);
            banded.solve(&mut solution);

            let mut applied = vec![0.0; m * n];
            stencil.apply(&solution, &mut applied);
            let rhs_norm = norm(&rhs);
            let residual = rhs
                .iter()
                .zip(&applied)
                .map(|(b, kx)| (b - kx) * (b - kx))
                .sum::<f64>()
                .sqrt();

            Outcome {
                iflag: control.iflag,
                tol: if rhs_norm > 0.0 {
                    residual / rhs_norm
                } else {
                    residual
                },
                itcg: 0,
            }
        }
    };

    for j in 1..=n {
        let row = &solution[(j - 1) * m..j * m];
        f[j * idf + 1..j * idf + 1 + m].copy_from_slice(row);
    }

    outcome
}
