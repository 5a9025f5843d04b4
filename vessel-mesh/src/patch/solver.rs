use vessel_mesh_dbihar::{Control, EdgeDerivatives, Rectangle, dbihar};

/// Everything a biharmonic backend needs for one axis solve, apart from the
/// buffers it writes to.
#[derive(Clone, Copy, Debug)]
pub struct SolveRequest<'a> {
    /// `[A, B]`.
    pub x_range: [f64; 2],
    /// `[C, D]`.
    pub y_range: [f64; 2],
    /// Interior points along `x`.
    pub m_dim: usize,
    /// Interior points along `y`.
    pub n_dim: usize,
    pub edges: EdgeDerivatives<'a>,
    /// Row stride of the grid buffer.
    pub row_stride: usize,
    /// Raw solver mode flag.
    pub mode_flag: i32,
    pub tolerance: f64,
    pub max_iterations: usize,
    pub alpha: f64,
    pub beta: f64,
}

/// Raw result of a backend solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolveOutcome {
    /// Positive on success, a status code otherwise.
    pub code: i32,
    /// Achieved relative residual.
    pub tolerance: f64,
    pub iterations: usize,
}

/// A biharmonic backend.
///
/// Implementations fill the interior of `grid` in place. The boundary of
/// `grid` carries the Dirichlet data on entry and must be left as is.
pub trait BiharmonicSolver: Sync {
    fn solve(
        &self,
        request: &SolveRequest<'_>,
        grid: &mut [f64],
        workspace: &mut [f64],
    ) -> SolveOutcome;
}

/// The built-in backend, see [`vessel_mesh_dbihar`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Dbihar;

impl BiharmonicSolver for Dbihar {
    fn solve(
        &self,
        request: &SolveRequest<'_>,
        grid: &mut [f64],
        workspace: &mut [f64],
    ) -> SolveOutcome {
        let rect = Rectangle {
            a: request.x_range[0],
            b: request.x_range[1],
            m: request.m_dim,
            c: request.y_range[0],
            d: request.y_range[1],
            n: request.n_dim,
        };
        let control = Control {
            alpha: request.alpha,
            beta: request.beta,
            iflag: request.mode_flag,
            tol: request.tolerance,
            itcg: request.max_iterations,
        };

        let outcome = dbihar(
            &rect,
            &request.edges,
            grid,
            request.row_stride,
            &control,
            workspace,
        );

        SolveOutcome {
            code: outcome.iflag,
            tolerance: outcome.tol,
            iterations: outcome.itcg,
        }
    }
}
