//! Conjugate gradient on the capacitance system.
//!
//! The clamped operator splits as `K = P + D`. `P` is the simply supported
//! operator inverted by [`FastSolver`], `D ≥ 0` is diagonal and lives on the
//! nodes next to the boundary only, where the mirrored ghosts add `2 / h⁴`.
//! With `R` the restriction to those nodes the iteration runs on
//!
//! ```text
//! (I + D½ R P⁻¹ Rᵀ D½) w = D½ R P⁻¹ b
//! ```
//!
//! and the solution follows as `x = P⁻¹ (b - Rᵀ D½ w)`. Each iteration costs
//! one fast solve. The capacitance matrix is symmetric positive definite
//! whenever `P` is, and its iteration count grows only slowly with the grid.
use crate::fast::FastSolver;
use crate::stencil::{dot, norm};
use crate::{Control, Rectangle};

pub(crate) struct Converged {
    pub residual: f64,
    pub iterations: usize,
}

pub(crate) struct Diverged {
    pub residual: f64,
    pub iterations: usize,
}

/// `P` together with the boundary correction `D`.
struct Capacitance {
    fast: FastSolver,
    /// Interior positions of the nodes next to the boundary.
    nodes: Vec<usize>,
    /// `sqrt(D)` at `nodes`.
    weights: Vec<f64>,
    grid: Vec<f64>,
}

impl Capacitance {
    fn new(rect: &Rectangle, alpha: f64, beta: f64) -> Option<Self> {
        let (m, n) = (rect.m, rect.n);
        let (hx, hy) = rect.spacing();
        let fast = FastSolver::new(m, n, hx, hy, alpha, beta)?;

        let (dx, dy) = (2.0 / hx.powi(4), 2.0 / hy.powi(4));
        let mut nodes = Vec::with_capacity(2 * (m + n));
        let mut weights = Vec::with_capacity(2 * (m + n));
        for j in 1..=n {
            for i in 1..=m {
                let mut d = 0.0_f64;
                if i == 1 || i == m {
                    d += dx;
                }
                if j == 1 || j == n {
                    d += dy;
                }
                if d > 0.0 {
                    nodes.push((j - 1) * m + (i - 1));
                    weights.push(d.sqrt());
                }
            }
        }

        Some(Self {
            fast,
            nodes,
            weights,
            grid: vec![0.0; m * n],
        })
    }

    /// `out = (I + D½ R P⁻¹ Rᵀ D½) v`.
    fn apply(&mut self, v: &[f64], out: &mut [f64], scratch: &mut [f64]) {
        self.grid.fill(0.0);
        for ((node, weight), v) in self.nodes.iter().zip(&self.weights).zip(v) {
            self.grid[*node] = weight * v;
        }
        self.fast.solve(&mut self.grid, scratch);
        for (((node, weight), v), out) in self.nodes.iter().zip(&self.weights).zip(v).zip(out) {
            *out = v + weight * self.grid[*node];
        }
    }

    /// `D½ R P⁻¹ b`.
    fn load(&mut self, rhs: &[f64], scratch: &mut [f64]) -> Vec<f64> {
        self.grid.copy_from_slice(rhs);
        self.fast.solve(&mut self.grid, scratch);
        self.nodes
            .iter()
            .zip(&self.weights)
            .map(|(node, weight)| weight * self.grid[*node])
            .collect()
    }

    /// Plain conjugate gradient on the capacitance matrix, starting from
    /// `w = 0`.
    fn iterate(
        &mut self,
        g: &[f64],
        w: &mut [f64],
        tol: f64,
        max_iterations: usize,
        scratch: &mut [f64],
    ) -> Result<Converged, Diverged> {
        let g_norm = norm(g);
        let mut r = g.to_vec();
        let mut p = r.clone();
        let mut q = vec![0.0; g.len()];
        let mut rr = dot(&r, &r);

        for iteration in 1..=max_iterations {
            self.apply(&p, &mut q, scratch);
            let curvature = dot(&p, &q);
            if !(curvature > 0.0) {
                return Err(Diverged {
                    residual: rr.sqrt() / g_norm,
                    iterations: iteration - 1,
                });
            }

            let step = rr / curvature;
            w.iter_mut().zip(&p).for_each(|(w, p)| *w += step * p);
            r.iter_mut().zip(&q).for_each(|(r, q)| *r -= step * q);

            let rr_next = dot(&r, &r);
            let residual = rr_next.sqrt() / g_norm;
            if residual <= tol {
                return Ok(Converged {
                    residual,
                    iterations: iteration,
                });
            }

            let ratio = rr_next / rr;
            rr = rr_next;
            p.iter_mut().zip(&r).for_each(|(p, r)| *p = r + ratio * *p);
        }

        Err(Diverged {
            residual: rr.sqrt() / g_norm,
            iterations: max_iterations,
        })
    }

    /// `x = P⁻¹ (b - Rᵀ D½ w)`.
    fn recover(&mut self, rhs: &[f64], w: &[f64], x: &mut [f64], scratch: &mut [f64]) {
        x.copy_from_slice(rhs);
        for ((node, weight), w) in self.nodes.iter().zip(&self.weights).zip(w) {
            x[*node] -= weight * w;
        }
        self.fast.solve(x, scratch);
    }
}

/// Solves `K x = rhs`. `scratch` must hold at least `n` entries.
///
/// The reported residual is the relative residual of the capacitance system.
/// A `P` that is not positive definite counts as an indefinite system and
/// fails without iterating.
pub(crate) fn solve(
    rect: &Rectangle,
    control: &Control,
    rhs: &[f64],
    x: &mut [f64],
    scratch: &mut [f64],
) -> Result<Converged, Diverged> {
    x.fill(0.0);

    if norm(rhs) == 0.0 {
        return Ok(Converged {
            residual: 0.0,
            iterations: 0,
        });
    }

    let Some(mut system) = Capacitance::new(rect, control.alpha, control.beta) else {
        return Err(Diverged {
            residual: 1.0,
            iterations: 0,
        });
    };

    let g = system.load(rhs, scratch);
    let mut w = vec![0.0; g.len()];
    let converged = if norm(&g) > 0.0 {
        system.iterate(&g, &mut w, control.tol, control.itcg, scratch)?
    } else {
        Converged {
            residual: 0.0,
            iterations: 0,
        }
    };

    system.recover(rhs, &w, x, scratch);
    Ok(converged)
}
