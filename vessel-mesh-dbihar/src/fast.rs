//! Fast solver for the simply supported operator `P = A² - αA + β` on the
//! interior nodes, where `A = -Δ_h` with homogeneous Dirichlet conditions.
//!
//! `A` is diagonalized by the orthonormal sine bases
//! `S[k][i] = sqrt(2 / (m + 1)) sin(π (k + 1) (i + 1) / (m + 1))` along `x`
//! and `y`, so `P⁻¹` is a transform, a diagonal scaling and the inverse
//! transform.
use std::f64::consts::PI;

pub(crate) struct FastSolver {
    m: usize,
    n: usize,
    sines_x: Vec<f64>,
    sines_y: Vec<f64>,
    /// `1 / (μ² - αμ + β)` per mode `(k, l)` at `l * m + k`.
    inverse: Vec<f64>,
    modes: Vec<f64>,
}

fn sine_basis(size: usize) -> Vec<f64> {
    let scale = (2.0 / (size + 1) as f64).sqrt();
    let mut basis = vec![0.0; size * size];
    for k in 0..size {
        for i in 0..size {
            basis[k * size + i] = scale * (PI * ((k + 1) * (i + 1)) as f64 / (size + 1) as f64).sin();
        }
    }
    basis
}

fn eigenvalues(size: usize, h: f64) -> Vec<f64> {
    (1..=size)
        .map(|k| {
            let s = (PI * k as f64 / (2 * (size + 1)) as f64).sin();
            4.0 * s * s / (h * h)
        })
        .collect()
}

impl FastSolver {
    /// Returns `None` unless `P` is positive definite.
    pub fn new(m: usize, n: usize, hx: f64, hy: f64, alpha: f64, beta: f64) -> Option<Self> {
        let (lx, ly) = (eigenvalues(m, hx), eigenvalues(n, hy));

        let mut inverse = Vec::with_capacity(m * n);
        for l in &ly {
            for k in &lx {
                let mu = k + l;
                let value = mu * mu - alpha * mu + beta;
                if !(value > 0.0) || !value.is_finite() {
                    return None;
                }
                inverse.push(1.0 / value);
            }
        }

        Some(Self {
            m,
            n,
            sines_x: sine_basis(m),
            sines_y: sine_basis(n),
            inverse,
            modes: vec![0.0; m * n],
        })
    }

    /// Overwrites `values` (interior layout, `x` fastest) with `P⁻¹ values`.
    ///
    /// `scratch` must hold at least `n` entries.
    pub fn solve(&mut self, values: &mut [f64], scratch: &mut [f64]) {
        let (m, n) = (self.m, self.n);

        for j in 0..n {
            let row = &values[j * m..(j + 1) * m];
            for k in 0..m {
                let basis = &self.sines_x[k * m..(k + 1) * m];
                self.modes[j * m + k] = basis.iter().zip(row).map(|(s, v)| s * v).sum();
            }
        }

        for k in 0..m {
            for l in 0..n {
                let basis = &self.sines_y[l * n..(l + 1) * n];
                let coefficient: f64 = basis
                    .iter()
                    .enumerate()
                    .map(|(j, s)| s * self.modes[j * m + k])
                    .sum();
                scratch[l] = coefficient * self.inverse[l * m + k];
            }
            // The basis is symmetric, so the same rows transform back.
            for j in 0..n {
                let basis = &self.sines_y[j * n..(j + 1) * n];
                self.modes[j * m + k] = basis.iter().zip(&scratch[..n]).map(|(s, c)| s * c).sum();
            }
        }

        for j in 0..n {
            let row = &self.modes[j * m..(j + 1) * m];
            for i in 0..m {
                let basis = &self.sines_x[i * m..(i + 1) * m];
                values[j * m + i] = basis.iter().zip(row).map(|(s, c)| s * c).sum();
            }
        }
    }
}
