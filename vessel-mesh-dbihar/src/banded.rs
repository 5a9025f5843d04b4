//! Direct solve: assemble the symmetric band of the system matrix and factor
//! it with a banded Cholesky decomposition.
//!
//! Unknown `(i, j)` lives at `(j - 1) * m + (i - 1)`, so the widest coupling,
//! `(i, j ± 2)`, sits `2 m` entries off the diagonal.
use crate::stencil::Stencil;

/// Relative pivot size below which the system counts as singular.
const SINGULAR_PIVOT: f64 = 1e-13;

pub(crate) enum FactorError {
    Negative,
    Singular,
}

/// Lower band of a symmetric matrix, row `p` stores `A[p][p - k]` at `k`.
pub(crate) struct Banded {
    size: usize,
    width: usize,
    band: Vec<f64>,
}

impl Banded {
    pub fn assemble(stencil: &Stencil, m: usize, n: usize) -> Self {
        let width = 2 * m;
        let size = m * n;
        let mut band = vec![0.0; size * (width + 1)];
        let (mi, ni) = (m as isize, n as isize);
        let coefficients = stencil.coefficients();

        for j in 1..=ni {
            for i in 1..=mi {
                let p = stencil.interior(i, j);
                band[p * (width + 1)] += coefficients.center;

                for &(di, dj, weight) in coefficients.couplings() {
                    // Ghost nodes mirror onto the first interior row/column.
                    let ci = match i + di {
                        -1 => 1,
                        c if c == mi + 2 => mi,
                        c => c,
                    };
                    let cj = match j + dj {
                        -1 => 1,
                        c if c == ni + 2 => ni,
                        c => c,
                    };
                    if ci < 1 || ci > mi || cj < 1 || cj > ni {
                        continue;
                    }
                    let q = stencil.interior(ci, cj);
                    if q <= p {
                        band[p * (width + 1) + (p - q)] += weight;
                    }
                }
            }
        }

        Self { size, width, band }
    }

    #[inline]
    fn get(&self, p: usize, q: usize) -> f64 {
        self.band[p * (self.width + 1) + (p - q)]
    }

    #[inline]
    fn set(&mut self, p: usize, q: usize, value: f64) {
        self.band[p * (self.width + 1) + (p - q)] = value;
    }

    /// In-place `L Lᵀ` factorization.
    pub fn factor(&mut self) -> Result<(), FactorError> {
        for p in 0..self.size {
            let first = p.saturating_sub(self.width);
            for q in first..=p {
                let mut sum = self.get(p, q);
                for r in first.max(q.saturating_sub(self.width))..q {
                    sum -= self.get(p, r) * self.get(q, r);
                }

                if q == p {
                    let scale = self.get(p, p).abs().max(f64::MIN_POSITIVE);
                    if !sum.is_finite() {
                        return Err(FactorError::Negative);
                    }
                    if sum.abs() <= SINGULAR_PIVOT * scale {
                        return Err(FactorError::Singular);
                    }
                    if sum < 0.0 {
                        return Err(FactorError::Negative);
                    }
                    self.set(p, p, sum.sqrt());
                } else {
                    let pivot = self.get(q, q);
                    self.set(p, q, sum / pivot);
                }
            }
        }
        Ok(())
    }

    /// Solves `L Lᵀ x = b` in place. Only valid after [`factor()`](Self::factor()).
    pub fn solve(&self, x: &mut [f64]) {
        for p in 0..self.size {
            let mut sum = x[p];
            for r in p.saturating_sub(self.width)..p {
                sum -= self.get(p, r) * x[r];
            }
            x[p] = sum / self.get(p, p);
        }

        for p in (0..self.size).rev() {
            let mut sum = x[p];
            for r in p + 1..(p + self.width + 1).min(self.size) {
                sum -= self.get(r, p) * x[r];
            }
            x[p] = sum / self.get(p, p);
        }
    }
}
