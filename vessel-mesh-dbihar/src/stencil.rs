//! The 13-point discretization of `Δ²u + α Δu + β u`.
//!
//! Nodes are addressed with signed `(i, j)`: `1..=m` × `1..=n` is the
//! interior, `0` and `m + 1` (resp. `n + 1`) the boundary, `-1` and `m + 2`
//! (resp. `n + 2`) the ghost columns/rows that carry the clamped condition.
//! Ghost values come from central differences of the edge derivatives, e.g.
//! `u(-1, j) = u(1, j) - 2 hx bda[j - 1]`.
use crate::{EdgeDerivatives, Rectangle};

/// Stencil weights around the centre node.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Coefficients {
    pub center: f64,
    couplings: [(isize, isize, f64); 12],
}

impl Coefficients {
    pub fn new(hx: f64, hy: f64, alpha: f64, beta: f64) -> Self {
        let ax = 1.0 / (hx * hx);
        let ay = 1.0 / (hy * hy);
        let axy = ax * ay;

        let x1 = -4.0 * ax * ax - 4.0 * axy + alpha * ax;
        let y1 = -4.0 * ay * ay - 4.0 * axy + alpha * ay;
        let x2 = ax * ax;
        let y2 = ay * ay;
        let xy = 2.0 * axy;

        Self {
            center: 6.0 * ax * ax + 8.0 * axy + 6.0 * ay * ay - 2.0 * alpha * (ax + ay) + beta,
            couplings: [
                (-1, 0, x1),
                (1, 0, x1),
                (0, -1, y1),
                (0, 1, y1),
                (-2, 0, x2),
                (2, 0, x2),
                (0, -2, y2),
                (0, 2, y2),
                (-1, -1, xy),
                (1, -1, xy),
                (-1, 1, xy),
                (1, 1, xy),
            ],
        }
    }

    /// Off-centre `(di, dj, weight)` triples.
    #[inline]
    pub fn couplings(&self) -> &[(isize, isize, f64); 12] {
        &self.couplings
    }
}

/// Applies the discrete operator on an extended grid that includes ghosts.
pub(crate) struct Stencil {
    m: usize,
    n: usize,
    hx: f64,
    hy: f64,
    coefficients: Coefficients,
    ext: Vec<f64>,
}

impl Stencil {
    pub fn new(rect: &Rectangle, alpha: f64, beta: f64) -> Self {
        let (hx, hy) = rect.spacing();

        Self {
            m: rect.m,
            n: rect.n,
            hx,
            hy,
            coefficients: Coefficients::new(hx, hy, alpha, beta),
            ext: vec![0.0; (rect.m + 4) * (rect.n + 4)],
        }
    }

    #[inline]
    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    #[inline]
    fn at(&self, i: isize, j: isize) -> usize {
        (j + 1) as usize * (self.m + 4) + (i + 1) as usize
    }

    /// Interior position of node `(i, j)`, `1 ≤ i ≤ m`, `1 ≤ j ≤ n`.
    #[inline]
    pub fn interior(&self, i: isize, j: isize) -> usize {
        (j - 1) as usize * self.m + (i - 1) as usize
    }

    /// `out = K x` for the homogeneous problem (zero boundary values, zero
    /// edge derivatives).
    pub fn apply(&mut self, x: &[f64], out: &mut [f64]) {
        self.ext.fill(0.0);
        for j in 1..=self.n as isize {
            for i in 1..=self.m as isize {
                let at = self.at(i, j);
                self.ext[at] = x[self.interior(i, j)];
            }
        }
        self.mirror_ghosts(None);
        self.evaluate(out);
    }

    /// Contribution of the boundary values in `f` and of the edge derivatives
    /// to every interior equation. The interior of `f` is ignored.
    pub fn boundary_load(&mut self, f: &[f64], idf: usize, edges: &EdgeDerivatives<'_>) -> Vec<f64> {
        let (m, n) = (self.m as isize, self.n as isize);

        self.ext.fill(0.0);
        for j in 0..=n + 1 {
            for i in 0..=m + 1 {
                if i == 0 || j == 0 || i == m + 1 || j == n + 1 {
                    let at = self.at(i, j);
                    self.ext[at] = f[j as usize * idf + i as usize];
                }
            }
        }
        self.mirror_ghosts(Some(edges));

        let mut load = vec![0.0; self.m * self.n];
        self.evaluate(&mut load);
        load
    }

    fn mirror_ghosts(&mut self, edges: Option<&EdgeDerivatives<'_>>) {
        let (m, n) = (self.m as isize, self.n as isize);
        let (two_hx, two_hy) = (2.0 * self.hx, 2.0 * self.hy);

        for j in 1..=n {
            let row = (j - 1) as usize;
            let (da, db) = edges.map_or((0.0, 0.0), |e| (e.bda[row], e.bdb[row]));
            let left = self.ext[self.at(1, j)] - two_hx * da;
            let right = self.ext[self.at(m, j)] + two_hx * db;
            let (l, r) = (self.at(-1, j), self.at(m + 2, j));
            self.ext[l] = left;
            self.ext[r] = right;
        }

        for i in 1..=m {
            let col = (i - 1) as usize;
            let (dc, dd) = edges.map_or((0.0, 0.0), |e| (e.bdc[col], e.bdd[col]));
            let bottom = self.ext[self.at(i, 1)] - two_hy * dc;
            let top = self.ext[self.at(i, n)] + two_hy * dd;
            let (b, t) = (self.at(i, -1), self.at(i, n + 2));
            self.ext[b] = bottom;
            self.ext[t] = top;
        }
    }

    fn evaluate(&self, out: &mut [f64]) {
        for j in 1..=self.n as isize {
            for i in 1..=self.m as isize {
                let mut sum = self.coefficients.center * self.ext[self.at(i, j)];
                for &(di, dj, weight) in self.coefficients.couplings() {
                    sum += weight * self.ext[self.at(i + di, j + dj)];
                }
                out[self.interior(i, j)] = sum;
            }
        }
    }
}

#[inline]
pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[inline]
pub(crate) fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}
