//! Perimeter bookkeeping.
//!
//! The perimeter of an `M × N` patch is walked once: bottom (`y = y0`, left
//! to right), right (`x = x1`, bottom to top), top (`y = y1`, right to left),
//! left (`x = x0`, top to bottom). Every corner is the first point of the
//! segment it starts.
use derive_more::Display;
use vessel_mesh_dbihar::EdgeDerivatives;

use super::{Axis, Patch};

/// One of the four perimeter segments.
#[derive(Display, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    #[display("bottom")]
    Bottom,
    #[display("right")]
    Right,
    #[display("top")]
    Top,
    #[display("left")]
    Left,
}

/// Where a perimeter point lands in the grid buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundaryLocation {
    /// Index into the row-major grid buffer with stride `M + 1`.
    pub f_index: usize,
    pub segment: Segment,
}

/// Segment and position within it, counted in walk direction.
#[inline]
fn segment_of(patch: &Patch, p_id: usize) -> Option<(Segment, usize)> {
    let (m, n) = (patch.m_quads, patch.n_quads);

    if p_id < m {
        Some((Segment::Bottom, p_id))
    } else if p_id < m + n {
        Some((Segment::Right, p_id - m))
    } else if p_id < 2 * m + n {
        Some((Segment::Top, p_id - m - n))
    } else if p_id < 2 * (m + n) {
        Some((Segment::Left, p_id - 2 * m - n))
    } else {
        None
    }
}

/// Maps perimeter index `p_id` to its grid cell.
///
/// Returns `None` for `p_id ≥ 2 (M + N)`.
pub fn locate(patch: &Patch, p_id: usize) -> Option<BoundaryLocation> {
    let (m, n) = (patch.m_quads, patch.n_quads);
    let stride = patch.row_stride();

    segment_of(patch, p_id).map(|(segment, offset)| {
        let f_index = match segment {
            Segment::Bottom => offset,
            Segment::Right => offset * stride + m,
            // Top and left run backwards.
            Segment::Top => offset.abs_diff(m) + n * stride,
            Segment::Left => offset.abs_diff(n) * stride,
        };
        BoundaryLocation { f_index, segment }
    })
}

/// Edge derivative data for one axis, in the layout the solver expects.
///
/// `bda`/`bdb` run along the left/right edges (`N - 1` values, bottom to
/// top), `bdc`/`bdd` along the bottom/top edges (`M - 1` values, left to
/// right). Corners are never stored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DerivativeArrays {
    pub bda: Vec<f64>,
    pub bdb: Vec<f64>,
    pub bdc: Vec<f64>,
    pub bdd: Vec<f64>,
}

impl DerivativeArrays {
    /// All-zero arrays sized for `patch`.
    pub fn zeroed(patch: &Patch) -> Self {
        Self {
            bda: vec![0.0; patch.n_dim()],
            bdb: vec![0.0; patch.n_dim()],
            bdc: vec![0.0; patch.m_dim()],
            bdd: vec![0.0; patch.m_dim()],
        }
    }

    /// Fills the arrays from the `axis` component of the per-point
    /// derivatives. `None` yields zeros.
    pub fn extract(patch: &Patch, derivatives: Option<&[[f64; 3]]>, axis: Axis) -> Self {
        let mut arrays = Self::zeroed(patch);
        if let Some(derivatives) = derivatives {
            for (p_id, derivative) in derivatives.iter().enumerate() {
                arrays.insert(patch, p_id, derivative[axis.index()]);
            }
        }
        arrays
    }

    /// Stores the derivative of perimeter point `p_id`.
    ///
    /// Returns `false` if the point is a corner or off the perimeter, in
    /// which case nothing is stored.
    pub fn insert(&mut self, patch: &Patch, p_id: usize, value: f64) -> bool {
        let (m, n) = (patch.m_quads, patch.n_quads);

        let Some((segment, offset)) = segment_of(patch, p_id) else {
            return false;
        };
        if offset == 0 {
            return false;
        }

        let (array, local) = match segment {
            Segment::Bottom => (&mut self.bdc, offset - 1),
            Segment::Right => (&mut self.bdb, offset - 1),
            Segment::Top => (&mut self.bdd, offset.abs_diff(m) - 1),
            Segment::Left => (&mut self.bda, offset.abs_diff(n) - 1),
        };
        match array.get_mut(local) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Borrowed view for the solver.
    #[inline]
    pub fn as_edges(&self) -> EdgeDerivatives<'_> {
        EdgeDerivatives {
            bda: &self.bda,
            bdb: &self.bdb,
            bdc: &self.bdc,
            bdd: &self.bdd,
        }
    }
}
