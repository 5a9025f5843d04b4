use derive_more::Display;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use vessel_mesh_dbihar::{conjugate_gradient_workspace, direct_workspace};

use crate::{Error, Result};

/// How the biharmonic system is solved. The discriminant is the `iflag`
/// handed to the solver.
#[repr(i32)]
#[derive(
    TryFromPrimitive, IntoPrimitive, Display, Clone, Copy, Debug, Default, PartialEq, Eq, Hash,
)]
pub enum SolverMode {
    /// Conjugate gradient on the capacitance system. Cheap on memory, bounded by the
    /// iteration cap.
    #[default]
    #[display("conjugate gradient")]
    ConjugateGradient = 2,
    /// Banded Cholesky factorization.
    #[display("direct")]
    Direct = 4,
}

impl SolverMode {
    /// Decodes a raw mode flag.
    pub fn from_flag(flag: i32) -> Result<Self> {
        Self::try_from(flag).map_err(|_| Error::UnsupportedSolverMode(flag))
    }

    #[inline]
    pub fn flag(self) -> i32 {
        self.into()
    }

    /// Scratch space the solver needs for `m_dim × n_dim` interior points.
    pub fn workspace_len(self, m_dim: usize, n_dim: usize) -> usize {
        match self {
            SolverMode::ConjugateGradient => conjugate_gradient_workspace(m_dim, n_dim),
            SolverMode::Direct => direct_workspace(m_dim, n_dim),
        }
    }
}
