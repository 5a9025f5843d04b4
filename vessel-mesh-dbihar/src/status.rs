use derive_more::Display;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Solve with conjugate gradients on the capacitance system.
pub const IFLAG_CONJUGATE_GRADIENT: i32 = 2;
/// Solve with a direct (banded Cholesky) factorization.
pub const IFLAG_DIRECT: i32 = 4;

/// Non-positive return codes of [`dbihar()`](crate::dbihar()).
///
/// A positive `iflag` on return means success. Everything else maps to one of
/// these variants.
#[repr(i32)]
#[derive(TryFromPrimitive, IntoPrimitive, Display, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    /// Never produced by this implementation; kept so a zero from another
    /// implementation of the contract decodes to something.
    #[display("zero return from dbihar is unexpected")]
    Unexpected = 0,
    /// `m` and/or `n` is even or less than 3.
    #[display("n and/or m is even or less than 3")]
    InvalidDimensions = -1,
    /// `a >= b` and/or `c >= d`.
    #[display("a >= b and/or c >= d")]
    InvalidDomain = -2,
    /// `idf < m + 2`, a buffer is too short, or the workspace is too small for
    /// the requested mode.
    #[display("idf < m + 2 or lw is too small")]
    InsufficientStorage = -3,
    /// A negative pivot showed up in the Cholesky factorization.
    #[display("failure in cholesky-factorization, check input carefully")]
    FactorizationFailed = -4,
    /// A pivot vanished: the system is computationally singular.
    #[display("computationally singular system")]
    SingularSystem = -5,
    /// The conjugate gradient iteration did not reach the tolerance within the
    /// iteration cap, or the system is indefinite. Try [`IFLAG_DIRECT`].
    #[display("conjugate gradient iteration failed to converge, try iflag = 4")]
    NotConverged = -6,
}

impl Status {
    /// Raw code as returned in [`Outcome::iflag`](crate::Outcome::iflag).
    #[inline]
    pub fn code(self) -> i32 {
        self.into()
    }
}

/// Workspace length [`IFLAG_CONJUGATE_GRADIENT`] needs for `m × n` interior
/// nodes.
#[inline]
pub fn conjugate_gradient_workspace(m: usize, n: usize) -> usize {
    (7 * n).max(3 * m) + 2 * (n + m) + 19
}

/// Workspace length [`IFLAG_DIRECT`] needs for `m × n` interior nodes.
#[inline]
pub fn direct_workspace(m: usize, n: usize) -> usize {
    (3 * m).max(4 * n) + 4 * n + 2 * m + (n + 1) * (n + 1) / 2 + 19
}

/// Minimum workspace length for `iflag` with `m × n` interior nodes.
///
/// Returns `None` for modes this implementation does not provide.
pub fn required_workspace(iflag: i32, m: usize, n: usize) -> Option<usize> {
    match iflag {
        IFLAG_CONJUGATE_GRADIENT => Some(conjugate_gradient_workspace(m, n)),
        IFLAG_DIRECT => Some(direct_workspace(m, n)),
        _ => None,
    }
}
