#![cfg_attr(docsrs, feature(doc_cfg))]
//! # Vessel Mesh
//!
//! Smooth quadrilateral surface meshes for tubular, branching structures
//! (vessel-like geometry).
//!
//! Meshing happens in two stages:
//!
//! 1. [`patch`] – every rectangular parameter patch is filled in by solving a
//!    clamped biharmonic boundary-value problem once per coordinate axis. The
//!    input is the ordered perimeter of the patch plus, optionally, one
//!    derivative vector per perimeter point.
//! 2. [`mesh`] – the solved patches of a trunk and its branches are stitched
//!    into a single connected [`QuadMesh`](mesh::QuadMesh). Points shared
//!    between the two halves of a ring, between consecutive rings and at
//!    branch junctions are emitted once. Every quad carries the id of the
//!    branch that produced it.
//!
//! The numerics live in the [`vessel_mesh_dbihar`] crate and are reached
//! through the [`BiharmonicSolver`](patch::BiharmonicSolver) trait, so a
//! different implementation of the same calling contract can be plugged in.
//!
//! ## Example
//!
//! ```
//! use vessel_mesh::patch::{Patch, SolveOptions, solve_patch};
//!
//! // Unit square, 4 × 4 quads. The perimeter runs bottom, right, top, left.
//! let patch = Patch::unit(4, 4);
//! let boundary: Vec<[f64; 3]> = (0..patch.boundary_len())
//!     .map(|p_id| {
//!         let t = (p_id % 4) as f64 / 4.0;
//!         match p_id / 4 {
//!             0 => [t, 0.0, 0.0],
//!             1 => [1.0, t, 0.0],
//!             2 => [1.0 - t, 1.0, 0.0],
//!             _ => [0.0, 1.0 - t, 0.0],
//!         }
//!     })
//!     .collect();
//!
//! let solved = solve_patch(&boundary, None, &patch, &SolveOptions::default())?;
//! assert_eq!(solved.points().len(), 25);
//! # Ok::<(), vessel_mesh::Error>(())
//! ```
//!
//! ## Cargo Features
#![doc = document_features::document_features!()]

pub mod error;
pub mod mesh;
pub mod patch;
pub mod progress;

#[cfg(feature = "tri_mesh_buffers")]
pub mod tri_mesh_buffers;

pub use error::{Error, Result};
pub use progress::{Progress, Silent};

/// Name of the per-point derivative attribute consumed by the patch solver.
pub const DERIVATIVES_ATTRIBUTE: &str = "derivatives";

/// Name of the per-quad branch label attribute produced by the assembler.
pub const BRANCH_ID_ATTRIBUTE: &str = "branchId";

/// A point index in an assembled mesh.
///
/// # Examples
///
/// ```
/// use vessel_mesh::Index;
///
/// let idx = Index::from(42u32);
/// assert_eq!(idx.0, 42);
///
/// let as_usize: usize = Index::from(100usize).into();
/// assert_eq!(as_usize, 100);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, bytemuck::Pod, bytemuck::Zeroable,
)]
#[repr(transparent)]
pub struct Index(pub u32);

impl From<u32> for Index {
    fn from(value: u32) -> Self {
        Index(value)
    }
}

impl From<Index> for u32 {
    fn from(index: Index) -> Self {
        index.0
    }
}

impl From<usize> for Index {
    fn from(value: usize) -> Self {
        Index(value as u32)
    }
}

impl From<Index> for usize {
    fn from(index: Index) -> Self {
        index.0 as usize
    }
}
