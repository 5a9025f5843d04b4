//! Branching quad meshes.
//!
//! [`assemble_mesh()`] stitches the solved point grids of a trunk and its
//! branches, described by a [`RingLayout`], into one connected [`QuadMesh`].
use std::collections::BTreeSet;

use crate::{Error, Index, Result};

mod assembler;
mod layout;

pub use assembler::{assemble_mesh, assemble_mesh_with_progress};
pub use layout::{BranchCursor, RingLayout};

/// A quad mesh with one branch label per quad.
///
/// Labels are what downstream consumers store under
/// [`BRANCH_ID_ATTRIBUTE`](crate::BRANCH_ID_ATTRIBUTE). The trunk is `0`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuadMesh {
    points: Vec<[f64; 3]>,
    quads: Vec<[Index; 4]>,
    labels: Vec<u32>,
}

impl QuadMesh {
    /// Creates a mesh from raw buffers.
    ///
    /// With the `topology_validation` feature the connectivity is checked,
    /// see [`validate()`](Self::validate()).
    pub fn new(points: Vec<[f64; 3]>, quads: Vec<[Index; 4]>, labels: Vec<u32>) -> Result<Self> {
        if quads.len() != labels.len() {
            return Err(Error::InvalidTopology(format!(
                "{} quads but {} labels",
                quads.len(),
                labels.len()
            )));
        }
        let mesh = Self {
            points,
            quads,
            labels,
        };

        #[cfg(feature = "topology_validation")]
        mesh.validate()?;

        Ok(mesh)
    }

    pub(crate) fn with_capacity(points: usize, quads: usize) -> Self {
        Self {
            points: Vec::with_capacity(points),
            quads: Vec::with_capacity(quads),
            labels: Vec::with_capacity(quads),
        }
    }

    pub(crate) fn push_point(&mut self, point: [f64; 3]) -> Index {
        self.points.push(point);
        Index::from(self.points.len() - 1)
    }

    pub(crate) fn push_quad(&mut self, quad: [Index; 4], label: u32) {
        self.quads.push(quad);
        self.labels.push(label);
    }

    #[inline]
    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    #[inline]
    pub fn quads(&self) -> &[[Index; 4]] {
        &self.quads
    }

    /// Branch id of every quad.
    #[inline]
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.quads.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Connectivity as a flat index buffer, four entries per quad.
    #[inline]
    pub fn flat_indices(&self) -> &[u32] {
        bytemuck::cast_slice(&self.quads)
    }

    /// Coordinates as a flat buffer, three entries per point.
    #[inline]
    pub fn flat_points(&self) -> &[f64] {
        bytemuck::cast_slice(&self.points)
    }

    /// Number of distinct branch labels.
    pub fn branch_count(&self) -> usize {
        self.labels.iter().collect::<BTreeSet<_>>().len()
    }

    /// Quads labeled `branch`.
    pub fn branch_quads(&self, branch: u32) -> impl Iterator<Item = &[Index; 4]> + '_ {
        self.quads
            .iter()
            .zip(&self.labels)
            .filter(move |(_, label)| **label == branch)
            .map(|(quad, _)| quad)
    }

    /// Checks that every quad references four distinct, existing points.
    pub fn validate(&self) -> Result<()> {
        for (face, quad) in self.quads.iter().enumerate() {
            for (corner, index) in quad.iter().enumerate() {
                let index = usize::from(*index);
                if index >= self.points.len() {
                    return Err(Error::IndexOutOfBounds {
                        index,
                        max: self.points.len(),
                    });
                }
                if quad[..corner].contains(&quad[corner]) {
                    return Err(Error::InvalidTopology(format!(
                        "quad {face} uses point {index} twice"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn into_parts(self) -> (Vec<[f64; 3]>, Vec<[Index; 4]>, Vec<u32>) {
        (self.points, self.quads, self.labels)
    }
}
