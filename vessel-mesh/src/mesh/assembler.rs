//! Ring walking.
//!
//! Each branch is a stack of rings. A ring is split into a bottom half, read
//! forward from the input, and a top half, read backwards; the two halves
//! share their end points. Consecutive rings are joined by a band of quads.
//!
//! Every input point maps to at most one output point. Top half ends are
//! aliased to the bottom half ends, and a branch's first ring reuses the
//! points its predecessor already emitted, so seams and junctions come out
//! connected.
use super::{BranchCursor, QuadMesh, RingLayout};
use crate::{Error, Index, Progress, Result, Silent};

/// Assembles the input points of a trunk and its branches into one mesh.
///
/// `points` must hold [`RingLayout::input_point_count()`] points.
///
/// # Examples
///
/// ```
/// use vessel_mesh::mesh::{RingLayout, assemble_mesh};
///
/// // One tube, 6 points around, 6 rings.
/// let layout = RingLayout::new(vec![3, 5])?;
/// let points = vec![[0.0; 3]; layout.input_point_count()];
///
/// let mesh = assemble_mesh(&layout, &points)?;
/// assert_eq!(mesh.point_count(), 36);
/// assert_eq!(mesh.quad_count(), 30);
/// # Ok::<(), vessel_mesh::Error>(())
/// ```
pub fn assemble_mesh(layout: &RingLayout, points: &[[f64; 3]]) -> Result<QuadMesh> {
    assemble_mesh_with_progress(layout, points, &mut Silent)
}

/// [`assemble_mesh()`] reporting progress after every tenth of the rings.
pub fn assemble_mesh_with_progress(
    layout: &RingLayout,
    points: &[[f64; 3]],
    progress: &mut impl Progress,
) -> Result<QuadMesh> {
    let expected = layout.input_point_count();
    if points.len() != expected {
        return Err(Error::InputPointCount {
            expected,
            actual: points.len(),
        });
    }

    let mut walker = Walker {
        points,
        slots: vec![None; points.len()],
        mesh: QuadMesh::with_capacity(points.len(), layout.quad_count()),
    };

    let branches = layout.branches();
    let total_rings: usize = branches.iter().map(|cursor| cursor.ring_count + 1).sum();
    let step = (total_rings / 10).max(1);
    let mut rings_done = 0;

    for cursor in branches {
        let quads_before = walker.mesh.quad_count();
        let mut previous: Option<Vec<Index>> = None;

        for ring in 0..=cursor.ring_count {
            let current = walker.ring(layout, &cursor, ring);
            if let Some(previous) = &previous {
                walker.connect(previous, &current, cursor.branch as u32);
            }
            previous = Some(current);

            rings_done += 1;
            if rings_done % step == 0 || rings_done == total_rings {
                progress.report(rings_done as f64 / total_rings as f64);
            }
        }

        log::debug!(
            "branch {}: {} rings, {} quads, {} points so far",
            cursor.branch,
            cursor.ring_count + 1,
            walker.mesh.quad_count() - quads_before,
            walker.mesh.point_count()
        );
    }

    let mesh = walker.mesh;

    #[cfg(feature = "topology_validation")]
    mesh.validate()?;

    Ok(mesh)
}

struct Walker<'a> {
    points: &'a [[f64; 3]],
    /// Output index of every input point, once emitted or aliased.
    slots: Vec<Option<Index>>,
    mesh: QuadMesh,
}

impl Walker<'_> {
    fn emit(&mut self, input: usize) -> Index {
        match self.slots[input] {
            Some(index) => index,
            None => {
                let index = self.mesh.push_point(self.points[input]);
                self.slots[input] = Some(index);
                index
            }
        }
    }

    fn alias(&mut self, input: usize, target: Index) {
        if self.slots[input].is_none() {
            self.slots[input] = Some(target);
        }
    }

    /// Output indices of one closed ring: the bottom half in order, then the
    /// interior of the top half in walk order.
    fn ring(&mut self, layout: &RingLayout, cursor: &BranchCursor, ring: usize) -> Vec<Index> {
        let h = layout.half_loop();
        let bottom = cursor.start + ring * h;
        let top = cursor.reversed_start - ring * h;

        let mut indices = Vec::with_capacity(layout.loop_len());
        for input in bottom..bottom + h {
            let index = self.emit(input);
            indices.push(index);
        }

        self.alias(top, indices[h - 1]);
        self.alias(top + 1 - h, indices[0]);

        for input in (top + 2 - h..top).rev() {
            let index = self.emit(input);
            indices.push(index);
        }
        indices
    }

    fn connect(&mut self, current: &[Index], next: &[Index], label: u32) {
        let len = current.len();
        for c in 0..len {
            let d = (c + 1) % len;
            self.mesh
                .push_quad([current[c], current[d], next[d], next[c]], label);
        }
    }
}
