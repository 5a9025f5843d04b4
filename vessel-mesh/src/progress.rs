//! Progress reporting.
//!
//! Long running operations take a `&mut impl Progress` and report the
//! completed fraction in `[0, 1]`. Any `FnMut(f64)` closure works:
//!
//! ```
//! use vessel_mesh::mesh::{RingLayout, assemble_mesh_with_progress};
//!
//! let layout = RingLayout::new(vec![3, 1])?;
//! let points = vec![[0.0; 3]; layout.input_point_count()];
//!
//! let mut seen = Vec::new();
//! let mut sink = |fraction: f64| seen.push(fraction);
//! assemble_mesh_with_progress(&layout, &points, &mut sink)?;
//! assert_eq!(seen.last(), Some(&1.0));
//! # Ok::<(), vessel_mesh::Error>(())
//! ```

/// Receives the completed fraction of an operation.
pub trait Progress {
    fn report(&mut self, fraction: f64);
}

impl<F: FnMut(f64)> Progress for F {
    #[inline]
    fn report(&mut self, fraction: f64) {
        log::trace!("progress {:.0}%", fraction * 100.0);
        self(fraction)
    }
}

/// Discards all progress updates.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl Progress for Silent {
    #[inline]
    fn report(&mut self, fraction: f64) {
        log::trace!("progress {:.0}%", fraction * 100.0);
    }
}
