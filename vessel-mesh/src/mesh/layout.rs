use crate::{Error, Result};

/// How the assembler input is laid out: a trunk followed by branches.
///
/// Built from a ring-count sequence. Element `0` is the number of points per
/// half ring minus one. Every further element is one branch (the first is the
/// trunk) and counts its ring-to-ring connections, so a branch with count `k`
/// has `k + 1` rings.
///
/// # Examples
///
/// ```
/// use vessel_mesh::mesh::RingLayout;
///
/// let layout = RingLayout::new(vec![3, 4, 2, 2])?;
/// assert_eq!(layout.half_loop(), 4);
/// assert_eq!(layout.loop_len(), 6);
/// assert_eq!(layout.branch_count(), 3);
/// assert_eq!(layout.input_point_count(), 76);
/// # Ok::<(), vessel_mesh::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RingLayout {
    counts: Vec<usize>,
}

/// Where one branch's rings live in the input point array.
///
/// Ring `i` has its bottom half at `start + i * half_loop ..` (forward) and
/// its top half at `reversed_start - i * half_loop` (walked backwards).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BranchCursor {
    /// `0` for the trunk.
    pub branch: usize,
    pub start: usize,
    pub reversed_start: usize,
    /// Ring-to-ring connections, one less than the number of rings.
    pub ring_count: usize,
}

impl RingLayout {
    pub fn new(counts: Vec<usize>) -> Result<Self> {
        if counts.len() < 2 {
            return Err(Error::InvalidRingCounts(format!(
                "need the half ring size and at least one branch, got {} values",
                counts.len()
            )));
        }
        if counts[0] < 2 {
            return Err(Error::InvalidRingCounts(format!(
                "a ring needs at least 4 points, half ring size {} gives {}",
                counts[0],
                2 * counts[0]
            )));
        }
        Ok(Self { counts })
    }

    /// The raw ring-count sequence.
    #[inline]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Points per half ring, ends included.
    #[inline]
    pub fn half_loop(&self) -> usize {
        self.counts[0] + 1
    }

    /// Points per closed ring in the output.
    #[inline]
    pub fn loop_len(&self) -> usize {
        2 * self.counts[0]
    }

    /// Number of branches, trunk included.
    #[inline]
    pub fn branch_count(&self) -> usize {
        self.counts.len() - 1
    }

    /// Ring-to-ring connections of `branch` (`0` is the trunk).
    #[inline]
    pub fn ring_count(&self, branch: usize) -> Option<usize> {
        self.counts.get(branch + 1).copied()
    }

    /// Number of points the assembler expects.
    ///
    /// Every branch after the trunk reuses one half ring of its predecessor.
    pub fn input_point_count(&self) -> usize {
        let half_rings: usize = self.counts[1..].iter().map(|count| 2 * (count + 1)).sum();
        let shared = if self.branch_count() > 1 {
            self.branch_count()
        } else {
            0
        };
        self.half_loop() * (half_rings - shared)
    }

    /// Number of quads the assembler emits.
    pub fn quad_count(&self) -> usize {
        self.counts[1..].iter().sum::<usize>() * self.loop_len()
    }

    /// Cursors of all branches, trunk first.
    pub fn branches(&self) -> Vec<BranchCursor> {
        let h = self.half_loop();
        let trunk = BranchCursor {
            branch: 0,
            start: 0,
            reversed_start: self.input_point_count() - 1,
            ring_count: self.counts[1],
        };

        let followers = (1..self.branch_count()).scan(trunk, |cursor, branch| {
            // The trunk only has its bottom halves up front.
            let span = if branch == 1 {
                h * (self.counts[1] + 1)
            } else {
                2 * h * (self.counts[branch] + 1)
            };
            let ring_count = self.counts[branch + 1];
            let start = cursor.start + span - h;
            *cursor = BranchCursor {
                branch,
                start,
                reversed_start: start + 2 * h * (ring_count + 1) - 1,
                ring_count,
            };
            Some(*cursor)
        });

        std::iter::once(trunk).chain(followers).collect()
    }

    /// Closed form of [`BranchCursor::start`] for `branch ≥ 1`.
    pub fn branch_start(&self, branch: usize) -> Option<usize> {
        if branch == 0 {
            return Some(0);
        }
        if branch >= self.branch_count() {
            return None;
        }
        let h = self.half_loop();
        let later: usize = self.counts[2..=branch]
            .iter()
            .map(|count| 2 * h * (count + 1))
            .sum();
        Some(h * (self.counts[1] + 1) + later - branch * h)
    }
}
