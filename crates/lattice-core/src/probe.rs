// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Probe arena: struct-of-arrays storage keyed by stable indices.
//!
//! Original positions change only through [`ProbeArena::rebaseline`]; drag
//! movement writes current positions only.

use lattice_geom::{LatticeGeometry, Vec3};

use crate::error::ExperimentError;
use crate::history::DisplacementSource;

/// Ring offsets `(dcol, drow)` in probe-index order (row-major from the
/// lowest row, center skipped).
const RING_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Read-only view of one probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeView {
    /// Stable index.
    pub index: usize,
    /// Lattice cell `(col, row)` the probe was placed on.
    pub cell: (usize, usize),
    /// Baseline position; `None` if the lattice had no point at `cell`.
    pub original: Option<Vec3>,
    /// Position after the latest committed tick.
    pub current: Vec3,
    /// `true` for the single selected probe.
    pub is_selected: bool,
    /// Terminal marker set by `complete_selected`.
    pub is_completed: bool,
}

/// All probes of one experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeArena {
    cells: Vec<(usize, usize)>,
    original: Vec<Option<Vec3>>,
    current: Vec<Vec3>,
    completed: Vec<bool>,
    selected: Option<usize>,
}

impl ProbeArena {
    /// Places eight probes on the 3×3-minus-center ring around the lattice
    /// center, `spacing_cells` cells apart.
    ///
    /// Spacing is limited to `1..=grid_size / 2` and cells are clamped into
    /// the lattice. A probe whose cell has no published point gets no
    /// original position and starts on the ideal regular-grid position.
    pub fn ring(geometry: &LatticeGeometry, spacing_cells: usize) -> Self {
        let max_index = geometry.grid_size();
        let spacing = spacing_cells.clamp(1, (max_index / 2).max(1));
        let (center_col, center_row) = geometry.center_cell();
        let origin = geometry.origin();
        let cell = geometry.cell_size();

        let mut arena = Self::with_capacity(RING_OFFSETS.len());
        for (dc, dr) in RING_OFFSETS {
            let col = offset_index(center_col, dc, spacing, max_index);
            let row = offset_index(center_row, dr, spacing, max_index);
            let original = geometry.point(row, col);
            #[allow(clippy::cast_precision_loss)]
            let ideal = Vec3::new(
                origin.x() + col as f32 * cell,
                origin.y() + row as f32 * cell,
                origin.z(),
            );
            arena.push((col, row), original, original.unwrap_or(ideal));
        }
        arena
    }

    /// Builds an arena from explicit `(cell, original)` placements.
    pub fn from_placements<I>(placements: I) -> Self
    where
        I: IntoIterator<Item = ((usize, usize), Vec3)>,
    {
        let mut arena = Self::with_capacity(0);
        for (cell, original) in placements {
            arena.push(cell, Some(original), original);
        }
        arena
    }

    fn with_capacity(n: usize) -> Self {
        Self {
            cells: Vec::with_capacity(n),
            original: Vec::with_capacity(n),
            current: Vec::with_capacity(n),
            completed: Vec::with_capacity(n),
            selected: None,
        }
    }

    fn push(&mut self, cell: (usize, usize), original: Option<Vec3>, current: Vec3) {
        self.cells.push(cell);
        self.original.push(original);
        self.current.push(current);
        self.completed.push(false);
    }

    /// Number of probes.
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// `true` if the arena holds no probes.
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Bounds-checks `index`.
    pub fn check(&self, index: usize) -> Result<usize, ExperimentError> {
        if index < self.len() {
            Ok(index)
        } else {
            Err(ExperimentError::InvalidIndex {
                index,
                len: self.len(),
            })
        }
    }

    /// Snapshot view of probe `index`.
    pub fn view(&self, index: usize) -> Result<ProbeView, ExperimentError> {
        let index = self.check(index)?;
        Ok(ProbeView {
            index,
            cell: self.cells[index],
            original: self.original[index],
            current: self.current[index],
            is_selected: self.selected == Some(index),
            is_completed: self.completed[index],
        })
    }

    /// Baseline position of `index`.
    pub fn original(&self, index: usize) -> Option<Vec3> {
        self.original.get(index).copied().flatten()
    }

    /// Current position of `index`.
    pub fn current(&self, index: usize) -> Option<Vec3> {
        self.current.get(index).copied()
    }

    /// Lattice cell of `index`.
    pub fn cell(&self, index: usize) -> Option<(usize, usize)> {
        self.cells.get(index).copied()
    }

    /// Commits a new current position.
    pub fn set_current(&mut self, index: usize, position: Vec3) -> Result<(), ExperimentError> {
        let index = self.check(index)?;
        self.current[index] = position;
        Ok(())
    }

    /// Replaces both original and current position.
    pub fn rebaseline(&mut self, index: usize, position: Vec3) -> Result<(), ExperimentError> {
        let index = self.check(index)?;
        self.original[index] = Some(position);
        self.current[index] = position;
        Ok(())
    }

    /// Index of the selected probe.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: Option<usize>) {
        self.selected = selected;
    }

    /// `true` if `index` has been completed.
    pub fn is_completed(&self, index: usize) -> bool {
        self.completed.get(index).copied().unwrap_or(false)
    }

    pub(crate) fn mark_completed(&mut self, index: usize) -> Result<(), ExperimentError> {
        let index = self.check(index)?;
        self.completed[index] = true;
        Ok(())
    }

    /// Nearest probe to `point` in the lattice plane within `radius`.
    /// Ties go to the lower index.
    pub fn nearest_within(&self, point: Vec3, radius: f32) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, p) in self.current.iter().enumerate() {
            let d = p.planar_distance(&point);
            if d > radius {
                continue;
            }
            match best {
                Some((_, bd)) if d >= bd => {}
                _ => best = Some((i, d)),
            }
        }
        best.map(|(i, _)| i)
    }
}

impl DisplacementSource for ProbeArena {
    fn probe_count(&self) -> usize {
        self.len()
    }

    fn original_position(&self, index: usize) -> Option<Vec3> {
        self.original(index)
    }

    fn current_position(&self, index: usize) -> Option<Vec3> {
        self.current(index)
    }
}

fn offset_index(center: usize, direction: isize, spacing: usize, max_index: usize) -> usize {
    let step = spacing.min(max_index);
    match direction {
        d if d < 0 => center.saturating_sub(step),
        0 => center,
        _ => center.saturating_add(step).min(max_index),
    }
}
