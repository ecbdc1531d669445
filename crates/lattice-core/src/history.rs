// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Displacement history: append-only, per-iteration snapshots of every
//! tracked probe's displacement.
//!
//! # Key Types
//!
//! - [`DisplacementSource`]: where original/current positions come from.
//! - [`IterationSnapshot`]: one capture, keyed by a caller-supplied id.
//! - [`DisplacementHistory`]: the ordered, append-only store.
//!
//! Iteration ids are not unique. Capturing the same id twice stores two
//! snapshots, and lookups by id return the earliest.

use std::collections::BTreeMap;

use lattice_geom::{Tick, Vec3};
use serde::Serialize;
use tracing::debug;

use crate::displacement::ProbeDisplacement;

/// Positions of the probes being measured.
pub trait DisplacementSource {
    /// Number of tracked probes; indices run `0..probe_count()`.
    fn probe_count(&self) -> usize;
    /// Baseline position, or `None` if the source has none for `index`.
    fn original_position(&self, index: usize) -> Option<Vec3>;
    /// Position now, or `None` if unavailable.
    fn current_position(&self, index: usize) -> Option<Vec3>;
}

/// All probe displacements captured by one `capture_iteration` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationSnapshot {
    iteration: i64,
    captured_at: Tick,
    displacements: BTreeMap<usize, ProbeDisplacement>,
}

/// Aggregate view of one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SnapshotSummary {
    /// Probes measured.
    pub probes: usize,
    /// Probes whose magnitude exceeded the threshold.
    pub moved: usize,
    /// Mean displacement magnitude (0 for an empty snapshot).
    pub mean_magnitude: f32,
    /// Largest displacement magnitude (0 for an empty snapshot).
    pub max_magnitude: f32,
}

impl IterationSnapshot {
    /// Caller-supplied iteration id.
    pub fn iteration(&self) -> i64 {
        self.iteration
    }

    /// Tick at which the snapshot was taken.
    pub fn captured_at(&self) -> Tick {
        self.captured_at
    }

    /// Displacement of probe `index`, if it was measured.
    pub fn get(&self, index: usize) -> Option<&ProbeDisplacement> {
        self.displacements.get(&index)
    }

    /// Measured probes in ascending index order.
    pub fn displacements(&self) -> impl Iterator<Item = &ProbeDisplacement> {
        self.displacements.values()
    }

    /// Number of measured probes.
    pub fn len(&self) -> usize {
        self.displacements.len()
    }

    /// `true` if no probe could be measured.
    pub fn is_empty(&self) -> bool {
        self.displacements.is_empty()
    }

    /// Count, moved count, mean and max magnitude.
    pub fn summary(&self, threshold: f32) -> SnapshotSummary {
        let mut moved = 0;
        let mut sum = 0.0_f32;
        let mut max = 0.0_f32;
        for d in self.displacements.values() {
            if d.has_moved(threshold) {
                moved += 1;
            }
            sum += d.magnitude;
            max = max.max(d.magnitude);
        }
        let probes = self.displacements.len();
        #[allow(clippy::cast_precision_loss)]
        let mean_magnitude = if probes == 0 { 0.0 } else { sum / probes as f32 };
        SnapshotSummary {
            probes,
            moved,
            mean_magnitude,
            max_magnitude: max,
        }
    }
}

/// Append-only ordered sequence of [`IterationSnapshot`]s.
#[derive(Debug, Clone, Default)]
pub struct DisplacementHistory {
    snapshots: Vec<IterationSnapshot>,
}

impl DisplacementHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Measures every probe of `source` and appends one snapshot.
    ///
    /// Probes without an original or current position are skipped. Repeated
    /// ids are stored as distinct entries.
    pub fn capture_iteration<S>(
        &mut self,
        iteration: i64,
        captured_at: Tick,
        source: &S,
    ) -> &IterationSnapshot
    where
        S: DisplacementSource + ?Sized,
    {
        let mut displacements = BTreeMap::new();
        for index in 0..source.probe_count() {
            let (Some(original), Some(current)) = (
                source.original_position(index),
                source.current_position(index),
            ) else {
                debug!(index, iteration, "skipping probe without positions");
                continue;
            };
            displacements.insert(index, ProbeDisplacement::compute(index, original, current));
        }
        debug!(
            iteration,
            tick = captured_at.index(),
            probes = displacements.len(),
            "captured iteration"
        );
        let at = self.snapshots.len();
        self.snapshots.push(IterationSnapshot {
            iteration,
            captured_at,
            displacements,
        });
        &self.snapshots[at]
    }

    /// First snapshot (in insertion order) whose id is `iteration`.
    pub fn get_iteration(&self, iteration: i64) -> Option<&IterationSnapshot> {
        self.snapshots.iter().find(|s| s.iteration == iteration)
    }

    /// Most recently appended snapshot.
    pub fn latest(&self) -> Option<&IterationSnapshot> {
        self.snapshots.last()
    }

    /// Owned copy of the full ordered history.
    pub fn all(&self) -> Vec<IterationSnapshot> {
        self.snapshots.clone()
    }

    /// Displacement of probe `index` across every snapshot that measured it,
    /// as `(iteration, displacement)` pairs in insertion order.
    pub fn trajectory(&self, index: usize) -> Vec<(i64, ProbeDisplacement)> {
        self.snapshots
            .iter()
            .filter_map(|s| s.get(index).map(|d| (s.iteration, *d)))
            .collect()
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// `true` if nothing has been captured (or the history was cleared).
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Drops every snapshot.
    pub fn clear(&mut self) {
        debug!(dropped = self.snapshots.len(), "cleared displacement history");
        self.snapshots.clear();
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::expect_used)]
mod tests {
    use super::*;

    struct Fixed {
        original: Vec<Option<Vec3>>,
        current: Vec<Vec3>,
    }

    impl DisplacementSource for Fixed {
        fn probe_count(&self) -> usize {
            self.current.len()
        }
        fn original_position(&self, index: usize) -> Option<Vec3> {
            self.original.get(index).copied().flatten()
        }
        fn current_position(&self, index: usize) -> Option<Vec3> {
            self.current.get(index).copied()
        }
    }

    fn source(dx: f32) -> Fixed {
        Fixed {
            original: vec![Some(Vec3::ZERO), None, Some(Vec3::UNIT_Y)],
            current: vec![Vec3::new(dx, 0.0, 0.0), Vec3::ZERO, Vec3::UNIT_Y],
        }
    }

    #[test]
    fn capture_skips_probes_without_original() {
        let mut h = DisplacementHistory::new();
        let snap = h.capture_iteration(7, Tick::new(3), &source(1.0));
        assert_eq!(snap.len(), 2);
        assert!(snap.get(1).is_none());
        assert_eq!(snap.captured_at(), Tick::new(3));
        assert_eq!(snap.get(0).map(|d| d.magnitude), Some(1.0));
    }

    #[test]
    fn duplicate_ids_keep_both_and_lookup_returns_first() {
        let mut h = DisplacementHistory::new();
        h.capture_iteration(1, Tick::new(1), &source(0.5));
        h.capture_iteration(1, Tick::new(2), &source(2.0));
        assert_eq!(h.len(), 2);
        let first = h.get_iteration(1).expect("id 1 captured");
        assert_eq!(first.captured_at(), Tick::new(1));
        assert_eq!(first.get(0).map(|d| d.magnitude), Some(0.5));
        assert_eq!(h.latest().map(IterationSnapshot::captured_at), Some(Tick::new(2)));
        assert!(h.get_iteration(2).is_none());
    }

    #[test]
    fn all_is_a_detached_copy() {
        let mut h = DisplacementHistory::new();
        h.capture_iteration(1, Tick::new(1), &source(0.5));
        let mut copy = h.all();
        copy.clear();
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn clear_empties_history() {
        let mut h = DisplacementHistory::new();
        h.capture_iteration(1, Tick::new(1), &source(0.5));
        h.clear();
        assert!(h.latest().is_none());
        assert!(h.is_empty());
    }

    #[test]
    fn summary_and_trajectory() {
        let mut h = DisplacementHistory::new();
        h.capture_iteration(1, Tick::new(1), &source(0.005));
        h.capture_iteration(2, Tick::new(2), &source(0.5));
        let s = h.latest().expect("captured").summary(0.01);
        assert_eq!(s.probes, 2);
        assert_eq!(s.moved, 1);
        assert_eq!(s.max_magnitude, 0.5);
        assert_eq!(s.mean_magnitude, 0.25);
        let t = h.trajectory(0);
        assert_eq!(t.iter().map(|(id, _)| *id).collect::<Vec<_>>(), vec![1, 2]);
        assert!(h.trajectory(1).is_empty());
    }
}
