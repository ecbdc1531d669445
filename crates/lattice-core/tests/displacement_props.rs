// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs, clippy::float_cmp)]

use lattice_core::{has_moved, DisplacementHistory, ProbeArena, ProbeDisplacement};
use lattice_geom::{Tick, Vec3};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f32> {
    -100.0f32..100.0
}

fn point() -> impl Strategy<Value = Vec3> {
    (coord(), coord(), coord()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    #[test]
    fn displacement_to_self_is_zero(a in point()) {
        let d = ProbeDisplacement::compute(0, a, a);
        prop_assert_eq!(d.displacement, Vec3::ZERO);
        prop_assert_eq!(d.magnitude, 0.0);
        prop_assert!(!has_moved(a, a, 0.0));
    }

    #[test]
    fn magnitude_is_symmetric(a in point(), b in point()) {
        let ab = ProbeDisplacement::compute(0, a, b).magnitude;
        let ba = ProbeDisplacement::compute(0, b, a).magnitude;
        prop_assert!((ab - ba).abs() <= 1e-4 * ab.max(1.0));
    }

    #[test]
    fn history_preserves_capture_order(ids in prop::collection::vec(-5i64..5, 0..16)) {
        let arena = ProbeArena::from_placements([((0, 0), Vec3::ZERO), ((1, 0), Vec3::UNIT_X)]);
        let mut history = DisplacementHistory::new();
        for (tick, id) in (0u64..).zip(&ids) {
            history.capture_iteration(*id, Tick::new(tick), &arena);
        }
        let stored: Vec<i64> = history.all().iter().map(|s| s.iteration()).collect();
        prop_assert_eq!(&stored, &ids);
        prop_assert_eq!(history.latest().map(|s| s.iteration()), ids.last().copied());
        if let Some(first) = ids.first() {
            let found = history.get_iteration(*first).map(|s| s.captured_at());
            prop_assert_eq!(found, Some(Tick::new(0)));
        }
    }

    #[test]
    fn clear_forgets_everything(n in 0usize..8) {
        let arena = ProbeArena::from_placements([((0, 0), Vec3::ZERO)]);
        let mut history = DisplacementHistory::new();
        for i in 0..n {
            history.capture_iteration(i64::try_from(i).unwrap_or(0), Tick::new(0), &arena);
        }
        history.clear();
        prop_assert!(history.latest().is_none());
        prop_assert!(history.is_empty());
        history.capture_iteration(42, Tick::new(1), &arena);
        prop_assert_eq!(history.latest().map(|s| s.iteration()), Some(42));
    }
}
