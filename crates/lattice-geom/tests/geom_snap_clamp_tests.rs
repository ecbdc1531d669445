// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs, clippy::float_cmp)]
//! Property tests for grid-line snapping and rectangle clamping.

use lattice_geom::{AxisMode, GridLines, LatticeGeometry, Rect, Vec3};
use proptest::prelude::*;

fn lattice_lines() -> GridLines {
    GridLines::from_geometry(&LatticeGeometry::regular(
        1.0,
        8,
        Vec3::new(4.0, 4.0, 0.0),
    ))
}

#[test]
fn lines_follow_origin_and_cell_size() {
    let lines = lattice_lines();
    assert_eq!(lines.xs().len(), 9);
    assert_eq!(lines.ys().len(), 9);
    assert_eq!(lines.xs().first().copied(), Some(0.0));
    assert_eq!(lines.ys().last().copied(), Some(8.0));
}

#[test]
fn off_center_lattice_lines_start_at_origin() {
    let g = LatticeGeometry::regular(0.5, 4, Vec3::new(-1.0, 3.0, 0.0));
    let lines = GridLines::from_geometry(&g);
    assert_eq!(lines.xs(), &[-2.0, -1.5, -1.0, -0.5, 0.0]);
    assert_eq!(lines.ys(), &[2.0, 2.5, 3.0, 3.5, 4.0]);
}

proptest! {
    #[test]
    fn snapping_is_idempotent(x in -4.0f32..12.0, y in -4.0f32..12.0, horizontal in any::<bool>()) {
        let lines = lattice_lines();
        let mode = if horizontal { AxisMode::Horizontal } else { AxisMode::Vertical };
        let once = lines.snap(Vec3::new(x, y, 0.0), mode);
        let twice = lines.snap(once.position, mode);
        prop_assert_eq!(once.position, twice.position);
        prop_assert_eq!(once.line_index, twice.line_index);
    }

    #[test]
    fn snapped_coordinate_is_a_grid_line(x in -4.0f32..12.0, y in -4.0f32..12.0) {
        let lines = lattice_lines();
        let snapped = lines.snap(Vec3::new(x, y, 0.0), AxisMode::Horizontal);
        prop_assert!(lines.ys().contains(&snapped.position.y()));
        prop_assert_eq!(snapped.position.x(), x);
    }

    #[test]
    fn clamp_is_identity_inside(x in 0.1f32..7.9, y in 0.1f32..7.9) {
        let rect = Rect::new(0.1, 7.9, 0.1, 7.9);
        let p = Vec3::new(x, y, 0.0);
        let c = rect.clamp(p);
        prop_assert_eq!(c.position, p);
        prop_assert!(c.is_unchanged());
    }

    #[test]
    fn clamp_is_idempotent(
        x in -20.0f32..20.0,
        y in -20.0f32..20.0,
        min_x in -5.0f32..5.0,
        max_x in -5.0f32..5.0,
        min_y in -5.0f32..5.0,
        max_y in -5.0f32..5.0,
    ) {
        // Crossed rectangles included on purpose.
        let rect = Rect::new(min_x, max_x, min_y, max_y);
        let once = rect.clamp(Vec3::new(x, y, 1.0)).position;
        let twice = rect.clamp(once).position;
        prop_assert_eq!(once, twice);
    }
}
