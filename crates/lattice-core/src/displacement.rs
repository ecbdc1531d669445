// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Displacement calculator: offset between a probe's original and current
//! position.

use lattice_geom::{Vec2, Vec3};
use serde::Serialize;

/// Magnitude above which a probe is considered to have moved.
pub const DEFAULT_MOVE_THRESHOLD: f32 = 0.01;

/// Offset of one probe from its original position.
///
/// Derived on demand and never cached by the arena; history snapshots own
/// their copies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProbeDisplacement {
    /// Probe index.
    pub index: usize,
    /// Original (baseline) position.
    pub original: Vec3,
    /// Position at measurement time.
    pub current: Vec3,
    /// `current - original`.
    pub displacement: Vec3,
    /// Planar projection of `displacement` (depth dropped).
    pub displacement_2d: Vec2,
    /// Euclidean norm of the 3D `displacement`.
    pub magnitude: f32,
}

impl ProbeDisplacement {
    /// Measures probe `index` between `original` and `current`.
    pub fn compute(index: usize, original: Vec3, current: Vec3) -> Self {
        let displacement = current.sub(&original);
        Self {
            index,
            original,
            current,
            displacement,
            displacement_2d: displacement.xy(),
            magnitude: displacement.length(),
        }
    }

    /// `true` when the magnitude exceeds `threshold`.
    pub fn has_moved(&self, threshold: f32) -> bool {
        self.magnitude > threshold
    }
}

/// Shorthand for `ProbeDisplacement::compute(..).has_moved(threshold)`.
pub fn has_moved(original: Vec3, current: Vec3, threshold: f32) -> bool {
    current.sub(&original).length() > threshold
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn zero_displacement_for_unmoved_probe() {
        let p = Vec3::new(2.0, 2.0, 0.0);
        let d = ProbeDisplacement::compute(0, p, p);
        assert_eq!(d.displacement, Vec3::ZERO);
        assert_eq!(d.displacement_2d, Vec2::ZERO);
        assert_eq!(d.magnitude, 0.0);
        assert!(!d.has_moved(DEFAULT_MOVE_THRESHOLD));
    }

    #[test]
    fn planar_projection_drops_depth() {
        let d = ProbeDisplacement::compute(
            3,
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(4.0, 1.0, 4.0),
        );
        assert_eq!(d.displacement.to_array(), [3.0, 0.0, 4.0]);
        assert_eq!(d.displacement_2d.to_array(), [3.0, 0.0]);
        assert_eq!(d.magnitude, 5.0);
    }

    #[test]
    fn move_threshold_is_exclusive() {
        let o = Vec3::ZERO;
        assert!(!has_moved(o, Vec3::new(0.005, 0.0, 0.0), DEFAULT_MOVE_THRESHOLD));
        assert!(has_moved(o, Vec3::new(0.02, 0.0, 0.0), DEFAULT_MOVE_THRESHOLD));
        assert!(!has_moved(o, Vec3::new(1.0, 0.0, 0.0), 1.0));
    }
}
