// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Neighbor bound resolution and the combined constraint clamp.
//!
//! Bounds are derived from *original* positions only, so a probe's legal
//! range depends on the static topology and the overlap buffer. It does not
//! ratchet as other probes move, and it does not keep a probe out of a drifted
//! neighbor's buffer.

use lattice_geom::{Clamped, Rect, Vec3};

/// Direction of a neighbor relative to the probe being resolved.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    /// Smaller X.
    Left,
    /// Larger X.
    Right,
    /// Larger Y.
    Up,
    /// Smaller Y.
    Down,
}

/// Parameters shared by every resolution on one lattice.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundParams {
    /// Lattice rectangle after padding; resolved bounds never exceed it.
    pub lattice: Rect,
    /// Gap kept from each directional neighbor.
    pub overlap_buffer: f32,
    /// Dominance margin for horizontal/vertical classification.
    pub epsilon: f32,
}

/// Output of [`resolve_bounds`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ResolvedBounds {
    /// Clamp rectangle (may be crossed; see [`Rect::clamp`]).
    pub rect: Rect,
    /// Closest neighbor found on the left, if any.
    pub left: Option<Vec3>,
    /// Closest neighbor found on the right, if any.
    pub right: Option<Vec3>,
    /// Closest neighbor found above, if any.
    pub up: Option<Vec3>,
    /// Closest neighbor found below, if any.
    pub down: Option<Vec3>,
}

impl ResolvedBounds {
    /// Bounds with no neighbor tightening.
    pub fn unconstrained(lattice: Rect) -> Self {
        Self {
            rect: lattice,
            left: None,
            right: None,
            up: None,
            down: None,
        }
    }
}

/// Classifies `neighbor` relative to `own`.
///
/// A neighbor is horizontal when `|dx| > |dy| + epsilon` and vertical when
/// `|dy| > |dx| + epsilon`; anything closer to the diagonal returns `None`.
pub fn classify(own: Vec3, neighbor: Vec3, epsilon: f32) -> Option<Direction> {
    let dx = neighbor.x() - own.x();
    let dy = neighbor.y() - own.y();
    if dx.abs() > dy.abs() + epsilon {
        Some(if dx < 0.0 {
            Direction::Left
        } else {
            Direction::Right
        })
    } else if dy.abs() > dx.abs() + epsilon {
        Some(if dy < 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    } else {
        None
    }
}

/// Resolves the clamp rectangle for a probe whose original position is
/// `own`, given its neighbors' original positions (the synthetic center
/// included by the caller).
///
/// Per direction the closest classified neighbor wins; on equal distance the
/// first one seen is kept.
pub fn resolve_bounds<I>(own: Vec3, neighbors: I, params: &BoundParams) -> ResolvedBounds
where
    I: IntoIterator<Item = Vec3>,
{
    let mut out = ResolvedBounds::unconstrained(params.lattice);
    let keep_closest = |slot: &mut Option<Vec3>, candidate: Vec3, distance: f32| {
        let closer = slot.is_none_or(|best| distance < axis_distance(own, best));
        if closer {
            *slot = Some(candidate);
        }
    };
    for n in neighbors {
        match classify(own, n, params.epsilon) {
            Some(Direction::Left) => keep_closest(&mut out.left, n, (n.x() - own.x()).abs()),
            Some(Direction::Right) => keep_closest(&mut out.right, n, (n.x() - own.x()).abs()),
            Some(Direction::Up) => keep_closest(&mut out.up, n, (n.y() - own.y()).abs()),
            Some(Direction::Down) => keep_closest(&mut out.down, n, (n.y() - own.y()).abs()),
            None => {}
        }
    }

    let buffer = params.overlap_buffer;
    if let Some(n) = out.left {
        out.rect.raise_min_x(n.x() + buffer);
    }
    if let Some(n) = out.right {
        out.rect.lower_max_x(n.x() - buffer);
    }
    if let Some(n) = out.down {
        out.rect.raise_min_y(n.y() + buffer);
    }
    if let Some(n) = out.up {
        out.rect.lower_max_y(n.y() - buffer);
    }
    out
}

/// Distance along the classification axis between `own` and `other`:
/// `|dx|` for horizontal neighbors, `|dy|` for vertical ones.
fn axis_distance(own: Vec3, other: Vec3) -> f32 {
    let dx = (other.x() - own.x()).abs();
    let dy = (other.y() - own.y()).abs();
    dx.max(dy)
}

/// Clamps `proposed` into the resolved rectangle.
pub fn apply_constraints(proposed: Vec3, bounds: &ResolvedBounds) -> Clamped {
    bounds.rect.clamp(proposed)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn params() -> BoundParams {
        BoundParams {
            lattice: Rect::new(0.1, 7.9, 0.1, 7.9),
            overlap_buffer: 0.25,
            epsilon: 0.1,
        }
    }

    #[test]
    fn classification_by_dominant_axis() {
        let o = Vec3::new(2.0, 2.0, 0.0);
        assert_eq!(classify(o, Vec3::new(0.0, 2.0, 0.0), 0.1), Some(Direction::Left));
        assert_eq!(classify(o, Vec3::new(4.0, 2.5, 0.0), 0.1), Some(Direction::Right));
        assert_eq!(classify(o, Vec3::new(2.0, 4.0, 0.0), 0.1), Some(Direction::Up));
        assert_eq!(classify(o, Vec3::new(2.3, 0.0, 0.0), 0.1), Some(Direction::Down));
    }

    #[test]
    fn near_diagonal_neighbors_are_ignored() {
        let o = Vec3::ZERO;
        assert_eq!(classify(o, Vec3::new(2.0, 2.0, 0.0), 0.1), None);
        assert_eq!(classify(o, Vec3::new(2.05, 2.0, 0.0), 0.1), None);
        assert_eq!(classify(o, Vec3::new(-2.0, 1.95, 0.0), 0.1), None);
    }

    #[test]
    fn closest_neighbor_per_direction_tightens() {
        let own = Vec3::new(4.0, 4.0, 0.0);
        let neighbors = [
            Vec3::new(7.0, 4.0, 0.0),
            Vec3::new(6.0, 4.0, 0.0),
            Vec3::new(2.0, 4.0, 0.0),
            Vec3::new(4.0, 6.0, 0.0),
            Vec3::new(4.0, 3.0, 0.0),
            Vec3::new(6.0, 6.0, 0.0),
        ];
        let b = resolve_bounds(own, neighbors, &params());
        assert_eq!(b.right, Some(Vec3::new(6.0, 4.0, 0.0)));
        assert_eq!(b.left, Some(Vec3::new(2.0, 4.0, 0.0)));
        assert_eq!(b.rect.min_x(), 2.25);
        assert_eq!(b.rect.max_x(), 5.75);
        assert_eq!(b.rect.min_y(), 3.25);
        assert_eq!(b.rect.max_y(), 5.75);
    }

    #[test]
    fn equal_distance_keeps_first_seen() {
        let own = Vec3::new(4.0, 4.0, 0.0);
        let first = Vec3::new(6.0, 4.2, 0.0);
        let second = Vec3::new(6.0, 3.8, 0.0);
        let b = resolve_bounds(own, [first, second], &params());
        assert_eq!(b.right, Some(first));
    }

    #[test]
    fn bounds_never_loosen_past_lattice() {
        let own = Vec3::new(1.0, 1.0, 0.0);
        let b = resolve_bounds(own, [Vec3::new(-3.0, 1.0, 0.0)], &params());
        assert_eq!(b.rect.min_x(), 0.1);
    }

    #[test]
    fn close_neighbors_cross_bounds() {
        let own = Vec3::new(4.0, 4.0, 0.0);
        let b = resolve_bounds(
            own,
            [Vec3::new(3.9, 4.0, 0.0), Vec3::new(4.2, 4.0, 0.0)],
            &BoundParams {
                epsilon: 0.01,
                ..params()
            },
        );
        assert!(b.rect.is_degenerate());
        let c = apply_constraints(Vec3::new(4.0, 4.0, 0.0), &b);
        assert!(c.is_degenerate());
        assert!((c.position.x() - 0.5 * (4.15 + 3.95)).abs() < 1e-5);
    }
}
