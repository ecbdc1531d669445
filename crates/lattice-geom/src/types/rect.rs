// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::math::{self, Vec3};

/// Axis-aligned rectangle in the lattice plane used as a clamp region.
///
/// Unlike a bounding box, a `Rect` may be *crossed* (`min > max` on an axis)
/// after neighbor tightening. Crossed axes are not an error: [`Rect::clamp`]
/// resolves them to the midpoint of the two bounds.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    min_x: f32,
    max_x: f32,
    min_y: f32,
    max_y: f32,
}

/// How one axis was treated by [`Rect::clamp`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AxisClamp {
    /// Coordinate already inside the bounds.
    Inside,
    /// Coordinate moved onto the nearer bound.
    Clamped,
    /// Bounds were crossed; coordinate set to their midpoint.
    Degenerate,
}

/// Result of clamping a position into a [`Rect`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Clamped {
    /// The clamped position (depth untouched).
    pub position: Vec3,
    /// Treatment of the X coordinate.
    pub x: AxisClamp,
    /// Treatment of the Y coordinate.
    pub y: AxisClamp,
}

impl Clamped {
    /// `true` if either axis had crossed bounds.
    pub fn is_degenerate(&self) -> bool {
        self.x == AxisClamp::Degenerate || self.y == AxisClamp::Degenerate
    }

    /// `true` if the input position was returned unchanged.
    pub fn is_unchanged(&self) -> bool {
        self.x == AxisClamp::Inside && self.y == AxisClamp::Inside
    }
}

impl Rect {
    /// Constructs a rectangle from its bounds. Crossed bounds are accepted.
    pub const fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Square of side `width` centered on `center` (depth ignored).
    pub fn centered_square(center: Vec3, width: f32) -> Self {
        let half = 0.5 * width;
        Self::new(
            center.x() - half,
            center.x() + half,
            center.y() - half,
            center.y() + half,
        )
    }

    /// Shrinks the rectangle by `padding` on every side.
    pub fn inset(&self, padding: f32) -> Self {
        Self::new(
            self.min_x + padding,
            self.max_x - padding,
            self.min_y + padding,
            self.max_y - padding,
        )
    }

    /// Minimum X bound.
    pub fn min_x(&self) -> f32 {
        self.min_x
    }

    /// Maximum X bound.
    pub fn max_x(&self) -> f32 {
        self.max_x
    }

    /// Minimum Y bound.
    pub fn min_y(&self) -> f32 {
        self.min_y
    }

    /// Maximum Y bound.
    pub fn max_y(&self) -> f32 {
        self.max_y
    }

    /// Raises `min_x` to `value` if that is tighter.
    pub fn raise_min_x(&mut self, value: f32) {
        self.min_x = self.min_x.max(value);
    }

    /// Lowers `max_x` to `value` if that is tighter.
    pub fn lower_max_x(&mut self, value: f32) {
        self.max_x = self.max_x.min(value);
    }

    /// Raises `min_y` to `value` if that is tighter.
    pub fn raise_min_y(&mut self, value: f32) {
        self.min_y = self.min_y.max(value);
    }

    /// Lowers `max_y` to `value` if that is tighter.
    pub fn lower_max_y(&mut self, value: f32) {
        self.max_y = self.max_y.min(value);
    }

    /// `true` if either axis has `min > max`.
    pub fn is_degenerate(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Clamps `p` into the rectangle, X first then Y, each axis independently.
    ///
    /// A crossed axis maps to the midpoint of its bounds, so
    /// `clamp(clamp(p)) == clamp(p)` holds for every rectangle.
    pub fn clamp(&self, p: Vec3) -> Clamped {
        let (x, x_kind) = clamp_axis(p.x(), self.min_x, self.max_x);
        let (y, y_kind) = clamp_axis(p.y(), self.min_y, self.max_y);
        Clamped {
            position: Vec3::new(x, y, p.z()),
            x: x_kind,
            y: y_kind,
        }
    }
}

fn clamp_axis(value: f32, min: f32, max: f32) -> (f32, AxisClamp) {
    if min > max {
        return (math::clamp(value, min, max), AxisClamp::Degenerate);
    }
    let clamped = math::clamp(value, min, max);
    #[allow(clippy::float_cmp)]
    let kind = if clamped == value {
        AxisClamp::Inside
    } else {
        AxisClamp::Clamped
    };
    (clamped, kind)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn centered_square_and_inset() {
        let r = Rect::centered_square(Vec3::new(4.0, 4.0, 0.0), 8.0).inset(0.5);
        assert_eq!(
            (r.min_x(), r.max_x(), r.min_y(), r.max_y()),
            (0.5, 7.5, 0.5, 7.5)
        );
    }

    #[test]
    fn tightening_never_loosens() {
        let mut r = Rect::new(0.0, 10.0, 0.0, 10.0);
        r.raise_min_x(-5.0);
        r.lower_max_x(20.0);
        assert_eq!((r.min_x(), r.max_x()), (0.0, 10.0));
        r.raise_min_x(2.0);
        r.lower_max_y(7.0);
        assert_eq!((r.min_x(), r.max_y()), (2.0, 7.0));
    }

    #[test]
    fn clamp_reports_per_axis_treatment() {
        let r = Rect::new(0.0, 1.0, 0.0, 1.0);
        let c = r.clamp(Vec3::new(2.0, 0.5, 3.0));
        assert_eq!(c.position.to_array(), [1.0, 0.5, 3.0]);
        assert_eq!(c.x, AxisClamp::Clamped);
        assert_eq!(c.y, AxisClamp::Inside);
        assert!(!c.is_degenerate());
    }

    #[test]
    fn crossed_axis_uses_midpoint() {
        let r = Rect::new(3.0, 2.0, 0.0, 1.0);
        assert!(r.is_degenerate());
        let c = r.clamp(Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(c.position.x(), 2.5);
        assert!(c.is_degenerate());
        assert_eq!(r.clamp(c.position).position, c.position);
    }
}
