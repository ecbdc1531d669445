// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::lattice::LatticeGeometry;
use crate::math::Vec3;

/// Movement axis of a drag, which decides the cross-axis that gets snapped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AxisMode {
    /// Motion along X; Y snaps to the nearest horizontal grid line.
    Horizontal,
    /// Motion along Y; X snaps to the nearest vertical grid line.
    Vertical,
    /// No lock; nothing snaps.
    #[default]
    None,
}

/// Result of [`GridLines::snap`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Snapped {
    /// Position with the cross-axis replaced by the chosen line.
    pub position: Vec3,
    /// Index of the chosen line in the cross-axis table, if one was chosen.
    pub line_index: Option<usize>,
}

/// Returns the index of the line in `lines` closest to `value`.
///
/// The scan runs left to right and only a strictly closer candidate replaces
/// the running best, so ties resolve to the lowest index. Returns `None` for
/// an empty table.
pub fn nearest_line_index(value: f32, lines: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, line) in lines.iter().enumerate() {
        let d = (line - value).abs();
        match best {
            Some((_, bd)) if d >= bd => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

/// Ordered X and Y grid-line coordinates of a lattice.
///
/// `xs` are the vertical lines (constant X), `ys` the horizontal lines
/// (constant Y). Both ascend.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridLines {
    xs: Vec<f32>,
    ys: Vec<f32>,
}

impl GridLines {
    /// Builds a table from explicit coordinates (kept in the given order).
    pub fn new(xs: Vec<f32>, ys: Vec<f32>) -> Self {
        Self { xs, ys }
    }

    /// Derives the lines from lattice origin, cell size, and point count.
    ///
    /// A lattice of `grid_size` cells per side has `grid_size + 1` lines per
    /// axis, starting at `center - total_width / 2`.
    pub fn from_geometry(geometry: &LatticeGeometry) -> Self {
        let origin = geometry.origin();
        let count = geometry.grid_size() + 1;
        let step = geometry.cell_size();
        let axis = |start: f32| -> Vec<f32> {
            (0..count)
                .map(|i| {
                    #[allow(clippy::cast_precision_loss)]
                    let offset = i as f32 * step;
                    start + offset
                })
                .collect()
        };
        Self {
            xs: axis(origin.x()),
            ys: axis(origin.y()),
        }
    }

    /// Vertical line coordinates (constant X).
    pub fn xs(&self) -> &[f32] {
        &self.xs
    }

    /// Horizontal line coordinates (constant Y).
    pub fn ys(&self) -> &[f32] {
        &self.ys
    }

    /// `true` if either axis has no lines.
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty() || self.ys.is_empty()
    }

    /// Snaps the cross-axis of `position` for a drag along `mode`.
    ///
    /// Horizontal movement replaces `y` with the nearest Y line, vertical
    /// movement replaces `x` with the nearest X line. The moving axis and the
    /// depth are left as they are. With [`AxisMode::None`] or an empty table
    /// the position is returned unchanged and `line_index` is `None`.
    pub fn snap(&self, position: Vec3, mode: AxisMode) -> Snapped {
        let (lines, value) = match mode {
            AxisMode::Horizontal => (&self.ys, position.y()),
            AxisMode::Vertical => (&self.xs, position.x()),
            AxisMode::None => {
                return Snapped {
                    position,
                    line_index: None,
                }
            }
        };
        let Some(index) = nearest_line_index(value, lines) else {
            return Snapped {
                position,
                line_index: None,
            };
        };
        let line = lines[index];
        let position = match mode {
            AxisMode::Horizontal => position.with_y(line),
            _ => position.with_x(line),
        };
        Snapped {
            position,
            line_index: Some(index),
        }
    }
}
