// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Lattice geometry as published by the host, plus the two input ports the
//! core consumes: [`LatticeProvider`] (readiness + geometry) and
//! [`DeformationField`] (per-cell displacement template).

use crate::math::Vec3;
use crate::types::rect::Rect;

/// Largest accepted `grid_size`; larger requests are clamped to it.
pub const MAX_GRID_SIZE: usize = 1024;

/// Snapshot of the lattice the probes live on.
///
/// Points are stored row-major with `grid_size + 1` points per side. Row
/// indices advance along +Y and column indices along +X from [`origin`].
/// A slot may be absent while the host is still building the lattice.
///
/// [`origin`]: LatticeGeometry::origin
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeGeometry {
    cell_size: f32,
    grid_size: usize,
    total_width: f32,
    center: Vec3,
    points: Vec<Option<Vec3>>,
}

impl LatticeGeometry {
    /// Wraps host-supplied geometry.
    ///
    /// `points` shorter than `(grid_size + 1)^2` is padded with absent slots;
    /// extra entries are dropped. `grid_size` is clamped to [`MAX_GRID_SIZE`].
    pub fn new(
        cell_size: f32,
        grid_size: usize,
        total_width: f32,
        center: Vec3,
        mut points: Vec<Option<Vec3>>,
    ) -> Self {
        let grid_size = grid_size.min(MAX_GRID_SIZE);
        let side = grid_size + 1;
        points.resize(side * side, None);
        Self {
            cell_size,
            grid_size,
            total_width,
            center,
            points,
        }
    }

    /// Builds an undistorted, fully populated square lattice. `grid_size` is
    /// clamped to [`MAX_GRID_SIZE`].
    pub fn regular(cell_size: f32, grid_size: usize, center: Vec3) -> Self {
        let grid_size = grid_size.min(MAX_GRID_SIZE);
        #[allow(clippy::cast_precision_loss)]
        let total_width = cell_size * grid_size as f32;
        let origin = Vec3::new(
            center.x() - 0.5 * total_width,
            center.y() - 0.5 * total_width,
            center.z(),
        );
        let side = grid_size + 1;
        let mut points = Vec::with_capacity(side * side);
        for row in 0..side {
            for col in 0..side {
                #[allow(clippy::cast_precision_loss)]
                let p = Vec3::new(
                    origin.x() + col as f32 * cell_size,
                    origin.y() + row as f32 * cell_size,
                    origin.z(),
                );
                points.push(Some(p));
            }
        }
        Self {
            cell_size,
            grid_size,
            total_width,
            center,
            points,
        }
    }

    /// Edge length of one lattice cell.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cells per side.
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Points per side (`grid_size + 1`).
    pub fn points_per_side(&self) -> usize {
        self.grid_size + 1
    }

    /// Total lattice width along either axis.
    pub fn total_width(&self) -> f32 {
        self.total_width
    }

    /// World-space center of the lattice.
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Lower-left corner (`center - total_width / 2` on X and Y).
    pub fn origin(&self) -> Vec3 {
        let half = 0.5 * self.total_width;
        Vec3::new(self.center.x() - half, self.center.y() - half, self.center.z())
    }

    /// Grid point at `(row, col)`, or `None` if out of range or absent.
    pub fn point(&self, row: usize, col: usize) -> Option<Vec3> {
        let side = self.points_per_side();
        if row >= side || col >= side {
            return None;
        }
        self.points.get(row * side + col).copied().flatten()
    }

    /// `true` once at least one grid point has been published.
    pub fn has_points(&self) -> bool {
        self.points.iter().any(Option::is_some)
    }

    /// Unpadded lattice rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::centered_square(self.center, self.total_width)
    }

    /// Lattice rectangle shrunk by `padding` on every side.
    pub fn padded_bounds(&self, padding: f32) -> Rect {
        self.bounds().inset(padding)
    }

    /// Column/row of the lattice center point.
    pub fn center_cell(&self) -> (usize, usize) {
        (self.grid_size / 2, self.grid_size / 2)
    }
}

/// Source of lattice geometry, polled once per tick until ready.
///
/// Returning `None` means the host has not published grid-point data yet.
pub trait LatticeProvider {
    /// Current geometry, or `None` while the lattice is still being built.
    fn geometry(&self) -> Option<&LatticeGeometry>;
}

impl LatticeProvider for LatticeGeometry {
    fn geometry(&self) -> Option<&LatticeGeometry> {
        Some(self).filter(|g| g.has_points())
    }
}

impl LatticeProvider for Option<LatticeGeometry> {
    fn geometry(&self) -> Option<&LatticeGeometry> {
        self.as_ref().and_then(LatticeProvider::geometry)
    }
}

/// Deformation template: a displacement vector for any lattice cell.
///
/// Implementations must be pure; the core queries each affected cell once
/// when a template is applied.
pub trait DeformationField {
    /// Displacement applied to the grid point at `(col, row)`.
    fn displacement(&self, col: usize, row: usize) -> Vec3;
}

impl<F> DeformationField for F
where
    F: Fn(usize, usize) -> Vec3,
{
    fn displacement(&self, col: usize, row: usize) -> Vec3 {
        self(col, row)
    }
}
