// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Geometry primitives for the lattice probe workspace.

This crate provides:
- Float32 vectors (`Vec3`, `Vec2`) with explicit, allocation-free arithmetic.
- Axis-aligned clamp rectangles (`Rect`) with a deterministic policy for
  crossed bounds.
- Grid-line tables and nearest-line snapping (`GridLines`, `AxisMode`).
- Lattice geometry published by an external provider (`LatticeGeometry`,
  `LatticeProvider`) and the deformation-field port (`DeformationField`).
- Discrete ticks (`Tick`).

Design notes:
- Deterministic: no ambient RNG, scans run left-to-right and ties resolve to
  the lowest index.
- Nothing here panics on caller input; empty or degenerate inputs produce
  `None` or a documented fallback value.
"]

/// Lattice geometry published by the host and the ports used to obtain it.
pub mod lattice;
/// Float32 vector math.
pub mod math;
/// Grid-line tables and snapping.
pub mod grid;
/// Tick-based time.
pub mod temporal;
/// Foundational geometric types.
pub mod types;

pub use grid::lines::{nearest_line_index, AxisMode, GridLines, Snapped};
pub use lattice::{DeformationField, LatticeGeometry, LatticeProvider, MAX_GRID_SIZE};
pub use math::{Vec2, Vec3};
pub use temporal::tick::Tick;
pub use types::rect::{AxisClamp, Clamped, Rect};
