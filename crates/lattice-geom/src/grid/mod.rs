// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Grid-line tables derived from lattice geometry, and cross-axis snapping.

#[doc = "Line tables, nearest-line search, and `AxisMode` snapping."]
pub mod lines;
