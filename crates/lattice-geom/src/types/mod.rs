// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Core geometry types used by constraint resolution.
//!
//! Clamp notes:
//! - Bounds are inclusive; a coordinate exactly on a bound is `Inside`.
//! - Crossed bounds resolve to the midpoint so clamping is total and
//!   idempotent.

#[doc = "Axis-aligned clamp rectangles in the lattice plane."]
pub mod rect;
