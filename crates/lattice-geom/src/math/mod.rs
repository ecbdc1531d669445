// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Float32 math helpers: vectors and scalar clamping.
//!
//! All operations round to `f32`; nothing here uses fused multiply-add so that
//! identical inputs produce identical outputs across targets.

mod vec2;
mod vec3;

pub use vec2::Vec2;
pub use vec3::Vec3;

/// Clamps `value` into `[min, max]`.
///
/// Unlike `f32::clamp` this never panics: when `min > max` the midpoint of the
/// two bounds is returned, so repeated application is stable.
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if min > max {
        return 0.5 * (min + max);
    }
    value.max(min).min(max)
}
