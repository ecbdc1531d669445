// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Temporal types for the tick-driven interaction loop.

#[doc = "Discrete interaction ticks (u64 newtype)."]
pub mod tick;
