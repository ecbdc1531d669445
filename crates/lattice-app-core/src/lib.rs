// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for lattice probe tools (config, prefs).
//! Keeps storage adapters and front ends thin.

pub mod config;
pub mod prefs;
