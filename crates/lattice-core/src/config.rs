// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tunables for constraint resolution and displacement bookkeeping.

use serde::{Deserialize, Serialize};

use crate::displacement::DEFAULT_MOVE_THRESHOLD;

/// Experiment tunables, in lattice length units unless noted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Drag speed in length units per second at unit input.
    pub move_speed: f32,
    /// Gap kept between a probe and each directional neighbor's original
    /// position.
    pub overlap_buffer: f32,
    /// Margin by which one axis must dominate for a neighbor to count as
    /// horizontal or vertical.
    pub neighbor_epsilon: f32,
    /// Inset applied to the lattice rectangle on every side.
    pub boundary_padding: f32,
    /// Magnitude above which a probe counts as moved.
    pub move_threshold: f32,
    /// Distance in cells between the lattice center and the probe ring.
    pub probe_spacing_cells: usize,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            move_speed: 2.0,
            overlap_buffer: 0.25,
            neighbor_epsilon: 0.1,
            boundary_padding: 0.1,
            move_threshold: DEFAULT_MOVE_THRESHOLD,
            probe_spacing_cells: 2,
        }
    }
}
