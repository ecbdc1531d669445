// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Saved preferences shared by lattice probe tools.

use lattice_core::ExperimentConfig;
use lattice_geom::{LatticeGeometry, Vec3};
use serde::{Deserialize, Serialize};

/// Store key under which [`ExperimentPrefs`] are persisted.
pub const PREFS_KEY: &str = "experiment";

/// Saved preferences for an experiment session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExperimentPrefs {
    /// Constraint and bookkeeping tunables.
    pub experiment: ExperimentConfig,
    /// Lattice a headless session runs on.
    pub lattice: LatticePrefs,
}

/// Regular lattice description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticePrefs {
    /// Edge length of one cell.
    pub cell_size: f32,
    /// Cells per side.
    pub grid_size: usize,
    /// World-space lattice center.
    pub center: [f32; 3],
}

impl Default for LatticePrefs {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            grid_size: 8,
            center: [4.0, 4.0, 0.0],
        }
    }
}

impl LatticePrefs {
    /// Builds the undistorted lattice these prefs describe.
    pub fn geometry(&self) -> LatticeGeometry {
        LatticeGeometry::regular(self.cell_size, self.grid_size, Vec3::from(self.center))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn partial_prefs_fill_defaults() {
        let prefs: ExperimentPrefs =
            serde_json::from_str(r#"{ "lattice": { "grid_size": 4 } }"#).expect("parses");
        assert_eq!(prefs.lattice.grid_size, 4);
        assert_eq!(prefs.lattice.cell_size, 1.0);
        assert_eq!(prefs.experiment, ExperimentConfig::default());
    }

    #[test]
    fn default_lattice_starts_at_origin() {
        let g = LatticePrefs::default().geometry();
        assert_eq!(g.origin(), Vec3::ZERO);
        assert_eq!(g.points_per_side(), 9);
    }
}
