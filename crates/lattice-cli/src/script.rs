// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scripted sessions: a JSON list of host inputs replayed tick by tick
//! against an [`Experiment`].

use anyhow::{bail, Context, Result};
use lattice_app_core::prefs::{ExperimentPrefs, LatticePrefs};
use lattice_core::{Experiment, ExperimentConfig, NeighborAdjacency, ProbeEvent};
use lattice_geom::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info, warn};

const fn default_dt() -> f32 {
    0.1
}

const fn default_ticks() -> u32 {
    1
}

const fn default_radius() -> f32 {
    0.5
}

/// A replayable session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    /// Lattice to run on; falls back to the saved prefs.
    #[serde(default)]
    pub lattice: Option<LatticePrefs>,
    /// Experiment tunables; fall back to the saved prefs.
    #[serde(default)]
    pub config: Option<ExperimentConfig>,
    /// Seconds per tick unless a step overrides it.
    #[serde(default = "default_dt")]
    pub dt: f32,
    /// Steps in replay order.
    pub steps: Vec<ScriptStep>,
}

impl Script {
    /// Reads a script from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let f = File::open(path)
            .with_context(|| format!("failed to open script {}", path.display()))?;
        serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("failed to parse script {}", path.display()))
    }
}

/// One host input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Select a probe by index.
    Select {
        /// Probe index.
        probe: usize,
    },
    /// Select the probe nearest to a lattice-plane point.
    Pick {
        /// `[x, y]` in lattice coordinates.
        at: [f32; 2],
        /// Pick radius.
        #[serde(default = "default_radius")]
        radius: f32,
    },
    /// Hold a direction for a number of ticks.
    Drag {
        /// Raw `[dx, dy]` input.
        input: [f32; 2],
        /// Ticks to hold it.
        #[serde(default = "default_ticks")]
        ticks: u32,
        /// Per-step tick length override.
        #[serde(default)]
        dt: Option<f32>,
    },
    /// One zero-input tick (ends the axis lock).
    Release,
    /// Clear the selection.
    Deselect,
    /// Complete the selected probe.
    Complete,
    /// Capture a displacement snapshot.
    Capture {
        /// Caller-chosen iteration id (duplicates allowed).
        iteration: i64,
    },
    /// Re-baseline every probe onto a sheared lattice.
    Template {
        /// X displacement per lattice row.
        #[serde(default)]
        x_per_row: f32,
        /// Y displacement per lattice column.
        #[serde(default)]
        y_per_col: f32,
    },
    /// Return a probe to its original position.
    Reset {
        /// Probe index.
        probe: usize,
    },
    /// Drop the displacement history.
    Clear,
}

impl ScriptStep {
    /// Short name used in logs and failure reports.
    pub fn op(&self) -> &'static str {
        match self {
            Self::Select { .. } => "select",
            Self::Pick { .. } => "pick",
            Self::Drag { .. } => "drag",
            Self::Release => "release",
            Self::Deselect => "deselect",
            Self::Complete => "complete",
            Self::Capture { .. } => "capture",
            Self::Template { .. } => "template",
            Self::Reset { .. } => "reset",
            Self::Clear => "clear",
        }
    }
}

/// Linear shear template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shear {
    /// X displacement per lattice row.
    pub x_per_row: f32,
    /// Y displacement per lattice column.
    pub y_per_col: f32,
}

impl Shear {
    /// Displacement of the grid point at `(col, row)`.
    #[allow(clippy::cast_precision_loss)]
    pub fn at(&self, col: usize, row: usize) -> Vec3 {
        Vec3::new(self.x_per_row * row as f32, self.y_per_col * col as f32, 0.0)
    }
}

/// A step that failed without aborting the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepFailure {
    /// Zero-based step index.
    pub step: usize,
    /// Step name.
    pub op: &'static str,
    /// Rendered error.
    pub error: String,
}

/// The finished session.
#[derive(Debug)]
pub struct Session {
    /// Experiment state after the last step.
    pub experiment: Experiment,
    /// Selection events in emission order.
    pub events: Vec<ProbeEvent>,
    /// Steps that failed (only in non-strict mode).
    pub failures: Vec<StepFailure>,
}

/// Replays `script` on top of `prefs`.
///
/// In strict mode the first failing step aborts the replay; otherwise the
/// failure is logged and recorded and the replay continues, as an
/// interactive host would.
pub fn run_script(script: &Script, prefs: &ExperimentPrefs, strict: bool) -> Result<Session> {
    let config = script.config.unwrap_or(prefs.experiment);
    let lattice = script.lattice.as_ref().unwrap_or(&prefs.lattice);
    let geometry = lattice.geometry();

    let mut experiment = Experiment::new(config, NeighborAdjacency::ring());
    if !experiment.poll_ready(&geometry) {
        bail!(
            "lattice has no grid points (cell_size {}, grid_size {})",
            lattice.cell_size,
            lattice.grid_size
        );
    }
    info!(steps = script.steps.len(), dt = script.dt, "replaying script");

    let mut events = Vec::new();
    let mut failures = Vec::new();
    for (i, step) in script.steps.iter().enumerate() {
        debug!(step = i, op = step.op(), "step");
        if let Err(err) = apply(&mut experiment, step, script.dt) {
            if strict {
                return Err(err.context(format!("step {i} ({}) failed", step.op())));
            }
            warn!(step = i, op = step.op(), error = %err, "step failed; continuing");
            failures.push(StepFailure {
                step: i,
                op: step.op(),
                error: err.to_string(),
            });
        }
        events.extend(experiment.drain_events());
    }

    Ok(Session {
        experiment,
        events,
        failures,
    })
}

fn apply(exp: &mut Experiment, step: &ScriptStep, dt: f32) -> Result<()> {
    match *step {
        ScriptStep::Select { probe } => exp.select(probe)?,
        ScriptStep::Pick { at, radius } => {
            let point = Vec3::new(at[0], at[1], 0.0);
            match exp.probe_at(point, radius)? {
                Some(probe) => exp.select(probe)?,
                None => bail!("no probe within {radius} of ({}, {})", at[0], at[1]),
            }
        }
        ScriptStep::Drag { input, ticks, dt: step_dt } => {
            let input = Vec2::from(input);
            let dt = step_dt.unwrap_or(dt);
            for _ in 0..ticks {
                if exp.tick(input, dt)?.is_none() {
                    bail!("drag with no probe selected");
                }
            }
        }
        ScriptStep::Release => {
            exp.tick(Vec2::ZERO, dt)?;
        }
        ScriptStep::Deselect => {
            exp.deselect()?;
        }
        ScriptStep::Complete => {
            if exp.complete_selected()?.is_none() {
                bail!("nothing selected to complete");
            }
        }
        ScriptStep::Capture { iteration } => {
            exp.capture_iteration(iteration)?;
        }
        ScriptStep::Template {
            x_per_row,
            y_per_col,
        } => {
            let shear = Shear {
                x_per_row,
                y_per_col,
            };
            let field = |col: usize, row: usize| shear.at(col, row);
            exp.apply_template(&field)?;
        }
        ScriptStep::Reset { probe } => {
            exp.reset_probe(probe)?;
        }
        ScriptStep::Clear => exp.clear_history(),
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Script {
        serde_json::from_str(json).expect("script parses")
    }

    #[test]
    fn steps_parse_with_defaults() {
        let script = parse(
            r#"{ "steps": [
                { "op": "select", "probe": 1 },
                { "op": "drag", "input": [0.0, 1.0] },
                { "op": "template", "x_per_row": 0.1 },
                { "op": "clear" }
            ] }"#,
        );
        assert_eq!(script.dt, 0.1);
        assert_eq!(
            script.steps[1],
            ScriptStep::Drag {
                input: [0.0, 1.0],
                ticks: 1,
                dt: None
            }
        );
        assert_eq!(
            script.steps[2],
            ScriptStep::Template {
                x_per_row: 0.1,
                y_per_col: 0.0
            }
        );
    }

    #[test]
    fn failures_are_recorded_unless_strict() {
        let script = parse(
            r#"{ "steps": [
                { "op": "select", "probe": 99 },
                { "op": "select", "probe": 0 },
                { "op": "drag", "input": [1.0, 0.0], "ticks": 3 },
                { "op": "capture", "iteration": 1 }
            ] }"#,
        );
        let prefs = ExperimentPrefs::default();
        let session = run_script(&script, &prefs, false).expect("lenient replay");
        assert_eq!(session.failures.len(), 1);
        assert_eq!(session.failures[0].step, 0);
        assert_eq!(session.events, vec![ProbeEvent::Selected(0)]);
        let latest = session.experiment.latest().expect("captured");
        let d = latest.get(0).expect("probe 0 measured");
        assert!((d.magnitude - 0.6).abs() < 1e-5);

        let err = run_script(&script, &prefs, true).expect_err("strict replay fails");
        assert!(format!("{err:#}").contains("step 0 (select)"));
    }

    #[test]
    fn shear_scales_with_cell_indices() {
        let shear = Shear {
            x_per_row: 0.5,
            y_per_col: -0.25,
        };
        assert_eq!(shear.at(2, 4).to_array(), [2.0, -0.5, 0.0]);
    }
}
