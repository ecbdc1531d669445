// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Session report rendering (tables for humans, JSON for tooling).

use anyhow::Result;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use lattice_core::{IterationSnapshot, ProbeEvent};
use serde::Serialize;

use crate::script::{Session, StepFailure};

/// Final state of one probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeRow {
    /// Probe index.
    pub index: usize,
    /// Lattice cell `(col, row)`.
    pub cell: (usize, usize),
    /// Original position, if the lattice had a point there.
    pub original: Option<[f32; 3]>,
    /// Current position.
    pub current: [f32; 3],
    /// Displacement magnitude, if an original exists.
    pub magnitude: Option<f32>,
    /// Moved beyond the configured threshold.
    pub moved: bool,
    /// Completed by the script.
    pub completed: bool,
}

/// Everything a replay produced.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Ticks processed.
    pub ticks: u64,
    /// Final probe states.
    pub probes: Vec<ProbeRow>,
    /// Captured history in capture order.
    pub iterations: Vec<IterationSnapshot>,
    /// Selection events in emission order.
    pub events: Vec<ProbeEvent>,
    /// Steps that failed.
    pub failures: Vec<StepFailure>,
    #[serde(skip)]
    move_threshold: f32,
}

impl Report {
    /// Collects the report for a finished session.
    pub fn from_session(session: Session) -> Result<Self> {
        let exp = &session.experiment;
        let mut probes = Vec::with_capacity(exp.probe_count());
        for index in 0..exp.probe_count() {
            let view = exp.probe(index)?;
            let displacement = exp.displacement(index).ok();
            probes.push(ProbeRow {
                index,
                cell: view.cell,
                original: view.original.map(|p| p.to_array()),
                current: view.current.to_array(),
                magnitude: displacement.map(|d| d.magnitude),
                moved: displacement.is_some_and(|d| d.has_moved(exp.config().move_threshold)),
                completed: view.is_completed,
            });
        }
        Ok(Self {
            ticks: exp.current_tick().index(),
            probes,
            iterations: exp.all_iterations(),
            events: session.events,
            failures: session.failures,
            move_threshold: exp.config().move_threshold,
        })
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Human-readable tables.
    pub fn to_tables(&self) -> String {
        let mut lines = vec![format!("ticks: {}", self.ticks), self.probe_table().to_string()];
        if self.iterations.is_empty() {
            lines.push("no iterations captured".to_owned());
        }
        for snapshot in &self.iterations {
            let summary = snapshot.summary(self.move_threshold);
            lines.push(format!(
                "iteration {} (tick {}): {}/{} moved, mean |d| {:.4}, max |d| {:.4}",
                snapshot.iteration(),
                snapshot.captured_at().index(),
                summary.moved,
                summary.probes,
                summary.mean_magnitude,
                summary.max_magnitude,
            ));
            lines.push(iteration_table(snapshot).to_string());
        }
        lines.extend(self.failures.iter().map(|failure| {
            format!("step {} ({}) failed: {}", failure.step, failure.op, failure.error)
        }));
        lines.join("\n")
    }

    fn probe_table(&self) -> Table {
        let mut table = new_table([
            "probe",
            "cell",
            "original",
            "current",
            "|d|",
            "moved",
            "completed",
        ]);
        for row in &self.probes {
            table.add_row(vec![
                Cell::new(row.index),
                Cell::new(format!("{},{}", row.cell.0, row.cell.1)),
                Cell::new(row.original.map_or_else(|| "-".to_owned(), fmt_point)),
                Cell::new(fmt_point(row.current)),
                Cell::new(row.magnitude.map_or_else(|| "-".to_owned(), |m| format!("{m:.4}"))),
                Cell::new(if row.moved { "yes" } else { "no" }),
                Cell::new(if row.completed { "yes" } else { "no" }),
            ]);
        }
        table
    }
}

fn iteration_table(snapshot: &IterationSnapshot) -> Table {
    let mut table = new_table(["probe", "dx", "dy", "|d|"]);
    for d in snapshot.displacements() {
        table.add_row(vec![
            Cell::new(d.index),
            Cell::new(format!("{:.4}", d.displacement_2d.x())),
            Cell::new(format!("{:.4}", d.displacement_2d.y())),
            Cell::new(format!("{:.4}", d.magnitude)),
        ]);
    }
    table
}

fn new_table<const N: usize>(header: [&str; N]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

fn fmt_point(p: [f32; 3]) -> String {
    format!("({:.3}, {:.3})", p[0], p[1])
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::script::{run_script, Script};
    use lattice_app_core::prefs::ExperimentPrefs;

    fn report() -> Report {
        let script: Script = serde_json::from_str(
            r#"{ "steps": [
                { "op": "select", "probe": 0 },
                { "op": "drag", "input": [1.0, 0.0], "ticks": 2 },
                { "op": "complete" },
                { "op": "capture", "iteration": 7 }
            ] }"#,
        )
        .expect("script parses");
        let session = run_script(&script, &ExperimentPrefs::default(), true).expect("replay");
        Report::from_session(session).expect("report")
    }

    #[test]
    fn report_reflects_final_probe_state() {
        let r = report();
        assert_eq!(r.ticks, 2);
        assert_eq!(r.probes.len(), 8);
        assert!(r.probes[0].moved);
        assert!(r.probes[0].completed);
        assert!(!r.probes[1].moved);
        assert_eq!(r.iterations.len(), 1);
    }

    #[test]
    fn tables_and_json_mention_iterations() {
        let r = report();
        let text = r.to_tables();
        assert!(text.contains("iteration 7 (tick 2): 1/8 moved"));
        let json: serde_json::Value =
            serde_json::from_str(&r.to_json().expect("json")).expect("valid json");
        assert_eq!(json["iterations"][0]["iteration"], 7);
        assert_eq!(json["events"][2]["event"], "completed");
    }

    #[test]
    fn tables_end_with_failed_steps() {
        let script: Script =
            serde_json::from_str(r#"{ "steps": [ { "op": "select", "probe": 12 } ] }"#)
                .expect("script parses");
        let session = run_script(&script, &ExperimentPrefs::default(), false).expect("replay");
        let text = Report::from_session(session).expect("report").to_tables();
        assert!(text.starts_with("ticks: 0\n"));
        assert!(text.contains("\nno iterations captured\n"));
        assert!(text
            .lines()
            .last()
            .is_some_and(|line| line.starts_with("step 0 (select) failed:")));
    }
}
