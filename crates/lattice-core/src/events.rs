// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Selection lifecycle events for visual observers.
//!
//! The core never touches rendering state; hosts drain these once per tick
//! and restyle probes accordingly.

use serde::Serialize;

/// One selection lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "probe", rename_all = "snake_case")]
pub enum ProbeEvent {
    /// Probe became the selected probe.
    Selected(usize),
    /// Probe stopped being selected.
    Deselected(usize),
    /// Probe was marked completed (always preceded by `Deselected`).
    Completed(usize),
}
