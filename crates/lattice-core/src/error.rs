// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error types for the experiment core.
//!
//! Every failure is a value. None of them is fatal to the interaction loop:
//! the host logs or ignores the error and calls again on the next tick.

use thiserror::Error;

/// Errors returned by [`crate::Experiment`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExperimentError {
    /// The lattice provider has not published geometry yet; retry next tick.
    #[error("experiment not initialized: lattice geometry not yet available")]
    NotInitialized,

    /// Probe index outside the tracked range.
    #[error("invalid probe index {index} (tracking {len} probes)")]
    InvalidIndex {
        /// The index that was requested.
        index: usize,
        /// Number of tracked probes.
        len: usize,
    },

    /// The requested data does not exist (e.g. a probe without an original
    /// position).
    #[error("no data for probe {index}")]
    NoData {
        /// Probe whose data was requested.
        index: usize,
    },

    /// Completed probes are terminal and cannot be selected again.
    #[error("probe {index} is completed")]
    ProbeCompleted {
        /// The completed probe.
        index: usize,
    },
}

/// Errors raised while building a [`crate::NeighborAdjacency`] table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AdjacencyError {
    /// A neighbor index is not a tracked probe.
    #[error("probe {probe} lists neighbor {neighbor} outside 0..{len}")]
    NeighborOutOfRange {
        /// Probe owning the entry.
        probe: usize,
        /// Offending neighbor index.
        neighbor: usize,
        /// Number of probes in the table.
        len: usize,
    },

    /// A probe lists itself as a neighbor.
    #[error("probe {probe} lists itself as a neighbor")]
    SelfNeighbor {
        /// Probe owning the entry.
        probe: usize,
    },
}
