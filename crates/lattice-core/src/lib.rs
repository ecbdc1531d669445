// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! lattice-core: constrained probe movement and displacement history.
//!
//! A host renders a deformable lattice and publishes its geometry; this
//! crate decides where the selected probe may move each tick (axis lock,
//! cross-axis grid snapping, neighbor bounds, lattice bounds) and records
//! per-iteration displacement snapshots of every probe.
#![forbid(unsafe_code)]

mod adjacency;
mod bounds;
mod config;
mod displacement;
mod error;
mod events;
mod experiment;
mod history;
mod movement;
mod probe;

pub use adjacency::NeighborAdjacency;
pub use bounds::{
    apply_constraints, classify, resolve_bounds, BoundParams, Direction, ResolvedBounds,
};
pub use config::ExperimentConfig;
pub use displacement::{has_moved, ProbeDisplacement, DEFAULT_MOVE_THRESHOLD};
pub use error::{AdjacencyError, ExperimentError};
pub use events::ProbeEvent;
pub use experiment::{Experiment, TickOutcome};
pub use history::{DisplacementHistory, DisplacementSource, IterationSnapshot, SnapshotSummary};
pub use movement::{lock_axis, MovementEngine, MovementSession, MovementState, Step, StepContext};
pub use probe::{ProbeArena, ProbeView};
