// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Axis-locked movement state machine.
//!
//! States: [`MovementState::Idle`], [`MovementState::LockedHorizontal`],
//! [`MovementState::LockedVertical`].
//!
//! - `Idle → Locked*` on the first non-zero input after a zero-input tick.
//!   Horizontal wins only on `|dx| > |dy|`; equal components lock vertically.
//! - `Locked* → Idle` on any zero-input tick.
//! - There is no edge between the two locked states; changing direction
//!   requires a zero-input tick.

use lattice_geom::{AxisMode, Clamped, GridLines, Rect, Vec2, Vec3};
use tracing::debug;

/// Engine state as seen by the host.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum MovementState {
    /// No active drag.
    #[default]
    Idle,
    /// Dragging along X.
    LockedHorizontal,
    /// Dragging along Y.
    LockedVertical,
}

/// Transient state of one drag gesture.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MovementSession {
    /// Locked movement axis (never [`AxisMode::None`]).
    pub axis: AxisMode,
    /// Snapped position at the moment the lock engaged.
    pub start: Vec3,
    /// Cross-axis grid line chosen when the lock engaged.
    pub line_index: Option<usize>,
}

/// Per-tick inputs borrowed from the experiment.
#[derive(Debug, Copy, Clone)]
pub struct StepContext<'a> {
    /// Grid lines for cross-axis snapping.
    pub lines: &'a GridLines,
    /// Combined neighbor + lattice clamp rectangle.
    pub bounds: &'a Rect,
    /// Drag speed (length units per second at unit input).
    pub speed: f32,
    /// Elapsed time since the previous tick, in seconds.
    pub dt: f32,
}

impl StepContext<'_> {
    /// Distance covered at unit input this tick. A non-finite or negative
    /// `dt` is a zero-length tick.
    pub fn travel(&self) -> f32 {
        let delta = self.speed * self.dt;
        if self.dt > 0.0 && delta.is_finite() {
            delta
        } else {
            0.0
        }
    }
}

/// Result of one [`MovementEngine::step`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Step {
    /// Position to commit.
    pub position: Vec3,
    /// State after the step.
    pub state: MovementState,
    /// `true` if this step engaged a new lock.
    pub engaged: bool,
    /// `true` if the clamp rectangle had crossed bounds.
    pub degenerate: bool,
}

/// Drives the axis-lock state machine for the selected probe.
#[derive(Debug, Clone, Default)]
pub struct MovementEngine {
    session: Option<MovementSession>,
}

impl MovementEngine {
    /// Creates an idle engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> MovementState {
        match self.session.map(|s| s.axis) {
            Some(AxisMode::Horizontal) => MovementState::LockedHorizontal,
            Some(AxisMode::Vertical) => MovementState::LockedVertical,
            _ => MovementState::Idle,
        }
    }

    /// Active session, if any.
    pub fn session(&self) -> Option<&MovementSession> {
        self.session.as_ref()
    }

    /// Ends the current session (selection changes, re-baselines).
    pub fn end_session(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(axis = ?session.axis, "movement session ended");
        }
    }

    /// Advances one tick for a probe currently at `current`.
    ///
    /// Zero (or non-finite) input ends any session and returns `current`
    /// untouched. Otherwise the probe moves along the locked axis, its
    /// cross-axis is re-snapped, and the result is clamped into
    /// `ctx.bounds`.
    pub fn step(&mut self, current: Vec3, input: Vec2, ctx: &StepContext<'_>) -> Step {
        if input.is_zero() || !input.x().is_finite() || !input.y().is_finite() {
            self.end_session();
            return Step {
                position: current,
                state: MovementState::Idle,
                engaged: false,
                degenerate: false,
            };
        }

        let engaged = self.session.is_none();
        let (session, origin) = match self.session {
            Some(session) => (session, current),
            None => {
                let axis = lock_axis(input);
                let snapped = ctx.lines.snap(current, axis);
                let session = MovementSession {
                    axis,
                    start: snapped.position,
                    line_index: snapped.line_index,
                };
                debug!(
                    ?axis,
                    x = snapped.position.x(),
                    y = snapped.position.y(),
                    line = ?snapped.line_index,
                    "movement lock engaged"
                );
                self.session = Some(session);
                (session, snapped.position)
            }
        };

        let delta = ctx.travel();
        let proposed = match session.axis {
            AxisMode::Horizontal => origin
                .with_x(origin.x() + input.x() * delta)
                .with_y(session.start.y()),
            _ => origin
                .with_y(origin.y() + input.y() * delta)
                .with_x(session.start.x()),
        };
        let resnapped = ctx.lines.snap(proposed, session.axis).position;
        let clamped: Clamped = ctx.bounds.clamp(resnapped);

        Step {
            position: clamped.position,
            state: self.state(),
            engaged,
            degenerate: clamped.is_degenerate(),
        }
    }
}

/// Lock direction for the first tick of a gesture.
pub fn lock_axis(input: Vec2) -> AxisMode {
    if input.x().abs() > input.y().abs() {
        AxisMode::Horizontal
    } else {
        AxisMode::Vertical
    }
}
