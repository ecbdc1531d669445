// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The experiment façade: owns the probes, grid lines, movement engine,
//! and history, and exposes the per-tick API to the host loop.
//!
//! Startup is a poll. The host calls [`Experiment::poll_ready`] every tick
//! until the lattice provider publishes grid points; until then every
//! probe-facing operation returns [`ExperimentError::NotInitialized`].

use lattice_geom::{
    DeformationField, GridLines, LatticeGeometry, LatticeProvider, Rect, Tick, Vec2, Vec3,
};
use tracing::{debug, info, warn};

use crate::adjacency::NeighborAdjacency;
use crate::bounds::{resolve_bounds, BoundParams, ResolvedBounds};
use crate::config::ExperimentConfig;
use crate::displacement::ProbeDisplacement;
use crate::error::ExperimentError;
use crate::events::ProbeEvent;
use crate::history::{DisplacementHistory, IterationSnapshot};
use crate::movement::{MovementEngine, MovementState, StepContext};
use crate::probe::{ProbeArena, ProbeView};

/// What one [`Experiment::tick`] committed for the selected probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Selected probe.
    pub index: usize,
    /// Committed position.
    pub position: Vec3,
    /// Movement state after the tick.
    pub state: MovementState,
    /// `true` if this tick engaged a new axis lock.
    pub engaged: bool,
    /// `true` if the probe's bounds were crossed and the midpoint was used.
    pub degenerate: bool,
    /// Tick counter after this tick.
    pub tick: Tick,
}

#[derive(Debug, Clone)]
struct Ready {
    geometry: LatticeGeometry,
    lines: GridLines,
    padded: Rect,
    probes: ProbeArena,
}

impl Ready {
    fn new(geometry: &LatticeGeometry, config: &ExperimentConfig) -> Self {
        Self {
            lines: GridLines::from_geometry(geometry),
            padded: geometry.padded_bounds(config.boundary_padding),
            probes: ProbeArena::ring(geometry, config.probe_spacing_cells),
            geometry: geometry.clone(),
        }
    }

    fn bounds(
        &self,
        adjacency: &NeighborAdjacency,
        config: &ExperimentConfig,
        index: usize,
    ) -> ResolvedBounds {
        let Some(own) = self.probes.original(index) else {
            return ResolvedBounds::unconstrained(self.padded);
        };
        let params = BoundParams {
            lattice: self.padded,
            overlap_buffer: config.overlap_buffer,
            epsilon: config.neighbor_epsilon,
        };
        let neighbors = adjacency
            .neighbors(index)
            .unwrap_or_default()
            .iter()
            .filter_map(|&n| self.probes.original(n))
            .chain(std::iter::once(self.geometry.center()));
        resolve_bounds(own, neighbors, &params)
    }
}

/// One interactive grid-distortion session.
#[derive(Debug, Clone)]
pub struct Experiment {
    config: ExperimentConfig,
    adjacency: NeighborAdjacency,
    ready: Option<Ready>,
    movement: MovementEngine,
    history: DisplacementHistory,
    events: Vec<ProbeEvent>,
    tick: Tick,
}

impl Default for Experiment {
    fn default() -> Self {
        Self::new(ExperimentConfig::default(), NeighborAdjacency::ring())
    }
}

impl Experiment {
    /// Creates an uninitialized experiment with injected collaborators.
    pub fn new(config: ExperimentConfig, adjacency: NeighborAdjacency) -> Self {
        Self {
            config,
            adjacency,
            ready: None,
            movement: MovementEngine::new(),
            history: DisplacementHistory::new(),
            events: Vec::new(),
            tick: Tick::default(),
        }
    }

    /// Polls `provider` and initializes on first availability.
    ///
    /// Once ready, a later poll that sees different geometry recomputes the
    /// grid lines and padded rectangle; probe positions are kept. Returns
    /// [`Experiment::is_ready`].
    pub fn poll_ready<P>(&mut self, provider: &P) -> bool
    where
        P: LatticeProvider + ?Sized,
    {
        let Some(geometry) = provider.geometry() else {
            return self.ready.is_some();
        };
        match &mut self.ready {
            Some(ready) => {
                if ready.geometry != *geometry {
                    ready.lines = GridLines::from_geometry(geometry);
                    ready.padded = geometry.padded_bounds(self.config.boundary_padding);
                    ready.geometry = geometry.clone();
                    info!(
                        cell_size = geometry.cell_size(),
                        grid_size = geometry.grid_size(),
                        "lattice geometry changed; grid lines recomputed"
                    );
                }
            }
            None => {
                let ready = Ready::new(geometry, &self.config);
                if self.adjacency.len() != ready.probes.len() {
                    warn!(
                        probes = ready.probes.len(),
                        adjacency = self.adjacency.len(),
                        "adjacency table does not cover every probe"
                    );
                }
                info!(
                    probes = ready.probes.len(),
                    cell_size = geometry.cell_size(),
                    grid_size = geometry.grid_size(),
                    "experiment initialized"
                );
                self.ready = Some(ready);
            }
        }
        true
    }

    /// `true` once lattice geometry has been received.
    pub fn is_ready(&self) -> bool {
        self.ready.is_some()
    }

    /// Active configuration.
    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Ticks processed since initialization.
    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    /// Movement state of the selected probe.
    pub fn movement_state(&self) -> MovementState {
        self.movement.state()
    }

    /// Lattice geometry in use.
    pub fn geometry(&self) -> Option<&LatticeGeometry> {
        self.ready.as_ref().map(|r| &r.geometry)
    }

    /// Grid-line table in use.
    pub fn grid_lines(&self) -> Option<&GridLines> {
        self.ready.as_ref().map(|r| &r.lines)
    }

    /// Number of tracked probes (0 before initialization).
    pub fn probe_count(&self) -> usize {
        self.ready.as_ref().map_or(0, |r| r.probes.len())
    }

    /// All probes.
    pub fn probes(&self) -> Result<&ProbeArena, ExperimentError> {
        Ok(&self.ready()?.probes)
    }

    /// View of probe `index`.
    pub fn probe(&self, index: usize) -> Result<ProbeView, ExperimentError> {
        self.ready()?.probes.view(index)
    }

    /// Index of the selected probe, if any.
    pub fn selected(&self) -> Option<usize> {
        self.ready.as_ref().and_then(|r| r.probes.selected())
    }

    fn ready(&self) -> Result<&Ready, ExperimentError> {
        self.ready.as_ref().ok_or(ExperimentError::NotInitialized)
    }

    fn ready_mut(&mut self) -> Result<&mut Ready, ExperimentError> {
        self.ready.as_mut().ok_or(ExperimentError::NotInitialized)
    }

    /// Selects probe `index`, deselecting any other.
    ///
    /// Reselecting the selected probe is a no-op. Completed probes cannot be
    /// selected.
    pub fn select(&mut self, index: usize) -> Result<(), ExperimentError> {
        let ready = self.ready.as_mut().ok_or(ExperimentError::NotInitialized)?;
        let index = ready.probes.check(index)?;
        if ready.probes.is_completed(index) {
            return Err(ExperimentError::ProbeCompleted { index });
        }
        let previous = ready.probes.selected();
        if previous == Some(index) {
            return Ok(());
        }
        if let Some(prev) = previous {
            self.events.push(ProbeEvent::Deselected(prev));
        }
        ready.probes.set_selected(Some(index));
        self.movement.end_session();
        self.events.push(ProbeEvent::Selected(index));
        info!(index, "probe selected");
        Ok(())
    }

    /// Clears the selection; returns the probe that was selected.
    pub fn deselect(&mut self) -> Result<Option<usize>, ExperimentError> {
        let ready = self.ready.as_mut().ok_or(ExperimentError::NotInitialized)?;
        let previous = ready.probes.selected();
        if let Some(prev) = previous {
            ready.probes.set_selected(None);
            self.movement.end_session();
            self.events.push(ProbeEvent::Deselected(prev));
            debug!(index = prev, "probe deselected");
        }
        Ok(previous)
    }

    /// Marks the selected probe completed and deselects it.
    pub fn complete_selected(&mut self) -> Result<Option<usize>, ExperimentError> {
        let ready = self.ready.as_mut().ok_or(ExperimentError::NotInitialized)?;
        let Some(index) = ready.probes.selected() else {
            return Ok(None);
        };
        ready.probes.mark_completed(index)?;
        ready.probes.set_selected(None);
        self.movement.end_session();
        self.events.push(ProbeEvent::Deselected(index));
        self.events.push(ProbeEvent::Completed(index));
        info!(index, "probe completed");
        Ok(Some(index))
    }

    /// Nearest probe to `point` within `radius` (lattice plane).
    pub fn probe_at(&self, point: Vec3, radius: f32) -> Result<Option<usize>, ExperimentError> {
        Ok(self.ready()?.probes.nearest_within(point, radius))
    }

    /// Resolved neighbor + lattice bounds of probe `index`.
    pub fn bounds(&self, index: usize) -> Result<ResolvedBounds, ExperimentError> {
        let ready = self.ready()?;
        let index = ready.probes.check(index)?;
        Ok(ready.bounds(&self.adjacency, &self.config, index))
    }

    /// Advances one tick with raw directional `input` over `dt` seconds.
    ///
    /// Returns `Ok(None)` when no probe is selected; otherwise the position
    /// committed for the selected probe.
    pub fn tick(
        &mut self,
        input: Vec2,
        dt: f32,
    ) -> Result<Option<TickOutcome>, ExperimentError> {
        let ready = self.ready.as_mut().ok_or(ExperimentError::NotInitialized)?;
        self.tick = self.tick.next();
        let Some(index) = ready.probes.selected() else {
            self.movement.end_session();
            return Ok(None);
        };
        let current = ready
            .probes
            .current(index)
            .ok_or(ExperimentError::InvalidIndex {
                index,
                len: ready.probes.len(),
            })?;
        let bounds = ready.bounds(&self.adjacency, &self.config, index);
        let ctx = StepContext {
            lines: &ready.lines,
            bounds: &bounds.rect,
            speed: self.config.move_speed,
            dt,
        };
        let step = self.movement.step(current, input, &ctx);
        ready.probes.set_current(index, step.position)?;
        if step.degenerate {
            if step.engaged {
                warn!(
                    index,
                    min_x = bounds.rect.min_x(),
                    max_x = bounds.rect.max_x(),
                    min_y = bounds.rect.min_y(),
                    max_y = bounds.rect.max_y(),
                    "neighbor bounds crossed; resolving to midpoint"
                );
            } else {
                debug!(index, "neighbor bounds crossed");
            }
        }
        Ok(Some(TickOutcome {
            index,
            position: step.position,
            state: step.state,
            engaged: step.engaged,
            degenerate: step.degenerate,
            tick: self.tick,
        }))
    }

    /// Re-baselines every probe onto its grid point plus `field`'s
    /// displacement for that cell. Returns how many probes were moved.
    ///
    /// Probes whose grid point is absent are left untouched.
    pub fn apply_template<F>(&mut self, field: &F) -> Result<usize, ExperimentError>
    where
        F: DeformationField + ?Sized,
    {
        let ready = self.ready_mut()?;
        let mut applied = 0;
        for index in 0..ready.probes.len() {
            let Some((col, row)) = ready.probes.cell(index) else {
                continue;
            };
            let Some(base) = ready.geometry.point(row, col) else {
                debug!(index, col, row, "no grid point for template");
                continue;
            };
            ready
                .probes
                .rebaseline(index, base.add(&field.displacement(col, row)))?;
            applied += 1;
        }
        self.movement.end_session();
        info!(applied, "deformation template applied");
        Ok(applied)
    }

    /// Moves probe `index` back to its original position.
    pub fn reset_probe(&mut self, index: usize) -> Result<Vec3, ExperimentError> {
        let ready = self.ready_mut()?;
        let index = ready.probes.check(index)?;
        let original = ready
            .probes
            .original(index)
            .ok_or(ExperimentError::NoData { index })?;
        ready.probes.set_current(index, original)?;
        if ready.probes.selected() == Some(index) {
            self.movement.end_session();
        }
        Ok(original)
    }

    /// Current displacement of probe `index`.
    pub fn displacement(&self, index: usize) -> Result<ProbeDisplacement, ExperimentError> {
        let probes = &self.ready()?.probes;
        let index = probes.check(index)?;
        match (probes.original(index), probes.current(index)) {
            (Some(original), Some(current)) => {
                Ok(ProbeDisplacement::compute(index, original, current))
            }
            _ => Err(ExperimentError::NoData { index }),
        }
    }

    /// `true` if probe `index` moved beyond the configured threshold.
    pub fn has_moved(&self, index: usize) -> Result<bool, ExperimentError> {
        Ok(self
            .displacement(index)?
            .has_moved(self.config.move_threshold))
    }

    /// Appends one snapshot of every probe's displacement under `iteration`.
    pub fn capture_iteration(
        &mut self,
        iteration: i64,
    ) -> Result<&IterationSnapshot, ExperimentError> {
        let ready = self.ready.as_ref().ok_or(ExperimentError::NotInitialized)?;
        let snapshot = self
            .history
            .capture_iteration(iteration, self.tick, &ready.probes);
        info!(iteration, probes = snapshot.len(), "iteration captured");
        Ok(snapshot)
    }

    /// The displacement history.
    pub fn history(&self) -> &DisplacementHistory {
        &self.history
    }

    /// First snapshot captured under `iteration`.
    pub fn get_iteration(&self, iteration: i64) -> Option<&IterationSnapshot> {
        self.history.get_iteration(iteration)
    }

    /// Most recent snapshot.
    pub fn latest(&self) -> Option<&IterationSnapshot> {
        self.history.latest()
    }

    /// Owned copy of every snapshot in capture order.
    pub fn all_iterations(&self) -> Vec<IterationSnapshot> {
        self.history.all()
    }

    /// Drops the whole history.
    pub fn clear_history(&mut self) {
        self.history.clear();
        info!("displacement history cleared");
    }

    /// Takes the selection events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<ProbeEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn lattice() -> LatticeGeometry {
        LatticeGeometry::regular(1.0, 8, Vec3::new(4.0, 4.0, 0.0))
    }

    fn ready() -> Experiment {
        let mut exp = Experiment::default();
        assert!(exp.poll_ready(&lattice()));
        exp
    }

    #[test]
    fn operations_before_ready_report_not_initialized() {
        let mut exp = Experiment::default();
        let pending: Option<LatticeGeometry> = None;
        assert!(!exp.poll_ready(&pending));
        assert_eq!(exp.select(0), Err(ExperimentError::NotInitialized));
        assert_eq!(
            exp.tick(Vec2::new(1.0, 0.0), 0.1),
            Err(ExperimentError::NotInitialized)
        );
        assert!(exp.capture_iteration(1).is_err());
        assert!(exp.latest().is_none());
        assert_eq!(exp.probe_count(), 0);
        assert_eq!(exp.current_tick(), Tick::new(0));
    }

    #[test]
    fn selection_emits_events_and_switches() {
        let mut exp = ready();
        exp.select(0).expect("select 0");
        exp.select(0).expect("reselect is a no-op");
        exp.select(3).expect("select 3");
        assert_eq!(exp.selected(), Some(3));
        assert_eq!(
            exp.drain_events(),
            vec![
                ProbeEvent::Selected(0),
                ProbeEvent::Deselected(0),
                ProbeEvent::Selected(3)
            ]
        );
        assert!(exp.drain_events().is_empty());
    }

    #[test]
    fn completed_probe_cannot_be_reselected() {
        let mut exp = ready();
        exp.select(2).expect("select 2");
        assert_eq!(exp.complete_selected(), Ok(Some(2)));
        assert_eq!(exp.selected(), None);
        assert!(exp.probe(2).expect("probe 2").is_completed);
        assert_eq!(exp.select(2), Err(ExperimentError::ProbeCompleted { index: 2 }));
        assert_eq!(exp.complete_selected(), Ok(None));
        let events = exp.drain_events();
        assert_eq!(events.last(), Some(&ProbeEvent::Completed(2)));
    }

    #[test]
    fn invalid_index_is_reported() {
        let mut exp = ready();
        assert_eq!(
            exp.select(8),
            Err(ExperimentError::InvalidIndex { index: 8, len: 8 })
        );
        assert!(matches!(
            exp.displacement(42),
            Err(ExperimentError::InvalidIndex { index: 42, .. })
        ));
    }

    #[test]
    fn tick_without_selection_commits_nothing() {
        let mut exp = ready();
        assert_eq!(exp.tick(Vec2::new(1.0, 0.0), 0.1), Ok(None));
        assert_eq!(exp.current_tick(), Tick::new(1));
        assert_eq!(exp.movement_state(), MovementState::Idle);
    }

    #[test]
    fn template_rebaselines_originals() {
        let mut exp = ready();
        #[allow(clippy::cast_precision_loss)]
        let shear = |_col: usize, row: usize| Vec3::new(0.1 * row as f32, 0.0, 0.0);
        assert_eq!(exp.apply_template(&shear), Ok(8));
        let p0 = exp.probe(0).expect("probe 0");
        let original = p0.original.expect("grid point present");
        assert!((original.x() - 2.2).abs() < 1e-5);
        assert_eq!(original.y(), 2.0);
        assert_eq!(p0.current, original);
        assert!(!exp.has_moved(0).expect("probe 0"));
    }

    #[test]
    fn reset_returns_probe_to_original() {
        let mut exp = ready();
        exp.select(0).expect("select");
        exp.tick(Vec2::new(1.0, 0.0), 0.1).expect("tick");
        assert!(exp.has_moved(0).expect("probe 0"));
        assert_eq!(exp.reset_probe(0), Ok(Vec3::new(2.0, 2.0, 0.0)));
        assert!(!exp.has_moved(0).expect("probe 0"));
    }

    #[test]
    fn geometry_change_recomputes_lines() {
        let mut exp = ready();
        let bigger = LatticeGeometry::regular(2.0, 8, Vec3::new(8.0, 8.0, 0.0));
        assert!(exp.poll_ready(&bigger));
        assert_eq!(exp.grid_lines().map(|l| l.xs().len()), Some(9));
        assert_eq!(exp.grid_lines().and_then(|l| l.xs().last().copied()), Some(16.0));
        // Probes keep their positions.
        assert_eq!(exp.probe(0).expect("probe 0").current, Vec3::new(2.0, 2.0, 0.0));
    }
}
