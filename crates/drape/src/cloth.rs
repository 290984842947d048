//! Cloth simulation of the active tile.
//!
//! The sheet is a grid of point masses joined to their right and lower
//! neighbours, with every top-row node hung from a static anchor above it.
//! Nodes live in the physics backend; this module owns their handles and is
//! the only code that moves them.
//!
//! Settling goes through three states:
//!
//! ```text
//! Active --rest()--> Resting --tween done--> AwaitingWake --delay--> Active
//!                       ^                         |
//!                       +--------rest()-----------+
//! ```
//!
//! A rest request while the tween runs is ignored; one arriving while the
//! wake timer is pending restarts the tween and replaces the timer.

use crate::config::ClothConfig;
use crate::error::{DrapeError, Result};
use crate::events::SimEvent;
use crate::grid::GridTopology;
use crate::layout::SimContext;
use crate::physics::{ConstraintHandle, ParticleDesc, ParticleHandle, PhysicsBackend, ParticleWorld};
use crate::tile::{Tile, TileGeometry};
use crate::timer::Deferred;
use crate::tween::{Ease, Tween, TweenState};
use crate::wind::WindController;
use glam::{Vec2, Vec3};
use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClothState {
    Active,
    Resting,
    AwaitingWake,
}

pub struct ClothSimulator<B: PhysicsBackend = ParticleWorld> {
    backend: B,
    topology: GridTopology,
    nodes: Vec<ParticleHandle>,
    anchors: Vec<ParticleHandle>,
    rest_positions: Vec<Vec3>,
    extent: Vec2,
    node_mass: f32,
    linear_damping: f32,
    anchor_height: f32,
    structural_constraints: usize,
    anchor_constraints: usize,
    timestep: f32,
    rest_duration: f32,
    rest_stagger: f32,
    wake_delay: f32,
    calm_while_blowing: bool,
    calming: bool,
    state: ClothState,
    settle: Vec<Tween<Vec3>>,
    wake_timer: Deferred,
}

impl<B: PhysicsBackend> ClothSimulator<B> {
    pub fn new(tile: &Tile, backend: B, ctx: &SimContext) -> Result<Self> {
        let topology = tile.geometry.topology();
        if topology.columns == 0 || topology.rows == 0 || tile.geometry.is_empty() {
            return Err(DrapeError::EmptyGrid);
        }
        let ClothConfig {
            total_mass,
            linear_damping,
            anchor_height,
            rest_duration,
            rest_stagger,
            wake_delay,
            calm_while_blowing,
        } = ctx.config.cloth.clone();
        let timestep = ctx.config.physics.timestep;
        let device = ctx.device();

        let mut cloth = Self {
            backend,
            topology,
            nodes: Vec::with_capacity(topology.node_count()),
            anchors: Vec::with_capacity(topology.stride()),
            rest_positions: Vec::with_capacity(topology.node_count()),
            extent: tile.rect.size(),
            node_mass: total_mass.get(device) / (topology.columns * topology.rows) as f32,
            linear_damping,
            anchor_height,
            structural_constraints: 0,
            anchor_constraints: 0,
            timestep,
            rest_duration: rest_duration.get(device),
            rest_stagger,
            wake_delay: wake_delay.get(device),
            calm_while_blowing,
            calming: false,
            state: ClothState::Active,
            settle: Vec::new(),
            wake_timer: Deferred::default(),
        };
        cloth.rebuild(tile)?;
        info!(
            "Cloth built: {} nodes, {} structural + {} anchor constraints",
            cloth.nodes.len(),
            cloth.structural_constraints,
            cloth.anchor_constraints
        );
        Ok(cloth)
    }

    /// Recomputes rest positions from the tile's geometry and size.
    ///
    /// The first call creates nodes, constraints and anchors. Later calls only
    /// move existing nodes (and their anchors); constraint lengths stay as built.
    pub fn rebuild(&mut self, tile: &Tile) -> Result<()> {
        let geometry = &tile.geometry;
        let size = tile.rect.size();
        let is_init = self.nodes.is_empty();

        if !is_init && geometry.len() != self.nodes.len() {
            return Err(DrapeError::TopologyMismatch {
                expected: self.nodes.len(),
                found: geometry.len(),
            });
        }

        self.extent = size;
        self.rest_positions.clear();
        self.rest_positions.extend(
            geometry
                .initial_positions()
                .iter()
                .map(|p| Vec3::new(p.x * size.x, p.y * size.y, p.z)),
        );

        if is_init {
            for position in &self.rest_positions {
                let handle = self.backend.add_particle(ParticleDesc {
                    position: *position,
                    mass: self.node_mass,
                    linear_damping: self.linear_damping,
                });
                self.nodes.push(handle);
            }
            self.sew_everything()?;
        } else {
            for (i, node) in self.nodes.iter().enumerate() {
                self.backend.set_position(*node, self.rest_positions[i]);
                self.backend.set_velocity(*node, Vec3::ZERO);
            }
            for (col, anchor) in self.anchors.iter().enumerate() {
                let above = self.rest_positions[col] + Vec3::Y * self.anchor_height;
                self.backend.set_position(*anchor, above);
            }
        }
        Ok(())
    }

    fn sew_everything(&mut self) -> Result<()> {
        for (i, j) in self.topology.structural_pairs() {
            self.connect(i, j)?;
        }
        for i in self.topology.top_row() {
            let above = self.rest_positions[i] + Vec3::Y * self.anchor_height;
            let anchor = self.backend.add_particle(ParticleDesc::fixed(above));
            self.backend.add_constraint(self.nodes[i], anchor);
            self.anchors.push(anchor);
            self.anchor_constraints += 1;
        }
        Ok(())
    }

    /// Structural constraint between nodes `i` and `j` at their current distance.
    pub fn connect(&mut self, i: usize, j: usize) -> Result<ConstraintHandle> {
        let count = self.nodes.len();
        for index in [i, j] {
            if index >= count {
                return Err(DrapeError::NodeOutOfRange { index, count });
            }
        }
        let handle = self.backend.add_constraint(self.nodes[i], self.nodes[j]);
        self.structural_constraints += 1;
        Ok(handle)
    }

    pub fn topology(&self) -> GridTopology {
        self.topology
    }

    pub fn state(&self) -> ClothState {
        self.state
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_mass(&self) -> f32 {
        self.node_mass
    }

    pub fn structural_constraint_count(&self) -> usize {
        self.structural_constraints
    }

    pub fn anchor_constraint_count(&self) -> usize {
        self.anchor_constraints
    }

    pub fn rest_positions(&self) -> &[Vec3] {
        &self.rest_positions
    }

    pub fn node_position(&self, index: usize) -> Vec3 {
        self.backend.position(self.nodes[index])
    }

    pub fn node_velocity(&self, index: usize) -> Vec3 {
        self.backend.velocity(self.nodes[index])
    }

    pub fn is_node_sleeping(&self, index: usize) -> bool {
        self.backend.is_sleeping(self.nodes[index])
    }

    pub fn anchor_position(&self, col: usize) -> Vec3 {
        self.backend.position(self.anchors[col])
    }

    pub fn has_pending_wake(&self) -> bool {
        self.wake_timer.is_pending()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn set_gravity(&mut self, gravity_y: f32) {
        self.backend.set_gravity(Vec3::new(0.0, gravity_y, 0.0));
    }

    pub fn handle_event(&mut self, event: &SimEvent, now: f32) {
        match event {
            SimEvent::StormIsCalmingDown => self.rest(now),
            SimEvent::WindBlowing(blowing) => self.calming = *blowing,
            _ => {}
        }
    }

    /// One fixed-size backend step.
    pub fn step(&mut self) {
        self.backend.step(self.timestep);
    }

    /// Pushes the current flow field into the nodes for the next step.
    pub fn apply_wind(&mut self, wind: &WindController) {
        if !wind.is_blowing() {
            return;
        }
        for (node, force) in self.nodes.iter().zip(wind.flow_field()) {
            self.backend.apply_force(*node, *force);
        }
    }

    /// Advances the settle tween and wake timer, then damps velocities while the wind blows.
    pub fn update(&mut self, now: f32) {
        self.advance_settle(now);
        if self.wake_timer.fire(now) {
            self.wake_all();
            self.state = ClothState::Active;
            debug!("Cloth awake");
        }
        if self.calm_while_blowing && self.calming {
            for node in &self.nodes {
                self.backend.set_velocity(*node, Vec3::ZERO);
            }
        }
    }

    fn advance_settle(&mut self, now: f32) {
        if self.settle.is_empty() {
            return;
        }
        let mut done = true;
        for (node, tween) in self.nodes.iter().zip(&self.settle) {
            match tween.update(now) {
                TweenState::Pending => done = false,
                TweenState::Running(p) => {
                    self.backend.set_position(*node, p);
                    done = false;
                }
                TweenState::Finished(p) => self.backend.set_position(*node, p),
            }
        }
        if done {
            self.settle.clear();
            self.state = ClothState::AwaitingWake;
            self.wake_timer.schedule(now, self.wake_delay);
        }
    }

    /// Freezes the sheet and eases every node back to its rest position,
    /// row by row.
    pub fn rest(&mut self, now: f32) {
        if self.state == ClothState::Resting {
            return;
        }
        self.state = ClothState::Resting;
        self.wake_timer.cancel();

        let rows = self.topology.rows as f32;
        self.settle.clear();
        for (i, node) in self.nodes.iter().enumerate() {
            self.backend.set_velocity(*node, Vec3::ZERO);
            self.backend.sleep(*node);
            let (row, _) = self.topology.coords(i);
            let tween = Tween::start(
                self.backend.position(*node),
                self.rest_positions[i],
                now,
                self.rest_duration,
                Ease::Power2Out,
            )
            .with_delay(self.rest_stagger * row as f32 / rows);
            self.settle.push(tween);
        }
        debug!("Cloth resting");
    }

    fn wake_all(&mut self) {
        for node in &self.nodes {
            self.backend.wake(*node);
        }
    }

    /// Zero velocity and rest position for every node, no tween.
    pub fn force_reset(&mut self) {
        for (node, rest) in self.nodes.iter().zip(&self.rest_positions) {
            self.backend.set_velocity(*node, Vec3::ZERO);
            self.backend.set_position(*node, *rest);
        }
    }

    /// Drops every pending settle step, snaps the sheet flat and re-fits it to `tile`.
    pub fn change_active_tile(&mut self, tile: &Tile) -> Result<()> {
        self.settle.clear();
        self.wake_timer.cancel();
        self.force_reset();
        self.rebuild(tile)?;
        self.wake_all();
        self.state = ClothState::Active;
        info!("Cloth moved to a {}x{} tile", tile.rect.width, tile.rect.height);
        Ok(())
    }

    /// Writes node positions, normalised by the tile size, into `geometry`.
    pub fn render(&self, geometry: &mut TileGeometry) {
        for (i, node) in self.nodes.iter().enumerate().take(geometry.len()) {
            let p = self.backend.position(*node);
            geometry.set_position(i, Vec3::new(p.x / self.extent.x, p.y / self.extent.y, p.z));
        }
        geometry.mark_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::layout::Layout;
    use crate::tile::Rect;
    use rstest::rstest;

    const DT: f32 = 1.0 / 60.0;

    fn ctx() -> SimContext {
        SimContext::new(Layout::new(1600.0, 900.0), SimConfig::default())
    }

    fn tile_with(columns: usize, rows: usize, width: f32, height: f32) -> Tile {
        Tile::new(
            Rect::new(100.0, 100.0, width, height),
            GridTopology::new(columns, rows),
            &ctx().layout,
        )
    }

    fn cloth() -> ClothSimulator {
        ClothSimulator::new(&tile_with(8, 8, 400.0, 300.0), ParticleWorld::default(), &ctx()).unwrap()
    }

    /// Runs the per-frame cloth work from `from` to `to` seconds.
    fn run(cloth: &mut ClothSimulator, from: f32, to: f32) -> f32 {
        let mut now = from;
        while now < to {
            now += DT;
            cloth.step();
            cloth.update(now);
        }
        now
    }

    #[test]
    fn test_constraint_counts_for_8x8() {
        let cloth = cloth();
        assert_eq!(cloth.node_count(), 81);
        assert_eq!(cloth.structural_constraint_count(), 144);
        assert_eq!(cloth.anchor_constraint_count(), 9);
        assert_eq!(cloth.backend().constraint_count(), 153);
        assert_eq!(cloth.backend().particle_count(), 81 + 9);

        let right = cloth
            .backend()
            .constraints()
            .iter()
            .filter(|c| c.b.0 == c.a.0 + 1)
            .count();
        let down = cloth
            .backend()
            .constraints()
            .iter()
            .filter(|c| c.b.0 == c.a.0 + 9)
            .count();
        assert_eq!(right, 72);
        assert_eq!(down, 72);
    }

    #[rstest]
    #[case(0, 8)]
    #[case(8, 0)]
    fn test_degenerate_grid_is_rejected(#[case] columns: usize, #[case] rows: usize) {
        let tile = tile_with(columns, rows, 400.0, 300.0);
        let result = ClothSimulator::new(&tile, ParticleWorld::default(), &ctx());
        assert!(matches!(result, Err(DrapeError::EmptyGrid)));
    }

    #[test]
    fn test_connect_rejects_out_of_range() {
        let mut cloth = cloth();
        let err = cloth.connect(0, 81).unwrap_err();
        assert!(matches!(err, DrapeError::NodeOutOfRange { index: 81, count: 81 }));
        assert_eq!(cloth.structural_constraint_count(), 144);
    }

    #[test]
    fn test_mass_is_shared_between_quads() {
        let cloth = cloth();
        assert!((cloth.node_mass() - 1.0 / 64.0).abs() < 1e-7);

        let mobile = SimContext::new(Layout::new(390.0, 844.0), SimConfig::default());
        let phone = ClothSimulator::new(&tile_with(8, 8, 300.0, 200.0), ParticleWorld::default(), &mobile)
            .unwrap();
        assert!((phone.node_mass() - 3.0 / 64.0).abs() < 1e-7);
    }

    #[test]
    fn test_anchors_hang_above_top_row() {
        let cloth = cloth();
        for col in 0..9 {
            let expected = cloth.rest_positions()[col] + Vec3::Y * 100.0;
            assert_eq!(cloth.anchor_position(col), expected);
        }
    }

    #[test]
    fn test_render_at_rest_is_normalised_plane() {
        let cloth = cloth();
        let mut geometry = TileGeometry::new(GridTopology::new(8, 8));
        geometry.take_dirty();
        cloth.render(&mut geometry);
        assert!(geometry.is_dirty());
        for (p, initial) in geometry.positions().iter().zip(geometry.initial_positions()) {
            assert!((*p - *initial).length() < 1e-5);
            assert!((-0.5..=0.5).contains(&p.x));
            assert!((-0.5..=0.5).contains(&p.y));
        }
    }

    #[test]
    fn test_rest_sleeps_then_wakes_after_delay() {
        let mut cloth = cloth();
        cloth.set_gravity(-800.0);
        let now = run(&mut cloth, 0.0, 0.5);

        cloth.rest(now);
        assert_eq!(cloth.state(), ClothState::Resting);
        assert!((0..81).all(|i| cloth.is_node_sleeping(i)));
        assert!((0..81).all(|i| cloth.node_velocity(i) == Vec3::ZERO));

        // 0.8 s tween + 0.1 s stagger
        let now = run(&mut cloth, now, now + 0.95);
        assert_eq!(cloth.state(), ClothState::AwaitingWake);
        assert!(cloth.has_pending_wake());
        for i in 0..81 {
            assert!((cloth.node_position(i) - cloth.rest_positions()[i]).length() < 1e-3);
        }

        run(&mut cloth, now, now + 1.05);
        assert_eq!(cloth.state(), ClothState::Active);
        assert!((0..81).all(|i| !cloth.is_node_sleeping(i)));
    }

    #[test]
    fn test_rest_is_ignored_while_tween_runs() {
        let mut cloth = cloth();
        cloth.rest(0.0);
        let now = run(&mut cloth, 0.0, 0.3);
        cloth.rest(now);

        // Had the second request restarted the tween, it would still be running here.
        let now = run(&mut cloth, now, 0.95);
        assert_eq!(cloth.state(), ClothState::AwaitingWake);
        run(&mut cloth, now, 2.0);
        assert_eq!(cloth.state(), ClothState::Active);
    }

    #[test]
    fn test_rest_during_wake_delay_replaces_timer() {
        let mut cloth = cloth();
        cloth.rest(0.0);
        let now = run(&mut cloth, 0.0, 0.95);
        assert!(cloth.has_pending_wake());

        cloth.rest(now);
        assert_eq!(cloth.state(), ClothState::Resting);
        assert!(!cloth.has_pending_wake());

        // The first timer would have fired at ~1.95 s.
        let now = run(&mut cloth, now, 2.1);
        assert_ne!(cloth.state(), ClothState::Active);
        assert!((0..81).all(|i| cloth.is_node_sleeping(i)));

        run(&mut cloth, now, 3.2);
        assert_eq!(cloth.state(), ClothState::Active);
        assert!((0..81).all(|i| !cloth.is_node_sleeping(i)));
    }

    #[test]
    fn test_change_tile_mid_settle_resets_and_cancels() {
        let mut cloth = cloth();
        cloth.set_gravity(-800.0);
        let now = run(&mut cloth, 0.0, 0.5);
        cloth.rest(now);
        let now = run(&mut cloth, now, now + 0.95);
        assert!(cloth.has_pending_wake());

        let next = tile_with(8, 8, 600.0, 450.0);
        cloth.change_active_tile(&next).unwrap();

        assert!(!cloth.has_pending_wake());
        assert_eq!(cloth.state(), ClothState::Active);
        assert_eq!(cloth.backend().constraint_count(), 153);
        for (i, initial) in next.geometry.initial_positions().iter().enumerate() {
            let expected = Vec3::new(initial.x * 600.0, initial.y * 450.0, initial.z);
            assert_eq!(cloth.node_position(i), expected);
            assert_eq!(cloth.node_velocity(i), Vec3::ZERO);
            assert!(!cloth.is_node_sleeping(i));
        }
        assert_eq!(cloth.anchor_position(0), cloth.rest_positions()[0] + Vec3::Y * 100.0);

        // No stale wake or tween touches the new sheet.
        cloth.set_gravity(0.0);
        run(&mut cloth, now, now + 3.0);
        assert_eq!(cloth.state(), ClothState::Active);
    }

    #[test]
    fn test_change_tile_while_settle_tween_runs() {
        let mut cloth = cloth();
        cloth.set_gravity(-800.0);
        let now = run(&mut cloth, 0.0, 0.5);
        cloth.rest(now);
        let now = run(&mut cloth, now, now + 0.3);
        assert_eq!(cloth.state(), ClothState::Resting);

        let next = tile_with(8, 8, 400.0, 300.0);
        cloth.change_active_tile(&next).unwrap();
        assert_eq!(cloth.state(), ClothState::Active);
        assert!(!cloth.has_pending_wake());

        // A leftover tween sample would drag nodes back toward their pre-change path.
        cloth.set_gravity(0.0);
        let now = run(&mut cloth, now, now + 1.5);
        for i in 0..81 {
            assert!((cloth.node_position(i) - cloth.rest_positions()[i]).length() < 1e-3);
            assert!(!cloth.is_node_sleeping(i));
        }
        assert_eq!(cloth.state(), ClothState::Active);
        run(&mut cloth, now, now + 1.5);
        assert_eq!(cloth.state(), ClothState::Active);
    }

    #[test]
    fn test_tile_change_keeps_constraint_lengths() {
        let mut cloth = cloth();
        let before: Vec<f32> = cloth
            .backend()
            .constraints()
            .iter()
            .map(|c| c.rest_length)
            .collect();

        cloth.change_active_tile(&tile_with(8, 8, 600.0, 450.0)).unwrap();
        let after: Vec<f32> = cloth
            .backend()
            .constraints()
            .iter()
            .map(|c| c.rest_length)
            .collect();
        assert_eq!(before, after);
        assert_eq!(cloth.node_position(80), Vec3::new(300.0, -225.0, 0.0));
    }

    #[test]
    fn test_rebuild_with_other_topology_is_rejected() {
        let mut cloth = cloth();
        let other = tile_with(4, 4, 400.0, 300.0);
        let err = cloth.change_active_tile(&other).unwrap_err();
        assert!(matches!(err, DrapeError::TopologyMismatch { expected: 81, found: 25 }));
    }

    #[test]
    fn test_wind_only_applies_while_blowing() {
        let config = SimConfig::default();
        let mut wind = WindController::new(&config.wind, GridTopology::new(8, 8), 99);
        let mut cloth = cloth();

        wind.tick(0.5);
        cloth.apply_wind(&wind);
        cloth.step();
        assert!((0..81).all(|i| cloth.node_position(i) == cloth.rest_positions()[i]));

        wind.set_blowing(true, 0.0);
        wind.tick(2.5);
        cloth.apply_wind(&wind);
        cloth.step();
        let moved = (9..81).any(|i| (cloth.node_position(i) - cloth.rest_positions()[i]).length() > 1e-4);
        assert!(moved);
    }

    #[test]
    fn test_calming_zeroes_velocities_while_blowing() {
        let mut cloth = cloth();
        cloth.set_gravity(-800.0);
        cloth.handle_event(&SimEvent::WindBlowing(true), 0.0);
        cloth.step();
        assert!((9..81).any(|i| cloth.node_velocity(i) != Vec3::ZERO));
        cloth.update(DT);
        assert!((0..81).all(|i| cloth.node_velocity(i) == Vec3::ZERO));
    }

    #[test]
    fn test_storm_event_starts_rest() {
        let mut cloth = cloth();
        cloth.handle_event(&SimEvent::StormIsCalmingDown, 0.0);
        assert_eq!(cloth.state(), ClothState::Resting);
    }
}
