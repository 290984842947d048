//! Wind field driving the active cloth.
//!
//! Every tick the controller resamples coherent noise over the active grid
//! and writes one force vector per node into `flow_field`. Gusts are
//! asymmetric: a fully positive sample pushes with the whole force, a fully
//! negative one only pulls back with `pull_ratio` of it.

use crate::config::WindConfig;
use crate::events::SimEvent;
use crate::grid::GridTopology;
use crate::layout::Layout;
use crate::noise_field::NoiseField;
use crate::tools::map_range;
use crate::tween::{Animated, Ease};
use glam::{Vec2, Vec3};

pub struct WindController {
    config: WindConfig,
    noise: NoiseField,
    topology: GridTopology,
    is_blowing: bool,
    force: Animated<f32>,
    direction: Animated<Vec3>,
    flow_field: Vec<Vec3>,
}

impl WindController {
    pub fn new(config: &WindConfig, topology: GridTopology, seed: u32) -> Self {
        Self {
            noise: NoiseField::new(seed, config.spatial_frequency),
            topology,
            is_blowing: false,
            force: Animated::new(0.0),
            direction: Animated::new(config.initial_direction()),
            flow_field: vec![Vec3::ZERO; topology.node_count()],
            config: config.clone(),
        }
    }

    pub fn is_blowing(&self) -> bool {
        self.is_blowing
    }

    pub fn force(&self) -> f32 {
        self.force.value()
    }

    pub fn direction(&self) -> Vec3 {
        self.direction.value()
    }

    pub fn flow_field(&self) -> &[Vec3] {
        &self.flow_field
    }

    pub fn seed(&self) -> u32 {
        self.noise.seed()
    }

    pub fn base_force(&self) -> f32 {
        self.config.base_force
    }

    pub fn set_base_force(&mut self, base_force: f32) {
        self.config.base_force = base_force.max(0.0);
    }

    /// Eases the force up to the base force, or drops it to zero at once.
    pub fn set_blowing(&mut self, blowing: bool, now: f32) {
        self.is_blowing = blowing;
        if blowing {
            self.force.animate_to(
                self.config.base_force,
                now,
                self.config.ramp_up,
                Ease::Power1Out,
            );
        } else {
            self.force.set(0.0);
        }
    }

    /// Biases the wind toward the pointer. Phones keep the default direction.
    pub fn update_direction(&mut self, pointer: Vec2, layout: &Layout, now: f32) {
        if layout.is_mobile() {
            return;
        }
        let current = self.direction.value();
        let target = Vec3::new(
            pointer.x / layout.width - 0.5,
            -(pointer.y / layout.height) + 0.5,
            current.z,
        );
        self.direction
            .animate_to(target, now, self.config.direction_ease, Ease::Power1Out);
    }

    pub fn handle_event(&mut self, event: &SimEvent, now: f32) {
        match event {
            SimEvent::WindBlowing(blowing) => self.set_blowing(*blowing, now),
            SimEvent::StormIsCalmingDown => self.set_blowing(false, now),
            _ => {}
        }
    }

    /// Scalar gust strength for a noise sample in `[-1, 1]`.
    pub fn gust_magnitude(&self, noise: f32) -> f32 {
        let force = self.force.value();
        map_range(noise, -1.0, 1.0, -force * self.config.pull_ratio, force)
    }

    /// Resamples the flow field. Call once per frame before the cloth steps.
    pub fn tick(&mut self, now: f32) {
        self.force.update(now);
        self.direction.update(now);

        let time = now * self.config.time_scale;
        let direction = self.direction.value();
        for i in 0..self.flow_field.len() {
            let (row, col) = self.topology.coords(i);
            let magnitude = self.gust_magnitude(self.noise.sample(row, col, time));
            self.flow_field[i] = direction * magnitude;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn wind() -> WindController {
        WindController::new(&WindConfig::default(), GridTopology::new(8, 8), 1234)
    }

    #[test]
    fn test_flow_field_matches_node_count() {
        let mut wind = wind();
        wind.tick(0.0);
        assert_eq!(wind.flow_field().len(), 81);
    }

    #[rstest]
    #[case(-1.0, -4.0)]
    #[case(1.0, 40.0)]
    #[case(0.0, 18.0)]
    #[case(0.5, 29.0)]
    fn test_gust_magnitude_mapping(#[case] noise: f32, #[case] expected: f32) {
        let mut wind = wind();
        wind.set_blowing(true, 0.0);
        wind.tick(2.0);
        assert_eq!(wind.force(), 40.0);
        assert!((wind.gust_magnitude(noise) - expected).abs() < 1e-4);
    }

    #[test]
    fn test_blowing_ramps_up_and_stops_instantly() {
        let mut wind = wind();
        wind.set_blowing(true, 0.0);
        wind.tick(1.0);
        assert!((wind.force() - 30.0).abs() < 1e-3);

        wind.set_blowing(false, 1.0);
        assert_eq!(wind.force(), 0.0);
        assert!(!wind.is_blowing());
        wind.tick(1.5);
        assert!(wind.flow_field().iter().all(|v| *v == Vec3::ZERO));
    }

    #[test]
    fn test_flow_field_follows_direction() {
        let mut wind = wind();
        wind.set_blowing(true, 0.0);
        wind.tick(3.0);
        let direction = wind.direction().normalize();
        for force in wind.flow_field() {
            if force.length() > 1e-4 {
                let cos = force.normalize().dot(direction).abs();
                assert!((cos - 1.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_pointer_steers_direction_on_desktop() {
        let mut wind = wind();
        let layout = Layout::new(1600.0, 900.0);
        wind.update_direction(Vec2::new(1600.0, 0.0), &layout, 0.0);
        wind.tick(0.2);
        let direction = wind.direction();
        assert!((direction.x - 0.5).abs() < 1e-5);
        assert!((direction.y - 0.5).abs() < 1e-5);
        assert_eq!(direction.z, -1.0);
    }

    #[test]
    fn test_pointer_ignored_on_mobile() {
        let mut wind = wind();
        let layout = Layout::new(390.0, 844.0);
        wind.update_direction(Vec2::new(0.0, 0.0), &layout, 0.0);
        wind.tick(1.0);
        assert_eq!(wind.direction(), Vec3::new(0.5, 0.0, -1.0));
    }

    #[test]
    fn test_storm_calming_stops_wind() {
        let mut wind = wind();
        wind.handle_event(&SimEvent::WindBlowing(true), 0.0);
        assert!(wind.is_blowing());
        wind.handle_event(&SimEvent::StormIsCalmingDown, 0.5);
        assert!(!wind.is_blowing());
        assert_eq!(wind.force(), 0.0);
    }
}
