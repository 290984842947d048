//! Scene orchestration: one `tick` per frame drives everything in a fixed order.
//!
//! ```text
//! intro timer -> scroll ease + settle -> event dispatch -> gravity, camera
//!   -> wind resample -> physics step -> cloth settle/calm -> wind forces -> draw
//! ```

use crate::config::StageConfig;
use crate::constants::{ANGLE, PERSPECTIVE};
use crate::error::Result;
use crate::events::{EventBus, SimEvent};
use crate::layout::{Layout, SimContext};
use crate::physics::{ParticleWorld, PhysicsBackend};
use crate::slideshow::{ContentBounds, SlideSpec, Slideshow};
use crate::tile::Rect;
use crate::timer::Deferred;
use crate::tween::{Animated, Ease};
use glam::{Vec2, Vec3};
use log::info;

/// Perspective camera rolled around its view axis, tilting further with scroll speed.
#[derive(Debug, Clone)]
pub struct CameraRig {
    base_roll: f32,
    roll: Animated<f32>,
    tilt_factor: f32,
    tilt_duration: f32,
}

impl CameraRig {
    pub fn new(config: &StageConfig) -> Self {
        Self {
            base_roll: -ANGLE,
            roll: Animated::new(-ANGLE),
            tilt_factor: config.camera_tilt_factor,
            tilt_duration: config.camera_tilt_duration,
        }
    }

    pub fn base_roll(&self) -> f32 {
        self.base_roll
    }

    /// Current roll around the view axis, radians.
    pub fn roll(&self) -> f32 {
        self.roll.value()
    }

    pub fn on_delta(&mut self, delta: f32, now: f32) {
        let to = self.base_roll - delta * self.tilt_factor;
        self.roll
            .animate_to(to, now, self.tilt_duration, Ease::StrongOut);
    }

    pub fn update(&mut self, now: f32) {
        self.roll.update(now);
    }

    /// Vertical field of view (radians) that maps one world unit to one pixel at z = 0.
    pub fn fov(layout: &Layout) -> f32 {
        2.0 * (layout.height / 2.0 / PERSPECTIVE).atan()
    }

    pub fn position() -> Vec3 {
        Vec3::new(0.0, 0.0, PERSPECTIVE)
    }
}

pub struct Stage<B: PhysicsBackend = ParticleWorld> {
    bus: EventBus,
    slideshow: Slideshow<B>,
    camera: CameraRig,
    gravity: Animated<f32>,
    gravity_strength: f32,
    gravity_ramp: f32,
    intro_delay: f32,
    intro: Deferred,
    started: bool,
}

impl Stage<ParticleWorld> {
    pub fn new(ctx: SimContext, specs: &[SlideSpec], content: ContentBounds) -> Result<Self> {
        let world = ParticleWorld::new(ctx.config.physics.solver_iterations);
        Self::with_backend(ctx, specs, content, world)
    }
}

impl<B: PhysicsBackend> Stage<B> {
    pub fn with_backend(
        ctx: SimContext,
        specs: &[SlideSpec],
        content: ContentBounds,
        backend: B,
    ) -> Result<Self> {
        let bus = EventBus::new();
        let camera = CameraRig::new(&ctx.config.stage);
        let gravity_strength = ctx.config.physics.gravity;
        let gravity_ramp = ctx.config.physics.gravity_ramp;
        let intro_delay = ctx.config.stage.intro_delay;
        let slideshow = Slideshow::new(ctx, specs, content, backend, bus.clone())?;
        info!("Stage ready");

        Ok(Self {
            bus,
            slideshow,
            camera,
            gravity: Animated::new(0.0),
            gravity_strength,
            gravity_ramp,
            intro_delay,
            intro: Deferred::default(),
            started: false,
        })
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn slideshow(&self) -> &Slideshow<B> {
        &self.slideshow
    }

    pub fn slideshow_mut(&mut self) -> &mut Slideshow<B> {
        &mut self.slideshow
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// World gravity along y (negative is down).
    pub fn gravity(&self) -> f32 {
        self.gravity.value()
    }

    pub fn on_wheel(&mut self, delta_y: f32, now: f32) {
        self.slideshow.on_wheel(delta_y, now);
    }

    pub fn on_pointer_down(&mut self, pointer: Vec2) {
        self.slideshow.on_pointer_down(pointer);
    }

    pub fn on_pointer_move(&mut self, pointer: Vec2, now: f32) {
        self.slideshow.on_pointer_move(pointer, now);
    }

    pub fn on_pointer_up(&mut self, leaving_window: bool, now: f32) {
        self.slideshow.on_pointer_up(leaving_window, now);
    }

    pub fn resize(&mut self, layout: Layout, rects: &[Rect], content: ContentBounds) -> Result<()> {
        self.slideshow.resize(layout, rects, content)
    }

    pub fn tick(&mut self, now: f32) -> Result<()> {
        if !self.started {
            self.started = true;
            self.intro.schedule(now, self.intro_delay);
        }
        if self.intro.fire(now) {
            self.bus.publish(SimEvent::WindBlowing(true));
            self.bus.publish(SimEvent::ToggleGravity(true));
        }

        self.slideshow.update_scroll(now)?;
        self.dispatch(now);

        self.gravity.update(now);
        let gravity = self.gravity.value();
        self.slideshow.cloth_mut().set_gravity(gravity);
        self.camera.update(now);

        self.slideshow.simulate(now);
        self.slideshow.draw(now);
        Ok(())
    }

    fn dispatch(&mut self, now: f32) {
        for event in self.bus.drain() {
            match event {
                SimEvent::ToggleGravity(true) => self.gravity.animate_to(
                    -self.gravity_strength,
                    now,
                    self.gravity_ramp,
                    Ease::Power1Out,
                ),
                SimEvent::ToggleGravity(false) => self.gravity.set(0.0),
                SimEvent::RotateCam { delta } => self.camera.on_delta(delta, now),
                _ => {}
            }
            self.slideshow.handle_event(&event, now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloth::ClothState;
    use crate::config::SimConfig;

    const DT: f32 = 1.0 / 60.0;

    fn stage() -> Stage {
        let mut config = SimConfig::default();
        config.wind.seed = Some(21);
        let specs = vec![
            SlideSpec {
                rect: Rect::new(600.0, 300.0, 400.0, 300.0),
                title: "Dune".into(),
            },
            SlideSpec {
                rect: Rect::new(600.0, 700.0, 400.0, 300.0),
                title: "Shore".into(),
            },
        ];
        let content = ContentBounds {
            wrap_top: 0.0,
            wrap_height: 900.0,
            margin_bottom: 100.0,
        };
        Stage::new(SimContext::new(Layout::new(1600.0, 900.0), config), &specs, content).unwrap()
    }

    fn run(stage: &mut Stage, from: f32, to: f32) -> f32 {
        let mut now = from;
        while now < to {
            now += DT;
            stage.tick(now).unwrap();
        }
        now
    }

    #[test]
    fn test_intro_starts_wind_and_gravity() {
        let mut stage = stage();
        let now = run(&mut stage, 0.0, 0.9);
        assert!(!stage.slideshow().wind().is_blowing());
        assert_eq!(stage.gravity(), 0.0);

        let now = run(&mut stage, now, 1.1);
        assert!(stage.slideshow().wind().is_blowing());
        assert!(stage.gravity() < 0.0);

        run(&mut stage, now, 3.5);
        assert_eq!(stage.gravity(), -800.0);
        assert_eq!(stage.slideshow().wind().force(), 40.0);
    }

    #[test]
    fn test_wind_deforms_active_tile() {
        let mut stage = stage();
        run(&mut stage, 0.0, 2.0);
        let geometry = &stage.slideshow().active_slide().tile.geometry;
        assert!(geometry.is_dirty());
        let moved = geometry
            .positions()
            .iter()
            .zip(geometry.initial_positions())
            .any(|(p, i)| (*p - *i).length() > 1e-3);
        assert!(moved);
    }

    #[test]
    fn test_wheel_calms_storm_and_rests_cloth() {
        let mut stage = stage();
        let now = run(&mut stage, 0.0, 1.5);
        stage.on_wheel(50.0, now);
        stage.tick(now + DT).unwrap();
        assert!(!stage.slideshow().wind().is_blowing());
        assert_eq!(stage.slideshow().cloth().state(), ClothState::Resting);
    }

    #[test]
    fn test_scroll_tilts_camera() {
        let mut stage = stage();
        assert_eq!(stage.camera().roll(), -ANGLE);
        stage.on_wheel(100.0, 0.0);
        run(&mut stage, 0.0, 0.05);
        assert!(stage.camera().roll() < -ANGLE);
    }

    #[test]
    fn test_camera_rig_eases_back_to_base() {
        let mut rig = CameraRig::new(&StageConfig::default());
        rig.on_delta(0.5, 0.0);
        rig.update(1.0);
        assert!((rig.roll() - (-ANGLE - 0.1)).abs() < 1e-6);
        rig.on_delta(0.0, 1.0);
        rig.update(2.0);
        assert_eq!(rig.roll(), rig.base_roll());
    }

    #[test]
    fn test_fov_matches_pixel_scale() {
        let layout = Layout::new(1600.0, 900.0);
        let fov = CameraRig::fov(&layout);
        let half_height = (fov / 2.0).tan() * PERSPECTIVE;
        assert!((half_height - 450.0).abs() < 1e-2);
    }

    #[test]
    fn test_gravity_off_is_instant() {
        let mut stage = stage();
        run(&mut stage, 0.0, 3.5);
        stage.bus().publish(SimEvent::ToggleGravity(false));
        stage.tick(3.6).unwrap();
        assert_eq!(stage.gravity(), 0.0);
    }
}
