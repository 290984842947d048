//! Wheel and drag input turned into an eased scroll offset.
//!
//! Input moves `target`; every tick `current` chases it exponentially and the
//! remaining gap, scaled down, is published as the camera tilt signal. After
//! the input goes quiet a settle timer asks the owner to snap onto a slide,
//! which the controller then tweens `target` to.

use crate::config::ScrollConfig;
use crate::events::{EventBus, SimEvent};
use crate::layout::DeviceClass;
use crate::timer::Deferred;
use crate::tween::{Animated, Ease, Tween, TweenState};
use log::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    pub target: f32,
    pub current: f32,
    /// `current` rounded to two decimals, what tiles are positioned with.
    pub current_rounded: f32,
    pub diff: f32,
    pub min: f32,
    pub max: f32,
    /// Offset committed by the last wheel event, drag release or snap.
    pub off: f32,
    pub dragging: bool,
    pub scrolling: bool,
    pub autoscroll: bool,
    pub text_transition: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPhase {
    Idle,
    Scrolling,
    Settling,
}

/// What the owner has to act on after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollSignal {
    /// Input went quiet; pick the closest slide and call [`ScrollController::slide_to`].
    SnapRequested,
    /// The snap tween landed.
    Settled,
}

pub struct ScrollController {
    config: ScrollConfig,
    device: DeviceClass,
    bus: EventBus,
    state: ScrollState,
    phase: ScrollPhase,
    start_y: f32,
    settle_timer: Deferred,
    wind_timer: Deferred,
    snap: Option<Tween<f32>>,
    text_hide: Deferred,
    text_visibility: Animated<f32>,
}

impl ScrollController {
    pub fn new(config: &ScrollConfig, device: DeviceClass, bus: EventBus) -> Self {
        Self {
            config: config.clone(),
            device,
            bus,
            state: ScrollState::default(),
            phase: ScrollPhase::Idle,
            start_y: 0.0,
            settle_timer: Deferred::default(),
            wind_timer: Deferred::default(),
            snap: None,
            text_hide: Deferred::default(),
            text_visibility: Animated::new(1.0),
        }
    }

    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    pub fn phase(&self) -> ScrollPhase {
        self.phase
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.config.speed = speed;
    }

    pub fn set_ease(&mut self, ease: f32) {
        self.config.ease = ease.clamp(0.0, 1.0);
    }

    pub fn set_device(&mut self, device: DeviceClass) {
        self.device = device;
    }

    pub fn set_bounds(&mut self, min: f32, max: f32) {
        self.state.min = min;
        self.state.max = max;
    }

    pub fn is_settle_pending(&self) -> bool {
        self.settle_timer.is_pending()
    }

    pub fn is_wind_resume_pending(&self) -> bool {
        self.wind_timer.is_pending()
    }

    /// 0 when the slide caption is hidden, 1 when fully shown.
    pub fn text_visibility(&self) -> f32 {
        self.text_visibility.value()
    }

    pub fn on_wheel(&mut self, delta_y: f32, now: f32) {
        let diff = self.state.diff;
        let delta = delta_y.clamp(-self.config.wheel_clamp, self.config.wheel_clamp);
        self.state.off += delta * self.config.speed;
        self.state.target = self.state.off;
        self.interrupt();

        self.hide_texts(now);
        self.bus.publish(SimEvent::StormIsCalmingDown);

        if diff.abs() >= self.config.restart_diff_min {
            self.restart_quiet_timer(now);
        }
        if diff.abs() < self.config.autoscroll_diff_max {
            self.restart_autoscroll_timer(now, false);
        }
    }

    pub fn on_pointer_down(&mut self, y: f32) {
        self.state.dragging = true;
        self.start_y = y;
        self.cancel_settle();
        self.bus.publish(SimEvent::StormIsCalmingDown);
    }

    pub fn on_pointer_move(&mut self, y: f32, now: f32) {
        if !self.state.dragging {
            return;
        }
        self.bus.publish(SimEvent::StormIsCalmingDown);
        self.hide_texts(now);

        let drag = (y - self.start_y) * self.config.drag_multiplier;
        self.state.target = self.state.off + drag * self.config.speed;
        self.interrupt();
    }

    /// Pointer released, or left the window when `leaving_window` is set.
    pub fn on_pointer_up(&mut self, leaving_window: bool, now: f32) {
        if leaving_window && !self.state.dragging && self.phase == ScrollPhase::Idle {
            return;
        }
        let instant = leaving_window && self.device == DeviceClass::Desktop;

        self.state.off = self.state.target;
        self.state.dragging = false;
        if !leaving_window {
            self.bus.publish(SimEvent::StormIsCalmingDown);
        }
        self.restart_autoscroll_timer(now, instant);
    }

    /// Starts the snap of `target` so that a tile at vertical position `tile_y`
    /// ends up centred. Replaces any running snap.
    pub fn slide_to(&mut self, tile_y: f32, now: f32) {
        let to = self.state.current_rounded - tile_y;
        self.snap = Some(Tween::start(
            self.state.target,
            to,
            now,
            self.config.snap_duration.get(self.device),
            Ease::StrongInOut,
        ));
        self.phase = ScrollPhase::Settling;
        debug!("Snapping scroll target to {to}");
    }

    pub fn reveal_texts(&mut self, now: f32) {
        self.text_visibility.animate_to(
            1.0,
            now,
            self.config.text_reveal_duration,
            Ease::Power3Out,
        );
    }

    pub fn tick(&mut self, now: f32) -> Vec<ScrollSignal> {
        let mut signals = Vec::new();

        if self.wind_timer.fire(now) {
            self.bus.publish(SimEvent::WindBlowing(true));
            self.bus.publish(SimEvent::ToggleGravity(true));
        }
        if self.settle_timer.fire(now) {
            self.state.autoscroll = false;
            signals.push(ScrollSignal::SnapRequested);
        }
        if let Some(snap) = self.snap {
            match snap.update(now) {
                TweenState::Pending => {}
                TweenState::Running(target) => self.state.target = target,
                TweenState::Finished(target) => {
                    self.state.target = target;
                    self.state.off = target;
                    self.snap = None;
                    self.phase = ScrollPhase::Idle;
                    self.state.scrolling = false;
                    self.wind_timer.schedule(now, self.config.wind_resume_delay);
                    signals.push(ScrollSignal::Settled);
                }
            }
        }
        if self.text_hide.fire(now) {
            self.state.text_transition = false;
        }
        self.text_visibility.update(now);

        self.calc();
        signals
    }

    fn calc(&mut self) {
        let state = &mut self.state;
        state.current += (state.target - state.current) * self.config.ease;
        state.current_rounded = (state.current * 100.0).round() / 100.0;
        state.diff = (state.target - state.current) * self.config.diff_scale;
        self.bus.publish(SimEvent::RotateCam { delta: state.diff });
    }

    /// Fresh input owns the target: drop the snap, the pending settle and the wind resume.
    fn interrupt(&mut self) {
        self.snap = None;
        self.cancel_settle();
        self.wind_timer.cancel();
        self.phase = ScrollPhase::Scrolling;
        self.state.scrolling = true;
    }

    fn cancel_settle(&mut self) {
        self.settle_timer.cancel();
        self.state.autoscroll = false;
    }

    fn restart_quiet_timer(&mut self, now: f32) {
        self.settle_timer.schedule(now, self.config.quiet_period);
        self.state.autoscroll = false;
    }

    fn restart_autoscroll_timer(&mut self, now: f32, instant: bool) {
        let delay = if instant {
            0.0
        } else {
            self.config.autoscroll_delay.get(self.device)
        };
        self.settle_timer.schedule(now, delay);
        self.state.autoscroll = true;
    }

    fn hide_texts(&mut self, now: f32) {
        if self.text_hide.is_pending() {
            return;
        }
        let duration = self.config.text_hide_duration.get(self.device);
        self.state.text_transition = true;
        self.text_hide.schedule(now, duration + self.config.text_stagger);
        self.text_visibility
            .animate_to(0.0, now, duration, Ease::Power3In);
    }
}
