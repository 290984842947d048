use crate::error::Result;
use crate::layout::DeviceClass;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A tunable that differs per device class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceTuned<T> {
    pub desktop: T,
    pub tablet: T,
    pub mobile: T,
}

impl<T: Copy> DeviceTuned<T> {
    pub const fn uniform(value: T) -> Self {
        Self {
            desktop: value,
            tablet: value,
            mobile: value,
        }
    }

    /// Mobile gets its own value, tablets behave like desktops.
    pub const fn mobile_split(other: T, mobile: T) -> Self {
        Self {
            desktop: other,
            tablet: other,
            mobile,
        }
    }

    /// Desktop gets its own value, tablets behave like phones.
    pub const fn desktop_split(desktop: T, other: T) -> Self {
        Self {
            desktop,
            tablet: other,
            mobile: other,
        }
    }

    pub fn get(&self, device: DeviceClass) -> T {
        match device {
            DeviceClass::Desktop => self.desktop,
            DeviceClass::Tablet => self.tablet,
            DeviceClass::Mobile => self.mobile,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub scroll: ScrollConfig,
    pub wind: WindConfig,
    pub cloth: ClothConfig,
    pub physics: PhysicsConfig,
    pub stage: StageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Multiplier applied to wheel and drag deltas.
    pub speed: f32,
    /// Exponential smoothing factor of `current` toward `target`.
    pub ease: f32,
    /// Extra margin (px) around the viewport for tile visibility.
    pub visibility_threshold: f32,
    /// Raw wheel deltas are clamped to `[-wheel_clamp, wheel_clamp]`.
    pub wheel_clamp: f32,
    /// Pointer pixels to scroll units, sign reversed.
    pub drag_multiplier: f32,
    /// Scale of `target - current` published as camera tilt.
    pub diff_scale: f32,
    /// Seconds without wheel input before snapping.
    pub quiet_period: f32,
    pub autoscroll_delay: DeviceTuned<f32>,
    /// Wheel input restarts the quiet-period timer when `|diff|` is at least this.
    pub restart_diff_min: f32,
    /// Wheel input arms the auto-settle timer when `|diff|` is under this.
    pub autoscroll_diff_max: f32,
    pub snap_duration: DeviceTuned<f32>,
    /// Delay between the end of a snap and the wind picking up again.
    pub wind_resume_delay: f32,
    pub text_hide_duration: DeviceTuned<f32>,
    pub text_stagger: f32,
    pub text_reveal_duration: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            speed: 1.5,
            ease: 0.065,
            visibility_threshold: 50.0,
            wheel_clamp: 100.0,
            drag_multiplier: -3.0,
            diff_scale: 0.0005,
            quiet_period: 1.0,
            autoscroll_delay: DeviceTuned::desktop_split(0.1, 1.0),
            restart_diff_min: 0.01,
            autoscroll_diff_max: 0.1,
            snap_duration: DeviceTuned::desktop_split(0.4, 0.2),
            wind_resume_delay: 0.4,
            text_hide_duration: DeviceTuned::desktop_split(0.4, 0.2),
            text_stagger: 0.16,
            text_reveal_duration: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    pub base_force: f32,
    /// Lattice coordinates are multiplied by this before sampling noise.
    pub spatial_frequency: f32,
    /// Elapsed seconds are multiplied by this before sampling noise.
    pub time_scale: f32,
    /// Fraction of the force that a fully negative noise sample pulls back with.
    pub pull_ratio: f32,
    pub ramp_up: f32,
    pub direction_ease: f32,
    pub initial_direction: [f32; 3],
    /// Fixed noise seed; a random one is drawn when absent.
    pub seed: Option<u32>,
}

impl WindConfig {
    pub fn initial_direction(&self) -> Vec3 {
        Vec3::from_array(self.initial_direction)
    }
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            base_force: 40.0,
            spatial_frequency: 0.1,
            time_scale: 2.0,
            pull_ratio: 0.1,
            ramp_up: 2.0,
            direction_ease: 0.1,
            initial_direction: [0.5, 0.0, -1.0],
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClothConfig {
    /// Mass of the whole sheet, shared evenly between the quads.
    pub total_mass: DeviceTuned<f32>,
    pub linear_damping: f32,
    /// Vertical distance between a top-row node and its anchor.
    pub anchor_height: f32,
    pub rest_duration: DeviceTuned<f32>,
    /// Total stagger (seconds) spread from the first to the last row.
    pub rest_stagger: f32,
    pub wake_delay: DeviceTuned<f32>,
    /// Zero node velocities every frame while the wind blows.
    pub calm_while_blowing: bool,
}

impl Default for ClothConfig {
    fn default() -> Self {
        Self {
            total_mass: DeviceTuned::mobile_split(1.0, 3.0),
            linear_damping: 0.8,
            anchor_height: 100.0,
            rest_duration: DeviceTuned::mobile_split(0.8, 0.4),
            rest_stagger: 0.1,
            wake_delay: DeviceTuned::mobile_split(1.0, 0.2),
            calm_while_blowing: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward gravity once it has been eased in.
    pub gravity: f32,
    pub gravity_ramp: f32,
    pub timestep: f32,
    pub solver_iterations: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 800.0,
            gravity_ramp: 2.0,
            timestep: crate::constants::PHYSICS_DT,
            solver_iterations: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Seconds after start before the first gust.
    pub intro_delay: f32,
    pub camera_tilt_factor: f32,
    pub camera_tilt_duration: f32,
    pub distort_duration: f32,
    pub distort_min_scale: f32,
    pub alpha_falloff_offset: DeviceTuned<f32>,
    /// Fraction of the viewport height used for the upper wrap bound.
    pub wrap_size_max: DeviceTuned<f32>,
    /// Fraction of the viewport height used for the lower wrap bound.
    pub wrap_size_min: DeviceTuned<f32>,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            intro_delay: 1.0,
            camera_tilt_factor: 0.2,
            camera_tilt_duration: 1.0,
            distort_duration: 0.5,
            distort_min_scale: 0.8,
            alpha_falloff_offset: DeviceTuned::desktop_split(200.0, 50.0),
            wrap_size_max: DeviceTuned::mobile_split(0.83, 0.8),
            wrap_size_min: DeviceTuned::mobile_split(0.17, 0.2),
        }
    }
}

impl SimConfig {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
