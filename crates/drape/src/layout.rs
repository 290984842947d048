use crate::config::SimConfig;
use crate::constants::{ANGLE, MOBILE_MAX_WIDTH, TABLET_MAX_WIDTH};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceClass {
    pub fn from_width(width: f32) -> Self {
        if width <= MOBILE_MAX_WIDTH {
            DeviceClass::Mobile
        } else if width <= TABLET_MAX_WIDTH {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }
}

/// Viewport measurements, recomputed on every resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub device: DeviceClass,
    /// Extra depth revealed by the tilted camera at the viewport edges.
    pub depth: f32,
}

impl Layout {
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_device(width, height, DeviceClass::from_width(width))
    }

    pub fn with_device(width: f32, height: f32, device: DeviceClass) -> Self {
        let depth = (ANGLE.tan() * (width.max(height) / 2.0)).ceil();
        Self {
            width,
            height,
            device,
            depth,
        }
    }

    pub fn is_mobile(&self) -> bool {
        self.device == DeviceClass::Mobile
    }

    pub fn is_desktop(&self) -> bool {
        self.device == DeviceClass::Desktop
    }

    /// Half the viewport diagonal.
    pub fn half_diagonal(&self) -> f32 {
        self.width.hypot(self.height) / 2.0
    }
}

/// Everything a component may read about its surroundings, passed in explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct SimContext {
    pub layout: Layout,
    pub config: SimConfig,
}

impl SimContext {
    pub fn new(layout: Layout, config: SimConfig) -> Self {
        Self { layout, config }
    }

    pub fn device(&self) -> DeviceClass {
        self.layout.device
    }
}
