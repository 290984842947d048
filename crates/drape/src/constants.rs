use std::f32::consts::PI;

/// Camera roll of the whole scene, also used for the depth constant.
pub const ANGLE: f32 = PI / 6.0;
/// Camera distance; one world unit maps to one pixel on the z = 0 plane.
pub const PERSPECTIVE: f32 = 800.0;

/// Fixed physics timestep, one step per animation frame.
pub const PHYSICS_DT: f32 = 1.0 / 50.0;

pub const GRID_COLUMNS: usize = 8;
pub const GRID_ROWS: usize = 8;

/// Viewport widths (px) at or below which the layout is considered mobile / tablet.
pub const MOBILE_MAX_WIDTH: f32 = 767.0;
pub const TABLET_MAX_WIDTH: f32 = 1111.0;
