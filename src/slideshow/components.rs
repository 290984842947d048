use bevy::prelude::*;

#[derive(Component)]
pub struct SlideTile {
    pub index: usize,
    /// Material colour at full opacity.
    pub tint: Color,
}

#[derive(Component)]
pub struct CaptionText;
