use bevy::prelude::*;
use drape::Stage;

/// The simulation. Stored as a non-send resource: its event bus is single-threaded.
pub struct SlideStage(pub Stage);

/// Last known cursor position, in window pixels from the top-left corner.
#[derive(Resource, Default)]
pub struct PointerState {
    pub position: Option<Vec2>,
}
