pub(crate) mod components;
pub(crate) mod logic;
pub(crate) mod resources;
mod systems;

use crate::core::state::AppState;
use crate::slideshow::resources::PointerState;
use crate::slideshow::systems::*;
use bevy::prelude::*;

pub struct SlideshowPlugin;

impl Plugin for SlideshowPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerState>()
            .add_systems(
                OnEnter(AppState::Running),
                (init_stage, spawn_tiles, spawn_caption).chain(),
            )
            .add_systems(
                Update,
                (
                    forward_input,
                    handle_resize,
                    tick_stage,
                    sync_tiles,
                    sync_caption,
                )
                    .chain()
                    .run_if(in_state(AppState::Running)),
            );
    }
}
