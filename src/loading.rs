use crate::core::state::AppState;
use bevy::prelude::*;
use bevy_asset_loader::prelude::*;

pub struct LoadingPlugin;

impl Plugin for LoadingPlugin {
    fn build(&self, app: &mut App) {
        // Missing slide images are not fatal, tiles fall back to flat tints.
        app.add_loading_state(
            LoadingState::new(AppState::AssetLoading)
                .continue_to_state(AppState::Running)
                .on_failure_continue_to_state(AppState::Running)
                .load_collection::<SlideAssets>(),
        );
    }
}

#[derive(AssetCollection, Resource)]
pub struct SlideAssets {
    #[asset(path = "slides", collection(typed))]
    pub images: Vec<Handle<Image>>,
}
