mod core;
mod helpers;
mod loading;
mod slideshow;
mod ui;

use crate::core::camera::CameraPlugin;
use crate::core::config::load_config;
use crate::core::state::AppState;
use crate::loading::LoadingPlugin;
use crate::slideshow::SlideshowPlugin;
use crate::ui::UIPlugin;

use bevy::app::App;
#[cfg(debug_assertions)]
use bevy::diagnostic::LogDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_egui::EguiPlugin;

pub struct WindslidePlugin;

impl Plugin for WindslidePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(load_config())
            .init_state::<AppState>()
            .add_plugins(EguiPlugin::default())
            .add_plugins((CameraPlugin, LoadingPlugin, SlideshowPlugin, UIPlugin));

        #[cfg(debug_assertions)]
        {
            app.add_plugins(LogDiagnosticsPlugin::default());
        }
    }
}
