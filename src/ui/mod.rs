mod systems;

use crate::core::state::AppState;
use crate::ui::systems::*;
use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

pub struct UIPlugin;

impl Plugin for UIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TuningPanel>()
            .add_systems(Update, toggle_tuning_panel)
            .add_systems(
                EguiPrimaryContextPass,
                render_tuning_panel.run_if(in_state(AppState::Running)),
            );
    }
}
