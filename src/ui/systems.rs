use crate::core::config::{CONFIG_PATH, SlideshowConfig};
use crate::slideshow::resources::SlideStage;
use bevy::log::{info, warn};
use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};
use drape::ClothState;

#[derive(Resource, Default)]
pub struct TuningPanel {
    pub open: bool,
    /// Outcome of the last save, shown under the button.
    pub status: Option<String>,
}

pub fn toggle_tuning_panel(keys: Res<ButtonInput<KeyCode>>, mut panel: ResMut<TuningPanel>) {
    if keys.just_pressed(KeyCode::F1) {
        panel.open = !panel.open;
    }
}

pub fn render_tuning_panel(
    mut contexts: EguiContexts,
    mut panel: ResMut<TuningPanel>,
    mut config: ResMut<SlideshowConfig>,
    stage: Option<NonSendMut<SlideStage>>,
) {
    if !panel.open {
        return;
    }
    let Some(mut stage) = stage else {
        return;
    };
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let gravity = stage.0.gravity();
    let slideshow = stage.0.slideshow_mut();
    let mut wind_force = slideshow.wind().base_force();
    let mut scroll_ease = slideshow.scroll().config().ease;
    let mut scroll_speed = slideshow.scroll().config().speed;

    egui::SidePanel::right("tuning_panel")
        .default_width(280.0)
        .resizable(false)
        .show(ctx, |ui| {
            ui.heading("Tuning");
            ui.add_space(10.0);

            ui.label("Wind force");
            ui.add(egui::Slider::new(&mut wind_force, 0.0..=120.0).step_by(1.0));
            ui.label("Scroll ease");
            ui.add(egui::Slider::new(&mut scroll_ease, 0.01..=0.3).step_by(0.005));
            ui.label("Scroll speed");
            ui.add(egui::Slider::new(&mut scroll_speed, 0.5..=4.0).step_by(0.1));

            ui.add_space(10.0);
            ui.separator();
            ui.add_space(10.0);

            ui.label(format!("Wind seed: {}", slideshow.wind().seed()));
            ui.label(format!(
                "Active slide: {} / {}",
                slideshow.active_index() + 1,
                slideshow.slides().len()
            ));
            ui.label(format!("Cloth: {}", cloth_state_label(slideshow.cloth().state())));
            ui.label(format!("Gravity: {gravity:.0}"));

            ui.add_space(20.0);
            if ui.button("Save").clicked() {
                config.0.wind.base_force = wind_force;
                config.0.scroll.ease = scroll_ease;
                config.0.scroll.speed = scroll_speed;
                panel.status = Some(match config.0.save_to_file(CONFIG_PATH) {
                    Ok(()) => {
                        info!("Saved tuning to {CONFIG_PATH}");
                        format!("Saved to {CONFIG_PATH}")
                    }
                    Err(err) => {
                        warn!("Could not save tuning: {err}");
                        format!("Save failed: {err}")
                    }
                });
            }
            if let Some(status) = &panel.status {
                ui.small(status);
            }
        });

    if wind_force != slideshow.wind().base_force() {
        slideshow.wind_mut().set_base_force(wind_force);
    }
    if scroll_ease != slideshow.scroll().config().ease {
        slideshow.scroll_mut().set_ease(scroll_ease);
    }
    if scroll_speed != slideshow.scroll().config().speed {
        slideshow.scroll_mut().set_speed(scroll_speed);
    }
}

fn cloth_state_label(state: ClothState) -> &'static str {
    match state {
        ClothState::Active => "active",
        ClothState::Resting => "resting",
        ClothState::AwaitingWake => "waiting to wake",
    }
}
