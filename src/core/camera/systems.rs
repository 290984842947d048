use crate::core::camera::components::MainCamera;
use crate::core::camera::logic::camera_pose;
use crate::slideshow::resources::SlideStage;
use bevy::log::info;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use drape::constants::ANGLE;

pub fn spawn_camera(mut commands: Commands, windows: Query<&Window, With<PrimaryWindow>>) {
    let (width, height) = windows
        .single()
        .map(|w| (w.width(), w.height()))
        .unwrap_or((1500.0, 900.0));
    let pose = camera_pose(-ANGLE, width, height);

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: pose.fov,
            near: 1.0,
            far: 2000.0,
            ..default()
        }),
        Transform::from_translation(pose.translation).with_rotation(pose.rotation),
        MainCamera,
    ));

    info!("Camera spawned");
}

/// Applies the rig's roll and keeps the field of view pixel-exact after resizes.
pub fn follow_camera_rig(
    stage: Option<NonSend<SlideStage>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut camera_q: Query<(&mut Transform, &mut Projection), With<MainCamera>>,
) {
    let Some(stage) = stage else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((mut transform, mut projection)) = camera_q.single_mut() else {
        return;
    };

    let pose = camera_pose(stage.0.camera().roll(), window.width(), window.height());
    transform.translation = pose.translation;
    transform.rotation = pose.rotation;
    if let Projection::Perspective(perspective) = projection.as_mut() {
        perspective.fov = pose.fov;
    }
}
