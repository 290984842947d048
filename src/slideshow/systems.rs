use crate::core::config::SlideshowConfig;
use crate::helpers::mesh::grid_plane_mesh;
use crate::loading::SlideAssets;
use crate::slideshow::components::{CaptionText, SlideTile};
use crate::slideshow::logic::{SLIDE_TITLES, column_layout, slide_specs, wheel_delta_px};
use crate::slideshow::resources::{PointerState, SlideStage};
use bevy::input::mouse::MouseWheel;
use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::log::{debug, error, info, warn};
use bevy::prelude::*;
use bevy::window::{CursorLeft, CursorMoved, PrimaryWindow, WindowResized};
use bevy_egui::EguiContexts;
use drape::{Layout, SimContext, Stage};

/// Shown while a slide's image is missing.
const FALLBACK_TINTS: [Color; 5] = [
    Color::srgb(0.78, 0.55, 0.42),
    Color::srgb(0.45, 0.56, 0.62),
    Color::srgb(0.38, 0.5, 0.36),
    Color::srgb(0.86, 0.72, 0.48),
    Color::srgb(0.66, 0.76, 0.82),
];

pub fn init_stage(world: &mut World) {
    let size = world
        .query_filtered::<&Window, With<PrimaryWindow>>()
        .single(world)
        .map(|window| (window.width(), window.height()));
    let Ok((width, height)) = size else {
        warn!("No primary window, slideshow not started");
        return;
    };

    let config = world.resource::<SlideshowConfig>().0.clone();
    let column = column_layout(width, height, SLIDE_TITLES.len());
    let ctx = SimContext::new(Layout::new(width, height), config);

    match Stage::new(ctx, &slide_specs(&column), column.content) {
        Ok(stage) => {
            info!(
                "Slideshow ready: {} slides, wind seed {}",
                stage.slideshow().slides().len(),
                stage.slideshow().wind().seed()
            );
            world.insert_non_send_resource(SlideStage(stage));
        }
        Err(err) => error!("Failed to build slideshow: {err}"),
    }
}

pub fn spawn_tiles(
    mut commands: Commands,
    stage: Option<NonSend<SlideStage>>,
    assets: Option<Res<SlideAssets>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(stage) = stage else {
        return;
    };
    let images = assets.map(|assets| assets.images.clone()).unwrap_or_default();

    for slide in stage.0.slideshow().slides() {
        let tint = if images.is_empty() {
            FALLBACK_TINTS[slide.index % FALLBACK_TINTS.len()]
        } else {
            Color::WHITE
        };
        let texture = (!images.is_empty()).then(|| images[slide.index % images.len()].clone());
        let topology = slide.tile.geometry.topology();

        commands.spawn((
            Mesh3d(meshes.add(grid_plane_mesh(topology.columns, topology.rows))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: tint,
                base_color_texture: texture,
                unlit: true,
                alpha_mode: AlphaMode::Blend,
                double_sided: true,
                cull_mode: None,
                ..default()
            })),
            Transform::from_translation(slide.tile.transform.translation)
                .with_scale(slide.tile.transform.scale),
            SlideTile {
                index: slide.index,
                tint,
            },
            Name::new(format!("Slide {}", slide.index)),
        ));
    }
}

pub fn spawn_caption(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 30.0,
            ..default()
        },
        TextColor(Color::srgb(0.12, 0.12, 0.12)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(48.0),
            bottom: Val::Px(48.0),
            ..default()
        },
        CaptionText,
    ));
}

/// Feeds mouse, touch and wheel input to the stage unless egui owns the pointer.
pub fn forward_input(
    stage: Option<NonSendMut<SlideStage>>,
    time: Res<Time>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut pointer: ResMut<PointerState>,
    mut contexts: EguiContexts,
    mut wheel: MessageReader<MouseWheel>,
    mut cursor_moved: MessageReader<CursorMoved>,
    mut cursor_left: MessageReader<CursorLeft>,
    mut touches: MessageReader<TouchInput>,
) {
    let Some(mut stage) = stage else {
        return;
    };
    let now = time.elapsed_secs();
    let over_panel = contexts
        .ctx_mut()
        .map(|ctx| ctx.is_pointer_over_area())
        .unwrap_or(false);

    for event in cursor_moved.read() {
        pointer.position = Some(event.position);
        stage.0.on_pointer_move(event.position, now);
    }

    if !over_panel {
        for event in wheel.read() {
            stage.0.on_wheel(wheel_delta_px(event.unit, event.y), now);
        }
        if buttons.just_pressed(MouseButton::Left) {
            if let Some(position) = pointer.position {
                stage.0.on_pointer_down(position);
            }
        }
    } else {
        wheel.clear();
    }
    if buttons.just_released(MouseButton::Left) {
        stage.0.on_pointer_up(false, now);
    }

    for event in touches.read() {
        match event.phase {
            TouchPhase::Started => stage.0.on_pointer_down(event.position),
            TouchPhase::Moved => stage.0.on_pointer_move(event.position, now),
            TouchPhase::Ended | TouchPhase::Canceled => stage.0.on_pointer_up(false, now),
        }
    }

    if cursor_left.read().last().is_some() {
        pointer.position = None;
        stage.0.on_pointer_up(true, now);
    }
}

pub fn handle_resize(
    stage: Option<NonSendMut<SlideStage>>,
    mut resized: MessageReader<WindowResized>,
) {
    let Some(mut stage) = stage else {
        return;
    };
    let Some(event) = resized.read().last() else {
        return;
    };

    let count = stage.0.slideshow().slides().len();
    let column = column_layout(event.width, event.height, count);
    let layout = Layout::new(event.width, event.height);
    match stage.0.resize(layout, &column.rects, column.content) {
        Ok(()) => debug!("Slideshow resized to {}x{}", event.width, event.height),
        Err(err) => warn!("Resize ignored: {err}"),
    }
}

pub fn tick_stage(stage: Option<NonSendMut<SlideStage>>, time: Res<Time>) {
    let Some(mut stage) = stage else {
        return;
    };
    if let Err(err) = stage.0.tick(time.elapsed_secs()) {
        warn!("Slideshow tick failed: {err}");
    }
}

/// Copies tile transforms, opacity and the cloth's vertex buffer into the render world.
pub fn sync_tiles(
    stage: Option<NonSendMut<SlideStage>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut tiles: Query<(
        &SlideTile,
        &mut Transform,
        &Mesh3d,
        &MeshMaterial3d<StandardMaterial>,
    )>,
) {
    let Some(mut stage) = stage else {
        return;
    };

    for (tile, mut transform, mesh, material) in &mut tiles {
        let Some(slide) = stage.0.slideshow().slides().get(tile.index) else {
            continue;
        };
        let translation = slide.tile.transform.translation;
        let scale = slide.tile.transform.scale;
        let alpha = slide.tile.alpha;

        if transform.translation != translation || transform.scale != scale {
            transform.translation = translation;
            transform.scale = scale;
        }

        let stale = materials
            .get(&material.0)
            .is_some_and(|m| (m.base_color.alpha() - alpha).abs() > f32::EPSILON);
        if stale {
            if let Some(m) = materials.get_mut(&material.0) {
                m.base_color = tile.tint.with_alpha(alpha);
            }
        }

        if let Some(positions) = stage.0.slideshow_mut().take_dirty_geometry(tile.index) {
            if let Some(mesh) = meshes.get_mut(&mesh.0) {
                mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
            }
        }
    }
}

pub fn sync_caption(
    stage: Option<NonSend<SlideStage>>,
    mut caption: Query<(&mut Text, &mut TextColor), With<CaptionText>>,
) {
    let Some(stage) = stage else {
        return;
    };
    let Ok((mut text, mut color)) = caption.single_mut() else {
        return;
    };

    let slideshow = stage.0.slideshow();
    let title = slideshow.caption().to_uppercase();
    if text.0 != title {
        text.0 = title;
    }
    let visibility = slideshow.scroll().text_visibility();
    if (color.0.alpha() - visibility).abs() > f32::EPSILON {
        color.0.set_alpha(visibility);
    }
}
