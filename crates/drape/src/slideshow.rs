//! The column of slides, the cloth on the active one and the wind blowing it.

use crate::cloth::ClothSimulator;
use crate::config::StageConfig;
use crate::constants::{GRID_COLUMNS, GRID_ROWS};
use crate::error::{DrapeError, Result};
use crate::events::{EventBus, SimEvent};
use crate::grid::GridTopology;
use crate::layout::{Layout, SimContext};
use crate::physics::{ParticleWorld, PhysicsBackend};
use crate::scroll::{ScrollController, ScrollSignal};
use crate::tile::{Rect, Tile};
use crate::tools::{generate_seed, wrap};
use crate::wind::WindController;
use glam::{Vec2, Vec3};
use log::info;

/// A slide as measured by the host page.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideSpec {
    pub rect: Rect,
    pub title: String,
}

/// Measurements of the element holding the slides.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContentBounds {
    pub wrap_top: f32,
    pub wrap_height: f32,
    /// Bottom margin of the last slide.
    pub margin_bottom: f32,
}

#[derive(Debug, Clone)]
pub struct Slide {
    pub index: usize,
    pub title: String,
    pub tile: Tile,
    pub top: f32,
    pub bottom: f32,
    pub height: f32,
    /// Wrap span of this slide's translation.
    pub min: f32,
    pub max: f32,
    /// Off screen since the last visibility check.
    pub out: bool,
}

/// Wrap span of a slide whose top edge sits at `top`.
pub fn wrap_bounds(
    top: f32,
    layout: &Layout,
    stage: &StageConfig,
    scroll_min: f32,
    scroll_max: f32,
    margin_bottom: f32,
) -> (f32, f32) {
    let h = layout.height;
    let d = layout.depth;
    let (offset_max, offset_min) = if layout.is_mobile() {
        (d, margin_bottom * 2.0)
    } else {
        (d / 2.0, -margin_bottom + d / 2.0)
    };
    let max_value = h * stage.wrap_size_max.get(layout.device) + offset_max;
    let min_value = h * stage.wrap_size_min.get(layout.device) + offset_min;

    let min = if top < h {
        scroll_min + max_value
    } else {
        scroll_min - min_value
    };
    let max = if top > h {
        scroll_max - max_value
    } else {
        scroll_max + min_value
    };
    (min, max)
}

/// Opacity of a tile whose centre is `distance` away from the scene origin.
pub fn alpha_for_distance(distance: f32, layout: &Layout, falloff_offset: f32) -> f32 {
    let diag = layout.half_diagonal();
    let reach = (diag - falloff_offset).max(0.0);
    1.0 - distance.clamp(0.0, reach) / diag
}

pub struct Slideshow<B: PhysicsBackend = ParticleWorld> {
    ctx: SimContext,
    scroll: ScrollController,
    slides: Vec<Slide>,
    content: ContentBounds,
    active: usize,
    snap_slide: Option<usize>,
    caption: String,
    cloth: ClothSimulator<B>,
    wind: WindController,
}

impl<B: PhysicsBackend> Slideshow<B> {
    pub fn new(
        ctx: SimContext,
        specs: &[SlideSpec],
        content: ContentBounds,
        backend: B,
        bus: EventBus,
    ) -> Result<Self> {
        let Some(first) = specs.first() else {
            return Err(DrapeError::NoSlides);
        };
        let topology = GridTopology::new(GRID_COLUMNS, GRID_ROWS);
        let mut scroll = ScrollController::new(&ctx.config.scroll, ctx.device(), bus);
        let (scroll_min, scroll_max) = Self::scroll_bounds(specs, &content);
        scroll.set_bounds(scroll_min, scroll_max);

        let slides: Vec<Slide> = specs
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                let tile = Tile::new(spec.rect, topology, &ctx.layout);
                let mut slide = Slide {
                    index,
                    title: spec.title.clone(),
                    tile,
                    top: 0.0,
                    bottom: 0.0,
                    height: 0.0,
                    min: 0.0,
                    max: 0.0,
                    out: false,
                };
                Self::measure(&mut slide, spec.rect, &ctx, scroll.state().min, scroll.state().max, &content);
                slide
            })
            .collect();

        let cloth = ClothSimulator::new(&slides[0].tile, backend, &ctx)?;
        let seed = ctx.config.wind.seed.unwrap_or_else(generate_seed);
        let wind = WindController::new(&ctx.config.wind, topology, seed);
        info!("Slideshow ready: {} slides, wind seed {seed}", slides.len());

        Ok(Self {
            caption: first.title.clone(),
            ctx,
            scroll,
            slides,
            content,
            active: 0,
            snap_slide: None,
            cloth,
            wind,
        })
    }

    fn scroll_bounds(specs: &[SlideSpec], content: &ContentBounds) -> (f32, f32) {
        let last_bottom = specs.last().map(|s| s.rect.bottom()).unwrap_or_default();
        (0.0, -(last_bottom - content.wrap_height - content.wrap_top))
    }

    fn measure(
        slide: &mut Slide,
        rect: Rect,
        ctx: &SimContext,
        scroll_min: f32,
        scroll_max: f32,
        content: &ContentBounds,
    ) {
        slide.top = rect.top;
        slide.bottom = rect.bottom();
        slide.height = rect.height;
        (slide.min, slide.max) = wrap_bounds(
            rect.top,
            &ctx.layout,
            &ctx.config.stage,
            scroll_min,
            scroll_max,
            content.margin_bottom,
        );
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_slide(&self) -> &Slide {
        &self.slides[self.active]
    }

    /// Title of the slide whose caption is revealed.
    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn context(&self) -> &SimContext {
        &self.ctx
    }

    pub fn scroll(&self) -> &ScrollController {
        &self.scroll
    }

    pub fn scroll_mut(&mut self) -> &mut ScrollController {
        &mut self.scroll
    }

    pub fn cloth(&self) -> &ClothSimulator<B> {
        &self.cloth
    }

    pub fn cloth_mut(&mut self) -> &mut ClothSimulator<B> {
        &mut self.cloth
    }

    pub fn wind(&self) -> &WindController {
        &self.wind
    }

    pub fn wind_mut(&mut self) -> &mut WindController {
        &mut self.wind
    }

    pub fn on_wheel(&mut self, delta_y: f32, now: f32) {
        self.scroll.on_wheel(delta_y, now);
    }

    pub fn on_pointer_down(&mut self, pointer: Vec2) {
        self.scroll.on_pointer_down(pointer.y);
    }

    /// Drags when a button is held; always steers the wind.
    pub fn on_pointer_move(&mut self, pointer: Vec2, now: f32) {
        self.scroll.on_pointer_move(pointer.y, now);
        self.wind.update_direction(pointer, &self.ctx.layout, now);
    }

    pub fn on_pointer_up(&mut self, leaving_window: bool, now: f32) {
        self.scroll.on_pointer_up(leaving_window, now);
    }

    /// Re-measures every slide for a new viewport. `rects` must list the slides in order.
    pub fn resize(&mut self, layout: Layout, rects: &[Rect], content: ContentBounds) -> Result<()> {
        if rects.len() != self.slides.len() {
            return Err(DrapeError::SlideCountMismatch {
                expected: self.slides.len(),
                found: rects.len(),
            });
        }
        self.ctx.layout = layout;
        self.content = content;
        self.scroll.set_device(layout.device);

        let last_bottom = rects.last().map(|r| r.bottom()).unwrap_or_default();
        let (scroll_min, scroll_max) = (0.0, -(last_bottom - content.wrap_height - content.wrap_top));
        self.scroll.set_bounds(scroll_min, scroll_max);

        for (slide, rect) in self.slides.iter_mut().zip(rects) {
            slide.tile.resize(*rect, &self.ctx.layout);
            Self::measure(slide, *rect, &self.ctx, scroll_min, scroll_max, &self.content);
        }
        self.cloth.change_active_tile(&self.slides[self.active].tile)
    }

    /// Index of the slide whose tile centre is nearest the scene origin.
    pub fn closest_index(&self) -> usize {
        let mut closest = 0;
        let mut best = f32::INFINITY;
        for (i, slide) in self.slides.iter().enumerate() {
            let distance = slide.tile.position().length();
            if distance < best {
                best = distance;
                closest = i;
            }
        }
        closest
    }

    pub fn handle_event(&mut self, event: &SimEvent, now: f32) {
        match event {
            SimEvent::RotateCam { delta } => {
                let stage = &self.ctx.config.stage;
                for slide in &mut self.slides {
                    slide
                        .tile
                        .distort(*delta, stage.distort_min_scale, stage.distort_duration, now);
                }
            }
            SimEvent::WindBlowing(_) | SimEvent::StormIsCalmingDown => {
                self.wind.handle_event(event, now);
                self.cloth.handle_event(event, now);
            }
            SimEvent::ToggleGravity(_) => {}
        }
    }

    /// Advances scroll easing and reacts to its settle signals.
    pub fn update_scroll(&mut self, now: f32) -> Result<()> {
        for signal in self.scroll.tick(now) {
            match signal {
                ScrollSignal::SnapRequested => {
                    let closest = self.closest_index();
                    self.snap_slide = Some(closest);
                    let y = self.slides[closest].tile.position().y;
                    self.scroll.slide_to(y, now);
                }
                ScrollSignal::Settled => {
                    if let Some(index) = self.snap_slide.take() {
                        if index != self.active {
                            self.active = index;
                            self.cloth.change_active_tile(&self.slides[index].tile)?;
                            info!("Active slide is now {index}");
                        }
                        self.caption = self.slides[index].title.clone();
                    }
                    self.scroll.reveal_texts(now);
                }
            }
        }
        Ok(())
    }

    /// Wind resample, physics step, then the forces for the next step.
    pub fn simulate(&mut self, now: f32) {
        self.wind.tick(now);
        self.cloth.step();
        self.cloth.update(now);
        self.cloth.apply_wind(&self.wind);
    }

    /// Writes the cloth into the active tile and places every tile.
    pub fn draw(&mut self, now: f32) {
        self.cloth.render(&mut self.slides[self.active].tile.geometry);

        let layout = self.ctx.layout;
        let threshold = self.ctx.config.scroll.visibility_threshold;
        let falloff = self.ctx.config.stage.alpha_falloff_offset.get(layout.device);
        let state = *self.scroll.state();

        for slide in &mut self.slides {
            slide.tile.alpha = alpha_for_distance(slide.tile.position().length(), &layout, falloff);

            let translate = wrap(slide.min, slide.max, state.current_rounded);
            slide.tile.set_translate(translate);
            slide.tile.velocity = state.diff;
            slide.tile.update(now);

            let start = slide.top + translate;
            let end = slide.bottom + translate;
            let visible = start < threshold + layout.height + layout.depth && end > -threshold;
            if visible {
                slide.out = false;
            } else if !slide.out {
                slide.out = true;
                slide.tile.geometry.reset();
            }
        }
    }

    /// Scene position of the active tile, for callers that place the cloth mesh.
    pub fn active_position(&self) -> Vec3 {
        self.slides[self.active].tile.position()
    }

    /// Vertex positions of slide `index` if they changed since the last call.
    pub fn take_dirty_geometry(&mut self, index: usize) -> Option<Vec<[f32; 3]>> {
        let geometry = &mut self.slides.get_mut(index)?.tile.geometry;
        geometry
            .take_dirty()
            .then(|| geometry.positions().iter().map(|p| p.to_array()).collect())
    }
}
