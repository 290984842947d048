//! Slide tiles: a transform record plus the vertex buffer the cloth writes into.

use crate::grid::GridTopology;
use crate::layout::Layout;
use crate::tween::{Animated, Ease};
use glam::{Vec2, Vec3};

/// Screen rectangle of a slide, in pixels with y growing downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Per-vertex positions of a tile's unit plane.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGeometry {
    topology: GridTopology,
    positions: Vec<Vec3>,
    initial: Vec<Vec3>,
    dirty: bool,
}

impl TileGeometry {
    pub fn new(topology: GridTopology) -> Self {
        let initial = topology.unit_plane_positions();
        Self {
            topology,
            positions: initial.clone(),
            initial,
            dirty: true,
        }
    }

    pub fn topology(&self) -> GridTopology {
        self.topology
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn initial_positions(&self) -> &[Vec3] {
        &self.initial
    }

    pub fn set_position(&mut self, index: usize, position: Vec3) {
        self.positions[index] = position;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clears the dirty flag, returning whether an upload is needed.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Back to the flat, undeformed plane.
    pub fn reset(&mut self) {
        self.positions.copy_from_slice(&self.initial);
        self.dirty = true;
    }
}

/// Where a tile sits in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileTransform {
    pub translation: Vec3,
    pub scale: Vec3,
}

#[derive(Debug, Clone)]
pub struct Tile {
    pub rect: Rect,
    /// Scene position with zero scroll.
    pub origin: Vec2,
    pub geometry: TileGeometry,
    pub transform: TileTransform,
    pub alpha: f32,
    /// Scroll differential forwarded to the material.
    pub velocity: f32,
    scale_x: Animated<f32>,
}

impl Tile {
    pub fn new(rect: Rect, topology: GridTopology, layout: &Layout) -> Self {
        let origin = Self::scene_origin(&rect, layout);
        Self {
            rect,
            origin,
            geometry: TileGeometry::new(topology),
            transform: TileTransform {
                translation: origin.extend(0.0),
                scale: Vec3::new(rect.width, rect.height, 1.0),
            },
            alpha: 1.0,
            velocity: 0.0,
            scale_x: Animated::new(rect.width),
        }
    }

    fn scene_origin(rect: &Rect, layout: &Layout) -> Vec2 {
        Vec2::new(
            rect.left + rect.width / 2.0 - layout.width / 2.0,
            rect.top + rect.height / 2.0 - layout.height / 2.0,
        )
    }

    /// Re-measures the tile after a viewport change.
    pub fn resize(&mut self, rect: Rect, layout: &Layout) {
        self.rect = rect;
        self.origin = Self::scene_origin(&rect, layout);
        self.scale_x.set(rect.width);
        self.transform.scale = Vec3::new(rect.width, rect.height, 1.0);
        self.set_translate(0.0);
    }

    pub fn position(&self) -> Vec3 {
        self.transform.translation
    }

    /// Vertical scroll offset applied on top of the origin.
    pub fn set_translate(&mut self, translate: f32) {
        self.transform.translation = Vec3::new(self.origin.x, self.origin.y + translate, 0.0);
    }

    /// Squeezes the tile horizontally in proportion to the scroll differential.
    pub fn distort(&mut self, delta: f32, min_scale: f32, duration: f32, now: f32) {
        let factor = (1.0 - delta.abs()).clamp(min_scale, 1.0);
        self.scale_x
            .animate_to(factor * self.rect.width, now, duration, Ease::Power1Out);
    }

    pub fn update(&mut self, now: f32) {
        self.scale_x.update(now);
        self.transform.scale = Vec3::new(self.scale_x.value(), self.rect.height, 1.0);
    }
}
