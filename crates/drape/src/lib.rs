//! Cloth-and-wind simulation behind the windslide slideshow.
//!
//! Engine independent: the host feeds input and a frame clock into
//! [`Stage`], then reads tile transforms, the active tile's vertex buffer and
//! the camera roll back out.

pub mod cloth;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod grid;
pub mod layout;
pub mod noise_field;
pub mod physics;
pub mod scroll;
pub mod slideshow;
pub mod stage;
pub mod tile;
pub mod timer;
pub mod tools;
pub mod tween;
pub mod wind;

pub use cloth::{ClothSimulator, ClothState};
pub use config::{DeviceTuned, SimConfig};
pub use error::{DrapeError, Result};
pub use events::{EventBus, SimEvent};
pub use grid::GridTopology;
pub use layout::{DeviceClass, Layout, SimContext};
pub use physics::{ParticleWorld, PhysicsBackend};
pub use scroll::{ScrollController, ScrollPhase, ScrollSignal, ScrollState};
pub use slideshow::{ContentBounds, Slide, SlideSpec, Slideshow};
pub use stage::{CameraRig, Stage};
pub use tile::{Rect, Tile, TileGeometry};
pub use wind::WindController;
