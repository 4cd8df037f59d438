//! Rendering backend interface
//!
//! The player never draws pixels itself. Visual nodes paint through the
//! [`Surface`] primitives, input arrives through an [`EventSource`], and
//! image files are turned into backend sprites by an [`AssetResolver`].
//!
//! # Implementations
//!
//! - [`egui_backend`] - eframe/egui painter, input translation and textures
//! - [`recording`] - in-memory surface and scripted events for tests and
//!   headless runs

pub mod assets;
pub mod egui_backend;
pub mod recording;

pub use assets::{load_font, resolve_candidates, resolve_image, LoadedFont};
pub use egui_backend::{install_font, translate_events, EguiAssets, EguiSurface};
pub use recording::{DrawCommand, RecordingSurface, ScriptedEvents, StaticAssets};

use crate::error::Result;
use crate::types::{Color, Outline, Point, Rect};
use std::collections::VecDeque;
use std::path::Path;

/// Pointer buttons the nodes distinguish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Keys with meaning to the player or its controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Backspace,
    Other,
}

/// Typed input event delivered to every node
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerMoved(Point),
    PointerPressed { pos: Point, button: PointerButton },
    PointerReleased { pos: Point, button: PointerButton },
    KeyPressed(Key),
    /// A typed character
    Text(char),
    /// The window was asked to close
    Closed,
}

impl InputEvent {
    /// Close signal or the designated cancel key
    pub fn is_close_request(&self) -> bool {
        matches!(self, InputEvent::Closed | InputEvent::KeyPressed(Key::Escape))
    }
}

/// Where `draw_text` places the text relative to `pos`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    TopLeft,
    Center,
}

/// Backend handle for a loaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteId(pub u32);

/// A loaded image and its pixel size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub id: SpriteId,
    pub width: u32,
    pub height: u32,
}

/// Drawing primitives a backend provides
#[cfg_attr(test, mockall::automock)]
pub trait Surface {
    /// Fill the whole surface
    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, rect: Rect, fill: Color, outline: Option<Outline>);

    fn draw_line(&mut self, from: Point, to: Point, color: Color);

    /// Connected line strip through `points`
    fn draw_polyline(&mut self, points: &[Point], color: Color);

    fn draw_text(&mut self, pos: Point, text: &str, size: f32, color: Color, anchor: TextAnchor);

    /// Draw a sprite scaled to `rect`
    fn draw_sprite(&mut self, sprite: SpriteId, rect: Rect);

    /// End of frame
    fn present(&mut self);
}

/// Poll-based input source
pub trait EventSource {
    /// Next pending event, or `None` when drained for this frame
    fn poll_event(&mut self) -> Option<InputEvent>;
}

impl EventSource for VecDeque<InputEvent> {
    fn poll_event(&mut self) -> Option<InputEvent> {
        self.pop_front()
    }
}

/// Loads image files into backend sprites
pub trait AssetResolver {
    /// Load exactly `path`; candidate fallback is handled by [`resolve_image`]
    fn load_image(&mut self, path: &Path) -> Result<Sprite>;
}
