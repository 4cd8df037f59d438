//! Static image, with a placeholder when no candidate file could be loaded

use crate::render::{Sprite, Surface, TextAnchor};
use crate::types::{Color, Outline, Point, Rect};
use std::path::PathBuf;

const PLACEHOLDER_FILL: Color = Color::LIGHT_GRAY;
const PLACEHOLDER_TEXT: &str = "Image not found";
const PLACEHOLDER_TEXT_SIZE: f32 = 16.0;

#[derive(Debug)]
pub struct StaticImage {
    name: String,
    rect: Rect,
    path: PathBuf,
    sprite: Option<Sprite>,
}

impl StaticImage {
    /// `sprite` is `None` when resolution failed at scene-build time
    pub fn new(name: impl Into<String>, rect: Rect, path: impl Into<PathBuf>, sprite: Option<Sprite>) -> Self {
        Self {
            name: name.into(),
            rect,
            path: path.into(),
            sprite,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.sprite.is_some()
    }

    pub(crate) fn draw(&self, surface: &mut dyn Surface) {
        match self.sprite {
            Some(sprite) => surface.draw_sprite(sprite.id, self.rect),
            None => {
                surface.fill_rect(
                    self.rect,
                    PLACEHOLDER_FILL,
                    Some(Outline::new(2.0, Color::BLACK)),
                );
                surface.draw_text(
                    Point::new(self.rect.x + 10.0, self.rect.y + self.rect.height / 2.0 - 10.0),
                    PLACEHOLDER_TEXT,
                    PLACEHOLDER_TEXT_SIZE,
                    Color::BLACK,
                    TextAnchor::TopLeft,
                );
            }
        }
    }
}
