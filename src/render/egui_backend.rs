//! eframe/egui rendering backend
//!
//! [`EguiSurface`] paints through an `egui::Painter` covering the whole
//! viewport, [`EguiAssets`] decodes images with the `image` crate into egui
//! textures, and [`translate_events`] turns one frame of egui input into
//! [`InputEvent`]s.

use super::{
    AssetResolver, InputEvent, Key, LoadedFont, PointerButton, Sprite, SpriteId, Surface,
    TextAnchor,
};
use crate::error::{HmiError, Result};
use crate::types::{Color, Outline, Point, Rect};
use egui::{Color32, FontData, FontDefinitions, FontFamily, FontId, Pos2, Stroke, StrokeKind};
use std::path::Path;
use std::sync::Arc;

/// Name the scene typeface is registered under
const SCENE_FONT: &str = "hmi-scene";

/// Register `font` as the primary proportional typeface
pub fn install_font(ctx: &egui::Context, font: &LoadedFont) {
    let mut fonts = FontDefinitions::default();
    fonts.font_data.insert(
        SCENE_FONT.to_owned(),
        Arc::new(FontData::from_owned(font.bytes.clone())),
    );
    fonts
        .families
        .entry(FontFamily::Proportional)
        .or_default()
        .insert(0, SCENE_FONT.to_owned());
    ctx.set_fonts(fonts);
    tracing::debug!("Installed scene font from {:?}", font.path);
}

fn color32(c: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

fn pos2(p: Point) -> Pos2 {
    Pos2::new(p.x, p.y)
}

fn egui_rect(r: Rect) -> egui::Rect {
    egui::Rect::from_min_size(Pos2::new(r.x, r.y), egui::vec2(r.width, r.height))
}

/// Textures loaded for the current scene, indexed by [`SpriteId`]
pub struct EguiAssets {
    ctx: egui::Context,
    textures: Vec<egui::TextureHandle>,
}

impl EguiAssets {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            textures: Vec::new(),
        }
    }

    pub fn textures(&self) -> &[egui::TextureHandle] {
        &self.textures
    }
}

impl AssetResolver for EguiAssets {
    fn load_image(&mut self, path: &Path) -> Result<Sprite> {
        let decoded = image::open(path)
            .map_err(|e| HmiError::Asset(format!("{}: {}", path.display(), e)))?
            .to_rgba8();
        let (width, height) = decoded.dimensions();
        let pixels = egui::ColorImage::from_rgba_unmultiplied(
            [width as usize, height as usize],
            decoded.as_raw(),
        );
        let handle = self.ctx.load_texture(
            path.display().to_string(),
            pixels,
            egui::TextureOptions::LINEAR,
        );

        let id = SpriteId(self.textures.len() as u32);
        self.textures.push(handle);
        Ok(Sprite { id, width, height })
    }
}

/// Surface that paints onto one egui layer for the current frame
pub struct EguiSurface<'a> {
    painter: egui::Painter,
    textures: &'a [egui::TextureHandle],
}

impl<'a> EguiSurface<'a> {
    pub fn new(painter: egui::Painter, textures: &'a [egui::TextureHandle]) -> Self {
        Self { painter, textures }
    }
}

impl Surface for EguiSurface<'_> {
    fn clear(&mut self, color: Color) {
        self.painter
            .rect_filled(self.painter.clip_rect(), 0.0, color32(color));
    }

    fn fill_rect(&mut self, rect: Rect, fill: Color, outline: Option<Outline>) {
        let rect = egui_rect(rect);
        self.painter.rect_filled(rect, 0.0, color32(fill));
        if let Some(outline) = outline {
            self.painter.rect_stroke(
                rect,
                0.0,
                Stroke::new(outline.width, color32(outline.color)),
                StrokeKind::Outside,
            );
        }
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color) {
        self.painter
            .line_segment([pos2(from), pos2(to)], Stroke::new(1.0, color32(color)));
    }

    fn draw_polyline(&mut self, points: &[Point], color: Color) {
        if points.len() < 2 {
            return;
        }
        self.painter.add(egui::Shape::line(
            points.iter().copied().map(pos2).collect(),
            Stroke::new(1.0, color32(color)),
        ));
    }

    fn draw_text(&mut self, pos: Point, text: &str, size: f32, color: Color, anchor: TextAnchor) {
        let align = match anchor {
            TextAnchor::TopLeft => egui::Align2::LEFT_TOP,
            TextAnchor::Center => egui::Align2::CENTER_CENTER,
        };
        self.painter.text(
            pos2(pos),
            align,
            text,
            FontId::proportional(size),
            color32(color),
        );
    }

    fn draw_sprite(&mut self, sprite: SpriteId, rect: Rect) {
        let Some(handle) = self.textures.get(sprite.0 as usize) else {
            tracing::warn!("Unknown sprite {:?}", sprite);
            return;
        };
        let uv = egui::Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        self.painter
            .image(handle.id(), egui_rect(rect), uv, Color32::WHITE);
    }

    fn present(&mut self) {
        // egui submits the frame when `update` returns
    }
}

fn translate_button(button: egui::PointerButton) -> Option<PointerButton> {
    match button {
        egui::PointerButton::Primary => Some(PointerButton::Primary),
        egui::PointerButton::Secondary => Some(PointerButton::Secondary),
        egui::PointerButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

fn translate_key(key: egui::Key) -> Key {
    match key {
        egui::Key::Escape => Key::Escape,
        egui::Key::Enter => Key::Enter,
        egui::Key::Backspace => Key::Backspace,
        _ => Key::Other,
    }
}

/// Convert one frame of egui input into player events, in arrival order
pub fn translate_events(input: &egui::InputState) -> Vec<InputEvent> {
    let mut events = Vec::new();
    for event in &input.events {
        match event {
            egui::Event::PointerMoved(pos) => {
                events.push(InputEvent::PointerMoved(Point::new(pos.x, pos.y)));
            }
            egui::Event::PointerButton {
                pos,
                button,
                pressed,
                ..
            } => {
                let Some(button) = translate_button(*button) else {
                    continue;
                };
                let pos = Point::new(pos.x, pos.y);
                events.push(if *pressed {
                    InputEvent::PointerPressed { pos, button }
                } else {
                    InputEvent::PointerReleased { pos, button }
                });
            }
            egui::Event::Key {
                key, pressed: true, ..
            } => {
                events.push(InputEvent::KeyPressed(translate_key(*key)));
            }
            egui::Event::Text(text) => {
                events.extend(text.chars().map(InputEvent::Text));
            }
            _ => {}
        }
    }
    if input.viewport().close_requested() {
        events.push(InputEvent::Closed);
    }
    events
}
