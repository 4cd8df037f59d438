//! In-memory backend: records draw calls and replays scripted input
//!
//! Used by the test suites and by headless runs where no window exists.

use super::{AssetResolver, EventSource, InputEvent, Sprite, SpriteId, Surface, TextAnchor};
use crate::error::{HmiError, Result};
use crate::types::{Color, Outline, Point, Rect};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

/// One recorded primitive call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillRect {
        rect: Rect,
        fill: Color,
        outline: Option<Outline>,
    },
    Line {
        from: Point,
        to: Point,
        color: Color,
    },
    Polyline {
        points: Vec<Point>,
        color: Color,
    },
    Text {
        pos: Point,
        text: String,
        size: f32,
        color: Color,
        anchor: TextAnchor,
    },
    Sprite {
        sprite: SpriteId,
        rect: Rect,
    },
}

/// Surface that stores every command of the current frame
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    last_frame: Vec<DrawCommand>,
    frames_presented: u64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands issued since the last `present`
    pub fn pending(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Commands of the most recently presented frame
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.last_frame
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Text strings drawn in the last presented frame
    pub fn texts(&self) -> Vec<&str> {
        self.last_frame
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Polylines drawn in the last presented frame
    pub fn polylines(&self) -> Vec<&[Point]> {
        self.last_frame
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Polyline { points, .. } => Some(points.as_slice()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, fill: Color, outline: Option<Outline>) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            fill,
            outline,
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }

    fn draw_polyline(&mut self, points: &[Point], color: Color) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            color,
        });
    }

    fn draw_text(&mut self, pos: Point, text: &str, size: f32, color: Color, anchor: TextAnchor) {
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.to_string(),
            size,
            color,
            anchor,
        });
    }

    fn draw_sprite(&mut self, sprite: SpriteId, rect: Rect) {
        self.commands.push(DrawCommand::Sprite { sprite, rect });
    }

    fn present(&mut self) {
        self.last_frame = std::mem::take(&mut self.commands);
        self.frames_presented += 1;
    }
}

/// Input replayed frame by frame
///
/// Each frame's batch is drained by successive `poll_event` calls; the
/// `None` that ends a batch moves the script on to the next frame. Once the
/// script is exhausted every frame sees no events.
#[derive(Debug, Default)]
pub struct ScriptedEvents {
    frames: VecDeque<VecDeque<InputEvent>>,
    current: Option<VecDeque<InputEvent>>,
}

impl ScriptedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one frame's worth of events
    pub fn frame(mut self, events: impl IntoIterator<Item = InputEvent>) -> Self {
        self.frames.push_back(events.into_iter().collect());
        self
    }

    /// Append `count` frames with no input
    pub fn idle(mut self, count: usize) -> Self {
        for _ in 0..count {
            self.frames.push_back(VecDeque::new());
        }
        self
    }

    /// Append a frame that closes the window
    pub fn then_close(self) -> Self {
        self.frame([InputEvent::Closed])
    }

    pub fn remaining_frames(&self) -> usize {
        self.frames.len()
    }
}

impl EventSource for ScriptedEvents {
    fn poll_event(&mut self) -> Option<InputEvent> {
        let batch = self
            .current
            .get_or_insert_with(|| self.frames.pop_front().unwrap_or_default());
        match batch.pop_front() {
            Some(event) => Some(event),
            None => {
                self.current = None;
                None
            }
        }
    }
}

/// Asset resolver backed by a fixed table of known paths
#[derive(Debug, Default)]
pub struct StaticAssets {
    known: HashMap<PathBuf, (u32, u32)>,
    loaded: Vec<PathBuf>,
    /// Every path `load_image` was asked for, in order
    pub attempts: Vec<PathBuf>,
}

impl StaticAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `path` loadable with the given pixel size
    pub fn insert(&mut self, path: impl Into<PathBuf>, width: u32, height: u32) {
        self.known.insert(path.into(), (width, height));
    }

    pub fn with(mut self, path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        self.insert(path, width, height);
        self
    }
}

impl AssetResolver for StaticAssets {
    fn load_image(&mut self, path: &Path) -> Result<Sprite> {
        self.attempts.push(path.to_path_buf());
        let (width, height) = self
            .known
            .get(path)
            .copied()
            .ok_or_else(|| HmiError::Asset(format!("{} not found", path.display())))?;

        let id = SpriteId(self.loaded.len() as u32);
        self.loaded.push(path.to_path_buf());
        Ok(Sprite { id, width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_events_split_frames() {
        let mut events = ScriptedEvents::new()
            .frame([InputEvent::Text('a'), InputEvent::Text('b')])
            .idle(1)
            .then_close();

        assert_eq!(events.poll_event(), Some(InputEvent::Text('a')));
        assert_eq!(events.poll_event(), Some(InputEvent::Text('b')));
        assert_eq!(events.poll_event(), None);

        assert_eq!(events.poll_event(), None);

        assert_eq!(events.poll_event(), Some(InputEvent::Closed));
        assert_eq!(events.poll_event(), None);
        assert_eq!(events.poll_event(), None);
    }

    #[test]
    fn test_recording_surface_present_swaps_frames() {
        let mut surface = RecordingSurface::new();
        surface.clear(Color::BLACK);
        surface.draw_text(Point::new(1.0, 2.0), "hi", 12.0, Color::WHITE, TextAnchor::TopLeft);
        assert_eq!(surface.pending().len(), 2);

        surface.present();
        assert!(surface.pending().is_empty());
        assert_eq!(surface.texts(), vec!["hi"]);
        assert_eq!(surface.frames_presented(), 1);
    }
}
