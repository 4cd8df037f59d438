//! Text input field editing a numeric variable
//!
//! While unfocused the field mirrors its variable. A primary click inside
//! focuses it, and typing edits a local buffer shown with a `|` cursor.
//! Enter, or a click outside, unfocuses and commits the buffer. A buffer
//! that does not parse as a number is reported and replaced by the stored
//! value.

use super::{format_value, Binding};
use crate::render::{InputEvent, Key, PointerButton, Surface, TextAnchor};
use crate::store::VariableStore;
use crate::types::{Color, Outline, Point, Rect};

const TEXT_INSET: f32 = 5.0;
const CURSOR: char = '|';

#[derive(Debug)]
pub struct TextInput {
    name: String,
    rect: Rect,
    font_size: f32,
    focused: bool,
    buffer: String,
    binding: Option<Binding>,
}

impl TextInput {
    pub fn new(name: impl Into<String>, rect: Rect, font_size: f32, binding: Option<Binding>) -> Self {
        Self {
            name: name.into(),
            rect,
            font_size,
            focused: false,
            buffer: String::new(),
            binding,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Text as drawn, including the cursor while focused
    pub fn display_text(&self) -> String {
        if self.focused {
            format!("{}{}", self.buffer, CURSOR)
        } else {
            self.buffer.clone()
        }
    }

    pub(crate) fn refresh(&mut self, store: &VariableStore) {
        if self.focused {
            return;
        }
        if let Some(binding) = &self.binding {
            self.buffer = format_value(store.get(binding.variable()));
        }
    }

    pub(crate) fn handle_event(&mut self, event: &InputEvent, store: &VariableStore) {
        match event {
            InputEvent::PointerPressed {
                pos,
                button: PointerButton::Primary,
            } => self.set_focused(self.rect.contains(*pos), store),
            InputEvent::KeyPressed(Key::Enter) if self.focused => self.set_focused(false, store),
            InputEvent::KeyPressed(Key::Backspace) if self.focused => {
                self.buffer.pop();
            }
            InputEvent::Text(c) if self.focused && c.is_ascii() && !c.is_ascii_control() => {
                self.buffer.push(*c);
            }
            _ => {}
        }
    }

    fn set_focused(&mut self, focused: bool, store: &VariableStore) {
        if focused == self.focused {
            return;
        }
        self.focused = focused;
        if !focused {
            self.commit(store);
        }
    }

    fn commit(&mut self, store: &VariableStore) {
        let Some(binding) = &self.binding else {
            return;
        };
        if self.buffer.is_empty() {
            return;
        }
        match self.buffer.trim().parse::<f64>() {
            Ok(value) => {
                store.set(binding.variable(), value);
                tracing::info!(
                    "Input field set variable '{}' to: {}",
                    binding.variable(),
                    self.buffer
                );
            }
            Err(_) => {
                tracing::error!("Invalid input in input field '{}': {}", self.name, self.buffer);
                self.buffer = format_value(store.get(binding.variable()));
            }
        }
    }

    pub(crate) fn draw(&self, surface: &mut dyn Surface) {
        let outline = if self.focused {
            Outline::new(2.0, Color::BLUE)
        } else {
            Outline::new(1.0, Color::BLACK)
        };
        surface.fill_rect(self.rect, Color::WHITE, Some(outline));
        surface.draw_text(
            Point::new(self.rect.x + TEXT_INSET, self.rect.y + TEXT_INSET),
            &self.display_text(),
            self.font_size,
            Color::BLACK,
            TextAnchor::TopLeft,
        );
    }
}
