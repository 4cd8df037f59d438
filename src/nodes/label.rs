//! Text label, static or driven by a variable through a template

use super::{format_value, Binding};
use crate::render::{Surface, TextAnchor};
use crate::store::VariableStore;
use crate::types::{Color, Point};

/// Placeholder replaced by the value with one decimal
const VALUE_TOKEN: &str = "%f";

/// Render `template` for `value`.
///
/// The first `%f` becomes the value with one decimal. A template without the
/// token gets the value's default string form appended.
pub fn render_template(template: &str, value: f64) -> String {
    match template.split_once(VALUE_TOKEN) {
        Some((before, after)) => format!("{}{:.1}{}", before, value, after),
        None => format!("{}{}", template, format_value(value)),
    }
}

#[derive(Debug)]
pub struct Label {
    name: String,
    pos: Point,
    font_size: f32,
    color: Color,
    text: String,
    template: Option<String>,
    binding: Option<Binding>,
}

impl Label {
    /// A bound label with an empty `template` shows the raw value string;
    /// an unbound label shows `content` forever.
    pub fn new(
        name: impl Into<String>,
        pos: Point,
        content: impl Into<String>,
        font_size: f32,
        color: Color,
        template: &str,
        binding: Option<Binding>,
    ) -> Self {
        let template = (binding.is_some() && !template.is_empty()).then(|| template.to_string());
        Self {
            name: name.into(),
            pos,
            font_size,
            color,
            text: content.into(),
            template,
            binding,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn refresh(&mut self, store: &VariableStore) {
        let Some(binding) = &self.binding else {
            return;
        };
        let value = store.get(binding.variable());
        self.text = match &self.template {
            Some(template) => render_template(template, value),
            None => format_value(value),
        };
    }

    pub(crate) fn draw(&self, surface: &mut dyn Surface) {
        surface.draw_text(
            self.pos,
            &self.text,
            self.font_size,
            self.color,
            TextAnchor::TopLeft,
        );
    }
}
