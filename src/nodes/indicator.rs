//! Indicator rectangle: a filled rectangle whose colour follows a variable

use super::Binding;
use crate::render::Surface;
use crate::store::VariableStore;
use crate::types::{Color, Rect};
use serde::{Deserialize, Serialize};

/// One `(value, colour)` rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Condition {
    pub value: f64,
    pub color: Color,
}

impl Default for Condition {
    fn default() -> Self {
        Self {
            value: 0.0,
            color: Color::WHITE,
        }
    }
}

#[derive(Debug)]
pub struct Indicator {
    name: String,
    rect: Rect,
    default_color: Color,
    color: Color,
    conditions: Vec<Condition>,
    /// Accepted distance between value and condition; 0.0 is exact equality
    tolerance: f64,
    binding: Option<Binding>,
}

impl Indicator {
    pub fn new(name: impl Into<String>, rect: Rect, color: Color, binding: Option<Binding>) -> Self {
        Self {
            name: name.into(),
            rect,
            default_color: color,
            color,
            conditions: Vec::new(),
            tolerance: 0.0,
            binding,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.abs();
        self
    }

    /// Append a rule; rules are evaluated in insertion order
    pub fn add_condition(&mut self, value: f64, color: Color) {
        self.conditions.push(Condition { value, color });
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// First matching condition's colour, else the default colour
    pub fn resolve_color(&self, value: f64) -> Color {
        self.conditions
            .iter()
            .find(|c| self.matches(c.value, value))
            .map_or(self.default_color, |c| c.color)
    }

    fn matches(&self, threshold: f64, value: f64) -> bool {
        if self.tolerance == 0.0 {
            threshold == value
        } else {
            (threshold - value).abs() <= self.tolerance
        }
    }

    pub(crate) fn refresh(&mut self, store: &VariableStore) {
        if let Some(binding) = &self.binding {
            self.color = self.resolve_color(store.get(binding.variable()));
        }
    }

    pub(crate) fn draw(&self, surface: &mut dyn Surface) {
        surface.fill_rect(self.rect, self.color, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::VisualNode;

    fn status_indicator(store: &std::rc::Rc<VariableStore>) -> Indicator {
        let mut node = Indicator::new(
            "status",
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Color::WHITE,
            Binding::new(store, "status"),
        );
        node.add_condition(0.0, Color::rgb(0, 255, 0));
        node.add_condition(1.0, Color::rgb(255, 255, 0));
        node.add_condition(2.0, Color::RED);
        node
    }

    #[test]
    fn test_first_match_wins() {
        let mut node = Indicator::new("dup", Rect::default(), Color::WHITE, None);
        node.add_condition(0.0, Color::RED);
        node.add_condition(0.0, Color::BLUE);
        assert_eq!(node.resolve_color(0.0), Color::RED);
    }

    #[test]
    fn test_no_match_keeps_default() {
        let store = VariableStore::shared();
        let node = status_indicator(&store);
        assert_eq!(node.resolve_color(7.0), Color::WHITE);
        assert_eq!(node.resolve_color(1.0000001), Color::WHITE);
    }

    #[test]
    fn test_tolerance_widens_match() {
        let store = VariableStore::shared();
        let node = status_indicator(&store).with_tolerance(0.01);
        assert_eq!(node.resolve_color(1.005), Color::rgb(255, 255, 0));
    }

    #[test]
    fn test_colour_follows_store_after_sync() {
        let store = VariableStore::shared();
        let mut node = VisualNode::Indicator(status_indicator(&store));

        store.set("status", 2.0);
        node.sync(&store);
        let VisualNode::Indicator(ref indicator) = node else {
            unreachable!()
        };
        assert_eq!(indicator.color(), Color::RED);

        store.set("status", 0.0);
        node.sync(&store);
        let VisualNode::Indicator(ref indicator) = node else {
            unreachable!()
        };
        assert_eq!(indicator.color(), Color::rgb(0, 255, 0));
    }
}
