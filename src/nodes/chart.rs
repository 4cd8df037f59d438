//! History chart: framed grid with a line through recent samples
//!
//! The chart reads the store on every repaint and plots at most
//! `max_history` of the newest samples, so the store's own history cap and
//! the chart's window together bound what is visible.

use super::{scale_series, Binding};
use crate::render::Surface;
use crate::store::VariableStore;
use crate::types::{Color, Outline, Point, Rect};

/// Grid cells per axis
const GRID_DIVISIONS: usize = 4;

#[derive(Debug)]
pub struct HistoryChart {
    name: String,
    rect: Rect,
    max_history: usize,
    line_color: Color,
    grid_color: Color,
    binding: Option<Binding>,
}

impl HistoryChart {
    pub fn new(
        name: impl Into<String>,
        rect: Rect,
        max_history: usize,
        line_color: Color,
        grid_color: Color,
        binding: Option<Binding>,
    ) -> Self {
        Self {
            name: name.into(),
            rect,
            max_history,
            line_color,
            grid_color,
            binding,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// Points of the plotted line for the store's current history
    pub fn plot_points(&self, store: &VariableStore) -> Vec<Point> {
        let Some(binding) = &self.binding else {
            return Vec::new();
        };
        let history = store.history(binding.variable());
        let start = history.len().saturating_sub(self.max_history);
        scale_series(&history[start..], self.rect)
    }

    pub(crate) fn draw(&self, surface: &mut dyn Surface, store: &VariableStore) {
        let r = self.rect;
        surface.fill_rect(r, Color::TRANSPARENT, Some(Outline::new(1.0, Color::BLACK)));

        for i in 1..GRID_DIVISIONS {
            let fraction = i as f32 / GRID_DIVISIONS as f32;
            let x = r.x + r.width * fraction;
            let y = r.y + r.height * fraction;
            surface.draw_line(Point::new(x, r.y), Point::new(x, r.bottom()), self.grid_color);
            surface.draw_line(Point::new(r.x, y), Point::new(r.right(), y), self.grid_color);
        }

        let points = self.plot_points(store);
        if points.len() > 1 {
            surface.draw_polyline(&points, self.line_color);
        }
    }
}
