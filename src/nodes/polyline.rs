//! Polyline: a fixed point list, or a plot of a variable's history

use super::{scale_series, Binding};
use crate::render::Surface;
use crate::store::VariableStore;
use crate::types::{Color, Point, Rect};

/// Plot area used when a document does not give one
pub const DEFAULT_PLOT_AREA: Rect = Rect::new(20.0, 220.0, 400.0, 200.0);

#[derive(Debug)]
pub struct Polyline {
    name: String,
    points: Vec<Point>,
    color: Color,
    plot: Rect,
    binding: Option<Binding>,
}

impl Polyline {
    pub fn new(
        name: impl Into<String>,
        points: Vec<Point>,
        color: Color,
        plot: Rect,
        binding: Option<Binding>,
    ) -> Self {
        Self {
            name: name.into(),
            points,
            color,
            plot,
            binding,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Replace the points with the scaled history once it has two samples;
    /// until then the previous points stay.
    pub(crate) fn refresh(&mut self, store: &VariableStore) {
        let Some(binding) = &self.binding else {
            return;
        };
        let history = store.history(binding.variable());
        if history.len() > 1 {
            self.points = scale_series(&history, self.plot);
        }
    }

    pub(crate) fn draw(&self, surface: &mut dyn Surface) {
        if self.points.len() > 1 {
            surface.draw_polyline(&self.points, self.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_point_draws_nothing() {
        let mut surface = crate::render::RecordingSurface::new();
        let line = Polyline::new(
            "p",
            vec![Point::new(5.0, 5.0)],
            Color::WHITE,
            DEFAULT_PLOT_AREA,
            None,
        );
        line.draw(&mut surface);
        assert!(surface.pending().is_empty());
    }

    #[test]
    fn test_bound_polyline_plots_history() {
        let store = VariableStore::shared();
        let mut line = Polyline::new(
            "trend",
            vec![Point::new(20.0, 220.0)],
            Color::WHITE,
            DEFAULT_PLOT_AREA,
            Binding::new(&store, "level"),
        );

        store.set("level", 1.0);
        line.refresh(&store);
        assert_eq!(line.points().len(), 1);

        store.set("level", 3.0);
        line.refresh(&store);
        assert_eq!(
            line.points(),
            &[Point::new(20.0, 420.0), Point::new(420.0, 220.0)]
        );
    }
}
