//! Static line segment

use crate::render::Surface;
use crate::types::{Color, Point};

#[derive(Debug)]
pub struct StaticLine {
    name: String,
    from: Point,
    to: Point,
    color: Color,
}

impl StaticLine {
    pub fn new(name: impl Into<String>, from: Point, to: Point, color: Color) -> Self {
        Self {
            name: name.into(),
            from,
            to,
            color,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn endpoints(&self) -> (Point, Point) {
        (self.from, self.to)
    }

    pub(crate) fn draw(&self, surface: &mut dyn Surface) {
        surface.draw_line(self.from, self.to, self.color);
    }
}
