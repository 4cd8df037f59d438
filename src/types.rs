//! Core geometry and colour types
//!
//! Scene documents express positions in window pixels and colours as
//! `[r, g, b]` / `[r, g, b, a]` arrays. These types are backend-neutral; the
//! egui backend converts them at paint time.

use serde::{Deserialize, Serialize};

/// An RGBA colour with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<u8>")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const LIGHT_GRAY: Color = Color::rgb(200, 200, 200);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Subtract `amount` from each RGB channel, saturating at zero
    pub fn darken(self, amount: u8) -> Self {
        Self {
            r: self.r.saturating_sub(amount),
            g: self.g.saturating_sub(amount),
            b: self.b.saturating_sub(amount),
            a: self.a,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// Channels may be written as floats; they are truncated toward zero
impl TryFrom<Vec<f64>> for Color {
    type Error = String;

    fn try_from(channels: Vec<f64>) -> Result<Self, Self::Error> {
        let channel = |i: usize| -> Result<u8, String> {
            let v = channels[i].trunc() as i64;
            u8::try_from(v).map_err(|_| format!("colour channel {} out of range: {}", i, v))
        };
        match channels.len() {
            3 => Ok(Color::rgb(channel(0)?, channel(1)?, channel(2)?)),
            4 => Ok(Color::rgba(channel(0)?, channel(1)?, channel(2)?, channel(3)?)),
            n => Err(format!("colour needs 3 or 4 channels, got {}", n)),
        }
    }
}

impl From<Color> for Vec<u8> {
    fn from(c: Color) -> Self {
        if c.a == 255 {
            vec![c.r, c.g, c.b]
        } else {
            vec![c.r, c.g, c.b, c.a]
        }
    }
}

/// A position in window pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// An axis-aligned rectangle (origin top-left, y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Inclusive hit test, matching how controls treat their edges
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

impl From<[f32; 4]> for Rect {
    fn from([x, y, width, height]: [f32; 4]) -> Self {
        Self::new(x, y, width, height)
    }
}

impl From<Rect> for [f32; 4] {
    fn from(r: Rect) -> Self {
        [r.x, r.y, r.width, r.height]
    }
}

/// Outline drawn around a filled shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub width: f32,
    pub color: Color,
}

impl Outline {
    pub const fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }
}
