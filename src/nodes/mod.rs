//! Visual nodes: the renderable elements of a scene.
//!
//! All node kinds are variants of the closed [`VisualNode`] enum. Scene,
//! player and tests dispatch through it, and each variant lives in its own
//! module.
//!
//! Nodes never hold the store. A variable-bound node owns a [`Binding`]: a
//! store subscription whose callback only marks the node dirty. The player
//! calls [`VisualNode::sync`] before drawing, so dirty nodes re-read the
//! store at a point where no notification wave is running. Dropping the node
//! drops the subscription.

pub mod button;
pub mod chart;
pub mod image;
pub mod indicator;
pub mod label;
pub mod line;
pub mod polyline;
pub mod text_input;

pub use button::{Button, ButtonState};
pub use chart::HistoryChart;
pub use image::StaticImage;
pub use indicator::{Condition, Indicator};
pub use label::Label;
pub use line::StaticLine;
pub use polyline::Polyline;
pub use text_input::TextInput;

use crate::render::{InputEvent, Surface};
use crate::store::{Subscription, VariableStore};
use crate::types::{Point, Rect};
use std::cell::Cell;
use std::rc::Rc;

/// A node's link to one store variable
pub struct Binding {
    variable: String,
    dirty: Rc<Cell<bool>>,
    _subscription: Subscription,
}

impl Binding {
    /// Subscribe to `variable`; `None` when the name is empty (unbound)
    pub fn new(store: &Rc<VariableStore>, variable: &str) -> Option<Self> {
        if variable.is_empty() {
            return None;
        }
        // Starts dirty so the first sync reads the current value
        let dirty = Rc::new(Cell::new(true));
        let flag = Rc::clone(&dirty);
        let subscription = store.subscribe(variable, move |_| flag.set(true));
        Some(Self {
            variable: variable.to_string(),
            dirty,
            _subscription: subscription,
        })
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Read and clear the dirty flag
    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("variable", &self.variable)
            .field("dirty", &self.dirty.get())
            .finish()
    }
}

/// Default string form of a value: fixed notation, six decimals
pub fn format_value(value: f64) -> String {
    format!("{:.6}", value)
}

/// Scale samples into `area`, oldest at the left edge, newest at the right.
///
/// The value axis is inverted so larger values plot higher. A flat series
/// uses a range of 1 and lies on the bottom edge. Fewer than two samples
/// produce no points.
pub fn scale_series(samples: &[f64], area: Rect) -> Vec<Point> {
    if samples.len() < 2 {
        return Vec::new();
    }

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut range = max - min;
    if range == 0.0 {
        range = 1.0;
    }

    let x_step = area.width / (samples.len() - 1) as f32;
    samples
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let x = area.x + i as f32 * x_step;
            let y = area.y + area.height - ((v - min) / range) as f32 * area.height;
            Point::new(x, y)
        })
        .collect()
}

/// Node kind tag, as named in scene documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Rectangle,
    Text,
    Line,
    Polyline,
    InputField,
    Button,
    HistoryGraph,
    Image,
}

impl NodeKind {
    pub const ALL: [NodeKind; 8] = [
        NodeKind::Rectangle,
        NodeKind::Text,
        NodeKind::Line,
        NodeKind::Polyline,
        NodeKind::InputField,
        NodeKind::Button,
        NodeKind::HistoryGraph,
        NodeKind::Image,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Rectangle => "Rectangle",
            NodeKind::Text => "Text",
            NodeKind::Line => "Line",
            NodeKind::Polyline => "Polyline",
            NodeKind::InputField => "InputField",
            NodeKind::Button => "Button",
            NodeKind::HistoryGraph => "HistoryGraph",
            NodeKind::Image => "Image",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == tag)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Enum dispatch over every node kind
#[derive(Debug)]
pub enum VisualNode {
    Indicator(Indicator),
    Label(Label),
    Line(StaticLine),
    Polyline(Polyline),
    TextInput(TextInput),
    Button(Button),
    Chart(HistoryChart),
    Image(StaticImage),
}

impl VisualNode {
    pub fn name(&self) -> &str {
        match self {
            VisualNode::Indicator(n) => n.name(),
            VisualNode::Label(n) => n.name(),
            VisualNode::Line(n) => n.name(),
            VisualNode::Polyline(n) => n.name(),
            VisualNode::TextInput(n) => n.name(),
            VisualNode::Button(n) => n.name(),
            VisualNode::Chart(n) => n.name(),
            VisualNode::Image(n) => n.name(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            VisualNode::Indicator(_) => NodeKind::Rectangle,
            VisualNode::Label(_) => NodeKind::Text,
            VisualNode::Line(_) => NodeKind::Line,
            VisualNode::Polyline(_) => NodeKind::Polyline,
            VisualNode::TextInput(_) => NodeKind::InputField,
            VisualNode::Button(_) => NodeKind::Button,
            VisualNode::Chart(_) => NodeKind::HistoryGraph,
            VisualNode::Image(_) => NodeKind::Image,
        }
    }

    /// Bound variable name, if any
    pub fn variable(&self) -> Option<&str> {
        let binding = match self {
            VisualNode::Indicator(n) => n.binding(),
            VisualNode::Label(n) => n.binding(),
            VisualNode::Polyline(n) => n.binding(),
            VisualNode::TextInput(n) => n.binding(),
            VisualNode::Button(n) => n.binding(),
            VisualNode::Chart(n) => n.binding(),
            VisualNode::Line(_) | VisualNode::Image(_) => None,
        };
        binding.map(Binding::variable)
    }

    /// Periodic tick: re-read the store unconditionally
    pub fn update(&mut self, store: &VariableStore) {
        match self {
            VisualNode::Indicator(n) => n.refresh(store),
            VisualNode::Label(n) => n.refresh(store),
            VisualNode::Polyline(n) => n.refresh(store),
            VisualNode::TextInput(n) => n.refresh(store),
            VisualNode::Button(n) => n.refresh(store),
            VisualNode::Chart(_) | VisualNode::Line(_) | VisualNode::Image(_) => {}
        }
    }

    /// Re-read the store only if the bound variable changed since last time
    pub fn sync(&mut self, store: &VariableStore) {
        let dirty = match self {
            VisualNode::Indicator(n) => n.binding().is_some_and(Binding::take_dirty),
            VisualNode::Label(n) => n.binding().is_some_and(Binding::take_dirty),
            VisualNode::Polyline(n) => n.binding().is_some_and(Binding::take_dirty),
            VisualNode::TextInput(n) => n.binding().is_some_and(Binding::take_dirty),
            VisualNode::Button(n) => n.binding().is_some_and(Binding::take_dirty),
            VisualNode::Chart(n) => n.binding().is_some_and(Binding::take_dirty),
            VisualNode::Line(_) | VisualNode::Image(_) => false,
        };
        if dirty {
            self.update(store);
        }
    }

    /// Offer an input event; kinds a node does not care about are ignored
    pub fn handle_event(&mut self, event: &InputEvent, store: &VariableStore) {
        match self {
            VisualNode::TextInput(n) => n.handle_event(event, store),
            VisualNode::Button(n) => n.handle_event(event, store),
            _ => {}
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface, store: &VariableStore) {
        match self {
            VisualNode::Indicator(n) => n.draw(surface),
            VisualNode::Label(n) => n.draw(surface),
            VisualNode::Line(n) => n.draw(surface),
            VisualNode::Polyline(n) => n.draw(surface),
            VisualNode::TextInput(n) => n.draw(surface),
            VisualNode::Button(n) => n.draw(surface),
            VisualNode::Chart(n) => n.draw(surface, store),
            VisualNode::Image(n) => n.draw(surface),
        }
    }
}
