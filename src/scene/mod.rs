//! Scene: the ordered node list the player dispatches to and paints
//!
//! List order is both paint order and event-dispatch order. Nodes are
//! built by [`loader::SceneBuilder`] from a scene document, or from
//! [`default_scene::default_scene_document`] when no usable document exists.

pub mod default_scene;
pub mod loader;

pub use default_scene::{default_scene_document, write_default_scene};
pub use loader::{
    load_or_default, load_scene_file, parse_document, LoadReport, NodeDescriptor, ParsedDocument,
    SceneBuilder, SceneDocument, SceneSource,
};

use crate::nodes::VisualNode;

#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<VisualNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: VisualNode) {
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[VisualNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [VisualNode] {
        &mut self.nodes
    }

    /// First node with the given name
    pub fn find(&self, name: &str) -> Option<&VisualNode> {
        self.nodes.iter().find(|n| n.name() == name)
    }
}

impl From<Vec<VisualNode>> for Scene {
    fn from(nodes: Vec<VisualNode>) -> Self {
        Self { nodes }
    }
}
