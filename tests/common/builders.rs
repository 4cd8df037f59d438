//! Test data builders for scene documents

use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// Builder for scene document JSON
#[derive(Default)]
pub struct SceneJsonBuilder {
    objects: Vec<Value>,
}

impl SceneJsonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an arbitrary descriptor
    pub fn object(mut self, object: Value) -> Self {
        self.objects.push(object);
        self
    }

    pub fn rectangle(self, name: &str, rect: [f32; 4], variable: &str, conditions: Value) -> Self {
        self.object(json!({
            "type": "Rectangle",
            "name": name,
            "x": rect[0],
            "y": rect[1],
            "width": rect[2],
            "height": rect[3],
            "variable": variable,
            "conditions": conditions,
        }))
    }

    pub fn text(self, name: &str, variable: &str, format: &str) -> Self {
        self.object(json!({
            "type": "Text",
            "name": name,
            "x": 10,
            "y": 10,
            "variable": variable,
            "format": format,
        }))
    }

    pub fn button(self, name: &str, rect: [f32; 4], action: &str) -> Self {
        self.object(json!({
            "type": "Button",
            "name": name,
            "x": rect[0],
            "y": rect[1],
            "width": rect[2],
            "height": rect[3],
            "text": name,
            "action": action,
        }))
    }

    pub fn input_field(self, name: &str, rect: [f32; 4], variable: &str) -> Self {
        self.object(json!({
            "type": "InputField",
            "name": name,
            "x": rect[0],
            "y": rect[1],
            "width": rect[2],
            "height": rect[3],
            "variable": variable,
        }))
    }

    pub fn history_graph(self, name: &str, variable: &str, max_history: usize) -> Self {
        self.object(json!({
            "type": "HistoryGraph",
            "name": name,
            "x": 0,
            "y": 0,
            "variable": variable,
            "maxHistory": max_history,
        }))
    }

    pub fn image(self, name: &str, path: &str) -> Self {
        self.object(json!({
            "type": "Image",
            "name": name,
            "x": 0,
            "y": 0,
            "path": path,
        }))
    }

    pub fn build(self) -> String {
        json!({ "objects": self.objects }).to_string()
    }

    /// Write the document as `objects.json` inside `dir`
    pub fn write_to(self, dir: &Path) -> PathBuf {
        let path = dir.join("objects.json");
        std::fs::write(&path, self.build()).expect("write scene document");
        path
    }
}

