//! Scene document parsing and node construction
//!
//! A scene document is JSON of the form `{ "objects": [ descriptor, ... ] }`.
//! Each descriptor carries a `type` tag and type-specific fields; any field
//! may be omitted and takes the default listed on its descriptor struct.
//!
//! Loading is forgiving. A descriptor with an unknown tag, or whose fields
//! fail to deserialize, is skipped and reported as a warning; a malformed
//! action leaves its button inert; an unresolvable image draws a
//! placeholder. Only an unreadable or structurally broken document is an
//! error, and [`load_or_default`] turns even that into the built-in scene.

use super::default_scene::{default_scene_document, write_default_scene};
use super::Scene;
use crate::action::Action;
use crate::config::{AssetConfig, PlayerConfig};
use crate::error::{HmiError, Result, ResultExt};
use crate::nodes::{
    Binding, Button, Condition, HistoryChart, Indicator, Label, NodeKind, Polyline, StaticImage,
    StaticLine, TextInput, VisualNode,
};
use crate::render::{resolve_image, AssetResolver};
use crate::store::VariableStore;
use crate::types::{Color, Point, Rect};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::rc::Rc;

// ==================== Descriptors ====================

/// Fields shared by every descriptor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonFields {
    pub name: String,
    pub x: f32,
    pub y: f32,
    /// Bound variable; empty means unbound
    #[serde(skip_serializing_if = "String::is_empty")]
    pub variable: String,
}

impl CommonFields {
    pub fn named(name: &str, x: f32, y: f32) -> Self {
        Self {
            name: name.to_string(),
            x,
            y,
            variable: String::new(),
        }
    }

    pub fn bound(mut self, variable: &str) -> Self {
        self.variable = variable.to_string();
        self
    }

    fn rect(&self, width: f32, height: f32) -> Rect {
        Rect::new(self.x, self.y, width, height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectangleDescriptor {
    #[serde(flatten)]
    pub common: CommonFields,
    pub width: f32,
    pub height: f32,
    pub color: Color,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl Default for RectangleDescriptor {
    fn default() -> Self {
        Self {
            common: CommonFields::default(),
            width: 100.0,
            height: 50.0,
            color: Color::WHITE,
            conditions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextDescriptor {
    #[serde(flatten)]
    pub common: CommonFields,
    pub content: String,
    pub font_size: f32,
    pub color: Color,
    /// Template applied to the bound value; `%f` marks the value
    #[serde(skip_serializing_if = "String::is_empty")]
    pub format: String,
}

impl Default for TextDescriptor {
    fn default() -> Self {
        Self {
            common: CommonFields::default(),
            content: String::new(),
            font_size: 20.0,
            color: Color::WHITE,
            format: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineDescriptor {
    #[serde(flatten)]
    pub common: CommonFields,
    pub x2: f32,
    pub y2: f32,
    pub color: Color,
}

impl Default for LineDescriptor {
    fn default() -> Self {
        Self {
            common: CommonFields::default(),
            x2: 0.0,
            y2: 0.0,
            color: Color::WHITE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolylineDescriptor {
    #[serde(flatten)]
    pub common: CommonFields,
    /// Absent means a single point at `(x, y)`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Point>>,
    pub color: Color,
    /// Area the bound history is scaled into
    pub plot: Rect,
}

impl Default for PolylineDescriptor {
    fn default() -> Self {
        Self {
            common: CommonFields::default(),
            points: None,
            color: Color::WHITE,
            plot: crate::nodes::polyline::DEFAULT_PLOT_AREA,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InputFieldDescriptor {
    #[serde(flatten)]
    pub common: CommonFields,
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
}

impl Default for InputFieldDescriptor {
    fn default() -> Self {
        Self {
            common: CommonFields::default(),
            width: 200.0,
            height: 30.0,
            font_size: 16.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ButtonDescriptor {
    #[serde(flatten)]
    pub common: CommonFields,
    pub width: f32,
    pub height: f32,
    pub text: String,
    pub font_size: f32,
    pub color: Color,
    pub text_color: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl Default for ButtonDescriptor {
    fn default() -> Self {
        Self {
            common: CommonFields::default(),
            width: 100.0,
            height: 40.0,
            text: String::new(),
            font_size: 16.0,
            color: Color::LIGHT_GRAY,
            text_color: Color::BLACK,
            action: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HistoryGraphDescriptor {
    #[serde(flatten)]
    pub common: CommonFields,
    pub width: f32,
    pub height: f32,
    pub max_history: usize,
    pub line_color: Color,
    pub grid_color: Color,
}

impl Default for HistoryGraphDescriptor {
    fn default() -> Self {
        Self {
            common: CommonFields::default(),
            width: 400.0,
            height: 200.0,
            max_history: 50,
            line_color: Color::BLUE,
            grid_color: Color::rgba(200, 200, 200, 100),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDescriptor {
    #[serde(flatten)]
    pub common: CommonFields,
    pub width: f32,
    pub height: f32,
    pub path: String,
}

impl Default for ImageDescriptor {
    fn default() -> Self {
        Self {
            common: CommonFields::default(),
            width: 100.0,
            height: 100.0,
            path: String::new(),
        }
    }
}

/// One entry of a scene document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeDescriptor {
    Rectangle(RectangleDescriptor),
    Text(TextDescriptor),
    Line(LineDescriptor),
    Polyline(PolylineDescriptor),
    InputField(InputFieldDescriptor),
    Button(ButtonDescriptor),
    HistoryGraph(HistoryGraphDescriptor),
    Image(ImageDescriptor),
}

impl NodeDescriptor {
    pub fn common(&self) -> &CommonFields {
        match self {
            NodeDescriptor::Rectangle(d) => &d.common,
            NodeDescriptor::Text(d) => &d.common,
            NodeDescriptor::Line(d) => &d.common,
            NodeDescriptor::Polyline(d) => &d.common,
            NodeDescriptor::InputField(d) => &d.common,
            NodeDescriptor::Button(d) => &d.common,
            NodeDescriptor::HistoryGraph(d) => &d.common,
            NodeDescriptor::Image(d) => &d.common,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeDescriptor::Rectangle(_) => NodeKind::Rectangle,
            NodeDescriptor::Text(_) => NodeKind::Text,
            NodeDescriptor::Line(_) => NodeKind::Line,
            NodeDescriptor::Polyline(_) => NodeKind::Polyline,
            NodeDescriptor::InputField(_) => NodeKind::InputField,
            NodeDescriptor::Button(_) => NodeKind::Button,
            NodeDescriptor::HistoryGraph(_) => NodeKind::HistoryGraph,
            NodeDescriptor::Image(_) => NodeKind::Image,
        }
    }
}

/// A whole scene document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneDocument {
    pub objects: Vec<NodeDescriptor>,
}

impl SceneDocument {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Document shape before individual descriptors are checked
#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    objects: Vec<serde_json::Value>,
}

/// Descriptors parsed from a document, plus the entries that were skipped
#[derive(Debug, Default)]
pub struct ParsedDocument {
    pub descriptors: Vec<NodeDescriptor>,
    pub warnings: Vec<HmiError>,
}

/// Parse a document, skipping entries that cannot be used.
///
/// Fails only when the text is not a JSON object with an `objects` array.
pub fn parse_document(text: &str) -> Result<ParsedDocument> {
    let raw: RawDocument = serde_json::from_str(text)
        .map_err(|e| HmiError::SceneDocument(format!("Error parsing scene document: {}", e)))?;

    let mut parsed = ParsedDocument::default();
    for (index, value) in raw.objects.into_iter().enumerate() {
        let tag = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();

        if NodeKind::from_tag(&tag).is_none() {
            tracing::warn!("Unknown object type: {:?} (entry #{})", tag, index);
            parsed.warnings.push(HmiError::Descriptor {
                index,
                message: format!("unknown object type '{}'", tag),
            });
            continue;
        }

        match serde_json::from_value::<NodeDescriptor>(value) {
            Ok(descriptor) => parsed.descriptors.push(descriptor),
            Err(e) => {
                tracing::warn!("Skipping invalid {} descriptor #{}: {}", tag, index, e);
                parsed.warnings.push(HmiError::Descriptor {
                    index,
                    message: format!("invalid {}: {}", tag, e),
                });
            }
        }
    }
    Ok(parsed)
}

// ==================== Builder ====================

/// Where a loaded scene came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneSource {
    /// Read from an existing document
    Document(PathBuf),
    /// The document was missing; the default scene was written there and read back
    Generated(PathBuf),
    /// Built from the in-memory default scene
    BuiltinDefault,
}

/// Result of building a scene
#[derive(Debug)]
pub struct LoadReport {
    pub scene: Scene,
    /// Recoverable problems, in the order they were found
    pub warnings: Vec<HmiError>,
    pub source: SceneSource,
}

/// Turns descriptors into wired nodes
pub struct SceneBuilder<'a> {
    store: Rc<VariableStore>,
    assets: &'a mut dyn AssetResolver,
    asset_config: AssetConfig,
    condition_tolerance: f64,
}

impl<'a> SceneBuilder<'a> {
    pub fn new(store: &Rc<VariableStore>, assets: &'a mut dyn AssetResolver) -> Self {
        Self {
            store: Rc::clone(store),
            assets,
            asset_config: AssetConfig::default(),
            condition_tolerance: 0.0,
        }
    }

    /// Builder using the asset and scene sections of `config`
    pub fn from_config(
        store: &Rc<VariableStore>,
        assets: &'a mut dyn AssetResolver,
        config: &PlayerConfig,
    ) -> Self {
        Self::new(store, assets)
            .asset_config(config.assets.clone())
            .condition_tolerance(config.scene.condition_tolerance)
    }

    pub fn asset_config(mut self, config: AssetConfig) -> Self {
        self.asset_config = config;
        self
    }

    pub fn condition_tolerance(mut self, tolerance: f64) -> Self {
        self.condition_tolerance = tolerance;
        self
    }

    /// Build every descriptor in order
    pub fn build(&mut self, descriptors: &[NodeDescriptor], source: SceneSource) -> LoadReport {
        let mut warnings = Vec::new();
        let mut scene = Scene::new();
        for descriptor in descriptors {
            let mut node = self.build_node(descriptor, &mut warnings);
            node.sync(&self.store);
            scene.push(node);
        }
        tracing::info!("Built scene with {} objects", scene.len());
        LoadReport {
            scene,
            warnings,
            source,
        }
    }

    /// Build one node. Problems that leave the node usable are appended to
    /// `warnings`.
    pub fn build_node(
        &mut self,
        descriptor: &NodeDescriptor,
        warnings: &mut Vec<HmiError>,
    ) -> VisualNode {
        let common = descriptor.common();
        let binding = Binding::new(&self.store, &common.variable);

        match descriptor {
            NodeDescriptor::Rectangle(d) => {
                let mut node = Indicator::new(
                    &common.name,
                    common.rect(d.width, d.height),
                    d.color,
                    binding,
                )
                .with_tolerance(self.condition_tolerance);
                for condition in &d.conditions {
                    node.add_condition(condition.value, condition.color);
                }
                VisualNode::Indicator(node)
            }
            NodeDescriptor::Text(d) => VisualNode::Label(Label::new(
                &common.name,
                Point::new(common.x, common.y),
                d.content.clone(),
                d.font_size,
                d.color,
                &d.format,
                binding,
            )),
            NodeDescriptor::Line(d) => VisualNode::Line(StaticLine::new(
                &common.name,
                Point::new(common.x, common.y),
                Point::new(d.x2, d.y2),
                d.color,
            )),
            NodeDescriptor::Polyline(d) => {
                let points = d
                    .points
                    .clone()
                    .unwrap_or_else(|| vec![Point::new(common.x, common.y)]);
                VisualNode::Polyline(Polyline::new(&common.name, points, d.color, d.plot, binding))
            }
            NodeDescriptor::InputField(d) => VisualNode::TextInput(TextInput::new(
                &common.name,
                common.rect(d.width, d.height),
                d.font_size,
                binding,
            )),
            NodeDescriptor::Button(d) => {
                let action = d
                    .action
                    .as_deref()
                    .and_then(|descriptor| self.parse_action(&common.name, descriptor, warnings));
                let button = Button::new(
                    &common.name,
                    common.rect(d.width, d.height),
                    d.text.clone(),
                    d.font_size,
                    d.color,
                    d.text_color,
                    binding,
                )
                .with_action(action);
                VisualNode::Button(button)
            }
            NodeDescriptor::HistoryGraph(d) => VisualNode::Chart(HistoryChart::new(
                &common.name,
                common.rect(d.width, d.height),
                d.max_history,
                d.line_color,
                d.grid_color,
                binding,
            )),
            NodeDescriptor::Image(d) => {
                let sprite =
                    resolve_image(&mut *self.assets, Path::new(&d.path), &self.asset_config);
                if sprite.is_none() {
                    warnings.push(HmiError::Asset(format!(
                        "image '{}' for '{}' not found, drawing placeholder",
                        d.path, common.name
                    )));
                }
                VisualNode::Image(StaticImage::new(
                    &common.name,
                    common.rect(d.width, d.height),
                    &d.path,
                    sprite,
                ))
            }
        }
    }

    fn parse_action(
        &self,
        button: &str,
        descriptor: &str,
        warnings: &mut Vec<HmiError>,
    ) -> Option<Action> {
        match Action::parse(descriptor) {
            Ok(Some(action)) => Some(action),
            Ok(None) => {
                tracing::warn!("Button '{}' has unknown action '{}'", button, descriptor);
                None
            }
            Err(e) => {
                tracing::error!("Invalid action format for button '{}': {}", button, e);
                warnings.push(HmiError::from(e).with_context(format!("button '{}'", button)));
                None
            }
        }
    }
}

// ==================== Loading ====================

/// Read and build the scene at `path`
pub fn load_scene_file(path: &Path, builder: &mut SceneBuilder<'_>) -> Result<LoadReport> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot open scene document {}", path.display()))?;
    let parsed = parse_document(&text)?;
    let mut report = builder.build(&parsed.descriptors, SceneSource::Document(path.to_path_buf()));
    let mut warnings = parsed.warnings;
    warnings.append(&mut report.warnings);
    report.warnings = warnings;
    tracing::info!(
        "Loaded {} objects from {:?} ({} warnings)",
        report.scene.len(),
        path,
        report.warnings.len()
    );
    Ok(report)
}

/// Load the scene at `path`, never failing.
///
/// A missing document is generated from the default scene and then read
/// back. An unreadable or malformed document, or one yielding no nodes,
/// falls back to the in-memory default scene.
pub fn load_or_default(path: &Path, builder: &mut SceneBuilder<'_>) -> LoadReport {
    if !path.exists() {
        tracing::info!("Scene document {:?} not found, creating default scene", path);
        return match write_default_scene(path) {
            Ok(()) => match load_scene_file(path, builder) {
                Ok(mut report) if !report.scene.is_empty() => {
                    report.source = SceneSource::Generated(path.to_path_buf());
                    report
                }
                Ok(report) => default_with(builder, report.warnings),
                Err(e) => default_with(builder, vec![e]),
            },
            Err(e) => {
                tracing::warn!("Failed to create default scene document: {}", e);
                default_with(builder, vec![e])
            }
        };
    }

    match load_scene_file(path, builder) {
        Ok(report) if !report.scene.is_empty() => report,
        Ok(report) => {
            tracing::warn!("Scene document {:?} produced no objects, using default scene", path);
            default_with(builder, report.warnings)
        }
        Err(e) => {
            tracing::warn!("{}, using default scene", e);
            default_with(builder, vec![e])
        }
    }
}

fn default_with(builder: &mut SceneBuilder<'_>, mut warnings: Vec<HmiError>) -> LoadReport {
    let document = default_scene_document();
    let mut report = builder.build(&document.objects, SceneSource::BuiltinDefault);
    warnings.append(&mut report.warnings);
    report.warnings = warnings;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::StaticAssets;

    fn build(text: &str) -> LoadReport {
        let store = VariableStore::shared();
        let mut assets = StaticAssets::default();
        let mut builder = SceneBuilder::new(&store, &mut assets);
        let parsed = parse_document(text).unwrap();
        let mut report = builder.build(&parsed.descriptors, SceneSource::BuiltinDefault);
        let mut warnings = parsed.warnings;
        warnings.append(&mut report.warnings);
        report.warnings = warnings;
        report
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let parsed = parse_document(r#"{"objects":[{"type":"Button"},{"type":"HistoryGraph"}]}"#)
            .unwrap();
        let NodeDescriptor::Button(button) = &parsed.descriptors[0] else {
            panic!("expected button");
        };
        assert_eq!(button.width, 100.0);
        assert_eq!(button.height, 40.0);
        assert_eq!(button.color, Color::rgb(200, 200, 200));
        assert_eq!(button.text_color, Color::BLACK);
        assert_eq!(button.action, None);

        let NodeDescriptor::HistoryGraph(graph) = &parsed.descriptors[1] else {
            panic!("expected graph");
        };
        assert_eq!(graph.max_history, 50);
        assert_eq!(graph.grid_color, Color::rgba(200, 200, 200, 100));
    }

    #[test]
    fn test_camel_case_fields() {
        let parsed = parse_document(
            r#"{"objects":[{"type":"Text","name":"t","x":5,"y":6,"fontSize":40,"variable":"v","format":"T: %f"}]}"#,
        )
        .unwrap();
        let NodeDescriptor::Text(text) = &parsed.descriptors[0] else {
            panic!("expected text");
        };
        assert_eq!(text.font_size, 40.0);
        assert_eq!(text.common.x, 5.0);
        assert_eq!(text.common.variable, "v");
        assert_eq!(text.format, "T: %f");
    }

    #[test]
    fn test_unknown_type_is_skipped_with_warning() {
        let report = build(
            r#"{"objects":[
                {"type":"Rectangle","name":"a"},
                {"type":"Gauge","name":"b"},
                {"type":"Line","name":"c","x2":10}
            ]}"#,
        );
        assert_eq!(report.scene.len(), 2);
        assert_eq!(report.warnings.len(), 1);
        assert!(matches!(report.warnings[0], HmiError::Descriptor { index: 1, .. }));
    }

    #[test]
    fn test_invalid_fields_skip_descriptor() {
        let report = build(
            r#"{"objects":[
                {"type":"Rectangle","color":[300,0,0]},
                {"type":"Text","fontSize":"big"},
                {"name":"untyped"},
                {"type":"Text","content":"ok"}
            ]}"#,
        );
        assert_eq!(report.scene.len(), 1);
        assert_eq!(report.warnings.len(), 3);
    }

    #[test]
    fn test_polyline_defaults_to_single_point() {
        let parsed =
            parse_document(r#"{"objects":[{"type":"Polyline","x":3,"y":4}]}"#).unwrap();
        let report = build(r#"{"objects":[{"type":"Polyline","x":3,"y":4}]}"#);
        let VisualNode::Polyline(line) = &report.scene.nodes()[0] else {
            panic!("expected polyline");
        };
        assert_eq!(line.points(), &[Point::new(3.0, 4.0)]);
        let NodeDescriptor::Polyline(d) = &parsed.descriptors[0] else {
            panic!("expected polyline");
        };
        assert_eq!(d.plot, Rect::new(20.0, 220.0, 400.0, 200.0));
    }

    #[test]
    fn test_malformed_action_makes_button_inert() {
        let report = build(
            r#"{"objects":[
                {"type":"Button","name":"bad","action":"set_variable:x=abc"},
                {"type":"Button","name":"unknown","action":"launch"},
                {"type":"Button","name":"good","action":"toggle_variable:mode=0,3"}
            ]}"#,
        );
        assert_eq!(report.scene.len(), 3);
        assert_eq!(report.warnings.len(), 1);

        let actions: Vec<bool> = report
            .scene
            .nodes()
            .iter()
            .map(|n| match n {
                VisualNode::Button(b) => b.action().is_some(),
                _ => false,
            })
            .collect();
        assert_eq!(actions, vec![false, false, true]);
    }

    #[test]
    fn test_missing_image_warns_and_keeps_node() {
        let report = build(r#"{"objects":[{"type":"Image","name":"logo","path":"nope.png"}]}"#);
        assert_eq!(report.scene.len(), 1);
        assert!(matches!(report.warnings[0], HmiError::Asset(_)));
    }

    #[test]
    fn test_document_without_objects_is_empty() {
        let parsed = parse_document("{}").unwrap();
        assert!(parsed.descriptors.is_empty());
        assert!(parse_document("[1, 2").is_err());
        assert!(parse_document(r#"{"objects": 5}"#).is_err());
    }

    #[test]
    fn test_bound_text_is_rendered_on_build() {
        let store = VariableStore::shared();
        store.set("temperature_value", 72.549);
        let mut assets = StaticAssets::default();
        let mut builder = SceneBuilder::new(&store, &mut assets);
        let parsed = parse_document(
            r#"{"objects":[{"type":"Text","variable":"temperature_value","format":"Temp: %f"}]}"#,
        )
        .unwrap();
        let report = builder.build(&parsed.descriptors, SceneSource::BuiltinDefault);
        let VisualNode::Label(label) = &report.scene.nodes()[0] else {
            panic!("expected label");
        };
        assert_eq!(label.text(), "Temp: 72.5");
    }
}
