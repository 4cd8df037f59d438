//! The built-in demonstration panel
//!
//! Used when no scene document exists (it is written out so it can be
//! edited) and when a document cannot be used at all.

use super::loader::{
    ButtonDescriptor, CommonFields, HistoryGraphDescriptor, ImageDescriptor, InputFieldDescriptor,
    LineDescriptor, NodeDescriptor, RectangleDescriptor, SceneDocument, TextDescriptor,
};
use crate::error::{Result, ResultExt};
use crate::nodes::Condition;
use crate::store::{
    PRESSURE_VARIABLE, SETPOINT_VARIABLE, STATUS_VARIABLE, TEMPERATURE_HISTORY,
    TEMPERATURE_VARIABLE,
};
use crate::types::Color;
use std::path::Path;

/// Status panel colours for status values 0..=9 (4 has no rule)
const STATUS_COLORS: [(f64, Color); 9] = [
    (0.0, Color::rgb(124, 36, 179)),
    (1.0, Color::rgb(199, 24, 88)),
    (2.0, Color::rgb(72, 146, 163)),
    (3.0, Color::rgb(176, 12, 160)),
    (5.0, Color::rgb(176, 80, 12)),
    (6.0, Color::rgb(22, 219, 219)),
    (7.0, Color::rgb(255, 0, 255)),
    (8.0, Color::rgb(0, 0, 0)),
    (9.0, Color::rgb(255, 0, 0)),
];

fn value_text(name: &str, x: f32, y: f32, size: f32, variable: &str, label: &str) -> NodeDescriptor {
    NodeDescriptor::Text(TextDescriptor {
        common: CommonFields::named(name, x, y).bound(variable),
        content: format!("{}: ", label),
        font_size: size,
        color: Color::WHITE,
        format: format!("{}: %f", label),
    })
}

fn separator(index: u32, y: f32) -> NodeDescriptor {
    NodeDescriptor::Line(LineDescriptor {
        common: CommonFields::named(&format!("Separator Line {}", index), 0.0, y),
        x2: 1024.0,
        y2: y,
        color: Color::WHITE,
    })
}

#[allow(clippy::too_many_arguments)]
fn button(
    name: &str,
    x: f32,
    y: f32,
    size: (f32, f32),
    text: &str,
    font_size: f32,
    color: Color,
    text_color: Color,
    action: &str,
) -> NodeDescriptor {
    NodeDescriptor::Button(ButtonDescriptor {
        common: CommonFields::named(name, x, y),
        width: size.0,
        height: size.1,
        text: text.to_string(),
        font_size,
        color,
        text_color,
        action: Some(action.to_string()),
    })
}

fn title(name: &str, x: f32, y: f32, content: &str, size: f32, color: Color) -> NodeDescriptor {
    NodeDescriptor::Text(TextDescriptor {
        common: CommonFields::named(name, x, y),
        content: content.to_string(),
        font_size: size,
        color,
        format: String::new(),
    })
}

/// The 19-element demonstration panel
pub fn default_scene_document() -> SceneDocument {
    let status_panel = NodeDescriptor::Rectangle(RectangleDescriptor {
        common: CommonFields::named("Status Panel", 20.0, 50.0).bound(STATUS_VARIABLE),
        width: 500.0,
        height: 200.0,
        color: Color::rgb(173, 216, 230),
        conditions: STATUS_COLORS
            .iter()
            .map(|&(value, color)| Condition { value, color })
            .collect(),
    });

    let setpoint_input = NodeDescriptor::InputField(InputFieldDescriptor {
        common: CommonFields::named("Setpoint Input", 40.0, 200.0).bound(SETPOINT_VARIABLE),
        width: 200.0,
        height: 40.0,
        font_size: 23.0,
    });

    let graph_panel = NodeDescriptor::Rectangle(RectangleDescriptor {
        common: CommonFields::named("Graph Panel", 20.0, 350.0),
        width: 400.0,
        height: 200.0,
        color: Color::BLACK,
        conditions: Vec::new(),
    });

    let graph = NodeDescriptor::HistoryGraph(HistoryGraphDescriptor {
        common: CommonFields::named("Temperature Graph", 20.0, 350.0).bound(TEMPERATURE_HISTORY),
        width: 400.0,
        height: 200.0,
        max_history: 50,
        line_color: Color::rgb(0, 255, 26),
        grid_color: Color::rgba(200, 200, 200, 100),
    });

    let logo = NodeDescriptor::Image(ImageDescriptor {
        common: CommonFields::named("Logo Image", 720.0, 330.0),
        width: 175.0,
        height: 218.5,
        path: "assets/images/logo.png".to_string(),
    });

    let white = Color::WHITE;
    SceneDocument {
        objects: vec![
            status_panel,
            value_text("Temperature Text", 75.0, 70.0, 40.0, TEMPERATURE_VARIABLE, "Temperature"),
            value_text("Pressure Text", 150.0, 125.0, 25.0, PRESSURE_VARIABLE, "Pressure"),
            value_text("Setpoint Text", 170.0, 160.0, 20.0, SETPOINT_VARIABLE, "Setpoint"),
            setpoint_input,
            button(
                "Apply Button",
                250.0,
                200.0,
                (100.0, 40.0),
                "Apply",
                23.0,
                Color::rgb(45, 15, 127),
                white,
                "apply",
            ),
            separator(1, 280.0),
            separator(2, 285.0),
            separator(3, 290.0),
            graph_panel,
            graph,
            logo,
            button(
                "Change Color",
                450.0,
                360.0,
                (180.0, 50.0),
                "Change Color",
                28.0,
                Color::rgb(231, 214, 191),
                Color::rgb(10, 35, 79),
                "change_color",
            ),
            button(
                "Temp Increase",
                450.0,
                420.0,
                (80.0, 30.0),
                "Temp +",
                22.0,
                Color::rgb(217, 72, 28),
                white,
                "increase_temp",
            ),
            button(
                "Temp Decrease",
                540.0,
                420.0,
                (80.0, 30.0),
                "Temp -",
                22.0,
                Color::rgb(0, 178, 232),
                white,
                "decrease_temp",
            ),
            button(
                "Pressure Increase",
                450.0,
                470.0,
                (80.0, 30.0),
                "Press +",
                14.0,
                Color::rgb(143, 0, 232),
                white,
                "increase_pressure",
            ),
            button(
                "Pressure Decrease",
                540.0,
                470.0,
                (80.0, 30.0),
                "Press -",
                14.0,
                Color::rgb(179, 73, 245),
                white,
                "decrease_pressure",
            ),
            title(
                "System Title",
                550.0,
                20.0,
                "XSmall HMI Player",
                60.0,
                Color::rgb(249, 250, 197),
            ),
            title("System Subtitle", 650.0, 90.0, "SCADA System", 40.0, white),
        ],
    }
}

/// Write the default scene document to `path`
pub fn write_default_scene(path: &Path) -> Result<()> {
    let json = default_scene_document().to_json()?;
    std::fs::write(path, json)
        .with_context(|| format!("Cannot create default scene document {}", path.display()))?;
    tracing::info!("Created default scene document in {:?}", path);
    Ok(())
}
