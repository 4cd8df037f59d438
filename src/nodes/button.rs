//! Push button with an optional action
//!
//! The visual state follows the pointer: hovering darkens the fill, a primary
//! press inside arms the button, and releasing inside invokes the action.
//! Releasing outside disarms without invoking. A button bound to a variable
//! instead shows the pressed colour whenever that variable is non-zero.

use super::Binding;
use crate::action::Action;
use crate::render::{InputEvent, PointerButton, Surface, TextAnchor};
use crate::store::VariableStore;
use crate::types::{Color, Outline, Rect};

const HOVER_DARKEN: u8 = 30;
const PRESSED_DARKEN: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Normal,
    Hovered,
    Pressed,
}

#[derive(Debug)]
pub struct Button {
    name: String,
    rect: Rect,
    label: String,
    font_size: f32,
    normal: Color,
    hover: Color,
    pressed: Color,
    text_color: Color,
    state: ButtonState,
    /// Whether the bound variable is currently non-zero
    latched: bool,
    action: Option<Action>,
    binding: Option<Binding>,
}

impl Button {
    pub fn new(
        name: impl Into<String>,
        rect: Rect,
        label: impl Into<String>,
        font_size: f32,
        color: Color,
        text_color: Color,
        binding: Option<Binding>,
    ) -> Self {
        Self {
            name: name.into(),
            rect,
            label: label.into(),
            font_size,
            normal: color,
            hover: color.darken(HOVER_DARKEN),
            pressed: color.darken(PRESSED_DARKEN),
            text_color,
            state: ButtonState::Normal,
            latched: false,
            action: None,
            binding,
        }
    }

    pub fn set_action(&mut self, action: Action) {
        self.action = Some(action);
    }

    pub fn with_action(mut self, action: Option<Action>) -> Self {
        self.action = action;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Current fill colour
    pub fn fill(&self) -> Color {
        if self.binding.is_some() {
            return if self.latched { self.pressed } else { self.normal };
        }
        match self.state {
            ButtonState::Normal => self.normal,
            ButtonState::Hovered => self.hover,
            ButtonState::Pressed => self.pressed,
        }
    }

    pub(crate) fn refresh(&mut self, store: &VariableStore) {
        if let Some(binding) = &self.binding {
            self.latched = store.get(binding.variable()) != 0.0;
        }
    }

    pub(crate) fn handle_event(&mut self, event: &InputEvent, store: &VariableStore) {
        match event {
            InputEvent::PointerMoved(pos) => {
                if self.state != ButtonState::Pressed {
                    self.state = if self.rect.contains(*pos) {
                        ButtonState::Hovered
                    } else {
                        ButtonState::Normal
                    };
                }
            }
            InputEvent::PointerPressed {
                pos,
                button: PointerButton::Primary,
            } if self.rect.contains(*pos) => {
                self.state = ButtonState::Pressed;
            }
            InputEvent::PointerReleased {
                pos,
                button: PointerButton::Primary,
            } if self.state == ButtonState::Pressed => {
                self.state = ButtonState::Normal;
                if self.rect.contains(*pos) {
                    self.click(store);
                }
            }
            _ => {}
        }
    }

    fn click(&mut self, store: &VariableStore) {
        if let Some(action) = &mut self.action {
            action.invoke(store);
        }
        tracing::info!("Button '{}' clicked", self.name);
    }

    pub(crate) fn draw(&self, surface: &mut dyn Surface) {
        surface.fill_rect(self.rect, self.fill(), Some(Outline::new(1.0, Color::BLACK)));
        if !self.label.is_empty() {
            surface.draw_text(
                self.rect.center(),
                &self.label,
                self.font_size,
                self.text_color,
                TextAnchor::Center,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TEMPERATURE_VARIABLE;
    use crate::types::Point;

    const GREY: Color = Color::rgb(200, 200, 200);

    fn at(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    fn press(pos: Point) -> InputEvent {
        InputEvent::PointerPressed {
            pos,
            button: PointerButton::Primary,
        }
    }

    fn release(pos: Point) -> InputEvent {
        InputEvent::PointerReleased {
            pos,
            button: PointerButton::Primary,
        }
    }

    fn plus_button() -> Button {
        Button::new(
            "plus",
            Rect::new(10.0, 10.0, 100.0, 40.0),
            "+",
            16.0,
            GREY,
            Color::BLACK,
            None,
        )
        .with_action(Action::parse("increase_temp").unwrap())
    }

    #[test]
    fn test_hover_and_press_colours() {
        let store = VariableStore::new();
        let mut button = plus_button();
        assert_eq!(button.fill(), GREY);

        button.handle_event(&InputEvent::PointerMoved(at(20.0, 20.0)), &store);
        assert_eq!(button.state(), ButtonState::Hovered);
        assert_eq!(button.fill(), Color::rgb(170, 170, 170));

        button.handle_event(&press(at(20.0, 20.0)), &store);
        assert_eq!(button.fill(), Color::rgb(150, 150, 150));
    }

    #[test]
    fn test_release_inside_invokes_once() {
        let store = VariableStore::new();
        store.set(TEMPERATURE_VARIABLE, 20.0);
        let mut button = plus_button();

        button.handle_event(&press(at(20.0, 20.0)), &store);
        button.handle_event(&release(at(25.0, 25.0)), &store);
        button.handle_event(&release(at(25.0, 25.0)), &store);

        assert_eq!(store.get(TEMPERATURE_VARIABLE), 21.0);
        assert_eq!(button.state(), ButtonState::Normal);
    }

    #[test]
    fn test_release_outside_cancels() {
        let store = VariableStore::new();
        store.set(TEMPERATURE_VARIABLE, 20.0);
        let mut button = plus_button();

        button.handle_event(&press(at(20.0, 20.0)), &store);
        button.handle_event(&InputEvent::PointerMoved(at(500.0, 500.0)), &store);
        assert_eq!(button.state(), ButtonState::Pressed);
        button.handle_event(&release(at(500.0, 500.0)), &store);

        assert_eq!(store.get(TEMPERATURE_VARIABLE), 20.0);
        assert_eq!(button.state(), ButtonState::Normal);
    }

    #[test]
    fn test_press_outside_does_not_arm() {
        let store = VariableStore::new();
        let mut button = plus_button();
        button.handle_event(&press(at(0.0, 0.0)), &store);
        button.handle_event(&release(at(20.0, 20.0)), &store);
        assert_eq!(store.get(TEMPERATURE_VARIABLE), 0.0);
    }

    #[test]
    fn test_secondary_button_is_ignored() {
        let store = VariableStore::new();
        let mut button = plus_button();
        button.handle_event(
            &InputEvent::PointerPressed {
                pos: at(20.0, 20.0),
                button: PointerButton::Secondary,
            },
            &store,
        );
        assert_eq!(button.state(), ButtonState::Normal);
    }

    #[test]
    fn test_inert_button_still_clicks() {
        let store = VariableStore::new();
        let mut button = plus_button().with_action(None);
        button.handle_event(&press(at(20.0, 20.0)), &store);
        button.handle_event(&release(at(20.0, 20.0)), &store);
        assert!(store.is_empty());
    }

    #[test]
    fn test_bound_button_shows_value() {
        let store = VariableStore::shared();
        let mut button = Button::new(
            "pump",
            Rect::new(0.0, 0.0, 50.0, 20.0),
            "Pump",
            16.0,
            GREY,
            Color::BLACK,
            Binding::new(&store, "pump_on"),
        );
        button.refresh(&store);
        assert_eq!(button.fill(), GREY);

        store.set("pump_on", 1.0);
        button.refresh(&store);
        assert_eq!(button.fill(), Color::rgb(150, 150, 150));
    }
}
