use egui::{Context, PointerButton, Pos2, Rect};

mod capture;
mod long_press;

pub use capture::{CaptureError, PointerCapture};
pub use long_press::{LongPressTimer, DEFAULT_LONG_PRESS};

/// Represents the location where an input event occurred
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    /// The position in screen coordinates
    pub position: Pos2,
    /// Whether this position is inside the palette widget
    pub in_widget: bool,
}

/// Pointer events as the palette sees them
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse button was pressed
    PointerDown {
        location: InputLocation,
        button: PointerButton,
    },
    /// Mouse button was released
    PointerUp {
        location: InputLocation,
        button: PointerButton,
    },
    /// Mouse moved (with or without buttons pressed)
    PointerMove { location: InputLocation },
    /// Mouse left the palette widget
    PointerLeave { last_known_location: InputLocation },
}

/// Handles converting raw egui input into palette InputEvents
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    was_in_widget: bool,
    widget_rect: Option<Rect>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the widget rectangle (the strip may resize between frames)
    pub fn set_widget_rect(&mut self, rect: Rect) {
        self.widget_rect = Some(rect);
    }

    /// Forget the pointer history, keeping the widget rectangle.
    pub fn reset(&mut self) {
        self.last_pointer_pos = None;
        self.was_in_widget = false;
    }

    fn make_location(&self, pos: Pos2) -> InputLocation {
        InputLocation {
            position: pos,
            in_widget: self.widget_rect.is_some_and(|rect| rect.contains(pos)),
        }
    }

    /// Process raw egui input and generate InputEvents.
    ///
    /// While `captured` is set every pointer event is reported regardless of where it lands,
    /// otherwise only events over the widget are (plus the leave that ends a hover).
    pub fn process_input(&mut self, ctx: &Context, captured: bool) -> Vec<InputEvent> {
        let mut events = Vec::new();

        ctx.input(|input| {
            let hover = input.pointer.hover_pos();
            let location = hover.map(|pos| self.make_location(pos));

            match location {
                Some(location) if location.in_widget || captured => {
                    if Some(location.position) != self.last_pointer_pos || !self.was_in_widget {
                        events.push(InputEvent::PointerMove { location });
                    }
                }
                _ => {
                    if self.was_in_widget {
                        let last = self.last_pointer_pos.unwrap_or_default();
                        events.push(InputEvent::PointerLeave {
                            last_known_location: self.make_location(last),
                        });
                    }
                }
            }

            // Releases may land outside the window; fall back to the last known position.
            let release_pos = input.pointer.latest_pos().or(self.last_pointer_pos);

            for button in [
                PointerButton::Primary,
                PointerButton::Secondary,
                PointerButton::Middle,
            ] {
                if input.pointer.button_pressed(button) {
                    if let Some(location) = location.filter(|l| l.in_widget || captured) {
                        events.push(InputEvent::PointerDown { location, button });
                    }
                }
                if input.pointer.button_released(button) {
                    if let Some(pos) = release_pos {
                        events.push(InputEvent::PointerUp {
                            location: self.make_location(pos),
                            button,
                        });
                    }
                }
            }

            self.was_in_widget = location.is_some_and(|l| l.in_widget || captured);
            if let Some(pos) = hover {
                self.last_pointer_pos = Some(pos);
            }
        });

        events
    }
}
