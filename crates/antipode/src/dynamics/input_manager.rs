use cgmath::{InnerSpace, Point2};
use serde::{Deserialize, Serialize};

use crate::dynamics::OrbitControls;

/// Pointer travel (px) below which a press/release pair counts as a click.
pub const CLICK_SLOP_PX: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Count = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    MouseMoved(f64, f64),
    MouseScrolled(f64),
    MouseButtonPressed(MouseButton),
    MouseButtonReleased(MouseButton),
    /// Pointer left the surface or focus was lost; drop any drag in progress.
    PointerCancel,
}

/// What the visualizer should do in response to an input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    Click(Point2<f64>),
}

#[derive(Debug)]
pub struct InputState {
    pub mouse_button_states: [bool; MouseButton::Count as usize],
    pub mouse_position: Point2<f64>,
    pub position_on_press: [Point2<f64>; MouseButton::Count as usize],
    dragged: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            mouse_button_states: [false; MouseButton::Count as usize],
            mouse_position: Point2::new(0.0, 0.0),
            position_on_press: [Point2::new(0.0, 0.0); MouseButton::Count as usize],
            dragged: false,
        }
    }

    pub fn reset(&mut self) {
        *self = InputState::new();
    }

    /// Feeds one event. Orbit/zoom go to `controls` (which ignore them while
    /// disabled); a left click without drag comes back as a `PointerAction`.
    pub fn queue_event(
        &mut self,
        controls: &mut OrbitControls,
        event: InputEvent,
    ) -> Option<PointerAction> {
        match event {
            InputEvent::MouseMoved(x, y) => {
                let last = self.mouse_position;
                self.mouse_position = Point2::new(x, y);

                if self.mouse_button_states[MouseButton::Left as usize] {
                    let press = self.position_on_press[MouseButton::Left as usize];
                    if (self.mouse_position - press).magnitude() > CLICK_SLOP_PX {
                        self.dragged = true;
                    }
                    controls.rotate(x - last.x, y - last.y);
                }
                None
            }

            InputEvent::MouseScrolled(delta) => {
                controls.zoom(delta);
                None
            }

            InputEvent::MouseButtonPressed(button) => {
                if button == MouseButton::Count {
                    return None;
                }
                self.mouse_button_states[button as usize] = true;
                self.position_on_press[button as usize] = self.mouse_position;
                if button == MouseButton::Left {
                    self.dragged = false;
                }
                None
            }

            InputEvent::MouseButtonReleased(button) => {
                if button == MouseButton::Count {
                    return None;
                }
                let was_down = self.mouse_button_states[button as usize];
                self.mouse_button_states[button as usize] = false;

                if button == MouseButton::Left && was_down && !self.dragged {
                    Some(PointerAction::Click(self.mouse_position))
                } else {
                    None
                }
            }

            InputEvent::PointerCancel => {
                self.reset();
                controls.stop();
                None
            }
        }
    }
}
