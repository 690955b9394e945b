use serde::{Deserialize, Serialize};
use sextant_common::types::Point;

use crate::window::{
    ElementState, Key, MouseButton, MouseScrollDelta, NamedKey, WindowEvent, WindowKeyboardInput,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModifiersState {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
    pub meta: bool,
    /// Character key currently held down, if any
    pub key: Option<char>,
}

/// Input events in display coordinates (pixels, y up), as consumed by the navigation controller
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationEvent {
    MouseDown(MouseDownEvent),
    MouseUp(MouseUpEvent),
    CursorMoved(CursorMovedEvent),
    MouseWheel(MouseWheelEvent),
    KeyPress(KeyPressEvent),
}

impl NavigationEvent {
    pub fn position(&self) -> Point {
        match self {
            Self::MouseDown(e) => e.position,
            Self::MouseUp(e) => e.position,
            Self::CursorMoved(e) => e.position,
            Self::MouseWheel(e) => e.position,
            Self::KeyPress(e) => e.position,
        }
    }

    pub fn modifiers(&self) -> ModifiersState {
        match self {
            Self::MouseDown(e) => e.modifiers,
            Self::MouseUp(e) => e.modifiers,
            Self::CursorMoved(e) => e.modifiers,
            Self::MouseWheel(e) => e.modifiers,
            Self::KeyPress(e) => e.modifiers,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MouseDownEvent {
    pub position: Point,
    pub button: MouseButton,
    pub modifiers: ModifiersState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MouseUpEvent {
    pub position: Point,
    pub button: MouseButton,
    pub modifiers: ModifiersState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CursorMovedEvent {
    pub position: Point,
    pub modifiers: ModifiersState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MouseWheelEvent {
    pub position: Point,
    pub delta: MouseScrollDelta,
    pub modifiers: ModifiersState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyPressEvent {
    pub position: Point,
    pub key: Key,
    pub modifiers: ModifiersState,
}

/// What the host should do after an event was handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateStatus {
    /// View limits changed; the figure must be redrawn
    pub rerender: bool,
    /// The view history gained or moved to an entry
    pub history_changed: bool,
}

impl UpdateStatus {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn rerender() -> Self {
        Self {
            rerender: true,
            history_changed: false,
        }
    }

    pub fn with_history(mut self) -> Self {
        self.history_changed = true;
        self
    }

    pub fn merge(self, other: UpdateStatus) -> Self {
        Self {
            rerender: self.rerender || other.rerender,
            history_changed: self.history_changed || other.history_changed,
        }
    }
}

/// Turns raw window events into navigation events.
///
/// Tracks the cursor (window events carry no position on button or wheel input) and the
/// keyboard modifier state, and flips y from window to display coordinates.
#[derive(Debug, Clone)]
pub struct EventManager {
    canvas_height: f64,
    cursor: Option<Point>,
    modifiers: ModifiersState,
}

impl EventManager {
    pub fn new(canvas_height: f64) -> Self {
        Self {
            canvas_height,
            cursor: None,
            modifiers: ModifiersState::default(),
        }
    }

    pub fn modifiers(&self) -> ModifiersState {
        self.modifiers
    }

    /// Last known cursor position in display coordinates
    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    fn update_modifiers(&mut self, input: &WindowKeyboardInput) {
        let pressed = input.state == ElementState::Pressed;
        match input.key {
            Key::Named(NamedKey::Shift) => self.modifiers.shift = pressed,
            Key::Named(NamedKey::Control) => self.modifiers.control = pressed,
            Key::Named(NamedKey::Alt) => self.modifiers.alt = pressed,
            Key::Named(NamedKey::Super) => self.modifiers.meta = pressed,
            Key::Character(c) if pressed => self.modifiers.key = Some(c),
            Key::Character(c) if self.modifiers.key == Some(c) => self.modifiers.key = None,
            _ => {}
        }
    }

    fn to_display(&self, position: [f32; 2]) -> Point {
        Point::new(position[0] as f64, self.canvas_height - position[1] as f64)
    }

    pub fn dispatch_event(&mut self, event: &WindowEvent) -> Option<NavigationEvent> {
        if let WindowEvent::KeyboardInput(input) = event {
            self.update_modifiers(input);
        }
        if let Some(position) = event.position() {
            self.cursor = Some(self.to_display(position));
        }

        match event {
            WindowEvent::WindowResize(e) => {
                self.canvas_height = e.size[1] as f64;
                None
            }
            WindowEvent::CursorLeft => {
                self.cursor = None;
                None
            }
            WindowEvent::MouseInput(input) => {
                let position = self.cursor?;
                Some(match input.state {
                    ElementState::Pressed => NavigationEvent::MouseDown(MouseDownEvent {
                        position,
                        button: input.button,
                        modifiers: self.modifiers,
                    }),
                    ElementState::Released => NavigationEvent::MouseUp(MouseUpEvent {
                        position,
                        button: input.button,
                        modifiers: self.modifiers,
                    }),
                })
            }
            WindowEvent::CursorMoved(_) => Some(NavigationEvent::CursorMoved(CursorMovedEvent {
                position: self.cursor?,
                modifiers: self.modifiers,
            })),
            WindowEvent::MouseWheel(e) => Some(NavigationEvent::MouseWheel(MouseWheelEvent {
                position: self.cursor?,
                delta: e.delta,
                modifiers: self.modifiers,
            })),
            WindowEvent::KeyboardInput(e) if e.state == ElementState::Pressed => {
                Some(NavigationEvent::KeyPress(KeyPressEvent {
                    position: self.cursor?,
                    key: e.key,
                    modifiers: self.modifiers,
                }))
            }
            WindowEvent::KeyboardInput(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{WindowCursorMoved, WindowMouseInput, WindowMouseWheel, WindowResizeEvent};

    fn moved(x: f32, y: f32) -> WindowEvent {
        WindowEvent::CursorMoved(WindowCursorMoved { position: [x, y] })
    }

    fn key(key: Key, state: ElementState) -> WindowEvent {
        WindowEvent::KeyboardInput(WindowKeyboardInput { key, state })
    }

    #[test]
    fn test_flips_window_coordinates() {
        let mut manager = EventManager::new(400.0);
        let event = manager.dispatch_event(&moved(10.0, 100.0)).unwrap();
        assert_eq!(event.position(), Point::new(10.0, 300.0));

        manager.dispatch_event(&WindowEvent::WindowResize(WindowResizeEvent {
            size: [800.0, 600.0],
        }));
        let event = manager.dispatch_event(&moved(10.0, 100.0)).unwrap();
        assert_eq!(event.position(), Point::new(10.0, 500.0));
    }

    #[test]
    fn test_button_without_cursor_is_dropped() {
        let mut manager = EventManager::new(400.0);
        let press = WindowEvent::MouseInput(WindowMouseInput {
            state: ElementState::Pressed,
            button: MouseButton::Left,
        });
        assert_eq!(manager.dispatch_event(&press), None);

        manager.dispatch_event(&moved(5.0, 5.0));
        assert!(matches!(
            manager.dispatch_event(&press),
            Some(NavigationEvent::MouseDown(MouseDownEvent {
                button: MouseButton::Left,
                ..
            }))
        ));

        manager.dispatch_event(&WindowEvent::CursorLeft);
        let wheel = WindowEvent::MouseWheel(WindowMouseWheel {
            delta: MouseScrollDelta::LineDelta(0.0, 1.0),
        });
        assert_eq!(manager.dispatch_event(&wheel), None);
    }

    #[test]
    fn test_tracks_modifiers_and_held_key() {
        let mut manager = EventManager::new(400.0);
        manager.dispatch_event(&key(Key::Named(NamedKey::Control), ElementState::Pressed));
        manager.dispatch_event(&key(Key::Character('x'), ElementState::Pressed));
        let modifiers = manager.modifiers();
        assert!(modifiers.control);
        assert_eq!(modifiers.key, Some('x'));

        manager.dispatch_event(&key(Key::Character('y'), ElementState::Released));
        assert_eq!(manager.modifiers().key, Some('x'));
        manager.dispatch_event(&key(Key::Character('x'), ElementState::Released));
        manager.dispatch_event(&key(Key::Named(NamedKey::Control), ElementState::Released));
        assert_eq!(manager.modifiers(), ModifiersState::default());
    }

    #[test]
    fn test_update_status_merge() {
        let status = UpdateStatus::none().merge(UpdateStatus::rerender().with_history());
        assert!(status.rerender && status.history_changed);
        assert_eq!(UpdateStatus::none().merge(UpdateStatus::none()), UpdateStatus::none());
    }
}
