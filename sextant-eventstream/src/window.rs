/// Native window events, in logical coordinates with y pointing down
#[derive(Debug, Clone, PartialEq)]
pub enum WindowEvent {
    WindowResize(WindowResizeEvent),
    MouseInput(WindowMouseInput),
    CursorMoved(WindowCursorMoved),
    CursorLeft,
    MouseWheel(WindowMouseWheel),
    KeyboardInput(WindowKeyboardInput),
}

impl WindowEvent {
    pub fn position(&self) -> Option<[f32; 2]> {
        match self {
            Self::CursorMoved(event) => Some(event.position),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowResizeEvent {
    pub size: [f32; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowMouseInput {
    pub state: ElementState,
    pub button: MouseButton,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowCursorMoved {
    pub position: [f32; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowMouseWheel {
    pub delta: MouseScrollDelta,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowKeyboardInput {
    pub key: Key,
    pub state: ElementState,
}

#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy)]
pub enum Key {
    Named(NamedKey),
    Character(char),
}

/// Keys the navigation layer reacts to
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy)]
pub enum NamedKey {
    Escape,
    Home,
    ArrowLeft,
    ArrowRight,
    // Modifiers
    Alt,
    Control,
    Shift,
    Super,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementState {
    Pressed,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MouseScrollDelta {
    LineDelta(f32, f32),
    PixelDelta(f64, f64),
}

/// Pixels treated as one wheel notch for high resolution scroll devices
pub const PIXELS_PER_LINE: f64 = 40.0;

impl MouseScrollDelta {
    /// Vertical scroll in notches, positive away from the user
    pub fn vertical_steps(&self) -> f64 {
        match *self {
            MouseScrollDelta::LineDelta(_, y) => y as f64,
            MouseScrollDelta::PixelDelta(_, y) => y / PIXELS_PER_LINE,
        }
    }
}
