pub mod error;
pub mod event;
pub mod history;
pub mod navigation;
pub mod window;

pub use error::SextantNavigationError;
pub use event::{
    CursorMovedEvent, EventManager, KeyPressEvent, ModifiersState, MouseDownEvent, MouseUpEvent,
    MouseWheelEvent, NavigationEvent, UpdateStatus,
};
pub use history::ViewHistoryStack;
pub use navigation::{
    Cursor, DragConstraint, NavigationBackend, NavigationController, NavigationMode, NullBackend,
};
pub use window::{
    ElementState, Key, MouseButton, MouseScrollDelta, NamedKey, WindowCursorMoved, WindowEvent,
    WindowKeyboardInput, WindowMouseInput, WindowMouseWheel, WindowResizeEvent,
};
