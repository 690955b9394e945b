use float_cmp::approx_eq;
use rstest::rstest;
use sextant_common::canvas::CanvasDimensions;
use sextant_common::config::StyleConfig;
use sextant_common::types::Point;
use sextant_eventstream::{
    Cursor, CursorMovedEvent, ElementState, EventManager, Key, ModifiersState, MouseButton,
    MouseDownEvent, MouseScrollDelta, MouseUpEvent, MouseWheelEvent, NavigationBackend,
    NavigationController, NavigationEvent, NavigationMode, UpdateStatus, WindowCursorMoved, WindowEvent,
    WindowKeyboardInput, WindowMouseInput,
};
use sextant_guides::{Figure, Limits};
use sextant_scales::scale::ScaleType;

#[derive(Debug, Default)]
struct RecordingBackend {
    messages: Vec<String>,
    cursors: Vec<Cursor>,
    rubberbands: Vec<(Point, Point)>,
    cleared: usize,
    dynamic_updates: usize,
}

impl NavigationBackend for RecordingBackend {
    fn draw_rubberband(&mut self, from: Point, to: Point) {
        self.rubberbands.push((from, to));
    }

    fn clear_rubberband(&mut self) {
        self.cleared += 1;
    }

    fn set_message(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursors.push(cursor);
    }

    fn dynamic_update(&mut self) {
        self.dynamic_updates += 1;
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// One axes with bbox (60, 40)-(540, 360): 48 px per x unit and 32 px per y unit on (0, 10)
fn figure() -> Figure {
    let mut fig = Figure::new(
        CanvasDimensions {
            size: [600.0, 400.0],
            dpi: 72.0,
        },
        StyleConfig::default(),
    )
    .unwrap();
    let index = fig.add_axes([0.1, 0.1, 0.8, 0.8]);
    let axes = fig.get_mut(index).unwrap();
    axes.set_xlim(0.0, 10.0).unwrap();
    axes.set_ylim(0.0, 10.0).unwrap();
    fig
}

fn controller() -> NavigationController<RecordingBackend> {
    init_tracing();
    NavigationController::new(RecordingBackend::default())
}

fn down(x: f64, y: f64, button: MouseButton) -> NavigationEvent {
    NavigationEvent::MouseDown(MouseDownEvent {
        position: Point::new(x, y),
        button,
        modifiers: ModifiersState::default(),
    })
}

fn moved(x: f64, y: f64, modifiers: ModifiersState) -> NavigationEvent {
    NavigationEvent::CursorMoved(CursorMovedEvent {
        position: Point::new(x, y),
        modifiers,
    })
}

fn up(x: f64, y: f64, button: MouseButton) -> NavigationEvent {
    NavigationEvent::MouseUp(MouseUpEvent {
        position: Point::new(x, y),
        button,
        modifiers: ModifiersState::default(),
    })
}

fn assert_limits(actual: Limits, x: (f64, f64), y: (f64, f64)) {
    let close = |a: f64, b: f64| approx_eq!(f64, a, b, epsilon = 1e-9);
    assert!(
        close(actual.x.0, x.0) && close(actual.x.1, x.1) && close(actual.y.0, y.0) && close(actual.y.1, y.1),
        "{actual:?} != x: {x:?}, y: {y:?}"
    );
}

#[test]
fn test_pan_drag_subtracts_data_delta() {
    let mut fig = figure();
    let mut nav = controller();
    nav.pan();
    assert_eq!(nav.mode(), NavigationMode::Pan);

    let status = nav.handle(&mut fig, &down(300.0, 200.0, MouseButton::Left)).unwrap();
    assert!(status.history_changed);
    assert!(nav.is_armed());

    // +2 data units in x
    let status = nav
        .handle(&mut fig, &moved(396.0, 200.0, ModifiersState::default()))
        .unwrap();
    assert!(status.rerender);
    assert_limits(fig.get(0).unwrap().limits(), (-2.0, 8.0), (0.0, 10.0));
    assert_eq!(nav.backend().dynamic_updates, 1);

    // The delta is measured from the press, not from the previous move
    nav.handle(&mut fig, &moved(396.0, 232.0, ModifiersState::default()))
        .unwrap();
    assert_limits(fig.get(0).unwrap().limits(), (-2.0, 8.0), (-1.0, 9.0));

    let status = nav.handle(&mut fig, &up(396.0, 232.0, MouseButton::Left)).unwrap();
    assert!(status.rerender && status.history_changed);
    assert!(!nav.is_armed());
    assert_eq!(nav.views().len(), 2);
}

#[rstest]
#[case('x', (-2.0, 8.0), (0.0, 10.0))]
#[case('y', (0.0, 10.0), (-1.0, 9.0))]
fn test_pan_axis_lock(#[case] key: char, #[case] x: (f64, f64), #[case] y: (f64, f64)) {
    let mut fig = figure();
    let mut nav = controller();
    nav.pan();
    nav.handle(&mut fig, &down(300.0, 200.0, MouseButton::Left)).unwrap();
    let modifiers = ModifiersState {
        key: Some(key),
        ..Default::default()
    };
    nav.handle(&mut fig, &moved(396.0, 232.0, modifiers)).unwrap();
    assert_limits(fig.get(0).unwrap().limits(), x, y);
}

#[test]
fn test_pan_log_axis_is_multiplicative() {
    let mut fig = figure();
    {
        let axes = fig.get_mut(0).unwrap();
        axes.set_xlim(1.0, 1000.0).unwrap();
        axes.set_xscale(ScaleType::Log).unwrap();
    }
    let mut nav = controller();
    nav.pan();
    // x = 10 sits at 60 + 480 / 3 = 220, x = 100 at 380
    nav.handle(&mut fig, &down(220.0, 200.0, MouseButton::Left)).unwrap();
    nav.handle(&mut fig, &moved(380.0, 200.0, ModifiersState::default()))
        .unwrap();
    let limits = fig.get(0).unwrap().limits();
    assert!(approx_eq!(f64, limits.x.0, 0.1, epsilon = 1e-9));
    assert!(approx_eq!(f64, limits.x.1, 100.0, epsilon = 1e-9));
}

#[test]
fn test_right_drag_rescales_from_press_limits() {
    let mut fig = figure();
    let mut nav = controller();
    nav.pan();
    nav.handle(&mut fig, &down(300.0, 200.0, MouseButton::Right)).unwrap();

    // Dragging left by the full axes width zooms out tenfold around the anchor (5, 5)
    nav.handle(&mut fig, &moved(-180.0, 200.0, ModifiersState::default()))
        .unwrap();
    assert_limits(fig.get(0).unwrap().limits(), (-45.0, 55.0), (0.0, 10.0));

    // Back to the anchor restores the press-time limits
    nav.handle(&mut fig, &moved(300.0, 200.0, ModifiersState::default()))
        .unwrap();
    assert_limits(fig.get(0).unwrap().limits(), (0.0, 10.0), (0.0, 10.0));
}

#[test]
fn test_rect_zoom() {
    let mut fig = figure();
    let mut nav = controller();
    nav.zoom();
    nav.handle(&mut fig, &down(108.0, 72.0, MouseButton::Left)).unwrap();
    nav.handle(&mut fig, &moved(252.0, 168.0, ModifiersState::default()))
        .unwrap();
    assert_eq!(
        nav.backend().rubberbands,
        vec![(Point::new(108.0, 72.0), Point::new(252.0, 168.0))]
    );
    // Limits only change on release
    assert_limits(fig.get(0).unwrap().limits(), (0.0, 10.0), (0.0, 10.0));

    let status = nav.handle(&mut fig, &up(252.0, 168.0, MouseButton::Left)).unwrap();
    assert!(status.rerender && status.history_changed);
    assert_limits(fig.get(0).unwrap().limits(), (1.0, 4.0), (1.0, 4.0));
    assert_eq!(nav.views().len(), 2);
    assert!(nav.backend().cleared > 0);
}

#[rstest]
#[case(Point::new(302.0, 300.0))]
#[case(Point::new(400.0, 203.0))]
#[case(Point::new(580.0, 390.0))]
fn test_rect_zoom_click_is_noop(#[case] release: Point) {
    let mut fig = figure();
    let mut nav = controller();
    nav.zoom();
    nav.handle(&mut fig, &down(300.0, 200.0, MouseButton::Left)).unwrap();
    assert_eq!(nav.views().len(), 1);

    let status = nav
        .handle(&mut fig, &up(release.x, release.y, MouseButton::Left))
        .unwrap();
    assert!(!status.history_changed);
    assert!(!nav.is_armed());
    assert_limits(fig.get(0).unwrap().limits(), (0.0, 10.0), (0.0, 10.0));
    assert_eq!(nav.views().len(), 1);
}

#[test]
fn test_right_zoom_click_restores_live_rescale() {
    let mut fig = figure();
    let mut nav = controller();
    nav.zoom();
    nav.handle(&mut fig, &down(300.0, 200.0, MouseButton::Right)).unwrap();
    nav.handle(&mut fig, &moved(540.0, 202.0, ModifiersState::default()))
        .unwrap();
    assert!(fig.get(0).unwrap().limits().x != (0.0, 10.0));

    nav.handle(&mut fig, &up(540.0, 202.0, MouseButton::Right)).unwrap();
    assert_limits(fig.get(0).unwrap().limits(), (0.0, 10.0), (0.0, 10.0));
    assert_eq!(nav.views().len(), 1);
}

#[test]
fn test_right_zoom_release_keeps_axis_lock() {
    let mut fig = figure();
    let mut nav = controller();
    nav.zoom();
    let x_held = ModifiersState {
        key: Some('x'),
        ..Default::default()
    };
    nav.handle(&mut fig, &down(300.0, 200.0, MouseButton::Right)).unwrap();
    nav.handle(&mut fig, &moved(400.0, 250.0, x_held)).unwrap();
    let live = fig.get(0).unwrap().limits();
    assert_limits(live, live.x, (0.0, 10.0));

    let status = nav
        .handle(
            &mut fig,
            &NavigationEvent::MouseUp(MouseUpEvent {
                position: Point::new(400.0, 250.0),
                button: MouseButton::Right,
                modifiers: x_held,
            }),
        )
        .unwrap();
    assert!(status.history_changed);
    // anchor x = 5, factor 10^(-100 / 480)
    let alpha = 10f64.powf(-100.0 / 480.0);
    assert_limits(
        fig.get(0).unwrap().limits(),
        (5.0 - 5.0 * alpha, 5.0 + 5.0 * alpha),
        (0.0, 10.0),
    );
    assert_limits(fig.get(0).unwrap().limits(), live.x, live.y);
}

#[test]
fn test_press_and_release_without_axes() {
    let mut fig = figure();
    let mut nav = controller();
    nav.pan();
    nav.handle(&mut fig, &down(10.0, 10.0, MouseButton::Left)).unwrap();
    assert!(!nav.is_armed());

    // A release without a matching press changes nothing
    let status = nav.handle(&mut fig, &up(300.0, 200.0, MouseButton::Left)).unwrap();
    assert_eq!(status, UpdateStatus::none());
    assert_eq!(nav.views().len(), 1);

    // Middle button presses are ignored entirely
    nav.handle(&mut fig, &down(300.0, 200.0, MouseButton::Middle)).unwrap();
    assert!(!nav.is_armed());
}

#[test]
fn test_modes_are_exclusive() {
    let mut nav = controller();
    nav.pan();
    nav.zoom();
    assert_eq!(nav.mode(), NavigationMode::Zoom);
    nav.zoom();
    assert_eq!(nav.mode(), NavigationMode::None);
    assert_eq!(
        nav.backend().messages,
        vec!["pan/zoom mode", "zoom rect mode", ""]
    );

    let mut fig = figure();
    nav.handle(&mut fig, &down(300.0, 200.0, MouseButton::Left)).unwrap();
    assert!(!nav.is_armed());
    assert!(nav.views().is_empty());
}

#[test]
fn test_history_back_and_home() {
    let mut fig = figure();
    let mut nav = controller();
    let snapshots = [(0.0, 10.0), (2.0, 4.0), (5.0, 6.0), (-1.0, 1.0)];
    for x in snapshots {
        fig.get_mut(0).unwrap().set_xlim(x.0, x.1).unwrap();
        nav.push_current(&fig);
    }

    for _ in 0..snapshots.len() - 1 {
        nav.back(&mut fig).unwrap();
    }
    assert_eq!(nav.views().position(), Some(0));
    assert_eq!(fig.get(0).unwrap().xlim(), (0.0, 10.0));

    let status = nav.home(&mut fig).unwrap();
    assert!(status.rerender);
    assert_eq!(nav.views().position(), Some(0));
    assert_eq!(fig.get(0).unwrap().xlim(), (0.0, 10.0));

    nav.forward(&mut fig).unwrap();
    assert_eq!(fig.get(0).unwrap().xlim(), (2.0, 4.0));

    nav.update();
    assert!(nav.views().is_empty());
    assert_eq!(nav.back(&mut fig).unwrap(), UpdateStatus::none());
}

#[test]
fn test_scroll_zooms_around_cursor() {
    let mut fig = figure();
    let mut nav = controller();
    let event = NavigationEvent::MouseWheel(MouseWheelEvent {
        position: Point::new(60.0, 40.0),
        delta: MouseScrollDelta::LineDelta(0.0, 1.0),
        modifiers: ModifiersState::default(),
    });
    let status = nav.handle(&mut fig, &event).unwrap();
    assert!(status.rerender && status.history_changed);
    assert_limits(
        fig.get(0).unwrap().limits(),
        (0.0, 10.0 / 1.1),
        (0.0, 10.0 / 1.1),
    );
    assert_eq!(nav.views().len(), 2);

    nav.back(&mut fig).unwrap();
    assert_limits(fig.get(0).unwrap().limits(), (0.0, 10.0), (0.0, 10.0));
}

#[test]
fn test_status_message_and_cursor() {
    let mut fig = figure();
    let mut nav = controller();
    nav.pan();
    nav.handle(&mut fig, &moved(300.0, 200.0, ModifiersState::default()))
        .unwrap();
    nav.handle(&mut fig, &moved(10.0, 10.0, ModifiersState::default()))
        .unwrap();
    let backend = nav.backend();
    assert_eq!(
        backend.messages,
        vec!["pan/zoom mode", "pan/zoom mode : x=5, y=5", "pan/zoom mode"]
    );
    assert_eq!(backend.cursors, vec![Cursor::Move, Cursor::Pointer]);
}

#[test]
fn test_window_events_drive_pan() {
    let mut fig = figure();
    let mut nav = controller();
    let mut manager = EventManager::new(400.0);
    nav.pan();

    let window_events = [
        WindowEvent::CursorMoved(WindowCursorMoved {
            position: [300.0, 200.0],
        }),
        WindowEvent::MouseInput(WindowMouseInput {
            state: ElementState::Pressed,
            button: MouseButton::Left,
        }),
        WindowEvent::KeyboardInput(WindowKeyboardInput {
            key: Key::Character('x'),
            state: ElementState::Pressed,
        }),
        // Window y grows downward, so this also moves the cursor down in display space
        WindowEvent::CursorMoved(WindowCursorMoved {
            position: [396.0, 264.0],
        }),
        WindowEvent::MouseInput(WindowMouseInput {
            state: ElementState::Released,
            button: MouseButton::Left,
        }),
    ];
    for event in &window_events {
        if let Some(event) = manager.dispatch_event(event) {
            nav.handle(&mut fig, &event).unwrap();
        }
    }
    assert_limits(fig.get(0).unwrap().limits(), (-2.0, 8.0), (0.0, 10.0));
    assert_eq!(nav.views().len(), 2);
}
