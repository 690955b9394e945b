//! Interactive pan and zoom over the axes of a [`Figure`].
//!
//! The controller never owns the figure. Every handler borrows it for the duration of one
//! event, and all state kept between events (the press snapshot and the view history)
//! refers to axes by index.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sextant_common::types::Point;
use sextant_guides::{Axes, Figure, Limits};
use sextant_scales::scale::ScaleType;
use sextant_scales::transform::Transform;
use strum::{Display, EnumString, VariantNames};

use crate::error::SextantNavigationError;
use crate::event::{
    CursorMovedEvent, KeyPressEvent, ModifiersState, MouseDownEvent, MouseUpEvent,
    MouseWheelEvent, NavigationEvent, UpdateStatus,
};
use crate::history::ViewHistoryStack;
use crate::window::{Key, MouseButton, NamedKey};

/// Drags shorter than this many pixels in either direction are clicks, not zooms
pub const ZOOM_THRESHOLD: f64 = 5.0;

/// Per-notch factor applied by the scroll wheel
pub const SCROLL_ZOOM_BASE: f64 = 1.1;

#[derive(
    Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NavigationMode {
    #[default]
    None,
    Pan,
    Zoom,
}

impl NavigationMode {
    pub fn parse(s: &str) -> Result<Self, SextantNavigationError> {
        Self::from_str(s).map_err(|_| SextantNavigationError::InvalidMode(s.to_string()))
    }

    /// Status bar text for the mode
    pub fn message(&self) -> &'static str {
        match self {
            NavigationMode::None => "",
            NavigationMode::Pan => "pan/zoom mode",
            NavigationMode::Zoom => "zoom rect mode",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Pointer,
    Move,
    SelectRegion,
}

/// How modifier keys restrict a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragConstraint {
    Free,
    /// Control: both deltas take the larger magnitude
    Equal,
    /// `x` held: horizontal only
    XOnly,
    /// `y` held: vertical only
    YOnly,
    /// Shift: snap to horizontal, vertical or the diagonal
    Snap,
}

impl DragConstraint {
    pub fn from_modifiers(modifiers: &ModifiersState) -> Self {
        if modifiers.control {
            DragConstraint::Equal
        } else if modifiers.key == Some('x') {
            DragConstraint::XOnly
        } else if modifiers.key == Some('y') {
            DragConstraint::YOnly
        } else if modifiers.shift {
            DragConstraint::Snap
        } else {
            DragConstraint::Free
        }
    }

    pub fn apply(&self, dx: f64, dy: f64) -> (f64, f64) {
        match self {
            DragConstraint::Free => (dx, dy),
            DragConstraint::Equal if dx.abs() > dy.abs() => (dx, dx),
            DragConstraint::Equal => (dy, dy),
            DragConstraint::XOnly => (dx, 0.0),
            DragConstraint::YOnly => (0.0, dy),
            DragConstraint::Snap => {
                if 2.0 * dx.abs() < dy.abs() {
                    (0.0, dy)
                } else if 2.0 * dy.abs() < dx.abs() {
                    (dx, 0.0)
                } else if dx.abs() > dy.abs() {
                    (dx, dx.abs().copysign(dy))
                } else {
                    (dy.abs().copysign(dx), dy)
                }
            }
        }
    }
}

/// Hooks into the hosting window. Every method is optional.
pub trait NavigationBackend {
    /// Shows the zoom rectangle between two display points
    fn draw_rubberband(&mut self, _from: Point, _to: Point) {}

    fn clear_rubberband(&mut self) {}

    fn set_message(&mut self, _message: &str) {}

    fn set_cursor(&mut self, _cursor: Cursor) {}

    /// Called after every live limit change during a drag
    fn dynamic_update(&mut self) {}
}

/// Backend that ignores every hook
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBackend;

impl NavigationBackend for NullBackend {}

/// Snapshot of one axes taken when a gesture starts
#[derive(Debug, Clone)]
struct PressEntry {
    axes_index: usize,
    limits: Limits,
    /// Data transform at press time, so drags are measured against the press-time view
    transform: Transform,
    x_scale: ScaleType,
    y_scale: ScaleType,
}

#[derive(Debug, Clone)]
struct PressState {
    start: Point,
    button: MouseButton,
    entries: Vec<PressEntry>,
}

#[derive(Debug)]
pub struct NavigationController<B: NavigationBackend> {
    backend: B,
    mode: NavigationMode,
    views: ViewHistoryStack<Vec<Limits>>,
    press: Option<PressState>,
    last_cursor: Option<Cursor>,
}

impl<B: NavigationBackend> NavigationController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            mode: NavigationMode::None,
            views: ViewHistoryStack::new(),
            press: None,
            last_cursor: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn mode(&self) -> NavigationMode {
        self.mode
    }

    pub fn views(&self) -> &ViewHistoryStack<Vec<Limits>> {
        &self.views
    }

    /// Whether a gesture is in progress
    pub fn is_armed(&self) -> bool {
        self.press.is_some()
    }

    fn set_mode(&mut self, mode: NavigationMode) {
        self.mode = if self.mode == mode {
            NavigationMode::None
        } else {
            mode
        };
        // An in-flight gesture belongs to the previous mode
        self.press = None;
        self.backend.clear_rubberband();
        tracing::debug!(mode = %self.mode, "navigation mode changed");
        self.backend.set_message(self.mode.message());
    }

    /// Toggles pan mode, leaving zoom mode if it was active
    pub fn pan(&mut self) {
        self.set_mode(NavigationMode::Pan);
    }

    /// Toggles rectangle zoom mode, leaving pan mode if it was active
    pub fn zoom(&mut self) {
        self.set_mode(NavigationMode::Zoom);
    }

    /// Snapshots the limits of every axes onto the view history
    pub fn push_current(&mut self, figure: &Figure) {
        self.views.push(figure.current_limits());
        tracing::debug!(
            position = ?self.views.position(),
            len = self.views.len(),
            "pushed view limits"
        );
    }

    /// Forgets the view history, e.g. after the figure's axes were replaced
    pub fn update(&mut self) {
        self.views.clear();
    }

    pub fn back(&mut self, figure: &mut Figure) -> Result<UpdateStatus, SextantNavigationError> {
        self.views.back();
        self.update_view(figure)
    }

    pub fn forward(&mut self, figure: &mut Figure) -> Result<UpdateStatus, SextantNavigationError> {
        self.views.forward();
        self.update_view(figure)
    }

    pub fn home(&mut self, figure: &mut Figure) -> Result<UpdateStatus, SextantNavigationError> {
        self.views.home();
        self.update_view(figure)
    }

    fn update_view(&mut self, figure: &mut Figure) -> Result<UpdateStatus, SextantNavigationError> {
        let Some(limits) = self.views.current() else {
            return Ok(UpdateStatus::none());
        };
        figure.apply_limits(limits)?;
        Ok(self.draw(figure).with_history())
    }

    /// Refreshes every locator and asks the host to redraw
    pub fn draw(&mut self, figure: &mut Figure) -> UpdateStatus {
        figure.refresh_locators();
        UpdateStatus::rerender()
    }

    pub fn handle(
        &mut self,
        figure: &mut Figure,
        event: &NavigationEvent,
    ) -> Result<UpdateStatus, SextantNavigationError> {
        match event {
            NavigationEvent::MouseDown(e) => self.press(figure, e),
            NavigationEvent::MouseUp(e) => self.release(figure, e),
            NavigationEvent::CursorMoved(e) => self.mouse_move(figure, e),
            NavigationEvent::MouseWheel(e) => self.scroll(figure, e),
            NavigationEvent::KeyPress(e) => self.key_press(figure, e),
        }
    }

    pub fn press(
        &mut self,
        figure: &mut Figure,
        event: &MouseDownEvent,
    ) -> Result<UpdateStatus, SextantNavigationError> {
        if self.mode == NavigationMode::None
            || !matches!(event.button, MouseButton::Left | MouseButton::Right)
        {
            return Ok(UpdateStatus::none());
        }

        let mut status = UpdateStatus::none();
        if self.views.is_empty() {
            self.push_current(figure);
            status = status.with_history();
        }

        let mut entries = Vec::new();
        for axes_index in figure.axes_under(event.position) {
            let axes = figure.get(axes_index)?;
            entries.push(PressEntry {
                axes_index,
                limits: axes.limits(),
                transform: axes.trans_data()?.freeze(),
                x_scale: axes.x_scale(),
                y_scale: axes.y_scale(),
            });
        }
        if entries.is_empty() {
            return Ok(status);
        }
        self.press = Some(PressState {
            start: event.position,
            button: event.button,
            entries,
        });
        Ok(status)
    }

    pub fn release(
        &mut self,
        figure: &mut Figure,
        event: &MouseUpEvent,
    ) -> Result<UpdateStatus, SextantNavigationError> {
        let Some(press) = self.press.take() else {
            return Ok(UpdateStatus::none());
        };
        match self.mode {
            NavigationMode::Pan => {
                self.push_current(figure);
                Ok(self.draw(figure).with_history())
            }
            NavigationMode::Zoom => {
                let constraint = DragConstraint::from_modifiers(&event.modifiers);
                self.release_zoom(figure, press, event.position, constraint)
            }
            NavigationMode::None => Ok(UpdateStatus::none()),
        }
    }

    fn release_zoom(
        &mut self,
        figure: &mut Figure,
        press: PressState,
        position: Point,
        constraint: DragConstraint,
    ) -> Result<UpdateStatus, SextantNavigationError> {
        self.backend.clear_rubberband();
        let too_small = (position.x - press.start.x).abs() < ZOOM_THRESHOLD
            || (position.y - press.start.y).abs() < ZOOM_THRESHOLD;

        let mut zoomed = false;
        for entry in &press.entries {
            let axes = figure.get_mut(entry.axes_index)?;
            if too_small || !axes.in_axes(position) {
                // A right drag rescales live, so a cancelled gesture has to undo that
                if press.button == MouseButton::Right {
                    axes.set_limits(&entry.limits)?;
                }
                continue;
            }
            let limits = match press.button {
                MouseButton::Right => rescale(entry, axes, press.start, position, &constraint)?,
                _ => zoom_rect(entry, press.start, position)?,
            };
            match axes.set_limits(&limits) {
                Ok(()) => zoomed = true,
                Err(err) => tracing::debug!(error = %err, "zoom produced invalid limits, ignoring"),
            }
        }

        if !zoomed {
            return Ok(self.draw(figure));
        }
        self.push_current(figure);
        Ok(self.draw(figure).with_history())
    }

    pub fn mouse_move(
        &mut self,
        figure: &mut Figure,
        event: &CursorMovedEvent,
    ) -> Result<UpdateStatus, SextantNavigationError> {
        if self.mode == NavigationMode::Pan && self.press.is_some() {
            return self.drag_pan(figure, event);
        }

        let over = figure.axes_at(event.position);
        let cursor = match (over, self.mode) {
            (None, _) | (_, NavigationMode::None) => Cursor::Pointer,
            (Some(_), NavigationMode::Pan) => Cursor::Move,
            (Some(_), NavigationMode::Zoom) => Cursor::SelectRegion,
        };
        if self.last_cursor != Some(cursor) {
            self.backend.set_cursor(cursor);
            self.last_cursor = Some(cursor);
        }
        self.report_position(figure, over, event.position)?;

        if self.mode == NavigationMode::Zoom {
            return self.drag_zoom(figure, event);
        }
        Ok(UpdateStatus::none())
    }

    fn report_position(
        &mut self,
        figure: &Figure,
        over: Option<usize>,
        position: Point,
    ) -> Result<(), SextantNavigationError> {
        let Some(index) = over else {
            self.backend.set_message(self.mode.message());
            return Ok(());
        };
        let data = figure.get(index)?.trans_data()?.inverse(position)?;
        let location = format!("x={}, y={}", format_coord(data.x), format_coord(data.y));
        let message = match self.mode.message() {
            "" => location,
            mode => format!("{mode} : {location}"),
        };
        self.backend.set_message(&message);
        Ok(())
    }

    fn drag_zoom(
        &mut self,
        figure: &mut Figure,
        event: &CursorMovedEvent,
    ) -> Result<UpdateStatus, SextantNavigationError> {
        let Some(press) = &self.press else {
            return Ok(UpdateStatus::none());
        };
        if press.button != MouseButton::Right {
            self.backend.draw_rubberband(press.start, event.position);
            return Ok(UpdateStatus::none());
        }

        let constraint = DragConstraint::from_modifiers(&event.modifiers);
        for entry in &press.entries {
            let axes = figure.get_mut(entry.axes_index)?;
            let limits = rescale(entry, axes, press.start, event.position, &constraint)?;
            set_live_limits(axes, &limits);
        }
        self.backend.dynamic_update();
        Ok(UpdateStatus::rerender())
    }

    fn drag_pan(
        &mut self,
        figure: &mut Figure,
        event: &CursorMovedEvent,
    ) -> Result<UpdateStatus, SextantNavigationError> {
        let Some(press) = &self.press else {
            return Ok(UpdateStatus::none());
        };
        let constraint = DragConstraint::from_modifiers(&event.modifiers);
        for entry in &press.entries {
            let axes = figure.get_mut(entry.axes_index)?;
            let limits = match press.button {
                MouseButton::Right => {
                    rescale(entry, axes, press.start, event.position, &constraint)?
                }
                _ => pan_limits(entry, press.start, event.position, &constraint)?,
            };
            set_live_limits(axes, &limits);
        }
        self.backend.dynamic_update();
        Ok(UpdateStatus::rerender())
    }

    /// Zooms every axes under the cursor around the cursor position
    pub fn scroll(
        &mut self,
        figure: &mut Figure,
        event: &MouseWheelEvent,
    ) -> Result<UpdateStatus, SextantNavigationError> {
        let steps = event.delta.vertical_steps();
        let targets = figure.axes_under(event.position);
        if steps == 0.0 || targets.is_empty() || self.press.is_some() {
            return Ok(UpdateStatus::none());
        }
        if self.views.is_empty() {
            self.push_current(figure);
        }

        let factor = SCROLL_ZOOM_BASE.powf(-steps);
        for index in targets {
            let axes = figure.get_mut(index)?;
            let anchor = axes.trans_data()?.inverse(event.position)?;
            let limits = axes.limits();
            let limits = Limits {
                x: scale_about(limits.x, anchor.x, factor, axes.x_scale()),
                y: scale_about(limits.y, anchor.y, factor, axes.y_scale()),
            };
            set_live_limits(axes, &limits);
        }
        self.push_current(figure);
        Ok(self.draw(figure).with_history())
    }

    fn key_press(
        &mut self,
        figure: &mut Figure,
        event: &KeyPressEvent,
    ) -> Result<UpdateStatus, SextantNavigationError> {
        match event.key {
            Key::Named(NamedKey::Home) | Key::Character('h') => self.home(figure),
            Key::Named(NamedKey::ArrowLeft) | Key::Character('c') => self.back(figure),
            Key::Named(NamedKey::ArrowRight) | Key::Character('v') => self.forward(figure),
            Key::Character('p') => {
                self.pan();
                Ok(UpdateStatus::none())
            }
            Key::Character('o') => {
                self.zoom();
                Ok(UpdateStatus::none())
            }
            Key::Named(NamedKey::Escape) if self.press.is_some() => {
                self.cancel(figure)?;
                Ok(self.draw(figure))
            }
            _ => Ok(UpdateStatus::none()),
        }
    }

    /// Abandons the current gesture and restores the limits it started from
    pub fn cancel(&mut self, figure: &mut Figure) -> Result<(), SextantNavigationError> {
        self.backend.clear_rubberband();
        if let Some(press) = self.press.take() {
            for entry in &press.entries {
                figure.get_mut(entry.axes_index)?.set_limits(&entry.limits)?;
            }
        }
        Ok(())
    }
}

/// Applies limits computed mid-gesture; a drag may briefly produce unusable limits
fn set_live_limits(axes: &mut Axes, limits: &Limits) {
    if let Err(err) = axes.set_limits(limits) {
        tracing::debug!(error = %err, "skipping invalid intermediate limits");
    }
}

/// Limits after dragging from `start` to `current`: the view follows the cursor
fn pan_limits(
    entry: &PressEntry,
    start: Point,
    current: Point,
    constraint: &DragConstraint,
) -> Result<Limits, SextantNavigationError> {
    let from = entry.transform.inverse(start)?;
    let to = entry.transform.inverse(current)?;
    let delta = |scale: ScaleType, from: f64, to: f64| {
        if scale.is_log() {
            1.0 - from / to
        } else {
            to - from
        }
    };
    let (dx, dy) = constraint.apply(
        delta(entry.x_scale, from.x, to.x),
        delta(entry.y_scale, from.y, to.y),
    );
    let shift = |(lo, hi): (f64, f64), scale: ScaleType, d: f64| {
        if scale.is_log() {
            (lo * (1.0 - d), hi * (1.0 - d))
        } else {
            (lo - d, hi - d)
        }
    };
    Ok(Limits {
        x: shift(entry.limits.x, entry.x_scale, dx),
        y: shift(entry.limits.y, entry.y_scale, dy),
    })
}

/// Proportional rescale of the press-time limits around the press point.
///
/// The drag distance as a fraction of the axes size is the decimal exponent of the scale
/// factor, so dragging right or up zooms in.
fn rescale(
    entry: &PressEntry,
    axes: &Axes,
    start: Point,
    current: Point,
    constraint: &DragConstraint,
) -> Result<Limits, SextantNavigationError> {
    let bbox = axes.bbox();
    let (dx, dy) = constraint.apply(
        (start.x - current.x) / bbox.width(),
        (start.y - current.y) / bbox.height(),
    );
    let anchor = entry.transform.inverse(start)?;
    Ok(Limits {
        x: scale_about(entry.limits.x, anchor.x, 10f64.powf(dx), entry.x_scale),
        y: scale_about(entry.limits.y, anchor.y, 10f64.powf(dy), entry.y_scale),
    })
}

/// Scales the distance of each bound from `anchor` by `alpha`, in log space for log axes
fn scale_about((lo, hi): (f64, f64), anchor: f64, alpha: f64, scale: ScaleType) -> (f64, f64) {
    if scale.is_log() {
        (
            anchor * (lo / anchor).powf(alpha),
            anchor * (hi / anchor).powf(alpha),
        )
    } else {
        (anchor + alpha * (lo - anchor), anchor + alpha * (hi - anchor))
    }
}

/// Limits spanning the dragged rectangle, keeping each axis' orientation
fn zoom_rect(entry: &PressEntry, start: Point, end: Point) -> Result<Limits, SextantNavigationError> {
    let a = entry.transform.inverse(start)?;
    let b = entry.transform.inverse(end)?;
    let oriented = |(lo, hi): (f64, f64), u: f64, v: f64| {
        let (min, max) = (u.min(v), u.max(v));
        if lo > hi {
            (max, min)
        } else {
            (min, max)
        }
    };
    Ok(Limits {
        x: oriented(entry.limits.x, a.x, b.x),
        y: oriented(entry.limits.y, a.y, b.y),
    })
}

/// Compact coordinate text for the status bar
fn format_coord(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e6).contains(&magnitude) {
        return format!("{value:.4e}");
    }
    let text = format!("{value:.6}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" => "0".to_string(),
        text => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_constraints() {
        assert_eq!(DragConstraint::Free.apply(1.0, -3.0), (1.0, -3.0));
        assert_eq!(DragConstraint::Equal.apply(1.0, -3.0), (-3.0, -3.0));
        assert_eq!(DragConstraint::XOnly.apply(1.0, -3.0), (1.0, 0.0));
        assert_eq!(DragConstraint::YOnly.apply(1.0, -3.0), (0.0, -3.0));
        assert_eq!(DragConstraint::Snap.apply(1.0, -3.0), (0.0, -3.0));
        assert_eq!(DragConstraint::Snap.apply(4.0, 1.0), (4.0, 0.0));
        assert_eq!(DragConstraint::Snap.apply(3.0, -2.0), (3.0, -3.0));
        assert_eq!(DragConstraint::Snap.apply(-2.0, 3.0), (-3.0, 3.0));
    }

    #[test]
    fn test_constraint_from_modifiers() {
        let mut modifiers = ModifiersState {
            shift: true,
            key: Some('x'),
            ..Default::default()
        };
        assert_eq!(DragConstraint::from_modifiers(&modifiers), DragConstraint::XOnly);
        modifiers.control = true;
        assert_eq!(DragConstraint::from_modifiers(&modifiers), DragConstraint::Equal);
        assert_eq!(
            DragConstraint::from_modifiers(&ModifiersState::default()),
            DragConstraint::Free
        );
    }

    #[test]
    fn test_scale_about() {
        let (lo, hi) = scale_about((0.0, 10.0), 5.0, 0.5, ScaleType::Linear);
        assert_approx_eq!(f64, lo, 2.5);
        assert_approx_eq!(f64, hi, 7.5);

        let (lo, hi) = scale_about((1.0, 10000.0), 100.0, 0.5, ScaleType::Log);
        assert_approx_eq!(f64, lo, 10.0, epsilon = 1e-9);
        assert_approx_eq!(f64, hi, 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_format_coord() {
        assert_eq!(format_coord(2.5), "2.5");
        assert_eq!(format_coord(-0.0000001), "-1.0000e-7");
        assert_eq!(format_coord(0.0), "0");
        assert_eq!(format_coord(3.0), "3");
        assert_eq!(format_coord(1234567.0), "1.2346e6");
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(NavigationMode::parse("zoom").unwrap(), NavigationMode::Zoom);
        assert!(NavigationMode::parse("rotate").is_err());
        assert_eq!(NavigationMode::Pan.to_string(), "pan");
    }
}
