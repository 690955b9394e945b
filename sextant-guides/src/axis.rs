use std::collections::HashSet;

use itertools::izip;
use ordered_float::OrderedFloat;
use sextant_common::canvas::{points_to_pixels, to_device, Renderer};
use sextant_common::config::StyleConfig;
use sextant_common::interval::Interval;
use sextant_common::types::{
    Bbox, FontProps, HorizontalAlignment, LineProps, Point, TextProps, VerticalAlignment,
};
use sextant_scales::formatter::Formatter;
use sextant_scales::locator::{AutoLocator, FixedLocator, Locator};
use sextant_scales::scale::ScaleType;
use sextant_scales::transform::Transform;

use crate::axes::check_bounds;
use crate::error::SextantGuidesError;
use crate::tick::{AxisDirection, Tick, TickFrame, TickSide, TickWhich};

/// Distance between the tick labels and the axis label, in points
pub const LABELPAD: f64 = 5.0;

/// Everything an axis needs from its owning axes for one draw pass
#[derive(Debug, Clone)]
pub struct AxisContext {
    pub view: Interval,
    pub data: Interval,
    /// Blended tick transform, see [`TickFrame`]
    pub transform: Transform,
    /// Axes box in display pixels
    pub bbox: Bbox,
    pub dpi: f64,
}

/// One axis of an [`crate::axes::Axes`]: locators, formatters and the tick pools.
///
/// Pools start with a single prototype tick and only ever grow. Each draw displays a
/// prefix of the pool sized to the current locator output.
#[derive(Debug)]
pub struct Axis {
    direction: AxisDirection,
    major_locator: Locator,
    minor_locator: Locator,
    major_formatter: Formatter,
    minor_formatter: Formatter,
    major_pool: Vec<Tick>,
    minor_pool: Vec<Tick>,
    major_count: usize,
    minor_count: usize,
    grid_major: bool,
    grid_minor: bool,
    label: TextProps,
    label_position: Option<Point>,
    offset_text: TextProps,
    style: StyleConfig,
}

impl Axis {
    pub fn new(direction: AxisDirection, style: &StyleConfig) -> Self {
        let label = TextProps {
            color: style.axes_label_color,
            font: FontProps {
                size: style.axes_label_size,
                ..Default::default()
            },
            visible: true,
            ..Default::default()
        };
        let label = match direction {
            AxisDirection::X => {
                label.with_alignment(HorizontalAlignment::Center, VerticalAlignment::Top)
            }
            AxisDirection::Y => TextProps {
                rotation: 90.0,
                ..label.with_alignment(HorizontalAlignment::Right, VerticalAlignment::Center)
            },
        };
        let offset_text = TextProps {
            color: style.tick_color,
            font: FontProps {
                size: style.tick_label_size,
                ..Default::default()
            },
            visible: true,
            ..Default::default()
        };
        let offset_text = match direction {
            AxisDirection::X => {
                offset_text.with_alignment(HorizontalAlignment::Right, VerticalAlignment::Top)
            }
            AxisDirection::Y => {
                offset_text.with_alignment(HorizontalAlignment::Left, VerticalAlignment::Bottom)
            }
        };

        Self {
            direction,
            major_locator: Locator::Auto(AutoLocator::new(style.max_ticks)),
            minor_locator: Locator::Null,
            major_formatter: Formatter::default(),
            minor_formatter: Formatter::Null,
            major_pool: vec![Tick::new(direction, true, style)],
            minor_pool: vec![Tick::new(direction, false, style)],
            major_count: 0,
            minor_count: 0,
            grid_major: style.axes_grid,
            grid_minor: false,
            label,
            label_position: None,
            offset_text,
            style: style.clone(),
        }
    }

    pub fn direction(&self) -> AxisDirection {
        self.direction
    }

    pub fn major_locator(&self) -> &Locator {
        &self.major_locator
    }

    pub fn minor_locator(&self) -> &Locator {
        &self.minor_locator
    }

    pub fn major_formatter(&self) -> &Formatter {
        &self.major_formatter
    }

    pub fn minor_formatter(&self) -> &Formatter {
        &self.minor_formatter
    }

    pub fn set_major_locator(&mut self, locator: Locator) {
        self.major_locator = locator;
    }

    pub fn set_minor_locator(&mut self, locator: Locator) {
        self.minor_locator = locator;
    }

    pub fn set_major_formatter(&mut self, formatter: Formatter) {
        self.major_formatter = formatter;
    }

    pub fn set_minor_formatter(&mut self, formatter: Formatter) {
        self.minor_formatter = formatter;
    }

    /// Fixes the major tick positions and grows `view` to cover them.
    ///
    /// Every position must be valid on `scale`. Rejected positions leave the locator and
    /// view untouched.
    pub fn set_ticks(
        &mut self,
        ticks: Vec<f64>,
        view: &mut Interval,
        scale: ScaleType,
    ) -> Result<(), SextantGuidesError> {
        let locator = FixedLocator::new(ticks)?;
        for loc in locator.locs() {
            scale.validate(*loc)?;
        }
        let mut grown = *view;
        grown.update(locator.locs(), false);
        check_bounds(scale, grown.bounds())?;

        *view = grown;
        let count = locator.locs().len();
        self.major_locator = Locator::Fixed(locator);
        grow_pool(&mut self.major_pool, count, self.grid_major, &self.style);
        self.major_count = count;
        Ok(())
    }

    /// Fixes the major tick label strings by position index
    pub fn set_ticklabels<S: Into<String>>(&mut self, labels: impl IntoIterator<Item = S>) {
        self.major_formatter = Formatter::fixed(labels);
    }

    /// Turns grid lines on or off, or toggles them when `on` is `None`
    pub fn grid(&mut self, on: Option<bool>, which: TickWhich) {
        if which.includes_major() {
            self.grid_major = on.unwrap_or(!self.grid_major);
            for tick in self.major_pool.iter_mut() {
                tick.grid_on = self.grid_major;
            }
        }
        if which.includes_minor() {
            self.grid_minor = on.unwrap_or(!self.grid_minor);
            for tick in self.minor_pool.iter_mut() {
                tick.grid_on = self.grid_minor;
            }
        }
    }

    pub fn grid_on(&self, which: TickWhich) -> bool {
        match which {
            TickWhich::Major => self.grid_major,
            TickWhich::Minor => self.grid_minor,
            TickWhich::Both => self.grid_major && self.grid_minor,
        }
    }

    /// Pans `view` by `steps` major tick intervals, in log space on log scales.
    ///
    /// `view` only changes when the panned bounds are valid on `scale`.
    pub fn pan(
        &mut self,
        view: &mut Interval,
        scale: ScaleType,
        steps: i32,
    ) -> Result<(), SextantGuidesError> {
        let (lo, hi) = self.major_locator.pan(view, steps, scale)?;
        check_bounds(scale, (lo, hi))?;
        view.set_bounds(lo, hi);
        Ok(())
    }

    /// Zooms `view` in for positive `direction`, out for negative
    pub fn zoom(
        &mut self,
        view: &mut Interval,
        scale: ScaleType,
        direction: i32,
    ) -> Result<(), SextantGuidesError> {
        let (lo, hi) = self.major_locator.zoom(view, direction, scale)?;
        check_bounds(scale, (lo, hi))?;
        view.set_bounds(lo, hi);
        Ok(())
    }

    /// Drops locator state derived from earlier limits
    pub fn refresh_locators(&mut self) {
        self.major_locator.refresh();
        self.minor_locator.refresh();
    }

    pub fn set_tick_side(&mut self, side: TickSide) -> Result<(), SextantGuidesError> {
        // (tick1, tick2, label1, label2)
        let flags = match (self.direction, side) {
            (AxisDirection::X, TickSide::Bottom) | (AxisDirection::Y, TickSide::Left) => {
                (true, false, true, false)
            }
            (AxisDirection::X, TickSide::Top) | (AxisDirection::Y, TickSide::Right) => {
                (false, true, false, true)
            }
            (_, TickSide::Both) => (true, true, true, false),
            (direction, side) => {
                return Err(SextantGuidesError::InvalidTickSide {
                    side: side.to_string(),
                    direction: direction.to_string(),
                })
            }
        };
        let (tick1, tick2, label1, label2) = flags;
        for tick in self.major_pool.iter_mut().chain(self.minor_pool.iter_mut()) {
            tick.tick1_on = tick1;
            tick.tick2_on = tick2;
            tick.label1_on = label1;
            tick.label2_on = label2;
        }
        Ok(())
    }

    pub fn tick_top(&mut self) -> Result<(), SextantGuidesError> {
        self.set_tick_side(TickSide::Top)
    }

    pub fn tick_bottom(&mut self) -> Result<(), SextantGuidesError> {
        self.set_tick_side(TickSide::Bottom)
    }

    pub fn tick_left(&mut self) -> Result<(), SextantGuidesError> {
        self.set_tick_side(TickSide::Left)
    }

    pub fn tick_right(&mut self) -> Result<(), SextantGuidesError> {
        self.set_tick_side(TickSide::Right)
    }

    /// Major ticks displayed by the last draw (or sized by the last `set_ticks`)
    pub fn major_ticks(&self) -> &[Tick] {
        &self.major_pool[..self.major_count.min(self.major_pool.len())]
    }

    pub fn minor_ticks(&self) -> &[Tick] {
        &self.minor_pool[..self.minor_count.min(self.minor_pool.len())]
    }

    /// Every pooled major tick, displayed or not
    pub fn major_pool(&self) -> &[Tick] {
        &self.major_pool
    }

    /// Mutable access to pooled major ticks for per-tick style overrides
    pub fn major_pool_mut(&mut self) -> &mut [Tick] {
        &mut self.major_pool
    }

    pub fn minor_pool(&self) -> &[Tick] {
        &self.minor_pool
    }

    pub fn minor_pool_mut(&mut self) -> &mut [Tick] {
        &mut self.minor_pool
    }

    /// Grows the major pool so at least `count` ticks exist
    pub fn reserve_major_ticks(&mut self, count: usize) {
        grow_pool(&mut self.major_pool, count, self.grid_major, &self.style);
    }

    pub fn gridlines(&self) -> Vec<&LineProps> {
        self.major_pool.iter().map(|tick| &tick.gridline).collect()
    }

    pub fn ticklines(&self) -> Vec<&LineProps> {
        self.major_pool
            .iter()
            .flat_map(|tick| [&tick.tick1_line, &tick.tick2_line])
            .collect()
    }

    /// Enabled labels of the displayed major ticks, label 1 entries before label 2 entries
    pub fn ticklabels(&self) -> Vec<&TextProps> {
        let ticks = self.major_ticks();
        ticks
            .iter()
            .filter(|tick| tick.label1_on)
            .map(|tick| &tick.label1)
            .chain(
                ticks
                    .iter()
                    .filter(|tick| tick.label2_on)
                    .map(|tick| &tick.label2),
            )
            .collect()
    }

    /// Current major tick positions
    pub fn ticklocs(&mut self, view: &Interval, data: &Interval) -> Result<Vec<f64>, SextantGuidesError> {
        Ok(self.major_locator.locate(view, data)?)
    }

    pub fn label(&self) -> &TextProps {
        &self.label
    }

    pub fn label_mut(&mut self) -> &mut TextProps {
        &mut self.label
    }

    pub fn set_label_text(&mut self, text: impl Into<String>) {
        self.label.text = text.into();
    }

    /// Display position of the axis label computed by the last draw
    pub fn label_position(&self) -> Option<Point> {
        self.label_position
    }

    /// Offset text produced by the major formatter during the last draw
    pub fn offset_text(&self) -> &TextProps {
        &self.offset_text
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Re-applies style defaults to the label and every pooled tick
    pub fn apply_style(&mut self, style: &StyleConfig) -> Result<(), SextantGuidesError> {
        style.validate()?;
        for tick in self.major_pool.iter_mut().chain(self.minor_pool.iter_mut()) {
            tick.apply_style(style);
        }
        self.label.color = style.axes_label_color;
        self.label.font.size = style.axes_label_size;
        self.offset_text.color = style.tick_color;
        self.offset_text.font.size = style.tick_label_size;
        if style.axes_grid != self.grid_major {
            self.grid(Some(style.axes_grid), TickWhich::Major);
        }
        self.style = style.clone();
        Ok(())
    }

    fn capped(&self, mut locs: Vec<f64>, which: &str) -> Vec<f64> {
        let cap = self.style.tick_safety_cap;
        if locs.len() > cap {
            tracing::warn!(
                axis = self.direction.group_name(),
                which,
                requested = locs.len(),
                cap,
                "locator output truncated at tick safety cap"
            );
            locs.truncate(cap);
        }
        locs
    }

    /// Places and draws the ticks, then the axis label and offset text.
    ///
    /// Returns the display extents of the drawn tick labels.
    #[tracing::instrument(skip_all)]
    pub fn draw<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        ctx: &AxisContext,
    ) -> Result<Vec<Bbox>, SextantGuidesError> {
        let view = ctx.view;
        let transform = ctx.transform.clone().freeze();
        let frame = TickFrame {
            transform: &transform,
            view,
            dpi: ctx.dpi,
        };

        let major_locs = self.major_locator.locate(&view, &ctx.data)?;
        let major_locs = self.capped(major_locs, "major");
        let major_labels = self.major_formatter.format_ticks(&major_locs);
        grow_pool(&mut self.major_pool, major_locs.len(), self.grid_major, &self.style);
        self.major_count = major_locs.len();

        let minor_locs = self.minor_locator.locate(&view, &ctx.data)?;
        let minor_locs = self.capped(minor_locs, "minor");
        let minor_labels = self.minor_formatter.format_ticks(&minor_locs);
        grow_pool(&mut self.minor_pool, minor_locs.len(), self.grid_minor, &self.style);
        self.minor_count = minor_locs.len();

        renderer.open_group(self.direction.group_name());
        let result = self.draw_ticks(
            renderer,
            &frame,
            (major_locs.as_slice(), major_labels.as_slice()),
            (minor_locs.as_slice(), minor_labels.as_slice()),
        );
        if let Ok(extents) = &result {
            self.update_label_position(extents, &ctx.bbox, ctx.dpi);
            self.offset_text.text = self.major_formatter.offset_text();
            self.draw_decorations(renderer, extents, &ctx.bbox, ctx.dpi);
        }
        renderer.close_group(self.direction.group_name());
        result
    }

    /// Draws the pooled ticks in view, minor ones only where no major tick was drawn
    fn draw_ticks<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        frame: &TickFrame,
        (major_locs, major_labels): (&[f64], &[String]),
        (minor_locs, minor_labels): (&[f64], &[String]),
    ) -> Result<Vec<Bbox>, SextantGuidesError> {
        let view = frame.view;
        let mut extents = Vec::new();
        let mut seen: HashSet<OrderedFloat<f64>> = HashSet::new();

        for (tick, loc, label) in izip!(self.major_pool.iter_mut(), major_locs, major_labels) {
            if !view.contains(*loc) {
                continue;
            }
            seen.insert(OrderedFloat(*loc));
            tick.update_position(*loc);
            tick.set_label1(label);
            tick.set_label2(label);
            if let Some(extent) = tick.draw(renderer, frame)? {
                extents.push(extent);
            }
        }

        for (tick, loc, label) in izip!(self.minor_pool.iter_mut(), minor_locs, minor_labels) {
            if !view.contains(*loc) || seen.contains(&OrderedFloat(*loc)) {
                continue;
            }
            tick.update_position(*loc);
            tick.set_label1(label);
            tick.set_label2(label);
            if let Some(extent) = tick.draw(renderer, frame)? {
                extents.push(extent);
            }
        }
        Ok(extents)
    }

    fn update_label_position(&mut self, extents: &[Bbox], bbox: &Bbox, dpi: f64) {
        let pad = points_to_pixels(LABELPAD, dpi);
        let union = Bbox::union_all(extents);
        let position = match self.direction {
            AxisDirection::X => {
                let bottom = union.map_or(bbox.y0, |u| u.y0.min(bbox.y0));
                Point::new(bbox.x0 + bbox.width() / 2.0, bottom - pad)
            }
            AxisDirection::Y => {
                let left = union.map_or(bbox.x0, |u| u.x0.min(bbox.x0));
                Point::new(left - pad, bbox.y0 + bbox.height() / 2.0)
            }
        };
        self.label_position = Some(position);
    }

    fn draw_decorations<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        extents: &[Bbox],
        bbox: &Bbox,
        dpi: f64,
    ) {
        if let Some(position) = self.label_position {
            if self.label.visible && !self.label.text.is_empty() {
                let device = to_device(renderer, position);
                renderer.draw_text(device.x, device.y, &self.label.text, &self.label, self.label.rotation);
            }
        }

        if self.offset_text.visible && !self.offset_text.text.is_empty() {
            let pad = points_to_pixels(LABELPAD, dpi);
            let position = match self.direction {
                AxisDirection::X => {
                    let bottom = Bbox::union_all(extents).map_or(bbox.y0, |u| u.y0.min(bbox.y0));
                    Point::new(bbox.x1, bottom - pad)
                }
                AxisDirection::Y => Point::new(bbox.x0, bbox.y1 + pad),
            };
            let device = to_device(renderer, position);
            renderer.draw_text(device.x, device.y, &self.offset_text.text, &self.offset_text, 0.0);
        }
    }
}

/// Appends ticks styled after the pool's first (prototype) tick until `count` exist
fn grow_pool(pool: &mut Vec<Tick>, count: usize, grid_on: bool, style: &StyleConfig) {
    let Some(proto) = pool.first().cloned() else {
        return;
    };
    while pool.len() < count {
        let mut tick = Tick::new(proto.direction(), proto.is_major(), style);
        tick.copy_style_from(&proto);
        tick.grid_on = grid_on;
        pool.push(tick);
    }
}
