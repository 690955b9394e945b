use serde::{Deserialize, Serialize};
use sextant_common::canvas::{points_to_pixels, to_device, Renderer};
use sextant_common::config::StyleConfig;
use sextant_common::interval::Interval;
use sextant_common::types::{
    Bbox, FontProps, HorizontalAlignment, LineProps, Point, TextProps, VerticalAlignment,
};
use sextant_scales::transform::Transform;
use std::str::FromStr;
use strum::{Display, EnumString, VariantNames};

use crate::error::SextantGuidesError;

#[derive(
    Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AxisDirection {
    X,
    Y,
}

impl AxisDirection {
    pub fn group_name(&self) -> &'static str {
        match self {
            AxisDirection::X => "xaxis",
            AxisDirection::Y => "yaxis",
        }
    }

    fn tick_group_name(&self) -> &'static str {
        match self {
            AxisDirection::X => "xtick",
            AxisDirection::Y => "ytick",
        }
    }
}

/// Which side of the axes carries tick marks and labels
#[derive(
    Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TickSide {
    Top,
    Bottom,
    Left,
    Right,
    /// Marks on both sides, labels on the default side only
    Both,
}

impl TickSide {
    pub fn parse(s: &str) -> Result<Self, SextantGuidesError> {
        Self::from_str(s).map_err(|_| SextantGuidesError::InvalidTickSide {
            side: s.to_string(),
            direction: "any".to_string(),
        })
    }
}

/// Selects the major ticks, the minor ticks or both
#[derive(
    Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TickWhich {
    #[default]
    Major,
    Minor,
    Both,
}

impl TickWhich {
    pub fn parse(s: &str) -> Result<Self, SextantGuidesError> {
        Self::from_str(&s.to_lowercase())
            .map_err(|_| SextantGuidesError::InvalidTickWhich(s.to_string()))
    }

    pub fn includes_major(&self) -> bool {
        matches!(self, TickWhich::Major | TickWhich::Both)
    }

    pub fn includes_minor(&self) -> bool {
        matches!(self, TickWhich::Minor | TickWhich::Both)
    }
}

/// Per-draw inputs shared by every tick of one axis.
///
/// `transform` maps (position along the axis, fraction across the axes) for x ticks and
/// (fraction across, position along) for y ticks into display pixels.
#[derive(Debug, Clone, Copy)]
pub struct TickFrame<'a> {
    pub transform: &'a Transform,
    pub view: Interval,
    pub dpi: f64,
}

/// One tick: two marks, a grid line and two labels bound to a single position.
///
/// Ticks live in an axis-owned pool and are moved with `update_position` rather than
/// recreated, so style set on a pooled tick survives re-placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    direction: AxisDirection,
    major: bool,
    loc: f64,
    /// Mark length in points
    size: f64,
    /// Label distance from the axis line in points
    pad: f64,
    pub tick1_on: bool,
    pub tick2_on: bool,
    pub grid_on: bool,
    pub label1_on: bool,
    pub label2_on: bool,
    pub tick1_line: LineProps,
    pub tick2_line: LineProps,
    pub gridline: LineProps,
    pub label1: TextProps,
    pub label2: TextProps,
}

impl Tick {
    pub fn new(direction: AxisDirection, major: bool, style: &StyleConfig) -> Self {
        let (size, pad) = if major {
            (style.tick_major_size, style.tick_major_pad)
        } else {
            (style.tick_minor_size, style.tick_minor_pad)
        };
        let mark = LineProps {
            color: style.tick_color,
            line_width: style.line_width,
            antialiased: false,
            ..Default::default()
        };
        let gridline = LineProps {
            color: style.grid_color,
            line_width: style.grid_line_width,
            line_style: style.grid_line_style,
            antialiased: false,
            visible: true,
        };
        let label = TextProps {
            color: style.tick_color,
            font: FontProps {
                size: style.tick_label_size,
                ..Default::default()
            },
            visible: true,
            ..Default::default()
        };
        let (label1, label2) = match direction {
            AxisDirection::X => (
                label
                    .clone()
                    .with_alignment(HorizontalAlignment::Center, VerticalAlignment::Top),
                label.with_alignment(HorizontalAlignment::Center, VerticalAlignment::Bottom),
            ),
            AxisDirection::Y => (
                label
                    .clone()
                    .with_alignment(HorizontalAlignment::Right, VerticalAlignment::Center),
                label.with_alignment(HorizontalAlignment::Left, VerticalAlignment::Center),
            ),
        };
        Self {
            direction,
            major,
            loc: 0.0,
            size,
            pad,
            tick1_on: true,
            tick2_on: true,
            grid_on: style.axes_grid && major,
            label1_on: true,
            label2_on: false,
            tick1_line: mark.clone(),
            tick2_line: mark,
            gridline,
            label1,
            label2,
        }
    }

    pub fn direction(&self) -> AxisDirection {
        self.direction
    }

    pub fn is_major(&self) -> bool {
        self.major
    }

    pub fn loc(&self) -> f64 {
        self.loc
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn set_size(&mut self, points: f64) {
        self.size = points;
    }

    pub fn pad(&self) -> f64 {
        self.pad
    }

    /// Sets the label pad in points
    pub fn set_pad(&mut self, points: f64) {
        self.pad = points;
    }

    pub fn update_position(&mut self, loc: f64) {
        self.loc = loc;
    }

    pub fn set_label1(&mut self, text: &str) {
        self.label1.text = text.to_string();
    }

    pub fn set_label2(&mut self, text: &str) {
        self.label2.text = text.to_string();
    }

    /// Copies style from the pool prototype; position, size and pad stay as they are
    pub fn copy_style_from(&mut self, proto: &Tick) {
        self.label1.copy_style_from(&proto.label1);
        self.label2.copy_style_from(&proto.label2);
        self.tick1_line = proto.tick1_line.clone();
        self.tick2_line = proto.tick2_line.clone();
        self.gridline = proto.gridline.clone();
        self.tick1_on = proto.tick1_on;
        self.tick2_on = proto.tick2_on;
        self.label1_on = proto.label1_on;
        self.label2_on = proto.label2_on;
    }

    pub(crate) fn apply_style(&mut self, style: &StyleConfig) {
        let (size, pad) = if self.major {
            (style.tick_major_size, style.tick_major_pad)
        } else {
            (style.tick_minor_size, style.tick_minor_pad)
        };
        self.size = size;
        self.pad = pad;
        for line in [&mut self.tick1_line, &mut self.tick2_line] {
            line.color = style.tick_color;
            line.line_width = style.line_width;
        }
        self.gridline.color = style.grid_color;
        self.gridline.line_width = style.grid_line_width;
        self.gridline.line_style = style.grid_line_style;
        for label in [&mut self.label1, &mut self.label2] {
            label.color = style.tick_color;
            label.font.size = style.tick_label_size;
        }
    }

    /// Point in the blended tick space at `across` (axes fraction) for this tick's position
    fn point(&self, across: f64) -> Point {
        match self.direction {
            AxisDirection::X => Point::new(self.loc, across),
            AxisDirection::Y => Point::new(across, self.loc),
        }
    }

    /// Unit vector pointing from the side at `across` into the axes
    fn inward(&self, across: f64) -> (f64, f64) {
        let sign = if across < 0.5 { 1.0 } else { -1.0 };
        match self.direction {
            AxisDirection::X => (0.0, sign),
            AxisDirection::Y => (sign, 0.0),
        }
    }

    fn draw_mark<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        frame: &TickFrame,
        across: f64,
        props: &LineProps,
    ) -> Result<(), SextantGuidesError> {
        if !props.visible {
            return Ok(());
        }
        let start = frame.transform.forward(self.point(across))?;
        let length = points_to_pixels(self.size, frame.dpi);
        let (ux, uy) = self.inward(across);
        let end = start.offset(ux * length, uy * length);
        let points = [to_device(renderer, start), to_device(renderer, end)];
        renderer.draw_line(&points, props);
        Ok(())
    }

    fn draw_label<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        frame: &TickFrame,
        across: f64,
        props: &TextProps,
    ) -> Result<Bbox, SextantGuidesError> {
        let pad = points_to_pixels(self.pad, frame.dpi);
        let (ux, uy) = self.inward(across);
        // labels sit outside the axes, away from the marks
        let anchor = frame
            .transform
            .clone()
            .offset(-ux * pad, -uy * pad)
            .forward(self.point(across))?;
        let extent = props.extent_at(
            anchor,
            renderer.get_text_width_height(&props.text, &props.font),
        );
        if props.visible {
            let device = to_device(renderer, anchor);
            renderer.draw_text(device.x, device.y, &props.text, props, props.rotation);
        }
        Ok(extent)
    }

    /// Draws the tick and returns the display extent of label 1 when it was drawn.
    ///
    /// Marks and grid line are drawn only strictly inside the view so a position on the
    /// boundary is not drawn twice by adjacent tick sets.
    pub fn draw<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        frame: &TickFrame,
    ) -> Result<Option<Bbox>, SextantGuidesError> {
        renderer.open_group(self.direction.tick_group_name());
        let result = self.draw_parts(renderer, frame);
        renderer.close_group(self.direction.tick_group_name());
        result
    }

    fn draw_parts<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        frame: &TickFrame,
    ) -> Result<Option<Bbox>, SextantGuidesError> {
        let mid_point = frame.view.contains_open(self.loc);

        if mid_point && self.grid_on && self.gridline.visible {
            let start = frame.transform.forward(self.point(0.0))?;
            let end = frame.transform.forward(self.point(1.0))?;
            let points = [to_device(renderer, start), to_device(renderer, end)];
            renderer.draw_line(&points, &self.gridline);
        }
        if mid_point && self.tick1_on {
            self.draw_mark(renderer, frame, 0.0, &self.tick1_line)?;
        }
        if mid_point && self.tick2_on {
            self.draw_mark(renderer, frame, 1.0, &self.tick2_line)?;
        }

        let mut extent = None;
        if self.label1_on {
            extent = Some(self.draw_label(renderer, frame, 0.0, &self.label1)?);
        }
        if self.label2_on {
            self.draw_label(renderer, frame, 1.0, &self.label2)?;
        }
        Ok(extent)
    }
}
