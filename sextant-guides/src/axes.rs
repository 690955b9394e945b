use serde::{Deserialize, Serialize};
use sextant_common::canvas::{to_device, Renderer};
use sextant_common::config::StyleConfig;
use sextant_common::error::SextantCommonError;
use sextant_common::interval::Interval;
use sextant_common::types::{Bbox, LineProps, Point};
use sextant_scales::error::SextantScaleError;
use sextant_scales::scale::ScaleType;
use sextant_scales::transform::{Affine2D, Transform};

use crate::axis::{Axis, AxisContext};
use crate::error::SextantGuidesError;
use crate::tick::{AxisDirection, TickWhich};

/// Checks a limit pair against `scale`; equal bounds are rejected
pub(crate) fn check_bounds(scale: ScaleType, (lo, hi): (f64, f64)) -> Result<(), SextantGuidesError> {
    scale.validate(lo)?;
    scale.validate(hi)?;
    if lo == hi {
        return Err(SextantGuidesError::InvalidLimits(format!(
            "lower and upper limit are both {lo}"
        )));
    }
    Ok(())
}

/// View limits of one axes, the unit stored by the navigation history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

/// A plotting area: sole owner of its view/data intervals and of both axes.
#[derive(Debug)]
pub struct Axes {
    bbox: Bbox,
    view_x: Interval,
    view_y: Interval,
    data_x: Interval,
    data_y: Interval,
    x_scale: ScaleType,
    y_scale: ScaleType,
    xaxis: Axis,
    yaxis: Axis,
    dpi: f64,
    pub frame: LineProps,
    pub frame_on: bool,
    /// Whether interactive navigation acts on this axes
    pub navigate: bool,
}

impl Axes {
    /// Creates an axes occupying `bbox` (display pixels) with unit view limits
    pub fn new(bbox: Bbox, style: &StyleConfig) -> Self {
        Self {
            bbox,
            view_x: Interval::new(0.0, 1.0),
            view_y: Interval::new(0.0, 1.0),
            data_x: Interval::new(0.0, 1.0),
            data_y: Interval::new(0.0, 1.0),
            x_scale: ScaleType::Linear,
            y_scale: ScaleType::Linear,
            xaxis: Axis::new(AxisDirection::X, style),
            yaxis: Axis::new(AxisDirection::Y, style),
            dpi: style.dpi,
            frame: LineProps {
                line_width: style.line_width,
                ..Default::default()
            },
            frame_on: true,
            navigate: true,
        }
    }

    pub fn bbox(&self) -> &Bbox {
        &self.bbox
    }

    pub fn set_bbox(&mut self, bbox: Bbox) {
        self.bbox = bbox;
    }

    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    pub fn set_dpi(&mut self, dpi: f64) {
        self.dpi = dpi;
    }

    pub fn xaxis(&self) -> &Axis {
        &self.xaxis
    }

    pub fn xaxis_mut(&mut self) -> &mut Axis {
        &mut self.xaxis
    }

    pub fn yaxis(&self) -> &Axis {
        &self.yaxis
    }

    pub fn yaxis_mut(&mut self) -> &mut Axis {
        &mut self.yaxis
    }

    pub fn view_x(&self) -> Interval {
        self.view_x
    }

    pub fn view_y(&self) -> Interval {
        self.view_y
    }

    pub fn data_x(&self) -> Interval {
        self.data_x
    }

    pub fn data_y(&self) -> Interval {
        self.data_y
    }

    pub fn xlim(&self) -> (f64, f64) {
        self.view_x.bounds()
    }

    pub fn ylim(&self) -> (f64, f64) {
        self.view_y.bounds()
    }

    pub fn x_scale(&self) -> ScaleType {
        self.x_scale
    }

    pub fn y_scale(&self) -> ScaleType {
        self.y_scale
    }

    /// Validates limits against the current scales without applying them
    pub fn check_limits(&self, limits: &Limits) -> Result<(), SextantGuidesError> {
        check_bounds(self.x_scale, limits.x)?;
        check_bounds(self.y_scale, limits.y)
    }

    pub fn set_xlim(&mut self, lo: f64, hi: f64) -> Result<(), SextantGuidesError> {
        check_bounds(self.x_scale, (lo, hi))?;
        self.view_x.set_bounds(lo, hi);
        Ok(())
    }

    pub fn set_ylim(&mut self, lo: f64, hi: f64) -> Result<(), SextantGuidesError> {
        check_bounds(self.y_scale, (lo, hi))?;
        self.view_y.set_bounds(lo, hi);
        Ok(())
    }

    pub fn limits(&self) -> Limits {
        Limits {
            x: self.xlim(),
            y: self.ylim(),
        }
    }

    /// Applies both limit pairs, or neither when either is invalid
    pub fn set_limits(&mut self, limits: &Limits) -> Result<(), SextantGuidesError> {
        self.check_limits(limits)?;
        self.view_x.set_bounds(limits.x.0, limits.x.1);
        self.view_y.set_bounds(limits.y.0, limits.y.1);
        Ok(())
    }

    /// Switches the x scale and installs that scale's default major locator and formatter
    pub fn set_xscale(&mut self, scale: ScaleType) -> Result<(), SextantGuidesError> {
        check_bounds(scale, self.xlim())?;
        let max_ticks = self.xaxis.style().max_ticks;
        self.x_scale = scale;
        self.xaxis.set_major_locator(scale.default_major_locator(max_ticks));
        self.xaxis.set_major_formatter(scale.default_major_formatter());
        Ok(())
    }

    pub fn set_yscale(&mut self, scale: ScaleType) -> Result<(), SextantGuidesError> {
        check_bounds(scale, self.ylim())?;
        let max_ticks = self.yaxis.style().max_ticks;
        self.y_scale = scale;
        self.yaxis.set_major_locator(scale.default_major_locator(max_ticks));
        self.yaxis.set_major_formatter(scale.default_major_formatter());
        Ok(())
    }

    pub fn set_xscale_name(&mut self, name: &str) -> Result<(), SextantGuidesError> {
        self.set_xscale(ScaleType::parse(name)?)
    }

    pub fn set_yscale_name(&mut self, name: &str) -> Result<(), SextantGuidesError> {
        self.set_yscale(ScaleType::parse(name)?)
    }

    /// Grows the data intervals to cover `points`
    pub fn update_datalim(&mut self, points: &[Point]) {
        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
        self.data_x.update(&xs, false);
        self.data_y.update(&ys, false);
    }

    /// Sets the view limits to the data limits, widening degenerate ranges
    pub fn autoscale_view(&mut self) -> Result<(), SextantGuidesError> {
        let x = widen(self.x_scale, self.data_x.bounds());
        let y = widen(self.y_scale, self.data_y.bounds());
        self.set_limits(&Limits { x, y })
    }

    pub fn set_xticks(&mut self, ticks: Vec<f64>) -> Result<(), SextantGuidesError> {
        self.xaxis.set_ticks(ticks, &mut self.view_x, self.x_scale)
    }

    pub fn set_yticks(&mut self, ticks: Vec<f64>) -> Result<(), SextantGuidesError> {
        self.yaxis.set_ticks(ticks, &mut self.view_y, self.y_scale)
    }

    pub fn grid(&mut self, on: Option<bool>, which: TickWhich) {
        self.xaxis.grid(on, which);
        self.yaxis.grid(on, which);
    }

    pub fn pan_x(&mut self, steps: i32) -> Result<(), SextantGuidesError> {
        self.xaxis.pan(&mut self.view_x, self.x_scale, steps)
    }

    pub fn pan_y(&mut self, steps: i32) -> Result<(), SextantGuidesError> {
        self.yaxis.pan(&mut self.view_y, self.y_scale, steps)
    }

    pub fn zoom_x(&mut self, direction: i32) -> Result<(), SextantGuidesError> {
        self.xaxis.zoom(&mut self.view_x, self.x_scale, direction)
    }

    pub fn zoom_y(&mut self, direction: i32) -> Result<(), SextantGuidesError> {
        self.yaxis.zoom(&mut self.view_y, self.y_scale, direction)
    }

    pub fn refresh_locators(&mut self) {
        self.xaxis.refresh_locators();
        self.yaxis.refresh_locators();
    }

    /// Data coordinates to display pixels: per-axis log scaling, then the view to bbox map
    pub fn trans_data(&self) -> Result<Transform, SextantScaleError> {
        let (x0, x1) = self.view_x.bounds();
        let (y0, y1) = self.view_y.bounds();
        let affine = Affine2D::from_ranges(
            (self.x_scale.to_scaled(x0)?, self.x_scale.to_scaled(x1)?),
            (self.bbox.x0, self.bbox.x1),
            (self.y_scale.to_scaled(y0)?, self.y_scale.to_scaled(y1)?),
            (self.bbox.y0, self.bbox.y1),
        )?;
        Ok(self
            .x_scale
            .transform_x()
            .compose(self.y_scale.transform_y())
            .compose(Transform::Affine(affine)))
    }

    /// Axes fractions (0..1 in both directions) to display pixels
    pub fn trans_axes(&self) -> Result<Transform, SextantScaleError> {
        Ok(Transform::Affine(Affine2D::from_ranges(
            (0.0, 1.0),
            (self.bbox.x0, self.bbox.x1),
            (0.0, 1.0),
            (self.bbox.y0, self.bbox.y1),
        )?))
    }

    /// Data x with axes y, used by the x ticks
    pub fn x_tick_transform(&self) -> Result<Transform, SextantScaleError> {
        Transform::blend(self.trans_data()?, self.trans_axes()?)
    }

    /// Axes x with data y, used by the y ticks
    pub fn y_tick_transform(&self) -> Result<Transform, SextantScaleError> {
        Transform::blend(self.trans_axes()?, self.trans_data()?)
    }

    pub fn in_axes(&self, point: Point) -> bool {
        self.bbox.contains(point)
    }

    pub fn draw<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Result<(), SextantGuidesError> {
        let x_ctx = AxisContext {
            view: self.view_x,
            data: self.data_x,
            transform: self.x_tick_transform()?,
            bbox: self.bbox,
            dpi: self.dpi,
        };
        let y_ctx = AxisContext {
            view: self.view_y,
            data: self.data_y,
            transform: self.y_tick_transform()?,
            bbox: self.bbox,
            dpi: self.dpi,
        };

        renderer.open_group("axes");
        let result = self.draw_contents(renderer, &x_ctx, &y_ctx);
        renderer.close_group("axes");
        result
    }

    fn draw_contents<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        x_ctx: &AxisContext,
        y_ctx: &AxisContext,
    ) -> Result<(), SextantGuidesError> {
        if self.frame_on && self.frame.visible {
            let corners = Bbox::from_corners(
                to_device(renderer, Point::new(self.bbox.x0, self.bbox.y0)),
                to_device(renderer, Point::new(self.bbox.x1, self.bbox.y1)),
            );
            match renderer.draw_rectangle(&corners, &self.frame) {
                Ok(()) => {}
                Err(SextantCommonError::Unsupported(capability)) => {
                    tracing::warn!(capability, "renderer cannot draw the axes frame, skipping it");
                }
                Err(err) => return Err(err.into()),
            }
        }
        self.xaxis.draw(renderer, x_ctx)?;
        self.yaxis.draw(renderer, y_ctx)?;
        Ok(())
    }
}

fn widen(scale: ScaleType, (lo, hi): (f64, f64)) -> (f64, f64) {
    if lo != hi {
        return (lo, hi);
    }
    match scale {
        ScaleType::Linear if lo == 0.0 => (-1.0, 1.0),
        ScaleType::Linear => (lo - lo.abs() * 0.1, hi + hi.abs() * 0.1),
        ScaleType::Log => (lo / 10.0, hi * 10.0),
    }
}
