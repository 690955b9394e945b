use sextant_common::canvas::{CanvasDimensions, Renderer};
use sextant_common::config::StyleConfig;
use sextant_common::types::{Bbox, Point};

use crate::axes::{Axes, Limits};
use crate::error::SextantGuidesError;

/// A canvas holding any number of axes, drawn in insertion order.
#[derive(Debug)]
pub struct Figure {
    axes: Vec<Axes>,
    dimensions: CanvasDimensions,
    style: StyleConfig,
}

impl Figure {
    pub fn new(dimensions: CanvasDimensions, style: StyleConfig) -> Result<Self, SextantGuidesError> {
        style.validate()?;
        Ok(Self {
            axes: Vec::new(),
            dimensions,
            style,
        })
    }

    pub fn dimensions(&self) -> &CanvasDimensions {
        &self.dimensions
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Adds an axes placed at `[left, bottom, width, height]` in figure fractions
    pub fn add_axes(&mut self, rect: [f64; 4]) -> usize {
        let [left, bottom, width, height] = rect;
        let bbox = Bbox::from_bounds(
            left * self.dimensions.width(),
            bottom * self.dimensions.height(),
            width * self.dimensions.width(),
            height * self.dimensions.height(),
        );
        let mut axes = Axes::new(bbox, &self.style);
        axes.set_dpi(self.dimensions.dpi);
        self.axes.push(axes);
        self.axes.len() - 1
    }

    pub fn axes(&self) -> &[Axes] {
        &self.axes
    }

    pub fn axes_mut(&mut self) -> &mut [Axes] {
        &mut self.axes
    }

    pub fn get(&self, index: usize) -> Result<&Axes, SextantGuidesError> {
        self.axes
            .get(index)
            .ok_or(SextantGuidesError::AxesIndexOutOfRange(index))
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Axes, SextantGuidesError> {
        self.axes
            .get_mut(index)
            .ok_or(SextantGuidesError::AxesIndexOutOfRange(index))
    }

    /// Indices of every navigable axes containing the display point
    pub fn axes_under(&self, point: Point) -> Vec<usize> {
        self.axes
            .iter()
            .enumerate()
            .filter(|(_, axes)| axes.navigate && axes.in_axes(point))
            .map(|(i, _)| i)
            .collect()
    }

    /// Topmost navigable axes under the point
    pub fn axes_at(&self, point: Point) -> Option<usize> {
        self.axes_under(point).last().copied()
    }

    pub fn current_limits(&self) -> Vec<Limits> {
        self.axes.iter().map(Axes::limits).collect()
    }

    /// Restores one `Limits` per axes. Nothing changes unless every entry is valid.
    pub fn apply_limits(&mut self, limits: &[Limits]) -> Result<(), SextantGuidesError> {
        if limits.len() != self.axes.len() {
            return Err(SextantGuidesError::InvalidLimits(format!(
                "expected {} entries, got {}",
                self.axes.len(),
                limits.len()
            )));
        }
        for (axes, lim) in self.axes.iter().zip(limits) {
            axes.check_limits(lim)?;
        }
        for (axes, lim) in self.axes.iter_mut().zip(limits) {
            axes.set_limits(lim)?;
        }
        Ok(())
    }

    pub fn refresh_locators(&mut self) {
        for axes in &mut self.axes {
            axes.refresh_locators();
        }
    }

    /// Draws every axes. A failing axes is logged and skipped; the first error is returned
    /// once the remaining axes have been drawn.
    #[tracing::instrument(skip_all, fields(axes = self.axes.len()))]
    pub fn draw<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Result<(), SextantGuidesError> {
        let mut first_error = None;
        for (index, axes) in self.axes.iter_mut().enumerate() {
            if let Err(err) = axes.draw(renderer) {
                tracing::warn!(index, error = %err, "failed to draw axes");
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
