use serde::{Deserialize, Serialize};

use crate::error::SextantCommonError;
use crate::types::{Color, LineStyle, BLACK};

/// Style defaults consumed when axes, axis and tick objects are constructed.
///
/// Every field falls back to its default when missing from a serialized config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub axes_grid: bool,
    /// Tick mark lengths in points
    pub tick_major_size: f64,
    pub tick_minor_size: f64,
    /// Distance between tick marks and their labels in points
    pub tick_major_pad: f64,
    pub tick_minor_pad: f64,
    pub tick_color: Color,
    pub tick_label_size: f64,
    pub grid_color: Color,
    pub grid_line_width: f64,
    pub grid_line_style: LineStyle,
    pub axes_label_size: f64,
    pub axes_label_color: Color,
    pub line_width: f64,
    pub dpi: f64,
    pub max_ticks: usize,
    /// Upper bound on positions accepted from any locator per draw
    pub tick_safety_cap: usize,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            axes_grid: false,
            tick_major_size: 4.0,
            tick_minor_size: 2.0,
            tick_major_pad: 4.0,
            tick_minor_pad: 4.0,
            tick_color: BLACK,
            tick_label_size: 10.0,
            grid_color: BLACK,
            grid_line_width: 0.5,
            grid_line_style: LineStyle::Dotted,
            axes_label_size: 12.0,
            axes_label_color: BLACK,
            line_width: 1.0,
            dpi: 80.0,
            max_ticks: 9,
            tick_safety_cap: 1000,
        }
    }
}

impl StyleConfig {
    pub fn from_json(json: &str) -> Result<Self, SextantCommonError> {
        let config: StyleConfig = serde_json::from_str(json)
            .map_err(|err| SextantCommonError::InvalidStyle(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SextantCommonError> {
        let lengths = [
            ("tick_major_size", self.tick_major_size),
            ("tick_minor_size", self.tick_minor_size),
            ("tick_major_pad", self.tick_major_pad),
            ("tick_minor_pad", self.tick_minor_pad),
            ("tick_label_size", self.tick_label_size),
            ("grid_line_width", self.grid_line_width),
            ("axes_label_size", self.axes_label_size),
            ("line_width", self.line_width),
        ];
        if let Some((name, value)) = lengths
            .iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Err(SextantCommonError::InvalidStyle(format!(
                "{name} must be a non-negative number, got {value}"
            )));
        }
        if !self.dpi.is_finite() || self.dpi <= 0.0 {
            return Err(SextantCommonError::InvalidStyle(format!(
                "dpi must be positive, got {}",
                self.dpi
            )));
        }
        if self.max_ticks == 0 || self.tick_safety_cap == 0 {
            return Err(SextantCommonError::InvalidStyle(
                "max_ticks and tick_safety_cap must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
