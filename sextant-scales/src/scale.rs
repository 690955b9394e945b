use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString, VariantNames};

use crate::error::SextantScaleError;
use crate::formatter::{Formatter, LogFormatter, ScalarFormatter};
use crate::locator::{AutoLocator, Locator, LogLocator};
use crate::transform::{LogTransform, Transform};

/// How data values along one axis map onto the axes' linear layout space
#[derive(
    Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScaleType {
    #[default]
    Linear,
    Log,
}

impl ScaleType {
    pub fn parse(name: &str) -> Result<Self, SextantScaleError> {
        Self::from_str(name).map_err(|_| SextantScaleError::InvalidScaleName(name.to_string()))
    }

    pub fn is_log(&self) -> bool {
        matches!(self, ScaleType::Log)
    }

    /// Checks that `value` is representable on this scale
    pub fn validate(&self, value: f64) -> Result<(), SextantScaleError> {
        if !value.is_finite() {
            return Err(SextantScaleError::NonFiniteValue(value));
        }
        if self.is_log() && value <= 0.0 {
            return Err(SextantScaleError::NonPositiveLog(value));
        }
        Ok(())
    }

    /// Maps a value into scaled space (identity for linear, log10 for log)
    pub fn to_scaled(&self, value: f64) -> Result<f64, SextantScaleError> {
        self.validate(value)?;
        Ok(match self {
            ScaleType::Linear => value,
            ScaleType::Log => value.log10(),
        })
    }

    pub fn from_scaled(&self, value: f64) -> f64 {
        match self {
            ScaleType::Linear => value,
            ScaleType::Log => 10f64.powf(value),
        }
    }

    /// Per-axis non-linear part of the data transform
    pub fn transform_x(&self) -> Transform {
        match self {
            ScaleType::Linear => Transform::identity(),
            ScaleType::Log => Transform::Log(LogTransform::new(true, false)),
        }
    }

    pub fn transform_y(&self) -> Transform {
        match self {
            ScaleType::Linear => Transform::identity(),
            ScaleType::Log => Transform::Log(LogTransform::new(false, true)),
        }
    }

    pub fn default_major_locator(&self, max_ticks: usize) -> Locator {
        match self {
            ScaleType::Linear => Locator::Auto(AutoLocator::new(max_ticks)),
            ScaleType::Log => Locator::Log(LogLocator::decades(max_ticks)),
        }
    }

    pub fn default_major_formatter(&self) -> Formatter {
        match self {
            ScaleType::Linear => Formatter::Scalar(ScalarFormatter::default()),
            ScaleType::Log => Formatter::Log(LogFormatter::default()),
        }
    }
}
