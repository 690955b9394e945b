use sextant_common::error::SextantCommonError;
use sextant_scales::error::SextantScaleError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SextantGuidesError {
    #[error("Invalid scale: {0}")]
    InvalidScale(#[from] SextantScaleError),

    #[error(transparent)]
    Common(#[from] SextantCommonError),

    #[error("Tick side {side} is not valid for the {direction} axis")]
    InvalidTickSide { side: String, direction: String },

    #[error("Invalid tick selector: {0}")]
    InvalidTickWhich(String),

    #[error("Invalid limits: {0}")]
    InvalidLimits(String),

    #[error("No axes at index {0}")]
    AxesIndexOutOfRange(usize),
}
