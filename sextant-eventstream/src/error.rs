use sextant_guides::SextantGuidesError;
use sextant_scales::error::SextantScaleError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SextantNavigationError {
    #[error("Unknown navigation mode: {0}")]
    InvalidMode(String),

    #[error(transparent)]
    Guides(#[from] SextantGuidesError),

    #[error(transparent)]
    Scale(#[from] SextantScaleError),
}
