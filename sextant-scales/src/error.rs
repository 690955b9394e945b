#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SextantScaleError {
    #[error("Log scale requires positive values, got {0}")]
    NonPositiveLog(f64),

    #[error("Degenerate interval [{lo}, {hi}]")]
    DegenerateInterval { lo: f64, hi: f64 },

    #[error("Transform is singular and cannot be inverted")]
    SingularTransform,

    #[error("Non-finite value: {0}")]
    NonFiniteValue(f64),

    #[error("Blended transforms require separable x and y components")]
    NonSeparableBlend,

    #[error("Invalid locator: {0}")]
    InvalidLocator(String),

    #[error("Invalid formatter: {0}")]
    InvalidFormatter(String),

    #[error("Invalid scale name: {0}")]
    InvalidScaleName(String),
}
