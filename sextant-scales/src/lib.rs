pub mod array;
pub mod error;
pub mod formatter;
pub mod locator;
pub mod scale;
pub mod transform;

pub use error::SextantScaleError;
pub use formatter::{Formatter, TickFormatter};
pub use locator::{Locator, TickLocator};
pub use scale::ScaleType;
pub use transform::{Affine2D, LogTransform, Transform};
