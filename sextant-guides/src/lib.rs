pub mod axes;
pub mod axis;
pub mod error;
pub mod figure;
pub mod tick;

pub use axes::{Axes, Limits};
pub use axis::Axis;
pub use error::SextantGuidesError;
pub use figure::Figure;
pub use tick::{AxisDirection, Tick, TickSide, TickWhich};
