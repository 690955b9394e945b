use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString, VariantNames};

use crate::error::SextantCommonError;

pub type Color = [f32; 4];

pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];

/// A point in display space (pixels, y increasing upward)
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned box stored as its lower-left and upper-right corners.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bbox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Bbox {
    pub fn from_bounds(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_corners(Point::new(x, y), Point::new(x + width, y + height))
    }

    /// Builds the box spanned by two opposite corners, in any order
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x0: a.x.min(b.x),
            y0: a.y.min(b.y),
            x1: a.x.max(b.x),
            y1: a.y.max(b.y),
        }
    }

    pub fn unit() -> Self {
        Self::from_bounds(0.0, 0.0, 1.0, 1.0)
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x0 && point.x <= self.x1 && point.y >= self.y0 && point.y <= self.y1
    }

    pub fn union(&self, other: &Bbox) -> Bbox {
        Bbox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Union of all boxes, `None` when the iterator is empty
    pub fn union_all<'a>(boxes: impl IntoIterator<Item = &'a Bbox>) -> Option<Bbox> {
        boxes
            .into_iter()
            .fold(None, |acc: Option<Bbox>, b| match acc {
                Some(acc) => Some(acc.union(b)),
                None => Some(*b),
            })
    }
}

#[derive(
    Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

impl LineStyle {
    pub fn parse(s: &str) -> Result<Self, SextantCommonError> {
        Self::from_str(s).map_err(|_| SextantCommonError::InvalidLineStyle(s.to_string()))
    }
}

#[derive(
    Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HorizontalAlignment {
    Left,
    #[default]
    Center,
    Right,
}

impl HorizontalAlignment {
    pub fn parse(s: &str) -> Result<Self, SextantCommonError> {
        Self::from_str(s).map_err(|_| SextantCommonError::InvalidAlignment(s.to_string()))
    }
}

#[derive(
    Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VerticalAlignment {
    Top,
    #[default]
    Center,
    Bottom,
}

impl VerticalAlignment {
    pub fn parse(s: &str) -> Result<Self, SextantCommonError> {
        Self::from_str(s).map_err(|_| SextantCommonError::InvalidAlignment(s.to_string()))
    }
}

/// Stroke properties of a line primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineProps {
    pub color: Color,
    pub line_width: f64,
    pub line_style: LineStyle,
    pub antialiased: bool,
    pub visible: bool,
}

impl Default for LineProps {
    fn default() -> Self {
        Self {
            color: BLACK,
            line_width: 1.0,
            line_style: LineStyle::Solid,
            antialiased: false,
            visible: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontProps {
    /// Font size in points
    pub size: f64,
    pub family: String,
    pub bold: bool,
}

impl Default for FontProps {
    fn default() -> Self {
        Self {
            size: 10.0,
            family: "sans-serif".to_string(),
            bold: false,
        }
    }
}

/// A text primitive: the string plus everything needed to lay it out
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextProps {
    pub text: String,
    pub color: Color,
    pub font: FontProps,
    pub halign: HorizontalAlignment,
    pub valign: VerticalAlignment,
    /// Rotation in degrees, counter-clockwise
    pub rotation: f64,
    pub visible: bool,
}

impl TextProps {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: BLACK,
            visible: true,
            ..Default::default()
        }
    }

    pub fn with_alignment(mut self, halign: HorizontalAlignment, valign: VerticalAlignment) -> Self {
        self.halign = halign;
        self.valign = valign;
        self
    }

    /// Copies every property except the text itself
    pub fn copy_style_from(&mut self, other: &TextProps) {
        self.color = other.color;
        self.font = other.font.clone();
        self.halign = other.halign;
        self.valign = other.valign;
        self.rotation = other.rotation;
        self.visible = other.visible;
    }

    /// Box covered by this text when anchored at `anchor` with the given extent.
    ///
    /// Rotations of +/-90 degrees swap the extent.
    pub fn extent_at(&self, anchor: Point, (width, height): (f64, f64)) -> Bbox {
        let (width, height) = if (self.rotation.abs() - 90.0).abs() < 1e-9 {
            (height, width)
        } else {
            (width, height)
        };
        let x0 = match self.halign {
            HorizontalAlignment::Left => anchor.x,
            HorizontalAlignment::Center => anchor.x - width / 2.0,
            HorizontalAlignment::Right => anchor.x - width,
        };
        let y0 = match self.valign {
            VerticalAlignment::Bottom => anchor.y,
            VerticalAlignment::Center => anchor.y - height / 2.0,
            VerticalAlignment::Top => anchor.y - height,
        };
        Bbox::from_bounds(x0, y0, width, height)
    }
}
