use crate::error::SextantCommonError;
use crate::types::{Bbox, FontProps, LineProps, Point, TextProps};

/// Canvas size in display pixels plus the resolution used to convert points to pixels
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CanvasDimensions {
    pub size: [f64; 2],
    pub dpi: f64,
}

impl CanvasDimensions {
    pub fn width(&self) -> f64 {
        self.size[0]
    }

    pub fn height(&self) -> f64 {
        self.size[1]
    }

    /// Converts a length in typographic points (1/72 inch) to pixels
    pub fn points_to_pixels(&self, points: f64) -> f64 {
        points_to_pixels(points, self.dpi)
    }
}

pub fn points_to_pixels(points: f64, dpi: f64) -> f64 {
    points * dpi / 72.0
}

/// Drawing backend consumed by the guides.
///
/// All coordinates passed to the renderer are display pixels with y increasing upward.
/// Backends whose y axis grows downward return `true` from `flipy` and callers convert
/// through [`to_device`] before emitting primitives.
pub trait Renderer {
    fn open_group(&mut self, name: &str);

    fn close_group(&mut self, name: &str);

    fn get_canvas_width_height(&self) -> (f64, f64);

    fn get_text_width_height(&self, text: &str, font: &FontProps) -> (f64, f64);

    fn flipy(&self) -> bool {
        false
    }

    fn draw_line(&mut self, points: &[Point], props: &LineProps);

    fn draw_text(&mut self, x: f64, y: f64, text: &str, props: &TextProps, angle: f64);

    /// Optional capability, backends without filled rectangles keep the default
    fn draw_rectangle(&mut self, _bbox: &Bbox, _props: &LineProps) -> Result<(), SextantCommonError> {
        Err(SextantCommonError::Unsupported("draw_rectangle"))
    }
}

/// Maps a display point to the renderer's device orientation
pub fn to_device<R: Renderer + ?Sized>(renderer: &R, point: Point) -> Point {
    if renderer.flipy() {
        let (_, height) = renderer.get_canvas_width_height();
        Point::new(point.x, height - point.y)
    } else {
        point
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    OpenGroup(String),
    CloseGroup(String),
    Line {
        points: Vec<Point>,
        props: LineProps,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        props: TextProps,
        angle: f64,
    },
    Rectangle {
        bbox: Bbox,
        props: LineProps,
    },
}

/// Headless renderer that records every call in order.
///
/// Text metrics are approximated as `0.6 * size` per character by `size` tall.
#[derive(Debug, Clone)]
pub struct RecordingRenderer {
    pub dimensions: CanvasDimensions,
    pub flipy: bool,
    pub supports_rectangles: bool,
    pub calls: Vec<DrawCall>,
}

impl RecordingRenderer {
    pub fn new(dimensions: CanvasDimensions) -> Self {
        Self {
            dimensions,
            flipy: false,
            supports_rectangles: true,
            calls: Vec::new(),
        }
    }

    pub fn with_flipy(mut self, flipy: bool) -> Self {
        self.flipy = flipy;
        self
    }

    pub fn with_rectangles(mut self, supported: bool) -> Self {
        self.supports_rectangles = supported;
        self
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn lines(&self) -> impl Iterator<Item = (&[Point], &LineProps)> {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Line { points, props } => Some((points.as_slice(), props)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Renderer for RecordingRenderer {
    fn open_group(&mut self, name: &str) {
        self.calls.push(DrawCall::OpenGroup(name.to_string()));
    }

    fn close_group(&mut self, name: &str) {
        self.calls.push(DrawCall::CloseGroup(name.to_string()));
    }

    fn get_canvas_width_height(&self) -> (f64, f64) {
        (self.dimensions.width(), self.dimensions.height())
    }

    fn get_text_width_height(&self, text: &str, font: &FontProps) -> (f64, f64) {
        let size = self.dimensions.points_to_pixels(font.size);
        (text.chars().count() as f64 * size * 0.6, size)
    }

    fn flipy(&self) -> bool {
        self.flipy
    }

    fn draw_line(&mut self, points: &[Point], props: &LineProps) {
        self.calls.push(DrawCall::Line {
            points: points.to_vec(),
            props: props.clone(),
        });
    }

    fn draw_text(&mut self, x: f64, y: f64, text: &str, props: &TextProps, angle: f64) {
        self.calls.push(DrawCall::Text {
            x,
            y,
            text: text.to_string(),
            props: props.clone(),
            angle,
        });
    }

    fn draw_rectangle(&mut self, bbox: &Bbox, props: &LineProps) -> Result<(), SextantCommonError> {
        if !self.supports_rectangles {
            return Err(SextantCommonError::Unsupported("draw_rectangle"));
        }
        self.calls.push(DrawCall::Rectangle {
            bbox: *bbox,
            props: props.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    fn dims() -> CanvasDimensions {
        CanvasDimensions {
            size: [400.0, 300.0],
            dpi: 72.0,
        }
    }

    #[test]
    fn test_points_to_pixels() {
        let dims = CanvasDimensions {
            size: [100.0, 100.0],
            dpi: 144.0,
        };
        assert_approx_eq!(f64, dims.points_to_pixels(5.0), 10.0);
    }

    #[test]
    fn test_to_device_flips_y() {
        let renderer = RecordingRenderer::new(dims()).with_flipy(true);
        assert_eq!(to_device(&renderer, Point::new(10.0, 20.0)), Point::new(10.0, 280.0));

        let renderer = RecordingRenderer::new(dims());
        assert_eq!(to_device(&renderer, Point::new(10.0, 20.0)), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_missing_rectangle_support() {
        let mut renderer = RecordingRenderer::new(dims()).with_rectangles(false);
        let result = renderer.draw_rectangle(&Bbox::unit(), &LineProps::default());
        assert_eq!(result, Err(SextantCommonError::Unsupported("draw_rectangle")));
        assert!(renderer.calls.is_empty());
    }

    #[test]
    fn test_records_in_order() {
        let mut renderer = RecordingRenderer::new(dims());
        renderer.open_group("axis");
        renderer.draw_text(1.0, 2.0, "0.5", &TextProps::new("0.5"), 0.0);
        renderer.close_group("axis");
        assert_eq!(renderer.calls.len(), 3);
        assert_eq!(renderer.texts().collect::<Vec<_>>(), vec!["0.5"]);
        let (w, h) = renderer.get_text_width_height("0.5", &FontProps::default());
        assert_approx_eq!(f64, w, 18.0);
        assert_approx_eq!(f64, h, 10.0);
    }
}
