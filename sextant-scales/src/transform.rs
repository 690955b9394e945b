use sextant_common::types::Point;

use crate::error::SextantScaleError;

/// 2D affine map `x' = a*x + b*y + tx`, `y' = c*x + d*y + ty`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine2D {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for Affine2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Affine2D {
    pub const fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }

    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: sy,
            tx: 0.0,
            ty: 0.0,
        }
    }

    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            tx,
            ty,
        }
    }

    /// Maps `src_x.0 -> dst_x.0`, `src_x.1 -> dst_x.1` and likewise for y.
    ///
    /// Source ranges may be inverted; a zero-width source range has no such map.
    pub fn from_ranges(
        src_x: (f64, f64),
        dst_x: (f64, f64),
        src_y: (f64, f64),
        dst_y: (f64, f64),
    ) -> Result<Self, SextantScaleError> {
        let (sx, tx) = range_map(src_x, dst_x)?;
        let (sy, ty) = range_map(src_y, dst_y)?;
        Ok(Self {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: sy,
            tx,
            ty,
        })
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.b * p.y + self.tx,
            self.c * p.x + self.d * p.y + self.ty,
        )
    }

    /// Returns the map that applies `self` first and `next` second
    pub fn then(&self, next: &Affine2D) -> Affine2D {
        Affine2D {
            a: next.a * self.a + next.b * self.c,
            b: next.a * self.b + next.b * self.d,
            c: next.c * self.a + next.d * self.c,
            d: next.c * self.b + next.d * self.d,
            tx: next.a * self.tx + next.b * self.ty + next.tx,
            ty: next.c * self.tx + next.d * self.ty + next.ty,
        }
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    pub fn invert(&self) -> Result<Affine2D, SextantScaleError> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(SextantScaleError::SingularTransform);
        }
        let a = self.d / det;
        let b = -self.b / det;
        let c = -self.c / det;
        let d = self.a / det;
        Ok(Affine2D {
            a,
            b,
            c,
            d,
            tx: -(a * self.tx + b * self.ty),
            ty: -(c * self.tx + d * self.ty),
        })
    }

    /// True when output x depends only on input x and output y only on input y
    pub fn is_separable(&self) -> bool {
        self.b == 0.0 && self.c == 0.0
    }
}

fn range_map(src: (f64, f64), dst: (f64, f64)) -> Result<(f64, f64), SextantScaleError> {
    let span = src.1 - src.0;
    if span == 0.0 || !span.is_finite() {
        return Err(SextantScaleError::DegenerateInterval {
            lo: src.0,
            hi: src.1,
        });
    }
    let scale = (dst.1 - dst.0) / span;
    Ok((scale, dst.0 - scale * src.0))
}

/// Logarithmic scaling applied independently to the flagged coordinates.
///
/// When `inverted` is set the node exponentiates instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogTransform {
    pub x: bool,
    pub y: bool,
    pub base: f64,
    pub inverted: bool,
}

impl LogTransform {
    pub fn new(x: bool, y: bool) -> Self {
        Self {
            x,
            y,
            base: 10.0,
            inverted: false,
        }
    }

    fn log(&self, v: f64) -> Result<f64, SextantScaleError> {
        if !v.is_finite() {
            return Err(SextantScaleError::NonFiniteValue(v));
        }
        if v <= 0.0 {
            return Err(SextantScaleError::NonPositiveLog(v));
        }
        Ok(v.log(self.base))
    }

    fn exp(&self, v: f64) -> Result<f64, SextantScaleError> {
        if !v.is_finite() {
            return Err(SextantScaleError::NonFiniteValue(v));
        }
        Ok(self.base.powf(v))
    }

    fn map(&self, p: Point, exponentiate: bool) -> Result<Point, SextantScaleError> {
        let f = |v| if exponentiate { self.exp(v) } else { self.log(v) };
        let x = if self.x { f(p.x)? } else { p.x };
        let y = if self.y { f(p.y)? } else { p.y };
        Ok(Point::new(x, y))
    }

    pub fn forward(&self, p: Point) -> Result<Point, SextantScaleError> {
        self.map(p, self.inverted)
    }

    pub fn inverse(&self, p: Point) -> Result<Point, SextantScaleError> {
        self.map(p, !self.inverted)
    }

    pub fn inverted(&self) -> LogTransform {
        LogTransform {
            inverted: !self.inverted,
            ..*self
        }
    }
}

/// Stand-in for the coordinate a blended component ignores; valid under every scale
const BLEND_PROBE: f64 = 1.0;

/// A node in the transform graph mapping between data, axes and display space.
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    Affine(Affine2D),
    Log(LogTransform),
    /// Applies the first transform, then the second
    Composite(Box<Transform>, Box<Transform>),
    /// Takes x from one transform and y from another
    Blended {
        x: Box<Transform>,
        y: Box<Transform>,
    },
    /// Inner transform followed by a translation in display pixels
    Offset {
        inner: Box<Transform>,
        dx: f64,
        dy: f64,
    },
    /// Snapshot with its matrix cached for the duration of one draw.
    ///
    /// `matrix` is present when the snapshot reduces to a single affine map.
    Frozen {
        source: Box<Transform>,
        matrix: Option<Affine2D>,
    },
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Transform::Affine(Affine2D::identity())
    }

    /// Blends the x component of `x` with the y component of `y`.
    ///
    /// Both components must be separable, otherwise the blend has no exact inverse.
    pub fn blend(x: Transform, y: Transform) -> Result<Transform, SextantScaleError> {
        if !x.is_separable() || !y.is_separable() {
            return Err(SextantScaleError::NonSeparableBlend);
        }
        Ok(Transform::Blended {
            x: Box::new(x),
            y: Box::new(y),
        })
    }

    /// Appends a translation of `(dx, dy)` display pixels
    pub fn offset(self, dx: f64, dy: f64) -> Transform {
        Transform::Offset {
            inner: Box::new(self),
            dx,
            dy,
        }
    }

    /// Returns a transform that applies `self` first and then `next`
    pub fn compose(self, next: Transform) -> Transform {
        match (self, next) {
            (Transform::Affine(first), Transform::Affine(second)) => {
                Transform::Affine(first.then(&second))
            }
            (first, second) => Transform::Composite(Box::new(first), Box::new(second)),
        }
    }

    pub fn forward(&self, p: Point) -> Result<Point, SextantScaleError> {
        match self {
            Transform::Affine(affine) => Ok(affine.apply(p)),
            Transform::Log(log) => log.forward(p),
            Transform::Composite(first, second) => second.forward(first.forward(p)?),
            Transform::Blended { x, y } => {
                let px = x.forward(Point::new(p.x, BLEND_PROBE))?;
                let py = y.forward(Point::new(BLEND_PROBE, p.y))?;
                Ok(Point::new(px.x, py.y))
            }
            Transform::Offset { inner, dx, dy } => Ok(inner.forward(p)?.offset(*dx, *dy)),
            Transform::Frozen { source, matrix } => match matrix {
                Some(matrix) => Ok(matrix.apply(p)),
                None => source.forward(p),
            },
        }
    }

    pub fn inverse(&self, p: Point) -> Result<Point, SextantScaleError> {
        match self {
            Transform::Affine(affine) => Ok(affine.invert()?.apply(p)),
            Transform::Log(log) => log.inverse(p),
            Transform::Composite(first, second) => first.inverse(second.inverse(p)?),
            Transform::Blended { x, y } => {
                let px = x.inverse(Point::new(p.x, BLEND_PROBE))?;
                let py = y.inverse(Point::new(BLEND_PROBE, p.y))?;
                Ok(Point::new(px.x, py.y))
            }
            Transform::Offset { inner, dx, dy } => inner.inverse(p.offset(-dx, -dy)),
            Transform::Frozen { source, matrix } => match matrix {
                Some(matrix) => Ok(matrix.invert()?.apply(p)),
                None => source.inverse(p),
            },
        }
    }

    /// The inverse as a transform node: inverse of a composition is the
    /// composition of the inverses in reverse order.
    pub fn inverted(&self) -> Result<Transform, SextantScaleError> {
        Ok(match self {
            Transform::Affine(affine) => Transform::Affine(affine.invert()?),
            Transform::Log(log) => Transform::Log(log.inverted()),
            Transform::Composite(first, second) => second.inverted()?.compose(first.inverted()?),
            Transform::Blended { x, y } => Transform::Blended {
                x: Box::new(x.inverted()?),
                y: Box::new(y.inverted()?),
            },
            Transform::Offset { inner, dx, dy } => {
                Transform::Affine(Affine2D::translation(-dx, -dy)).compose(inner.inverted()?)
            }
            Transform::Frozen { source, .. } => source.inverted()?.freeze(),
        })
    }

    /// Collapses the transform into one affine map when it contains no log node
    pub fn as_affine(&self) -> Option<Affine2D> {
        match self {
            Transform::Affine(affine) => Some(*affine),
            Transform::Log(_) => None,
            Transform::Composite(first, second) => {
                Some(first.as_affine()?.then(&second.as_affine()?))
            }
            Transform::Blended { x, y } => {
                let x = x.as_affine()?;
                let y = y.as_affine()?;
                Some(Affine2D {
                    a: x.a,
                    b: 0.0,
                    c: 0.0,
                    d: y.d,
                    tx: x.tx,
                    ty: y.ty,
                })
            }
            Transform::Offset { inner, dx, dy } => {
                Some(inner.as_affine()?.then(&Affine2D::translation(*dx, *dy)))
            }
            Transform::Frozen { source, matrix } => matrix.or_else(|| source.as_affine()),
        }
    }

    pub fn is_separable(&self) -> bool {
        match self {
            Transform::Affine(affine) => affine.is_separable(),
            Transform::Log(_) => true,
            Transform::Composite(first, second) => first.is_separable() && second.is_separable(),
            Transform::Blended { .. } => true,
            Transform::Offset { inner, .. } => inner.is_separable(),
            Transform::Frozen { source, .. } => source.is_separable(),
        }
    }

    /// Snapshots the transform for one draw pass
    pub fn freeze(self) -> Transform {
        match self {
            frozen @ Transform::Frozen { .. } => frozen,
            source => {
                let matrix = source.as_affine();
                Transform::Frozen {
                    source: Box::new(source),
                    matrix,
                }
            }
        }
    }

    /// Drops a frozen snapshot's cache and returns the live transform
    pub fn thaw(self) -> Transform {
        match self {
            Transform::Frozen { source, .. } => *source,
            other => other,
        }
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self, Transform::Frozen { .. })
    }
}
