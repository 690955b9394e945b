use serde::{Deserialize, Serialize};

/// Relative tolerance used by the containment tests, as a fraction of the span.
const CONTAINS_EPS: f64 = 1e-10;

/// A numeric range along one axis, used for both view and data extents.
///
/// `lo <= hi` is not enforced: an inverted interval is legal and means the
/// axis runs in the reverse direction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Interval {
    lo: f64,
    hi: f64,
}

impl Interval {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    /// Returns the bounds as `(lo, hi)` in stored order
    pub fn bounds(&self) -> (f64, f64) {
        (self.lo, self.hi)
    }

    pub fn set_bounds(&mut self, lo: f64, hi: f64) {
        self.lo = lo;
        self.hi = hi;
    }

    /// Signed span `hi - lo`; negative for inverted intervals
    pub fn span(&self) -> f64 {
        self.hi - self.lo
    }

    pub fn min(&self) -> f64 {
        self.lo.min(self.hi)
    }

    pub fn max(&self) -> f64 {
        self.lo.max(self.hi)
    }

    pub fn is_inverted(&self) -> bool {
        self.hi < self.lo
    }

    pub fn is_finite(&self) -> bool {
        self.lo.is_finite() && self.hi.is_finite()
    }

    fn eps(&self) -> f64 {
        self.span().abs() * CONTAINS_EPS
    }

    /// Closed containment, independent of orientation.
    ///
    /// Values that miss a bound only by floating point rounding still count as contained.
    pub fn contains(&self, value: f64) -> bool {
        let eps = self.eps();
        value >= self.min() - eps && value <= self.max() + eps
    }

    /// Strict containment: values sitting on either bound are excluded.
    pub fn contains_open(&self, value: f64) -> bool {
        let eps = self.eps();
        value > self.min() + eps && value < self.max() - eps
    }

    /// Grows the interval so that it covers `values`.
    ///
    /// When `ignore` is set the current bounds are discarded and the interval
    /// becomes the extent of `values`. Non-finite values are skipped.
    pub fn update(&mut self, values: &[f64], ignore: bool) {
        let mut finite = values.iter().copied().filter(|v| v.is_finite());
        let Some(first) = finite.next() else {
            return;
        };
        let (mut lo, mut hi) = if ignore {
            (first, first)
        } else {
            (self.min().min(first), self.max().max(first))
        };
        for v in finite {
            lo = lo.min(v);
            hi = hi.max(v);
        }
        if self.is_inverted() && !ignore {
            self.set_bounds(hi, lo);
        } else {
            self.set_bounds(lo, hi);
        }
    }
}

impl From<(f64, f64)> for Interval {
    fn from((lo, hi): (f64, f64)) -> Self {
        Self::new(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_span_and_orientation() {
        let interval = Interval::new(10.0, 2.0);
        assert!(interval.is_inverted());
        assert_approx_eq!(f64, interval.span(), -8.0);
        assert_eq!(interval.min(), 2.0);
        assert_eq!(interval.max(), 10.0);
    }

    #[test]
    fn test_contains_closed_and_open() {
        let interval = Interval::new(0.0, 1.0);
        assert!(interval.contains(0.0));
        assert!(interval.contains(1.0));
        assert!(interval.contains(1.0 + 1e-13));
        assert!(!interval.contains(1.1));

        assert!(!interval.contains_open(0.0));
        assert!(!interval.contains_open(1.0));
        assert!(interval.contains_open(0.5));
    }

    #[test]
    fn test_contains_inverted() {
        let interval = Interval::new(5.0, -5.0);
        assert!(interval.contains(-5.0));
        assert!(interval.contains_open(0.0));
    }

    #[test]
    fn test_update() {
        let mut interval = Interval::new(0.0, 1.0);
        interval.update(&[-3.0, 0.5, f64::NAN, 7.0], false);
        assert_eq!(interval.bounds(), (-3.0, 7.0));

        interval.update(&[2.0, 4.0], true);
        assert_eq!(interval.bounds(), (2.0, 4.0));

        interval.update(&[], true);
        assert_eq!(interval.bounds(), (2.0, 4.0));
    }

    #[test]
    fn test_update_keeps_orientation() {
        let mut interval = Interval::new(1.0, 0.0);
        interval.update(&[3.0], false);
        assert_eq!(interval.bounds(), (3.0, 0.0));
    }
}
