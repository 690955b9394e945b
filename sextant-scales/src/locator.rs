use std::fmt::Debug;

use itertools::Itertools;
use sextant_common::interval::Interval;

use crate::array::{linspace, multiples_within, nice_step};
use crate::error::SextantScaleError;
use crate::scale::ScaleType;

/// Span multiplier for one step of `zoom`
const ZOOM_FACTOR: f64 = 0.8;

/// Tick placement capability shared by every locator variant.
///
/// Implementations receive read-only views of the intervals for the duration of the call.
pub trait TickLocator: Debug + Send + Sync + 'static {
    fn locate(&mut self, view: &Interval, data: &Interval) -> Result<Vec<f64>, SextantScaleError>;

    /// Drops any state derived from previous limits
    fn refresh(&mut self) {}
}

/// `log10` for base 10 so exact powers stay exact
pub(crate) fn log_b(value: f64, base: f64) -> f64 {
    if base == 10.0 {
        value.log10()
    } else {
        value.log(base)
    }
}

fn check_view(view: &Interval) -> Result<(f64, f64), SextantScaleError> {
    let (lo, hi) = (view.min(), view.max());
    if !lo.is_finite() {
        return Err(SextantScaleError::NonFiniteValue(lo));
    }
    if !hi.is_finite() {
        return Err(SextantScaleError::NonFiniteValue(hi));
    }
    if lo == hi {
        return Err(SextantScaleError::DegenerateInterval {
            lo: view.lo(),
            hi: view.hi(),
        });
    }
    Ok((lo, hi))
}

/// Multiples of a "nice" step from {1, 2, 5, 10} x 10^k
#[derive(Debug, Clone, PartialEq)]
pub struct AutoLocator {
    pub max_ticks: usize,
    cache: Option<((f64, f64), Vec<f64>)>,
}

impl Default for AutoLocator {
    fn default() -> Self {
        Self::new(9)
    }
}

impl AutoLocator {
    pub fn new(max_ticks: usize) -> Self {
        Self {
            max_ticks: max_ticks.max(1),
            cache: None,
        }
    }

    /// Step chosen for the given view
    pub fn step(&self, view: &Interval) -> Result<f64, SextantScaleError> {
        let (lo, hi) = check_view(view)?;
        Ok(nice_step(lo, hi, self.max_ticks + 1))
    }
}

impl TickLocator for AutoLocator {
    fn locate(&mut self, view: &Interval, _data: &Interval) -> Result<Vec<f64>, SextantScaleError> {
        let (lo, hi) = check_view(view)?;
        if let Some((bounds, ticks)) = &self.cache {
            if *bounds == (lo, hi) {
                return Ok(ticks.clone());
            }
        }
        let step = nice_step(lo, hi, self.max_ticks + 1);
        let ticks = multiples_within(lo, hi, step);
        self.cache = Some(((lo, hi), ticks.clone()));
        Ok(ticks)
    }

    fn refresh(&mut self) {
        self.cache = None;
    }
}

/// `num_ticks` evenly spaced positions spanning the view
#[derive(Debug, Clone, PartialEq)]
pub struct LinearLocator {
    pub num_ticks: usize,
}

impl Default for LinearLocator {
    fn default() -> Self {
        Self { num_ticks: 11 }
    }
}

impl TickLocator for LinearLocator {
    fn locate(&mut self, view: &Interval, _data: &Interval) -> Result<Vec<f64>, SextantScaleError> {
        let (lo, hi) = check_view(view)?;
        Ok(linspace(lo, hi, self.num_ticks))
    }
}

/// Integer powers of `base`, optionally with sub-decade multiples.
///
/// When more than `max_ticks` decades are visible only every Nth decade is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct LogLocator {
    base: f64,
    subs: Vec<f64>,
    pub max_ticks: usize,
}

impl Default for LogLocator {
    fn default() -> Self {
        Self::decades(9)
    }
}

impl LogLocator {
    pub fn new(base: f64, subs: Vec<f64>, max_ticks: usize) -> Result<Self, SextantScaleError> {
        if !(base.is_finite() && base > 1.0) {
            return Err(SextantScaleError::InvalidLocator(format!(
                "log base must be greater than 1, got {base}"
            )));
        }
        if let Some(sub) = subs.iter().find(|s| !(s.is_finite() && **s > 0.0)) {
            return Err(SextantScaleError::InvalidLocator(format!(
                "log subs must be positive, got {sub}"
            )));
        }
        Ok(Self {
            base,
            subs,
            max_ticks: max_ticks.max(1),
        })
    }

    /// Base 10 with one tick per decade
    pub fn decades(max_ticks: usize) -> Self {
        Self {
            base: 10.0,
            subs: vec![1.0],
            max_ticks: max_ticks.max(1),
        }
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn subs(&self) -> &[f64] {
        &self.subs
    }

    fn log_bounds(&self, view: &Interval) -> Result<(f64, f64), SextantScaleError> {
        let (lo, hi) = check_view(view)?;
        if lo <= 0.0 {
            return Err(SextantScaleError::NonPositiveLog(lo));
        }
        Ok((log_b(lo, self.base), log_b(hi, self.base)))
    }
}

impl TickLocator for LogLocator {
    fn locate(&mut self, view: &Interval, _data: &Interval) -> Result<Vec<f64>, SextantScaleError> {
        let (log_lo, log_hi) = self.log_bounds(view)?;
        let (lo, hi) = (view.min(), view.max());
        let first = log_lo.floor() as i64;
        let last = log_hi.ceil() as i64;
        let decades = (last - first).max(1);
        let stride = ((decades as f64) / self.max_ticks as f64).ceil().max(1.0) as i64;

        let subs: &[f64] = if stride > 1 { &[1.0] } else { &self.subs };
        let eps = (hi - lo) * 1e-10;
        let start = first.div_euclid(stride) * stride;
        let base = self.base;
        let ticks = (start..=last)
            .step_by(stride as usize)
            .flat_map(|k| subs.iter().map(move |sub| sub * base.powi(k as i32)))
            .filter(|v| *v >= lo - eps && *v <= hi + eps)
            .sorted_by(|a, b| a.total_cmp(b))
            .dedup()
            .collect();
        Ok(ticks)
    }
}

/// Caller-supplied positions returned verbatim
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FixedLocator {
    locs: Vec<f64>,
}

impl FixedLocator {
    pub fn new(locs: Vec<f64>) -> Result<Self, SextantScaleError> {
        if let Some(v) = locs.iter().find(|v| !v.is_finite()) {
            return Err(SextantScaleError::InvalidLocator(format!(
                "fixed tick positions must be finite, got {v}"
            )));
        }
        Ok(Self { locs })
    }

    pub fn locs(&self) -> &[f64] {
        &self.locs
    }
}

impl TickLocator for FixedLocator {
    fn locate(&mut self, _view: &Interval, _data: &Interval) -> Result<Vec<f64>, SextantScaleError> {
        Ok(self.locs.clone())
    }
}

#[derive(Debug)]
pub enum Locator {
    Auto(AutoLocator),
    Linear(LinearLocator),
    Log(LogLocator),
    Fixed(FixedLocator),
    Null,
    Custom(Box<dyn TickLocator>),
}

impl Default for Locator {
    fn default() -> Self {
        Locator::Auto(AutoLocator::default())
    }
}

impl Locator {
    pub fn fixed(locs: Vec<f64>) -> Result<Self, SextantScaleError> {
        Ok(Locator::Fixed(FixedLocator::new(locs)?))
    }

    pub fn custom<L: TickLocator>(locator: L) -> Self {
        Locator::Custom(Box::new(locator))
    }

    fn as_tick_locator_mut(&mut self) -> Option<&mut dyn TickLocator> {
        match self {
            Locator::Auto(l) => Some(l),
            Locator::Linear(l) => Some(l),
            Locator::Log(l) => Some(l),
            Locator::Fixed(l) => Some(l),
            Locator::Null => None,
            Locator::Custom(l) => Some(l.as_mut()),
        }
    }

    /// Tick positions for the current view
    pub fn locate(&mut self, view: &Interval, data: &Interval) -> Result<Vec<f64>, SextantScaleError> {
        match self.as_tick_locator_mut() {
            Some(locator) => locator.locate(view, data),
            None => Ok(vec![]),
        }
    }

    pub fn refresh(&mut self) {
        if let Some(locator) = self.as_tick_locator_mut() {
            locator.refresh();
        }
    }

    fn log_base(&self) -> f64 {
        match self {
            Locator::Log(l) => l.base,
            _ => 10.0,
        }
    }

    /// Bounds of `view` shifted by `steps` tick intervals.
    ///
    /// With fewer than three ticks visible a step is a sixth of the span. Log scales move
    /// in log space. The view itself is left for the caller to update.
    pub fn pan(
        &mut self,
        view: &Interval,
        steps: i32,
        scale: ScaleType,
    ) -> Result<(f64, f64), SextantScaleError> {
        let (lo, hi) = view.bounds();
        if lo == hi {
            return Err(SextantScaleError::DegenerateInterval { lo, hi });
        }
        let ticks = self.locate(view, view)?;
        let steps = steps as f64;
        if scale.is_log() {
            let base = self.log_base();
            if lo <= 0.0 || hi <= 0.0 {
                return Err(SextantScaleError::NonPositiveLog(lo.min(hi)));
            }
            let (log_lo, log_hi) = (log_b(lo, base), log_b(hi, base));
            let magnitude = if ticks.len() > 2 && ticks[0] > 0.0 {
                (log_b(ticks[1], base) - log_b(ticks[0], base)).abs()
            } else {
                (log_hi - log_lo).abs() / 6.0
            };
            let delta = steps * magnitude.copysign(log_hi - log_lo);
            Ok((base.powf(log_lo + delta), base.powf(log_hi + delta)))
        } else {
            let magnitude = if ticks.len() > 2 {
                (ticks[1] - ticks[0]).abs()
            } else {
                (hi - lo).abs() / 6.0
            };
            let delta = steps * magnitude.copysign(hi - lo);
            Ok((lo + delta, hi + delta))
        }
    }

    /// Bounds of `view` zoomed about its center.
    ///
    /// Each unit of `direction` scales the span by `ZOOM_FACTOR`; negative directions zoom
    /// out. Log scales zoom in log space, so the result never collapses or flips.
    pub fn zoom(
        &self,
        view: &Interval,
        direction: i32,
        scale: ScaleType,
    ) -> Result<(f64, f64), SextantScaleError> {
        let (lo, hi) = view.bounds();
        if lo == hi {
            return Err(SextantScaleError::DegenerateInterval { lo, hi });
        }
        let factor = ZOOM_FACTOR.powi(direction);
        if scale.is_log() {
            let base = self.log_base();
            if lo <= 0.0 || hi <= 0.0 {
                return Err(SextantScaleError::NonPositiveLog(lo.min(hi)));
            }
            let (log_lo, log_hi) = scale_about_center(log_b(lo, base), log_b(hi, base), factor);
            Ok((base.powf(log_lo), base.powf(log_hi)))
        } else {
            Ok(scale_about_center(lo, hi, factor))
        }
    }
}

fn scale_about_center(lo: f64, hi: f64, factor: f64) -> (f64, f64) {
    let center = (lo + hi) / 2.0;
    let half = (hi - lo) / 2.0 * factor;
    (center - half, center + half)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    fn view(lo: f64, hi: f64) -> Interval {
        Interval::new(lo, hi)
    }

    #[test]
    fn test_auto_thousand_uses_hundreds() {
        let mut locator = AutoLocator::default();
        let ticks = locator.locate(&view(0.0, 1000.0), &view(0.0, 1000.0)).unwrap();
        assert_eq!(
            ticks,
            vec![0.0, 100.0, 200.0, 300.0, 400.0, 500.0, 600.0, 700.0, 800.0, 900.0, 1000.0]
        );
        assert_approx_eq!(f64, locator.step(&view(0.0, 1000.0)).unwrap(), 100.0);
    }

    #[test]
    fn test_auto_is_idempotent_and_sorted_for_inverted() {
        let mut locator = AutoLocator::default();
        let first = locator.locate(&view(3.7, -1.2), &view(0.0, 1.0)).unwrap();
        locator.refresh();
        let second = locator.locate(&view(3.7, -1.2), &view(0.0, 1.0)).unwrap();
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(first, vec![-1.0, -0.5, 0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5]);
    }

    #[test]
    fn test_auto_rejects_degenerate() {
        let mut locator = AutoLocator::default();
        assert_eq!(
            locator.locate(&view(2.0, 2.0), &view(0.0, 1.0)),
            Err(SextantScaleError::DegenerateInterval { lo: 2.0, hi: 2.0 })
        );
        assert!(locator.locate(&view(0.0, f64::INFINITY), &view(0.0, 1.0)).is_err());
    }

    #[test]
    fn test_linear_locator() {
        let mut locator = LinearLocator { num_ticks: 5 };
        let ticks = locator.locate(&view(0.0, 2.0), &view(0.0, 2.0)).unwrap();
        assert_eq!(ticks, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_log_locator_decades() {
        let mut locator = LogLocator::default();
        let ticks = locator.locate(&view(1.0, 1000.0), &view(1.0, 1000.0)).unwrap();
        assert_eq!(ticks.len(), 4);
        assert_approx_eq!(f64, ticks[3], 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_log_locator_decimates() {
        let mut locator = LogLocator::decades(4);
        let ticks = locator.locate(&view(1.0, 1e12), &view(1.0, 1e12)).unwrap();
        // twelve decades, stride three
        assert_eq!(ticks.len(), 5);
        assert_approx_eq!(f64, ticks[1], 1e3, epsilon = 1e-6);
    }

    #[test]
    fn test_log_locator_subs() {
        let mut locator = LogLocator::new(10.0, vec![1.0, 2.0, 5.0], 9).unwrap();
        let ticks = locator.locate(&view(1.0, 100.0), &view(1.0, 100.0)).unwrap();
        assert_eq!(ticks.len(), 7);
    }

    #[test]
    fn test_log_locator_rejects_non_positive() {
        let mut locator = LogLocator::default();
        assert_eq!(
            locator.locate(&view(-1.0, 10.0), &view(1.0, 10.0)),
            Err(SextantScaleError::NonPositiveLog(-1.0))
        );
        assert!(LogLocator::new(1.0, vec![1.0], 9).is_err());
    }

    #[test]
    fn test_fixed_and_null() {
        let mut fixed = Locator::fixed(vec![3.0, 1.0, 2.0]).unwrap();
        assert_eq!(
            fixed.locate(&view(0.0, 1.0), &view(0.0, 1.0)).unwrap(),
            vec![3.0, 1.0, 2.0]
        );
        assert!(Locator::fixed(vec![f64::NAN]).is_err());

        let mut null = Locator::Null;
        assert!(null.locate(&view(0.0, 1.0), &view(0.0, 1.0)).unwrap().is_empty());
    }

    #[test]
    fn test_pan_by_tick_steps() {
        let mut locator = Locator::default();
        let bounds = locator.pan(&view(0.0, 10.0), 2, ScaleType::Linear).unwrap();
        assert_eq!(bounds, (2.0, 12.0));
        let bounds = locator.pan(&view(2.0, 12.0), -1, ScaleType::Linear).unwrap();
        assert_eq!(bounds, (1.0, 11.0));
    }

    #[test]
    fn test_pan_without_ticks_uses_sixth_of_span() {
        let mut locator = Locator::Null;
        let bounds = locator.pan(&view(0.0, 6.0), 1, ScaleType::Linear).unwrap();
        assert_eq!(bounds, (1.0, 7.0));
    }

    #[test]
    fn test_pan_follows_scale_not_locator() {
        // Fixed ticks on a log axis still pan by decades
        let mut locator = Locator::fixed(vec![1.0, 10.0, 100.0, 1000.0]).unwrap();
        let (lo, hi) = locator.pan(&view(1.0, 1000.0), -2, ScaleType::Log).unwrap();
        assert_approx_eq!(f64, lo, 0.01, epsilon = 1e-12);
        assert_approx_eq!(f64, hi, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zoom_in_and_out() {
        let locator = Locator::default();
        let (lo, hi) = locator.zoom(&view(0.0, 10.0), 1, ScaleType::Linear).unwrap();
        assert_approx_eq!(f64, lo, 1.0, epsilon = 1e-9);
        assert_approx_eq!(f64, hi, 9.0, epsilon = 1e-9);

        let (lo, hi) = locator.zoom(&view(0.0, 10.0), -1, ScaleType::Linear).unwrap();
        assert_approx_eq!(f64, lo, -1.25, epsilon = 1e-9);
        assert_approx_eq!(f64, hi, 11.25, epsilon = 1e-9);
    }

    #[test]
    fn test_large_zoom_never_collapses() {
        let locator = Locator::default();
        for direction in [5, 7, 40] {
            let (lo, hi) = locator.zoom(&view(0.0, 10.0), direction, ScaleType::Linear).unwrap();
            assert!(lo < 5.0 && 5.0 < hi, "{direction}: ({lo}, {hi})");
        }
        assert!(locator.zoom(&view(3.0, 3.0), 1, ScaleType::Linear).is_err());
    }

    #[test]
    fn test_log_zoom_in_log_space() {
        let locator = Locator::Log(LogLocator::default());
        let (lo, hi) = locator.zoom(&view(1.0, 1e10), 1, ScaleType::Log).unwrap();
        assert_approx_eq!(f64, lo, 10.0, epsilon = 1e-9);
        assert_approx_eq!(f64, hi, 1e9, epsilon = 1e-3);
        assert!(locator.zoom(&view(-1.0, 10.0), 1, ScaleType::Log).is_err());
    }
}
