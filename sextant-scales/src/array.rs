//! Step arithmetic shared by the locators.

/// Mantissas of the preferred tick steps, each scaled by a power of ten
pub const NICE_MANTISSAS: [f64; 3] = [1.0, 2.0, 5.0];

const EPS: f64 = 1e-10;

/// Number of whole `step` intervals between the first and last multiple of `step` in `[lo, hi]`.
///
/// Negative when no multiple of `step` falls inside the range.
pub fn interval_count(lo: f64, hi: f64, step: f64) -> i64 {
    let (first, last) = multiple_bounds(lo, hi, step);
    last - first
}

/// Indices of the first and last multiple of `step` in `[lo, hi]`, with a relative tolerance
fn multiple_bounds(lo: f64, hi: f64, step: f64) -> (i64, i64) {
    let (lo, hi) = (lo / step, hi / step);
    let first = (lo - EPS * lo.abs().max(1.0)).ceil();
    let last = (hi + EPS * hi.abs().max(1.0)).floor();
    (first as i64, last as i64)
}

/// Smallest step from {1, 2, 5} x 10^k whose multiples split `[lo, hi]` into at most
/// `max_intervals` intervals while still landing at least one multiple inside the range.
///
/// Requires `lo < hi`, both finite, and `max_intervals >= 1`.
pub fn nice_step(lo: f64, hi: f64, max_intervals: usize) -> f64 {
    let max_intervals = max_intervals.max(1);
    let raw = (hi - lo) / max_intervals as f64;
    let power = raw.log10().floor() as i32;

    // Any step >= raw satisfies the interval bound, so the search ends within two decades.
    let mut candidate = 10f64.powi(power + 1);
    for exp in (power - 1)..=(power + 1) {
        let scale = 10f64.powi(exp);
        for mantissa in NICE_MANTISSAS {
            let step = mantissa * scale;
            let count = interval_count(lo, hi, step);
            if count >= 0 && count <= max_intervals as i64 {
                return step;
            }
            candidate = step;
        }
    }
    candidate * 2.0
}

/// Decimal places needed to print multiples of `step` exactly
pub fn step_decimals(step: f64) -> usize {
    if step >= 1.0 || step <= 0.0 {
        0
    } else {
        (-step.log10().floor()).max(0.0) as usize
    }
}

/// Rounds `value` to `decimals` places and normalizes negative zero
pub fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// All multiples of `step` inside `[lo, hi]`, ascending. Bounds missed only by rounding are kept.
pub fn multiples_within(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    let (first, last) = multiple_bounds(lo, hi, step);
    if last < first {
        return vec![];
    }
    let decimals = step_decimals(step);
    (first..=last)
        .map(|i| round_to(i as f64 * step, decimals))
        .collect()
}

/// `n` evenly spaced values from `lo` to `hi` inclusive
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { hi } else { lo + i as f64 * step })
                .collect()
        }
    }
}
