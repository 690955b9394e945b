use std::fmt::Debug;

use crate::error::SextantScaleError;
use crate::locator::log_b;

/// Largest number of decimals the scalar formatter will print
const MAX_DECIMALS: usize = 12;

/// Label text capability shared by every formatter variant.
///
/// `set_locs` receives the full set of positions about to be labeled before any `format` call.
pub trait TickFormatter: Debug + Send + Sync + 'static {
    fn set_locs(&mut self, _locs: &[f64]) {}

    fn format(&self, value: f64, index: usize) -> String;

    /// Shared exponent or offset label drawn once per axis, empty when unused
    fn offset_text(&self) -> String {
        String::new()
    }
}

/// Strips the sign from strings like "-0" or "-0.00"
fn normalize_zero(text: String) -> String {
    match text.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => text,
    }
}

/// Plain decimal labels with a shared power of ten factored out for very large or
/// very small values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScalarFormatter {
    order: i32,
    decimals: usize,
}

impl ScalarFormatter {
    pub fn order_of_magnitude(&self) -> i32 {
        self.order
    }

    pub fn decimals(&self) -> usize {
        self.decimals
    }

    fn compute_order(locs: &[f64]) -> i32 {
        let max_abs = locs
            .iter()
            .filter(|v| v.is_finite())
            .fold(0.0_f64, |acc, v| acc.max(v.abs()));
        if max_abs == 0.0 {
            return 0;
        }
        if max_abs >= 1e4 || max_abs < 1e-3 {
            max_abs.log10().floor() as i32
        } else {
            0
        }
    }

    fn compute_decimals(locs: &[f64], order: i32) -> usize {
        let scale = 10f64.powi(order);
        (0..=MAX_DECIMALS)
            .find(|&d| {
                let factor = 10f64.powi(d as i32);
                locs.iter().filter(|v| v.is_finite()).all(|v| {
                    let scaled = v / scale * factor;
                    (scaled - scaled.round()).abs() < 1e-6
                })
            })
            .unwrap_or(MAX_DECIMALS)
    }
}

impl TickFormatter for ScalarFormatter {
    fn set_locs(&mut self, locs: &[f64]) {
        self.order = Self::compute_order(locs);
        self.decimals = Self::compute_decimals(locs, self.order);
    }

    fn format(&self, value: f64, _index: usize) -> String {
        let scaled = value / 10f64.powi(self.order);
        normalize_zero(format!("{:.*}", self.decimals, scaled))
    }

    fn offset_text(&self) -> String {
        if self.order == 0 {
            String::new()
        } else {
            format!("×10^{}", self.order)
        }
    }
}

/// Labels matched to tick positions by index; positions past the end get empty labels
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FixedFormatter {
    labels: Vec<String>,
}

impl FixedFormatter {
    pub fn new<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl TickFormatter for FixedFormatter {
    fn format(&self, _value: f64, index: usize) -> String {
        self.labels.get(index).cloned().unwrap_or_default()
    }
}

/// Labels integer powers of `base`.
///
/// Base 10 decades from 1 through 1000 print in full, others as `10^k`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogFormatter {
    base: f64,
    pub label_only_base: bool,
}

impl Default for LogFormatter {
    fn default() -> Self {
        Self {
            base: 10.0,
            label_only_base: true,
        }
    }
}

impl LogFormatter {
    pub fn new(base: f64, label_only_base: bool) -> Result<Self, SextantScaleError> {
        if !(base.is_finite() && base > 1.0) {
            return Err(SextantScaleError::InvalidFormatter(format!(
                "log base must be greater than 1, got {base}"
            )));
        }
        Ok(Self {
            base,
            label_only_base,
        })
    }

    pub fn base(&self) -> f64 {
        self.base
    }
}

impl TickFormatter for LogFormatter {
    fn format(&self, value: f64, _index: usize) -> String {
        if !(value.is_finite() && value > 0.0) {
            return String::new();
        }
        let exponent = log_b(value, self.base);
        let rounded = exponent.round();
        if (exponent - rounded).abs() < 1e-10 {
            let k = rounded as i32;
            if self.base == 10.0 && (0..=3).contains(&k) {
                format!("{}", 10i64.pow(k as u32))
            } else {
                format!("{}^{}", self.base, k)
            }
        } else if self.label_only_base {
            String::new()
        } else {
            format!("{value}")
        }
    }
}

#[derive(Debug)]
pub enum Formatter {
    Scalar(ScalarFormatter),
    Fixed(FixedFormatter),
    Log(LogFormatter),
    Null,
    Custom(Box<dyn TickFormatter>),
}

impl Default for Formatter {
    fn default() -> Self {
        Formatter::Scalar(ScalarFormatter::default())
    }
}

impl Formatter {
    pub fn fixed<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        Formatter::Fixed(FixedFormatter::new(labels))
    }

    pub fn custom<F: TickFormatter>(formatter: F) -> Self {
        Formatter::Custom(Box::new(formatter))
    }

    fn as_tick_formatter(&self) -> Option<&dyn TickFormatter> {
        match self {
            Formatter::Scalar(f) => Some(f),
            Formatter::Fixed(f) => Some(f),
            Formatter::Log(f) => Some(f),
            Formatter::Null => None,
            Formatter::Custom(f) => Some(f.as_ref()),
        }
    }

    fn as_tick_formatter_mut(&mut self) -> Option<&mut dyn TickFormatter> {
        match self {
            Formatter::Scalar(f) => Some(f),
            Formatter::Fixed(f) => Some(f),
            Formatter::Log(f) => Some(f),
            Formatter::Null => None,
            Formatter::Custom(f) => Some(f.as_mut()),
        }
    }

    /// Re-initializes the formatter for a new set of positions
    pub fn set_locs(&mut self, locs: &[f64]) {
        if let Some(formatter) = self.as_tick_formatter_mut() {
            formatter.set_locs(locs);
        }
    }

    /// Label for `value`, the `index`-th entry of `all_values`
    pub fn format(&mut self, value: f64, index: usize, all_values: &[f64]) -> String {
        self.set_locs(all_values);
        self.format_value(value, index)
    }

    /// Label for `value` against the positions given to the last `set_locs`
    pub fn format_value(&self, value: f64, index: usize) -> String {
        self.as_tick_formatter()
            .map(|formatter| formatter.format(value, index))
            .unwrap_or_default()
    }

    /// Labels for every position, re-initializing once for the whole set
    pub fn format_ticks(&mut self, locs: &[f64]) -> Vec<String> {
        self.set_locs(locs);
        locs.iter()
            .enumerate()
            .map(|(i, v)| self.format_value(*v, i))
            .collect()
    }

    pub fn offset_text(&self) -> String {
        self.as_tick_formatter()
            .map(|formatter| formatter.offset_text())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_integers() {
        let mut formatter = Formatter::default();
        let labels = formatter.format_ticks(&[0.0, 250.0, 500.0, 750.0, 1000.0]);
        assert_eq!(labels, vec!["0", "250", "500", "750", "1000"]);
        assert_eq!(formatter.offset_text(), "");
    }

    #[test]
    fn test_scalar_decimals() {
        let mut formatter = Formatter::default();
        let labels = formatter.format_ticks(&[-0.2, -0.1, 0.0, 0.1, 0.2, 0.3]);
        assert_eq!(labels, vec!["-0.2", "-0.1", "0.0", "0.1", "0.2", "0.3"]);
    }

    #[test]
    fn test_scalar_shared_exponent() {
        let mut formatter = Formatter::default();
        let labels = formatter.format_ticks(&[100000.0, 200000.0, 300000.0]);
        assert_eq!(labels, vec!["1", "2", "3"]);
        assert_eq!(formatter.offset_text(), "×10^5");
    }

    #[test]
    fn test_scalar_small_exponent() {
        let mut formatter = Formatter::default();
        let labels = formatter.format_ticks(&[0.0, 0.00025, 0.0005]);
        assert_eq!(labels, vec!["0.0", "2.5", "5.0"]);
        assert_eq!(formatter.offset_text(), "×10^-4");
    }

    #[test]
    fn test_scalar_negative_zero() {
        let mut formatter = ScalarFormatter::default();
        formatter.set_locs(&[-1.0, 0.0, 1.0]);
        assert_eq!(formatter.format(-0.0, 1), "0");
        assert_eq!(formatter.format(-1e-20, 1), "0");
    }

    #[test]
    fn test_format_reinitializes() {
        let mut formatter = Formatter::default();
        assert_eq!(formatter.format(2e5, 1, &[1e5, 2e5]), "2");
        assert_eq!(formatter.format(2.0, 1, &[1.0, 2.0]), "2");
        assert_eq!(formatter.offset_text(), "");
    }

    #[test]
    fn test_fixed_formatter() {
        let mut formatter = Formatter::fixed(["a", "b"]);
        assert_eq!(formatter.format_ticks(&[1.0, 2.0, 3.0]), vec!["a", "b", ""]);
    }

    #[test]
    fn test_null_formatter() {
        let mut formatter = Formatter::Null;
        assert_eq!(formatter.format_ticks(&[1.0, 2.0]), vec!["", ""]);
        assert_eq!(formatter.offset_text(), "");
    }

    #[test]
    fn test_log_formatter() {
        let formatter = LogFormatter::default();
        assert_eq!(formatter.format(1.0, 0), "1");
        assert_eq!(formatter.format(1000.0, 0), "1000");
        assert_eq!(formatter.format(1e5, 0), "10^5");
        assert_eq!(formatter.format(0.01, 0), "10^-2");
        assert_eq!(formatter.format(20.0, 0), "");
        assert_eq!(formatter.format(-1.0, 0), "");

        let all = LogFormatter::new(10.0, false).unwrap();
        assert_eq!(all.format(20.0, 0), "20");
        assert!(LogFormatter::new(0.5, true).is_err());
    }
}
