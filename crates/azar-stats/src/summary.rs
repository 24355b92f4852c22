//! Five-number summary and boxplot data.
//!
//! A boxplot draws the box from the first to the third quartile with a line at
//! the median. Whiskers reach the most extreme values inside Tukey's fences,
//! `Q1 - 1.5·IQR` and `Q3 + 1.5·IQR`; anything beyond the fences is an outlier.
//! This module only computes those numbers.

use serde::Serialize;

use crate::percentiles::quantile;

/// Multiplier of the interquartile range used for the fences.
pub const TUKEY_FENCE: f64 = 1.5;

/// Minimum, quartiles and maximum of a dataset plus the boxplot fences.
///
/// # Examples
///
/// ```
/// use azar_stats::summary::FiveNumberSummary;
///
/// let loads = [9.69, 13.16, 17.09, 18.12, 23.70, 24.07, 24.29, 26.43, 30.75, 1529.35];
/// let summary = FiveNumberSummary::new(loads).unwrap();
/// assert_eq!(summary.min, 9.69);
/// assert_eq!(summary.max, 1529.35);
/// assert_eq!(summary.outliers, vec![1529.35]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Interquartile range, `q3 - q1`.
    pub iqr: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
    /// Smallest value not below `lower_fence`.
    pub lower_whisker: f64,
    /// Largest value not above `upper_fence`.
    pub upper_whisker: f64,
    /// Values outside the fences, ascending.
    pub outliers: Vec<f64>,
}

impl FiveNumberSummary {
    /// Computes the summary from unsorted values, `None` if empty or if any
    /// value is NaN.
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        if values.iter().any(|v| v.is_nan()) {
            return None;
        }
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let q1 = quantile(sorted_values, 0.25);
        let median = quantile(sorted_values, 0.5);
        let q3 = quantile(sorted_values, 0.75);
        let iqr = q3 - q1;
        let lower_fence = q1 - TUKEY_FENCE * iqr;
        let upper_fence = q3 + TUKEY_FENCE * iqr;

        let inside = |v: &&f64| (lower_fence..=upper_fence).contains(*v);
        // fall back to the extremes when no value is inside the fences
        let lower_whisker = sorted_values.iter().find(inside).copied().unwrap_or(min);
        let upper_whisker = sorted_values.iter().rev().find(inside).copied().unwrap_or(max);
        let outliers = sorted_values
            .iter()
            .filter(|v| !inside(v))
            .copied()
            .collect();

        Some(Self {
            min,
            q1,
            median,
            q3,
            max,
            iqr,
            lower_fence,
            upper_fence,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_summary() {
        let depth = [
            40.0, 52.0, 55.0, 60.0, 70.0, 75.0, 85.0, 85.0, 90.0, 90.0, 92.0, 94.0, 94.0, 95.0,
            98.0, 100.0, 115.0, 125.0, 125.0,
        ];
        let summary = FiveNumberSummary::new(depth).unwrap();
        assert_eq!(summary.min, 40.0);
        assert_eq!(summary.q1, 72.5);
        assert_eq!(summary.median, 90.0);
        assert_eq!(summary.q3, 96.5);
        assert_eq!(summary.max, 125.0);
        assert_eq!(summary.iqr, 24.0);
        assert_eq!(summary.lower_fence, 36.5);
        assert_eq!(summary.upper_fence, 132.5);
        assert_eq!(summary.lower_whisker, 40.0);
        assert_eq!(summary.upper_whisker, 125.0);
        assert!(summary.outliers.is_empty());
    }

    #[test]
    fn test_outliers_on_both_sides() {
        let summary = FiveNumberSummary::new([-50.0, 1.0, 2.0, 3.0, 4.0, 5.0, 60.0]).unwrap();
        assert_eq!(summary.outliers, vec![-50.0, 60.0]);
        assert_eq!(summary.lower_whisker, 1.0);
        assert_eq!(summary.upper_whisker, 5.0);
    }

    #[test]
    fn test_serializes_for_plotting() {
        let summary = FiveNumberSummary::new([1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["median"], 3.0);
        assert_eq!(json["outliers"], serde_json::json!([100.0]));
    }

    #[test]
    fn test_empty() {
        assert_eq!(FiveNumberSummary::new([]), None);
        assert_eq!(FiveNumberSummary::new([2.0, f64::NAN]), None);
    }
}
