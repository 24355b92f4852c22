use std::collections::BTreeMap;

use serde::Serialize;

/// Descriptive statistics summarizing a dataset.
///
/// Measures of location (mean, median) and dispersion (range, variance,
/// standard deviation) for a dataset of `f64` values. Both the population
/// (divide by `n`) and the sample (divide by `n - 1`) variance are reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    /// The number of values.
    pub count: usize,
    pub min: f64,
    pub max: f64,
    /// `max - min`.
    pub range: f64,
    pub sum: f64,
    /// The arithmetic mean.
    pub mean: f64,
    /// The middle value, or the mean of the two middle values for an even
    /// count.
    pub median: f64,
    pub population_variance: f64,
    pub population_std_dev: f64,
    /// The unbiased variance, `None` for fewer than two values.
    pub sample_variance: Option<f64>,
    pub sample_std_dev: Option<f64>,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the dataset contains at least one value
    /// * `None` - if the dataset is empty or contains NaN
    ///
    /// # Examples
    ///
    /// ```
    /// # use azar_stats::descriptive::DescriptiveStats;
    /// let values = [5.0, 2.0, 4.0, 1.0, 3.0];
    /// let stats = DescriptiveStats::new(values).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// assert_eq!(stats.population_variance, 2.0);
    /// assert_eq!(stats.sample_variance, Some(2.5));
    /// ```
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

    /// Computes descriptive statistics from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let n = count as f64;
        let sum = sorted_values.iter().sum::<f64>();
        let mean = sum / n;
        let median = median_of_sorted(sorted_values);
        let squared_deviations = sorted_values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>();
        let population_variance = squared_deviations / n;
        let sample_variance = (count > 1).then(|| squared_deviations / (n - 1.0));

        Some(Self {
            count,
            min,
            max,
            range: max - min,
            sum,
            mean,
            median,
            population_variance,
            population_std_dev: population_variance.sqrt(),
            sample_variance,
            sample_std_dev: sample_variance.map(f64::sqrt),
        })
    }
}

fn median_of_sorted(sorted_values: &[f64]) -> f64 {
    let mid = sorted_values.len() / 2;
    if sorted_values.len() % 2 == 0 {
        f64::midpoint(sorted_values[mid - 1], sorted_values[mid])
    } else {
        sorted_values[mid]
    }
}

/// The arithmetic mean, or `None` for an empty dataset.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// The weighted mean `Σ wᵢxᵢ / Σ wᵢ`.
///
/// Returns `None` if the slices are empty or differ in length, or if the
/// weights sum to zero.
///
/// # Examples
///
/// ```
/// # use azar_stats::descriptive::weighted_mean;
/// // three exams weighted 20%, 30% and 50%
/// let grade = weighted_mean(&[3.0, 4.0, 4.5], &[0.2, 0.3, 0.5]).unwrap();
/// assert!((grade - 4.05).abs() < 1e-12);
/// ```
#[must_use]
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> Option<f64> {
    if values.is_empty() || values.len() != weights.len() {
        return None;
    }
    let total_weight = weights.iter().sum::<f64>();
    if total_weight == 0.0 {
        return None;
    }
    let weighted_sum = values
        .iter()
        .zip(weights)
        .map(|(v, w)| v * w)
        .sum::<f64>();
    Some(weighted_sum / total_weight)
}

/// The mean after cutting `proportion` of the values from each end.
///
/// `floor(n * proportion)` values are removed from both the low and the high
/// end of the sorted data before averaging, which makes the result robust to
/// outliers. A proportion of `0.0` gives the ordinary mean.
///
/// Returns `None` if `proportion` is outside `[0, 0.5)` or the data is empty.
///
/// # Examples
///
/// ```
/// # use azar_stats::descriptive::trimmed_mean;
/// let values = [2.0, 4.0, 6.0, 8.0, 100.0];
/// // 20% of 5 values: drop one from each end
/// assert_eq!(trimmed_mean(&values, 0.2), Some(6.0));
/// ```
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]
#[must_use]
pub fn trimmed_mean(values: &[f64], proportion: f64) -> Option<f64> {
    if !(0.0..0.5).contains(&proportion) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let cut = (sorted.len() as f64 * proportion).floor() as usize;
    mean(&sorted[cut..sorted.len() - cut])
}

/// The most frequent values, in ascending order.
///
/// Every value tied for the highest count is returned, so a uniform dataset
/// yields all of its distinct values. Empty input yields an empty vector.
#[must_use]
pub fn mode(values: &[f64]) -> Vec<f64> {
    let mut counts = BTreeMap::<u64, (f64, usize)>::new();
    for &value in values {
        // normalize -0.0 so it groups with 0.0
        let value = if value == 0.0 { 0.0 } else { value };
        counts.entry(value.to_bits()).or_insert((value, 0)).1 += 1;
    }
    let Some(best) = counts.values().map(|(_, n)| *n).max() else {
        return vec![];
    };
    let mut modes = counts
        .into_values()
        .filter(|(_, n)| *n == best)
        .map(|(v, _)| v)
        .collect::<Vec<_>>();
    modes.sort_by(f64::total_cmp);
    modes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dataset() {
        assert_eq!(DescriptiveStats::new([]), None);
        assert_eq!(mean(&[]), None);
        assert_eq!(trimmed_mean(&[], 0.1), None);
        assert!(mode(&[]).is_empty());
    }

    #[test]
    fn test_nan_dataset() {
        assert_eq!(DescriptiveStats::new([1.0, f64::NAN, 2.0]), None);
        let stats = DescriptiveStats::new([1.0, f64::INFINITY]).unwrap();
        assert_eq!(stats.max, f64::INFINITY);
    }

    #[test]
    fn test_single_value() {
        let stats = DescriptiveStats::new([7.5]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.median, 7.5);
        assert_eq!(stats.range, 0.0);
        assert_eq!(stats.population_variance, 0.0);
        assert_eq!(stats.sample_variance, None);
        assert_eq!(stats.sample_std_dev, None);
    }

    #[test]
    fn test_even_count_median() {
        let stats = DescriptiveStats::new([4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.sum, 10.0);
    }

    #[test]
    fn test_textbook_variance() {
        let stats = DescriptiveStats::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.population_variance, 4.0);
        assert_eq!(stats.population_std_dev, 2.0);
        let sample = stats.sample_variance.unwrap();
        assert!((sample - 32.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "sorted")]
    fn test_from_sorted_requires_order() {
        let _ = DescriptiveStats::from_sorted(&[3.0, 1.0]);
    }

    #[test]
    fn test_weighted_mean_rejects_bad_input() {
        assert_eq!(weighted_mean(&[1.0, 2.0], &[1.0]), None);
        assert_eq!(weighted_mean(&[1.0, 2.0], &[0.0, 0.0]), None);
        assert_eq!(weighted_mean(&[1.0, 3.0], &[1.0, 1.0]), Some(2.0));
    }

    #[test]
    fn test_trimmed_mean() {
        let depth = [
            40.0, 52.0, 55.0, 60.0, 70.0, 75.0, 85.0, 85.0, 90.0, 90.0, 92.0, 94.0, 94.0, 95.0,
            98.0, 100.0, 115.0, 125.0, 125.0,
        ];
        // 10% of 19 values: one from each end
        let expected = depth[1..18].iter().sum::<f64>() / 17.0;
        assert!((trimmed_mean(&depth, 0.1).unwrap() - expected).abs() < 1e-12);
        assert_eq!(trimmed_mean(&depth, 0.0), mean(&depth));
        assert_eq!(trimmed_mean(&depth, 0.5), None);
        assert_eq!(trimmed_mean(&depth, -0.1), None);
    }

    #[test]
    fn test_mode() {
        assert_eq!(mode(&[1.0, 2.0, 2.0, 3.0]), vec![2.0]);
        assert_eq!(mode(&[3.0, 1.0, 3.0, 1.0, 2.0]), vec![1.0, 3.0]);
        assert_eq!(mode(&[0.0, -0.0]), vec![0.0]);
    }
}
