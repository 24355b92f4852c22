//! Descriptive statistics for small datasets.
//!
//! This crate provides the measures used to summarize a sample before any
//! probability model is applied:
//!
//! - **Descriptive statistics**: mean, weighted and trimmed means, median,
//!   mode, range, population and sample variance
//! - **Quantiles**: linearly interpolated quantiles and percentiles
//! - **Five-number summary**: quartiles, interquartile range, boxplot fences
//!   and outliers
//! - **Histograms**: equal-width or explicit-edge bins and discrete frequency
//!   tables, with relative and cumulative frequencies
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`percentiles`]: Quantile and percentile computation
//! - [`summary`]: Five-number summary and boxplot data
//! - [`histogram`]: Histogram and frequency table construction
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use azar_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Summarizing for a boxplot
//!
//! ```
//! use azar_stats::summary::FiveNumberSummary;
//!
//! let summary = FiveNumberSummary::new([1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
//! assert_eq!((summary.q1, summary.median, summary.q3), (2.0, 3.0, 4.0));
//! ```
//!
//! ## Creating a histogram
//!
//! ```
//! use azar_stats::histogram::Histogram;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
//! let histogram = Histogram::equal_width(&values, 5).unwrap();
//! assert!(histogram.bins.iter().all(|bin| bin.count == 2));
//! ```

pub mod descriptive;
pub mod histogram;
pub mod percentiles;
pub mod summary;
