use std::{fmt, path::PathBuf};

use azar_stats::{
    descriptive::{self, DescriptiveStats},
    histogram::Histogram,
    percentiles::Percentiles,
    summary::FiveNumberSummary,
};
use serde::Serialize;

use crate::{
    schema::dataset::DatasetFile,
    util::{self, Format, Output},
};

const PERCENTILE_POINTS: [f64; 5] = [10.0, 25.0, 50.0, 75.0, 90.0];

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DescribeArg {
    /// Dataset file: an array of numbers or `{ values, weights, edges }`
    #[arg(value_name = "FILE", conflicts_with = "values")]
    file: Option<PathBuf>,
    /// Comma-separated values, instead of a file
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    values: Vec<f64>,
    /// Number of equal-width histogram bins
    #[arg(long, default_value_t = 5)]
    bins: usize,
    /// Comma-separated histogram edges, overriding `--bins`
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    edges: Vec<f64>,
    /// Proportion cut from each end for the trimmed mean
    #[arg(long, default_value_t = 0.1)]
    trim: f64,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long, default_value = "text")]
    format: Format,
}

pub(crate) fn run(arg: &DescribeArg) -> anyhow::Result<()> {
    let DescribeArg {
        file,
        values,
        bins,
        edges,
        trim,
        output,
        format,
    } = arg;
    let dataset = match file {
        Some(path) => util::read_dataset_file(path)?,
        None => DatasetFile::Values(values.clone()),
    };
    let edges = if edges.is_empty() {
        dataset.edges()
    } else {
        Some(edges.as_slice())
    };
    tracing::info!(count = dataset.values().len(), "Describing dataset");

    let report = DescribeReport::new(
        dataset.values(),
        dataset.weights(),
        HistogramBins::from_args(*bins, edges),
        *trim,
    )?;

    let mut output = Output::from_output_path(output.clone())?;
    output.write_report(*format, &report, &report.to_string())?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum HistogramBins<'a> {
    EqualWidth(usize),
    Edges(&'a [f64]),
}

impl<'a> HistogramBins<'a> {
    fn from_args(bins: usize, edges: Option<&'a [f64]>) -> Self {
        edges.map_or(HistogramBins::EqualWidth(bins), HistogramBins::Edges)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct DescribeReport {
    pub(crate) stats: DescriptiveStats,
    pub(crate) modes: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) weighted_mean: Option<f64>,
    pub(crate) trim: f64,
    pub(crate) trimmed_mean: Option<f64>,
    pub(crate) percentiles: Percentiles,
    pub(crate) summary: FiveNumberSummary,
    pub(crate) histogram: Histogram,
}

impl DescribeReport {
    pub(crate) fn new(
        values: &[f64],
        weights: Option<&[f64]>,
        bins: HistogramBins<'_>,
        trim: f64,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(!values.is_empty(), "dataset is empty");
        anyhow::ensure!(
            values.iter().all(|v| v.is_finite()),
            "dataset contains non-finite values"
        );

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let stats = DescriptiveStats::from_sorted(&sorted)
            .ok_or_else(|| anyhow::anyhow!("dataset is empty"))?;
        let summary = FiveNumberSummary::from_sorted(&sorted)
            .ok_or_else(|| anyhow::anyhow!("dataset is empty"))?;

        let weighted_mean = weights
            .map(|weights| {
                descriptive::weighted_mean(values, weights).ok_or_else(|| {
                    anyhow::anyhow!(
                        "weights must match the {} values and have a positive total",
                        values.len()
                    )
                })
            })
            .transpose()?;

        let histogram = match bins {
            HistogramBins::EqualWidth(n) => Histogram::equal_width(values, n)
                .ok_or_else(|| anyhow::anyhow!("number of bins must be positive"))?,
            HistogramBins::Edges(edges) => Histogram::with_edges(values, edges).ok_or_else(
                || anyhow::anyhow!("histogram edges must be at least two increasing values"),
            )?,
        };
        if histogram.outside > 0 {
            tracing::warn!(outside = histogram.outside, "values fall outside the histogram edges");
        }

        Ok(Self {
            modes: descriptive::mode(values),
            weighted_mean,
            trim,
            trimmed_mean: descriptive::trimmed_mean(values, trim),
            percentiles: Percentiles::from_sorted(&sorted, &PERCENTILE_POINTS),
            stats,
            summary,
            histogram,
        })
    }
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_owned(), |v| format!("{v:.4}"))
}

impl fmt::Display for DescribeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let DescriptiveStats {
            count,
            min,
            max,
            range,
            sum,
            mean,
            median,
            population_variance,
            population_std_dev,
            sample_variance,
            sample_std_dev,
        } = &self.stats;

        writeln!(f, "Count:              {count}")?;
        writeln!(f, "Sum:                {sum:.4}")?;
        writeln!(f, "Mean:               {mean:.4}")?;
        if let Some(weighted) = self.weighted_mean {
            writeln!(f, "Weighted mean:      {weighted:.4}")?;
        }
        writeln!(
            f,
            "Trimmed mean ({:.0}%): {}",
            self.trim * 100.0,
            optional(self.trimmed_mean)
        )?;
        writeln!(f, "Median:             {median:.4}")?;
        let modes = self
            .modes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        writeln!(f, "Mode:               {}", modes.join(", "))?;
        writeln!(f, "Min / Max:          {min} / {max}")?;
        writeln!(f, "Range:              {range:.4}")?;
        writeln!(f, "Variance (pop):     {population_variance:.4}")?;
        writeln!(f, "Std dev (pop):      {population_std_dev:.4}")?;
        writeln!(f, "Variance (sample):  {}", optional(*sample_variance))?;
        writeln!(f, "Std dev (sample):   {}", optional(*sample_std_dev))?;

        writeln!(f)?;
        writeln!(f, "Percentiles:")?;
        for (p, value) in self.percentiles.iter() {
            writeln!(f, "  P{p:<3} {value:.4}")?;
        }

        let s = &self.summary;
        writeln!(f)?;
        writeln!(f, "Five-number summary:")?;
        writeln!(
            f,
            "  {} / {} / {} / {} / {}",
            s.min, s.q1, s.median, s.q3, s.max
        )?;
        writeln!(f, "  IQR {}, fences [{}, {}]", s.iqr, s.lower_fence, s.upper_fence)?;
        writeln!(f, "  whiskers [{}, {}]", s.lower_whisker, s.upper_whisker)?;
        if !s.outliers.is_empty() {
            let outliers = s.outliers.iter().map(ToString::to_string).collect::<Vec<_>>();
            writeln!(f, "  outliers: {}", outliers.join(", "))?;
        }

        writeln!(f)?;
        writeln!(f, "Histogram:")?;
        for bin in &self.histogram.bins {
            writeln!(
                f,
                "  {:<24} {:>6} {:>8.4} {:>8.4}",
                bin.to_string(),
                bin.count,
                bin.relative,
                bin.cumulative
            )?;
        }
        if self.histogram.outside > 0 {
            writeln!(f, "  outside: {}", self.histogram.outside)?;
        }
        Ok(())
    }
}
