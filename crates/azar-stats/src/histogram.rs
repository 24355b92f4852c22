use std::{collections::BTreeMap, fmt};

use serde::Serialize;

/// A histogram representation of a dataset's distribution.
///
/// The histogram divides a range into contiguous bins and counts the values
/// falling into each one. Counts are reported together with relative and
/// cumulative relative frequencies, which is what a frequency table or a
/// relative-frequency bar chart shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// The bins comprising the histogram, in ascending order.
    pub bins: Vec<HistogramBin>,
    /// Number of values counted in some bin.
    pub total: u64,
    /// Number of values that fell outside every bin.
    pub outside: u64,
}

/// A single bin in a histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    /// Whether `start` itself belongs to the bin.
    pub start_closed: bool,
    /// Whether `end` itself belongs to the bin.
    pub end_closed: bool,
    /// The number of values that fall within this bin's range.
    pub count: u64,
    /// `count / total`.
    pub relative: f64,
    /// Relative frequency of this bin and all bins before it.
    pub cumulative: f64,
}

impl HistogramBin {
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        let above = if self.start_closed {
            value >= self.start
        } else {
            value > self.start
        };
        let below = if self.end_closed {
            value <= self.end
        } else {
            value < self.end
        };
        above && below
    }
}

/// Interval notation, e.g. `[0, 1000]` or `(1000, 2000]`.
impl fmt::Display for HistogramBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.start_closed { '[' } else { '(' };
        let close = if self.end_closed { ']' } else { ')' };
        write!(f, "{open}{}, {}{close}", self.start, self.end)
    }
}

impl Histogram {
    /// Creates a histogram of `num_bins` equal-width bins spanning the data.
    ///
    /// Bins are half-open `[start, end)` except the last, which also includes
    /// the maximum. When every value is the same, the range is widened to
    /// `[value - 0.5, value + 0.5]`.
    ///
    /// Returns `None` for empty input or zero bins.
    ///
    /// # Examples
    ///
    /// ```
    /// # use azar_stats::histogram::Histogram;
    /// let hours = [9.95, 10.0, 2.25, 16.75, 0.0, 19.5, 22.5, 7.5, 15.0, 12.75, 5.5, 11.0, 10.0,
    ///     20.75, 17.5, 23.0, 21.9, 24.0, 23.75, 18.0, 20.0, 15.0, 22.9, 18.8, 20.5];
    /// let histogram = Histogram::equal_width(&hours, 5).unwrap();
    /// let counts = histogram.bins.iter().map(|b| b.count).collect::<Vec<_>>();
    /// assert_eq!(counts, vec![2, 2, 5, 6, 10]);
    /// assert_eq!(histogram.bins[1].to_string(), "[4.8, 9.6)");
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn equal_width(values: &[f64], num_bins: usize) -> Option<Self> {
        if num_bins == 0 {
            return None;
        }
        let mut min = values.iter().copied().reduce(f64::min)?;
        let mut max = values.iter().copied().reduce(f64::max)?;
        if max - min < f64::EPSILON {
            min -= 0.5;
            max += 0.5;
        }
        let width = (max - min) / num_bins as f64;
        let edges = (0..=num_bins)
            .map(|i| {
                if i == num_bins {
                    max
                } else {
                    min + width * i as f64
                }
            })
            .collect::<Vec<_>>();

        let mut counts = vec![0; num_bins];
        for &value in values {
            // index of the last edge <= value; the maximum joins the last bin
            let idx = edges.partition_point(|e| *e <= value).saturating_sub(1);
            counts[idx.min(num_bins - 1)] += 1;
        }
        Some(Self::from_counts(&edges, &counts, 0, BinClosure::Left))
    }

    /// Creates a histogram over explicit bin edges.
    ///
    /// Bins are closed on the right, `(start, end]`, except the first, which
    /// is `[start, end]` so that the lowest edge is counted. Values outside
    /// `[edges[0], edges[last]]` are counted in [`Histogram::outside`].
    ///
    /// Returns `None` unless there are at least two strictly increasing edges.
    ///
    /// # Examples
    ///
    /// ```
    /// # use azar_stats::histogram::Histogram;
    /// let histogram = Histogram::with_edges(&[0.0, 5.0, 10.0, 12.0], &[0.0, 5.0, 10.0]).unwrap();
    /// assert_eq!(histogram.bins[0].count, 2); // [0, 5]
    /// assert_eq!(histogram.bins[1].count, 1); // (5, 10]
    /// assert_eq!(histogram.outside, 1);
    /// ```
    #[must_use]
    pub fn with_edges(values: &[f64], edges: &[f64]) -> Option<Self> {
        if edges.len() < 2 || !edges.windows(2).all(|w| w[0] < w[1]) {
            return None;
        }
        let num_bins = edges.len() - 1;
        let mut counts = vec![0; num_bins];
        let mut outside = 0;
        for &value in values {
            if value < edges[0] || value > edges[num_bins] {
                outside += 1;
                continue;
            }
            // index of the first edge >= value
            let idx = edges.partition_point(|e| *e < value);
            counts[idx.saturating_sub(1)] += 1;
        }
        Some(Self::from_counts(edges, &counts, outside, BinClosure::Right))
    }

    #[expect(clippy::cast_precision_loss)]
    fn from_counts(edges: &[f64], counts: &[u64], outside: u64, closure: BinClosure) -> Self {
        let total = counts.iter().sum::<u64>();
        let last = counts.len() - 1;
        let mut running = 0;
        let bins = counts
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                running += count;
                let (start_closed, end_closed) = match closure {
                    BinClosure::Left => (true, i == last),
                    BinClosure::Right => (i == 0, true),
                };
                HistogramBin {
                    start: edges[i],
                    end: edges[i + 1],
                    start_closed,
                    end_closed,
                    count,
                    relative: ratio(count, total),
                    cumulative: ratio(running, total),
                }
            })
            .collect();
        Self {
            bins,
            total,
            outside,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum BinClosure {
    Left,
    Right,
}

#[expect(clippy::cast_precision_loss)]
fn ratio(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Counts of discrete values, such as the number of hits per game.
///
/// # Examples
///
/// ```
/// # use azar_stats::histogram::FrequencyTable;
/// let table = FrequencyTable::from_values(["a", "b", "a", "c", "a"]);
/// assert_eq!(table.count(&"a"), 3);
/// assert_eq!(table.relative(&"a"), 0.6);
/// assert_eq!(table.mode(), Some(&"a"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyTable<K: Ord> {
    counts: BTreeMap<K, u64>,
}

/// One row of a [`FrequencyTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyRow<'a, K> {
    pub value: &'a K,
    pub count: u64,
    pub relative: f64,
    pub cumulative: f64,
}

impl<K> FrequencyTable<K>
where
    K: Ord,
{
    /// Tallies raw observations.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut counts = BTreeMap::new();
        for value in values {
            *counts.entry(value).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Builds the table from already tallied `(value, count)` pairs; counts of
    /// a repeated value add up.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (K, u64)>,
    {
        let mut table = BTreeMap::new();
        for (value, count) in counts {
            *table.entry(value).or_insert(0) += count;
        }
        Self { counts: table }
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    #[must_use]
    pub fn count(&self, value: &K) -> u64 {
        self.counts.get(value).copied().unwrap_or(0)
    }

    /// Relative frequency of `value`, `0.0` for an empty table.
    #[must_use]
    pub fn relative(&self, value: &K) -> f64 {
        ratio(self.count(value), self.total())
    }

    /// The most frequent value; the smallest one on ties.
    #[must_use]
    pub fn mode(&self) -> Option<&K> {
        self.counts
            .iter()
            .rev()
            .max_by_key(|(_, count)| **count)
            .map(|(value, _)| value)
    }

    /// Rows in ascending value order.
    pub fn rows(&self) -> impl Iterator<Item = FrequencyRow<'_, K>> + '_ {
        let total = self.total();
        let mut running = 0;
        self.counts.iter().map(move |(value, &count)| {
            running += count;
            FrequencyRow {
                value,
                count,
                relative: ratio(count, total),
                cumulative: ratio(running, total),
            }
        })
    }
}
