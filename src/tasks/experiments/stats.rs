//! Descriptive statistics over experiment columns.
//!
//! All functions are pure and deterministic: groups are kept in ordered maps
//! and no function depends on iteration order of a hash container.

use std::collections::BTreeMap;

/// Summary statistics for one metric within one group.
///
/// `std` is the sample standard deviation (`n - 1` in the denominator), so
/// it is `NaN` for single-observation groups.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Summarise `values`, skipping NaN cells.
    pub fn from_values(values: &[f64]) -> Self {
        let values: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        let count = values.len();
        if count == 0 {
            return Summary {
                count,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                max: f64::NAN,
            };
        }

        let n = count as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Summary {
            count,
            mean,
            std: var.sqrt(),
            min,
            max,
        }
    }

    /// Round every statistic to `decimals` places, for display.
    pub fn rounded(&self, decimals: u32) -> Self {
        Summary {
            count: self.count,
            mean: round_to(self.mean, decimals),
            std: round_to(self.std, decimals),
            min: round_to(self.min, decimals),
            max: round_to(self.max, decimals),
        }
    }
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Partition `rows` by `key`, keeping row order within each group.
pub fn group_rows<R, K, F>(rows: &[R], key: F) -> BTreeMap<K, Vec<&R>>
where
    K: Ord,
    F: Fn(&R) -> K,
{
    let mut groups = BTreeMap::<K, Vec<&R>>::new();
    for row in rows {
        groups.entry(key(row)).or_default().push(row);
    }
    groups
}

/// Summary of one column over an already grouped set of rows.
pub fn summarize<R>(rows: &[&R], value: impl Fn(&R) -> f64) -> Summary {
    let values: Vec<f64> = rows.iter().map(|r| value(r)).collect();
    Summary::from_values(&values)
}

/// Collect the `value` column of `rows` into one vector per `key`, keeping
/// row order within each group.
pub fn group_by<R, K, F, V>(rows: &[R], key: F, value: V) -> BTreeMap<K, Vec<f64>>
where
    K: Ord,
    F: Fn(&R) -> K,
    V: Fn(&R) -> f64,
{
    let mut groups = BTreeMap::<K, Vec<f64>>::new();
    for row in rows {
        groups.entry(key(row)).or_default().push(value(row));
    }
    groups
}

/// Per-group summary of the `value` column.
pub fn summarize_by<R, K, F, V>(rows: &[R], key: F, value: V) -> BTreeMap<K, Summary>
where
    K: Ord,
    F: Fn(&R) -> K,
    V: Fn(&R) -> f64,
{
    group_by(rows, key, value)
        .into_iter()
        .map(|(k, values)| (k, Summary::from_values(&values)))
        .collect()
}

/// Distinct keys in order of first appearance.
pub fn unique_in_order<R, K, F>(rows: &[R], key: F) -> Vec<K>
where
    K: PartialEq,
    F: Fn(&R) -> K,
{
    let mut keys = Vec::new();
    for row in rows {
        let k = key(row);
        if !keys.contains(&k) {
            keys.push(k);
        }
    }
    keys
}

/// Quantile `q` in `[0, 1]` of already sorted values, interpolating linearly
/// between order statistics.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Five-number summary used to draw one box of a box plot.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Lowest observation within `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Highest observation within `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let inside = sorted
            .iter()
            .copied()
            .filter(|v| *v >= low_fence && *v <= high_fence);
        let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min);
        let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect();

        Some(BoxStats {
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` bin edges, ascending.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Equal-width bins spanning `[min, max]`; the last bin is closed so the
    /// maximum is counted. A constant column gets a unit-wide range around
    /// its value.
    pub fn from_values(values: &[f64], num_bins: usize) -> Option<Self> {
        if values.is_empty() || num_bins == 0 {
            return None;
        }

        let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / num_bins as f64;
        let edges = (0..=num_bins).map(|i| lo + width * i as f64).collect();
        let mut counts = vec![0; num_bins];
        for v in values {
            let idx = (((v - lo) / width) as usize).min(num_bins - 1);
            counts[idx] += 1;
        }

        Some(Histogram { edges, counts })
    }

    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Gaussian kernel density estimate evaluated at `num_points` evenly spaced
/// points over `[lo, hi]`, using Scott's rule for the bandwidth. Returns
/// `None` when the bandwidth degenerates (fewer than two distinct values).
pub fn gaussian_kde(values: &[f64], lo: f64, hi: f64, num_points: usize) -> Option<Vec<(f64, f64)>> {
    let summary = Summary::from_values(values);
    let n = summary.count as f64;
    let bandwidth = summary.std * n.powf(-0.2);
    if !bandwidth.is_finite() || bandwidth <= 0.0 || num_points < 2 {
        return None;
    }

    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    let step = (hi - lo) / (num_points - 1) as f64;
    let curve = (0..num_points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                * norm;
            (x, density)
        })
        .collect();

    Some(curve)
}

/// Devices served per second.
pub fn throughput(concurrent_devices: u32, total_time_ms: f64) -> f64 {
    concurrent_devices as f64 / (total_time_ms / 1000.0)
}

/// Successful proofs per second.
pub fn efficiency(successful_proofs: u64, total_time_ms: f64) -> f64 {
    (successful_proofs as f64 * 1000.0) / total_time_ms
}
