//! LaTeX table rendering for aggregated statistics.

use crate::tasks::experiments::{
    aggregate::{
        LoadKey, PerformanceStats, ReliabilityStats, ScalabilityStats, TransactionStats,
    },
    records::NoiseLevel,
    stats::Summary,
};
use anyhow::Result;
use std::{collections::BTreeMap, fmt::Write};

/// Placeholder for statistics that are undefined (e.g. the spread of a
/// single observation).
pub const UNDEFINED: &str = "--";

const TABLE_END: &str = "\\hline\n\\end{tabular}\n\\end{table}";

/// Format `value` with `precision` decimals, or [`UNDEFINED`] for NaN.
pub fn fmt_value(value: f64, precision: usize) -> String {
    if value.is_nan() {
        UNDEFINED.to_string()
    } else {
        format!("{value:.precision$}")
    }
}

fn mean_pm_std(summary: &Summary) -> String {
    format!(
        "{} $\\pm$ {}",
        fmt_value(summary.mean, 2),
        fmt_value(summary.std, 2)
    )
}

fn range(summary: &Summary) -> String {
    format!(
        "[{}, {}]",
        fmt_value(summary.min, 2),
        fmt_value(summary.max, 2)
    )
}

fn table_header(caption: &str, label: &str, columns: &str, head: &[&str]) -> String {
    let mut latex = String::new();
    latex.push_str("\n\\begin{table}[ht]\n\\centering\n");
    latex.push_str(&format!("\\caption{{{caption}}}\n"));
    latex.push_str(&format!("\\label{{tab:{label}}}\n"));
    latex.push_str(&format!("\\begin{{tabular}}{{{columns}}}\n\\hline\n"));
    for line in head {
        latex.push_str(line);
        latex.push_str(" \\\\\n");
    }
    latex.push_str("\\hline\n");
    latex
}

/// Shared layout of the performance and transaction tables: two timed
/// metrics (mean ± std and range) followed by gas mean and std.
fn timing_table(
    caption: &str,
    label: &str,
    first_metric: &str,
    second_metric: &str,
    rows: impl Iterator<Item = (NoiseLevel, Summary, Summary, Summary)>,
) -> Result<String> {
    let head = format!(
        "Noise & \\multicolumn{{2}}{{c}}{{{first_metric}}} & \\multicolumn{{2}}{{c}}{{{second_metric}}} & \\multicolumn{{2}}{{c}}{{Gas Used}}"
    );
    let mut latex = table_header(
        caption,
        label,
        "lcccccc",
        &[
            head.as_str(),
            "Level & Mean $\\pm$ Std & Range & Mean $\\pm$ Std & Range & Mean & Std",
        ],
    );

    for (noise, first, second, gas) in rows {
        writeln!(
            latex,
            "{noise} & {} & {} & {} & {} & {} & {} \\\\",
            mean_pm_std(&first),
            range(&first),
            mean_pm_std(&second),
            range(&second),
            fmt_value(gas.mean, 0),
            fmt_value(gas.std, 0),
        )?;
    }

    latex.push_str(TABLE_END);
    Ok(latex)
}

pub fn format_performance_table(stats: &BTreeMap<NoiseLevel, PerformanceStats>) -> Result<String> {
    timing_table(
        "Authentication Performance Metrics at Different Noise Levels",
        "performance",
        "Proof Generation (ms)",
        "Verification (ms)",
        stats
            .iter()
            .map(|(noise, s)| (*noise, s.proof_gen_time, s.verify_time, s.gas_used)),
    )
}

pub fn format_transactions_table(stats: &BTreeMap<NoiseLevel, TransactionStats>) -> Result<String> {
    timing_table(
        "Transaction Performance Metrics at Different Noise Levels",
        "transactions",
        "Transaction Time (ms)",
        "Encryption Time (ms)",
        stats
            .iter()
            .map(|(noise, s)| (*noise, s.transaction_time, s.encryption_time, s.gas_used)),
    )
}

pub fn format_reliability_table(stats: &BTreeMap<NoiseLevel, ReliabilityStats>) -> Result<String> {
    let mut latex = table_header(
        "Authentication Reliability Metrics at Different Noise Levels",
        "reliability",
        "lccc",
        &[
            "Noise & Number of & Success & Standard",
            "Level & Tests & Rate & Deviation",
        ],
    );

    for (noise, s) in stats {
        writeln!(
            latex,
            "{noise} & {} & {}\\% & {}\\% \\\\",
            s.success.count,
            fmt_value(s.success.mean * 100.0, 2),
            fmt_value(s.success.std * 100.0, 2),
        )?;
    }

    latex.push_str(TABLE_END);
    Ok(latex)
}

pub fn format_scalability_table(stats: &BTreeMap<LoadKey, ScalabilityStats>) -> Result<String> {
    let mut latex = table_header(
        "System Scalability Metrics",
        "scalability",
        "ccccc",
        &[
            "Batch & Concurrent & Total Time & Success & Response",
            "Size & Devices & (ms) & Rate (\\%) & Time (ms)",
        ],
    );

    for ((batch_size, devices), s) in stats {
        writeln!(
            latex,
            "{batch_size} & {devices} & {} & {} & {} \\\\",
            mean_pm_std(&s.total_time),
            mean_pm_std(&s.success_rate),
            mean_pm_std(&s.average_response_time),
        )?;
    }

    latex.push_str(TABLE_END);
    latex.push('\n');
    Ok(latex)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(values: &[f64]) -> Summary {
        Summary::from_values(values).rounded(2)
    }

    #[test]
    fn test_fmt_value() {
        assert_eq!(fmt_value(7.071, 2), "7.07");
        assert_eq!(fmt_value(21000.4, 0), "21000");
        assert_eq!(fmt_value(f64::NAN, 2), UNDEFINED);
    }

    #[test]
    fn test_format_performance_table() {
        let stats = BTreeMap::from([(
            NoiseLevel(0.1),
            PerformanceStats {
                proof_gen_time: summary(&[10.0, 20.0]),
                verify_time: summary(&[1.0, 3.0]),
                gas_used: summary(&[21000.0, 21000.0]),
            },
        )]);

        let latex = format_performance_table(&stats).unwrap();
        assert!(latex.starts_with("\n\\begin{table}[ht]\n\\centering\n"));
        assert!(latex.contains("\\label{tab:performance}\n"));
        assert!(latex.contains("\\multicolumn{2}{c}{Proof Generation (ms)}"));
        assert!(latex.contains(
            "0.1 & 15.00 $\\pm$ 7.07 & [10.00, 20.00] & 2.00 $\\pm$ 1.41 & [1.00, 3.00] & 21000 & 0 \\\\\n"
        ));
        assert!(latex.ends_with("\\end{tabular}\n\\end{table}"));
    }

    #[test]
    fn test_format_reliability_table() {
        let stats = BTreeMap::from([(
            NoiseLevel(0.2),
            ReliabilityStats {
                success: Summary::from_values(&[1.0, 1.0, 0.0]).rounded(4),
            },
        )]);

        let latex = format_reliability_table(&stats).unwrap();
        assert!(latex.contains("0.2 & 3 & 66.67\\% & 57.74\\% \\\\\n"));
    }

    #[test]
    fn test_single_observation_renders_placeholder() {
        let stats = BTreeMap::from([(
            (10, 100),
            ScalabilityStats {
                total_time: summary(&[2000.0]),
                success_rate: summary(&[99.5]),
                average_response_time: summary(&[20.0]),
            },
        )]);

        let latex = format_scalability_table(&stats).unwrap();
        assert!(latex.contains(
            "10 & 100 & 2000.00 $\\pm$ -- & 99.50 $\\pm$ -- & 20.00 $\\pm$ -- \\\\\n"
        ));
        assert!(latex.contains("\\begin{tabular}{ccccc}"));
    }
}
