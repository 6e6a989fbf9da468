use crate::{
    env::Env,
    tasks::experiments::{
        HISTOGRAM_BINS, MEMORY_FILE, PERFORMANCE_FILE, RELIABILITY_FILE, TABLES_FILE_NAME,
        TRANSACTION_FILE, aggregate,
        latex::{format_performance_table, format_reliability_table, format_transactions_table},
        load::{check_required_files, load_table},
        plot::{self, ChartLabels, Series, TimeSeries},
        records::{
            MemoryRecord, NoiseLevel, PerformanceRecord, ReliabilityRecord, TransactionRecord,
        },
        stats,
    },
};
use anyhow::Result;
use log::{error, info};
use std::{
    fs,
    path::{Path, PathBuf},
};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Results of the noise-level experiments: authentication performance,
/// reliability, memory and on-chain transactions.
#[derive(Debug)]
pub struct NoiseExperiments {
    output_dir: PathBuf,
    perf: Vec<PerformanceRecord>,
    rel: Vec<ReliabilityRecord>,
    mem: Vec<MemoryRecord>,
    tx: Vec<TransactionRecord>,
}

/// Group `value` by noise level, labelling each group with its level.
fn groups_by_noise<R>(
    rows: &[R],
    key: impl Fn(&R) -> NoiseLevel,
    value: impl Fn(&R) -> f64,
) -> Vec<(String, Vec<f64>)> {
    stats::group_by(rows, key, value)
        .into_iter()
        .map(|(noise, values)| (noise.to_string(), values))
        .collect()
}

impl NoiseExperiments {
    pub const REQUIRED_FILES: [&'static str; 4] = [
        PERFORMANCE_FILE,
        RELIABILITY_FILE,
        MEMORY_FILE,
        TRANSACTION_FILE,
    ];

    /// Load every required table from `results_root`. Any missing, empty or
    /// malformed file is a fatal error naming the file.
    pub fn load(results_root: &Path) -> Result<Self> {
        info!("resolved results directory: {}", results_root.display());
        let output_dir = Env::init_analysis_root(results_root)?;

        check_required_files(results_root, &Self::REQUIRED_FILES)?;

        Ok(NoiseExperiments {
            output_dir,
            perf: load_table(results_root, PERFORMANCE_FILE)?,
            rel: load_table(results_root, RELIABILITY_FILE)?,
            mem: load_table(results_root, MEMORY_FILE)?,
            tx: load_table(results_root, TRANSACTION_FILE)?,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    pub fn plot_performance_vs_noise(&self) -> Result<()> {
        let proof_gen = groups_by_noise(&self.perf, |r| r.noise_level, |r| r.proof_gen_time);
        let verify = groups_by_noise(&self.perf, |r| r.noise_level, |r| r.verify_time);

        plot::plot_box_pair(
            &self.output_path("performance_vs_noise.svg"),
            (
                &ChartLabels {
                    title: "Proof Generation Time vs. Noise Level",
                    x_desc: "Noise Level",
                    y_desc: "Time (ms)",
                },
                &proof_gen,
            ),
            (
                &ChartLabels {
                    title: "Verification Time vs. Noise Level",
                    x_desc: "Noise Level",
                    y_desc: "Time (ms)",
                },
                &verify,
            ),
        )
    }

    pub fn plot_transaction_times(&self) -> Result<()> {
        plot::plot_box(
            &self.output_path("transaction_time_vs_noise.svg"),
            &ChartLabels {
                title: "Transaction Time vs. Noise Level",
                x_desc: "Noise Level",
                y_desc: "Transaction Time (ms)",
            },
            &groups_by_noise(&self.tx, |r| r.noise_level, |r| r.transaction_time),
        )
    }

    pub fn plot_encryption_times(&self) -> Result<()> {
        plot::plot_box(
            &self.output_path("encryption_time_vs_noise.svg"),
            &ChartLabels {
                title: "Encryption Time vs. Noise Level",
                x_desc: "Noise Level",
                y_desc: "Encryption Time (ms)",
            },
            &groups_by_noise(&self.tx, |r| r.noise_level, |r| r.encryption_time),
        )
    }

    /// Success rate (%) per noise level, ordered by level.
    pub fn success_rate_series(&self) -> Series {
        Series {
            label: "Success Rate".to_string(),
            points: aggregate::success_rates(&self.rel)
                .into_iter()
                .map(|(noise, rate)| (noise.0, rate))
                .collect(),
        }
    }

    pub fn plot_success_rate(&self) -> Result<()> {
        plot::plot_series(
            &self.output_path("success_rate.svg"),
            &ChartLabels {
                title: "Authentication Success Rate vs. Noise Level",
                x_desc: "Noise Level",
                y_desc: "Success Rate (%)",
            },
            &[self.success_rate_series()],
            false,
        )
    }

    pub fn plot_gas_usage(&self) -> Result<()> {
        let gas: Vec<f64> = self.perf.iter().map(|r| r.gas_used).collect();
        plot::plot_histogram(
            &self.output_path("authentication_gas_usage.svg"),
            &ChartLabels {
                title: "Distribution of Gas Usage for Authentication",
                x_desc: "Gas Used",
                y_desc: "Frequency",
            },
            &gas,
            HISTOGRAM_BINS,
        )
    }

    pub fn plot_transaction_gas_usage(&self) -> Result<()> {
        let gas: Vec<f64> = self.tx.iter().map(|r| r.gas_used).collect();
        plot::plot_histogram(
            &self.output_path("transaction_gas_usage.svg"),
            &ChartLabels {
                title: "Distribution of Gas Usage for Transactions",
                x_desc: "Gas Used",
                y_desc: "Frequency",
            },
            &gas,
            HISTOGRAM_BINS,
        )
    }

    /// Heap used and heap total, in MB, in row order.
    pub fn memory_series(&self) -> [TimeSeries; 2] {
        [
            TimeSeries {
                label: "Heap Used".to_string(),
                points: self
                    .mem
                    .iter()
                    .map(|r| (r.timestamp, r.heap_used / BYTES_PER_MB))
                    .collect(),
            },
            TimeSeries {
                label: "Heap Total".to_string(),
                points: self
                    .mem
                    .iter()
                    .map(|r| (r.timestamp, r.heap_total / BYTES_PER_MB))
                    .collect(),
            },
        ]
    }

    pub fn plot_memory_usage(&self) -> Result<()> {
        plot::plot_time_series(
            &self.output_path("memory_usage.svg"),
            &ChartLabels {
                title: "Memory Usage Over Time",
                x_desc: "Time",
                y_desc: "Memory (MB)",
            },
            &self.memory_series(),
        )
    }

    /// Performance, reliability and transaction tables, separated by a blank
    /// line.
    pub fn tables(&self) -> Result<String> {
        let performance = format_performance_table(&aggregate::performance_stats(&self.perf))?;
        let reliability = format_reliability_table(&aggregate::reliability_stats(&self.rel))?;
        let transactions = format_transactions_table(&aggregate::transaction_stats(&self.tx))?;

        Ok([performance, reliability, transactions].join("\n\n"))
    }

    pub fn generate_latex_tables(&self) -> Result<PathBuf> {
        let tables_path = self.output_path(TABLES_FILE_NAME);
        fs::write(&tables_path, self.tables()?).map_err(|e| {
            let reason = format!(
                "error writing tables (path={}, error={e:?})",
                tables_path.display()
            );
            error!("{reason}");
            anyhow::anyhow!(reason)
        })?;
        info!("generated tables at: {}", tables_path.display());

        Ok(tables_path)
    }

    /// Generate every plot and table, in a fixed order.
    pub fn run_all(&self) -> Result<()> {
        info!("generating performance plots...");
        self.plot_performance_vs_noise()?;

        info!("generating transaction time plot...");
        self.plot_transaction_times()?;

        info!("generating encryption time plot...");
        self.plot_encryption_times()?;

        info!("generating authentication success rate plot...");
        self.plot_success_rate()?;

        info!("generating gas usage plots...");
        self.plot_gas_usage()?;
        self.plot_transaction_gas_usage()?;

        info!("generating memory usage plot...");
        self.plot_memory_usage()?;

        info!("generating LaTeX tables...");
        self.generate_latex_tables()?;

        info!("all visualizations saved to {}", self.output_dir.display());
        Ok(())
    }
}
