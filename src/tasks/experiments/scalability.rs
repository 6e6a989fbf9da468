use crate::{
    env::Env,
    tasks::experiments::{
        SCALABILITY_FILE, SCALABILITY_TABLES_FILE_NAME, aggregate,
        latex::format_scalability_table,
        load::{TableLoad, load_table_lenient},
        plot::{self, ChartLabels, Series},
        records::ScalabilityRecord,
        stats,
    },
};
use anyhow::Result;
use log::{error, info};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Results of the scalability experiment: one row per run of a given batch
/// size against a number of concurrent devices.
#[derive(Debug)]
pub struct Scalability {
    output_dir: PathBuf,
    rows: Vec<ScalabilityRecord>,
}

fn batch_label(batch_size: u32) -> String {
    format!("Batch Size {batch_size}")
}

impl Scalability {
    /// Load the scalability table. A missing, empty or unreadable file is
    /// reported and yields `None` instead of an error.
    pub fn load(results_root: &Path) -> Result<Option<Self>> {
        info!("resolved results directory: {}", results_root.display());
        let output_dir = Env::init_analysis_root(results_root)?;

        match load_table_lenient(results_root, SCALABILITY_FILE) {
            TableLoad::Loaded(rows) => Ok(Some(Scalability { output_dir, rows })),
            TableLoad::Missing | TableLoad::Empty | TableLoad::Failed(_) => Ok(None),
        }
    }

    /// Build a new instance from already loaded rows.
    pub fn from_rows(output_dir: PathBuf, rows: Vec<ScalabilityRecord>) -> Self {
        Scalability { output_dir, rows }
    }

    fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    /// One series per batch size (in order of first appearance), plotting
    /// `value` against the number of concurrent devices in row order.
    fn per_batch_series(&self, value: impl Fn(&ScalabilityRecord) -> f64) -> Vec<Series> {
        stats::unique_in_order(&self.rows, |r| r.batch_size)
            .into_iter()
            .map(|batch_size| Series {
                label: batch_label(batch_size),
                points: self
                    .rows
                    .iter()
                    .filter(|r| r.batch_size == batch_size)
                    .map(|r| (r.concurrent_devices as f64, value(r)))
                    .collect(),
            })
            .collect()
    }

    pub fn throughput_series(&self) -> Vec<Series> {
        self.per_batch_series(|r| stats::throughput(r.concurrent_devices, r.total_time))
    }

    pub fn response_time_series(&self) -> Vec<Series> {
        self.per_batch_series(|r| r.average_response_time)
    }

    pub fn success_rate_series(&self) -> Vec<Series> {
        self.per_batch_series(|r| r.success_rate)
    }

    pub fn efficiency_series(&self) -> Vec<Series> {
        let points = aggregate::batch_efficiency(&self.rows);

        stats::unique_in_order(&points, |p| p.batch_size)
            .into_iter()
            .map(|batch_size| Series {
                label: batch_label(batch_size),
                points: points
                    .iter()
                    .filter(|p| p.batch_size == batch_size)
                    .map(|p| (p.concurrent_devices as f64, p.efficiency))
                    .collect(),
            })
            .collect()
    }

    pub fn plot_throughput(&self) -> Result<()> {
        plot::plot_series(
            &self.output_path("throughput.svg"),
            &ChartLabels {
                title: "System Throughput vs. Number of Devices",
                x_desc: "Number of Concurrent Devices",
                y_desc: "Throughput (devices/second)",
            },
            &self.throughput_series(),
            true,
        )
    }

    pub fn plot_response_time(&self) -> Result<()> {
        plot::plot_series(
            &self.output_path("response_time.svg"),
            &ChartLabels {
                title: "Average Response Time vs. System Load",
                x_desc: "Number of Concurrent Devices",
                y_desc: "Average Response Time (ms)",
            },
            &self.response_time_series(),
            true,
        )
    }

    pub fn plot_success_rate_scaling(&self) -> Result<()> {
        plot::plot_series(
            &self.output_path("success_rate_scaling.svg"),
            &ChartLabels {
                title: "Success Rate vs. System Load",
                x_desc: "Number of Concurrent Devices",
                y_desc: "Success Rate (%)",
            },
            &self.success_rate_series(),
            true,
        )
    }

    pub fn plot_batch_efficiency(&self) -> Result<()> {
        plot::plot_series(
            &self.output_path("batch_efficiency.svg"),
            &ChartLabels {
                title: "Batch Processing Efficiency",
                x_desc: "Number of Concurrent Devices",
                y_desc: "Successful Proofs per Second",
            },
            &self.efficiency_series(),
            true,
        )
    }

    pub fn tables(&self) -> Result<String> {
        format_scalability_table(&aggregate::scalability_stats(&self.rows))
    }

    pub fn generate_latex_tables(&self) -> Result<PathBuf> {
        let tables_path = self.output_path(SCALABILITY_TABLES_FILE_NAME);
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

    pub fn run_all(&self) -> Result<()> {
        info!("generating throughput plot...");
        self.plot_throughput()?;

        info!("generating response time plot...");
        self.plot_response_time()?;

        info!("generating success rate scaling plot...");
        self.plot_success_rate_scaling()?;

        info!("generating batch efficiency plot...");
        self.plot_batch_efficiency()?;

        info!("generating LaTeX tables...");
        self.generate_latex_tables()?;

        info!("all scalability visualizations saved to {}", self.output_dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::experiments::records::parse_timestamp;

    fn row(batch_size: u32, devices: u32, total_time: f64) -> ScalabilityRecord {
        ScalabilityRecord {
            batch_size,
            concurrent_devices: devices,
            total_time,
            success_rate: 98.0,
            average_response_time: total_time / 10.0,
            successful_proofs: devices as u64,
            failed_proofs: 0,
            timestamp: parse_timestamp("2024-05-01 10:00:00").unwrap(),
        }
    }

    #[test]
    fn test_throughput_series_keeps_first_appearance_order() {
        let scalability = Scalability::from_rows(
            PathBuf::from("/tmp"),
            vec![
                row(50, 100, 2000.0),
                row(10, 100, 4000.0),
                row(50, 200, 2000.0),
            ],
        );

        let series = scalability.throughput_series();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "Batch Size 50");
        assert_eq!(series[0].points, vec![(100.0, 50.0), (200.0, 100.0)]);
        assert_eq!(series[1].label, "Batch Size 10");
        assert_eq!(series[1].points, vec![(100.0, 25.0)]);
    }

    #[test]
    fn test_efficiency_series_sorted_by_group() {
        let scalability = Scalability::from_rows(
            PathBuf::from("/tmp"),
            vec![
                row(50, 200, 1000.0),
                row(10, 100, 1000.0),
                row(50, 100, 500.0),
                row(50, 100, 1500.0),
            ],
        );

        let series = scalability.efficiency_series();
        assert_eq!(series[0].label, "Batch Size 10");
        assert_eq!(series[0].points, vec![(100.0, 100.0)]);
        assert_eq!(series[1].label, "Batch Size 50");
        // 200 successful proofs over a mean of 1000 ms.
        assert_eq!(series[1].points, vec![(100.0, 200.0), (200.0, 200.0)]);
    }

    #[test]
    fn test_zero_duration_yields_non_finite_throughput() {
        let scalability = Scalability::from_rows(PathBuf::from("/tmp"), vec![row(1, 10, 0.0)]);
        let series = scalability.throughput_series();
        assert!(series[0].points[0].1.is_infinite());
    }
}
