use crate::tasks::experiments::{noise::NoiseExperiments, scalability::Scalability};
use anyhow::Result;
use clap::Subcommand;
use log::info;
use std::{fmt, path::Path};

pub mod aggregate;
pub mod color;
pub mod latex;
pub mod load;
pub mod noise;
pub mod plot;
pub mod records;
pub mod scalability;
pub mod stats;

pub const PERFORMANCE_FILE: &str = "performance_results.csv";
pub const RELIABILITY_FILE: &str = "reliability_results.csv";
pub const MEMORY_FILE: &str = "memory_results.csv";
pub const TRANSACTION_FILE: &str = "transaction_results.csv";
pub const SCALABILITY_FILE: &str = "scalability_results.csv";

pub const TABLES_FILE_NAME: &str = "tables.tex";
pub const SCALABILITY_TABLES_FILE_NAME: &str = "scalability_tables.tex";

pub const HISTOGRAM_BINS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Pipeline {
    /// Plots and tables for the noise-level experiments
    Experiments,
    /// Plots and table for the scalability experiment
    Scalability,
    /// Run both pipelines, one after the other
    All,
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pipeline::Experiments => write!(f, "experiments"),
            Pipeline::Scalability => write!(f, "scalability"),
            Pipeline::All => write!(f, "all"),
        }
    }
}

pub fn run_experiments(results_root: &Path) -> Result<()> {
    NoiseExperiments::load(results_root)?.run_all()
}

/// Run the scalability pipeline. Returns `false` if there was nothing to
/// render.
pub fn run_scalability(results_root: &Path) -> Result<bool> {
    match Scalability::load(results_root)? {
        Some(scalability) => {
            scalability.run_all()?;
            Ok(true)
        }
        None => {
            info!("no scalability results to render");
            Ok(false)
        }
    }
}

pub fn run(pipeline: Pipeline, results_root: &Path) -> Result<()> {
    info!("running pipeline: {pipeline}");

    match pipeline {
        Pipeline::Experiments => run_experiments(results_root),
        Pipeline::Scalability => run_scalability(results_root).map(|_| ()),
        Pipeline::All => {
            run_experiments(results_root)?;
            run_scalability(results_root).map(|_| ())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_display() {
        assert_eq!(Pipeline::Experiments.to_string(), "experiments");
        assert_eq!(Pipeline::Scalability.to_string(), "scalability");
        assert_eq!(Pipeline::All.to_string(), "all");
    }
}
