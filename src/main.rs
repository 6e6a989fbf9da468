use clap::Parser;
use expviz::{
    env::Env,
    init_logging,
    tasks::experiments::{self, Pipeline},
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "expviz",
    about = "Render plots and LaTeX tables from experiment results"
)]
struct Cli {
    /// Directory holding the experiment CSV files. Defaults to
    /// $EXPVIZ_RESULTS_DIR, or the `results` directory at the project root.
    #[arg(long)]
    results_dir: Option<PathBuf>,

    // The pipeline to run, both if omitted
    #[clap(subcommand)]
    pipeline: Option<Pipeline>,
}

fn main() -> anyhow::Result<()> {
    init_logging(false);

    let cli = Cli::parse();
    let results_root = Env::results_root(cli.results_dir.as_deref());

    experiments::run(cli.pipeline.unwrap_or(Pipeline::All), &results_root)?;

    Ok(())
}
