use anyhow::Result;
use log::{error, info};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub struct Env {}

impl Env {
    pub const RESULTS_DIR_ENV_VAR: &'static str = "EXPVIZ_RESULTS_DIR";
    pub const ANALYSIS_DIR_NAME: &'static str = "analysis";

    pub fn proj_root() -> PathBuf {
        env!("CARGO_MANIFEST_DIR").into()
    }

    /// Resolve the directory holding the experiment CSV files.
    ///
    /// An explicit path wins, then the `EXPVIZ_RESULTS_DIR` environment
    /// variable, and finally the `results` directory at the project root.
    pub fn results_root(overwrite: Option<&Path>) -> PathBuf {
        let path = match overwrite {
            Some(path) => path.to_path_buf(),
            None => match env::var(Self::RESULTS_DIR_ENV_VAR) {
                Ok(value) if !value.is_empty() => PathBuf::from(value),
                _ => {
                    let mut path = Self::proj_root();
                    path.push("results");
                    path
                }
            },
        };

        // Mirror the absolute path in the logs when the directory exists.
        fs::canonicalize(&path).unwrap_or(path)
    }

    pub fn analysis_root(results_root: &Path) -> PathBuf {
        results_root.join(Self::ANALYSIS_DIR_NAME)
    }

    /// Create (if needed) and return the output directory for plots and
    /// tables.
    pub fn init_analysis_root(results_root: &Path) -> Result<PathBuf> {
        let output_dir = Self::analysis_root(results_root);
        fs::create_dir_all(&output_dir).map_err(|e| {
            let reason = format!(
                "error creating output directory (path={}, error={e:?})",
                output_dir.display()
            );
            error!("{reason}");
            anyhow::anyhow!(reason)
        })?;
        info!("output directory is set to: {}", output_dir.display());

        Ok(output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_results_root_overwrite() {
        let temp_dir = tempdir().unwrap();
        let results_root = Env::results_root(Some(temp_dir.path()));
        assert_eq!(results_root, fs::canonicalize(temp_dir.path()).unwrap());
    }

    #[test]
    fn test_analysis_root() {
        let analysis_root = Env::analysis_root(Path::new("/tmp/results"));
        assert_eq!(analysis_root, PathBuf::from("/tmp/results/analysis"));
    }

    #[test]
    fn test_init_analysis_root() {
        let temp_dir = tempdir().unwrap();
        let output_dir = Env::init_analysis_root(temp_dir.path()).unwrap();
        assert!(output_dir.is_dir());

        // Second call must be a no-op.
        assert!(Env::init_analysis_root(temp_dir.path()).is_ok());
    }
}
