use anyhow::Result;
use csv::ReaderBuilder;
use log::{debug, error, info};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Outcome of loading a table without treating failures as fatal.
#[derive(Debug)]
pub enum TableLoad<T> {
    Loaded(Vec<T>),
    Missing,
    Empty,
    Failed(anyhow::Error),
}

/// Check that every file in `file_names` exists under `results_root`. The
/// error names the first missing file.
pub fn check_required_files(results_root: &Path, file_names: &[&str]) -> Result<()> {
    for file_name in file_names {
        let file_path = results_root.join(file_name);
        debug!("checking for file: {}", file_path.display());
        if !file_path.exists() {
            let reason = format!("required file '{}' not found", file_path.display());
            error!("{reason}");
            anyhow::bail!(reason);
        }
    }

    Ok(())
}

/// Deserialize every row of the CSV file at `path`.
pub fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| {
            let reason = format!("error opening csv file (path={}, error={e})", path.display());
            error!("{reason}");
            anyhow::anyhow!(reason)
        })?;

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: T = result.map_err(|e| {
            let reason = format!("error parsing csv file (path={}, error={e})", path.display());
            error!("{reason}");
            anyhow::anyhow!(reason)
        })?;
        rows.push(row);
    }

    debug!("read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Load a table that must exist and hold at least one row.
pub fn load_table<T: DeserializeOwned>(results_root: &Path, file_name: &str) -> Result<Vec<T>> {
    check_required_files(results_root, &[file_name])?;

    let rows = read_table(&results_root.join(file_name))?;
    if rows.is_empty() {
        let reason = format!("'{file_name}' is empty");
        error!("{reason}");
        anyhow::bail!(reason);
    }

    info!("successfully read '{file_name}'");
    Ok(rows)
}

/// Load a table, reporting (but not propagating) a missing file, an empty
/// file, or any other read error.
pub fn load_table_lenient<T: DeserializeOwned>(results_root: &Path, file_name: &str) -> TableLoad<T> {
    let file_path = results_root.join(file_name);
    if !file_path.exists() {
        error!("'{file_name}' not found in the results directory");
        return TableLoad::Missing;
    }

    match read_table(&file_path) {
        Ok(rows) if rows.is_empty() => {
            error!("'{file_name}' is empty");
            TableLoad::Empty
        }
        Ok(rows) => {
            info!("successfully read '{file_name}'");
            TableLoad::Loaded(rows)
        }
        Err(e) => {
            error!("an unexpected error occurred while reading '{file_name}': {e}");
            TableLoad::Failed(e)
        }
    }
}
