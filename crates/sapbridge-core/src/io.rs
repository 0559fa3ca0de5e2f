// crates/sapbridge-core/src/io.rs

use std::collections::HashMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use glob::glob;
use polars::prelude::*;
use tracing::info;

use crate::error::{PipelineError, Result};

/// Read a single headered CSV with schema inference.
pub fn read_csv_file(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(PipelineError::MissingInput(path.to_path_buf()));
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(1000))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    Ok(df)
}

/// Read every `*.csv` in `data_dir`, keyed by the SAP table name: the
/// trailing `_`-separated token of the file stem, uppercased
/// (`PRE_MARA.csv` -> `MARA`).
pub fn read_table_dir(data_dir: &Path) -> Result<HashMap<String, DataFrame>> {
    if !data_dir.is_dir() {
        return Err(PipelineError::MissingInput(data_dir.to_path_buf()));
    }

    let pattern = data_dir.join("*.csv");
    let mut tables = HashMap::new();

    for entry in glob(&pattern.to_string_lossy())
        .map_err(|e| PipelineError::Validation(format!("bad input pattern: {e}")))?
    {
        let path = entry.map_err(|e| PipelineError::Validation(e.to_string()))?;
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let table = stem
            .rsplit('_')
            .next()
            .unwrap_or(stem)
            .to_ascii_uppercase();

        let df = read_csv_file(&path)?;
        info!(table = %table, rows = df.height(), path = %path.display(), "read input table");
        tables.insert(table, df);
    }

    Ok(tables)
}

/// Look up a required table, failing with the directory in the message.
pub fn require_table<'a>(
    tables: &'a HashMap<String, DataFrame>,
    name: &str,
    data_dir: &Path,
) -> Result<&'a DataFrame> {
    tables.get(name).ok_or_else(|| PipelineError::MissingTable {
        table: name.to_string(),
        data_dir: data_dir.to_path_buf(),
    })
}

/// Write `df` as a single headered CSV at `output_dir/<file_name>`,
/// normalizing the `.csv` extension, and return the final path.
pub fn write_csv(df: &DataFrame, output_dir: &Path, file_name: &str) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;

    let stem = file_name.strip_suffix(".csv").unwrap_or(file_name);
    let path = output_dir.join(format!("{stem}.csv"));

    let mut file = File::create(&path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut df.clone())?;

    info!(rows = df.height(), path = %path.display(), "wrote harmonized output");
    Ok(path)
}
