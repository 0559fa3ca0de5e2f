// crates/sapbridge-core/src/error.rs

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config file could not be parsed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Input path '{}' does not exist", .0.display())]
    MissingInput(PathBuf),

    #[error("Required table '{table}' not found in '{}'", data_dir.display())]
    MissingTable { table: String, data_dir: PathBuf },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Schema mismatch during union: {0}")]
    SchemaMismatch(String),

    #[error("Data processing error: {0}")]
    Processing(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
