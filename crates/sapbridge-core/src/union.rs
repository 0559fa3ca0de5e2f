// crates/sapbridge-core/src/union.rs
//
// Concatenation of already-harmonized outputs. Every input is re-enforced
// against the unified schema (CSV round-trips turn dates back into
// strings), then all schemas must agree exactly before rows are stacked.

use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::harmonize::enforce_schema;
use crate::io::read_csv_file;
use crate::schema::{SYSTEM_NAME_COLUMN, UNIFIED_SCHEMA};

fn unified_with_system_name() -> Schema {
    let mut schema = UNIFIED_SCHEMA.clone();
    schema.with_column(SYSTEM_NAME_COLUMN.into(), DataType::String);
    schema
}

fn describe_schema(schema: &Schema) -> String {
    schema
        .iter()
        .map(|(name, dtype)| format!("{name}: {dtype}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Concatenate harmonized frames, failing when any frame's schema differs
/// from the first. `labels` names the inputs in error messages.
pub fn union_harmonized(frames: Vec<LazyFrame>, labels: &[String]) -> Result<LazyFrame> {
    if frames.is_empty() {
        return Err(PipelineError::Validation(
            "union requires at least one input".to_string(),
        ));
    }

    let mut schemas = Vec::with_capacity(frames.len());
    for lf in &frames {
        let mut probe = lf.clone();
        schemas.push(probe.collect_schema()?);
    }

    let expected = &schemas[0];
    for (idx, found) in schemas.iter().enumerate().skip(1) {
        if found != expected {
            let label = labels.get(idx).cloned().unwrap_or_else(|| idx.to_string());
            return Err(PipelineError::SchemaMismatch(format!(
                "'{label}' does not match the first input; expected [{}], found [{}]",
                describe_schema(expected),
                describe_schema(found),
            )));
        }
    }

    concat(&frames, UnionArgs::default()).map_err(PipelineError::from)
}

/// Read several harmonized CSVs, enforce the unified schema on each, and
/// union them into one frame.
pub fn union_files(inputs: &[PathBuf]) -> Result<DataFrame> {
    let mut frames = Vec::with_capacity(inputs.len());
    let mut labels = Vec::with_capacity(inputs.len());

    for path in inputs {
        let df = read_csv_file(path)?;
        info!(rows = df.height(), path = %path.display(), "read harmonized input");
        frames.push(enforce_and_complete(df.lazy(), path)?);
        labels.push(path.display().to_string());
    }

    let df = union_harmonized(frames, &labels)?.collect()?;
    Ok(df)
}

fn enforce_and_complete(lf: LazyFrame, path: &Path) -> Result<LazyFrame> {
    let schema = unified_with_system_name();

    let mut probe = lf.clone();
    let present = probe.collect_schema()?;
    let missing: Vec<&str> = schema
        .iter_names()
        .map(|n| n.as_str())
        .filter(|name| present.get(name).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::SchemaMismatch(format!(
            "'{}' is not a harmonized output; missing columns: {}",
            path.display(),
            missing.join(", ")
        )));
    }

    enforce_schema(lf, &schema)
}
