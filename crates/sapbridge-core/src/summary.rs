// crates/sapbridge-core/src/summary.rs

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Outcome of one pipeline run, written as JSON next to the output CSV so
/// downstream consumers can audit what was produced without re-reading it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub dataset: String,
    pub system_name: Option<String>,
    pub row_count: usize,
    pub column_count: usize,
    pub output_path: PathBuf,
}

impl RunSummary {
    pub fn write_beside(&self, output_path: &Path) -> Result<PathBuf> {
        let summary_path = output_path.with_extension("summary.json");
        let bytes = serde_json::to_vec_pretty(self)?;
        fs::write(&summary_path, bytes)?;
        Ok(summary_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_round_trips_beside_the_output() {
        let dir = std::env::temp_dir().join(format!("sapbridge-summary-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let output = dir.join("local_material.csv");

        let summary = RunSummary {
            dataset: "local_material".to_string(),
            system_name: Some("system_1".to_string()),
            row_count: 2,
            column_count: 45,
            output_path: output.clone(),
        };

        let path = summary.write_beside(&output).unwrap();
        assert_eq!(path, dir.join("local_material.summary.json"));

        let raw = std::fs::read_to_string(&path).unwrap();
        let back: RunSummary = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.row_count, 2);
        assert_eq!(back.system_name.as_deref(), Some("system_1"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
