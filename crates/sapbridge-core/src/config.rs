// crates/sapbridge-core/src/config.rs

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{PipelineError, Result};

pub const DEFAULT_GLOBAL_MATERIAL_COLUMN: &str = "ZZMDGM";

/// Per-system settings. The only setting today is the name of the raw
/// column carrying the global material number, which differs between
/// source ERP systems.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_global_material_column")]
    pub global_material_number_column: String,
}

fn default_global_material_column() -> String {
    DEFAULT_GLOBAL_MATERIAL_COLUMN.to_string()
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            global_material_number_column: default_global_material_column(),
        }
    }
}

/// Pipeline configuration, loaded from an optional TOML file:
///
/// ```toml
/// [systems.system_2]
/// global_material_number_column = "ZZGLOBAL"
/// ```
///
/// Systems without an entry use the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarmonizeConfig {
    #[serde(default)]
    pub systems: HashMap<String, SystemConfig>,
}

impl HarmonizeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PipelineError::MissingInput(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path)?;
        let config = toml::from_str(&raw)?;
        Ok(config)
    }

    /// The raw global-material-number column for `system`, falling back
    /// to the SAP-standard ZZMDGM.
    pub fn global_material_column(&self, system: &str) -> &str {
        self.systems
            .get(system)
            .map(|s| s.global_material_number_column.as_str())
            .unwrap_or(DEFAULT_GLOBAL_MATERIAL_COLUMN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_a_file() {
        let config = HarmonizeConfig::default();
        assert_eq!(config.global_material_column("system_1"), "ZZMDGM");
    }

    #[test]
    fn per_system_override_wins() {
        let config: HarmonizeConfig = toml::from_str(
            r#"
            [systems.system_2]
            global_material_number_column = "ZZGLOBAL"
            "#,
        )
        .unwrap();

        assert_eq!(config.global_material_column("system_2"), "ZZGLOBAL");
        assert_eq!(config.global_material_column("system_1"), "ZZMDGM");
    }

    #[test]
    fn missing_config_file_is_reported() {
        let err = HarmonizeConfig::load(Path::new("/no/such/config.toml")).unwrap_err();
        assert!(matches!(err, PipelineError::MissingInput(_)));
    }
}
