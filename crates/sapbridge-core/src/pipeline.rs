// crates/sapbridge-core/src/pipeline.rs
//
// The three externally visible operations: local-material harmonization,
// process-order harmonization, and union of harmonized outputs. Each is a
// single synchronous pass; polars owns all execution concerns.

use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::info;

use crate::config::HarmonizeConfig;
use crate::error::Result;
use crate::harmonize::{add_missing_columns, enforce_schema, rename_and_select};
use crate::integrate::{integrate_local_material, integrate_process_order};
use crate::io::{read_table_dir, require_table, write_csv};
use crate::postprocess::{post_prep_local_material, post_prep_process_order};
use crate::prep::{
    prep_company_codes, prep_general_material_data, prep_material_valuation,
    prep_order_header_data, prep_plant_and_branches, prep_plant_data_for_material,
    prep_valuation_area,
};
use crate::schema::{
    AFPO_SCHEMA, AUFK_SCHEMA, LOCAL_MATERIAL_RENAME, MARA_ORDER_SCHEMA, MARA_SCHEMA,
    PROCESS_ORDER_RENAME, SYSTEM_NAME_COLUMN, UNIFIED_SCHEMA,
};
use crate::summary::RunSummary;
use crate::union::union_files;

/// Rename to canonical names, enforce the unified schema, backfill the
/// columns this dataset never produces, and stamp the system name.
fn finalize_unified(
    lf: LazyFrame,
    rename: &[(&str, &str)],
    system_name: &str,
) -> Result<DataFrame> {
    let lf = rename_and_select(lf, rename, false)?;
    let lf = enforce_schema(lf, &UNIFIED_SCHEMA)?;
    let lf = add_missing_columns(lf, &UNIFIED_SCHEMA)?;
    let df = lf
        .with_column(lit(system_name.to_string()).alias(SYSTEM_NAME_COLUMN))
        .collect()?;
    Ok(df)
}

/// Harmonize one system's local-material tables into the unified shape.
pub fn harmonize_local_material(
    data_dir: &Path,
    system_name: &str,
    config: &HarmonizeConfig,
) -> Result<DataFrame> {
    let tables = read_table_dir(data_dir)?;

    let mara = require_table(&tables, "MARA", data_dir)?.clone().lazy();
    let mbew = require_table(&tables, "MBEW", data_dir)?.clone().lazy();
    let marc = require_table(&tables, "MARC", data_dir)?.clone().lazy();
    let t001w = require_table(&tables, "T001W", data_dir)?.clone().lazy();
    let t001k = require_table(&tables, "T001K", data_dir)?.clone().lazy();
    let t001 = require_table(&tables, "T001", data_dir)?.clone().lazy();

    let mara = prep_general_material_data(
        mara,
        config.global_material_column(system_name),
        &MARA_SCHEMA,
        true,
        true,
    )?;
    let mbew = prep_material_valuation(mbew)?;
    let marc = prep_plant_data_for_material(marc, true, false)?;
    let t001w = prep_plant_and_branches(t001w)?;
    let t001k = prep_valuation_area(t001k)?;
    let t001 = prep_company_codes(t001)?;

    let integrated = integrate_local_material(marc, mara, mbew, t001w, t001k, t001)?;
    let local_material = post_prep_local_material(integrated)?;

    finalize_unified(local_material, LOCAL_MATERIAL_RENAME, system_name)
}

/// Harmonize one system's process-order tables into the unified shape.
pub fn harmonize_process_order(
    data_dir: &Path,
    system_name: &str,
    config: &HarmonizeConfig,
) -> Result<DataFrame> {
    let tables = read_table_dir(data_dir)?;

    let afko = require_table(&tables, "AFKO", data_dir)?.clone().lazy();
    let afpo = require_table(&tables, "AFPO", data_dir)?.clone().lazy();
    let aufk = require_table(&tables, "AUFK", data_dir)?.clone().lazy();
    let mara = require_table(&tables, "MARA", data_dir)?.clone().lazy();

    let afko = prep_order_header_data(afko)?;
    let afpo = enforce_schema(afpo, &AFPO_SCHEMA)?;
    let aufk = enforce_schema(aufk, &AUFK_SCHEMA)?;
    let mara = prep_general_material_data(
        mara,
        config.global_material_column(system_name),
        &MARA_ORDER_SCHEMA,
        true,
        true,
    )?;

    let integrated = integrate_process_order(afko, afpo, aufk, mara)?;
    let process_order = post_prep_process_order(integrated)?;

    finalize_unified(process_order, PROCESS_ORDER_RENAME, system_name)
}

fn write_output(
    df: &DataFrame,
    dataset: &str,
    system_name: Option<&str>,
    output_dir: &Path,
    file_name: &str,
) -> Result<RunSummary> {
    let output_path = write_csv(df, output_dir, file_name)?;

    let summary = RunSummary {
        dataset: dataset.to_string(),
        system_name: system_name.map(str::to_string),
        row_count: df.height(),
        column_count: df.width(),
        output_path,
    };
    let summary_path = summary.write_beside(&summary.output_path)?;
    info!(dataset, rows = summary.row_count, summary = %summary_path.display(), "pipeline run complete");

    Ok(summary)
}

/// Local-material pipeline: harmonize and write CSV plus run summary.
pub fn process_local_material(
    data_dir: &Path,
    system_name: &str,
    output_dir: &Path,
    file_name: &str,
    config: &HarmonizeConfig,
) -> Result<RunSummary> {
    info!(system = system_name, data_dir = %data_dir.display(), "harmonizing local material");
    let df = harmonize_local_material(data_dir, system_name, config)?;
    write_output(&df, "local_material", Some(system_name), output_dir, file_name)
}

/// Process-order pipeline: harmonize and write CSV plus run summary.
pub fn process_order(
    data_dir: &Path,
    system_name: &str,
    output_dir: &Path,
    file_name: &str,
    config: &HarmonizeConfig,
) -> Result<RunSummary> {
    info!(system = system_name, data_dir = %data_dir.display(), "harmonizing process orders");
    let df = harmonize_process_order(data_dir, system_name, config)?;
    write_output(&df, "process_order", Some(system_name), output_dir, file_name)
}

/// Union already-harmonized outputs across systems into one CSV.
pub fn union_outputs(
    inputs: &[PathBuf],
    output_dir: &Path,
    file_name: &str,
) -> Result<RunSummary> {
    info!(inputs = inputs.len(), "unioning harmonized outputs");
    let df = union_files(inputs)?;
    write_output(&df, "union", None, output_dir, file_name)
}
