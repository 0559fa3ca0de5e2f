// crates/sapbridge-core/src/prep/material.rs

use polars::prelude::*;

use crate::error::Result;
use crate::harmonize::enforce_schema;
use crate::schema::{
    COMPANY_CODE_DATA_SCHEMA, GLOBAL_MATERIAL_NUMBER, MARC_SCHEMA, MBEW_SCHEMA,
    PLANT_DATA_SCHEMA, VALUATION_DATA_SCHEMA,
};

/// Old material numbers that mark a record as superseded; rows carrying
/// one of these in BISMT are dropped.
const INVALID_OLD_MATERIAL_NUMBERS: [&str; 3] = ["ARCHIVE", "DUPLICATE", "RENUMBERED"];

fn old_material_number_is_valid() -> Expr {
    let bismt = col("BISMT").cast(DataType::String);
    let not_superseded = INVALID_OLD_MATERIAL_NUMBERS
        .iter()
        .fold(lit(true), |acc, invalid| {
            acc.and(bismt.clone().neq(lit(*invalid)))
        });
    bismt.is_null().or(not_superseded)
}

fn deletion_flag_is_clear() -> Expr {
    let lvorm = col("LVORM").cast(DataType::String);
    lvorm.clone().is_null().or(lvorm.eq(lit("")))
}

/// Prepare general material data (MARA). Filters superseded and deleted
/// materials, then normalizes the per-system global material number
/// column. The caller supplies the target schema since the local-material
/// and process-order pipelines keep different MARA columns.
pub fn prep_general_material_data(
    lf: LazyFrame,
    global_material_column: &str,
    schema: &Schema,
    check_old_material_number_is_valid: bool,
    check_material_is_not_deleted: bool,
) -> Result<LazyFrame> {
    let mut lf = lf;

    if check_old_material_number_is_valid {
        lf = lf.filter(old_material_number_is_valid());
    }
    if check_material_is_not_deleted {
        lf = lf.filter(deletion_flag_is_clear());
    }

    lf = lf.rename([global_material_column], [GLOBAL_MATERIAL_NUMBER], false);

    enforce_schema(lf, schema)
}

/// Prepare material valuation data (MBEW). Excludes deleted and
/// split-valuation records, keeps the record with the highest last
/// evaluated price (LAEPR) per material and valuation area, and drops
/// exact duplicates.
pub fn prep_material_valuation(lf: LazyFrame) -> Result<LazyFrame> {
    let lf = lf
        .filter(col("LVORM").is_null())
        .filter(col("BWTAR").is_null())
        .sort(
            ["LAEPR"],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_nulls_last(true)
                .with_maintain_order(true),
        )
        .unique_stable(
            Some(vec!["MATNR".into(), "BWKEY".into()]),
            UniqueKeepStrategy::First,
        );

    Ok(enforce_schema(lf, &MBEW_SCHEMA)?.unique_stable(None, UniqueKeepStrategy::First))
}

/// Prepare plant-level material data (MARC), the base table of the
/// local-material integration.
pub fn prep_plant_data_for_material(
    lf: LazyFrame,
    check_deletion_flag_is_null: bool,
    drop_duplicate_records: bool,
) -> Result<LazyFrame> {
    let mut lf = lf;

    if check_deletion_flag_is_null {
        lf = lf.filter(col("LVORM").is_null());
    }

    let mut lf = enforce_schema(lf, &MARC_SCHEMA)?;

    if drop_duplicate_records {
        lf = lf.unique_stable(None, UniqueKeepStrategy::First);
    }

    Ok(lf)
}

/// Prepare plant and branch names (T001W).
pub fn prep_plant_and_branches(lf: LazyFrame) -> Result<LazyFrame> {
    enforce_schema(lf, &PLANT_DATA_SCHEMA)
}

/// Prepare valuation areas (T001K), unique per client/valuation area.
pub fn prep_valuation_area(lf: LazyFrame) -> Result<LazyFrame> {
    Ok(enforce_schema(lf, &VALUATION_DATA_SCHEMA)?
        .unique_stable(None, UniqueKeepStrategy::First))
}

/// Prepare company codes (T001).
pub fn prep_company_codes(lf: LazyFrame) -> Result<LazyFrame> {
    enforce_schema(lf, &COMPANY_CODE_DATA_SCHEMA)
}
