// crates/sapbridge-core/src/schema.rs
//
// Declarative schemas for every raw SAP table and for the unified output.
// Preparation steps enforce the raw schemas; both pipelines end by
// enforcing UNIFIED_SCHEMA so that outputs from any system (and either
// dataset) expose an identical column set and can be concatenated.

use once_cell::sync::Lazy;
use polars::prelude::*;

/// Column name the configurable per-system global material number is
/// normalized to before integration.
pub const GLOBAL_MATERIAL_NUMBER: &str = "global_material_number";

/// Column stamped onto every harmonized output after schema enforcement.
pub const SYSTEM_NAME_COLUMN: &str = "system_name";

fn schema(fields: Vec<(&str, DataType)>) -> Schema {
    Schema::from_iter(
        fields
            .into_iter()
            .map(|(name, dtype)| Field::new(name.into(), dtype)),
    )
}

/// General material data (MARA), local-material variant.
pub static MARA_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    schema(vec![
        ("MANDT", DataType::String),
        ("MATNR", DataType::String),
        ("MEINS", DataType::String),
        (GLOBAL_MATERIAL_NUMBER, DataType::String),
    ])
});

/// Material valuation data (MBEW).
pub static MBEW_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    schema(vec![
        ("MANDT", DataType::String),
        ("MATNR", DataType::String),
        ("BWKEY", DataType::String),
        ("VPRSV", DataType::String),
        ("VERPR", DataType::Float64),
        ("STPRS", DataType::Float64),
        ("PEINH", DataType::Float64),
        ("BKLAS", DataType::String),
    ])
});

/// Plant data for material (MARC).
pub static MARC_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    schema(vec![
        ("SOURCE_SYSTEM_ERP", DataType::String),
        ("MATNR", DataType::String),
        ("WERKS", DataType::String),
        ("PLIFZ", DataType::String),
        ("DZEIT", DataType::String),
        ("DISLS", DataType::String),
    ])
});

/// Plants and branches (T001W).
pub static PLANT_DATA_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    schema(vec![
        ("MANDT", DataType::String),
        ("WERKS", DataType::String),
        ("BWKEY", DataType::String),
        ("NAME1", DataType::String),
    ])
});

/// Valuation areas (T001K).
pub static VALUATION_DATA_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    schema(vec![
        ("MANDT", DataType::String),
        ("BUKRS", DataType::String),
        ("BWKEY", DataType::String),
    ])
});

/// Company codes (T001).
pub static COMPANY_CODE_DATA_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    schema(vec![
        ("MANDT", DataType::String),
        ("BUKRS", DataType::String),
        ("WAERS", DataType::String),
    ])
});

/// Order header data (AFKO). `finish_date` is never present in the raw
/// files; it stays in the schema so the unified backfill adds it as a
/// typed null.
pub static AFKO_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    schema(vec![
        ("SOURCE_SYSTEM_ERP", DataType::String),
        ("MANDT", DataType::String),
        ("AUFNR", DataType::String),
        ("start_date", DataType::Date),
        ("finish_date", DataType::Date),
        ("GLTRP", DataType::String),
        ("GSTRI", DataType::String),
    ])
});

/// Order item data (AFPO).
pub static AFPO_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    schema(vec![
        ("AUFNR", DataType::String),
        ("POSNR", DataType::String),
        ("DWERK", DataType::String),
        ("MATNR", DataType::String),
        ("KDAUF", DataType::String),
        ("LTRMI", DataType::String),
    ])
});

/// Order master data (AUFK).
pub static AUFK_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    schema(vec![
        ("AUFNR", DataType::String),
        ("OBJNR", DataType::String),
        ("ERDAT", DataType::String),
        ("ERNAM", DataType::String),
        ("AUART", DataType::String),
        ("ZZGLTRP_ORIG", DataType::String),
        ("ZZPRO_TEXT", DataType::String),
    ])
});

/// General material data (MARA), process-order variant.
pub static MARA_ORDER_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    schema(vec![
        ("MATNR", DataType::String),
        ("MTART", DataType::String),
        ("NTGEW", DataType::String),
        (GLOBAL_MATERIAL_NUMBER, DataType::String),
    ])
});

/// The canonical output schema shared by both datasets and all systems.
pub static UNIFIED_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    schema(vec![
        ("material_number", DataType::String),
        ("client", DataType::String),
        ("primary_key_intra", DataType::String),
        ("primary_key_inter", DataType::String),
        ("company_code", DataType::String),
        ("valuation_area", DataType::String),
        ("planned_delivery_time", DataType::String),
        ("decoupling_time", DataType::String),
        ("discontinuation_indicator", DataType::String),
        ("unit_of_measure", DataType::String),
        ("name_of_plant", DataType::String),
        ("price_control_indicator", DataType::String),
        ("moving_average_price", DataType::Float64),
        ("standard_price", DataType::Float64),
        ("unit_price", DataType::Float64),
        ("valuation_class", DataType::String),
        ("currency_key", DataType::String),
        ("mtl_plant_emd", DataType::String),
        ("global_mtl_id", DataType::String),
        ("no_of_duplicates", DataType::Int32),
        ("order_number", DataType::String),
        ("source_system_erp", DataType::String),
        ("start_date_source", DataType::String),
        ("start_date", DataType::Date),
        ("order_start_timestamp_source", DataType::String),
        ("order_item_number", DataType::String),
        ("plant", DataType::String),
        ("sales_order_number", DataType::String),
        ("order_finish_timestamp_source", DataType::String),
        ("object_number", DataType::String),
        ("creation_date", DataType::Date),
        ("created_by", DataType::String),
        ("order_type", DataType::String),
        ("original_basic_finish_date", DataType::Date),
        ("project_text", DataType::String),
        ("material_type", DataType::String),
        ("net_weight", DataType::Float64),
        (GLOBAL_MATERIAL_NUMBER, DataType::String),
        ("on_time_flag", DataType::String),
        ("actual_on_time_deviation", DataType::Float64),
        ("late_delivery_bucket", DataType::String),
        ("mto_vs_mts_flag", DataType::String),
        ("order_finish_timestamp", DataType::Datetime(TimeUnit::Milliseconds, None)),
        ("order_start_timestamp", DataType::Datetime(TimeUnit::Milliseconds, None)),
    ])
});

/// Raw-to-canonical renames applied to the integrated local-material frame.
pub const LOCAL_MATERIAL_RENAME: &[(&str, &str)] = &[
    ("MATNR", "material_number"),
    ("SOURCE_SYSTEM_ERP", "source_system_erp"),
    ("MANDT", "client"),
    ("BUKRS", "company_code"),
    ("BWKEY", "valuation_area"),
    ("WERKS", "plant"),
    ("PLIFZ", "planned_delivery_time"),
    ("DZEIT", "decoupling_time"),
    ("DISLS", "discontinuation_indicator"),
    ("MEINS", "unit_of_measure"),
    ("NAME1", "name_of_plant"),
    ("VPRSV", "price_control_indicator"),
    ("VERPR", "moving_average_price"),
    ("STPRS", "standard_price"),
    ("PEINH", "unit_price"),
    ("BKLAS", "valuation_class"),
    ("WAERS", "currency_key"),
];

/// Raw-to-canonical renames applied to the integrated process-order frame.
pub const PROCESS_ORDER_RENAME: &[(&str, &str)] = &[
    ("MATNR", "material_number"),
    ("AUFNR", "order_number"),
    ("SOURCE_SYSTEM_ERP", "source_system_erp"),
    ("MANDT", "client"),
    ("GLTRP", "start_date_source"),
    ("GSTRI", "order_start_timestamp_source"),
    ("POSNR", "order_item_number"),
    ("DWERK", "plant"),
    ("KDAUF", "sales_order_number"),
    ("LTRMI", "order_finish_timestamp_source"),
    ("OBJNR", "object_number"),
    ("ERDAT", "creation_date"),
    ("ERNAM", "created_by"),
    ("AUART", "order_type"),
    ("ZZGLTRP_ORIG", "original_basic_finish_date"),
    ("ZZPRO_TEXT", "project_text"),
    ("MTART", "material_type"),
    ("NTGEW", "net_weight"),
];
