// crates/sapbridge-core/src/postprocess.rs
//
// Derived keys, duplicate accounting, and order delivery metrics applied
// to the integrated frames before the canonical rename.

use polars::prelude::*;

use crate::error::Result;
use crate::harmonize::date_options;
use crate::schema::GLOBAL_MATERIAL_NUMBER;

fn date_expr(name: &str, present: &Schema) -> Expr {
    match present.get(name) {
        Some(DataType::String) => col(name).str().to_date(date_options()),
        _ => col(name).cast(DataType::Date),
    }
}

/// Local-material post-processing: plant description, global material id,
/// intra/inter primary keys, duplicate count, and deduplication on the
/// inter-system key.
pub fn post_prep_local_material(lf: LazyFrame) -> Result<LazyFrame> {
    let lf = lf
        .with_column(concat_str([col("WERKS"), col("NAME1")], "-", true).alias("mtl_plant_emd"))
        .with_column(
            when(col("MATNR").is_not_null())
                .then(col("MATNR"))
                .otherwise(col(GLOBAL_MATERIAL_NUMBER))
                .alias("global_mtl_id"),
        )
        .with_columns([
            concat_str([col("MATNR"), col("WERKS")], "-", true).alias("primary_key_intra"),
            concat_str(
                [col("SOURCE_SYSTEM_ERP"), col("MATNR"), col("WERKS")],
                "-",
                true,
            )
            .alias("primary_key_inter"),
        ])
        .with_column(
            len()
                .over([col("SOURCE_SYSTEM_ERP"), col("MATNR"), col("WERKS")])
                .cast(DataType::Int32)
                .alias("no_of_duplicates"),
        )
        .unique_stable(
            Some(vec![
                "SOURCE_SYSTEM_ERP".into(),
                "MATNR".into(),
                "WERKS".into(),
            ]),
            UniqueKeepStrategy::First,
        );

    Ok(lf)
}

/// Process-order post-processing: primary keys, on-time delivery flag and
/// deviation, late-delivery bucket, MTO/MTS classification, and order
/// start/finish timestamps.
///
/// A missing ZZGLTRP_ORIG column is tolerated and treated as all-null;
/// rows without both dates get a null flag, deviation, and bucket.
pub fn post_prep_process_order(lf: LazyFrame) -> Result<LazyFrame> {
    let mut lf = lf;
    let mut probe = lf.clone();
    let present = probe.collect_schema()?;

    if present.get("ZZGLTRP_ORIG").is_none() {
        lf = lf.with_column(lit(NULL).cast(DataType::String).alias("ZZGLTRP_ORIG"));
    }

    let finish_original = date_expr("ZZGLTRP_ORIG", &present);
    let finish_actual = date_expr("LTRMI", &present);

    let lf = lf
        .with_columns([
            concat_str([col("AUFNR"), col("POSNR"), col("DWERK")], "_", true)
                .alias("primary_key_intra"),
            concat_str(
                [col("SOURCE_SYSTEM_ERP"), col("AUFNR"), col("POSNR"), col("DWERK")],
                "_",
                true,
            )
            .alias("primary_key_inter"),
        ])
        .with_column(
            (finish_original - finish_actual)
                .dt()
                .total_days()
                .cast(DataType::Float64)
                .alias("actual_on_time_deviation"),
        )
        .with_column(
            when(col("actual_on_time_deviation").is_null())
                .then(lit(NULL).cast(DataType::Int32))
                .when(col("actual_on_time_deviation").gt_eq(lit(0.0)))
                .then(lit(1))
                .otherwise(lit(0))
                .alias("on_time_flag"),
        )
        .with_column(
            when(col("actual_on_time_deviation").is_null())
                .then(lit(NULL).cast(DataType::String))
                .when(col("actual_on_time_deviation").lt_eq(lit(0.0)))
                .then(lit("On-Time"))
                .when(col("actual_on_time_deviation").lt_eq(lit(5.0)))
                .then(lit("Slightly Late"))
                .when(col("actual_on_time_deviation").lt_eq(lit(10.0)))
                .then(lit("Moderately Late"))
                .otherwise(lit("Severely Late"))
                .alias("late_delivery_bucket"),
        )
        .with_column(
            when(col("KDAUF").is_not_null())
                .then(lit("MTO"))
                .otherwise(lit("MTS"))
                .alias("mto_vs_mts_flag"),
        )
        .with_columns([
            col("LTRMI")
                .str()
                .to_datetime(
                    Some(TimeUnit::Milliseconds),
                    None,
                    date_options(),
                    lit("raise"),
                )
                .alias("order_finish_timestamp"),
            col("GSTRI")
                .str()
                .to_datetime(
                    Some(TimeUnit::Milliseconds),
                    None,
                    date_options(),
                    lit("raise"),
                )
                .alias("order_start_timestamp"),
        ]);

    Ok(lf)
}
