// crates/sapbridge-core/src/harmonize.rs
//
// Schema enforcement and column mapping. `enforce_schema` selects the
// schema's columns that exist in the frame and casts them to the schema
// dtypes; `add_missing_columns` backfills absent columns as typed nulls.
// Together they guarantee the harmonization invariant: every output frame
// ends up with the same columns, order, and dtypes.

use polars::prelude::*;

use crate::error::Result;

pub(crate) fn date_options() -> StrptimeOptions {
    StrptimeOptions {
        format: Some("%Y-%m-%d".into()),
        strict: false,
        ..Default::default()
    }
}

fn inferred_options() -> StrptimeOptions {
    StrptimeOptions {
        format: None,
        strict: false,
        ..Default::default()
    }
}

/// Cast expression for one column, parsing rather than casting when the
/// source is a string and the target is temporal. The format is inferred
/// so both raw SAP dates and round-tripped CSV timestamps conform.
fn conforming_expr(name: &str, current: &DataType, target: &DataType) -> Expr {
    match (current, target) {
        (DataType::String, DataType::Date) => {
            col(name).str().to_date(inferred_options()).alias(name)
        }
        (DataType::String, DataType::Datetime(_, _)) => col(name)
            .str()
            .to_datetime(
                Some(TimeUnit::Milliseconds),
                None,
                inferred_options(),
                lit("raise"),
            )
            .alias(name),
        _ => col(name).cast(target.clone()),
    }
}

/// Select the columns of `schema` that exist in the frame, casting each to
/// the schema dtype. Missing columns are dropped here; `add_missing_columns`
/// restores them as nulls when the full shape is required.
pub fn enforce_schema(lf: LazyFrame, schema: &Schema) -> Result<LazyFrame> {
    let mut probe = lf.clone();
    let present = probe.collect_schema()?;

    let exprs: Vec<Expr> = schema
        .iter()
        .filter_map(|(name, dtype)| {
            present
                .get(name.as_str())
                .map(|current| conforming_expr(name.as_str(), current, dtype))
        })
        .collect();

    Ok(lf.select(exprs))
}

/// Add every `schema` column absent from the frame as a typed null, then
/// reorder to the schema's column order.
pub fn add_missing_columns(lf: LazyFrame, schema: &Schema) -> Result<LazyFrame> {
    let mut probe = lf.clone();
    let present = probe.collect_schema()?;

    let fills: Vec<Expr> = schema
        .iter()
        .filter(|(name, _)| present.get(name.as_str()).is_none())
        .map(|(name, dtype)| lit(NULL).cast(dtype.clone()).alias(name.as_str()))
        .collect();

    let lf = if fills.is_empty() {
        lf
    } else {
        lf.with_columns(fills)
    };

    let order: Vec<Expr> = schema.iter_names().map(|name| col(name.as_str())).collect();
    Ok(lf.select(order))
}

/// Apply a static rename map. With `select` the result contains only the
/// mapped columns (in map order); otherwise unmapped columns pass through
/// untouched. Map entries whose source column is absent are skipped.
pub fn rename_and_select(
    lf: LazyFrame,
    mapping: &[(&str, &str)],
    select: bool,
) -> Result<LazyFrame> {
    let mut probe = lf.clone();
    let present = probe.collect_schema()?;

    if select {
        let exprs: Vec<Expr> = mapping
            .iter()
            .copied()
            .filter(|&(from, _)| present.get(from).is_some())
            .map(|(from, to)| col(from).alias(to))
            .collect();
        return Ok(lf.select(exprs));
    }

    let (existing, new): (Vec<&str>, Vec<&str>) = mapping
        .iter()
        .copied()
        .filter(|&(from, _)| present.get(from).is_some())
        .unzip();

    Ok(lf.rename(existing, new, false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::UNIFIED_SCHEMA;

    fn sample() -> LazyFrame {
        df!(
            "MANDT" => [100i64, 100],
            "MATNR" => ["M100", "M200"],
            "VERPR" => ["10.5", "8.25"],
            "ERDAT" => ["2024-02-01", "2024-03-01"],
            "extra" => ["x", "y"],
        )
        .unwrap()
        .lazy()
    }

    #[test]
    fn enforce_schema_selects_casts_and_orders() {
        let schema = Schema::from_iter([
            Field::new("MATNR".into(), DataType::String),
            Field::new("MANDT".into(), DataType::String),
            Field::new("VERPR".into(), DataType::Float64),
            Field::new("ERDAT".into(), DataType::Date),
            Field::new("ABSENT".into(), DataType::String),
        ]);

        let df = enforce_schema(sample(), &schema).unwrap().collect().unwrap();

        assert_eq!(df.get_column_names(), ["MATNR", "MANDT", "VERPR", "ERDAT"]);
        assert_eq!(df.column("MANDT").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("VERPR").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("ERDAT").unwrap().dtype(), &DataType::Date);
    }

    #[test]
    fn add_missing_columns_backfills_typed_nulls() {
        let lf = df!("material_number" => ["M100"]).unwrap().lazy();
        let df = add_missing_columns(lf, &UNIFIED_SCHEMA).unwrap().collect().unwrap();

        assert_eq!(df.width(), UNIFIED_SCHEMA.len());
        let prices = df.column("moving_average_price").unwrap();
        assert_eq!(prices.dtype(), &DataType::Float64);
        assert_eq!(prices.null_count(), 1);

        let expected: Vec<&str> = UNIFIED_SCHEMA.iter_names().map(|n| n.as_str()).collect();
        assert_eq!(df.get_column_names(), expected);
    }

    #[test]
    fn rename_without_select_keeps_unmapped_columns() {
        let mapping = [("MATNR", "material_number"), ("NOPE", "nothing")];
        let df = rename_and_select(sample(), &mapping, false)
            .unwrap()
            .collect()
            .unwrap();

        assert!(df.column("material_number").is_ok());
        assert!(df.column("extra").is_ok());
        assert!(df.column("MATNR").is_err());
    }

    #[test]
    fn rename_with_select_drops_unmapped_columns() {
        let mapping = [("MATNR", "material_number")];
        let df = rename_and_select(sample(), &mapping, true)
            .unwrap()
            .collect()
            .unwrap();

        assert_eq!(df.get_column_names(), ["material_number"]);
    }
}
