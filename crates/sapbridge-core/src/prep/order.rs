// crates/sapbridge-core/src/prep/order.rs

use chrono::Utc;
use polars::prelude::*;

use crate::error::Result;
use crate::harmonize::{date_options, enforce_schema};
use crate::schema::AFKO_SCHEMA;

/// Prepare order header data (AFKO). Derives `start_date` as the first
/// day of the GSTRP month; rows without a basic start date fall back to
/// the current month.
pub fn prep_order_header_data(lf: LazyFrame) -> Result<LazyFrame> {
    let current_month = Utc::now().format("%Y-%m").to_string();

    let mut probe = lf.clone();
    let present = probe.collect_schema()?;
    let gstrp = match present.get("GSTRP") {
        Some(DataType::String) => col("GSTRP").str().to_date(date_options()),
        _ => col("GSTRP").cast(DataType::Date),
    };

    let lf = lf
        .with_column(
            when(gstrp.clone().is_null())
                .then(lit(current_month))
                .otherwise(gstrp.dt().strftime("%Y-%m"))
                .alias("start_date"),
        )
        .with_column(concat_str([col("start_date"), lit("01")], "-", true).alias("start_date"));

    enforce_schema(lf, &AFKO_SCHEMA)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn start_date_snaps_to_first_of_month_with_current_month_fallback() {
        let lf = df!(
            "SOURCE_SYSTEM_ERP" => ["S1", "S1"],
            "MANDT" => ["100", "100"],
            "AUFNR" => ["O100", "O200"],
            "GSTRP" => [Some("2024-03-15"), None],
            "GLTRP" => ["2024-03-20", "2024-04-10"],
            "GSTRI" => ["2024-03-16", "2024-04-02"],
        )
        .unwrap()
        .lazy();

        let df = prep_order_header_data(lf).unwrap().collect().unwrap();

        assert_eq!(df.column("start_date").unwrap().dtype(), &DataType::Date);

        let rendered = df
            .column("start_date")
            .unwrap()
            .cast(&DataType::String)
            .unwrap();
        let rendered = rendered.str().unwrap();
        assert_eq!(rendered.get(0), Some("2024-03-01"));

        let now = Utc::now();
        let fallback = format!("{:04}-{:02}-01", now.year(), now.month());
        assert_eq!(rendered.get(1), Some(fallback.as_str()));

        // finish_date never exists in the raw file and must not be invented here
        assert!(df.column("finish_date").is_err());
    }
}
