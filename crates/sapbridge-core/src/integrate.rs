// crates/sapbridge-core/src/integrate.rs
//
// Left-join integration of the prepared tables. The base table (MARC for
// local material, AFKO for process orders) is never reduced: all joins
// are left joins on the prepared frames.

use polars::prelude::*;

use crate::error::Result;

/// Integrate the prepared local-material tables. MARC carries the
/// plant-level rows; MARA contributes MANDT, so the client-keyed joins
/// must follow the MARA join.
pub fn integrate_local_material(
    marc: LazyFrame,
    mara: LazyFrame,
    mbew: LazyFrame,
    t001w: LazyFrame,
    t001k: LazyFrame,
    t001: LazyFrame,
) -> Result<LazyFrame> {
    let lf = marc
        .join(mara, [col("MATNR")], [col("MATNR")], JoinArgs::new(JoinType::Left))
        .join(
            t001w,
            [col("MANDT"), col("WERKS")],
            [col("MANDT"), col("WERKS")],
            JoinArgs::new(JoinType::Left),
        )
        .join(
            mbew,
            [col("MANDT"), col("MATNR"), col("BWKEY")],
            [col("MANDT"), col("MATNR"), col("BWKEY")],
            JoinArgs::new(JoinType::Left),
        )
        .join(
            t001k,
            [col("MANDT"), col("BWKEY")],
            [col("MANDT"), col("BWKEY")],
            JoinArgs::new(JoinType::Left),
        )
        .join(
            t001,
            [col("MANDT"), col("BUKRS")],
            [col("MANDT"), col("BUKRS")],
            JoinArgs::new(JoinType::Left),
        );

    Ok(lf)
}

/// Integrate the prepared process-order tables and resolve the basic
/// finish date: ZZGLTRP_ORIG wins over GLTRP when present.
pub fn integrate_process_order(
    afko: LazyFrame,
    afpo: LazyFrame,
    aufk: LazyFrame,
    mara: LazyFrame,
) -> Result<LazyFrame> {
    let lf = afko
        .join(afpo, [col("AUFNR")], [col("AUFNR")], JoinArgs::new(JoinType::Left))
        .join(aufk, [col("AUFNR")], [col("AUFNR")], JoinArgs::new(JoinType::Left))
        .join(mara, [col("MATNR")], [col("MATNR")], JoinArgs::new(JoinType::Left))
        .with_column(
            when(col("ZZGLTRP_ORIG").is_not_null())
                .then(col("ZZGLTRP_ORIG"))
                .otherwise(col("GLTRP"))
                .alias("GLTRP"),
        );

    Ok(lf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_material_integration_preserves_marc_rows() {
        let marc = df!(
            "SOURCE_SYSTEM_ERP" => ["S1", "S1"],
            "MATNR" => ["M100", "M999"],
            "WERKS" => ["P001", "P009"],
            "PLIFZ" => ["7", "3"],
            "DZEIT" => ["2", "1"],
            "DISLS" => ["L1", "L2"],
        )
        .unwrap()
        .lazy();
        let mara = df!(
            "MANDT" => ["100"],
            "MATNR" => ["M100"],
            "MEINS" => ["EA"],
            "global_material_number" => ["G100"],
        )
        .unwrap()
        .lazy();
        let mbew = df!(
            "MANDT" => ["100"],
            "MATNR" => ["M100"],
            "BWKEY" => ["V001"],
            "VPRSV" => ["S"],
            "VERPR" => [10.5],
            "STPRS" => [11.0],
            "PEINH" => [1.0],
            "BKLAS" => ["3000"],
        )
        .unwrap()
        .lazy();
        let t001w = df!(
            "MANDT" => ["100"],
            "WERKS" => ["P001"],
            "BWKEY" => ["V001"],
            "NAME1" => ["Hamburg"],
        )
        .unwrap()
        .lazy();
        let t001k = df!(
            "MANDT" => ["100"],
            "BUKRS" => ["C001"],
            "BWKEY" => ["V001"],
        )
        .unwrap()
        .lazy();
        let t001 = df!(
            "MANDT" => ["100"],
            "BUKRS" => ["C001"],
            "WAERS" => ["EUR"],
        )
        .unwrap()
        .lazy();

        let df = integrate_local_material(marc, mara, mbew, t001w, t001k, t001)
            .unwrap()
            .collect()
            .unwrap();

        // M999 has no matches anywhere but must survive the joins
        assert_eq!(df.height(), 2);

        let mask = df.column("MATNR").unwrap().str().unwrap().equal("M100");
        let m100 = df.filter(&mask).unwrap();
        let waers = m100.column("WAERS").unwrap().str().unwrap().get(0);
        assert_eq!(waers, Some("EUR"));
    }

    #[test]
    fn process_order_finish_date_prefers_original() {
        let afko = df!(
            "SOURCE_SYSTEM_ERP" => ["S1", "S1"],
            "MANDT" => ["100", "100"],
            "AUFNR" => ["O100", "O200"],
            "GLTRP" => ["2024-03-20", "2024-04-10"],
            "GSTRI" => ["2024-03-16", "2024-04-02"],
        )
        .unwrap()
        .lazy();
        let afpo = df!(
            "AUFNR" => ["O100", "O200"],
            "POSNR" => ["0001", "0001"],
            "DWERK" => ["P001", "P002"],
            "MATNR" => ["M100", "M200"],
            "KDAUF" => [Some("SO99"), None],
            "LTRMI" => ["2024-03-18", "2024-04-12"],
        )
        .unwrap()
        .lazy();
        let aufk = df!(
            "AUFNR" => ["O100", "O200"],
            "OBJNR" => ["OB1", "OB2"],
            "ERDAT" => ["2024-02-01", "2024-03-01"],
            "ERNAM" => ["ALICE", "BOB"],
            "AUART" => ["PP01", "PP01"],
            "ZZGLTRP_ORIG" => [Some("2024-03-25"), None],
            "ZZPRO_TEXT" => ["ProjA", "ProjB"],
        )
        .unwrap()
        .lazy();
        let mara = df!(
            "MATNR" => ["M100", "M200"],
            "MTART" => ["FERT", "HALB"],
            "NTGEW" => ["12.5", "3.2"],
            "global_material_number" => ["G100", "G200"],
        )
        .unwrap()
        .lazy();

        let df = integrate_process_order(afko, afpo, aufk, mara)
            .unwrap()
            .collect()
            .unwrap();

        let gltrp: Vec<Option<&str>> =
            df.column("GLTRP").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(gltrp, [Some("2024-03-25"), Some("2024-04-10")]);
    }
}
