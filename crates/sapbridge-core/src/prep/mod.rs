// crates/sapbridge-core/src/prep/mod.rs
//
// Per-table preparation rules: mandatory-field filters, deduplication,
// and raw-schema enforcement, one function per SAP table.

mod material;
mod order;

pub use material::{
    prep_company_codes, prep_general_material_data, prep_material_valuation,
    prep_plant_and_branches, prep_plant_data_for_material, prep_valuation_area,
};
pub use order::prep_order_header_data;
