//! Fixed column tables for the somatic assay model.
//!
//! User-facing filter names differ from the physical column names on the
//! `variant_read_optimized` table; the conversion table maps between them.
//! The return-column list fixes which columns every extraction query
//! retrieves, in order.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

static COLUMN_CONVERSION: Lazy<BTreeMap<String, String>> = Lazy::new(|| {
    serde_json::from_str(include_str!("../assets/somatic_column_conversion.json"))
        .expect("column conversion table is valid JSON")
});

static RETURN_COLUMNS: Lazy<Vec<BTreeMap<String, String>>> = Lazy::new(|| {
    serde_json::from_str(include_str!("../assets/return_columns_somatic.json"))
        .expect("return column table is valid JSON")
});

/// Map a friendly filter name to its qualified column, if known.
#[must_use]
pub fn column_for(friendly_name: &str) -> Option<&'static str> {
    COLUMN_CONVERSION.get(friendly_name).map(String::as_str)
}

/// The fixed, ordered return-column list.
#[must_use]
pub fn return_columns() -> &'static [BTreeMap<String, String>] {
    &RETURN_COLUMNS
}

/// The user-facing field names of [`return_columns`], in order.
#[must_use]
pub fn return_field_names() -> Vec<String> {
    RETURN_COLUMNS
        .iter()
        .filter_map(|entry| entry.keys().next().cloned())
        .collect()
}
