//! # helix-filter
//!
//! Builds the filter payload the toolkit POSTs to the Helix visualization
//! server when extracting somatic variant data.
//!
//! A user supplies a filter document grouping friendly filter names and
//! values, plus optional genomic locations:
//!
//! ```json
//! {
//!     "annotation": { "gene": ["TP53"], "symbol": ["TP53"] },
//!     "allele": { "allele_type": ["SNP"] },
//!     "location": [
//!         { "chromosome": "17", "starting_position": "7565097",
//!           "ending_position": "7590856" }
//!     ]
//! }
//! ```
//!
//! [`final_payload`] turns that into the full query payload: friendly names
//! are mapped through a fixed column table onto the
//! `variant_read_optimized` table, locations become an OR-compound of
//! chromosome/position filters, and the whole thing is wrapped with the
//! project context and the fixed return-column list.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod columns;
pub mod error;
pub mod payload;

pub use columns::{column_for, return_columns, return_field_names};
pub use error::FilterError;
pub use payload::{
    assay_filter, basic_filter, final_payload, location_filter, AssayFilter, ConditionOp,
    FilterCondition, FilterNode, Location, RawFilters, SomaticPayload, MAX_REGION_SPAN,
};
