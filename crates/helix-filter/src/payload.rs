//! Filter payload assembly.
//!
//! The payload grammar is small: a *basic* filter constrains one column to a
//! value list, a *compound* groups filters under an `and`/`or` logic, and
//! the top-level assay filter wraps everything with the assay's name and ID.
//! Locations are special-cased: the somatic assay model has no geno-bin
//! index, so each location becomes a chromosome/position compound.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::columns::{column_for, return_columns, return_field_names};
use crate::error::FilterError;

/// The qualified chromosome column.
const CHROM_COLUMN: &str = "variant_read_optimized$CHROM";
/// The qualified position column.
const POS_COLUMN: &str = "variant_read_optimized$POS";

/// Widest region a single location filter may span, in bases.
pub const MAX_REGION_SPAN: i64 = 250_000_000;

/// Comparison operators understood by the visualization server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionOp {
    /// Membership in a value list.
    In,
    /// Equality with a scalar.
    Is,
    /// Strictly greater than a scalar.
    GreaterThan,
    /// Strictly less than a scalar.
    LessThan,
}

/// One condition on a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    /// The comparison operator.
    pub condition: ConditionOp,
    /// The comparison value: a list for `in`, a scalar otherwise.
    pub values: Value,
}

impl FilterCondition {
    fn new(condition: ConditionOp, values: Value) -> Self {
        Self { condition, values }
    }
}

/// A node of the filter tree: either a leaf filter map or a nested compound.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterNode {
    /// A map of column filters combined under one logic.
    Filters {
        /// Column → conditions.
        filters: BTreeMap<String, Vec<FilterCondition>>,
        /// Combining logic, `and` or `or`.
        logic: String,
    },
    /// A list of sub-nodes combined under one logic.
    Compound {
        /// The sub-nodes.
        compound: Vec<FilterNode>,
        /// Combining logic, `and` or `or`.
        logic: String,
    },
}

impl FilterNode {
    /// A leaf node combining its filters with `and`.
    #[must_use]
    pub fn all(filters: BTreeMap<String, Vec<FilterCondition>>) -> Self {
        Self::Filters {
            filters,
            logic: "and".to_string(),
        }
    }

    /// A compound node combining its children with `or`.
    #[must_use]
    pub fn any_of(compound: Vec<FilterNode>) -> Self {
        Self::Compound {
            compound,
            logic: "or".to_string(),
        }
    }
}

/// One genomic location from the user's filter document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Location {
    /// Chromosome name, as spelled in the dataset.
    pub chromosome: String,
    /// Inclusive start position.
    #[serde(deserialize_with = "position")]
    pub starting_position: i64,
    /// Inclusive end position.
    #[serde(deserialize_with = "position")]
    pub ending_position: i64,
}

// Positions arrive as strings in filter documents but bare numbers are
// accepted too.
fn position<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid position: {s}"))),
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| serde::de::Error::custom(format!("invalid position: {n}"))),
        other => Err(serde::de::Error::custom(format!(
            "invalid position: {other}"
        ))),
    }
}

/// The assay filter wrapper: name, ID, and the filter tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssayFilter {
    /// Assay name.
    pub name: String,
    /// Assay UUID.
    pub id: String,
    /// Top-level combining logic.
    pub logic: String,
    /// The filter tree.
    pub compound: Vec<FilterNode>,
}

/// The `raw_filters` envelope of the final payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawFilters {
    /// The assay filter.
    pub assay_filters: AssayFilter,
}

/// The complete payload POSTed to the visualization server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SomaticPayload {
    /// Project the query is billed against.
    pub project_context: String,
    /// Ordered return columns.
    pub fields: Vec<BTreeMap<String, String>>,
    /// The assembled filters.
    pub raw_filters: RawFilters,
    /// Always set for somatic extraction queries.
    pub is_cohort: bool,
    /// Deduplicate returned rows.
    pub distinct: bool,
}

/// Build one basic filter: the qualified column and its `in` condition.
///
/// # Errors
///
/// Returns an error for filter names with no column mapping.
pub fn basic_filter(
    friendly_name: &str,
    values: &[Value],
) -> Result<(String, Vec<FilterCondition>), FilterError> {
    let column = column_for(friendly_name)
        .ok_or_else(|| FilterError::UnknownFilter(friendly_name.to_string()))?;
    let condition = FilterCondition::new(ConditionOp::In, Value::Array(values.to_vec()));
    Ok((column.to_string(), vec![condition]))
}

/// Build the OR-compound of location filters.
///
/// Each location becomes an AND of `CHROM is <chromosome>` and
/// `POS greater-than <start>` / `POS less-than <end>`.
///
/// # Errors
///
/// Returns an error when a location spans more than [`MAX_REGION_SPAN`]
/// bases.
pub fn location_filter(locations: &[Location]) -> Result<FilterNode, FilterError> {
    let mut compound = Vec::with_capacity(locations.len());
    for location in locations {
        let span = location.ending_position - location.starting_position;
        if span > MAX_REGION_SPAN {
            return Err(FilterError::RegionTooWide {
                chromosome: location.chromosome.clone(),
                span,
            });
        }
        let mut filters = BTreeMap::new();
        filters.insert(
            CHROM_COLUMN.to_string(),
            vec![FilterCondition::new(
                ConditionOp::Is,
                Value::String(location.chromosome.clone()),
            )],
        );
        filters.insert(
            POS_COLUMN.to_string(),
            vec![
                FilterCondition::new(
                    ConditionOp::GreaterThan,
                    Value::from(location.starting_position),
                ),
                FilterCondition::new(
                    ConditionOp::LessThan,
                    Value::from(location.ending_position),
                ),
            ],
        );
        compound.push(FilterNode::all(filters));
    }
    Ok(FilterNode::any_of(compound))
}

/// Build the assay filter from a user filter document.
///
/// The `location` group (when present) contributes its OR-compound ahead of
/// a single AND-compound holding every other group's basic filters.
///
/// # Errors
///
/// Returns an error for malformed groups, unknown filter names, or invalid
/// locations.
pub fn assay_filter(
    input: &Map<String, Value>,
    name: &str,
    id: &str,
) -> Result<AssayFilter, FilterError> {
    let mut compound = Vec::new();
    let mut basic = BTreeMap::new();

    for (group, members) in input {
        if group == "location" {
            let locations: Vec<Location> = serde_json::from_value(members.clone())
                .map_err(|e| FilterError::InvalidLocation(e.to_string()))?;
            compound.push(location_filter(&locations)?);
            continue;
        }
        let members = members.as_object().ok_or_else(|| {
            FilterError::InvalidInput(format!("filter group \"{group}\" must be an object"))
        })?;
        for (filter_name, values) in members {
            let values = values.as_array().ok_or_else(|| {
                FilterError::InvalidInput(format!(
                    "values for \"{filter_name}\" must be an array"
                ))
            })?;
            let (column, conditions) = basic_filter(filter_name, values)?;
            basic.insert(column, conditions);
        }
    }

    // The basic compound is always present, even when empty.
    compound.push(FilterNode::all(basic));

    Ok(AssayFilter {
        name: name.to_string(),
        id: id.to_string(),
        logic: "and".to_string(),
        compound,
    })
}

/// Assemble the full visualization-server payload.
///
/// Returns the payload plus the ordered field names of its return columns,
/// for callers that print rows.
///
/// # Errors
///
/// Returns any error from [`assay_filter`].
pub fn final_payload(
    input: &Map<String, Value>,
    name: &str,
    id: &str,
    project_context: &str,
) -> Result<(SomaticPayload, Vec<String>), FilterError> {
    let assay = assay_filter(input, name, id)?;
    let payload = SomaticPayload {
        project_context: project_context.to_string(),
        fields: return_columns().to_vec(),
        raw_filters: RawFilters {
            assay_filters: assay,
        },
        is_cohort: true,
        distinct: true,
    };
    Ok((payload, return_field_names()))
}
