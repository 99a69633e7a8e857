//! Join-and-aggregate core.
//!
//! Pure functions that turn two freshly fetched record collections into an
//! ordered label-to-total mapping. No I/O, no errors: absent or falsy fields
//! coerce to fallback values instead of failing, matching the behavior of the
//! console this tool replaces.

use serde_json::Value;
use std::collections::HashMap;

use crate::types::{Aggregation, ChartQuery, MissingValuePolicy, Record};

/// Fallback bucket for primary records with no usable group key.
pub const UNKNOWN_GROUP: &str = "Unknown";

/// Render a scalar field value as a bucket key or display label.
///
/// Integral numbers render without a fractional part so that a numeric id
/// like `2` becomes the key `"2"`, never `"2.0"`.
fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Truthiness in the sense of the upstream data model: null, absent, `false`,
/// `0`, and the empty string are all falsy.
fn truthy(value: Option<&Value>) -> Option<&Value> {
    match value {
        Some(Value::Null) | None => None,
        Some(Value::Bool(false)) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
        Some(v) => Some(v),
    }
}

/// Resolve a record's group key, falling back to [`UNKNOWN_GROUP`] when the
/// field is absent or falsy.
fn group_key_of(record: &Record, group_by_field: &str) -> String {
    truthy(record.get(group_by_field))
        .map(scalar_to_string)
        .unwrap_or_else(|| UNKNOWN_GROUP.to_string())
}

/// Resolve a record's measure, if it carries a truthy numeric value.
///
/// Numeric strings count as numbers; anything else truthy has no numeric
/// interpretation and is treated as missing.
fn measure_of(record: &Record, value_field: &str) -> Option<f64> {
    match truthy(record.get(value_field))? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok().filter(|v| *v != 0.0),
        _ => None,
    }
}

/// Build the join lookup from group key to human-readable label.
///
/// Only populated when a label field was requested. Later secondary records
/// silently overwrite earlier ones sharing the same key.
pub fn build_label_lookup(
    secondary: &[Record],
    group_by_field: &str,
    label_field: Option<&str>,
) -> HashMap<String, String> {
    let mut lookup = HashMap::new();
    let Some(label_field) = label_field else {
        return lookup;
    };

    for record in secondary {
        if let (Some(key), Some(label)) = (record.get(group_by_field), record.get(label_field)) {
            lookup.insert(scalar_to_string(key), scalar_to_string(label));
        }
    }
    lookup
}

/// Group the primary collection and accumulate a total per display label.
///
/// Each primary record contributes to exactly one bucket. The bucket label is
/// the joined secondary label when one exists, else the raw group key, else
/// [`UNKNOWN_GROUP`]. Records with a falsy value field contribute according
/// to `policy`; under [`MissingValuePolicy::Skip`] they contribute nothing
/// and cannot create a bucket.
pub fn aggregate(
    primary: &[Record],
    secondary: &[Record],
    query: &ChartQuery,
    policy: MissingValuePolicy,
) -> Aggregation {
    let lookup = build_label_lookup(secondary, &query.group_by_field, query.label_field.as_deref());

    let mut result = Aggregation::new();
    for record in primary {
        let group_key = group_key_of(record, &query.group_by_field);
        let label = lookup.get(&group_key).unwrap_or(&group_key);

        let amount = match measure_of(record, &query.value_field) {
            Some(value) => value,
            None => match policy {
                MissingValuePolicy::CountAsOne => 1.0,
                MissingValuePolicy::CountAsZero => 0.0,
                MissingValuePolicy::Skip => continue,
            },
        };

        result.add(label, amount);
    }
    result
}

#[cfg(test)]
mod tests;
