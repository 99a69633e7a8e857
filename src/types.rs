//! # Common Types
//!
//! This module contains the common types used throughout the application for
//! representing fetched records, chart requests, and aggregation results.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row fetched from a REST collection.
///
/// Records are opaque: there is no fixed schema, and fields are addressed
/// dynamically by name at aggregation time.
pub type Record = serde_json::Map<String, Value>;

/// The kind of chart to draw from an [`Aggregation`].
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Bar,
    Line,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Pie, ChartKind::Bar, ChartKind::Line];

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Pie => "Pie",
            ChartKind::Bar => "Bar",
            ChartKind::Line => "Line",
        }
    }
}

/// Field selectors describing how to group, measure, and relabel records.
///
/// `group_by_field` buckets the primary collection, `value_field` names the
/// numeric measure to accumulate, and `label_field` (when present) names the
/// field in the secondary collection that supplies a human-readable label for
/// each group key.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ChartQuery {
    pub group_by_field: String,
    pub value_field: String,
    pub label_field: Option<String>,
}

impl ChartQuery {
    pub fn new(
        group_by_field: impl Into<String>,
        value_field: impl Into<String>,
        label_field: Option<&str>,
    ) -> Self {
        Self {
            group_by_field: group_by_field.into(),
            value_field: value_field.into(),
            label_field: label_field.map(str::to_string),
        }
    }
}

/// Policy for records whose value field is falsy (absent, null, zero, empty
/// string, or false).
///
/// The observed behavior of the console this replaces is [`CountAsOne`]: a
/// record with no usable measure still counts as one occurrence. That policy
/// also swallows legitimate zero values, so it is configurable rather than
/// hardcoded.
///
/// [`CountAsOne`]: MissingValuePolicy::CountAsOne
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValuePolicy {
    #[default]
    CountAsOne,
    CountAsZero,
    Skip,
}

impl MissingValuePolicy {
    pub const ALL: [MissingValuePolicy; 3] = [
        MissingValuePolicy::CountAsOne,
        MissingValuePolicy::CountAsZero,
        MissingValuePolicy::Skip,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MissingValuePolicy::CountAsOne => "Count as 1",
            MissingValuePolicy::CountAsZero => "Count as 0",
            MissingValuePolicy::Skip => "Skip record",
        }
    }
}

/// An ordered mapping from display label to accumulated total.
///
/// Entries appear in first-encounter order of the primary-collection
/// traversal; consumers needing a different axis ordering must sort
/// downstream.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Aggregation {
    entries: Vec<(String, f64)>,
}

impl Aggregation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the bucket for `label`, creating the bucket at the end
    /// of the entry list if it does not exist yet.
    pub fn add(&mut self, label: &str, amount: f64) {
        match self.entries.iter_mut().find(|(l, _)| l == label) {
            Some((_, total)) => *total += amount,
            None => self.entries.push((label.to_string(), amount)),
        }
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all bucket totals.
    pub fn total(&self) -> f64 {
        self.values().sum()
    }

    /// Largest bucket total, or 0 for an empty aggregation.
    pub fn max_value(&self) -> f64 {
        self.values().fold(0.0, f64::max)
    }

    /// Stable hash of the entry list, used for plot-cache keys.
    pub fn data_hash(&self) -> u64 {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        for (label, value) in &self.entries {
            label.hash(&mut hasher);
            value.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }
}

impl FromIterator<(String, f64)> for Aggregation {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut agg = Aggregation::new();
        for (label, value) in iter {
            agg.add(&label, value);
        }
        agg
    }
}
