//! Heterogeneous form records.
//!
//! A [`FieldRecord`] maps field names to values of one of three shapes:
//! a scalar string, an ordered list of structured entries (financial accounts),
//! or a fixed-shape nested object (per-platform counts). The shape is carried
//! by the [`FieldValue`] variant, and every per-shape operation (comparison,
//! display, emptiness) dispatches on it in one place.
//!
//! On the wire a record is plain JSON/YAML: strings are scalars, arrays are
//! lists, maps are objects.
//!
//! ```
//! use dealflow::models::field::{FieldRecord, FieldShape};
//!
//! let record = FieldRecord::from_json(r#"{
//!     "activeClasses": "4",
//!     "financialAccounts": [{"name": "Operating", "number": "1001"}],
//!     "platformCounts": {"quickbooks": 2, "xero": 0}
//! }"#).unwrap();
//!
//! assert_eq!(record.get("activeClasses").unwrap().shape(), FieldShape::Scalar);
//! assert_eq!(record.get("financialAccounts").unwrap().shape(), FieldShape::List);
//! assert_eq!(record.get("platformCounts").unwrap().shape(), FieldShape::Object);
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One structured entry of a list field, e.g. a financial account.
pub type FieldEntry = BTreeMap<String, serde_json::Value>;

/// Shape tag of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldShape {
    Scalar,
    List,
    Object,
}

impl std::fmt::Display for FieldShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldShape::Scalar => write!(f, "scalar"),
            FieldShape::List => write!(f, "list"),
            FieldShape::Object => write!(f, "object"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<FieldEntry>),
    Object(BTreeMap<String, serde_json::Value>),
}

impl FieldValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        FieldValue::Scalar(value.into())
    }

    pub fn shape(&self) -> FieldShape {
        match self {
            FieldValue::Scalar(_) => FieldShape::Scalar,
            FieldValue::List(_) => FieldShape::List,
            FieldValue::Object(_) => FieldShape::Object,
        }
    }

    /// The empty value of a shape.
    pub fn empty(shape: FieldShape) -> Self {
        match shape {
            FieldShape::Scalar => FieldValue::Scalar(String::new()),
            FieldShape::List => FieldValue::List(Vec::new()),
            FieldShape::Object => FieldValue::Object(BTreeMap::new()),
        }
    }

    /// Whitespace-only scalars count as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Scalar(s) => s.trim().is_empty(),
            FieldValue::List(entries) => entries.is_empty(),
            FieldValue::Object(map) => map.is_empty(),
        }
    }

    /// Single-line rendering for operator display.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Scalar(s) if s.trim().is_empty() => "(empty)".to_string(),
            FieldValue::Scalar(s) => s.trim().to_string(),
            FieldValue::List(entries) if entries.is_empty() => "(no entries)".to_string(),
            FieldValue::List(entries) => entries
                .iter()
                .map(|entry| format!("[{}]", render_pairs(entry)))
                .collect::<Vec<_>>()
                .join(" "),
            FieldValue::Object(map) if map.is_empty() => "(empty)".to_string(),
            FieldValue::Object(map) => render_pairs(map),
        }
    }

    /// Parse a value from JSON. Bare text that is not valid JSON is taken
    /// as a scalar, so `4` and `"4"` and `four` all work from the command line.
    pub fn parse_lenient(input: &str) -> Result<Self> {
        match serde_json::from_str::<serde_json::Value>(input) {
            Ok(serde_json::Value::Number(n)) => Ok(FieldValue::Scalar(n.to_string())),
            Ok(serde_json::Value::Bool(b)) => Ok(FieldValue::Scalar(b.to_string())),
            Ok(value) => serde_json::from_value(value)
                .with_context(|| format!("Not a scalar, list or object value: {input}")),
            Err(_) => Ok(FieldValue::Scalar(input.to_string())),
        }
    }
}

fn render_pairs(map: &BTreeMap<String, serde_json::Value>) -> String {
    map.iter()
        .map(|(key, value)| match value {
            serde_json::Value::String(s) => format!("{key}: {s}"),
            other => format!("{key}: {other}"),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Flat mapping from field name to value. Iteration is in field-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldRecord(BTreeMap<String, FieldValue>);

impl FieldRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: FieldValue) -> Self {
        self.0.insert(field.into(), value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.0.insert(field.into(), value)
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse field record JSON")
    }
}

impl FromIterator<(String, FieldValue)> for FieldRecord {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        FieldRecord(iter.into_iter().collect())
    }
}
