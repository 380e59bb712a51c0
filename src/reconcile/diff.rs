//! Shape-aware comparison of field records.
//!
//! Scalars compare after trimming surrounding whitespace. Lists compare entry
//! by entry in order, objects by full structural equality. Values of
//! different shapes always differ.

use std::collections::BTreeSet;

use crate::models::field::{FieldRecord, FieldValue};

/// Whether two present values differ.
pub fn fields_differ(a: &FieldValue, b: &FieldValue) -> bool {
    match (a, b) {
        (FieldValue::Scalar(x), FieldValue::Scalar(y)) => x.trim() != y.trim(),
        (FieldValue::List(x), FieldValue::List(y)) => x != y,
        (FieldValue::Object(x), FieldValue::Object(y)) => x != y,
        _ => true,
    }
}

/// Whether a field differs between two records. A field missing on one side
/// is compared as the empty value of the other side's shape.
pub fn field_differs(a: Option<&FieldValue>, b: Option<&FieldValue>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => fields_differ(a, b),
        (Some(present), None) | (None, Some(present)) => {
            fields_differ(present, &FieldValue::empty(present.shape()))
        }
        (None, None) => false,
    }
}

/// Every field name, across both records, whose values differ.
pub fn diff_all(a: &FieldRecord, b: &FieldRecord) -> BTreeSet<String> {
    union_of_fields(a, b)
        .into_iter()
        .filter(|field| field_differs(a.get(field), b.get(field)))
        .collect()
}

pub(crate) fn union_of_fields(a: &FieldRecord, b: &FieldRecord) -> BTreeSet<String> {
    a.field_names()
        .chain(b.field_names())
        .map(str::to_string)
        .collect()
}
