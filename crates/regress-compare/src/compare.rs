//! Shallow response comparison

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::CompareError;

/// Both sides of one differing top-level key; a missing key shows as `null`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyDifference {
    #[serde(rename = "ref")]
    pub reference: Value,
    pub version: Value,
}

/// Differing top-level keys, sorted by key
pub type DifferenceSet = BTreeMap<String, KeyDifference>;

/// Compare two JSON objects key by key, one level deep
///
/// Nested objects and arrays are compared as whole values. A key missing on
/// one side compares as `null`, so `{"a": null}` and `{}` are equal.
/// Returns `None` when no key differs.
pub fn compare_json(
    reference: &Value,
    version: &Value,
) -> Result<Option<DifferenceSet>, CompareError> {
    let reference = as_object("reference", reference)?;
    let version = as_object("version", version)?;

    let keys: BTreeSet<&String> = reference.keys().chain(version.keys()).collect();

    let differences: DifferenceSet = keys
        .into_iter()
        .filter_map(|key| {
            let ref_value = reference.get(key).unwrap_or(&Value::Null);
            let version_value = version.get(key).unwrap_or(&Value::Null);
            (ref_value != version_value).then(|| {
                (
                    key.clone(),
                    KeyDifference {
                        reference: ref_value.clone(),
                        version: version_value.clone(),
                    },
                )
            })
        })
        .collect();

    Ok((!differences.is_empty()).then_some(differences))
}

fn as_object<'a>(
    side: &'static str,
    value: &'a Value,
) -> Result<&'a Map<String, Value>, CompareError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(CompareError::NotAnObject {
            side,
            found: kind_of(other),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
