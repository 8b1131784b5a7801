//! Schema checks applied to document data at write time.
//!
//! Validation is presence-only: every field marked `required` must appear as a key
//! in the data. Values are not type-checked against `FieldSpec::field_type`, and a
//! key holding JSON `null` counts as present. Data must also be storable, which
//! rules out integers beyond the signed 64-bit range.

use serde_json::{Map, Value};

use crate::{
    error::{StoreError, StoreResult},
    schema::FieldSpec,
};

/// Returns the first required field (in schema order) missing from `data`.
pub fn first_missing_field<'a>(fields: &'a [FieldSpec], data: &Map<String, Value>) -> Option<&'a FieldSpec> {
    fields
        .iter()
        .find(|field| field.required && !data.contains_key(&field.name))
}

/// Checks `data` against `fields`.
///
/// # Errors
///
/// Returns [`StoreError::MissingRequiredField`] naming the first missing field.
pub fn validate_data(fields: &[FieldSpec], data: &Map<String, Value>) -> StoreResult<()> {
    match first_missing_field(fields, data) {
        Some(field) => Err(StoreError::MissingRequiredField { field: field.name.clone() }),
        None => Ok(()),
    }
}

/// Checks that every value in `data` has a stored representation.
///
/// Integers above `i64::MAX` parse as JSON but have no BSON integer type, and
/// converting them to a double would change the value.
///
/// # Errors
///
/// Returns [`StoreError::InvalidInput`] naming the path of the first such number.
pub fn check_storable(data: &Map<String, Value>) -> StoreResult<()> {
    for (key, value) in data {
        check_value(key.clone(), value)?;
    }

    Ok(())
}

fn check_value(path: String, value: &Value) -> StoreResult<()> {
    match value {
        Value::Number(number) if number.is_u64() && number.as_i64().is_none() => Err(StoreError::InvalidInput(
            format!("number at '{path}' is outside the signed 64-bit integer range"),
        )),
        Value::Object(map) => {
            for (key, nested) in map {
                check_value(format!("{path}.{key}"), nested)?;
            }
            Ok(())
        }
        Value::Array(items) => {
            for (position, item) in items.iter().enumerate() {
                check_value(format!("{path}[{position}]"), item)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
