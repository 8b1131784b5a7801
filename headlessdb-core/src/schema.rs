//! Collection definitions: a name plus an ordered list of field specs.
//!
//! Field order is kept exactly as the client sent it. It matters for display and
//! for which missing field gets reported first, but not for whether data is valid.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::{StoreError, StoreResult},
    record::Record,
};

/// A named schema that documents are validated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl Record for Collection {
    fn id(&self) -> &Uuid {
        &self.id
    }

    fn namespace() -> &'static str {
        "collections"
    }
}

/// One field of a collection's schema.
///
/// `field_type` is a free-form tag such as `"String"` or `"Number"`. It is kept for
/// clients but not enforced; only `required` affects validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    /// Declared default. Never applied to stored data.
    #[serde(default, alias = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            required: false,
            default_value: None,
        }
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// Payload for creating a collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCollection {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl NewCollection {
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self { name: name.into(), fields }
    }
}

/// Partial update of a collection. `None` leaves the attribute unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<FieldSpec>>,
}

impl CollectionPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.fields.is_none()
    }
}

pub(crate) fn check_name(name: &str) -> StoreResult<()> {
    if name.trim().is_empty() {
        return Err(StoreError::InvalidInput("collection name is required".to_string()));
    }

    Ok(())
}

pub(crate) fn check_fields(fields: &[FieldSpec]) -> StoreResult<()> {
    for (position, field) in fields.iter().enumerate() {
        if field.name.trim().is_empty() {
            return Err(StoreError::InvalidInput(format!("fields[{position}].name is required")));
        }
        if field.field_type.trim().is_empty() {
            return Err(StoreError::InvalidInput(format!(
                "fields[{position}].type is required for field '{}'",
                field.name,
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_field_spec_wire_format() {
        let field: FieldSpec = serde_json::from_value(json!({
            "name": "field1",
            "type": "String",
            "required": true,
            "default": "default1",
        }))
        .unwrap();

        assert_eq!(
            field,
            FieldSpec::new("field1", "String")
                .required()
                .with_default(json!("default1")),
        );
        assert_eq!(
            serde_json::to_value(&field).unwrap(),
            json!({"name": "field1", "type": "String", "required": true, "defaultValue": "default1"}),
        );
    }

    #[test]
    fn test_required_defaults_to_false() {
        let field: FieldSpec = serde_json::from_value(json!({"name": "field2", "type": "Number"})).unwrap();

        assert!(!field.required);
        assert!(field.default_value.is_none());
        assert_eq!(
            serde_json::to_value(&field).unwrap(),
            json!({"name": "field2", "type": "Number", "required": false}),
        );
    }

    #[test]
    fn test_check_name_rejects_blank() {
        assert!(check_name("books").is_ok());
        assert!(matches!(check_name(""), Err(StoreError::InvalidInput(_))));
        assert!(matches!(check_name("   "), Err(StoreError::InvalidInput(_))));
    }

    #[test]
    fn test_check_fields_requires_name_and_type() {
        assert!(check_fields(&[]).is_ok());
        assert!(check_fields(&[FieldSpec::new("title", "String")]).is_ok());

        let err = check_fields(&[FieldSpec::new("title", "String"), FieldSpec::new("", "Number")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: fields[1].name is required");

        let err = check_fields(&[FieldSpec::new("pages", "")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: fields[0].type is required for field 'pages'");
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(CollectionPatch::default().is_empty());
        assert!(!CollectionPatch { name: Some("x".into()), fields: None }.is_empty());
    }
}
