//! FormProperties: the set of field descriptors making up one form.
//!
//! Accepts the form-fields response envelope
//! (`{"properties": {...}, "revision": "..."}`), a bare mapping of field
//! code to descriptor, or a sequence of descriptors keyed by their `code`,
//! from JSON or YAML. Mapping order is preserved.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::classifier::classify;
use crate::error::{FieldsError, Result};
use crate::groups::FieldGroups;
use crate::types::{backfill_codes, FieldDescriptor};

/// Field descriptors of a form, keyed by field code.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormProperties {
    pub properties: IndexMap<String, FieldDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

#[derive(Deserialize)]
struct Envelope {
    properties: Value,
    #[serde(default)]
    revision: Option<Value>,
}

impl FormProperties {
    pub fn new(properties: IndexMap<String, FieldDescriptor>) -> Self {
        Self {
            properties,
            revision: None,
        }
    }

    /// Parse JSON text in any accepted shape.
    ///
    /// Table nesting is not depth-limited, so the parser's recursion limit
    /// is lifted.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let mut de = serde_json::Deserializer::from_str(input);
        de.disable_recursion_limit();
        let value = Value::deserialize(&mut de)?;
        de.end()?;
        Self::from_value(value)
    }

    /// Parse YAML text in any accepted shape.
    pub fn from_yaml_str(input: &str) -> Result<Self> {
        let value: Value = serde_yaml_ng::from_str(input)?;
        Self::from_value(value)
    }

    /// Read a file, picking YAML for `.yaml`/`.yml` and JSON otherwise.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| FieldsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let form = if is_yaml {
            Self::from_yaml_str(&content)?
        } else {
            Self::from_json_str(&content)?
        };

        debug!(path = %path.display(), fields = form.len(), "loaded form properties");
        Ok(form)
    }

    /// Build from an already-parsed document.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut form = if is_envelope(&value) {
            let envelope: Envelope = serde_json::from_value(value)?;
            Self {
                properties: descriptors(envelope.properties)?,
                revision: envelope.revision.and_then(revision_string),
            }
        } else {
            Self::new(descriptors(value)?)
        };
        backfill_codes(&mut form.properties);
        Ok(form)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn get(&self, code: &str) -> Option<&FieldDescriptor> {
        self.properties.get(code)
    }

    /// Descriptors in document order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.properties.values()
    }

    /// Classify every descriptor of the form.
    pub fn classify(&self) -> FieldGroups {
        classify(self.properties.values())
    }
}

/// An envelope has a `properties` collection that is not itself a descriptor.
///
/// A bare mapping may contain a field coded `properties`; that value carries
/// a string `type`, which an envelope's mapping never does.
fn is_envelope(value: &Value) -> bool {
    match value.get("properties") {
        Some(Value::Object(inner)) => !matches!(inner.get("type"), Some(Value::String(_))),
        Some(Value::Array(_)) => true,
        _ => false,
    }
}

/// A mapping of code to descriptor, or a sequence keyed by each `code`.
///
/// In a sequence a repeated code keeps its first position and its last
/// descriptor.
fn descriptors(value: Value) -> Result<IndexMap<String, FieldDescriptor>> {
    if value.is_array() {
        let list: Vec<FieldDescriptor> = serde_json::from_value(value)?;
        return Ok(list
            .into_iter()
            .map(|field| (field.code().to_owned(), field))
            .collect());
    }
    Ok(serde_json::from_value(value)?)
}

fn revision_string(revision: Value) -> Option<String> {
    match revision {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, FieldType};
    use serde_json::json;

    #[test]
    fn parses_envelope_with_revision() {
        let form = FormProperties::from_json_str(
            r#"{
                "properties": {
                    "title": { "code": "title", "type": "SINGLE_LINE_TEXT" },
                    "owner": { "code": "owner", "type": "CREATOR" }
                },
                "revision": "5"
            }"#,
        )
        .unwrap();

        assert_eq!(form.len(), 2);
        assert_eq!(form.revision.as_deref(), Some("5"));
        let codes: Vec<&str> = form.fields().map(FieldDescriptor::code).collect();
        assert_eq!(codes, vec!["title", "owner"]);
    }

    #[test]
    fn numeric_revision_is_kept_as_text() {
        let form = FormProperties::from_value(json!({ "properties": {}, "revision": 12 })).unwrap();
        assert_eq!(form.revision.as_deref(), Some("12"));
        assert!(form.is_empty());
    }

    #[test]
    fn parses_bare_mapping() {
        let form = FormProperties::from_value(json!({
            "due": { "code": "due", "type": "DATE" }
        }))
        .unwrap();
        assert_eq!(form.get("due").unwrap().field_type(), &FieldType::Date);
        assert!(form.revision.is_none());
    }

    #[test]
    fn bare_mapping_with_field_named_properties() {
        let form = FormProperties::from_value(json!({
            "properties": { "code": "properties", "type": "MULTI_LINE_TEXT" },
            "notes": { "code": "notes", "type": "RICH_TEXT" }
        }))
        .unwrap();
        assert_eq!(form.len(), 2);
        assert_eq!(
            form.get("properties").unwrap().field_type(),
            &FieldType::MultiLineText
        );
    }

    #[test]
    fn envelope_with_field_named_type() {
        let form = FormProperties::from_value(json!({
            "properties": {
                "type": { "code": "type", "type": "DROP_DOWN" }
            }
        }))
        .unwrap();
        assert_eq!(form.get("type").unwrap().field_type(), &FieldType::DropDown);
    }

    #[test]
    fn missing_codes_are_filled_from_keys() {
        let form = FormProperties::from_value(json!({
            "properties": {
                "amount": { "type": "NUMBER" },
                "items": {
                    "type": "SUBTABLE",
                    "fields": { "sku": { "type": "SINGLE_LINE_TEXT" } }
                }
            }
        }))
        .unwrap();

        assert_eq!(form.get("amount").unwrap().code(), "amount");
        let items = form.get("items").unwrap();
        assert_eq!(items.code(), "items");
        assert_eq!(items.children().next().unwrap().code(), "sku");
    }

    #[test]
    fn yaml_and_json_agree() {
        let json = FormProperties::from_json_str(
            r#"{"properties": {"tags": {"code": "tags", "type": "CHECK_BOX"}}}"#,
        )
        .unwrap();
        let yaml = FormProperties::from_yaml_str(
            "properties:\n  tags:\n    code: tags\n    type: CHECK_BOX\n",
        )
        .unwrap();
        assert_eq!(json, yaml);
    }

    #[test]
    fn classify_uses_document_order() {
        let form = FormProperties::from_value(json!({
            "z": { "code": "z", "type": "NUMBER" },
            "a": { "code": "a", "type": "NUMBER" }
        }))
        .unwrap();
        assert_eq!(form.classify().codes(Category::Simple), vec!["z", "a"]);
    }

    #[test]
    fn parses_sequence_of_descriptors() {
        let form = FormProperties::from_json_str(
            r#"[
                { "code": "due", "type": "DATE" },
                { "code": "files", "type": "FILE" },
                { "code": "lookup", "type": "NUMBER", "relatedApp": null }
            ]"#,
        )
        .unwrap();

        let codes: Vec<&str> = form.fields().map(FieldDescriptor::code).collect();
        assert_eq!(codes, vec!["due", "files", "lookup"]);
        let groups = form.classify();
        assert_eq!(groups.codes(Category::Simple), vec!["due"]);
        assert_eq!(groups.codes(Category::File), vec!["files"]);
    }

    #[test]
    fn envelope_may_carry_a_sequence() {
        let form = FormProperties::from_value(json!({
            "properties": [{ "code": "who", "type": "MODIFIER" }],
            "revision": "3"
        }))
        .unwrap();
        assert_eq!(form.revision.as_deref(), Some("3"));
        assert_eq!(form.get("who").unwrap().field_type(), &FieldType::Modifier);
    }

    #[test]
    fn repeated_code_in_sequence_keeps_first_position() {
        let form = FormProperties::from_value(json!([
            { "code": "a", "type": "NUMBER" },
            { "code": "b", "type": "DATE" },
            { "code": "a", "type": "CALC" }
        ]))
        .unwrap();
        let codes: Vec<&str> = form.fields().map(FieldDescriptor::code).collect();
        assert_eq!(codes, vec!["a", "b"]);
        assert_eq!(form.get("a").unwrap().field_type(), &FieldType::Calc);
    }

    #[test]
    fn deeply_nested_json_text_loads() {
        let depth = 100;
        let mut text = String::from(r#"{"code": "leaf", "type": "FILE"}"#);
        let mut child = String::from("leaf");
        for level in 0..depth {
            let code = format!("t{level}");
            text = format!(
                r#"{{"code": "{code}", "type": "SUBTABLE", "fields": {{"{child}": {text}}}}}"#
            );
            child = code;
        }
        let text = format!(r#"{{"{child}": {text}}}"#);

        let form = FormProperties::from_json_str(&text).unwrap();
        let mut groups = form.classify();
        for _ in 0..depth {
            assert_eq!(groups.table_fields.len(), 1);
            groups = groups.table_fields.remove(0).fields;
        }
        assert_eq!(groups.codes(Category::File), vec!["leaf"]);
    }

    #[test]
    fn trailing_garbage_is_an_error() {
        let err = FormProperties::from_json_str(r#"{} {}"#).unwrap_err();
        assert!(matches!(err, FieldsError::Json(_)));
    }

    #[test]
    fn malformed_input_is_an_error() {
        let err = FormProperties::from_json_str(r#"{"x": {"code": "x"}}"#).unwrap_err();
        assert!(matches!(err, FieldsError::Json(_)));

        let err = FormProperties::from_json_str("not json").unwrap_err();
        assert!(matches!(err, FieldsError::Json(_)));

        let err = FormProperties::from_yaml_str("a: [unclosed").unwrap_err();
        assert!(matches!(err, FieldsError::Yaml(_)));
    }
}
