//! Argument validation against a tool's declared input schema.
//!
//! Each descriptor's schema is compiled once, when the registry is built, so
//! the schema advertised by `tools/list` is exactly the one enforced here.
//! Keys that are not declared in `properties` are ignored.

use std::fmt;

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, JSONSchema, ValidationError};
use rmcp::model::JsonObject;
use serde_json::Value;

use super::error::{ToolError, ToolResult};

/// Compiled input schema of one tool.
pub struct ArgumentValidator {
    schema: JSONSchema,
    required: Vec<String>,
}

impl fmt::Debug for ArgumentValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentValidator")
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

impl ArgumentValidator {
    /// Compile a tool's input schema.
    pub fn compile(schema: &JsonObject) -> Result<Self, String> {
        let normalized = normalize_schema(schema);
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&normalized)
            .map_err(|e| format!("invalid input schema: {e}"))?;

        let required = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|fields| fields.iter().filter_map(Value::as_str).map(String::from).collect())
            .unwrap_or_default();

        Ok(Self {
            schema: compiled,
            required,
        })
    }

    /// Validate `arguments` against the compiled schema.
    ///
    /// A `null` required value counts as missing. Fails with
    /// [`ToolError::InvalidParams`] naming every offending field.
    pub fn validate(&self, arguments: &JsonObject) -> ToolResult<()> {
        let mut instance = arguments.clone();
        instance.retain(|key, value| !(value.is_null() && self.required.contains(key)));
        let instance = Value::Object(instance);

        let problems: Vec<String> = match self.schema.validate(&instance) {
            Ok(()) => return Ok(()),
            Err(errors) => errors.map(|e| describe(&e)).collect(),
        };

        Err(ToolError::invalid_params(problems.join("; ")))
    }
}

/// Rewrite the derived schema into plain Draft 7.
///
/// OpenAPI-style `nullable: true` becomes a `null` member of `type`, and the
/// `$schema` marker is dropped so the draft is fixed by the compiler options.
fn normalize_schema(schema: &JsonObject) -> Value {
    let mut schema = schema.clone();
    schema.remove("$schema");

    if let Some(Value::Object(properties)) = schema.get_mut("properties") {
        for property in properties.values_mut().filter_map(Value::as_object_mut) {
            if property.remove("nullable") != Some(Value::Bool(true)) {
                continue;
            }
            let mut types = match property.remove("type") {
                Some(Value::String(ty)) => vec![Value::String(ty)],
                Some(Value::Array(types)) => types,
                Some(other) => vec![other],
                None => continue,
            };
            if !types.iter().any(|t| t == "null") {
                types.push(Value::from("null"));
            }
            property.insert("type".to_string(), Value::Array(types));
        }
    }

    Value::Object(schema)
}

fn describe(error: &ValidationError<'_>) -> String {
    if let ValidationErrorKind::Required { property } = &error.kind {
        let field = property.as_str().map(String::from).unwrap_or_else(|| property.to_string());
        return format!("missing required parameter '{field}'");
    }

    let path = error.instance_path.to_string();
    let field = path.trim_start_matches('/');
    if field.is_empty() {
        error.to_string()
    } else {
        format!("parameter '{field}' is invalid: {error}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn validator() -> ArgumentValidator {
        ArgumentValidator::compile(&object(json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "type": "object",
            "properties": {
                "query": { "type": "string", "minLength": 1 },
                "count": { "type": "integer", "format": "uint32", "minimum": 1, "maximum": 20, "default": 5 },
                "language": { "type": ["string", "null"] },
                "owner": { "type": "string", "nullable": true }
            },
            "required": ["query"]
        })))
        .unwrap()
    }

    fn message(err: ToolError) -> String {
        assert!(matches!(err, ToolError::InvalidParams(_)));
        err.to_string()
    }

    #[test]
    fn test_valid_arguments() {
        let args = object(json!({ "query": "rust", "count": 20, "language": null }));
        assert!(validator().validate(&args).is_ok());
    }

    #[test]
    fn test_missing_required() {
        let err = validator().validate(&JsonObject::new()).unwrap_err();
        assert!(message(err).contains("missing required parameter 'query'"));
    }

    #[test]
    fn test_null_required_counts_as_missing() {
        let args = object(json!({ "query": null }));
        let err = validator().validate(&args).unwrap_err();
        assert!(message(err).contains("missing required parameter 'query'"));
    }

    #[test]
    fn test_wrong_type() {
        let args = object(json!({ "query": 42 }));
        let err = validator().validate(&args).unwrap_err();
        let message = message(err);
        assert!(message.starts_with("Invalid arguments: parameter 'query' is invalid"));
        assert!(message.contains("string"));
    }

    #[test]
    fn test_integer_rejects_fraction_and_strings() {
        let args = object(json!({ "query": "q", "count": 2.5 }));
        assert!(message(validator().validate(&args).unwrap_err()).contains("'count'"));

        let args = object(json!({ "query": "q", "count": "5" }));
        assert!(message(validator().validate(&args).unwrap_err()).contains("'count'"));
    }

    #[test]
    fn test_numeric_bounds() {
        let args = object(json!({ "query": "q", "count": 0 }));
        assert!(message(validator().validate(&args).unwrap_err()).contains("'count'"));

        let args = object(json!({ "query": "q", "count": 21 }));
        assert!(message(validator().validate(&args).unwrap_err()).contains("'count'"));

        let args = object(json!({ "query": "q", "count": 1 }));
        assert!(validator().validate(&args).is_ok());
    }

    #[test]
    fn test_min_length() {
        let args = object(json!({ "query": "" }));
        let err = validator().validate(&args).unwrap_err();
        assert!(message(err).contains("'query'"));
    }

    #[test]
    fn test_null_optional_values() {
        let args = object(json!({ "query": "q", "owner": null }));
        assert!(validator().validate(&args).is_ok());

        let args = object(json!({ "query": "q", "count": null }));
        assert!(validator().validate(&args).is_err());
    }

    #[test]
    fn test_every_offending_field_is_reported() {
        let args = object(json!({ "query": "", "count": 50 }));
        let message = message(validator().validate(&args).unwrap_err());
        assert!(message.contains("'query'"));
        assert!(message.contains("'count'"));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let args = object(json!({ "query": "q", "extra": [1, 2, 3] }));
        assert!(validator().validate(&args).is_ok());
    }

    #[test]
    fn test_nullable_becomes_type_union() {
        let schema = object(json!({
            "properties": { "owner": { "type": "string", "nullable": true } }
        }));
        let normalized = normalize_schema(&schema);
        assert_eq!(normalized["properties"]["owner"]["type"], json!(["string", "null"]));
        assert!(normalized["properties"]["owner"].get("nullable").is_none());
    }
}
