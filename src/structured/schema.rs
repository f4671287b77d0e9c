//! Schema generation utilities.

use serde_json::{json, Value};

/// Keywords of draft-07 JSON Schema that Gemini's OpenAPI-subset
/// `responseSchema` rejects.
const UNSUPPORTED_KEYWORDS: &[&str] = &["$schema", "title", "definitions", "$id", "examples"];

pub fn json_schema_from_type<T: schemars::JsonSchema>() -> Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(&schema).unwrap_or_else(|_| json!({}))
}

/// Reduce a generated JSON Schema to the subset accepted as a Gemini
/// `responseSchema`, recursively.
pub fn to_response_schema(schema: Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(k, _)| !UNSUPPORTED_KEYWORDS.contains(&k.as_str()))
                .map(|(k, v)| (k, to_response_schema(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(to_response_schema).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(schemars::JsonSchema)]
    #[allow(dead_code)]
    struct Sample {
        name: String,
        tags: Vec<String>,
    }

    #[test]
    fn test_schema_from_type() {
        let schema = json_schema_from_type::<Sample>();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["name"]["type"], "string");
        assert_eq!(schema["properties"]["tags"]["items"]["type"], "string");
        assert!(schema.get("$schema").is_some());
    }

    #[test]
    fn test_response_schema_strips_unsupported_keywords() {
        let schema = to_response_schema(json_schema_from_type::<Sample>());
        assert!(schema.get("$schema").is_none());
        assert!(schema.get("title").is_none());
        assert_eq!(schema["properties"]["tags"]["type"], "array");
    }

    #[test]
    fn test_response_schema_recurses_into_nested_values() {
        let schema = to_response_schema(json!({
            "type": "object",
            "properties": {
                "inner": {"title": "Inner", "type": "string"}
            },
            "anyOf": [{"title": "A", "type": "string"}]
        }));
        assert_eq!(schema["properties"]["inner"], json!({"type": "string"}));
        assert_eq!(schema["anyOf"][0], json!({"type": "string"}));
    }
}
