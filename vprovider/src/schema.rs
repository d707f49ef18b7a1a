//! Tool schema translation into each provider's wire shape.
//!
//! ```rust
//! use serde_json::json;
//! use vprovider::schema::gemini_schema;
//!
//! let translated = gemini_schema(&json!({
//!     "type": "object",
//!     "properties": { "query": { "type": "string" } }
//! }));
//!
//! assert_eq!(translated["type"], "OBJECT");
//! assert_eq!(translated["properties"]["query"]["type"], "STRING");
//! ```

use serde_json::{Map, Value, json};

use crate::ToolSpec;

/// `{"type": "function", "function": {name, description, parameters}}`
pub fn openai_tool(tool: &ToolSpec) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": object_schema_or_empty(&tool.parameters),
        }
    })
}

/// `{name, description, input_schema}`
pub fn anthropic_tool(tool: &ToolSpec) -> Value {
    json!({
        "name": tool.name,
        "description": tool.description,
        "input_schema": object_schema_or_empty(&tool.parameters),
    })
}

/// One entry of Gemini's `tools[].functionDeclarations`.
pub fn gemini_function_declaration(tool: &ToolSpec) -> Value {
    json!({
        "name": tool.name,
        "description": tool.description,
        "parameters": gemini_schema(&object_schema_or_empty(&tool.parameters)),
    })
}

/// Recursively upper-cases `type` values, including each name in a `type` array.
/// Every other node is copied as-is.
pub fn gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(fields) => {
            let translated = fields
                .iter()
                .map(|(key, value)| {
                    let value = match (key.as_str(), value) {
                        ("type", Value::String(kind)) => Value::String(kind.to_ascii_uppercase()),
                        ("type", Value::Array(kinds)) => Value::Array(
                            kinds.iter().map(uppercase_type_name).collect(),
                        ),
                        _ => gemini_schema(value),
                    };
                    (key.clone(), value)
                })
                .collect::<Map<_, _>>();
            Value::Object(translated)
        }
        Value::Array(items) => Value::Array(items.iter().map(gemini_schema).collect()),
        other => other.clone(),
    }
}

fn uppercase_type_name(kind: &Value) -> Value {
    match kind {
        Value::String(name) => Value::String(name.to_ascii_uppercase()),
        other => gemini_schema(other),
    }
}

fn object_schema_or_empty(parameters: &Value) -> Value {
    if parameters.is_null() {
        json!({ "type": "object", "properties": {} })
    } else {
        parameters.clone()
    }
}
