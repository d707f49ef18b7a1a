//! JSON argument parsing helpers for function and trait-based tools.
//!
//! ```rust
//! use vtooling::{parse_json_object, required_string};
//!
//! let args = parse_json_object(r#"{"query":"traffic on I-5"}"#).expect("object should parse");
//! let query = required_string(&args, "query").expect("query should be present");
//! assert_eq!(query, "traffic on I-5");
//! ```

use serde_json::{Map, Value};

use crate::ToolError;

pub fn parse_json_value(args_json: &str) -> Result<Value, ToolError> {
    serde_json::from_str(args_json)
        .map_err(|err| ToolError::invalid_arguments(format!("invalid JSON arguments: {err}")))
}

/// Parses an argument object; blank input is treated as `{}`.
pub fn parse_json_object(args_json: &str) -> Result<Map<String, Value>, ToolError> {
    if args_json.trim().is_empty() {
        return Ok(Map::new());
    }

    match parse_json_value(args_json)? {
        Value::Object(object) => Ok(object),
        _ => Err(ToolError::invalid_arguments("expected JSON object arguments")),
    }
}

/// A string argument that must be present and non-blank.
pub fn required_string(args: &Map<String, Value>, key: &str) -> Result<String, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| ToolError::invalid_arguments(format!("missing required string: '{key}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToolErrorKind;

    #[test]
    fn parse_object_and_extract_required_string() {
        let args = parse_json_object("{\"query\":\" weather \"}").expect("args should parse");
        assert_eq!(required_string(&args, "query").expect("query should exist"), "weather");
    }

    #[test]
    fn invalid_or_non_object_arguments_are_rejected() {
        let error = parse_json_value("{").expect_err("json should fail");
        assert_eq!(error.kind, ToolErrorKind::InvalidArguments);

        let error = parse_json_object("[1]").expect_err("array should fail");
        assert_eq!(error.kind, ToolErrorKind::InvalidArguments);

        let args = parse_json_object("  ").expect("blank is empty object");
        let error = required_string(&args, "query").expect_err("query is missing");
        assert_eq!(error.kind, ToolErrorKind::InvalidArguments);
    }
}
