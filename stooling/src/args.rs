//! JSON argument parsing helpers for dispatched functions.
//!
//! ```rust
//! use stooling::{parse_model_arguments, required_string};
//!
//! let args = parse_model_arguments(r#"{"dish":"ramen"}"#).expect("object should parse");
//! assert_eq!(required_string(&args, "dish").expect("dish present"), "ramen");
//!
//! assert!(parse_model_arguments("{not json").is_none());
//! assert!(parse_model_arguments("").is_none());
//! ```

use serde_json::{Map, Value};

use crate::ToolError;

/// Named (keyword) arguments passed to an invocable.
pub type ToolArgs = Map<String, Value>;

/// Lenient parse of model-produced argument text.
///
/// Empty, malformed, or non-object payloads yield `None` instead of an error.
pub fn parse_model_arguments(raw: &str) -> Option<ToolArgs> {
    if raw.trim().is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

pub fn parse_json_object(args_json: &str) -> Result<ToolArgs, ToolError> {
    let value = serde_json::from_str::<Value>(args_json)
        .map_err(|err| ToolError::invalid_arguments(format!("invalid JSON arguments: {err}")))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ToolError::invalid_arguments("expected JSON object arguments")),
    }
}

pub fn required_string(args: &ToolArgs, key: &str) -> Result<String, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| ToolError::invalid_arguments(format!("missing required string: '{key}'")))
}

pub fn args_to_json(args: &ToolArgs) -> String {
    Value::Object(args.clone()).to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn lenient_parse_degrades_to_none() {
        assert!(parse_model_arguments("   ").is_none());
        assert!(parse_model_arguments("[1, 2]").is_none());
        assert!(parse_model_arguments("{\"dish\":").is_none());

        let parsed = parse_model_arguments("{\"servings\": 2}").expect("object should parse");
        assert_eq!(parsed.get("servings"), Some(&json!(2)));
    }

    #[test]
    fn strict_parse_reports_invalid_arguments() {
        let error = parse_json_object("{").expect_err("json should fail");
        assert_eq!(error.kind, crate::ToolErrorKind::InvalidArguments);

        let error = parse_json_object("\"text\"").expect_err("non-object should fail");
        assert_eq!(error.kind, crate::ToolErrorKind::InvalidArguments);
    }

    #[test]
    fn args_serialize_back_to_json_text() {
        let args = parse_json_object("{\"dish\":\"ramen\"}").expect("args should parse");
        assert_eq!(args_to_json(&args), "{\"dish\":\"ramen\"}");
        assert_eq!(args_to_json(&ToolArgs::new()), "{}");
    }
}
