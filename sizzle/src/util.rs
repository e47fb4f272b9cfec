//! Small convenience constructors for common types.

use serde_json::Value;

use crate::{
    AssistantTool, ChatError, FunctionCallPolicy, Message, ToolChoice, ToolDefinition, UserTurn,
};

pub fn system_message(content: impl Into<String>) -> Message {
    Message::system(content)
}

pub fn user_message(content: impl Into<String>) -> Message {
    Message::user(content)
}

pub fn assistant_message(content: impl Into<String>) -> Message {
    Message::assistant(content)
}

pub fn function_message(name: impl Into<String>, content: impl Into<String>) -> Message {
    Message::function(name, content)
}

pub fn function_tool(
    name: impl Into<String>,
    description: impl Into<String>,
    parameters: Value,
) -> AssistantTool {
    AssistantTool::function(ToolDefinition::new(name, description, parameters))
}

pub fn user_turn(content: impl Into<String>) -> UserTurn {
    UserTurn::new(content)
}

/// Policy that forces `name` and returns its model-supplied arguments without invoking it.
pub fn capture_policy(name: impl Into<String>) -> Result<FunctionCallPolicy, ChatError> {
    FunctionCallPolicy::builder()
        .forced_function(name)
        .return_args_only(true)
        .build()
}

pub fn parse_tool_choice(value: &str) -> Option<ToolChoice> {
    let value = value.trim();
    match value.to_ascii_lowercase().as_str() {
        "auto" => Some(ToolChoice::Auto),
        "none" => Some(ToolChoice::None),
        "required" => Some(ToolChoice::Required),
        "" => None,
        _ => Some(ToolChoice::Function(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use stooling::InvocationMode;

    use crate::{AssistantTool, Role, ToolChoice};

    use super::{capture_policy, function_message, function_tool, parse_tool_choice, user_turn};

    #[test]
    fn parse_tool_choice_supports_keywords_and_function_names() {
        assert_eq!(parse_tool_choice("Auto"), Some(ToolChoice::Auto));
        assert_eq!(parse_tool_choice("none"), Some(ToolChoice::None));
        assert_eq!(parse_tool_choice("REQUIRED"), Some(ToolChoice::Required));
        assert_eq!(
            parse_tool_choice(" get_weather "),
            Some(ToolChoice::Function("get_weather".to_string()))
        );
        assert_eq!(parse_tool_choice("  "), None);
    }

    #[test]
    fn message_and_tool_helpers_apply_expected_shapes() {
        let message = function_message("lookup", "sunny");
        assert_eq!(message.role, Role::Function);
        assert_eq!(message.name.as_deref(), Some("lookup"));

        let tool = function_tool("lookup", "Look up weather", json!({"type": "object"}));
        assert!(matches!(tool, AssistantTool::Function(ref def) if def.name == "lookup"));

        let turn = user_turn("hello");
        assert_eq!(turn.content, "hello");
        assert!(!turn.return_tool_info);
    }

    #[test]
    fn capture_policy_forces_the_named_function() {
        let policy = capture_policy("route").expect("capture policy is valid");
        assert_eq!(policy.forced_function(), Some("route"));
        assert_eq!(policy.invocation_mode(), InvocationMode::CaptureArgsOnly);
    }
}
