//! Assistant configuration and validation.
//!
//! ```rust
//! use sassistant::{AssistantConfig, AssistantErrorKind, AssistantTool, ToolChoice};
//! use sprovider::ToolDefinition;
//! use serde_json::json;
//!
//! let route = ToolDefinition::new("route", "Picks a handler", json!({"type": "object"}));
//! let config = AssistantConfig::intent_extraction("gpt-4o-mini", vec![AssistantTool::function(route)]);
//! assert!(config.invocation_mode.is_capture());
//! assert_eq!(config.tool_choice, Some(ToolChoice::Required));
//! assert!(config.validate(None).is_ok());
//!
//! let err = AssistantConfig::new("davinci").validate(None).expect_err("unapproved model");
//! assert_eq!(err.kind, AssistantErrorKind::Configuration);
//! ```

use std::time::Duration;

use sprovider::RetryPolicy;
use stooling::{FunctionRegistry, InvocationMode};

use crate::{AssistantError, AssistantProfile, AssistantTool, PollPolicy, ToolChoice};

/// Models the run API accepts.
pub const APPROVED_MODELS: [&str; 5] = [
    "gpt-4o-mini",
    "gpt-4o",
    "gpt-4-turbo",
    "gpt-4",
    "gpt-3.5-turbo",
];

pub const DEFAULT_MAX_TOOL_ROUNDS: u32 = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct AssistantConfig {
    pub profile: AssistantProfile,
    pub tool_choice: Option<ToolChoice>,
    pub invocation_mode: InvocationMode,
    pub max_tool_rounds: u32,
    /// Cancel runs left waiting on tool outputs by capture-mode turns.
    pub cancel_abandoned_runs: bool,
    pub poll: PollPolicy,
    pub retry: RetryPolicy,
}

impl AssistantConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            profile: AssistantProfile::new(model),
            tool_choice: None,
            invocation_mode: InvocationMode::Normal,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            cancel_abandoned_runs: false,
            poll: PollPolicy::default(),
            retry: RetryPolicy::default(),
        }
    }

    /// Capture-only preset that forces the model to call one of `tools`.
    pub fn intent_extraction(model: impl Into<String>, tools: Vec<AssistantTool>) -> Self {
        Self::new(model)
            .with_tools(tools)
            .with_tool_choice(ToolChoice::Required)
            .capture_args_only()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.profile.name = Some(name.into());
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.profile.instructions = Some(instructions.into());
        self
    }

    pub fn with_tool(mut self, tool: AssistantTool) -> Self {
        self.profile.tools.push(tool);
        self
    }

    pub fn with_tools(mut self, tools: Vec<AssistantTool>) -> Self {
        self.profile.tools.extend(tools);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.profile.options.temperature = Some(temperature);
        self
    }

    pub fn with_tool_choice(mut self, tool_choice: ToolChoice) -> Self {
        self.tool_choice = Some(tool_choice);
        self
    }

    pub fn capture_args_only(mut self) -> Self {
        self.invocation_mode = InvocationMode::CaptureArgsOnly;
        self
    }

    pub fn with_max_tool_rounds(mut self, max_tool_rounds: u32) -> Self {
        self.max_tool_rounds = max_tool_rounds;
        self
    }

    pub fn with_cancel_abandoned_runs(mut self, enabled: bool) -> Self {
        self.cancel_abandoned_runs = enabled;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll = self.poll.with_interval(interval);
        self
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Whether the assistant declares a tool that consumes uploaded files.
    pub fn accepts_files(&self) -> bool {
        !self.profile.file_tools().is_empty()
    }

    pub fn validate(&self, registry: Option<&FunctionRegistry>) -> Result<(), AssistantError> {
        let model = self.profile.model.as_str();
        if !APPROVED_MODELS.contains(&model) {
            return Err(AssistantError::configuration(format!(
                "model '{model}' is not supported for assistant runs; expected one of {}",
                APPROVED_MODELS.join(", ")
            )));
        }

        if self.max_tool_rounds == 0 {
            return Err(AssistantError::configuration(
                "max_tool_rounds must be at least 1",
            ));
        }

        if self.retry.max_attempts == 0 {
            return Err(AssistantError::configuration(
                "retry policy must allow at least one attempt",
            ));
        }

        let functions = self.profile.function_tools();

        if let Some(ToolChoice::Function(name)) = &self.tool_choice
            && !functions.iter().any(|function| &function.name == name)
        {
            return Err(AssistantError::configuration(format!(
                "tool_choice names '{name}', which is not a declared function tool"
            )));
        }

        if self.invocation_mode.is_capture() {
            if functions.is_empty() {
                return Err(AssistantError::configuration(
                    "capture mode requires at least one function tool",
                ));
            }
            return Ok(());
        }

        match registry {
            None if !functions.is_empty() => Err(AssistantError::configuration(
                "function tools are declared but no function registry was provided",
            )),
            Some(_) if functions.is_empty() => Err(AssistantError::configuration(
                "a function registry was provided but no function tools are declared",
            )),
            Some(registry) => {
                let unresolved = registry.unresolved(&functions);
                if unresolved.is_empty() {
                    Ok(())
                } else {
                    Err(AssistantError::configuration(format!(
                        "declared functions without a registered implementation: {}",
                        unresolved.join(", ")
                    )))
                }
            }
            None => Ok(()),
        }
    }
}
