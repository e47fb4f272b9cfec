//! Dispatch inputs, modes, and outcomes.

use scommon::{MetadataMap, ThreadId};
use sprovider::FunctionCallIntent;

use crate::ToolArgs;

/// Where the arguments for a dispatched function come from.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ArgumentMode {
    /// Arguments parsed from the model's call; unparseable payloads invoke with none.
    ModelSupplied,
    CallerSupplied(ToolArgs),
    #[default]
    NoArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvocationMode {
    #[default]
    Normal,
    /// Every declared function echoes its arguments instead of running.
    CaptureArgsOnly,
}

impl InvocationMode {
    pub fn is_capture(self) -> bool {
        matches!(self, Self::CaptureArgsOnly)
    }
}

/// A function call to dispatch, as requested by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    pub id: Option<String>,
    pub name: Option<String>,
    pub arguments: String,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            arguments: arguments.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl From<FunctionCallIntent> for FunctionCall {
    fn from(value: FunctionCallIntent) -> Self {
        Self {
            id: None,
            name: value.name,
            arguments: value.arguments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InvocationContext {
    pub thread_id: Option<ThreadId>,
    pub tool_call_id: Option<String>,
    pub metadata: MetadataMap,
}

impl InvocationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thread_id(mut self, thread_id: impl Into<ThreadId>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    pub fn with_tool_call_id(mut self, tool_call_id: impl Into<String>) -> Self {
        self.tool_call_id = Some(tool_call_id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Result of one dispatched function, with the arguments actually used.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub name: String,
    pub args: Option<ToolArgs>,
    pub output: String,
}
