//! Function dispatch errors and classifications.

use std::error::Error;
use std::fmt::{Display, Formatter};

use sprovider::RetryClassify;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolErrorKind {
    /// The backend asked for a function call without naming the function.
    MissingName,
    NotFound,
    InvalidArguments,
    /// The function ran but produced something other than text.
    NonTextResult,
    Execution,
    Timeout,
    Other,
}

impl ToolErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingName => "missing_name",
            Self::NotFound => "not_found",
            Self::InvalidArguments => "invalid_arguments",
            Self::NonTextResult => "non_text_result",
            Self::Execution => "execution",
            Self::Timeout => "timeout",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
    pub retryable: bool,
    pub tool_name: Option<String>,
    pub tool_call_id: Option<String>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
            tool_name: None,
            tool_call_id: None,
        }
    }

    pub fn missing_name(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::MissingName, message, false)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::NotFound, message, false)
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidArguments, message, false)
    }

    pub fn non_text_result(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::NonTextResult, message, false)
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Execution, message, false)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Timeout, message, true)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Other, message, false)
    }

    pub fn with_tool_name(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    pub fn with_tool_call_id(mut self, tool_call_id: impl Into<String>) -> Self {
        self.tool_call_id = Some(tool_call_id.into());
        self
    }

    /// Dispatch failures that must end the turn without another attempt.
    pub fn is_fatal_dispatch(&self) -> bool {
        matches!(
            self.kind,
            ToolErrorKind::MissingName | ToolErrorKind::NotFound | ToolErrorKind::NonTextResult
        )
    }
}

impl Display for ToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (&self.tool_name, &self.tool_call_id) {
            (Some(tool_name), Some(tool_call_id)) => write!(
                f,
                "{:?} [function={}, call_id={}]: {}",
                self.kind, tool_name, tool_call_id, self.message
            ),
            (Some(tool_name), None) => {
                write!(f, "{:?} [function={}]: {}", self.kind, tool_name, self.message)
            }
            _ => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for ToolError {}

impl RetryClassify for ToolError {
    fn is_retryable(&self) -> bool {
        !self.is_fatal_dispatch()
    }

    fn kind_name(&self) -> &'static str {
        self.kind.as_str()
    }
}
