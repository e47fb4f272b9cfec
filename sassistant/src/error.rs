//! Assistant-layer errors and classification.
//!
//! ```rust
//! use sassistant::{AssistantError, AssistantErrorKind, RunStatus};
//!
//! let err = AssistantError::run_terminal(RunStatus::Expired, "run expired");
//! assert_eq!(err.kind, AssistantErrorKind::RunTerminal);
//! assert_eq!(err.run_status, Some(RunStatus::Expired));
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

use sprovider::{ProviderError, RetryClassify, RetryError};
use stooling::ToolError;

use crate::RunStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantErrorKind {
    Configuration,
    Provider,
    FatalDispatch,
    Tooling,
    /// The run or a tool-output submission reached an unrecoverable status.
    RunTerminal,
    RetryExhausted,
    Upload,
}

impl AssistantErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Provider => "provider",
            Self::FatalDispatch => "fatal_dispatch",
            Self::Tooling => "tooling",
            Self::RunTerminal => "run_terminal",
            Self::RetryExhausted => "retry_exhausted",
            Self::Upload => "upload",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantError {
    pub kind: AssistantErrorKind,
    pub message: String,
    pub retryable: bool,
    pub run_status: Option<RunStatus>,
    pub attempts: Option<u32>,
}

impl AssistantError {
    pub fn new(kind: AssistantErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable: false,
            run_status: None,
            attempts: None,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::Configuration, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::Provider, message)
    }

    pub fn fatal_dispatch(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::FatalDispatch, message)
    }

    pub fn tooling(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::Tooling, message)
    }

    pub fn run_terminal(status: RunStatus, message: impl Into<String>) -> Self {
        let mut error = Self::new(AssistantErrorKind::RunTerminal, message);
        error.run_status = Some(status);
        error
    }

    pub fn upload(message: impl Into<String>) -> Self {
        Self::new(AssistantErrorKind::Upload, message)
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = Some(attempts);
        self
    }

    pub fn from_retry(error: RetryError<AssistantError>) -> Self {
        match error {
            RetryError::Exhausted {
                attempts,
                last_error,
            } => {
                let mut exhausted =
                    Self::new(AssistantErrorKind::RetryExhausted, last_error.message)
                        .with_attempts(attempts);
                exhausted.run_status = last_error.run_status;
                exhausted
            }
            RetryError::Aborted { attempts, error } => error.with_attempts(attempts),
        }
    }
}

impl Display for AssistantError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.kind, self.run_status, self.attempts) {
            (AssistantErrorKind::RunTerminal, Some(status), _) => {
                write!(f, "RunTerminal ({status}): {}", self.message)
            }
            (AssistantErrorKind::RetryExhausted, _, Some(attempts)) => write!(
                f,
                "RetryExhausted after {attempts} attempt(s): {}",
                self.message
            ),
            _ => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for AssistantError {}

/// Backend and tool failures are always retried; `retryable` is only the backend's hint.
impl RetryClassify for AssistantError {
    fn is_retryable(&self) -> bool {
        !matches!(
            self.kind,
            AssistantErrorKind::Configuration
                | AssistantErrorKind::FatalDispatch
                | AssistantErrorKind::RunTerminal
                | AssistantErrorKind::Upload
        )
    }

    fn kind_name(&self) -> &'static str {
        self.kind.as_str()
    }
}

impl From<ProviderError> for AssistantError {
    fn from(value: ProviderError) -> Self {
        let retryable = value.retryable;
        AssistantError::provider(value.to_string()).with_retryable(retryable)
    }
}

impl From<ToolError> for AssistantError {
    fn from(value: ToolError) -> Self {
        if value.is_fatal_dispatch() {
            return AssistantError::fatal_dispatch(value.to_string());
        }

        let retryable = value.retryable;
        AssistantError::tooling(value.to_string()).with_retryable(retryable)
    }
}
