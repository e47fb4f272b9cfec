//! Chat-layer errors and classification.

use std::error::Error;
use std::fmt::{Display, Formatter};

use sprovider::{ProviderError, RetryClassify, RetryError};
use stooling::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    InvalidRequest,
    /// Invalid service or per-call configuration; raised before any network call.
    Configuration,
    Provider,
    /// A dispatched function could not be resolved or returned non-text output.
    FatalDispatch,
    Tooling,
    RetryExhausted,
}

impl ChatErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Configuration => "configuration",
            Self::Provider => "provider",
            Self::FatalDispatch => "fatal_dispatch",
            Self::Tooling => "tooling",
            Self::RetryExhausted => "retry_exhausted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
    pub retryable: bool,
    pub attempts: Option<u32>,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable: false,
            attempts: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::InvalidRequest, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Configuration, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Provider, message)
    }

    pub fn fatal_dispatch(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::FatalDispatch, message)
    }

    pub fn tooling(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Tooling, message)
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = Some(attempts);
        self
    }

    /// Collapses a retry outcome: exhaustion becomes `RetryExhausted` carrying the
    /// last error's message, an early abort keeps the original error.
    pub fn from_retry(error: RetryError<ChatError>) -> Self {
        match error {
            RetryError::Exhausted {
                attempts,
                last_error,
            } => Self::new(ChatErrorKind::RetryExhausted, last_error.message)
                .with_attempts(attempts),
            RetryError::Aborted { attempts, error } => error.with_attempts(attempts),
        }
    }
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.attempts {
            Some(attempts) if self.kind == ChatErrorKind::RetryExhausted => write!(
                f,
                "{:?} after {attempts} attempt(s): {}",
                self.kind, self.message
            ),
            _ => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for ChatError {}

/// Any failure inside a turn is retried except invalid calls and fatal dispatch.
impl RetryClassify for ChatError {
    fn is_retryable(&self) -> bool {
        !matches!(
            self.kind,
            ChatErrorKind::InvalidRequest
                | ChatErrorKind::Configuration
                | ChatErrorKind::FatalDispatch
        )
    }

    fn kind_name(&self) -> &'static str {
        self.kind.as_str()
    }
}

impl From<ProviderError> for ChatError {
    fn from(value: ProviderError) -> Self {
        let retryable = value.retryable;
        ChatError::provider(value.to_string()).with_retryable(retryable)
    }
}

impl From<ToolError> for ChatError {
    fn from(value: ToolError) -> Self {
        if value.is_fatal_dispatch() {
            return ChatError::fatal_dispatch(value.to_string());
        }

        let retryable = value.retryable;
        ChatError::tooling(value.to_string()).with_retryable(retryable)
    }
}
